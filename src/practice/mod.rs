pub mod attempt;
pub mod charset;
pub mod controller;

pub use controller::{PracticeController, PracticeError, PracticeMode, SequenceKind};
