pub mod pointer;
pub mod surface;

pub use pointer::{PointerEvent, PointerKind, Viewport};
pub use surface::{DrawingSurface, Point, SurfaceError};
