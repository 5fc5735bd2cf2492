// Module tree shared by the `chalk` binary and the integration tests.

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod drawing;
pub mod event;
pub mod gateway;
pub mod logging;
pub mod practice;
pub mod speech;
pub mod store;
pub mod ui;
