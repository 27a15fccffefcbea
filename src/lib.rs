// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod cue;
pub mod program;
pub mod progress;
pub mod runtime;
pub mod session;
pub mod store;
pub mod timer;
pub mod ui;
