// lib.rs for ageit-accounting
// The binary in src/main.rs is a thin wrapper over these modules.

pub mod config;
pub mod error;
pub mod gui;
pub mod logging;
pub mod toolkit;

pub use error::{AppError, AppResult};
