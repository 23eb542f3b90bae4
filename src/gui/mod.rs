// Main entry point for GUI module
pub mod app;
pub mod dialogs;
pub mod main_window;

pub use app::{LoopStats, event_loop, run, run_on};
pub use main_window::{MainWindow, WindowState};
