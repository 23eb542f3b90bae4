//! Configuration constants for the greeting window

/// GUI configuration
pub mod gui {
    /// Application ID
    pub const APP_ID: &str = "dev.algo.ageit.accounting";

    /// Window title
    pub const WINDOW_TITLE: &str = "SWT Application";

    /// Label of the only push button
    pub const BUTTON_LABEL: &str = "Click Me!";

    /// Text shown by the informational dialog
    pub const MESSAGE: &str = "Hello, SWT World!";

    /// Grid layout: one column, equal-width cells
    pub const GRID_COLUMNS: u32 = 1;
    pub const GRID_EQUAL_WIDTH: bool = true;

    /// Widget spacing inside the grid
    pub const WIDGET_SPACING: i32 = 5;
    pub const MARGIN: i32 = 5;
}

/// Logging configuration
pub mod logging {
    /// Filter used when `RUST_LOG` is unset or invalid
    pub const DEFAULT_FILTER: &str = "info";
}
