//! Error types for the greeting window

use std::fmt;

/// Errors raised while talking to the GUI toolkit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The display context could not be opened (no display server, init failure)
    DisplayUnavailable(String),

    /// A window or widget could not be created
    WidgetCreation(String),

    /// An operation was attempted on a disposed window or display context
    Disposed(String),

    /// Any other toolkit-level failure
    Toolkit(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DisplayUnavailable(msg) => write!(f, "Display unavailable: {}", msg),
            AppError::WidgetCreation(msg) => write!(f, "Widget creation failed: {}", msg),
            AppError::Disposed(what) => write!(f, "Use after dispose: {}", what),
            AppError::Toolkit(msg) => write!(f, "Toolkit error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Error creation helpers
impl AppError {
    pub fn display_unavailable(msg: impl Into<String>) -> Self {
        AppError::DisplayUnavailable(msg.into())
    }

    pub fn widget_creation(msg: impl Into<String>) -> Self {
        AppError::WidgetCreation(msg.into())
    }

    pub fn disposed(what: impl Into<String>) -> Self {
        AppError::Disposed(what.into())
    }

    pub fn toolkit(msg: impl Into<String>) -> Self {
        AppError::Toolkit(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_carry_context() {
        assert_eq!(
            AppError::display_unavailable("no DISPLAY").to_string(),
            "Display unavailable: no DISPLAY"
        );
        assert_eq!(
            AppError::disposed("main window").to_string(),
            "Use after dispose: main window"
        );
    }

    #[test]
    fn converts_into_anyhow() {
        let err: anyhow::Error = AppError::toolkit("boom").into();
        assert!(err.to_string().contains("boom"));
    }
}
