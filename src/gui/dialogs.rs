// Dialog definitions shown by the main window

use tracing::error;

use crate::config;
use crate::error::AppResult;
use crate::toolkit::{MessageBox, MessageStyle, Toolkit};

/// Informational greeting with a single OK button
pub fn greeting_message() -> MessageBox {
    MessageBox::new(
        MessageStyle::ICON_INFORMATION | MessageStyle::OK,
        config::gui::MESSAGE,
    )
}

/// Show the greeting modally over `parent`. Returns once it is dismissed.
pub fn show_greeting_dialog<T: Toolkit>(display: &T, parent: &T::Window) -> AppResult<()> {
    display.show_message(parent, &greeting_message()).map_err(|e| {
        error!("failed to show greeting dialog: {}", e);
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_information_with_ok_only() {
        let message = greeting_message();
        assert_eq!(message.message, "Hello, SWT World!");
        assert!(message.style.contains(MessageStyle::ICON_INFORMATION));
        assert!(message.style.is_acknowledgement_only());
    }
}
