//! The GUI capability the greeting window is written against.
//!
//! A [`Toolkit`] value is the display context: it is created once, handed by
//! reference to window construction, and disposed once when the event loop
//! ends. [`gtk::GtkToolkit`] talks to a real display server;
//! [`headless::HeadlessToolkit`] records everything in memory and replays
//! scripted input.

pub mod gtk;
pub mod headless;

use bitflags::bitflags;

use crate::config;
use crate::error::AppResult;

bitflags! {
    /// Icon and button set of a message dialog.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MessageStyle: u32 {
        const ICON_ERROR = 0x0001;
        const ICON_INFORMATION = 0x0002;
        const ICON_QUESTION = 0x0004;
        const ICON_WARNING = 0x0008;
        const OK = 0x0020;
        const CANCEL = 0x0040;
        const YES = 0x0080;
        const NO = 0x0100;

        const ICONS = Self::ICON_ERROR.bits()
            | Self::ICON_INFORMATION.bits()
            | Self::ICON_QUESTION.bits()
            | Self::ICON_WARNING.bits();
        const BUTTONS = Self::OK.bits() | Self::CANCEL.bits() | Self::YES.bits() | Self::NO.bits();
    }
}

impl MessageStyle {
    /// The button part of the style.
    pub fn buttons(self) -> MessageStyle {
        self & MessageStyle::BUTTONS
    }

    /// True when the dialog can only be acknowledged.
    pub fn is_acknowledgement_only(self) -> bool {
        self.buttons() == MessageStyle::OK
    }
}

/// A modal message dialog request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBox {
    pub style: MessageStyle,
    pub message: String,
}

impl MessageBox {
    pub fn new(style: MessageStyle, message: impl Into<String>) -> Self {
        Self {
            style,
            message: message.into(),
        }
    }
}

/// Grid layout hint applied to a window's content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub equal_width: bool,
}

impl GridLayout {
    pub fn new(columns: u32, equal_width: bool) -> Self {
        Self {
            columns: columns.max(1),
            equal_width,
        }
    }

    /// Row and column of the `index`-th child, filled row by row.
    pub fn cell(&self, index: u32) -> (u32, u32) {
        (index / self.columns, index % self.columns)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(config::gui::GRID_COLUMNS, config::gui::GRID_EQUAL_WIDTH)
    }
}

/// Click callback stored on a button. Receives the display context and the
/// button's parent window and runs on the GUI thread.
pub type ClickHandler<T> = Box<dyn Fn(&T, &<T as Toolkit>::Window)>;

/// Display context plus the widget primitives the application needs.
///
/// Handles are cheap clones sharing one underlying context and are not
/// `Send`: everything happens on the thread that opened the context.
pub trait Toolkit: Clone + 'static {
    /// Handle to a top-level window.
    type Window: Clone + 'static;

    /// Create a hidden top-level window with the given title and layout.
    fn create_window(&self, title: &str, layout: GridLayout) -> AppResult<Self::Window>;

    /// Append a push button to the window's grid.
    fn add_button(
        &self,
        window: &Self::Window,
        label: &str,
        on_click: ClickHandler<Self>,
    ) -> AppResult<()>;

    /// Resize the window to the preferred size of its contents.
    fn pack(&self, window: &Self::Window) -> AppResult<()>;

    /// Make the window visible.
    fn open(&self, window: &Self::Window) -> AppResult<()>;

    /// Close the window as if the user had closed it.
    fn close(&self, window: &Self::Window);

    /// Whether the window has been destroyed.
    fn is_disposed(&self, window: &Self::Window) -> bool;

    /// Show a modal message dialog and wait until the user dismisses it.
    fn show_message(&self, parent: &Self::Window, message: &MessageBox) -> AppResult<()>;

    /// Dispatch one pending event. Returns false when nothing was pending.
    fn read_and_dispatch(&self) -> bool;

    /// Block until the next event arrives.
    fn sleep(&self) -> AppResult<()>;

    /// Release the display context. Repeated calls are no-ops.
    fn dispose(&self);

    /// Whether [`Toolkit::dispose`] has run.
    fn is_context_disposed(&self) -> bool;
}
