// The application's only window: one push button that opens the greeting dialog

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info};

use super::dialogs;
use crate::config;
use crate::error::{AppError, AppResult};
use crate::toolkit::{GridLayout, Toolkit};

/// Lifecycle of the main window. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WindowState {
    Created,
    Open,
    Disposed,
}

pub struct MainWindow<T: Toolkit> {
    display: T,
    window: T::Window,
    opened: bool,
    // first error raised inside a click handler, picked up by the event loop
    failure: Rc<RefCell<Option<AppError>>>,
}

impl<T: Toolkit> MainWindow<T> {
    /// Build the window on `display`: title, one-column grid, the button and
    /// its click handler, then size the window to fit.
    pub fn construct(display: &T) -> AppResult<Self> {
        let window = display.create_window(config::gui::WINDOW_TITLE, GridLayout::default())?;
        let failure = Rc::new(RefCell::new(None));

        let slot = failure.clone();
        display.add_button(
            &window,
            config::gui::BUTTON_LABEL,
            Box::new(move |display: &T, parent: &T::Window| {
                if let Err(e) = dialogs::show_greeting_dialog(display, parent) {
                    slot.borrow_mut().get_or_insert(e);
                }
            }),
        )?;

        display.pack(&window)?;
        debug!(title = config::gui::WINDOW_TITLE, "main window constructed");

        Ok(Self {
            display: display.clone(),
            window,
            opened: false,
            failure,
        })
    }

    /// Make the window visible. Opening an open window does nothing.
    pub fn open(&mut self) -> AppResult<()> {
        if self.is_disposed() {
            return Err(AppError::disposed("main window"));
        }
        if !self.opened {
            self.display.open(&self.window)?;
            self.opened = true;
            info!(title = config::gui::WINDOW_TITLE, "main window opened");
        }
        Ok(())
    }

    /// Close the window as if the user had.
    pub fn close(&self) {
        self.display.close(&self.window);
    }

    pub fn is_disposed(&self) -> bool {
        self.display.is_disposed(&self.window)
    }

    pub fn state(&self) -> WindowState {
        if self.is_disposed() {
            WindowState::Disposed
        } else if self.opened {
            WindowState::Open
        } else {
            WindowState::Created
        }
    }

    /// Take the error a click handler failed with, if any.
    pub fn take_failure(&self) -> Option<AppError> {
        self.failure.borrow_mut().take()
    }

    /// Toolkit handle of the underlying window.
    pub fn handle(&self) -> &T::Window {
        &self.window
    }
}
