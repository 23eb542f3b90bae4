//! In-memory display context.
//!
//! Records every window, button and dialog it is asked to create and feeds
//! scripted user input ([`Input`]) through the same dispatch path a real
//! event loop uses. A modal dialog consumes input until it sees
//! [`Input::DismissDialog`]; anything else arriving meanwhile is recorded as
//! [`Event::InputBlocked`] and dropped.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use tracing::debug;

use super::{ClickHandler, GridLayout, MessageBox, MessageStyle, Toolkit};
use crate::error::{AppError, AppResult};

/// Handle to a headless window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(usize);

/// Scripted user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Press the first live button with this label.
    Click(String),
    /// Acknowledge the open dialog.
    DismissDialog,
    /// Close the first live window.
    CloseWindow,
}

/// Something observable that happened on the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WindowOpened { title: String },
    ButtonClicked { label: String },
    DialogOpened { message: String, style: MessageStyle },
    DialogDismissed,
    InputBlocked(Input),
    WindowClosed { title: String },
    ContextDisposed,
}

struct WindowRecord {
    title: String,
    layout: GridLayout,
    packed: bool,
    visible: bool,
    disposed: bool,
    buttons: Vec<usize>,
}

struct ButtonRecord {
    window: WindowId,
    label: String,
    handler: Rc<ClickHandler<HeadlessToolkit>>,
}

#[derive(Default)]
struct State {
    windows: Vec<WindowRecord>,
    buttons: Vec<ButtonRecord>,
    pending: VecDeque<Input>,
    events: Vec<Event>,
    dialog_open: bool,
    dispatched: usize,
    sleeps: usize,
    disposed: bool,
}

/// Display context that never touches a display server.
#[derive(Clone, Default)]
pub struct HeadlessToolkit {
    state: Rc<RefCell<State>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one input for a later dispatch cycle.
    pub fn push_input(&self, input: Input) {
        self.state.borrow_mut().pending.push_back(input);
    }

    pub fn click(&self, label: &str) {
        self.push_input(Input::Click(label.to_string()));
    }

    pub fn dismiss_dialog(&self) {
        self.push_input(Input::DismissDialog);
    }

    pub fn close_window(&self) {
        self.push_input(Input::CloseWindow);
    }

    /// All windows ever created, in creation order.
    pub fn windows(&self) -> Vec<WindowId> {
        (0..self.state.borrow().windows.len()).map(WindowId).collect()
    }

    pub fn title(&self, window: WindowId) -> Option<String> {
        self.state
            .borrow()
            .windows
            .get(window.0)
            .map(|w| w.title.clone())
    }

    pub fn layout(&self, window: WindowId) -> Option<GridLayout> {
        self.state.borrow().windows.get(window.0).map(|w| w.layout)
    }

    pub fn is_packed(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(window.0)
            .is_some_and(|w| w.packed)
    }

    pub fn is_visible(&self, window: WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(window.0)
            .is_some_and(|w| w.visible && !w.disposed)
    }

    /// Labels of the buttons in `window`, in grid order.
    pub fn button_labels(&self, window: WindowId) -> Vec<String> {
        let state = self.state.borrow();
        match state.windows.get(window.0) {
            Some(record) => record
                .buttons
                .iter()
                .map(|&b| state.buttons[b].label.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    /// Messages of every dialog opened so far.
    pub fn dialogs(&self) -> Vec<(String, MessageStyle)> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::DialogOpened { message, style } => Some((message.clone(), *style)),
                _ => None,
            })
            .collect()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.state.borrow().dialog_open
    }

    pub fn pending_inputs(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Number of dispatch cycles that handled an input.
    pub fn dispatch_count(&self) -> usize {
        self.state.borrow().dispatched
    }

    pub fn sleep_count(&self) -> usize {
        self.state.borrow().sleeps
    }

    fn record(&self, event: Event) {
        debug!(?event, "headless event");
        self.state.borrow_mut().events.push(event);
    }

    fn ensure_live(&self) -> AppResult<()> {
        if self.state.borrow().disposed {
            return Err(AppError::disposed("display context"));
        }
        Ok(())
    }

    fn ensure_window_live(&self, window: WindowId) -> AppResult<()> {
        match self.state.borrow().windows.get(window.0) {
            Some(record) if !record.disposed => Ok(()),
            Some(_) => Err(AppError::disposed("window")),
            None => Err(AppError::toolkit(format!("unknown window {}", window.0))),
        }
    }

    fn first_live_window(&self) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .position(|w| !w.disposed)
            .map(WindowId)
    }

    fn dispatch(&self, input: Input) {
        match input {
            Input::Click(label) => {
                let target = {
                    let state = self.state.borrow();
                    state
                        .buttons
                        .iter()
                        .find(|b| b.label == label && !state.windows[b.window.0].disposed)
                        .map(|b| (b.window, b.handler.clone()))
                };
                match target {
                    Some((window, handler)) => {
                        self.record(Event::ButtonClicked { label });
                        handler(self, &window);
                    }
                    None => debug!(%label, "click on missing button ignored"),
                }
            }
            Input::CloseWindow => {
                if let Some(window) = self.first_live_window() {
                    self.close(&window);
                }
            }
            Input::DismissDialog => debug!("dismiss with no dialog open ignored"),
        }
    }
}

impl Toolkit for HeadlessToolkit {
    type Window = WindowId;

    fn create_window(&self, title: &str, layout: GridLayout) -> AppResult<WindowId> {
        self.ensure_live()?;
        let mut state = self.state.borrow_mut();
        state.windows.push(WindowRecord {
            title: title.to_string(),
            layout,
            packed: false,
            visible: false,
            disposed: false,
            buttons: Vec::new(),
        });
        Ok(WindowId(state.windows.len() - 1))
    }

    fn add_button(
        &self,
        window: &WindowId,
        label: &str,
        on_click: ClickHandler<Self>,
    ) -> AppResult<()> {
        self.ensure_live()?;
        self.ensure_window_live(*window)?;
        let mut state = self.state.borrow_mut();
        let index = state.buttons.len();
        state.buttons.push(ButtonRecord {
            window: *window,
            label: label.to_string(),
            handler: Rc::new(on_click),
        });
        state.windows[window.0].buttons.push(index);
        Ok(())
    }

    fn pack(&self, window: &WindowId) -> AppResult<()> {
        self.ensure_live()?;
        self.ensure_window_live(*window)?;
        self.state.borrow_mut().windows[window.0].packed = true;
        Ok(())
    }

    fn open(&self, window: &WindowId) -> AppResult<()> {
        self.ensure_live()?;
        self.ensure_window_live(*window)?;
        let title = {
            let mut state = self.state.borrow_mut();
            let record = &mut state.windows[window.0];
            record.visible = true;
            record.title.clone()
        };
        self.record(Event::WindowOpened { title });
        Ok(())
    }

    fn close(&self, window: &WindowId) {
        let title = {
            let mut state = self.state.borrow_mut();
            match state.windows.get_mut(window.0) {
                Some(record) if !record.disposed => {
                    record.disposed = true;
                    record.visible = false;
                    record.title.clone()
                }
                _ => return,
            }
        };
        self.record(Event::WindowClosed { title });
    }

    fn is_disposed(&self, window: &WindowId) -> bool {
        self.state
            .borrow()
            .windows
            .get(window.0)
            .is_none_or(|w| w.disposed)
    }

    fn show_message(&self, parent: &WindowId, message: &MessageBox) -> AppResult<()> {
        self.ensure_live()?;
        self.ensure_window_live(*parent)?;

        self.state.borrow_mut().dialog_open = true;
        self.record(Event::DialogOpened {
            message: message.message.clone(),
            style: message.style,
        });

        loop {
            let next = self.state.borrow_mut().pending.pop_front();
            match next {
                Some(Input::DismissDialog) => break,
                Some(other) => self.record(Event::InputBlocked(other)),
                None => {
                    self.state.borrow_mut().dialog_open = false;
                    return Err(AppError::toolkit(
                        "modal dialog open with no scripted input left to dismiss it",
                    ));
                }
            }
        }

        self.state.borrow_mut().dialog_open = false;
        self.record(Event::DialogDismissed);
        Ok(())
    }

    fn read_and_dispatch(&self) -> bool {
        let next = self.state.borrow_mut().pending.pop_front();
        match next {
            Some(input) => {
                self.state.borrow_mut().dispatched += 1;
                self.dispatch(input);
                true
            }
            None => false,
        }
    }

    fn sleep(&self) -> AppResult<()> {
        self.ensure_live()?;
        let mut state = self.state.borrow_mut();
        if state.pending.is_empty() {
            return Err(AppError::toolkit(
                "event loop would block forever: scripted input exhausted",
            ));
        }
        state.sleeps += 1;
        Ok(())
    }

    fn dispose(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.disposed {
                debug!("display context already disposed");
                return;
            }
            state.disposed = true;
            for window in state.windows.iter_mut() {
                window.disposed = true;
                window.visible = false;
            }
        }
        self.record(Event::ContextDisposed);
    }

    fn is_context_disposed(&self) -> bool {
        self.state.borrow().disposed
    }
}
