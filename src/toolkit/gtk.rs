//! GTK 4 implementation of the display context.

use std::cell::Cell;
use std::rc::Rc;

use gtk4::glib::{self, MainContext};
use gtk4::prelude::*;
use gtk4::{ButtonsType, MessageType, gdk};
use tracing::{debug, info, warn};

use super::{ClickHandler, GridLayout, MessageBox, MessageStyle, Toolkit};
use crate::config;
use crate::error::{AppError, AppResult};

/// Process-wide connection to the display server.
#[derive(Clone, Debug)]
pub struct GtkToolkit {
    display: gdk::Display,
    disposed: Rc<Cell<bool>>,
}

/// A top-level GTK window with a grid as its only child.
#[derive(Clone, Debug)]
pub struct GtkWindow {
    widget: gtk4::Window,
    grid: gtk4::Grid,
    layout: GridLayout,
    children: Rc<Cell<u32>>,
    disposed: Rc<Cell<bool>>,
}

/// Non-owning form of [`GtkWindow`], captured by button callbacks so the
/// window is not kept alive by its own children.
struct WeakGtkWindow {
    widget: glib::WeakRef<gtk4::Window>,
    grid: glib::WeakRef<gtk4::Grid>,
    layout: GridLayout,
    children: Rc<Cell<u32>>,
    disposed: Rc<Cell<bool>>,
}

impl GtkWindow {
    fn downgrade(&self) -> WeakGtkWindow {
        WeakGtkWindow {
            widget: self.widget.downgrade(),
            grid: self.grid.downgrade(),
            layout: self.layout,
            children: self.children.clone(),
            disposed: self.disposed.clone(),
        }
    }
}

impl WeakGtkWindow {
    fn upgrade(&self) -> Option<GtkWindow> {
        Some(GtkWindow {
            widget: self.widget.upgrade()?,
            grid: self.grid.upgrade()?,
            layout: self.layout,
            children: self.children.clone(),
            disposed: self.disposed.clone(),
        })
    }
}

impl GtkToolkit {
    /// Initialise GTK and connect to the default display.
    pub fn open() -> AppResult<Self> {
        glib::set_prgname(Some(config::gui::APP_ID));
        glib::set_application_name(config::gui::WINDOW_TITLE);
        gtk4::init().map_err(|e| AppError::display_unavailable(e.to_string()))?;

        let display = gdk::Display::default()
            .ok_or_else(|| AppError::display_unavailable("GTK has no default display"))?;
        let display_name = display.name();
        info!(display = %display_name, "display context opened");

        Ok(Self {
            display,
            disposed: Rc::new(Cell::new(false)),
        })
    }

    fn ensure_live(&self) -> AppResult<()> {
        if self.disposed.get() {
            return Err(AppError::disposed("display context"));
        }
        Ok(())
    }
}

fn ensure_window_live(window: &GtkWindow) -> AppResult<()> {
    if window.disposed.get() {
        return Err(AppError::disposed("window"));
    }
    Ok(())
}

fn message_type(style: MessageStyle) -> MessageType {
    if style.contains(MessageStyle::ICON_ERROR) {
        MessageType::Error
    } else if style.contains(MessageStyle::ICON_WARNING) {
        MessageType::Warning
    } else if style.contains(MessageStyle::ICON_QUESTION) {
        MessageType::Question
    } else if style.contains(MessageStyle::ICON_INFORMATION) {
        MessageType::Info
    } else {
        MessageType::Other
    }
}

fn buttons_type(style: MessageStyle) -> ButtonsType {
    let buttons = style.buttons();
    if buttons.contains(MessageStyle::YES | MessageStyle::NO) {
        ButtonsType::YesNo
    } else if buttons.contains(MessageStyle::OK | MessageStyle::CANCEL) {
        ButtonsType::OkCancel
    } else if buttons.contains(MessageStyle::CANCEL) {
        ButtonsType::Cancel
    } else if buttons.contains(MessageStyle::OK) {
        ButtonsType::Ok
    } else {
        ButtonsType::None
    }
}

impl Toolkit for GtkToolkit {
    type Window = GtkWindow;

    fn create_window(&self, title: &str, layout: GridLayout) -> AppResult<GtkWindow> {
        self.ensure_live()?;

        let widget = gtk4::Window::builder()
            .title(title)
            .resizable(true)
            .build();
        let grid = gtk4::Grid::builder()
            .column_homogeneous(layout.equal_width)
            .row_spacing(config::gui::WIDGET_SPACING)
            .column_spacing(config::gui::WIDGET_SPACING)
            .margin_top(config::gui::MARGIN)
            .margin_bottom(config::gui::MARGIN)
            .margin_start(config::gui::MARGIN)
            .margin_end(config::gui::MARGIN)
            .build();
        widget.set_child(Some(&grid));

        let disposed = Rc::new(Cell::new(false));
        let disposed_flag = disposed.clone();
        let title_owned = title.to_string();
        widget.connect_destroy(move |_| {
            disposed_flag.set(true);
            info!(title = %title_owned, "window disposed");
        });

        debug!(title, columns = layout.columns, "window created");
        Ok(GtkWindow {
            widget,
            grid,
            layout,
            children: Rc::new(Cell::new(0)),
            disposed,
        })
    }

    fn add_button(
        &self,
        window: &GtkWindow,
        label: &str,
        on_click: ClickHandler<Self>,
    ) -> AppResult<()> {
        self.ensure_live()?;
        ensure_window_live(window)?;

        let button = gtk4::Button::with_label(label);
        button.set_hexpand(window.layout.equal_width);

        let index = window.children.get();
        let (row, column) = window.layout.cell(index);
        let row = i32::try_from(row).map_err(|_| AppError::widget_creation("grid row out of range"))?;
        let column = i32::try_from(column)
            .map_err(|_| AppError::widget_creation("grid column out of range"))?;
        window.grid.attach(&button, column, row, 1, 1);
        window.children.set(index + 1);

        let display = self.clone();
        let parent = window.downgrade();
        let label_owned = label.to_string();
        button.connect_clicked(move |_| {
            debug!(label = %label_owned, "button clicked");
            if let Some(parent) = parent.upgrade() {
                on_click(&display, &parent);
            }
        });

        Ok(())
    }

    fn pack(&self, window: &GtkWindow) -> AppResult<()> {
        self.ensure_live()?;
        ensure_window_live(window)?;
        // -1 lets GTK size the window from the grid's natural size
        window.widget.set_default_size(-1, -1);
        Ok(())
    }

    fn open(&self, window: &GtkWindow) -> AppResult<()> {
        self.ensure_live()?;
        ensure_window_live(window)?;
        window.widget.present();
        Ok(())
    }

    fn close(&self, window: &GtkWindow) {
        if window.disposed.get() {
            return;
        }
        // gtk_window_close ignores windows that were never realized
        if window.widget.is_realized() {
            window.widget.close();
        } else {
            window.widget.destroy();
        }
    }

    fn is_disposed(&self, window: &GtkWindow) -> bool {
        window.disposed.get()
    }

    fn show_message(&self, parent: &GtkWindow, message: &MessageBox) -> AppResult<()> {
        self.ensure_live()?;
        ensure_window_live(parent)?;

        let dialog = gtk4::MessageDialog::builder()
            .transient_for(&parent.widget)
            .modal(true)
            .message_type(message_type(message.style))
            .buttons(buttons_type(message.style))
            .text(message.message.as_str())
            .build();

        debug!(message = %message.message, "message dialog opened");
        let response = MainContext::default().block_on(dialog.run_future());
        dialog.close();
        debug!(?response, "message dialog dismissed");
        Ok(())
    }

    fn read_and_dispatch(&self) -> bool {
        MainContext::default().iteration(false)
    }

    fn sleep(&self) -> AppResult<()> {
        self.ensure_live()?;
        MainContext::default().iteration(true);
        Ok(())
    }

    fn dispose(&self) {
        if self.disposed.replace(true) {
            debug!("display context already disposed");
            return;
        }

        for toplevel in gtk4::Window::list_toplevels() {
            if let Ok(window) = toplevel.downcast::<gtk4::Window>() {
                warn!("destroying window left open at shutdown");
                window.destroy();
            }
        }
        self.display.flush();
        self.display.close();
        info!("display context disposed");
    }

    fn is_context_disposed(&self) -> bool {
        self.disposed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn information_ok_maps_to_info_dialog_with_ok_button() {
        let style = MessageStyle::ICON_INFORMATION | MessageStyle::OK;
        assert_eq!(message_type(style), MessageType::Info);
        assert_eq!(buttons_type(style), ButtonsType::Ok);
    }

    #[test]
    fn button_combinations_map_to_gtk_sets() {
        assert_eq!(
            buttons_type(MessageStyle::OK | MessageStyle::CANCEL),
            ButtonsType::OkCancel
        );
        assert_eq!(
            buttons_type(MessageStyle::YES | MessageStyle::NO),
            ButtonsType::YesNo
        );
        assert_eq!(buttons_type(MessageStyle::ICON_ERROR), ButtonsType::None);
        assert_eq!(message_type(MessageStyle::OK), MessageType::Other);
        assert_eq!(
            message_type(MessageStyle::ICON_WARNING | MessageStyle::OK),
            MessageType::Warning
        );
    }
}

// GTK may only be initialised from one thread per process, so every check that
// needs a live display runs inside this single test.
#[cfg(test)]
mod display_tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn pump_until_disposed(display: &GtkToolkit, window: &GtkWindow) {
        for _ in 0..100 {
            if display.is_disposed(window) {
                return;
            }
            display.read_and_dispatch();
        }
    }

    #[test]
    fn window_lifecycle_on_real_display() {
        let display = match GtkToolkit::open() {
            Ok(display) => display,
            Err(AppError::DisplayUnavailable(reason)) => {
                eprintln!("skipping, no display: {}", reason);
                return;
            }
            Err(e) => panic!("unexpected error opening display: {}", e),
        };

        // grid placement and click dispatch through the weak parent
        let window = display
            .create_window("SWT Application", GridLayout::default())
            .expect("window");
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        display
            .add_button(
                &window,
                "Click Me!",
                Box::new(move |_: &GtkToolkit, parent: &GtkWindow| {
                    assert!(parent.widget.title().is_some());
                    counter.set(counter.get() + 1);
                }),
            )
            .expect("button");
        display.pack(&window).expect("pack");

        let button = window
            .grid
            .child_at(0, 0)
            .and_then(|w| w.downcast::<gtk4::Button>().ok())
            .expect("button at row 0, column 0");
        assert_eq!(button.label().as_deref(), Some("Click Me!"));
        assert!(window.grid.child_at(0, 1).is_none());
        assert_eq!(window.widget.title().as_deref(), Some("SWT Application"));

        button.emit_clicked();
        assert_eq!(clicks.get(), 1);

        // closing a window that was never opened still disposes it
        assert!(!display.is_disposed(&window));
        display.close(&window);
        assert!(display.is_disposed(&window));

        // open -> close -> disposed
        let second = display
            .create_window("second", GridLayout::default())
            .expect("window");
        display.open(&second).expect("open");
        assert!(!display.is_disposed(&second));
        display.close(&second);
        pump_until_disposed(&display, &second);
        assert!(display.is_disposed(&second));
        assert!(matches!(
            display.open(&second),
            Err(AppError::Disposed(_))
        ));

        // dispose destroys leftovers and is idempotent
        let leftover = display
            .create_window("leftover", GridLayout::default())
            .expect("window");
        display.open(&leftover).expect("open");
        display.dispose();
        display.dispose();
        assert!(display.is_context_disposed());
        assert!(display.is_disposed(&leftover));
        assert!(matches!(
            display.create_window("late", GridLayout::default()),
            Err(AppError::Disposed(_))
        ));
    }
}
