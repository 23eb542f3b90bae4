// Entry point: open the display, run the main window's event loop, tear down

use tracing::{debug, info};

use super::main_window::MainWindow;
use crate::error::AppResult;
use crate::toolkit::Toolkit;
use crate::toolkit::gtk::GtkToolkit;

/// Counters collected by [`event_loop`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Cycles that dispatched a pending event
    pub dispatched: usize,
    /// Cycles that found nothing pending and slept
    pub sleeps: usize,
}

/// Open the GTK display and run the main window until it is closed.
pub fn run() -> AppResult<()> {
    let display = GtkToolkit::open()?;
    run_on(display)
}

/// Run the main window on an already opened display context. The context is
/// disposed on every exit path, after the window.
pub fn run_on<T: Toolkit>(display: T) -> AppResult<()> {
    let display = scopeguard::guard(display, |display| display.dispose());

    let mut window = MainWindow::construct(&*display)?;
    window.open()?;

    let stats = event_loop(&*display, &window)?;
    info!(
        dispatched = stats.dispatched,
        sleeps = stats.sleeps,
        "main window closed, shutting down"
    );
    Ok(())
}

/// Dispatch pending events, sleeping when there are none, until `window` is
/// disposed. Disposal is checked before every cycle. A failure inside an
/// event handler ends the loop with that error.
pub fn event_loop<T: Toolkit>(display: &T, window: &MainWindow<T>) -> AppResult<LoopStats> {
    let mut stats = LoopStats::default();
    while !window.is_disposed() {
        if display.read_and_dispatch() {
            stats.dispatched += 1;
            if let Some(err) = window.take_failure() {
                return Err(err);
            }
        } else {
            display.sleep()?;
            stats.sleeps += 1;
        }
    }
    debug!(?stats, "event loop finished");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::toolkit::headless::{Event, HeadlessToolkit};

    #[test]
    fn loop_stops_in_the_cycle_that_disposes_the_window() {
        let display = HeadlessToolkit::new();
        let mut window = MainWindow::construct(&display).expect("construct");
        window.open().expect("open");

        display.close_window();
        display.click("Click Me!");

        let stats = event_loop(&display, &window).expect("loop");
        assert_eq!(stats, LoopStats { dispatched: 1, sleeps: 0 });
        assert_eq!(display.pending_inputs(), 1);
        assert!(display.dialogs().is_empty());
    }

    #[test]
    fn loop_on_already_disposed_window_does_not_dispatch() {
        let display = HeadlessToolkit::new();
        let window = MainWindow::construct(&display).expect("construct");
        window.close();
        display.click("Click Me!");

        let stats = event_loop(&display, &window).expect("loop");
        assert_eq!(stats, LoopStats::default());
        assert_eq!(display.dispatch_count(), 0);
    }

    #[test]
    fn run_on_disposes_context_after_window_closes() {
        let display = HeadlessToolkit::new();
        display.close_window();
        let observer = display.clone();

        run_on(display).expect("run");

        assert!(observer.is_context_disposed());
        let events = observer.events();
        let closed = events
            .iter()
            .position(|e| matches!(e, Event::WindowClosed { .. }))
            .expect("window closed");
        let disposed = events
            .iter()
            .position(|e| *e == Event::ContextDisposed)
            .expect("context disposed");
        assert!(closed < disposed);
    }

    #[test]
    fn run_on_disposes_context_when_loop_fails() {
        let display = HeadlessToolkit::new();
        let observer = display.clone();

        let result = run_on(display);

        assert!(matches!(result, Err(AppError::Toolkit(_))));
        assert!(observer.is_context_disposed());
    }

    #[test]
    fn run_on_reports_the_dialog_failure_itself() {
        let display = HeadlessToolkit::new();
        display.click("Click Me!");
        let observer = display.clone();

        let err = run_on(display).expect_err("dialog could not be dismissed");

        assert!(err.to_string().contains("modal dialog"), "got: {}", err);
        assert!(observer.is_context_disposed());
        assert_eq!(observer.dispatch_count(), 1);
    }

    #[test]
    fn disposing_twice_after_run_is_harmless() {
        let display = HeadlessToolkit::new();
        display.close_window();
        let observer = display.clone();
        run_on(display).expect("run");

        observer.dispose();
        assert!(observer.is_context_disposed());
    }
}
