use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tracing::{debug, warn};

use crate::dispatcher::ActionOutcome;
use crate::engine::Engine;

use super::input::{self, InputResult};
use super::App;

/// Everything the event loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic poll timer fired.
    Tick,
    Key(KeyEvent),
    /// Terminal size changed to (columns, rows).
    Resize(u16, u16),
    /// A detached lifecycle command finished.
    Action(ActionOutcome),
}

impl From<ActionOutcome> for AppEvent {
    fn from(outcome: ActionOutcome) -> Self {
        AppEvent::Action(outcome)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl<E: Engine + Clone + 'static> App<E> {
    /// Apply one event to the model. The caller redraws afterwards.
    pub fn handle_event(&mut self, event: AppEvent) -> Flow {
        match event {
            AppEvent::Tick => {
                self.refresh();
                // Re-arm only after the poll, so a slow engine cannot queue ticks.
                self.tick_pending.store(false, Ordering::Release);
                Flow::Continue
            }
            AppEvent::Key(key) => match input::handle_key(self, key) {
                Some(InputResult::Quit) => Flow::Quit,
                Some(InputResult::Consumed) | None => Flow::Continue,
            },
            AppEvent::Resize(width, height) => {
                self.handle_resize(width, height);
                Flow::Continue
            }
            AppEvent::Action(outcome) => {
                debug!(%outcome, "lifecycle command finished");
                self.status_message = Some(outcome.to_string());
                Flow::Continue
            }
        }
    }
}

/// Send a `Tick` every `interval` until the loop goes away. While `pending` is
/// set a tick is already queued and this one is dropped; the loop clears it.
pub fn spawn_ticker(tx: Sender<AppEvent>, interval: Duration, pending: Arc<AtomicBool>) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            // The app owns the other handle; alone means the loop is gone.
            if Arc::strong_count(&pending) == 1 {
                break;
            }
            if pending.swap(true, Ordering::AcqRel) {
                continue;
            }
            if tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
}

/// Block on keystrokes and forward each key press.
pub fn spawn_input_reader(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(AppEvent::Key(key)),
                // Without SIGWINCH, crossterm's own resize events are the only source.
                #[cfg(not(unix))]
                Ok(Event::Resize(width, height)) => tx.send(AppEvent::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(e) => {
                    warn!("keyboard reader stopped: {}", e);
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
    });
}

/// Measure the terminal on SIGWINCH and forward it as `Resize`. Close the
/// returned handle to stop the thread.
#[cfg(unix)]
pub fn spawn_resize_listener(
    tx: Sender<AppEvent>,
) -> std::io::Result<signal_hook::iterator::Handle> {
    use signal_hook::consts::signal::SIGWINCH;
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGWINCH])?;
    let handle = signals.handle();
    thread::spawn(move || {
        for _ in signals.forever() {
            let Ok((width, height)) = crossterm::terminal::size() else {
                continue;
            };
            if tx.send(AppEvent::Resize(width, height)).is_err() {
                break;
            }
        }
    });
    Ok(handle)
}
