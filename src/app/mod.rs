mod event_loop;
mod render;
mod input;

use std::io;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::runtime::Handle;
use tracing::info;

use crate::config::Config;
use crate::dispatcher::{ActionDispatcher, Target};
use crate::engine::{DockerEngine, Engine};
use crate::error::DashError;
use crate::model::{ContainerRecord, HostInfo, Snapshot, ViewState};
use crate::snapshot::SnapshotService;
use crate::viewmodel::{flatten, Row};

pub use event_loop::{AppEvent, Flow};
pub use input::InputResult;

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Raw mode + alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, DashError> {
        enable_raw_mode().map_err(DashError::TerminalInit)?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            restore_terminal();
            return Err(DashError::TerminalInit(e));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Dashboard state. Only the event loop thread touches it.
pub struct App<E: Engine + Clone + 'static> {
    pub snapshot: Snapshot,
    pub view: ViewState,
    pub host: HostInfo,
    /// Rows from the last layout pass; the cursor indexes into these.
    pub rows: Vec<Row>,
    pub status_message: Option<String>,
    service: SnapshotService<E>,
    dispatcher: ActionDispatcher<E, AppEvent>,
    runtime: Handle,
    /// Set while a `Tick` is queued; shared with the ticker thread.
    tick_pending: Arc<AtomicBool>,
}

impl<E: Engine + Clone + 'static> App<E> {
    pub fn new(engine: E, runtime: Handle, events: Sender<AppEvent>, config: &Config) -> Self {
        let view = ViewState {
            sort_key: config.sort_key,
            show_all_processes: config.show_all_processes,
            ..Default::default()
        };
        Self {
            snapshot: Snapshot::default(),
            view,
            host: HostInfo::default(),
            rows: Vec::new(),
            status_message: None,
            service: SnapshotService::new(engine.clone(), config.include_stopped),
            dispatcher: ActionDispatcher::new(engine, runtime.clone(), events),
            runtime,
            tick_pending: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Pending-tick flag shared with the ticker thread.
    pub fn tick_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.tick_pending)
    }

    /// Replace the snapshot with a fresh poll. Blocks until the engine answers.
    pub fn refresh(&mut self) {
        let previous = std::mem::take(&mut self.snapshot);
        self.snapshot = self.runtime.block_on(self.service.refresh(previous));
        self.host = HostInfo::collect();
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.view.width = width;
        self.view.height = height;
    }

    /// Adopt new terminal bounds and re-clamp the cursor against them.
    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.resize(width, height);
        self.layout();
    }

    /// Flatten and sort the snapshot, then clamp the cursor against the result.
    pub fn layout(&mut self) {
        self.rows = flatten(
            &self.snapshot,
            self.view.sort_key,
            self.view.sort_reversed,
            self.view.show_all_processes,
            self.view.width as usize,
        );
        let height = self.view.table_height();
        self.view.cursor.clamp(self.rows.len(), height);
    }

    /// Id of the container owning the row under the cursor.
    pub fn cursor_container_id(&self) -> Option<&str> {
        self.rows
            .get(self.view.cursor.active)
            .map(|r| r.container_id.as_str())
    }

    pub fn cursor_container(&self) -> Option<&ContainerRecord> {
        self.cursor_container_id().and_then(|id| self.snapshot.get(id))
    }

    /// Selected containers, or the one under the cursor when nothing is selected.
    pub fn target_ids(&self) -> Vec<String> {
        let selected = self.snapshot.selected_ids();
        if !selected.is_empty() {
            return selected;
        }
        self.cursor_container_id()
            .map(|id| vec![id.to_string()])
            .unwrap_or_default()
    }

    /// [`App::target_ids`] paired with container names for reporting.
    pub fn targets(&self) -> Vec<Target> {
        self.target_ids()
            .into_iter()
            .map(|id| {
                let name = self.snapshot.get(&id).map(|c| c.name.clone()).unwrap_or_default();
                Target { id, name }
            })
            .collect()
    }
}

/// Run the dashboard until the user quits. Sets up the terminal, feeds the
/// event loop from its producers and restores the terminal on exit.
pub fn run(config: Config) -> Result<(), DashError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .build()
        .map_err(DashError::Runtime)?;

    let engine = DockerEngine::connect(config.host.as_deref())?;

    if config.once {
        let service = SnapshotService::new(engine, config.include_stopped);
        let snapshot = runtime.block_on(service.refresh(Snapshot::default()));
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let (tx, rx) = mpsc::channel();
    let mut app = App::new(engine, runtime.handle().clone(), tx.clone(), &config);

    let terminal_guard = TerminalGuard::enter()?;
    let (width, height) = terminal::size().map_err(DashError::TerminalInit)?;
    app.resize(width, height);
    info!(width, height, interval_ms = config.interval.as_millis() as u64, "dashboard started");

    app.refresh();
    event_loop::spawn_ticker(tx.clone(), config.interval, app.tick_flag());
    event_loop::spawn_input_reader(tx.clone());
    #[cfg(unix)]
    let resize_signals = event_loop::spawn_resize_listener(tx).map_err(DashError::TerminalInit)?;

    let mut out = io::stdout();
    app.layout();
    app.draw(&mut out)?;

    while let Ok(event) = rx.recv() {
        if app.handle_event(event) == Flow::Quit {
            break;
        }
        app.layout();
        app.draw(&mut out)?;
    }

    #[cfg(unix)]
    resize_signals.close();
    drop(terminal_guard);
    // In-flight lifecycle commands are abandoned, not awaited.
    runtime.shutdown_background();
    info!("dashboard stopped");
    Ok(())
}
