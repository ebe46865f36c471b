//! End-to-end checks across the public modules: an in-memory engine feeds the
//! snapshot service, whose output is flattened, windowed and drawn.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use dockpot::cursor::{clamp, Cursor};
use dockpot::engine::{Engine, EngineContainer, EngineError, EngineProcess, Lifecycle};
use dockpot::model::{HostInfo, Snapshot, SortKey, ViewState};
use dockpot::snapshot::SnapshotService;
use dockpot::view::{pad, Presenter};
use dockpot::viewmodel::flatten;

#[derive(Clone, Default)]
struct MemoryEngine {
    containers: Arc<Mutex<Option<Vec<EngineContainer>>>>,
    processes: Arc<Mutex<HashMap<String, Vec<EngineProcess>>>>,
}

impl MemoryEngine {
    fn with(containers: Vec<EngineContainer>) -> Self {
        let engine = Self::default();
        engine.replace(containers);
        engine
    }

    fn replace(&self, containers: Vec<EngineContainer>) {
        *self.containers.lock().unwrap() = Some(containers);
    }

    fn go_down(&self) {
        *self.containers.lock().unwrap() = None;
    }

    fn top(&self, id: &str, rows: &[(&str, &str, &str)]) {
        let procs = rows
            .iter()
            .map(|(pid, cpu, mem)| EngineProcess {
                pid: pid.to_string(),
                elapsed: "01:00".into(),
                cpu_percent: cpu.to_string(),
                mem_percent: mem.to_string(),
                command: format!("proc-{pid}"),
            })
            .collect();
        self.processes.lock().unwrap().insert(id.to_string(), procs);
    }
}

impl Engine for MemoryEngine {
    async fn list_containers(&self, _include_stopped: bool) -> Result<Vec<EngineContainer>, EngineError> {
        self.containers
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| EngineError::Unavailable("daemon stopped".into()))
    }

    async fn list_processes(&self, container_id: &str) -> Result<Vec<EngineProcess>, EngineError> {
        Ok(self
            .processes
            .lock()
            .unwrap()
            .get(container_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn apply(&self, _action: Lifecycle, _container_id: &str) -> Result<(), EngineError> {
        Ok(())
    }
}

fn container(id: &str, name: &str) -> EngineContainer {
    EngineContainer {
        id: id.into(),
        name: name.into(),
        image: format!("{name}:1"),
        command: "entrypoint.sh".into(),
        created_at: 0,
        status: "running".into(),
    }
}

fn refresh(service: &SnapshotService<MemoryEngine>, previous: Snapshot) -> Snapshot {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(service.refresh(previous))
}

#[test]
fn rows_sort_by_name_with_summed_cpu() {
    let engine = MemoryEngine::with(vec![container("c1", "web"), container("c2", "db")]);
    engine.top("c1", &[("1", "10.0", "1.0"), ("2", "2.3", "0.5")]);
    let service = SnapshotService::new(engine, true);
    let snapshot = refresh(&service, Snapshot::default());

    assert_eq!(snapshot.get("c1").unwrap().common.cpu, "12.3");
    let rows = flatten(&snapshot, SortKey::Name, false, false, 100);
    let ids: Vec<&str> = rows.iter().map(|r| r.container_id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
}

#[test]
fn moving_past_the_window_scrolls_by_one() {
    let mut cursor = Cursor { active: 4, offset: 0 };
    cursor.move_down(10, 5);
    assert_eq!(cursor, Cursor { active: 5, offset: 1 });
    assert_eq!(clamp(5, 1, 10, 5), (5, 1));
}

#[test]
fn selection_survives_reorder_and_new_containers_start_clear() {
    let engine = MemoryEngine::with(vec![container("c1", "web")]);
    let service = SnapshotService::new(engine.clone(), true);
    let mut first = refresh(&service, Snapshot::default());
    first.get_mut("c1").unwrap().selected = true;

    engine.replace(vec![container("c2", "db"), container("c1", "web")]);
    let second = refresh(&service, first);
    assert_eq!(second.containers[1].id(), "c1");
    assert!(second.get("c1").unwrap().selected);
    assert!(!second.get("c2").unwrap().selected);
}

#[test]
fn failed_listing_returns_previous_snapshot() {
    let engine = MemoryEngine::with(vec![container("c1", "web"), container("c2", "db")]);
    let service = SnapshotService::new(engine.clone(), true);
    let mut previous = refresh(&service, Snapshot::default());
    previous.get_mut("c2").unwrap().expanded = true;

    engine.go_down();
    let next = refresh(&service, previous.clone());
    assert_eq!(next, previous);
}

#[test]
fn table_frame_renders_visible_window() {
    let names: Vec<String> = (0..12).map(|i| format!("svc-{i:02}")).collect();
    let engine = MemoryEngine::with(
        names
            .iter()
            .enumerate()
            .map(|(i, n)| container(&format!("id{i:02}"), n))
            .collect(),
    );
    let service = SnapshotService::new(engine, true);
    let snapshot = refresh(&service, Snapshot::default());

    let mut view = ViewState {
        width: 100,
        height: 8,
        ..Default::default()
    };
    let rows = flatten(&snapshot, view.sort_key, view.sort_reversed, false, 100);
    view.cursor.active = 7;
    view.cursor.clamp(rows.len(), view.table_height());

    let mut buf = Vec::new();
    Presenter::render_header(&mut buf, &HostInfo::default(), &snapshot, &view).unwrap();
    Presenter::render_table(&mut buf, &rows, &view).unwrap();
    let frame = String::from_utf8(buf).unwrap();

    assert!(frame.contains("12 containers, 0 selected"));
    assert!(frame.contains("svc-07"));
    assert!(frame.contains("svc-03"));
    assert!(!frame.contains("svc-02"));
    assert!(!frame.contains("svc-08"));
}

#[test]
fn containers_without_processes_show_plain_zero() {
    let engine = MemoryEngine::with(vec![container("c1", "stopped")]);
    let service = SnapshotService::new(engine, true);
    let snapshot = refresh(&service, Snapshot::default());
    let record = snapshot.get("c1").unwrap();
    assert_eq!(record.common.cpu, "0.0");
    assert_eq!(record.common.ram, "0.0");
}

#[test]
fn pad_is_char_aware() {
    assert_eq!(pad("naïve", 4, "", ""), "naïv");
    assert_eq!(pad("db", 4, "", ""), "db  ");
}
