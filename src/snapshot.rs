//! Container snapshot collection and UI-state reconciliation.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::engine::{Engine, EngineContainer, EngineError, EngineProcess};
use crate::model::{CommonFields, ContainerRecord, ProcessRecord, Snapshot};
use crate::view::format_duration;

/// Builds a fresh [`Snapshot`] from the engine each poll cycle.
pub struct SnapshotService<E> {
    engine: E,
    include_stopped: bool,
    /// Upper bound for each engine call made during a refresh.
    timeout: Duration,
}

/// Default per-call bound; a hung daemon must not hold the event loop.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(5);

impl<E: Engine> SnapshotService<E> {
    pub fn new(engine: E, include_stopped: bool) -> Self {
        Self {
            engine,
            include_stopped,
            timeout: POLL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Poll the engine and carry `selected`/`expanded` over from `previous`.
    ///
    /// If the container listing fails or times out, `previous` is returned
    /// untouched. A failed process listing only empties that container's
    /// process list. Must run inside a runtime with timers enabled.
    pub async fn refresh(&self, previous: Snapshot) -> Snapshot {
        let listing = self.bounded(self.engine.list_containers(self.include_stopped));
        let containers = match listing.await {
            Ok(c) => c,
            Err(e) => {
                warn!("refresh failed, keeping stale snapshot: {}", e);
                return previous;
            }
        };

        let containers = dedup_by_id(containers);
        let process_lists = join_all(
            containers
                .iter()
                .map(|c| self.bounded(self.engine.list_processes(&c.id))),
        )
        .await;

        let now = chrono::Utc::now().timestamp();
        let mut records = Vec::with_capacity(containers.len());
        for (container, processes) in containers.into_iter().zip(process_lists) {
            let processes = processes.unwrap_or_else(|e| {
                debug!(container = %container.id, "no process list: {}", e);
                Vec::new()
            });
            records.push(build_record(container, processes, now));
        }

        let mut next = Snapshot::new(records);
        reconcile(&previous, &mut next);
        debug!(containers = next.len(), "snapshot refreshed");
        next
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        timeout(self.timeout, call).await.map_err(|_| {
            EngineError::Unavailable(format!("no answer within {:?}", self.timeout))
        })?
    }
}

/// Copy `selected` and `expanded` from `previous` for every id present in both.
/// Ids new to `next` keep the defaults (unselected, collapsed).
pub fn reconcile(previous: &Snapshot, next: &mut Snapshot) {
    let flags: HashMap<&str, (bool, bool)> = previous
        .containers
        .iter()
        .map(|c| (c.id(), (c.selected, c.expanded)))
        .collect();

    for c in &mut next.containers {
        let (selected, expanded) = flags.get(c.id()).copied().unwrap_or((false, false));
        c.selected = selected;
        c.expanded = expanded;
    }
}

/// Parse a numeric ps field. Anything unparseable counts as zero.
pub fn parse_usage(field: &str) -> f64 {
    field
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn build_record(container: EngineContainer, processes: Vec<EngineProcess>, now: i64) -> ContainerRecord {
    // Fold from +0.0: `Sum for f64` starts at -0.0, which would print as "-0.0".
    let cpu_total = processes
        .iter()
        .fold(0.0, |acc, p| acc + parse_usage(&p.cpu_percent));
    let ram_total = processes
        .iter()
        .fold(0.0, |acc, p| acc + parse_usage(&p.mem_percent));

    let uptime_secs = if container.created_at > 0 {
        (now - container.created_at).max(0) as u64
    } else {
        0
    };
    let uptime = if container.created_at > 0 {
        format_duration(uptime_secs)
    } else {
        "unknown".to_string()
    };

    let processes = processes
        .into_iter()
        .map(|p| ProcessRecord {
            common: CommonFields {
                id: p.pid,
                command: p.command,
                uptime: p.elapsed,
                status: String::new(),
                cpu: p.cpu_percent,
                ram: p.mem_percent,
            },
        })
        .collect();

    ContainerRecord {
        name: container.name,
        image: container.image,
        common: CommonFields {
            id: container.id,
            command: container.command,
            uptime,
            status: container.status,
            cpu: format!("{:.1}", cpu_total),
            ram: format!("{:.1}", ram_total),
        },
        selected: false,
        expanded: false,
        processes,
        uptime_secs,
        cpu_total,
        ram_total,
    }
}

fn dedup_by_id(containers: Vec<EngineContainer>) -> Vec<EngineContainer> {
    let mut seen = HashSet::new();
    containers
        .into_iter()
        .filter(|c| {
            let fresh = seen.insert(c.id.clone());
            if !fresh {
                warn!("duplicate container id {} in listing", c.id);
            }
            fresh
        })
        .collect()
}
