use std::fmt;
use std::sync::mpsc::Sender;

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::engine::{Engine, EngineError, Lifecycle};
use crate::model::short_id;

/// A container an action is aimed at. The name is only for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub name: String,
}

/// Result of one detached lifecycle command.
#[derive(Debug)]
pub struct ActionOutcome {
    pub action: Lifecycle,
    pub target: Target,
    pub result: Result<(), EngineError>,
}

impl ActionOutcome {
    /// Container name, or the short id when the engine gave no name.
    fn label(&self) -> &str {
        if self.target.name.is_empty() {
            short_id(&self.target.id)
        } else {
            &self.target.name
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "{} {}", self.action.past_tense(), self.label()),
            Err(e) => write!(f, "Error: {} {}: {}", self.action, self.label(), e),
        }
    }
}

/// Fires lifecycle commands on the runtime without waiting for them.
///
/// Each target gets its own task. Outcomes are reported on `outcomes` (converted
/// into the receiver's event type) and never touch the snapshot.
pub struct ActionDispatcher<E, T> {
    engine: E,
    handle: Handle,
    outcomes: Sender<T>,
}

impl<E, T> ActionDispatcher<E, T>
where
    E: Engine + Clone + 'static,
    T: From<ActionOutcome> + Send + 'static,
{
    pub fn new(engine: E, handle: Handle, outcomes: Sender<T>) -> Self {
        Self {
            engine,
            handle,
            outcomes,
        }
    }

    /// Spawn `action` once per target and return immediately.
    pub fn apply(&self, action: Lifecycle, targets: &[Target]) {
        for target in targets {
            let engine = self.engine.clone();
            let tx = self.outcomes.clone();
            let target = target.clone();
            info!(%action, container = %target.id, "dispatching");
            self.handle.spawn(async move {
                let result = engine.apply(action, &target.id).await;
                if let Err(ref e) = result {
                    warn!(%action, container = %target.id, "lifecycle command failed: {}", e);
                }
                // The loop may already be gone.
                let _ = tx.send(T::from(ActionOutcome {
                    action,
                    target,
                    result,
                }));
            });
        }
    }
}
