use std::fmt;
use std::future::Future;

use bollard::Docker;
use bollard::container::{
    KillContainerOptions, ListContainersOptions, RemoveContainerOptions, StopContainerOptions,
    TopOptions,
};
use bollard::models::ContainerSummary;
use thiserror::Error;
use tracing::{debug, warn};

/// `ps` columns requested from `docker top`.
const TOP_PS_ARGS: &str = "-o pid,etime,pcpu,pmem,args";

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("container engine unavailable: {0}")]
    Unavailable(String),
    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// One container as listed by the engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineContainer {
    pub id: String,
    pub command: String,
    pub image: String,
    pub name: String,
    pub created_at: i64, // unix seconds
    pub status: String,
}

/// One process row from `docker top`. Numeric fields stay as reported.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineProcess {
    pub pid: String,
    pub elapsed: String,
    pub cpu_percent: String,
    pub mem_percent: String,
    pub command: String,
}

/// Container lifecycle verbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Start,
    Stop,
    Pause,
    Unpause,
    Kill,
    Remove,
}

impl Lifecycle {
    pub fn past_tense(self) -> &'static str {
        match self {
            Lifecycle::Start => "Started",
            Lifecycle::Stop => "Stopped",
            Lifecycle::Pause => "Paused",
            Lifecycle::Unpause => "Unpaused",
            Lifecycle::Kill => "Killed",
            Lifecycle::Remove => "Removed",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Lifecycle::Start => "start",
            Lifecycle::Stop => "stop",
            Lifecycle::Pause => "pause",
            Lifecycle::Unpause => "unpause",
            Lifecycle::Kill => "kill",
            Lifecycle::Remove => "remove",
        };
        f.write_str(verb)
    }
}

/// The container engine as seen by the dashboard.
pub trait Engine: Send + Sync {
    fn list_containers(
        &self,
        include_stopped: bool,
    ) -> impl Future<Output = Result<Vec<EngineContainer>, EngineError>> + Send;

    fn list_processes(
        &self,
        container_id: &str,
    ) -> impl Future<Output = Result<Vec<EngineProcess>, EngineError>> + Send;

    fn apply(
        &self,
        action: Lifecycle,
        container_id: &str,
    ) -> impl Future<Output = Result<(), EngineError>> + Send;
}

/// Engine backed by bollard's Docker client.
#[derive(Clone)]
pub struct DockerEngine {
    client: Docker,
}

impl DockerEngine {
    /// Connect to `host` or, when `None`, to the local defaults (`DOCKER_HOST`,
    /// then the platform socket). See [`Endpoint::parse`] for accepted forms.
    pub fn connect(host: Option<&str>) -> Result<Self, EngineError> {
        let client = match host.map(Endpoint::parse).transpose()? {
            Some(Endpoint::Http(addr)) => {
                Docker::connect_with_http(&addr, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            #[cfg(unix)]
            Some(Endpoint::Unix(path)) => {
                Docker::connect_with_unix(&path, CLIENT_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            #[cfg(not(unix))]
            Some(Endpoint::Unix(path)) => {
                return Err(EngineError::Unavailable(format!(
                    "unix sockets are not available on this platform: {path}"
                )));
            }
            None => Docker::connect_with_local_defaults(),
        }
        .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

/// Request timeout handed to the bollard client.
const CLIENT_TIMEOUT_SECS: u64 = 120;

/// Transport for an explicit daemon address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Socket path, without the `unix://` scheme.
    Unix(String),
    /// `http://host:port`.
    Http(String),
}

impl Endpoint {
    /// Accepts `unix:///path`, a bare `/path`, `tcp://host:port`,
    /// `http://host:port` and a bare `host:port`.
    pub fn parse(host: &str) -> Result<Self, EngineError> {
        let host = host.trim();
        if let Some(path) = host.strip_prefix("unix://") {
            return Ok(Endpoint::Unix(path.to_string()));
        }
        if host.starts_with('/') {
            return Ok(Endpoint::Unix(host.to_string()));
        }
        if let Some(rest) = host.strip_prefix("tcp://") {
            return Ok(Endpoint::Http(format!("http://{rest}")));
        }
        if host.starts_with("http://") {
            return Ok(Endpoint::Http(host.to_string()));
        }
        if host.is_empty() || host.contains("://") {
            return Err(EngineError::Unavailable(format!("unsupported docker host: {host:?}")));
        }
        Ok(Endpoint::Http(format!("http://{host}")))
    }
}

impl Engine for DockerEngine {
    async fn list_containers(
        &self,
        include_stopped: bool,
    ) -> Result<Vec<EngineContainer>, EngineError> {
        let options: ListContainersOptions<String> = ListContainersOptions {
            all: include_stopped,
            ..Default::default()
        };

        let summaries = self
            .client
            .list_containers(Some(options))
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        let mut containers = Vec::with_capacity(summaries.len());
        for s in &summaries {
            match container_from_summary(s) {
                Ok(c) => containers.push(c),
                Err(e) => warn!("skipping container: {}", e),
            }
        }
        Ok(containers)
    }

    async fn list_processes(&self, container_id: &str) -> Result<Vec<EngineProcess>, EngineError> {
        let options = TopOptions {
            ps_args: TOP_PS_ARGS,
        };
        let top = self
            .client
            .top_processes(container_id, Some(options))
            .await
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;

        processes_from_top(
            &top.titles.unwrap_or_default(),
            top.processes.unwrap_or_default(),
        )
    }

    async fn apply(&self, action: Lifecycle, container_id: &str) -> Result<(), EngineError> {
        debug!(%action, container_id, "sending lifecycle command");
        let result = match action {
            Lifecycle::Start => self.client.start_container::<String>(container_id, None).await,
            Lifecycle::Stop => {
                let options = StopContainerOptions { t: 10 };
                self.client.stop_container(container_id, Some(options)).await
            }
            Lifecycle::Pause => self.client.pause_container(container_id).await,
            Lifecycle::Unpause => self.client.unpause_container(container_id).await,
            Lifecycle::Kill => {
                let options = KillContainerOptions { signal: "SIGKILL" };
                self.client.kill_container(container_id, Some(options)).await
            }
            Lifecycle::Remove => {
                let options = RemoveContainerOptions::default();
                self.client.remove_container(container_id, Some(options)).await
            }
        };
        result.map_err(|e| EngineError::Unavailable(e.to_string()))
    }
}

// --- Free helper functions ---

fn container_from_summary(s: &ContainerSummary) -> Result<EngineContainer, EngineError> {
    let id = s
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| EngineError::MalformedRecord("container without id".to_string()))?;

    let name = s
        .names
        .as_ref()
        .and_then(|n| n.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_else(|| crate::model::short_id(&id).to_string());

    // `state` is the short form ("running"); `status` is the sentence ("Up 2 hours").
    let status = s
        .state
        .clone()
        .filter(|st| !st.is_empty())
        .or_else(|| s.status.clone())
        .unwrap_or_default();

    Ok(EngineContainer {
        id,
        command: s.command.clone().unwrap_or_default(),
        image: s.image.clone().unwrap_or_default(),
        name,
        created_at: s.created.unwrap_or(0),
        status,
    })
}

/// Map a `docker top` table to process rows by column title. Rows missing the
/// PID cell are skipped.
fn processes_from_top(
    titles: &[String],
    rows: Vec<Vec<String>>,
) -> Result<Vec<EngineProcess>, EngineError> {
    let column = |names: &[&str]| titles.iter().position(|t| names.contains(&t.as_str()));

    let pid_col = column(&["PID"])
        .ok_or_else(|| EngineError::MalformedRecord("top output has no PID column".to_string()))?;
    let elapsed_col = column(&["ELAPSED", "TIME"]);
    let cpu_col = column(&["%CPU", "C"]);
    let mem_col = column(&["%MEM"]);
    let cmd_col = column(&["COMMAND", "CMD"]);

    let mut processes = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(pid) = row.get(pid_col).filter(|p| !p.is_empty()) else {
            warn!("skipping process row without pid: {:?}", row);
            continue;
        };
        let cell = |col: Option<usize>| {
            col.and_then(|i| row.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        processes.push(EngineProcess {
            pid: pid.clone(),
            elapsed: cell(elapsed_col),
            cpu_percent: cell(cpu_col),
            mem_percent: cell(mem_col),
            command: cell(cmd_col),
        });
    }
    Ok(processes)
}
