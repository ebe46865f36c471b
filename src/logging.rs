use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::DashError;

fn default_directive(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    format!("dockpot={level}")
}

/// Route tracing output to `log_file`. Without a file nothing is installed,
/// since stdout and stderr belong to the dashboard. `RUST_LOG` overrides the
/// level picked by `verbose`. Keep the guard alive to flush on exit.
pub fn init(log_file: Option<&Path>, verbose: u8) -> Result<Option<WorkerGuard>, DashError> {
    let Some(path) = log_file else {
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| DashError::Logging(format!("not a file path: {}", path.display())))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| DashError::Logging(e.to_string()))?;
    Ok(Some(guard))
}
