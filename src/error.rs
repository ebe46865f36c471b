use std::io;

use thiserror::Error;

use crate::engine::EngineError;

/// Errors that end the program. Poll and action failures never get here.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to set up logging: {0}")]
    Logging(String),
}
