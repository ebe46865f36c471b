//! dockpot: an interactive terminal dashboard for Docker containers.
//!
//! The engine is polled on a timer into a [`model::Snapshot`]; the snapshot is
//! flattened and sorted into rows by [`viewmodel`], drawn by [`view`], and
//! driven by the event loop in [`app`]. Lifecycle commands go out through
//! [`dispatcher`] without blocking the loop.

pub mod app;
pub mod config;
pub mod cursor;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod snapshot;
pub mod view;
pub mod viewmodel;
