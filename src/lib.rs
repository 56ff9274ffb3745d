//! Library entrypoint for gridiron-hub.
//!
//! Exposes all modules so integration tests can import them.

pub mod config;
pub mod dashboard;
pub mod models;
pub mod predict;
pub mod provider;
pub mod sources;
pub mod synthetic;
