//! Backend integration for the history API
//!
//! This module provides the gateway traits the orchestrators depend on and a REST client
//! implementing them. Long-running queries are scheduled as backend tasks and return a
//! task handle instead of data.

/// Gateway traits consumed by the orchestrators
mod api;
/// REST client for the backend HTTP API
mod client;
/// Type definitions for backend data structures
mod types;

pub use api::{HistoryGateway, TaskQuery, TaskStatus};
pub use client::RestGateway;
pub use types::*;
