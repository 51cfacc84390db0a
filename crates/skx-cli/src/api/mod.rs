//! API client module
//!
//! HTTP client for the remote document service.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::{ApiClient, DataClient};
pub use types::*;
