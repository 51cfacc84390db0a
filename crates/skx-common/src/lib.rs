//! SKX Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared domain types, error handling and logging for the SKX workspace.
//!
//! # Overview
//!
//! - **Types**: document types, date ranges, sources and raw records
//! - **Error Handling**: [`SkxError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```no_run
//! use skx_common::types::{DateRange, DocumentType};
//!
//! fn describe(kind: &str, from: &str, to: &str) -> skx_common::Result<String> {
//!     let document_type: DocumentType = kind.parse()?;
//!     let range = DateRange::parse(from, to)?;
//!     Ok(format!("{} for {}", document_type.label(), range))
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{Result, SkxError};
