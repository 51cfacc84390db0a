//! Aggregation pipeline
//!
//! Branch enumeration, page collection, progress and the session tying them together.

pub mod collector;
pub mod events;
pub mod progress;
pub mod session;
pub mod sources;

pub use collector::{collect_all, Collected, PageProgress, StopReason};
pub use events::{EventSink, SessionEvent, Severity};
pub use progress::ProgressTracker;
pub use session::{AggregationSession, SessionRequest, SessionState, SessionSummary};
pub use sources::resolve_sources;
