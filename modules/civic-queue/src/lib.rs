//! Outbound analysis-request queue backed by Postgres.
//!
//! Complaint creation appends a request here for the external AI worker;
//! a `pg_notify` nudge wakes listeners, but delivery is pull-based by
//! sequence number. This service only produces — the consumer lives outside
//! this codebase.

pub mod queue;
pub mod types;

pub use queue::{AnalysisQueue, CHANNEL};
pub use types::{AnalysisRequest, QueuedRequest};
