//! Message shapes for the analysis pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use civic_common::types::Complaint;

/// Payload handed to the external analysis worker for a new complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub complaint_id: Uuid,
    pub description: String,
    pub category: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub government_id: Uuid,
}

impl From<&Complaint> for AnalysisRequest {
    fn from(c: &Complaint) -> Self {
        Self {
            complaint_id: c.id,
            description: c.description.clone(),
            category: c.category.clone(),
            latitude: c.latitude,
            longitude: c.longitude,
            government_id: c.government_id,
        }
    }
}

/// A queued request as stored in Postgres. The queue assigns seq and
/// enqueued_at.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QueuedRequest {
    pub seq: i64,
    pub complaint_id: Uuid,
    pub payload: serde_json::Value,
    pub enqueued_at: DateTime<Utc>,
}
