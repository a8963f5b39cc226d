use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CivicError, Result};
use crate::geo;

// --- Enums ---

/// Lifecycle state of a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::InProgress => "in_progress",
            ComplaintStatus::Resolved => "resolved",
            ComplaintStatus::Rejected => "rejected",
        }
    }

    /// Status after a remediation action with the given completion
    /// percentage. Full completion resolves; a partial completion marks an
    /// unresolved complaint in progress but never demotes a resolved one;
    /// zero leaves the status untouched.
    pub fn after_completion(self, percent: i32) -> Self {
        if percent >= 100 {
            ComplaintStatus::Resolved
        } else if percent > 0 && self != ComplaintStatus::Resolved {
            ComplaintStatus::InProgress
        } else {
            self
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown complaint status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for ComplaintStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> std::result::Result<Self, UnknownStatus> {
        match s {
            "pending" => Ok(ComplaintStatus::Pending),
            "in_progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            "rejected" => Ok(ComplaintStatus::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Which aggregate counter a vote touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePolarity {
    Up,
    Down,
}

// --- Complaint ---

/// A citizen-filed, geo-tagged complaint against a government department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    pub id: Uuid,
    pub government_id: Uuid,
    pub department_id: Option<Uuid>,
    pub user_id: Uuid,
    pub category: String,
    pub description: String,
    pub media_urls: Vec<String>,
    pub status: ComplaintStatus,
    pub upvotes: i32,
    pub downvotes: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manual_location: Option<String>,
    pub version: i32,
    /// Opaque payload written by the external analysis worker.
    pub analysis: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complaint {
    /// Ranking value: upvotes minus twice downvotes. Downvotes weigh double
    /// to push unpopular and duplicate reports down the list.
    pub fn priority_score(&self) -> i32 {
        self.upvotes - 2 * self.downvotes
    }

    /// Both coordinates, or None when the complaint carries no usable location.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Creation input. Required fields default to empty/nil so that missing
/// values surface as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComplaint {
    #[serde(default = "Uuid::nil")]
    pub government_id: Uuid,
    pub department_id: Option<Uuid>,
    #[serde(default = "Uuid::nil")]
    pub user_id: Uuid,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub manual_location: Option<String>,
}

impl NewComplaint {
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(CivicError::Validation("category must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(CivicError::Validation("description must not be empty".into()));
        }
        if self.government_id.is_nil() {
            return Err(CivicError::Validation("government_id is required".into()));
        }
        if self.user_id.is_nil() {
            return Err(CivicError::Validation("user_id is required".into()));
        }
        match (self.latitude, self.longitude) {
            (None, None) => {}
            (Some(lat), Some(lng)) => geo::validate_coordinates(lat, lng)?,
            _ => {
                return Err(CivicError::Validation(
                    "latitude and longitude must be provided together".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Partial update. Each field's presence is distinct from its emptiness:
/// `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplaintUpdate {
    pub description: Option<String>,
    pub media_urls: Option<Vec<String>>,
    pub status: Option<ComplaintStatus>,
}

// --- Action ---

/// A government-side remediation record with a completion percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub government_id: Uuid,
    pub admin_id: Uuid,
    pub details: String,
    pub media_urls: Vec<String>,
    pub completion_percent: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAction {
    #[serde(default = "Uuid::nil")]
    pub government_id: Uuid,
    #[serde(default = "Uuid::nil")]
    pub admin_id: Uuid,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub completion_percent: i32,
}

// --- Comment ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub complaint_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    #[serde(default = "Uuid::nil")]
    pub complaint_id: Uuid,
    #[serde(default = "Uuid::nil")]
    pub user_id: Uuid,
    #[serde(default)]
    pub content: String,
}

// --- sqlx row decoding ---

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for Complaint {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        use sqlx::Row;

        let status: String = row.try_get("status")?;
        let status = status
            .parse::<ComplaintStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;
        let media_urls: sqlx::types::Json<Vec<String>> = row.try_get("media_urls")?;

        Ok(Complaint {
            id: row.try_get("id")?,
            government_id: row.try_get("government_id")?,
            department_id: row.try_get("department_id")?,
            user_id: row.try_get("user_id")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            media_urls: media_urls.0,
            status,
            upvotes: row.try_get("upvotes")?,
            downvotes: row.try_get("downvotes")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            manual_location: row.try_get("manual_location")?,
            version: row.try_get("version")?,
            analysis: row.try_get("analysis")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for Action {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        use sqlx::Row;

        let media_urls: sqlx::types::Json<Vec<String>> = row.try_get("media_urls")?;

        Ok(Action {
            id: row.try_get("id")?,
            complaint_id: row.try_get("complaint_id")?,
            government_id: row.try_get("government_id")?,
            admin_id: row.try_get("admin_id")?,
            details: row.try_get("details")?,
            media_urls: media_urls.0,
            completion_percent: row.try_get("completion_percent")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
