// Append-only remediation actions. Completion percentages drive the
// complaint status machine.

use sqlx::PgPool;
use uuid::Uuid;

use civic_common::error::{CivicError, Result};
use civic_common::types::{Action, NewAction};

use crate::complaints::{not_found_on_fk, ComplaintStore};

/// Append-only record of government remediation steps on a complaint.
/// Actions are never mutated or deleted once written.
#[derive(Clone)]
pub struct ActionLedger {
    pool: PgPool,
    complaints: ComplaintStore,
}

impl ActionLedger {
    pub fn new(pool: PgPool, complaints: ComplaintStore) -> Self {
        Self { pool, complaints }
    }

    /// Append an action, then apply its completion percentage to the
    /// complaint status. Out-of-range percentages are rejected before
    /// anything is written.
    pub async fn append(&self, complaint_id: Uuid, new: NewAction) -> Result<Action> {
        if !(0..=100).contains(&new.completion_percent) {
            return Err(CivicError::Validation(format!(
                "completion_percent must be between 0 and 100, got {}",
                new.completion_percent
            )));
        }
        if new.details.trim().is_empty() {
            return Err(CivicError::Validation(
                "action details must not be empty".to_string(),
            ));
        }
        if new.government_id.is_nil() || new.admin_id.is_nil() {
            return Err(CivicError::Validation(
                "government_id and admin_id are required".to_string(),
            ));
        }

        let action = sqlx::query_as::<_, Action>(
            r#"
            INSERT INTO complaint_actions
                (id, complaint_id, government_id, admin_id, details, media_urls,
                 completion_percent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(complaint_id)
        .bind(new.government_id)
        .bind(new.admin_id)
        .bind(&new.details)
        .bind(sqlx::types::Json(&new.media_urls))
        .bind(new.completion_percent)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_on_fk)?;

        self.complaints
            .apply_action_completion(complaint_id, action.completion_percent)
            .await?;

        Ok(action)
    }

    /// A complaint's actions, newest first.
    pub async fn for_complaint(&self, complaint_id: Uuid) -> Result<Vec<Action>> {
        let actions = sqlx::query_as::<_, Action>(
            r#"
            SELECT * FROM complaint_actions
            WHERE complaint_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(actions)
    }
}
