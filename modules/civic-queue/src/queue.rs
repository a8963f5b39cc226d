//! AnalysisQueue — append-only work queue for complaint analysis.

use anyhow::Result;
use sqlx::PgPool;
use tracing::warn;

use crate::types::{AnalysisRequest, QueuedRequest};

/// Notification channel fired after each append.
pub const CHANNEL: &str = "complaint_analysis";

/// Publishes complaint-created analysis requests. Best-effort by contract:
/// a failed publish is logged and never fails the creation it follows.
#[derive(Clone)]
pub struct AnalysisQueue {
    pool: PgPool,
}

impl AnalysisQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enqueue an analysis request. Logs a warning on failure rather than
    /// propagating: analysis is best-effort and the complaint is already
    /// committed.
    pub async fn publish(&self, request: &AnalysisRequest) -> Option<i64> {
        let payload = match serde_json::to_value(request) {
            Ok(v) => v,
            Err(e) => {
                warn!(complaint_id = %request.complaint_id, error = %e,
                    "Failed to serialize analysis request");
                return None;
            }
        };

        let result = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO analysis_requests (complaint_id, payload)
            VALUES ($1, $2)
            RETURNING seq
            "#,
        )
        .bind(request.complaint_id)
        .bind(&payload)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(seq) => {
                self.notify(seq).await;
                Some(seq)
            }
            Err(e) => {
                warn!(complaint_id = %request.complaint_id, error = %e,
                    "Failed to enqueue analysis request");
                None
            }
        }
    }

    /// Read queued requests in sequence order starting at `seq_start`
    /// (inclusive). The consumer tracks its own cursor.
    pub async fn read_from(&self, seq_start: i64, limit: usize) -> Result<Vec<QueuedRequest>> {
        let rows = sqlx::query_as::<_, QueuedRequest>(
            r#"
            SELECT seq, complaint_id, payload, enqueued_at
            FROM analysis_requests
            WHERE seq >= $1
            ORDER BY seq ASC
            LIMIT $2
            "#,
        )
        .bind(seq_start)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Best-effort PG NOTIFY — a nudge, not a delivery guarantee.
    async fn notify(&self, seq: i64) {
        let result = sqlx::query("SELECT pg_notify($1, $2::text)")
            .bind(CHANNEL)
            .bind(seq)
            .execute(&self.pool)
            .await;

        if let Err(e) = result {
            warn!(error = %e, seq, "PG NOTIFY failed (non-fatal)");
        }
    }
}
