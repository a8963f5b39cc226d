// Vote ledger: at most one upvote and at most one downvote per
// (complaint, user). Votes are permanent; there is no retraction path.

use sqlx::PgPool;
use uuid::Uuid;

use civic_common::error::{CivicError, Result};
use civic_common::types::VotePolarity;

use crate::complaints::{not_found_on_fk, ComplaintStore};

/// Uniqueness-enforcing record of who has up/downvoted which complaint.
/// Dedup lives in the database: the vote tables key on
/// (complaint_id, user_id), so two racing votes from the same user cannot
/// both land.
#[derive(Clone)]
pub struct VoteLedger {
    pool: PgPool,
}

impl VoteLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an upvote and bump the aggregate counter in one transaction.
    /// A repeat vote fails with `DuplicateVote` and changes no counter.
    pub async fn cast_upvote(&self, complaint_id: Uuid, user_id: Uuid) -> Result<()> {
        self.cast(complaint_id, user_id, VotePolarity::Up).await
    }

    /// Record a downvote and bump the aggregate counter in one transaction.
    /// A repeat vote fails with `DuplicateVote` and changes no counter.
    pub async fn cast_downvote(&self, complaint_id: Uuid, user_id: Uuid) -> Result<()> {
        self.cast(complaint_id, user_id, VotePolarity::Down).await
    }

    async fn cast(&self, complaint_id: Uuid, user_id: Uuid, polarity: VotePolarity) -> Result<()> {
        if user_id.is_nil() {
            return Err(CivicError::Validation("user_id is required".to_string()));
        }

        let (table, already) = match polarity {
            VotePolarity::Up => ("complaint_upvotes", "already upvoted"),
            VotePolarity::Down => ("complaint_downvotes", "already downvoted"),
        };
        let sql = format!("INSERT INTO {table} (complaint_id, user_id) VALUES ($1, $2)");

        let mut tx = self.pool.begin().await?;

        sqlx::query(&sql)
            .bind(complaint_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| classify_vote_error(e, already))?;

        ComplaintStore::adjust_vote_count(&mut tx, complaint_id, polarity, 1).await?;

        tx.commit().await?;
        Ok(())
    }
}

fn classify_vote_error(e: sqlx::Error, already: &str) -> CivicError {
    if let sqlx::Error::Database(ref db) = e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return CivicError::DuplicateVote(already.to_string());
        }
    }
    not_found_on_fk(e)
}
