// Discussion comments. Append-only, peripheral to the voting/ranking core.

use uuid::Uuid;

use civic_common::error::{CivicError, Result};
use civic_common::types::{Comment, NewComment};

use crate::complaints::{not_found_on_fk, ComplaintStore};

impl ComplaintStore {
    /// Append a comment to a complaint's discussion list.
    pub async fn add_comment(&self, new: NewComment) -> Result<Comment> {
        if new.content.trim().is_empty() {
            return Err(CivicError::Validation(
                "comment content must not be empty".to_string(),
            ));
        }
        if new.user_id.is_nil() {
            return Err(CivicError::Validation("user_id is required".to_string()));
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO complaint_comments (id, complaint_id, user_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.complaint_id)
        .bind(new.user_id)
        .bind(&new.content)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found_on_fk)?;

        Ok(comment)
    }

    /// A complaint's comments, newest first.
    pub async fn comments_for(&self, complaint_id: Uuid) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM complaint_comments
            WHERE complaint_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(complaint_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
