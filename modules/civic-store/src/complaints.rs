// Complaint rows: creation, partial updates, counters, status transitions,
// and ranked retrieval.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use civic_common::error::{CivicError, Result};
use civic_common::geo;
use civic_common::ranking;
use civic_common::types::{
    Complaint, ComplaintStatus, ComplaintUpdate, NewComplaint, VotePolarity,
};

/// Owns complaint records: the status state machine, the monotonic version
/// counter, and priority-ranked retrieval.
#[derive(Clone)]
pub struct ComplaintStore {
    pub(crate) pool: PgPool,
}

/// Filters for complaint listing. Empty filter lists everything.
#[derive(Debug, Default, Clone)]
pub struct ComplaintFilter {
    pub government_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub status: Option<ComplaintStatus>,
}

impl ComplaintStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CivicError::Database(e.into()))?;
        Ok(())
    }

    /// Create a complaint in `pending` at version 1 with zeroed counters.
    pub async fn create(&self, new: NewComplaint) -> Result<Complaint> {
        new.validate()?;

        let complaint = sqlx::query_as::<_, Complaint>(
            r#"
            INSERT INTO complaints
                (id, government_id, department_id, user_id, category, description,
                 media_urls, latitude, longitude, manual_location)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.government_id)
        .bind(new.department_id)
        .bind(new.user_id)
        .bind(&new.category)
        .bind(&new.description)
        .bind(sqlx::types::Json(&new.media_urls))
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.manual_location)
        .fetch_one(&self.pool)
        .await?;

        Ok(complaint)
    }

    pub async fn get(&self, id: Uuid) -> Result<Complaint> {
        sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| CivicError::NotFound("complaint".to_string()))
    }

    /// Apply only the fields present in `update`. The version counter
    /// advances by exactly 1 per successful call, however many fields change.
    pub async fn update(&self, id: Uuid, update: ComplaintUpdate) -> Result<Complaint> {
        sqlx::query_as::<_, Complaint>(
            r#"
            UPDATE complaints
            SET description = COALESCE($2, description),
                media_urls = COALESCE($3, media_urls),
                status = COALESCE($4, status),
                version = version + 1,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.description)
        .bind(update.media_urls.map(sqlx::types::Json))
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| CivicError::NotFound("complaint".to_string()))
    }

    /// Atomically adjust one aggregate vote counter on a single complaint
    /// row. Takes a connection so the vote ledger can run it inside the same
    /// transaction as the uniqueness-enforcing vote insert.
    pub async fn adjust_vote_count(
        conn: &mut PgConnection,
        id: Uuid,
        polarity: VotePolarity,
        delta: i32,
    ) -> Result<()> {
        let column = match polarity {
            VotePolarity::Up => "upvotes",
            VotePolarity::Down => "downvotes",
        };
        let sql = format!(
            "UPDATE complaints SET {column} = {column} + $2, updated_at = now() WHERE id = $1"
        );

        let result = sqlx::query(&sql).bind(id).bind(delta).execute(conn).await?;
        if result.rows_affected() == 0 {
            return Err(CivicError::NotFound("complaint".to_string()));
        }
        Ok(())
    }

    /// Apply the status rule for a remediation action's completion
    /// percentage (see `ComplaintStatus::after_completion`). The row lock
    /// keeps concurrent appends from interleaving a stale status.
    pub async fn apply_action_completion(&self, id: Uuid, completion_percent: i32) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let current =
            sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CivicError::NotFound("complaint".to_string()))?;

        let next = current.status.after_completion(completion_percent);
        if next != current.status {
            sqlx::query("UPDATE complaints SET status = $2, updated_at = now() WHERE id = $1")
                .bind(id)
                .bind(next.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Filtered listing, ranked by priority score then recency.
    pub async fn list(&self, filter: &ComplaintFilter) -> Result<Vec<Complaint>> {
        let mut complaints = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            WHERE ($1::uuid IS NULL OR government_id = $1)
              AND ($2::uuid IS NULL OR department_id = $2)
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(filter.government_id)
        .bind(filter.department_id)
        .bind(filter.status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        ranking::rank(&mut complaints);
        Ok(complaints)
    }

    /// Complaints within `radius_meters` of a point, ranked. Rows without
    /// coordinates never match. The bounding box narrows the scan; the exact
    /// haversine check decides membership.
    pub async fn nearby(&self, lat: f64, lng: f64, radius_meters: f64) -> Result<Vec<Complaint>> {
        geo::validate_coordinates(lat, lng)?;
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(CivicError::Validation(format!(
                "radius must be a positive number of meters, got {radius_meters}"
            )));
        }

        let bbox = geo::bounding_box(lat, lng, radius_meters);
        let candidates = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT * FROM complaints
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
              AND latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            "#,
        )
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .fetch_all(&self.pool)
        .await?;

        let mut within: Vec<Complaint> = candidates
            .into_iter()
            .filter(|c| match c.coordinates() {
                Some((clat, clng)) => geo::haversine_meters(lat, lng, clat, clng) <= radius_meters,
                None => false,
            })
            .collect();

        ranking::rank(&mut within);
        Ok(within)
    }
}

/// Map a foreign-key violation to NotFound for the referenced complaint;
/// pass everything else through as a database error.
pub(crate) fn not_found_on_fk(e: sqlx::Error) -> CivicError {
    if let sqlx::Error::Database(ref db) = e {
        if matches!(db.kind(), sqlx::error::ErrorKind::ForeignKeyViolation) {
            return CivicError::NotFound("complaint".to_string());
        }
    }
    CivicError::Database(e)
}
