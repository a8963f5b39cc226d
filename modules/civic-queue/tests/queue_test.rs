//! Integration tests for AnalysisQueue.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use sqlx::PgPool;
use uuid::Uuid;

use civic_queue::{AnalysisQueue, AnalysisRequest};

/// Get a test queue, or skip if no test DB is available.
async fn test_queue() -> Option<AnalysisQueue> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;

    // The queue table for testing; production schema lives in the store's
    // migration set.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_requests (
            seq          BIGSERIAL   PRIMARY KEY,
            complaint_id UUID        NOT NULL,
            payload      JSONB       NOT NULL,
            enqueued_at  TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(&pool)
    .await
    .ok()?;

    Some(AnalysisQueue::new(pool))
}

fn request(complaint_id: Uuid) -> AnalysisRequest {
    AnalysisRequest {
        complaint_id,
        description: "overflowing garbage bin".to_string(),
        category: "sanitation".to_string(),
        latitude: Some(12.97),
        longitude: Some(77.59),
        government_id: Uuid::new_v4(),
    }
}

#[tokio::test]
async fn publish_returns_a_sequence_number() {
    let Some(queue) = test_queue().await else {
        return;
    };

    let seq = queue.publish(&request(Uuid::new_v4())).await;
    assert!(seq.is_some());
    assert!(seq.unwrap() > 0);
}

#[tokio::test]
async fn published_payload_round_trips() {
    let Some(queue) = test_queue().await else {
        return;
    };

    let complaint_id = Uuid::new_v4();
    let seq = queue.publish(&request(complaint_id)).await.unwrap();

    let rows = queue.read_from(seq, 10).await.unwrap();
    assert!(!rows.is_empty());
    let row = &rows[0];
    assert_eq!(row.seq, seq);
    assert_eq!(row.complaint_id, complaint_id);

    let decoded: AnalysisRequest = serde_json::from_value(row.payload.clone()).unwrap();
    assert_eq!(decoded.complaint_id, complaint_id);
    assert_eq!(decoded.category, "sanitation");
    assert_eq!(decoded.latitude, Some(12.97));
}

#[tokio::test]
async fn publish_failure_is_swallowed_not_propagated() {
    let Some(url) = std::env::var("DATABASE_TEST_URL").ok() else {
        return;
    };
    // Single connection pinned to a search path with no queue table, so the
    // insert fails the way it would with a broken schema.
    let Ok(pool) = sqlx::postgres::PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
    else {
        return;
    };
    sqlx::query("SET search_path TO missing_schema")
        .execute(&pool)
        .await
        .unwrap();

    let queue = AnalysisQueue::new(pool);
    assert_eq!(queue.publish(&request(Uuid::new_v4())).await, None);
}

#[tokio::test]
async fn read_from_respects_the_cursor_and_order() {
    let Some(queue) = test_queue().await else {
        return;
    };

    let first = queue.publish(&request(Uuid::new_v4())).await.unwrap();
    let second = queue.publish(&request(Uuid::new_v4())).await.unwrap();
    assert!(second > first);

    let rows = queue.read_from(second, 10).await.unwrap();
    assert!(rows.iter().all(|r| r.seq >= second));
    let seqs: Vec<i64> = rows.iter().map(|r| r.seq).collect();
    let mut sorted = seqs.clone();
    sorted.sort_unstable();
    assert_eq!(seqs, sorted);
}
