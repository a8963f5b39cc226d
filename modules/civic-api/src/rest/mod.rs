pub mod upload;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use civic_common::error::CivicError;
use civic_common::types::{ComplaintStatus, ComplaintUpdate, NewAction, NewComment, NewComplaint};
use civic_queue::AnalysisRequest;
use civic_store::ComplaintFilter;

use crate::AppState;

pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 5000.0;

// --- Query / body structs ---

#[derive(Deserialize)]
pub struct ListQuery {
    government_id: Option<Uuid>,
    department_id: Option<Uuid>,
    status: Option<ComplaintStatus>,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    lat: f64,
    lng: f64,
    radius: Option<f64>,
}

#[derive(Deserialize)]
pub struct VoteBody {
    #[serde(default = "Uuid::nil")]
    user_id: Uuid,
}

// --- Helpers ---

/// Map a kernel error onto the HTTP surface: validation → 400, missing
/// entities → 404, duplicate votes → 409, backend trouble → 500 after a
/// log line.
fn error_response(e: CivicError) -> Response {
    let status = match &e {
        CivicError::Validation(_) => StatusCode::BAD_REQUEST,
        CivicError::NotFound(_) => StatusCode::NOT_FOUND,
        CivicError::DuplicateVote(_) => StatusCode::CONFLICT,
        CivicError::Database(_) | CivicError::Dependency(_) => {
            warn!(error = %e, "Request failed on a backend dependency");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
}

// --- Handlers ---

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": "complaint-service" }))
}

pub async fn list_complaints(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Response {
    let filter = ComplaintFilter {
        government_id: params.government_id,
        department_id: params.department_id,
        status: params.status,
    };
    match state.complaints.list(&filter).await {
        Ok(complaints) => Json(complaints).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_complaint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.complaints.get(id).await {
        Ok(complaint) => Json(complaint).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn create_complaint(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewComplaint>,
) -> Response {
    let complaint = match state.complaints.create(body).await {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };

    // Fire-and-forget analysis hand-off; a failed publish never rolls back
    // the creation and failures are logged inside the queue.
    let _ = state
        .analysis
        .publish(&AnalysisRequest::from(&complaint))
        .await;

    info!(complaint_id = %complaint.id, government_id = %complaint.government_id,
        "Complaint created");
    (StatusCode::CREATED, Json(complaint)).into_response()
}

pub async fn update_complaint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<ComplaintUpdate>,
) -> Response {
    match state.complaints.update(id, body).await {
        Ok(complaint) => Json(complaint).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Voting ---

pub async fn upvote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<VoteBody>,
) -> Response {
    match state.votes.cast_upvote(id, body.user_id).await {
        Ok(()) => Json(serde_json::json!({ "message": "upvoted" })).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn downvote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<VoteBody>,
) -> Response {
    match state.votes.cast_downvote(id, body.user_id).await {
        Ok(()) => Json(serde_json::json!({ "message": "downvoted" })).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Comments ---

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.complaints.comments_for(id).await {
        Ok(comments) => Json(comments).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewComment>,
) -> Response {
    match state.complaints.add_comment(body).await {
        Ok(comment) => (StatusCode::CREATED, Json(comment)).into_response(),
        Err(e) => error_response(e),
    }
}

// --- Actions taken ---

pub async fn list_actions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Response {
    match state.actions.for_complaint(id).await {
        Ok(actions) => Json(actions).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn add_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<NewAction>,
) -> Response {
    match state.actions.append(id, body).await {
        Ok(action) => {
            info!(complaint_id = %id, completion = action.completion_percent,
                "Remediation action recorded");
            (StatusCode::CREATED, Json(action)).into_response()
        }
        Err(e) => error_response(e),
    }
}

// --- Nearby search ---

pub async fn nearby_complaints(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQuery>,
) -> Response {
    let radius = params.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_METERS);
    match state.complaints.nearby(params.lat, params.lng, radius).await {
        Ok(complaints) => Json(complaints).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let resp = error_response(CivicError::Validation("bad".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let resp = error_response(CivicError::NotFound("complaint".to_string()));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn duplicate_vote_maps_to_409() {
        let resp = error_response(CivicError::DuplicateVote("already upvoted".to_string()));
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn dependency_trouble_maps_to_500() {
        let resp = error_response(CivicError::Dependency("queue down".to_string()));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
