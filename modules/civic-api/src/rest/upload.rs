//! Multipart image upload to the external blob store.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::warn;

use crate::AppState;

pub async fn upload_complaint_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    store_image(&state, "complaints", multipart).await
}

pub async fn upload_action_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    store_image(&state, "actions", multipart).await
}

async fn store_image(state: &AppState, prefix: &str, mut multipart: Multipart) -> Response {
    let Some((filename, content_type, bytes)) = read_image_field(&mut multipart).await else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "no image file provided" })),
        )
            .into_response();
    };

    let key = format!(
        "{prefix}/{}_{}",
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default(),
        sanitize_filename(&filename)
    );

    match state.blob.put_object(&key, bytes, &content_type).await {
        Ok(url) => Json(serde_json::json!({ "image_url": url })).into_response(),
        Err(e) => {
            warn!(error = %e, key, "Image upload to blob store failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "blob store unavailable" })),
            )
                .into_response()
        }
    }
}

/// Pull the `image` field out of a multipart body.
async fn read_image_field(multipart: &mut Multipart) -> Option<(String, String, Vec<u8>)> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.ok()?;
        return Some((filename, content_type, bytes.to_vec()));
    }
    None
}

/// Keep object keys path-safe: alphanumerics, dot, dash, underscore.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_filename("pothole-12.jpg"), "pothole-12.jpg");
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
    }

    #[test]
    fn sanitize_handles_empty_names() {
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn sanitize_replaces_spaces_and_unicode() {
        assert_eq!(sanitize_filename("my photo ☺.png"), "my_photo__.png");
    }
}
