pub mod error;

pub use error::{BlobError, Result};

use std::time::Duration;

/// Client for an S3-compatible blob store. Objects are written by HTTP PUT
/// and addressed by public URL afterwards.
pub struct BlobClient {
    client: reqwest::Client,
    endpoint: String,
    bucket: String,
}

impl BlobClient {
    pub fn new(endpoint: &str, bucket: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
        }
    }

    /// Store an object and return its public URL.
    pub async fn put_object(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let url = self.object_url(key);

        let resp = self
            .client
            .put(&url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlobError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(url)
    }

    /// Public URL for an object key.
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }
}
