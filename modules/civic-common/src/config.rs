use std::env;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Web server
    pub api_host: String,
    pub api_port: u16,

    // Blob store (S3-compatible, reached over HTTP)
    pub blob_endpoint: String,
    pub blob_bucket: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8083".to_string())
                .parse()
                .expect("API_PORT must be a number"),
            blob_endpoint: env::var("BLOB_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".to_string()),
            blob_bucket: env::var("BLOB_BUCKET")
                .unwrap_or_else(|_| "civic-complaints".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_vars_fall_back_to_defaults() {
        env::set_var("DATABASE_URL", "postgres://localhost/civic_test");
        env::remove_var("API_HOST");
        env::remove_var("API_PORT");
        env::remove_var("BLOB_ENDPOINT");
        env::remove_var("BLOB_BUCKET");

        let config = Config::from_env();
        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8083);
        assert_eq!(config.blob_endpoint, "http://localhost:9000");
        assert_eq!(config.blob_bucket, "civic-complaints");
    }
}
