use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Timed out after {seconds}s waiting for {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("No saved page for {url} (expected {path})")]
    Snapshot { url: String, path: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_the_url() {
        let err = ScraperError::Fetch {
            url: "https://agenda.infn.it/event/1/".to_string(),
            message: "status 503".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch https://agenda.infn.it/event/1/: status 503"
        );
    }

    #[test]
    fn test_timeout_error_display() {
        let err = ScraperError::Timeout {
            url: "https://agenda.infn.it/event/2/".to_string(),
            seconds: 10,
        };
        assert!(err.to_string().contains("10s"));
        assert!(err.to_string().contains("/event/2/"));
    }
}
