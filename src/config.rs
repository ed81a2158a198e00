use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_LOG_DIR, DEFAULT_OUTPUT_PATH, DEFAULT_SITE_ORIGIN, DEFAULT_START_URL,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_USER_AGENT,
};
use crate::error::{Result, ScraperError};
use crate::sink::OutputFormat;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub start_url: String,
    /// Prepended to the site-relative links found on event pages
    pub site_origin: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            site_origin: DEFAULT_SITE_ORIGIN.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub format: OutputFormat,
    pub delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            format: OutputFormat::Csv,
            delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl Config {
    /// Read `path`, falling back to the built-in defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let config_content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.crawl.start_url.trim().is_empty() {
            return Err(ScraperError::Config("crawl.start_url must not be empty".into()));
        }
        if !self.crawl.site_origin.starts_with("http://")
            && !self.crawl.site_origin.starts_with("https://")
        {
            return Err(ScraperError::Config(format!(
                "crawl.site_origin must be an http(s) origin, got '{}'",
                self.crawl.site_origin
            )));
        }
        if self.crawl.timeout_seconds == 0 {
            return Err(ScraperError::Config("crawl.timeout_seconds must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.crawl.site_origin, "https://agenda.infn.it");
        assert_eq!(config.crawl.timeout_seconds, 10);
        assert_eq!(config.output.path, "events_contributions.csv");
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.logging.dir, "logs");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [crawl]
            start_url = "https://indico.cern.ch/event/1000/"
            site_origin = "https://indico.cern.ch"

            [output]
            format = "json"
            path = "out/cern.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.crawl.start_url, "https://indico.cern.ch/event/1000/");
        assert_eq!(config.crawl.timeout_seconds, 10);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.delimiter, ',');
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_toml("[crawl]\nsite_origin = \"agenda.infn.it\"\n").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));

        let err = Config::from_toml("[crawl]\ntimeout_seconds = 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));

        let err = Config::from_toml("[crawl\n").unwrap_err();
        assert!(matches!(err, ScraperError::Toml(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("agenda.toml");
        std::fs::write(&path, "[output]\ndelimiter = \";\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.output.delimiter, ';');
    }
}
