use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, ScraperError};

/// Markup of one page together with the address it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub markup: String,
}

/// Source of rendered agenda pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Fetches pages over HTTP. Each request is bounded by the configured timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout_seconds: u64, user_agent: &str) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_seconds);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, timeout })
    }

    fn failure(&self, url: &str, err: reqwest::Error) -> ScraperError {
        if err.is_timeout() {
            ScraperError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            ScraperError::Fetch {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.failure(url, e))?;

        if !response.status().is_success() {
            return Err(ScraperError::Fetch {
                url: url.to_string(),
                message: format!("request failed with status: {}", response.status()),
            });
        }

        // Redirects are followed, so the event is recorded under its final address
        let final_url = response.url().to_string();
        let markup = response.text().await.map_err(|e| self.failure(url, e))?;
        debug!(url, final_url = %final_url, bytes = markup.len(), "Fetched page");

        Ok(FetchedPage {
            url: final_url,
            markup,
        })
    }
}

/// Serves pages saved to disk, one `.html` file per event page.
///
/// `https://agenda.infn.it/event/44949/` is looked up as `event_44949.html`.
pub struct FileFetcher {
    dir: PathBuf,
}

impl FileFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self, url: &str) -> PathBuf {
        self.dir.join(snapshot_name(url))
    }
}

/// File name a page is saved under: its URL path with `/` replaced by `_`
pub fn snapshot_name(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = without_scheme
        .find('/')
        .map_or("", |start| &without_scheme[start..]);
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let stem = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        "index.html".to_string()
    } else {
        format!("{stem}.html")
    }
}

#[async_trait]
impl PageFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let path = self.snapshot_path(url);
        let markup = match tokio::fs::read_to_string(&path).await {
            Ok(markup) => markup,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ScraperError::Snapshot {
                    url: url.to_string(),
                    path: path.display().to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        debug!(url, path = %path.display(), "Loaded saved page");

        Ok(FetchedPage {
            url: url.to_string(),
            markup,
        })
    }
}
