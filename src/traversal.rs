//! Follows an event's "previous event" links until the chain runs out.
//!
//! The traversal is a two-state machine. While `Fetching` it loads the current
//! page, appends that page's rows and moves on to the older event; it becomes
//! `Done` when a page has no older link, when the link points at a page that
//! was already visited, or when a fetch fails.

use std::collections::HashSet;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{error, info, instrument, warn};

use crate::error::{Result, ScraperError};
use crate::extractor::Extractor;
use crate::fetcher::PageFetcher;
use crate::markup::Page;
use crate::types::{flatten, Record};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalState {
    Fetching(String),
    Done,
}

/// Outcome of a traversal. Rows gathered before a failure are kept.
#[derive(Debug)]
pub struct ChainRun {
    pub records: Vec<Record>,
    pub pages_visited: usize,
    pub failure: Option<ScraperError>,
}

impl ChainRun {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Discard partial rows and turn a failed run into its error
    pub fn into_result(self) -> Result<Vec<Record>> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

pub struct ChainTraversal<'a> {
    fetcher: &'a dyn PageFetcher,
    extractor: &'a Extractor,
    state: TraversalState,
    visited: HashSet<String>,
    records: Vec<Record>,
    pages_visited: usize,
}

impl<'a> ChainTraversal<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        extractor: &'a Extractor,
        start_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            state: TraversalState::Fetching(start_url.into()),
            visited: HashSet::new(),
            records: Vec::new(),
            pages_visited: 0,
        }
    }

    pub fn state(&self) -> &TraversalState {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TraversalState::Done
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Visit the current page. Does nothing once the traversal is done.
    ///
    /// A fetch error ends the traversal and is returned; rows collected so far stay.
    #[instrument(skip(self), fields(visited = self.pages_visited))]
    pub async fn step(&mut self) -> Result<()> {
        let url = match &self.state {
            TraversalState::Fetching(url) => url.clone(),
            TraversalState::Done => return Ok(()),
        };
        self.visited.insert(url.clone());

        let started = Instant::now();
        let fetched = match self.fetcher.fetch(&url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!("Fetching {} failed: {}", url, e);
                counter!("agenda_fetch_failures_total").increment(1);
                self.state = TraversalState::Done;
                return Err(e);
            }
        };
        histogram!("agenda_fetch_duration_seconds").record(started.elapsed().as_secs_f64());
        counter!("agenda_pages_fetched_total").increment(1);
        self.visited.insert(fetched.url.clone());
        self.pages_visited += 1;

        let extracted = {
            let page = Page::parse(&fetched.markup);
            self.extractor.extract(&page, &fetched.url)
        };
        if extracted.contributions.is_empty() {
            warn!("No contributions on {}, keeping a placeholder row", fetched.url);
        }

        let rows = flatten(&extracted.event, &extracted.contributions);
        info!(
            "Visited '{}' ({}): {} rows",
            extracted.event.title,
            fetched.url,
            rows.len()
        );
        counter!("agenda_records_total").increment(rows.len() as u64);
        self.records.extend(rows);

        self.state = match extracted.event.previous_link {
            Some(link) if self.visited.contains(&link) => {
                warn!("Previous link {} was already visited, stopping", link);
                TraversalState::Done
            }
            Some(link) => TraversalState::Fetching(link),
            None => {
                info!("No older event after {}, chain finished", fetched.url);
                TraversalState::Done
            }
        };
        Ok(())
    }

    pub async fn run(mut self) -> ChainRun {
        let mut failure = None;
        while !self.is_done() {
            if let Err(e) = self.step().await {
                failure = Some(e);
            }
        }
        info!(
            "Traversal finished: {} pages, {} rows",
            self.pages_visited,
            self.records.len()
        );

        ChainRun {
            records: self.records,
            pages_visited: self.pages_visited,
            failure,
        }
    }
}

/// Walk the chain starting at `start_url` and collect every row
pub async fn crawl(fetcher: &dyn PageFetcher, extractor: &Extractor, start_url: &str) -> ChainRun {
    ChainTraversal::new(fetcher, extractor, start_url).run().await
}
