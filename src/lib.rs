//! Walks the "older event" chain of an Indico agenda and flattens every talk
//! into a seven-column table (`Meeting, Agenda, Date, Contribution, Speaker,
//! Institution, PDF`).
//!
//! The pieces, leaf first:
//!
//! - [`normalize`]: cleanup of names, institutions, titles and dates
//! - [`markup`]: element queries over a parsed page
//! - [`extractor`]: one page to an [`Event`] and its [`Contribution`]s
//! - [`traversal`]: the fetch/extract loop over the chain
//! - [`sink`]: writing the rows out
//!
//! ```
//! use agenda_scraper::normalize::normalize_date;
//!
//! assert_eq!(normalize_date("Sep 19, 2024, 10:30 AM"), "2024-09-19 10:30");
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod markup;
pub mod normalize;
pub mod sink;
pub mod traversal;
pub mod types;

pub use error::{Result, ScraperError};
pub use extractor::{ExtractedPage, Extractor};
pub use fetcher::{FetchedPage, FileFetcher, HttpFetcher, PageFetcher};
pub use sink::{emit, CsvSink, JsonSink, OutputFormat, Sink};
pub use traversal::{crawl, ChainRun, ChainTraversal, TraversalState};
pub use types::{flatten, Contribution, Event, Record};
