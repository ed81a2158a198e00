/// Site and output constants shared across the crawler

/// Origin prepended to the site-relative links found on agenda pages
pub const DEFAULT_SITE_ORIGIN: &str = "https://agenda.infn.it";

/// Event page the original export started from
pub const DEFAULT_START_URL: &str = "https://agenda.infn.it/event/44949/";

/// How long a single page may take before the run is aborted
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub const DEFAULT_USER_AGENT: &str = concat!("agenda_scraper/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_OUTPUT_PATH: &str = "events_contributions.csv";

pub const DEFAULT_LOG_DIR: &str = "logs";

/// Column names of the exported table, in row order
pub const HEADER: [&str; 7] = [
    "Meeting",
    "Agenda",
    "Date",
    "Contribution",
    "Speaker",
    "Institution",
    "PDF",
];

/// Extension an attachment link must end with to be exported
pub const PDF_EXTENSION: &str = ".pdf";
