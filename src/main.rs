use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use agenda_scraper::config::Config;
use agenda_scraper::fetcher::{FileFetcher, HttpFetcher, PageFetcher};
use agenda_scraper::markup::Page;
use agenda_scraper::sink::{emit, sink_for, OutputFormat};
use agenda_scraper::{crawl, flatten, logging, Extractor};

#[derive(Parser)]
#[command(name = "agenda_scraper")]
#[command(about = "Export the talks of an Indico event chain to a spreadsheet")]
#[command(version)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when it does not exist
    #[arg(long, global = true, default_value = "agenda_scraper.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow the "older event" links from a start page and export every talk
    Crawl {
        /// First event page to visit
        #[arg(long)]
        start_url: Option<String>,
        /// File the rows are written to
        #[arg(long, short)]
        output: Option<String>,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Read pages from saved HTML files in this directory instead of the network
        #[arg(long)]
        snapshots: Option<PathBuf>,
    },
    /// Print the rows of a single saved page as JSON
    Extract {
        file: PathBuf,
        /// Address to record as the event URL (defaults to the file path)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let _log_guard = logging::init_logging(&config.logging.dir);

    let extractor = Extractor::new(config.crawl.site_origin.clone());

    match cli.command {
        Commands::Crawl {
            start_url,
            output,
            format,
            snapshots,
        } => {
            if let Some(start_url) = start_url {
                config.crawl.start_url = start_url;
            }
            if let Some(output) = output {
                config.output.path = output;
            }
            if let Some(format) = format {
                config.output.format = format;
            }

            let fetcher: Box<dyn PageFetcher> = match snapshots {
                Some(dir) => {
                    let fetcher = FileFetcher::new(dir);
                    info!("Reading saved pages from {}", fetcher.dir().display());
                    Box::new(fetcher)
                }
                None => Box::new(
                    HttpFetcher::new(config.crawl.timeout_seconds, &config.crawl.user_agent)
                        .context("building HTTP client")?,
                ),
            };

            info!("Starting from {}", config.crawl.start_url);
            let run = crawl(fetcher.as_ref(), &extractor, &config.crawl.start_url).await;

            if run.records.is_empty() {
                warn!("No rows collected, nothing written");
            } else {
                let mut sink = sink_for(config.output.format, config.output.delimiter);
                emit(&run.records, sink.as_mut(), &config.output.path)
                    .with_context(|| format!("writing {}", config.output.path))?;
                println!(
                    "Data saved to {} ({} rows from {} events)",
                    config.output.path,
                    run.records.len(),
                    run.pages_visited
                );
            }

            if let Some(failure) = run.failure {
                error!("Traversal stopped early: {}", failure);
                return Err(anyhow::Error::new(failure).context(format!(
                    "chain traversal stopped after {} events",
                    run.pages_visited
                )));
            }
        }
        Commands::Extract { file, url } => {
            let markup = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let url = url.unwrap_or_else(|| file.display().to_string());

            let extracted = extractor.extract(&Page::parse(&markup), &url);
            let records = flatten(&extracted.event, &extracted.contributions);
            if let Some(previous) = &extracted.event.previous_link {
                info!("Older event: {}", previous);
            }
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}
