use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dailymed_client::{BatchDownloader, BatchReport, ClientConfig, DailyMedClient, DrugQuery};
use tracing::info;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "dailymed-cli",
    about = "Download drug label XML documents from DailyMed",
    long_about = "Searches the DailyMed SPL index for drug names and downloads the matching label XML documents into a local directory"
)]
struct Cli {
    /// Drug names to download labels for (defaults to a built-in list)
    #[arg(long, num_args = 1.., value_name = "NAME")]
    drugs: Vec<String>,

    /// Maximum number of labels to download per drug
    #[arg(short, long, default_value_t = dailymed_client::DEFAULT_LIMIT)]
    limit: usize,

    /// Directory the label XML files are written to
    #[arg(
        long = "save_dir",
        alias = "save-dir",
        value_name = "PATH",
        default_value = "dailymed_xmls"
    )]
    save_dir: PathBuf,

    /// HTTP request timeout in seconds (default: 30)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Path to save set ids that failed to download (if not specified, failures are logged only)
    #[arg(short, long)]
    failed_output: Option<PathBuf>,

    /// Path to save the full batch report as JSON
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with indicatif layer for progress bars
    let filter = if cli.verbose { "debug" } else { "info" };

    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(indicatif_layer.get_stderr_writer()),
        )
        .with(indicatif_layer)
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    if cli.limit == 0 {
        bail!("--limit must be at least 1");
    }

    let mut config = ClientConfig::new();
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    let client = DailyMedClient::with_config(config);

    // An empty list makes the downloader fall back to the built-in drugs.
    let queries: Vec<DrugQuery> = cli
        .drugs
        .iter()
        .map(|name| DrugQuery::new(name.clone(), cli.limit))
        .collect();

    let downloader = BatchDownloader::new(client, &cli.save_dir);
    let report = downloader
        .run(&queries)
        .await
        .with_context(|| format!("could not start batch into {}", cli.save_dir.display()))?;

    // Per-item failures are part of the report, not a process failure.
    println!("{report}");

    if let Some(path) = &cli.report {
        save_report(&report, path).await?;
    }

    if let Some(path) = &cli.failed_output {
        save_failed_setids(&report, path).await?;
    }

    Ok(())
}

async fn save_report(report: &BatchReport, path: &PathBuf) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("could not write report to {}", path.display()))?;

    info!(path = %path.display(), "Saved batch report");
    Ok(())
}

async fn save_failed_setids(report: &BatchReport, path: &PathBuf) -> Result<()> {
    let failed = report.failed_setids();
    if failed.is_empty() {
        info!("No failed set ids to save");
        return Ok(());
    }

    // One set id per line.
    let content = failed.join("\n");
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("could not write failed set ids to {}", path.display()))?;

    info!(path = %path.display(), count = failed.len(), "Saved failed set ids");
    Ok(())
}
