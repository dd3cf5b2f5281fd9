mod export;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placedump")]
#[command(about = "Export map search listings for a viewport to CSV")]
struct Cli {
    /// Viewport descriptor copied from a maps URL, e.g. `@26.41,74.63,11z`.
    #[arg(long)]
    viewport: String,

    /// Search phrase, e.g. "Marriage Gardens".
    #[arg(long)]
    query: String,

    /// Upper bound on exported records.
    #[arg(long, env = "PLACEDUMP_MAX_RESULTS")]
    max_results: Option<u32>,

    /// CSV destination. Defaults to `<query>.csv` in the output directory.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = placedump_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Some(max_results) = cli.max_results {
        config.max_results = max_results;
    }
    tracing::debug!(?config, "configuration loaded");

    let client = placedump_scraper::MapsClient::from_app_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build maps client: {e}"))?;
    let options = placedump_scraper::PaginationOptions::from_app_config(&config);

    tracing::info!(
        viewport = %cli.viewport,
        query = %cli.query,
        max_results = options.max_results,
        policy = %options.listing_policy,
        "starting search"
    );
    let collection =
        placedump_scraper::fetch_all_places(&client, &cli.viewport, &cli.query, &options).await?;

    if !collection.defects.is_empty() {
        tracing::warn!(
            defects = collection.defects.len(),
            "some listings were skipped or partially decoded"
        );
    }

    let path = cli
        .output
        .unwrap_or_else(|| export::default_output_path(&config.output_dir, &cli.query));
    export::write_csv(&path, &collection.records)?;

    tracing::info!(
        records = collection.records.len(),
        pages = collection.offsets.len(),
        path = %path.display(),
        "export complete"
    );
    println!(
        "wrote {} places to {}",
        collection.records.len(),
        path.display()
    );

    Ok(())
}
