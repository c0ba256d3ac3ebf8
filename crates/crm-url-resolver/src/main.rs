//! crm-classify CLI
//!
//! Classifies URLs against a snapshot of the CRM's entity types and custom
//! sections.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crm_url_resolver::{ResolverConfig, Snapshot, UrlResolver};

/// Tells which entity type and page kind CRM URLs point at.
#[derive(Parser)]
#[command(name = "crm-classify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON snapshot of dynamic types, custom sections and modules.
    #[arg(short, long, env = "CRM_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// JSON resolver configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// URLs to classify.
    #[arg(required = true)]
    urls: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => ResolverConfig::from_json_file(path)?,
        None => ResolverConfig::default(),
    };
    let snapshot = match &cli.snapshot {
        Some(path) => Snapshot::from_json_file(path)?,
        None => Snapshot::default(),
    };

    let resolver = snapshot
        .apply(UrlResolver::builder().config(config))
        .build()?;
    debug!(entity_types = resolver.route_table().len(), "route table loaded");

    for url in &cli.urls {
        match resolver.classify(Some(url.as_str())) {
            Some(classification) => println!("{url}\t{classification}"),
            None => println!("{url}\tunclassified"),
        }
    }

    Ok(())
}
