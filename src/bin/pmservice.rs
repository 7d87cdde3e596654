use clap::Parser;
use pmservice::config::{ConfigOverrides, ServiceConfig};
use pmservice::import::{ImportOptions, import_file};
use pmservice::store::MemoryStore;
use pmservice::{PmService, http, logger};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "pmservice", version, about = "HTTP API over sensor-reading documents with error simulation")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(long)]
    bind: Option<String>,
    /// Collection name
    #[arg(long)]
    collection: Option<String>,
    /// NDJSON or JSON-array file loaded into the store at startup
    #[arg(long)]
    seed: Option<PathBuf>,
    /// Skip malformed seed records instead of refusing to start
    #[arg(long)]
    seed_skip_errors: bool,
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// error|warn|info|debug|trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let import_opts = ImportOptions { skip_errors: cli.seed_skip_errors };
    let mut cfg = ServiceConfig::load(cli.config.as_deref())?;
    cfg.apply_env();
    cfg.apply_overrides(ConfigOverrides {
        bind: cli.bind,
        collection: cli.collection,
        seed_file: cli.seed,
        log_dir: cli.log_dir,
        log_level: cli.log_level,
    });
    if let Err(e) = logger::configure_logging(cfg.log_dir.as_deref(), cfg.log_level.as_deref(), cfg.log_retention) {
        eprintln!("logging not initialized: {e}");
    }

    let store = Arc::new(MemoryStore::new(cfg.collection.clone()));
    if let Some(seed) = &cfg.seed_file {
        import_file(store.as_ref(), seed, &import_opts)?;
    }
    log::info!("serving collection `{}`", store.name());
    let service = Arc::new(PmService::new(store));
    http::serve(service, &cfg.bind).await?;
    Ok(())
}
