//! Command-line host for the caliber pass.
//!
//! Loads a catalog dump, runs the pass once, optionally writes the enriched
//! catalog back out, and prints the pass summary as compact JSON on stdout.
//! Logs go to stderr so the summary can be piped.

use anyhow::{Context, Result, bail};
use calibersync::logging::{self, LogFormat};
use calibersync::{
    Catalog, CatalogLayout, PassConfig, PassOutcome, PassRunner, load_catalog_document,
};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "caliber-sync",
    version,
    about = "Expand ammo whitelists in an item catalog to every round of the calibers they reference."
)]
struct Cli {
    /// Catalog JSON: an id->record object or an array of records with `_id`.
    #[arg(long, value_name = "PATH")]
    catalog: PathBuf,
    /// Write the enriched catalog here in the input's layout (atomically replaced).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Pass config JSON; falls back to CALIBER_SYNC_CONFIG.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report what would be added without changing any whitelist.
    #[arg(long)]
    dry_run: bool,
    #[arg(long, value_name = "text|json", default_value = "text", value_parser = parse_log_format)]
    log_format: LogFormat,
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    LogFormat::try_from(raw)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let mut config = PassConfig::load(cli.config.as_deref())?;
    if cli.dry_run {
        config.dry_run = true;
    }
    let (mut catalog, layout) = load_catalog_document(&cli.catalog)?;
    info!(
        path = %cli.catalog.display(),
        items = catalog.len(),
        "loaded catalog"
    );

    let summary = match PassRunner::new(&mut catalog, &config).execute() {
        PassOutcome::Completed(summary) => summary,
        PassOutcome::Failed(message) => bail!("caliber pass failed: {message}"),
    };

    if let Some(output) = cli.output.as_deref() {
        write_catalog(output, &catalog, &layout)?;
        info!(path = %output.display(), "wrote enriched catalog");
    }

    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn write_catalog(path: &Path, catalog: &Catalog, layout: &CatalogLayout) -> Result<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("staging output next to {}", path.display()))?;
    serde_json::to_writer_pretty(&mut staged, &catalog.to_document(layout))
        .with_context(|| format!("serializing catalog for {}", path.display()))?;
    staged.write_all(b"\n")?;
    staged
        .persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
