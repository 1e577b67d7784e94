//! CLI for imgfetch.

mod prompt;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use imgfetch_core::config::{self, FetcherConfig};
use imgfetch_core::fetcher::{split_url_list, Fetcher};
use std::io;
use std::path::PathBuf;

use report::{summary_message, ConsoleReporter};

const MIB: u64 = 1024 * 1024;

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch")]
#[command(about = "Fetch images by URL into a local folder, skipping duplicates", long_about = None)]
pub struct Cli {
    /// Image URLs; each argument may itself be a comma-separated list.
    /// When omitted, the URLs are read from an interactive prompt.
    pub urls: Vec<String>,

    /// Directory to save images into (overrides config `download_dir`).
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Connect/stall timeout in seconds (overrides config `timeout_secs`).
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum image size in MiB (overrides config `max_file_size_bytes`).
    #[arg(long, value_name = "MIB", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_size_mib: Option<u64>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, cfg: &mut FetcherConfig) {
        if let Some(dir) = &self.dir {
            cfg.download_dir = dir.clone();
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        if let Some(mib) = self.max_size_mib {
            cfg.max_file_size_bytes = mib.saturating_mul(MIB);
        }
    }

    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        cli.apply_overrides(&mut cfg);
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        report::print_banner(&mut out)?;

        let raw = if cli.urls.is_empty() {
            prompt::prompt_urls(&mut io::stdin().lock(), &mut out)?
        } else {
            cli.urls.join(",")
        };

        let urls = split_url_list(&raw);
        if urls.is_empty() {
            report::print_no_urls(&mut out)?;
            return Ok(());
        }

        std::fs::create_dir_all(&cfg.download_dir).with_context(|| {
            format!(
                "failed to create download directory {}",
                cfg.download_dir.display()
            )
        })?;

        let mut fetcher = Fetcher::new(&cfg);
        let mut reporter = ConsoleReporter::new(&mut out);
        let summary = fetcher.fetch_many(&urls, &mut reporter);

        report::print_summary(&mut out, &summary)?;
        tracing::debug!("{}", summary_message(&summary));
        Ok(())
    }
}
