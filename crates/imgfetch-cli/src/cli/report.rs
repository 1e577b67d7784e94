//! Console narration: per-URL status lines and the final summary.

use anyhow::Result;
use imgfetch_core::{BatchSummary, FetchError, FetchOutcome, Reporter};
use std::io::Write;

/// Writes human-readable progress for each URL to `out`.
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_outcome(&mut self, url: &str, outcome: &FetchOutcome) -> std::io::Result<()> {
        match outcome {
            FetchOutcome::Saved { candidate, stored } => {
                writeln!(self.out, "✓ Successfully fetched: {}", candidate)?;
                writeln!(self.out, "✓ Image saved to {}", stored.path.display())?;
            }
            FetchOutcome::Duplicate { existing } => {
                writeln!(
                    self.out,
                    "  Content identical to already downloaded: {}",
                    existing
                )?;
            }
            FetchOutcome::Failed(e) => {
                let (headline, detail) = failure_lines(url, e);
                writeln!(self.out, "  {}", headline)?;
                writeln!(self.out, "   {}", detail)?;
            }
        }
        writeln!(self.out)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn on_start(&mut self, url: &str) {
        if let Err(e) = writeln!(self.out, "Connecting to: {}", url) {
            tracing::warn!("failed to write progress: {}", e);
        }
    }

    fn on_outcome(&mut self, url: &str, outcome: &FetchOutcome) {
        if let Err(e) = self.write_outcome(url, outcome) {
            tracing::warn!("failed to write progress: {}", e);
        }
    }
}

/// Headline and detail line for a failed URL.
pub fn failure_lines(url: &str, e: &FetchError) -> (String, String) {
    match e {
        FetchError::Timeout(_) => (
            format!("Connection timeout for: {}", url),
            "The server didn't respond in time. Please try again later.".to_string(),
        ),
        FetchError::ConnectionFailure(_) => (
            format!("Cannot connect to: {}", url),
            "Please check your internet connection and the URL.".to_string(),
        ),
        FetchError::HttpStatus { code, reason } => (
            format!("Server responded with error for: {}", url),
            format!("HTTP {}: {}", code, reason),
        ),
        FetchError::InvalidContentType(_) | FetchError::PayloadTooLarge { .. } => {
            (format!("Invalid image at: {}", url), e.to_string())
        }
        FetchError::Unexpected(_) => (format!("Unexpected error with: {}", url), e.to_string()),
    }
}

/// One-line verdict for a finished batch.
pub fn summary_message(summary: &BatchSummary) -> String {
    if summary.all_succeeded() {
        "All images fetched successfully!".to_string()
    } else if summary.successful > 0 {
        format!(
            "Fetched {} out of {} images successfully.",
            summary.successful, summary.total
        )
    } else {
        "No images could be fetched.".to_string()
    }
}

pub fn print_banner(out: &mut impl Write) -> Result<()> {
    writeln!(out, "imgfetch: collect images from the web")?;
    writeln!(out)?;
    Ok(())
}

pub fn print_no_urls(out: &mut impl Write) -> Result<()> {
    writeln!(out, "No URLs provided. Nothing to fetch.")?;
    Ok(())
}

pub fn print_summary(out: &mut impl Write, summary: &BatchSummary) -> Result<()> {
    writeln!(out, "{}", summary_message(summary))?;
    Ok(())
}
