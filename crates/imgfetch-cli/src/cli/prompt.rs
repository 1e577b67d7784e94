//! Interactive URL prompt.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Please enter the image URL(s) (comma-separated for multiple): ";

/// Prints the prompt and reads one line. Returns the line trimmed; empty on EOF.
pub fn prompt_urls(input: &mut impl BufRead, out: &mut impl Write) -> Result<String> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("failed to read URLs from stdin")?;
    writeln!(out)?;
    Ok(line.trim().to_string())
}
