//! Fetch, extract, report and write: the whole generator run.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use policytypes::{check_ordinals, extract_constants, render_to_string, Extraction};

use crate::config::GenerateConfig;
use crate::fetch;

/// Result of a successful generate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub bytes: usize,
    pub output: PathBuf,
}

/// Comparison of freshly rendered output with what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    UpToDate,
    Stale,
    Missing,
}

/// Generate the output file from the configured source.
///
/// Writes one `<index> <value>` line per constant to `diagnostics`. The
/// output file is only touched once the document has been fetched,
/// extracted and rendered.
pub async fn generate<D: Write>(config: &GenerateConfig, diagnostics: &mut D) -> Result<Summary> {
    let (count, rendered) = fetch_and_render(config, diagnostics).await?;

    write_output(&config.output, rendered.as_bytes())?;
    tracing::info!(
        "Wrote {count} constants to {} ({})",
        config.output.display(),
        config.format
    );

    Ok(Summary {
        count,
        bytes: rendered.len(),
        output: config.output.clone(),
    })
}

/// Render in memory and compare with the existing output. Never writes.
pub async fn check<D: Write>(config: &GenerateConfig, diagnostics: &mut D) -> Result<CheckOutcome> {
    let (_, rendered) = fetch_and_render(config, diagnostics).await?;

    let existing = match std::fs::read(&config.output) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("{} does not exist", config.output.display());
            return Ok(CheckOutcome::Missing);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", config.output.display()))
        }
    };

    if existing == rendered.as_bytes() {
        tracing::info!("{} is up to date", config.output.display());
        Ok(CheckOutcome::UpToDate)
    } else {
        tracing::warn!("{} is stale", config.output.display());
        Ok(CheckOutcome::Stale)
    }
}

async fn fetch_and_render<D: Write>(
    config: &GenerateConfig,
    diagnostics: &mut D,
) -> Result<(usize, String)> {
    let text = fetch::load_document(&config.source).await?;
    let extraction = extract_constants(&text);
    if extraction.is_empty() {
        tracing::warn!("No declarations found in {}", config.source.describe());
    }

    report(&extraction, diagnostics)?;

    if config.check_ordinals {
        check_ordinals(&extraction.constants).context("ordinal check failed")?;
    }

    let rendered = render_to_string(config.format, &extraction.constants)
        .with_context(|| format!("failed to render {} output", config.format))?;
    Ok((extraction.len(), rendered))
}

/// Print the running index and captured value of every constant.
pub fn report<D: Write>(extraction: &Extraction, diagnostics: &mut D) -> Result<()> {
    for (n, constant) in extraction.iter().enumerate() {
        writeln!(diagnostics, "{n} {}", constant.value)?;
    }
    Ok(())
}

/// Create (or truncate) `path` and write `contents` in one pass.
pub fn write_output(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(contents)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use policytypes::PolicyConstant;
    use tempfile::TempDir;

    #[test]
    fn test_report_lines() {
        let extraction = Extraction::from(vec![
            PolicyConstant::new("TYPE_SUBDOCUMENT", "7"),
            PolicyConstant::new("TYPE_PING", "10"),
        ]);
        let mut out = Vec::new();
        report(&extraction, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0 7\n1 10\n");
    }

    #[test]
    fn test_write_output_error_names_path() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file.
        let err = write_output(dir.path(), b"[\n];").unwrap_err();
        assert!(format!("{err:#}").contains(&dir.path().display().to_string()));
    }

    #[test]
    fn test_write_output_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/dir/policytypes.in");

        write_output(&path, b"first, and longer").unwrap();
        write_output(&path, b"[\n];").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[\n];");
    }
}
