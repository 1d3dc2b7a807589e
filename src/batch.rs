//! Running the classifier over a directory of images.
//!
//! Files are classified in parallel on the rayon pool. A file that fails to
//! read or decode is logged and skipped; the rest of the batch still lands in
//! the report.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::classify::{Coverage, classify};
use crate::decode::load_rgb;
use crate::error::{CoverageError, Result};
use crate::palette::Palette;
use crate::report::ReportWriter;

/// Shared flag that stops files which have not started yet.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Matched case-insensitively, without the dot.
    pub extension: String,
    pub cancel: CancelFlag,
    /// Raise `cancel` on the first failed file so the rest are not started.
    pub fail_fast: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extension: "png".to_string(),
            cancel: CancelFlag::default(),
            fail_fast: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// `(file name, coverage)` in listing order.
    pub results: Vec<(String, Coverage)>,
    pub failures: Vec<(String, CoverageError)>,
    pub cancelled: usize,
}

/// Regular files in `dir` whose extension matches, sorted by file name.
pub fn list_images(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let wanted = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        // Follows symlinks; dangling links are not files.
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted));
        if matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

enum FileOutcome {
    Done(Coverage),
    Failed(CoverageError),
    Cancelled,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Classify every matching image in `dir` against `palette`.
///
/// Only listing the directory can fail the whole run. Files that have not
/// started once the cancel flag is raised are counted, not classified.
pub fn run_batch(dir: &Path, palette: &Palette, options: &BatchOptions) -> Result<BatchOutcome> {
    let files = list_images(dir, &options.extension)?;
    tracing::info!(dir = %dir.display(), files = files.len(), "Processing images");

    let outcomes: Vec<(String, FileOutcome)> = files
        .par_iter()
        .map(|path| {
            let name = display_name(path);
            if options.cancel.is_cancelled() {
                return (name, FileOutcome::Cancelled);
            }
            let outcome = match load_rgb(path).and_then(|img| classify(&img, palette)) {
                Ok(coverage) => {
                    tracing::debug!(file = %name, pixels = coverage.total_pixels, "Processed image");
                    FileOutcome::Done(coverage)
                }
                Err(e) => {
                    if options.fail_fast {
                        options.cancel.cancel();
                    }
                    FileOutcome::Failed(e)
                }
            };
            (name, outcome)
        })
        .collect();

    let mut batch = BatchOutcome::default();
    for (name, outcome) in outcomes {
        match outcome {
            FileOutcome::Done(coverage) => batch.results.push((name, coverage)),
            FileOutcome::Failed(e) => {
                tracing::warn!(file = %name, error = %e, "Skipping image");
                batch.failures.push((name, e));
            }
            FileOutcome::Cancelled => batch.cancelled += 1,
        }
    }

    tracing::info!(
        processed = batch.results.len(),
        failed = batch.failures.len(),
        cancelled = batch.cancelled,
        "Batch finished"
    );
    Ok(batch)
}

/// Header plus one row per successfully classified image.
pub fn write_report<W: io::Write>(batch: &BatchOutcome, palette: &Palette, writer: W) -> Result<W> {
    let mut report = ReportWriter::new(writer, palette)?;
    for (name, coverage) in &batch.results {
        report.write_row(name, coverage)?;
    }
    report.finish()
}
