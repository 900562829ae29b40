use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::error::AppError;
use crate::pipeline::{convert, parse};

#[derive(Debug, Default)]
pub struct BatchReport {
    /// FIT files written, in input order.
    pub written: Vec<PathBuf>,
    /// Inputs that were not files or not valid GPX.
    pub skipped: Vec<PathBuf>,
    /// Inputs whose output could not be produced or stored.
    pub failed: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// All `*.gpx` files directly inside `dir`, sorted by name.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let dir_pattern = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&dir_pattern).join("*.gpx");

    let paths = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| AppError::Internal(format!("Invalid input pattern: {}", e)))?;

    let mut inputs = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => inputs.push(path),
            Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
        }
    }
    Ok(inputs)
}

/// Converts one GPX file and writes its FIT files next to it.
pub fn convert_path(path: &Path, time: DateTime<Utc>) -> Result<Vec<PathBuf>, AppError> {
    let bytes = std::fs::read(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse::parse(&bytes)?;

    tracing::info!(
        "Converting {} ({} routes, {} waypoints)",
        path.display(),
        document.routes.len(),
        document.waypoints.len()
    );

    let base_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let files = convert::convert_document(document, &base_name, time)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = path.with_file_name(&file.name);
        std::fs::write(&target, &file.bytes).map_err(|source| AppError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::info!("Wrote {} ({} bytes)", target.display(), file.bytes.len());
        written.push(target);
    }

    Ok(written)
}

/// Converts every input independently; one bad document never stops the rest.
pub fn run(inputs: &[PathBuf], time: DateTime<Utc>) -> BatchReport {
    let results: Vec<(&PathBuf, Option<Result<Vec<PathBuf>, AppError>>)> = inputs
        .par_iter()
        .map(|path| {
            if path.is_file() {
                (path, Some(convert_path(path, time)))
            } else {
                (path, None)
            }
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            None => {
                tracing::error!("{} is not a file", path.display());
                report.skipped.push(path.clone());
            }
            Some(Ok(written)) => report.written.extend(written),
            Some(Err(AppError::Parse(e))) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                report.skipped.push(path.clone());
            }
            Some(Err(e)) => {
                tracing::error!("Failed to convert {}: {}", path.display(), e);
                report.failed.push(path.clone());
            }
        }
    }

    report
}
