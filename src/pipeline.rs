use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::Batch;
use crate::content::{normalize, RecordReader};
use crate::error::{IngestError, IngestResult};
use crate::filename::parse_filename;
use crate::push::BatchSink;
use crate::timeline::reconstruct;

/// Marker identifying processable instrument log files.
pub const FILE_MARKER: &str = ".SIM";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub matched: usize,
    pub pushed: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Processes every matching file in `dir`, one at a time: parse filename,
/// decode content, reconstruct timestamps, push the batch, delete the file.
///
/// By default the first failing file aborts the run. With `keep_going` a
/// failing file is logged and left in place and the run continues; a delete
/// failure is fatal in both modes, since an undeletable file would be
/// re-ingested on every subsequent run.
pub fn run(dir: &Path, sink: &dyn BatchSink, keep_going: bool) -> Result<RunSummary> {
    let mut candidates: Vec<(PathBuf, String)> = Vec::new();
    let entries = fs::read_dir(dir)
        .map_err(|err| IngestError::filesystem(dir, err))
        .with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.map_err(|err| IngestError::filesystem(dir, err))?;
        let file_type = entry
            .file_type()
            .map_err(|err| IngestError::filesystem(entry.path(), err))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(FILE_MARKER) {
            candidates.push((entry.path(), name));
        }
    }
    // The directory listing is taken once, in ascending filename order;
    // files that appear afterwards wait for the next run.
    candidates.sort_by(|a, b| a.1.cmp(&b.1));

    let mut summary = RunSummary::default();
    for (path, name) in candidates {
        summary.matched += 1;
        match ingest_file(&path, &name, sink) {
            Ok(datapoints) => {
                summary.pushed += 1;
                fs::remove_file(&path)
                    .map_err(|err| IngestError::filesystem(&path, err))
                    .with_context(|| format!("failed to delete ingested file {name}"))?;
                summary.deleted += 1;
                tracing::info!(file = %name, datapoints, "ingested and removed");
            }
            Err(err) if keep_going => {
                tracing::error!(file = %name, error = %err, "skipping file");
                summary.failed += 1;
            }
            Err(err) => {
                return Err(anyhow::Error::from(err).context(format!("while processing {name}")));
            }
        }
    }

    tracing::info!(
        matched = summary.matched,
        pushed = summary.pushed,
        deleted = summary.deleted,
        failed = summary.failed,
        "run complete"
    );
    Ok(summary)
}

/// One full file cycle up to and including the push. The file handle is
/// released when the content has been read, before any deletion.
fn ingest_file(path: &Path, name: &str, sink: &dyn BatchSink) -> IngestResult<usize> {
    let token = parse_filename(name)?;
    let raw = fs::read_to_string(path).map_err(|err| IngestError::filesystem(path, err))?;
    let block = normalize(&raw);
    let records = RecordReader::new(&block)?;

    let mut batch = Batch::new(&token);
    for point in reconstruct(token.base, records) {
        batch.append(&point?);
    }
    tracing::debug!(file = %name, datapoints = batch.len(), "batch built");

    sink.push(&batch)?;
    Ok(batch.len())
}
