//! Summarization stage: candidate files in, per-document event files out.

use std::path::{Path, PathBuf};

use obligo_core::{Error, Result};
use obligo_summarize::Summarizer;
use tracing::{debug, info, warn};

use crate::output::load_candidates;
use crate::types::SummaryReport;

/// `aiEvent<stem>.txt`
pub fn events_file_name(stem: &str) -> String {
    format!("aiEvent{stem}.txt")
}

/// Summarize every `*.json` candidate file in `json_dir` into `events_dir`.
pub async fn summarize_dir<S: Summarizer>(
    json_dir: &Path,
    events_dir: &Path,
    summarizer: &S,
) -> Result<SummaryReport> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(json_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    summarize_files(&files, events_dir, summarizer).await
}

/// Summarize the given candidate files, in order, into `events_dir`.
///
/// Candidates are sent one at a time. The first failed call abandons that
/// document (nothing is written for it) and the stage moves on to the next
/// one; failures are collected in the report.
pub async fn summarize_files<S: Summarizer>(
    files: &[PathBuf],
    events_dir: &Path,
    summarizer: &S,
) -> Result<SummaryReport> {
    tokio::fs::create_dir_all(events_dir).await?;

    let mut report = SummaryReport::default();
    for path in files {
        match summarize_file(path, events_dir, summarizer).await {
            Ok(count) => {
                report.documents += 1;
                report.summaries += count;
            }
            Err(e) => {
                warn!("{}", e);
                report.failures.push(e.to_string());
            }
        }
    }

    info!(
        "Summarized {} candidates across {} documents ({} failed)",
        report.summaries,
        report.documents,
        report.failures.len()
    );
    Ok(report)
}

async fn summarize_file<S: Summarizer>(path: &Path, events_dir: &Path, summarizer: &S) -> Result<usize> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Summarize(format!("unusable file name {}", path.display())))?;
    let candidates = load_candidates(path)?;

    let mut body = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let summary = summarizer
            .summarize(&candidate.summary_input())
            .await
            .map_err(|e| Error::Summarize(format!("{} candidate {}: {}", stem, i + 1, e)))?;
        debug!("{} candidate {} summarized ({} chars)", stem, i + 1, summary.len());
        body.push_str(&summary);
        body.push_str("\n\n");
    }

    let out = events_dir.join(events_file_name(stem));
    tokio::fs::write(&out, body).await?;
    debug!("Wrote {}", out.display());
    Ok(candidates.len())
}
