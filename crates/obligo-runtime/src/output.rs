//! Per-document candidate files (`<stem>.json`).

use std::path::{Path, PathBuf};

use obligo_core::Result;
use tracing::{debug, info};

use crate::types::{DocumentCandidates, ObligationCandidate};

/// Write `<stem>.json` for every document, replacing earlier files.
///
/// Documents without candidates get an empty array so stale results from a
/// previous run never survive. Returns the written paths.
pub fn write_candidates(json_dir: &Path, documents: &[DocumentCandidates]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(json_dir)?;
    let mut written = Vec::with_capacity(documents.len());

    for doc in documents {
        let path = json_dir.join(format!("{}.json", doc.stem()));
        let json = serde_json::to_string_pretty(&doc.candidates)?;
        std::fs::write(&path, json)?;
        debug!("Wrote {} candidates to {}", doc.candidates.len(), path.display());
        written.push(path);
    }

    info!("Wrote {} candidate files to {}", written.len(), json_dir.display());
    Ok(written)
}

/// Read one candidate file back.
pub fn load_candidates(path: &Path) -> Result<Vec<ObligationCandidate>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
