//! Pipeline — drives each stage over the data directory.

use std::path::PathBuf;

use obligo_core::{Error, ObligoConfig, Result};
use obligo_ingest::{clean, clean_folder, load_text_dir, pdf_dir_to_text, Document, SentenceSegmenter};
use obligo_score::AnomalyScorer;
use obligo_summarize::Summarizer;
use tracing::info;

use crate::aggregate::aggregate;
use crate::output::write_candidates;
use crate::summarize::{summarize_dir, summarize_files};
use crate::types::{DocumentCandidates, RunReport, SummaryReport};

/// Top-level driver bound to one data directory and detection configuration.
pub struct Pipeline {
    config: ObligoConfig,
}

impl Pipeline {
    pub fn new(config: ObligoConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ObligoConfig {
        &self.config
    }

    /// Stage: `pdf/**/*.pdf` → `text/<stem>.txt`.
    ///
    /// A missing `pdf/` directory is not an error; there is simply nothing to extract.
    pub fn extract_text(&self) -> Result<Vec<PathBuf>> {
        let paths = &self.config.data_paths;
        if !paths.pdf.is_dir() {
            info!("No PDF directory at {}, skipping extraction", paths.pdf.display());
            return Ok(Vec::new());
        }
        pdf_dir_to_text(&paths.pdf, &paths.text)
    }

    /// Stage: normalize every `text/*.txt` in place.
    pub fn clean(&self) -> Result<usize> {
        let text_dir = &self.config.data_paths.text;
        if !text_dir.is_dir() {
            return Err(Error::Config(format!(
                "Text directory {} does not exist",
                text_dir.display()
            )));
        }
        clean_folder(text_dir, "txt")
    }

    /// Run detection over in-memory documents.
    ///
    /// Every document is normalized and segmented before the scorer is fitted
    /// on the whole corpus; scoring and aggregation follow the fit.
    pub fn detect_documents(&self, documents: Vec<Document>) -> Result<(Vec<DocumentCandidates>, RunReport)> {
        self.config.detection.validate()?;
        let documents: Vec<Document> = documents
            .into_iter()
            .map(|d| Document::new(d.name, clean(&d.text)))
            .collect();

        let detection = &self.config.detection;
        let corpus = SentenceSegmenter::new(detection.min_tokens).segment_documents(&documents);
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let sentences: Vec<&str> = corpus.iter().map(|u| u.text.as_str()).collect();
        let fitted = AnomalyScorer::new(detection).fit(&sentences)?;
        let scored = fitted.score(&sentences)?;

        let grouped = aggregate(&documents, &corpus, &scored);
        let report = RunReport {
            documents: documents.len(),
            sentences: corpus.len(),
            anomalous: scored.selected_count(),
            candidates: grouped.iter().map(|g| g.candidates.len()).sum(),
            threshold: scored.threshold,
        };

        info!(
            "Detection: {} documents, {} sentences, {} anomalous, {} candidates (threshold {:.6})",
            report.documents, report.sentences, report.anomalous, report.candidates, report.threshold
        );
        Ok((grouped, report))
    }

    /// Stage: `text/*.txt` → `text/json/<stem>.json`.
    pub fn detect(&self) -> Result<RunReport> {
        self.detect_and_write().map(|(report, _)| report)
    }

    /// Like [`Pipeline::detect`], also returning the candidate files written.
    pub fn detect_and_write(&self) -> Result<(RunReport, Vec<PathBuf>)> {
        let paths = &self.config.data_paths;
        let documents = load_text_dir(&paths.text)?;
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let (grouped, report) = self.detect_documents(documents)?;
        let written = write_candidates(&paths.json, &grouped)?;
        Ok((report, written))
    }

    /// Stage: `text/json/*.json` → `events/aiEvent<stem>.txt`.
    pub async fn summarize<S: Summarizer>(&self, summarizer: &S) -> Result<SummaryReport> {
        let paths = &self.config.data_paths;
        summarize_dir(&paths.json, &paths.events, summarizer).await
    }

    /// All stages in order.
    ///
    /// Only the candidate files written by this run are summarized; older
    /// files left in `text/json/` are ignored.
    pub async fn run<S: Summarizer>(&self, summarizer: &S) -> Result<(RunReport, SummaryReport)> {
        self.config.data_paths.ensure_dirs()?;
        self.extract_text()?;
        self.clean()?;
        let (detection, written) = self.detect_and_write()?;
        let summaries = summarize_files(&written, &self.config.data_paths.events, summarizer).await?;
        Ok((detection, summaries))
    }
}
