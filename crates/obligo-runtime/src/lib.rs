//! Obligo Runtime — runs the detection pipeline end to end.
//!
//! Stages: extract text from PDFs, clean text files in place, detect
//! obligation candidates (normalize, segment, fit, score, aggregate) and
//! summarize the per-document candidate files.

pub mod aggregate;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod types;

pub use aggregate::aggregate;
pub use output::{load_candidates, write_candidates};
pub use pipeline::Pipeline;
pub use summarize::{events_file_name, summarize_dir, summarize_files};
pub use types::*;
