//! Obligo Ingest — document loading, text normalization, sentence
//! segmentation, and the per-sentence matchers (dates, obligation vocabulary).

pub mod extract;
pub mod file;
pub mod normalize;
pub mod segment;

pub use extract::dates::find_dates;
pub use extract::lexicon::{is_obligation_like, matched_terms};
pub use file::{load_text_dir, pdf_dir_to_text, Document};
pub use normalize::{clean, clean_folder};
pub use segment::{segment, segment_documents, Corpus, SentenceSegmenter, SentenceUnit};
