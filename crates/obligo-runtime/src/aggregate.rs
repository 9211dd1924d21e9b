//! Joins anomaly selection with the lexical test and groups survivors per document.

use obligo_ingest::{find_dates, is_obligation_like, matched_terms, Document, SentenceUnit};
use obligo_score::ScoredCorpus;
use tracing::{debug, warn};

use crate::types::{DocumentCandidates, ObligationCandidate};

/// Build one `DocumentCandidates` per input document, in input order.
///
/// A sentence survives iff its score is at or below the threshold and it
/// contains obligation vocabulary. `corpus` and `scored.scores` are aligned
/// by index.
pub fn aggregate(
    documents: &[Document],
    corpus: &[SentenceUnit],
    scored: &ScoredCorpus,
) -> Vec<DocumentCandidates> {
    if corpus.len() != scored.len() {
        warn!(
            "Corpus has {} sentences but {} scores; extra entries ignored",
            corpus.len(),
            scored.len()
        );
    }

    let mut grouped: Vec<DocumentCandidates> = documents
        .iter()
        .map(|d| DocumentCandidates {
            document: d.name.clone(),
            candidates: Vec::new(),
        })
        .collect();

    for (i, unit) in corpus.iter().enumerate().take(scored.len()) {
        if !scored.is_selected(i) || !is_obligation_like(&unit.text) {
            continue;
        }
        let Some(group) = grouped.get_mut(unit.document) else {
            warn!("Sentence refers to unknown document index {}", unit.document);
            continue;
        };
        debug!(
            "{}#{} matched {:?}",
            group.document,
            unit.position,
            matched_terms(&unit.text)
        );
        group.candidates.push(ObligationCandidate {
            sentence: unit.text.clone(),
            dates: find_dates(&unit.text),
        });
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(document: usize, position: usize, text: &str) -> SentenceUnit {
        SentenceUnit {
            document,
            text: text.to_string(),
            position,
        }
    }

    #[test]
    fn test_requires_both_tests() {
        let docs = vec![Document::new("a.txt", ""), Document::new("b.txt", "")];
        let corpus = vec![
            unit(0, 0, "Tenant shall pay rent by Aug 2nd, 2025"),
            unit(0, 1, "The sky is blue today over the bay"),
            unit(1, 0, "Landlord must repair the roof promptly"),
            unit(1, 1, "Supplier shall deliver goods on 03/04/2025"),
        ];
        let scored = ScoredCorpus {
            scores: vec![-0.3, -0.2, 0.1, -0.1],
            threshold: -0.1,
        };

        let out = aggregate(&docs, &corpus, &scored);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].document, "a.txt");
        assert_eq!(
            out[0].candidates,
            vec![ObligationCandidate {
                sentence: "Tenant shall pay rent by Aug 2nd, 2025".into(),
                dates: vec!["Aug 2nd, 2025".into()],
            }]
        );
        assert_eq!(out[1].candidates.len(), 1);
        assert_eq!(out[1].candidates[0].dates, vec!["03/04/2025"]);
    }

    #[test]
    fn test_every_document_gets_an_entry() {
        let docs = vec![
            Document::new("empty.txt", ""),
            Document::new("full.txt", ""),
        ];
        let corpus = vec![unit(1, 0, "Contractor shall submit the report")];
        let scored = ScoredCorpus {
            scores: vec![-0.5],
            threshold: 0.0,
        };
        let out = aggregate(&docs, &corpus, &scored);
        assert_eq!(out[0].document, "empty.txt");
        assert!(out[0].candidates.is_empty());
        assert_eq!(out[1].candidates.len(), 1);
    }

    #[test]
    fn test_preserves_sentence_order() {
        let docs = vec![Document::new("a.txt", "")];
        let corpus = vec![
            unit(0, 0, "First the tenant shall pay"),
            unit(0, 1, "Then the tenant must notify"),
        ];
        let scored = ScoredCorpus {
            scores: vec![-0.1, -0.2],
            threshold: 0.0,
        };
        let out = aggregate(&docs, &corpus, &scored);
        let sentences: Vec<&str> = out[0].candidates.iter().map(|c| c.sentence.as_str()).collect();
        assert_eq!(sentences, vec!["First the tenant shall pay", "Then the tenant must notify"]);
    }
}
