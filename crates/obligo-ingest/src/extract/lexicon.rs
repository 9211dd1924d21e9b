//! Obligation vocabulary and substring matching.
//!
//! Matching is plain containment on the lower-cased sentence, so a term hits
//! inside longer words too ("pay" in "repayment"). Recall over precision:
//! the anomaly threshold is the other half of the filter.

/// Obligation-signalling terms, lower case.
pub const OBLIGATION_TERMS: &[&str] = &[
    // Modal verbs
    "shall", "must", "should", "will", "has to", "have to", "had to",
    // Requirement
    "require", "requires", "required", "requirement", "be required to",
    "is required to", "are required to", "shall be required to",
    // Duty and obligation
    "duty", "duties", "obligation", "obligations", "obligated", "obligate",
    "is obligated to", "are obligated to", "undertake to", "undertakes to",
    // Compliance and conformance
    "comply", "complies", "complied", "compliance", "in compliance with",
    "conform", "conforms", "conformance", "in conformance with",
    "pursuant to", "in accordance with", "consistent with",
    // Affirmative duties
    "ensure", "ensures", "ensured", "warrant", "warrants", "guarantee",
    "guarantees", "guaranteed", "maintain", "maintains", "maintained",
    "submit", "submits", "submitted", "provide", "provides", "provided",
    "deliver", "delivers", "delivered", "furnish", "furnishes", "furnished",
    "obtain", "obtains", "obtained", "retain", "retains", "retained",
    "notify", "notifies", "notified", "report", "reports", "reported",
    "pay", "pays", "paid", "remit", "remits", "remitted",
    "perform", "performs", "performed", "carry out", "carries out", "carry-out",
    // Time pressure
    "no later than", "not later than", "within", "on or before",
    "prior to", "immediately", "promptly", "forthwith", "without delay",
    "as soon as practicable", "as soon as reasonably practicable",
    // Prohibitions
    "shall not", "must not", "may not", "is prohibited from",
    "are prohibited from", "is forbidden to", "are forbidden to",
    "prohibit", "prohibits", "prohibited", "ban", "bans", "banned",
    // Conditional triggers
    "upon receipt of", "upon request", "upon approval",
    "if requested", "if required", "where applicable",
    // Responsibility and liability
    "responsible for", "responsibility to", "liability to", "liable for",
    // Certification
    "certify", "certifies", "certified", "attest", "attests", "attested",
    // Inspection and audit
    "inspection", "inspect", "inspects", "inspected",
    "audit", "audits", "audited", "review", "reviews", "reviewed",
    // Record keeping
    "record", "records", "recorded", "record-keeping", "keep records of",
    "retain records", "retain documentation",
    // Financial
    "invoice", "invoices", "invoiced", "payable", "payment due",
    "fees due", "fee schedule", "cost recovery",
    // Environmental and safety duties
    "monitor", "monitors", "monitored", "measure", "measures", "measured",
    "mitigate", "mitigates", "mitigated", "protect", "protects", "protected",
    "safeguard", "safeguards", "secured", "compensate", "compensates",
    "compensated",
    // Catch-all triggers
    "as required by law", "as required herein", "as required under",
    "subject to", "subject to the following", "to the extent necessary",
];

/// True iff the sentence contains at least one obligation term.
pub fn is_obligation_like(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    OBLIGATION_TERMS.iter().any(|term| lower.contains(term))
}

/// All obligation terms found in the sentence, in vocabulary order.
pub fn matched_terms(sentence: &str) -> Vec<&'static str> {
    let lower = sentence.to_lowercase();
    OBLIGATION_TERMS
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .collect()
}
