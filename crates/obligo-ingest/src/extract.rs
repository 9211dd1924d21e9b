//! Per-sentence matchers used by candidate aggregation.
//!
//! Both are stateless and driven by static tables compiled once at first use.

pub mod dates;
pub mod lexicon;
