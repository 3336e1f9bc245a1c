//! Preference aggregation core
//!
//! Voting and ranking aggregation methods from social choice theory, adapted
//! for council deliberation. Every function here is a pure transform over a
//! slice of [`Ranking`]s and a candidate list: no I/O, no state, reentrant.
//!
//! # Methods
//!
//! | Method | Idea | Module |
//! |--------|------|--------|
//! | Plurality | first-place votes only | [`positional`] |
//! | Borda | positional scoring | [`positional`] |
//! | Weighted Borda | Borda x judge confidence | [`positional`] |
//! | Copeland | pairwise tournament wins | [`pairwise`] |
//! | Ranked Pairs | locked victories, cycles rejected | [`ranked_pairs`] |
//!
//! # Input tolerance
//!
//! Malformed-but-well-typed input never panics: empty ranking lists, empty
//! candidate lists, partial rankings, duplicated or unknown candidate ids,
//! and out-of-range confidences all produce a best-effort numeric result.
//! Returned score maps always contain exactly one entry per supplied
//! candidate.
//!
//! References:
//! - Borda Count: <https://en.wikipedia.org/wiki/Borda_count>
//! - Copeland: <https://en.wikipedia.org/wiki/Copeland%27s_method>
//! - Ranked Pairs (Tideman): <https://en.wikipedia.org/wiki/Ranked_pairs>

pub mod analysis;
pub mod method;
pub mod pairwise;
pub mod positional;
pub mod ranked_pairs;
pub mod selection;

pub use analysis::{
    AgreementMatrix, agreement_matrix, diversity_score, method_agreement, pairwise_agreement,
};
pub use method::AggregationMethod;
pub use pairwise::copeland_score;
pub use positional::{borda_count, plurality, weighted_borda};
pub use ranked_pairs::{LockGraph, ranked_pairs};
pub use selection::{get_ranking, get_winner};

use std::collections::BTreeMap;

/// Opaque identifier of one candidate answer
pub type CandidateId = String;

/// Per-candidate scores produced by an aggregation method
///
/// A `BTreeMap` so that iteration order (and with it the winner tie-break in
/// [`get_winner`]) is deterministic across runs.
pub type ScoreMap = BTreeMap<CandidateId, f64>;

/// Build a score map with an entry for every candidate, all zero.
///
/// Duplicates in the input collapse into a single entry.
pub(crate) fn zero_scores(candidates: &[CandidateId]) -> ScoreMap {
    candidates.iter().map(|c| (c.clone(), 0.0)).collect()
}

/// Candidates with duplicates removed, preserving first-occurrence order.
///
/// Pairwise methods enumerate unordered candidate pairs over this list, so
/// its order also fixes the deterministic tie-break when sorting equal-margin
/// pairs.
pub(crate) fn distinct_candidates(candidates: &[CandidateId]) -> Vec<&CandidateId> {
    let mut seen = std::collections::HashSet::new();
    candidates.iter().filter(|c| seen.insert(c.as_str())).collect()
}
