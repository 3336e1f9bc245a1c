//! Positional voting methods: plurality, Borda, confidence-weighted Borda

use super::{CandidateId, ScoreMap, zero_scores};
use crate::experiment::Ranking;

/// Simple plurality voting: count first-place votes.
///
/// Each non-empty ranking's top choice gets 1 point. First-place ids outside
/// the candidate list are dropped silently; the returned map always covers
/// exactly the supplied candidates.
pub fn plurality(rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
    let mut scores = zero_scores(candidates);

    for ranking in rankings {
        if let Some(first) = ranking.rankings.first()
            && let Some(score) = scores.get_mut(first)
        {
            *score += 1.0;
        }
    }

    scores
}

/// Borda count: positional scoring over the full ranking.
///
/// With n candidates, position p (0-indexed) earns `n - 1 - p` points, so
/// first place gets n-1 and last place 0. Points for ids outside the
/// candidate list are discarded, not redistributed; candidates a ranking
/// omits get nothing from it.
///
/// Borda uses all preference information and approximates a maximum
/// likelihood estimate of a latent quality ordering, which is why it serves
/// as the default method.
pub fn borda_count(rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
    weighted_positional(rankings, candidates, |_| 1.0)
}

/// Confidence-weighted Borda count.
///
/// Identical to [`borda_count`] except each ranking's points are multiplied
/// by its `confidence` verbatim. Confidences outside [0, 1] (or negative) are
/// applied as-is; clamping is the ingestion boundary's job.
pub fn weighted_borda(rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
    weighted_positional(rankings, candidates, |r| r.confidence)
}

fn weighted_positional(
    rankings: &[Ranking],
    candidates: &[CandidateId],
    weight: impl Fn(&Ranking) -> f64,
) -> ScoreMap {
    let mut scores = zero_scores(candidates);
    let n = scores.len() as f64;

    for ranking in rankings {
        let w = weight(ranking);
        for (position, candidate) in ranking.rankings.iter().enumerate() {
            if let Some(score) = scores.get_mut(candidate) {
                // f64 arithmetic: a malformed ranking longer than n entries
                // yields negative points rather than an underflow
                *score += (n - 1.0 - position as f64) * w;
            }
        }
    }

    scores
}
