//! Pairwise comparison and Copeland's method

use super::{CandidateId, ScoreMap, distinct_candidates, zero_scores};
use crate::experiment::Ranking;

/// Position of `candidate` in a ranking's order (first occurrence).
pub(crate) fn position_of(order: &[String], candidate: &str) -> Option<usize> {
    order.iter().position(|c| c == candidate)
}

/// Count how many rankings prefer `c1` over `c2` and vice versa.
///
/// Rankings missing either candidate abstain from this pair; a candidate
/// listed earlier is preferred.
pub fn count_pairwise_preferences(rankings: &[Ranking], c1: &str, c2: &str) -> (usize, usize) {
    let mut c1_preferred = 0;
    let mut c2_preferred = 0;

    for ranking in rankings {
        if let (Some(pos1), Some(pos2)) = (
            position_of(&ranking.rankings, c1),
            position_of(&ranking.rankings, c2),
        ) {
            if pos1 < pos2 {
                c1_preferred += 1;
            } else if pos2 < pos1 {
                c2_preferred += 1;
            }
        }
    }

    (c1_preferred, c2_preferred)
}

/// Copeland's method: score = pairwise tournament victories.
///
/// Every unordered pair of distinct candidates is compared exactly once
/// across all rankings. The pairwise majority winner gets +1; a tie
/// (including 0-0 when no ranking mentions both) gives each +0.5.
///
/// A Condorcet winner, one that beats every other candidate head-to-head,
/// scores exactly n-1.
pub fn copeland_score(rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
    let mut wins = zero_scores(candidates);
    let distinct = distinct_candidates(candidates);

    for (i, c1) in distinct.iter().enumerate() {
        for c2 in &distinct[i + 1..] {
            let (c1_preferred, c2_preferred) = count_pairwise_preferences(rankings, c1, c2);

            if c1_preferred > c2_preferred {
                award(&mut wins, c1, 1.0);
            } else if c2_preferred > c1_preferred {
                award(&mut wins, c2, 1.0);
            } else {
                award(&mut wins, c1, 0.5);
                award(&mut wins, c2, 0.5);
            }
        }
    }

    wins
}

fn award(wins: &mut ScoreMap, candidate: &str, points: f64) {
    if let Some(score) = wins.get_mut(candidate) {
        *score += points;
    }
}
