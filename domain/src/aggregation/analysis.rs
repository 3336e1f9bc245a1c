//! Inter-judge agreement analysis
//!
//! Agreement matters for wisdom-of-crowds setups: too much of it can signal
//! herding or consensus bias, too little makes the aggregate noisy. These
//! functions characterize judge agreement independently of any scoring
//! method.

use super::method::AggregationMethod;
use super::pairwise::position_of;
use super::selection::get_winner;
use super::{CandidateId, distinct_candidates};
use crate::experiment::Ranking;
use std::collections::BTreeMap;

/// Judge-by-judge agreement matrix
pub type AgreementMatrix = BTreeMap<String, BTreeMap<String, f64>>;

/// Kendall-tau-like agreement between two rankings.
///
/// For every unordered candidate pair that both rankings place, checks
/// whether the two agree on relative order. Returns agreements divided by
/// comparable pairs, or 0.0 when no pair is comparable (never NaN).
pub fn pairwise_agreement(r1: &Ranking, r2: &Ranking, candidates: &[CandidateId]) -> f64 {
    let distinct = distinct_candidates(candidates);
    let mut agreements = 0u32;
    let mut comparisons = 0u32;

    for (i, &c1) in distinct.iter().enumerate() {
        for &c2 in &distinct[i + 1..] {
            let positions = (
                position_of(&r1.rankings, c1),
                position_of(&r1.rankings, c2),
                position_of(&r2.rankings, c1),
                position_of(&r2.rankings, c2),
            );
            if let (Some(p1_r1), Some(p2_r1), Some(p1_r2), Some(p2_r2)) = positions {
                let r1_prefers_c1 = p1_r1 < p2_r1;
                let r2_prefers_c1 = p1_r2 < p2_r2;
                if r1_prefers_c1 == r2_prefers_c1 {
                    agreements += 1;
                }
                comparisons += 1;
            }
        }
    }

    if comparisons > 0 {
        f64::from(agreements) / f64::from(comparisons)
    } else {
        0.0
    }
}

/// Pairwise agreement between every pair of judges.
///
/// Self-comparison (same ranking instance by id) is forced to 1.0 without
/// computing anything. The matrix is populated symmetrically by construction
/// since the underlying metric is symmetric.
pub fn agreement_matrix(rankings: &[Ranking], candidates: &[CandidateId]) -> AgreementMatrix {
    let mut matrix = AgreementMatrix::new();

    // Every judge gets a full row, zero-initialized
    for r1 in rankings {
        let row = matrix.entry(r1.judge.clone()).or_default();
        for r2 in rankings {
            row.entry(r2.judge.clone()).or_insert(0.0);
        }
    }

    for r1 in rankings {
        for r2 in rankings {
            let value = if r1.id == r2.id {
                1.0
            } else {
                pairwise_agreement(r1, r2, candidates)
            };
            if let Some(row) = matrix.get_mut(&r1.judge) {
                row.insert(r2.judge.clone(), value);
            }
        }
    }

    matrix
}

/// How diverse the rankings are: 1 minus average pairwise agreement.
///
/// Ranges over [0, 1], 0 = perfect agreement. Returns 0.0 when fewer than
/// two rankings are supplied or there are no judge pairs to average.
pub fn diversity_score(rankings: &[Ranking], candidates: &[CandidateId]) -> f64 {
    if rankings.len() < 2 {
        return 0.0;
    }

    let matrix = agreement_matrix(rankings, candidates);
    let judges: Vec<&String> = matrix.keys().collect();

    let mut total_agreement = 0.0;
    let mut count = 0u32;

    for (i, j1) in judges.iter().enumerate() {
        for j2 in &judges[i + 1..] {
            if let Some(value) = matrix.get(*j1).and_then(|row| row.get(*j2)) {
                total_agreement += *value;
                count += 1;
            }
        }
    }

    if count == 0 {
        return 0.0;
    }

    1.0 - total_agreement / f64::from(count)
}

/// Winner under each of the five aggregation methods.
///
/// Used to display unanimity (all methods agree) versus a split verdict.
pub fn method_agreement(
    rankings: &[Ranking],
    candidates: &[CandidateId],
) -> BTreeMap<AggregationMethod, CandidateId> {
    AggregationMethod::all()
        .into_iter()
        .map(|method| {
            let winner = get_winner(&method.score(rankings, candidates));
            (method, winner)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(ids: &[&str]) -> Vec<CandidateId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn ranking(judge: &str, order: &[&str]) -> Ranking {
        Ranking::new(judge, order.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_pairwise_agreement_identical_is_one() {
        let r1 = ranking("j1", &["a", "b", "c"]);
        let r2 = ranking("j2", &["a", "b", "c"]);
        assert_eq!(pairwise_agreement(&r1, &r2, &candidates(&["a", "b", "c"])), 1.0);
    }

    #[test]
    fn test_pairwise_agreement_reversed_is_zero() {
        let r1 = ranking("j1", &["a", "b", "c"]);
        let r2 = ranking("j2", &["c", "b", "a"]);
        assert_eq!(pairwise_agreement(&r1, &r2, &candidates(&["a", "b", "c"])), 0.0);
    }

    #[test]
    fn test_pairwise_agreement_partial_overlap() {
        // Only the a/b pair is ranked by both; they agree on it
        let r1 = ranking("j1", &["a", "b"]);
        let r2 = ranking("j2", &["a", "b", "c"]);
        assert_eq!(pairwise_agreement(&r1, &r2, &candidates(&["a", "b", "c"])), 1.0);
    }

    #[test]
    fn test_pairwise_agreement_no_comparable_pairs_is_zero() {
        let r1 = ranking("j1", &["a"]);
        let r2 = ranking("j2", &["b"]);
        assert_eq!(pairwise_agreement(&r1, &r2, &candidates(&["a", "b"])), 0.0);
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let rankings = vec![
            ranking("j1", &["a", "b", "c"]),
            ranking("j2", &["b", "a", "c"]),
            ranking("j3", &["c", "b", "a"]),
        ];
        let matrix = agreement_matrix(&rankings, &candidates(&["a", "b", "c"]));

        for r in &rankings {
            assert_eq!(matrix[&r.judge][&r.judge], 1.0);
        }
        for r1 in &rankings {
            for r2 in &rankings {
                let forward = matrix[&r1.judge][&r2.judge];
                let backward = matrix[&r2.judge][&r1.judge];
                assert_eq!(forward, backward);
                assert!((0.0..=1.0).contains(&forward));
            }
        }
    }

    #[test]
    fn test_diversity_zero_on_unanimity() {
        let rankings = vec![
            ranking("j1", &["a", "b", "c"]),
            ranking("j2", &["a", "b", "c"]),
            ranking("j3", &["a", "b", "c"]),
        ];
        assert_eq!(diversity_score(&rankings, &candidates(&["a", "b", "c"])), 0.0);
    }

    #[test]
    fn test_diversity_one_on_total_disagreement() {
        let rankings = vec![
            ranking("j1", &["a", "b"]),
            ranking("j2", &["b", "a"]),
        ];
        assert_eq!(diversity_score(&rankings, &candidates(&["a", "b"])), 1.0);
    }

    #[test]
    fn test_diversity_needs_two_rankings() {
        assert_eq!(diversity_score(&[], &candidates(&["a"])), 0.0);
        let one = vec![ranking("j1", &["a"])];
        assert_eq!(diversity_score(&one, &candidates(&["a"])), 0.0);
    }

    #[test]
    fn test_method_agreement_unanimous_case() {
        // "a" dominates everywhere, so every method should crown it
        let rankings = vec![
            ranking("j1", &["a", "b", "c"]),
            ranking("j2", &["a", "b", "c"]),
            ranking("j3", &["a", "c", "b"]),
        ];
        let winners = method_agreement(&rankings, &candidates(&["a", "b", "c"]));

        assert_eq!(winners.len(), 5);
        assert!(winners.values().all(|w| w == "a"));
    }
}
