//! Winner and ranking extraction from score maps

use super::{CandidateId, ScoreMap};

/// The candidate with the highest score.
///
/// Ties break toward the first maximum in map iteration order, which for
/// [`ScoreMap`] is lexicographic over candidate ids and therefore
/// reproducible. An empty map yields the empty-string sentinel, not an error.
pub fn get_winner(scores: &ScoreMap) -> CandidateId {
    let mut best: Option<(&CandidateId, f64)> = None;

    for (candidate, &score) in scores {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }

    best.map(|(candidate, _)| candidate.clone()).unwrap_or_default()
}

/// All candidates sorted by score descending.
///
/// The sort is stable, so candidates with equal scores keep their map
/// iteration order relative to each other.
pub fn get_ranking(scores: &ScoreMap) -> Vec<CandidateId> {
    let mut entries: Vec<(&CandidateId, f64)> =
        scores.iter().map(|(c, &s)| (c, s)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.into_iter().map(|(c, _)| c.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(&str, f64)]) -> ScoreMap {
        entries.iter().map(|(c, s)| (c.to_string(), *s)).collect()
    }

    #[test]
    fn test_winner_is_max() {
        let scores = scores(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]);
        assert_eq!(get_winner(&scores), "b");
    }

    #[test]
    fn test_winner_tie_breaks_to_first_in_iteration_order() {
        let scores = scores(&[("b", 2.0), ("a", 2.0), ("c", 1.0)]);
        // BTreeMap iterates lexicographically: "a" before "b"
        assert_eq!(get_winner(&scores), "a");
    }

    #[test]
    fn test_winner_of_empty_map_is_sentinel() {
        assert_eq!(get_winner(&ScoreMap::new()), "");
    }

    #[test]
    fn test_ranking_sorts_descending() {
        let scores = scores(&[("a", 1.0), ("b", 3.0), ("c", 2.0)]);
        assert_eq!(get_ranking(&scores), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_ranking_stable_on_ties() {
        let scores = scores(&[("c", 2.0), ("a", 2.0), ("b", 5.0)]);
        assert_eq!(get_ranking(&scores), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_ranking_of_empty_map() {
        assert!(get_ranking(&ScoreMap::new()).is_empty());
    }
}
