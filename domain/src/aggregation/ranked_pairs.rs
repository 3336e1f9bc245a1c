//! Ranked Pairs (Tideman method) and its cycle-safe lock graph

use super::{CandidateId, ScoreMap, distinct_candidates, zero_scores};
use crate::experiment::Ranking;
use std::collections::{HashMap, HashSet, VecDeque};

/// A directed pairwise victory with its margin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginPair {
    pub winner: CandidateId,
    pub loser: CandidateId,
    /// Vote-count difference in the winner's favor (always positive)
    pub margin: u32,
}

/// Directed "defeats" relation that stays acyclic by construction.
///
/// Edges are only added through [`LockGraph::lock`] after a
/// [`LockGraph::would_create_cycle`] check, so the locked set always induces
/// a strict partial order over candidates.
#[derive(Debug, Default)]
pub struct LockGraph {
    edges: HashMap<CandidateId, HashSet<CandidateId>>,
}

impl LockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would adding `winner -> loser` close a directed cycle?
    ///
    /// Breadth-first reachability from `loser` toward `winner` through the
    /// locked edges.
    pub fn would_create_cycle(&self, winner: &str, loser: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(loser);

        while let Some(current) = queue.pop_front() {
            if current == winner {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(targets) = self.edges.get(current) {
                queue.extend(targets.iter().map(|t| t.as_str()));
            }
        }

        false
    }

    /// Add `winner -> loser` to the locked set.
    ///
    /// Callers must check [`Self::would_create_cycle`] first; locking an edge
    /// that closes a cycle would break the acyclicity invariant.
    pub fn lock(&mut self, winner: impl Into<CandidateId>, loser: impl Into<CandidateId>) {
        self.edges.entry(winner.into()).or_default().insert(loser.into());
    }

    /// Number of locked victories for a candidate (out-degree).
    pub fn victories(&self, candidate: &str) -> usize {
        self.edges.get(candidate).map_or(0, |targets| targets.len())
    }

    pub fn contains(&self, winner: &str, loser: &str) -> bool {
        self.edges
            .get(winner)
            .is_some_and(|targets| targets.contains(loser))
    }
}

/// Ranked Pairs (Tideman method).
///
/// 1. Tally, for every ordered candidate pair, how many rankings place the
///    first strictly before the second (rankings missing a candidate skip it,
///    it is not treated as tied-last).
/// 2. Turn each unordered pair with a non-zero margin into a directed
///    [`MarginPair`]; zero-margin pairs emit nothing.
/// 3. Sort pairs by margin descending. The sort is stable, so equal margins
///    keep pair-enumeration order (candidate pairs i < j over the supplied
///    candidate list), which makes the outcome reproducible.
/// 4. Lock pairs in order into a [`LockGraph`], skipping any that would
///    create a cycle.
///
/// The score reported per candidate is its count of locked victories. This
/// deliberately differs from canonical Tideman (which derives the unique
/// winner as the source of the locked graph): victory counts can tie where a
/// full topological order would not. Kept as-is for reproducibility of prior
/// results.
pub fn ranked_pairs(rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
    let pref = preference_tally(rankings, candidates);
    let mut pairs = margin_pairs(candidates, &pref);

    // Stable: equal margins keep enumeration order
    pairs.sort_by(|a, b| b.margin.cmp(&a.margin));

    let locked = lock_pairs(&pairs);

    let mut scores = zero_scores(candidates);
    for (candidate, score) in scores.iter_mut() {
        *score = locked.victories(candidate) as f64;
    }
    scores
}

/// Counts of rankings placing one candidate strictly before another.
///
/// Keyed by `(earlier, later)` candidate ids; only ids from the candidate
/// list are counted.
fn preference_tally(
    rankings: &[Ranking],
    candidates: &[CandidateId],
) -> HashMap<(CandidateId, CandidateId), u32> {
    let known: HashSet<&str> = candidates.iter().map(|c| c.as_str()).collect();
    let mut tally: HashMap<(CandidateId, CandidateId), u32> = HashMap::new();

    for ranking in rankings {
        for (i, c1) in ranking.rankings.iter().enumerate() {
            if !known.contains(c1.as_str()) {
                continue;
            }
            for c2 in &ranking.rankings[i + 1..] {
                if known.contains(c2.as_str()) {
                    *tally.entry((c1.clone(), c2.clone())).or_insert(0) += 1;
                }
            }
        }
    }

    tally
}

/// Directed pairs with positive margins, enumerated i < j over the candidate
/// list.
fn margin_pairs(
    candidates: &[CandidateId],
    tally: &HashMap<(CandidateId, CandidateId), u32>,
) -> Vec<MarginPair> {
    let distinct = distinct_candidates(candidates);
    let mut pairs = Vec::new();

    let count = |a: &CandidateId, b: &CandidateId| -> i64 {
        tally.get(&(a.clone(), b.clone())).copied().unwrap_or(0) as i64
    };

    for (i, &c1) in distinct.iter().enumerate() {
        for &c2 in &distinct[i + 1..] {
            let margin = count(c1, c2) - count(c2, c1);
            if margin > 0 {
                pairs.push(MarginPair {
                    winner: c1.clone(),
                    loser: c2.clone(),
                    margin: margin as u32,
                });
            } else if margin < 0 {
                pairs.push(MarginPair {
                    winner: c2.clone(),
                    loser: c1.clone(),
                    margin: (-margin) as u32,
                });
            }
        }
    }

    pairs
}

/// Lock pairs in order, skipping any that would create a cycle.
fn lock_pairs(pairs: &[MarginPair]) -> LockGraph {
    let mut locked = LockGraph::new();
    for pair in pairs {
        if !locked.would_create_cycle(&pair.winner, &pair.loser) {
            locked.lock(pair.winner.clone(), pair.loser.clone());
        }
    }
    locked
}
