//! Closed enumeration of the aggregation methods

use super::{CandidateId, ScoreMap, copeland_score};
use super::{borda_count, plurality, ranked_pairs, weighted_borda};
use crate::core::error::DomainError;
use crate::experiment::Ranking;
use serde::{Deserialize, Serialize};

/// One of the five supported aggregation methods
///
/// A closed enum rather than a name-to-function map, so method dispatch is
/// exhaustiveness-checked at compile time.
///
/// # Example
///
/// ```
/// use deliberate_domain::AggregationMethod;
///
/// let method: AggregationMethod = "ranked_pairs".parse().unwrap();
/// assert_eq!(method, AggregationMethod::RankedPairs);
/// assert_eq!(method.to_string(), "ranked_pairs");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    Plurality,
    #[default]
    Borda,
    WeightedBorda,
    Copeland,
    RankedPairs,
}

impl AggregationMethod {
    /// All methods, in display order.
    pub const fn all() -> [AggregationMethod; 5] {
        [
            AggregationMethod::Plurality,
            AggregationMethod::Borda,
            AggregationMethod::WeightedBorda,
            AggregationMethod::Copeland,
            AggregationMethod::RankedPairs,
        ]
    }

    /// Score the candidates under this method.
    pub fn score(&self, rankings: &[Ranking], candidates: &[CandidateId]) -> ScoreMap {
        match self {
            AggregationMethod::Plurality => plurality(rankings, candidates),
            AggregationMethod::Borda => borda_count(rankings, candidates),
            AggregationMethod::WeightedBorda => weighted_borda(rankings, candidates),
            AggregationMethod::Copeland => copeland_score(rankings, candidates),
            AggregationMethod::RankedPairs => ranked_pairs(rankings, candidates),
        }
    }

    /// Human-readable label for tables and reports.
    pub fn label(&self) -> &'static str {
        match self {
            AggregationMethod::Plurality => "Plurality",
            AggregationMethod::Borda => "Borda Count",
            AggregationMethod::WeightedBorda => "Weighted Borda",
            AggregationMethod::Copeland => "Copeland",
            AggregationMethod::RankedPairs => "Ranked Pairs",
        }
    }
}

impl std::fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AggregationMethod::Plurality => "plurality",
            AggregationMethod::Borda => "borda",
            AggregationMethod::WeightedBorda => "weighted_borda",
            AggregationMethod::Copeland => "copeland",
            AggregationMethod::RankedPairs => "ranked_pairs",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for AggregationMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plurality" => Ok(AggregationMethod::Plurality),
            "borda" => Ok(AggregationMethod::Borda),
            "weighted_borda" | "weighted-borda" => Ok(AggregationMethod::WeightedBorda),
            "copeland" => Ok(AggregationMethod::Copeland),
            "ranked_pairs" | "ranked-pairs" => Ok(AggregationMethod::RankedPairs),
            _ => Err(DomainError::UnknownMethod(s.to_string())),
        }
    }
}
