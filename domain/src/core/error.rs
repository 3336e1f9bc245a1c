//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Unknown aggregation method: {0} (expected plurality, borda, weighted_borda, copeland, ranked_pairs)")]
    UnknownMethod(String),

    #[error("Could not parse ranking reply: {0}")]
    RankingParse(String),
}
