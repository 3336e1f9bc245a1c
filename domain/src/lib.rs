//! Domain layer for llm-deliberate
//!
//! This crate contains the experiment entities and the preference-aggregation
//! core. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council deliberation
//!
//! Several models answer the same question, then act as judges ranking each
//! other's answers. The rankings are combined into a consensus with voting
//! methods from social choice theory:
//!
//! - **Plurality**: count first-place votes only
//! - **Borda / Weighted Borda**: positional scoring over the full ranking
//! - **Copeland**: pairwise tournament victories
//! - **Ranked Pairs (Tideman)**: locked pairwise victories with cycle rejection
//!
//! ## Purity
//!
//! Everything under [`aggregation`] is a pure, stateless transform over its
//! arguments: no I/O, no shared mutable state, safe to call concurrently.

pub mod aggregation;
pub mod core;
pub mod deliberation;
pub mod experiment;
pub mod judging;
pub mod prompt;
pub mod util;

// Re-export commonly used types
pub use aggregation::{
    AggregationMethod, CandidateId, LockGraph, ScoreMap, agreement_matrix, borda_count,
    copeland_score, diversity_score, get_ranking, get_winner, method_agreement,
    pairwise_agreement, plurality, ranked_pairs, weighted_borda,
};
pub use core::error::DomainError;
pub use deliberation::check_convergence;
pub use experiment::{
    Experiment, Question, QuestionType, Ranking, Response, ResponseMetadata, Source,
};
pub use judging::{
    RankingReply, find_response_ids, parse_ranking_reply, rank_letter_to_index,
};
pub use prompt::PromptTemplate;
