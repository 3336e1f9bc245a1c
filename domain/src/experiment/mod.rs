//! Experiment entities
//!
//! An [`Experiment`] groups questions; each [`Question`] collects model
//! [`Response`]s and judge [`Ranking`]s over those responses. These are the
//! value snapshots consumed by the aggregation core and persisted by the
//! storage adapter.

pub mod entities;

pub use entities::{
    Experiment, Question, QuestionType, Ranking, Response, ResponseMetadata, Source,
};
