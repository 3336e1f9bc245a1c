//! Use cases orchestrating the deliberation flow

pub mod collect_rankings;
pub mod collect_responses;
pub mod compare_methods;
pub mod run_deliberation;
