//! Application layer for llm-deliberate
//!
//! Use cases orchestrating the deliberation flow, and the ports they depend
//! on. Adapters for the ports (HTTP gateway, file storage, progress bars)
//! live in the infrastructure and presentation layers.

pub mod ports;
pub mod use_cases;

pub use ports::experiment_store::{ExperimentStore, ExperimentSummary, StoreError};
pub use ports::llm_gateway::{GatewayError, LlmGateway, LlmReply, ModelInfo};
pub use ports::progress::{NoProgress, ProgressNotifier, Stage};
pub use use_cases::collect_rankings::{CollectRankingsError, CollectRankingsUseCase, RankingsOutcome};
pub use use_cases::collect_responses::{CollectResponsesUseCase, CollectionError, CollectionOutcome};
pub use use_cases::compare_methods::{CompareError, CompareMethodsUseCase, MethodComparison, MethodResult};
pub use use_cases::run_deliberation::{DeliberationOutcome, RunDeliberationUseCase};
