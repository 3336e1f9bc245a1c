//! Collect responses use case
//!
//! Queries all council models for an initial answer in parallel. One model
//! failing never sinks the batch: failures are collected alongside the
//! successes and reported to the caller.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{ProgressNotifier, Stage};
use deliberate_domain::{PromptTemplate, Response, ResponseMetadata};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// A model that failed to produce a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionError {
    pub model: String,
    pub message: String,
    pub round: u32,
}

/// Outcome of a parallel collection: successes plus per-model failures
#[derive(Debug, Clone, Default)]
pub struct CollectionOutcome {
    pub responses: Vec<Response>,
    pub errors: Vec<CollectionError>,
}

/// Use case for collecting initial responses from the council
pub struct CollectResponsesUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> CollectResponsesUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Ask every model the question, in parallel.
    pub async fn execute(
        &self,
        question_text: &str,
        models: &[String],
        progress: &dyn ProgressNotifier,
    ) -> CollectionOutcome {
        info!("Collecting responses from {} models", models.len());
        progress.on_stage_start(Stage::Responses, models.len());

        let prompt = PromptTemplate::response_prompt(question_text);
        let mut join_set = JoinSet::new();

        for model in models {
            let gateway = Arc::clone(&self.gateway);
            let model = model.clone();
            let prompt = prompt.clone();

            join_set.spawn(async move {
                let result = gateway.generate(&prompt, &model).await;
                (model, result)
            });
        }

        let mut outcome = CollectionOutcome::default();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((model, Ok(reply))) => {
                    info!("Model {} responded", model);
                    progress.on_task_complete(Stage::Responses, &model, true);
                    outcome.responses.push(reply_to_response(&model, reply, 1));
                }
                Ok((model, Err(e))) => {
                    warn!("Model {} failed: {}", model, e);
                    progress.on_task_complete(Stage::Responses, &model, false);
                    outcome.errors.push(CollectionError {
                        model,
                        message: e.to_string(),
                        round: 1,
                    });
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_stage_complete(Stage::Responses);
        outcome
    }
}

/// Build an automated [`Response`] from a gateway reply.
pub(crate) fn reply_to_response(
    model: &str,
    reply: crate::ports::llm_gateway::LlmReply,
    round: u32,
) -> Response {
    Response::new(model, reply.content)
        .automated()
        .with_round(round)
        .with_metadata(ResponseMetadata {
            tokens_input: Some(reply.tokens_input),
            tokens_output: Some(reply.tokens_output),
            latency_ms: Some(reply.latency_ms),
            cost_usd: Some(reply.cost_usd),
            provider: Some(reply.provider),
            api_model: Some(reply.model_id),
            previous_response: None,
        })
}
