//! Multi-round deliberation use case
//!
//! Round 1 collects fresh answers; later rounds show each model the others'
//! answers and let it refine its own, stopping early once nobody changes.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{ProgressNotifier, Stage};
use crate::use_cases::collect_responses::{
    CollectResponsesUseCase, CollectionError, reply_to_response,
};
use deliberate_domain::{PromptTemplate, Response, check_convergence};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Result of a full deliberation: responses from every round, in round order
#[derive(Debug, Clone, Default)]
pub struct DeliberationOutcome {
    pub responses: Vec<Response>,
    pub errors: Vec<CollectionError>,
    pub rounds_completed: u32,
    pub converged: bool,
}

/// Use case for running a multi-round deliberation over a question
pub struct RunDeliberationUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> RunDeliberationUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Run up to `max_rounds` rounds of deliberation.
    ///
    /// A model that fails in one round simply drops out of the next; the
    /// deliberation keeps going with whoever is left. Convergence is checked
    /// after every round past the first.
    pub async fn execute(
        &self,
        question_text: &str,
        models: &[String],
        max_rounds: u32,
        progress: &dyn ProgressNotifier,
    ) -> DeliberationOutcome {
        let mut outcome = DeliberationOutcome::default();

        let initial = CollectResponsesUseCase::new(Arc::clone(&self.gateway))
            .execute(question_text, models, progress)
            .await;
        let mut previous_round = initial.responses.clone();
        outcome.responses = initial.responses;
        outcome.errors = initial.errors;
        outcome.rounds_completed = 1;

        if previous_round.is_empty() {
            warn!("No responses in round 1, skipping deliberation");
            return outcome;
        }

        for round in 2..=max_rounds {
            info!(
                "Deliberation round {} with {} models",
                round,
                previous_round.len()
            );
            progress.on_stage_start(Stage::Deliberation(round), previous_round.len());

            let current_round = self
                .run_round(question_text, &previous_round, round, &mut outcome, progress)
                .await;

            progress.on_stage_complete(Stage::Deliberation(round));
            outcome.rounds_completed = round;

            if current_round.is_empty() {
                warn!("Round {} produced no responses, stopping", round);
                break;
            }

            let converged = check_convergence(&current_round, &previous_round);
            outcome.responses.extend(current_round.iter().cloned());
            previous_round = current_round;

            if converged {
                info!("Converged after round {}", round);
                outcome.converged = true;
                break;
            }
        }

        outcome
    }

    /// One refinement round: every model from the previous round sees the
    /// others' answers alongside its own.
    async fn run_round(
        &self,
        question_text: &str,
        previous_round: &[Response],
        round: u32,
        outcome: &mut DeliberationOutcome,
        progress: &dyn ProgressNotifier,
    ) -> Vec<Response> {
        let mut join_set = JoinSet::new();

        for own in previous_round {
            let others: Vec<&Response> = previous_round
                .iter()
                .filter(|r| r.id != own.id)
                .collect();
            let prompt =
                PromptTemplate::deliberation_prompt(question_text, &own.content, &others);

            let gateway = Arc::clone(&self.gateway);
            let model = own.model.clone();
            let previous_id = own.id.clone();

            join_set.spawn(async move {
                let result = gateway.generate(&prompt, &model).await;
                (model, previous_id, result)
            });
        }

        let mut current_round = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((model, previous_id, Ok(reply))) => {
                    progress.on_task_complete(Stage::Deliberation(round), &model, true);
                    let mut response = reply_to_response(&model, reply, round);
                    response.metadata.previous_response = Some(previous_id);
                    current_round.push(response);
                }
                Ok((model, _, Err(e))) => {
                    warn!("Model {} failed in round {}: {}", model, round, e);
                    progress.on_task_complete(Stage::Deliberation(round), &model, false);
                    outcome.errors.push(CollectionError {
                        model,
                        message: e.to_string(),
                        round,
                    });
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        current_round
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, LlmReply, ModelInfo};
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Gateway whose models answer from a per-model script, one entry per call.
    struct ScriptedGateway {
        scripts: Mutex<std::collections::HashMap<String, Vec<String>>>,
    }

    impl ScriptedGateway {
        fn new(scripts: &[(&str, &[&str])]) -> Self {
            let map = scripts
                .iter()
                .map(|(model, replies)| {
                    (
                        model.to_string(),
                        replies.iter().rev().map(|s| s.to_string()).collect(),
                    )
                })
                .collect();
            Self {
                scripts: Mutex::new(map),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn generate(&self, _prompt: &str, model: &str) -> Result<LlmReply, GatewayError> {
            let mut scripts = self.scripts.lock().unwrap();
            let reply = scripts
                .get_mut(model)
                .and_then(|replies| replies.pop())
                .ok_or_else(|| GatewayError::ModelNotAvailable(model.to_string()))?;
            Ok(LlmReply {
                content: reply,
                tokens_input: 10,
                tokens_output: 10,
                latency_ms: 3,
                cost_usd: 0.0001,
                model_id: model.to_string(),
                provider: "fake".to_string(),
            })
        }

        async fn available_models(&self) -> Result<Vec<ModelInfo>, GatewayError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn test_stops_when_responses_stabilize() {
        // Both models repeat their round-2 answers in round 3
        let gateway = Arc::new(ScriptedGateway::new(&[
            ("m1", &["draft 1", "final", "final", "never asked"]),
            ("m2", &["draft 2", "settled", "settled", "never asked"]),
        ]));
        let use_case = RunDeliberationUseCase::new(gateway);

        let outcome = use_case
            .execute(
                "Q?",
                &["m1".to_string(), "m2".to_string()],
                5,
                &NoProgress,
            )
            .await;

        assert!(outcome.converged);
        assert_eq!(outcome.rounds_completed, 3);
        // 2 models x 3 rounds
        assert_eq!(outcome.responses.len(), 6);
    }

    #[tokio::test]
    async fn test_runs_to_max_rounds_without_convergence() {
        let gateway = Arc::new(ScriptedGateway::new(&[(
            "m1",
            &["v1", "v2", "v3"],
        )]));
        let use_case = RunDeliberationUseCase::new(gateway);

        let outcome = use_case
            .execute("Q?", &["m1".to_string()], 3, &NoProgress)
            .await;

        assert!(!outcome.converged);
        assert_eq!(outcome.rounds_completed, 3);
        assert_eq!(outcome.responses.len(), 3);
    }

    #[tokio::test]
    async fn test_later_rounds_link_previous_response() {
        let gateway = Arc::new(ScriptedGateway::new(&[("m1", &["v1", "v1"])]));
        let use_case = RunDeliberationUseCase::new(gateway);

        let outcome = use_case
            .execute("Q?", &["m1".to_string()], 2, &NoProgress)
            .await;

        let round1 = outcome.responses.iter().find(|r| r.round == 1).unwrap();
        let round2 = outcome.responses.iter().find(|r| r.round == 2).unwrap();
        assert_eq!(round1.metadata.previous_response, None);
        assert_eq!(
            round2.metadata.previous_response,
            Some(round1.id.clone())
        );
    }

    #[tokio::test]
    async fn test_failed_model_drops_out_of_next_round() {
        // m2's script runs dry after round 1
        let gateway = Arc::new(ScriptedGateway::new(&[
            ("m1", &["a", "b", "c"]),
            ("m2", &["only once"]),
        ]));
        let use_case = RunDeliberationUseCase::new(gateway);

        let outcome = use_case
            .execute(
                "Q?",
                &["m1".to_string(), "m2".to_string()],
                3,
                &NoProgress,
            )
            .await;

        let m2_rounds: Vec<u32> = outcome
            .responses
            .iter()
            .filter(|r| r.model == "m2")
            .map(|r| r.round)
            .collect();
        assert_eq!(m2_rounds, vec![1]);
        assert!(outcome.errors.iter().any(|e| e.model == "m2" && e.round == 2));
        // m1 keeps going alone
        assert!(outcome.responses.iter().any(|r| r.model == "m1" && r.round == 3));
    }

    #[tokio::test]
    async fn test_no_initial_responses_skips_deliberation() {
        let gateway = Arc::new(ScriptedGateway::new(&[]));
        let use_case = RunDeliberationUseCase::new(gateway);

        let outcome = use_case
            .execute("Q?", &["ghost".to_string()], 3, &NoProgress)
            .await;

        assert!(outcome.responses.is_empty());
        assert_eq!(outcome.rounds_completed, 1);
        assert!(!outcome.converged);
    }
}
