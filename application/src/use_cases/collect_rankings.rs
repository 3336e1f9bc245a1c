//! Collect rankings use case
//!
//! Sends the ranking prompt to each judge in parallel and parses the JSON
//! replies into [`Ranking`]s mapped back onto response ids.

use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{ProgressNotifier, Stage};
use crate::use_cases::collect_responses::CollectionError;
use deliberate_domain::{PromptTemplate, Ranking, Response, find_response_ids, parse_ranking_reply};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Errors that can occur before any judge is queried
#[derive(Error, Debug)]
pub enum CollectRankingsError {
    #[error("Need at least 2 responses to rank, got {0}")]
    NotEnoughResponses(usize),

    #[error("No judges configured")]
    NoJudges,
}

/// Outcome of ranking collection: parsed rankings plus per-judge failures
#[derive(Debug, Clone, Default)]
pub struct RankingsOutcome {
    pub rankings: Vec<Ranking>,
    pub errors: Vec<CollectionError>,
}

/// Use case for collecting rankings from the judge panel
pub struct CollectRankingsUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
}

impl<G: LlmGateway + 'static> CollectRankingsUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Ask every judge to rank the responses, in parallel.
    ///
    /// A judge whose reply fails to parse lands in `errors` rather than
    /// producing a bogus ranking.
    pub async fn execute(
        &self,
        question_text: &str,
        responses: &[Response],
        judges: &[String],
        progress: &dyn ProgressNotifier,
    ) -> Result<RankingsOutcome, CollectRankingsError> {
        if responses.len() < 2 {
            return Err(CollectRankingsError::NotEnoughResponses(responses.len()));
        }
        if judges.is_empty() {
            return Err(CollectRankingsError::NoJudges);
        }

        info!(
            "Collecting rankings of {} responses from {} judges",
            responses.len(),
            judges.len()
        );
        progress.on_stage_start(Stage::Rankings, judges.len());

        let prompt = PromptTemplate::ranking_prompt(question_text, responses);
        let mut join_set = JoinSet::new();

        for judge in judges {
            let gateway = Arc::clone(&self.gateway);
            let judge = judge.clone();
            let prompt = prompt.clone();

            join_set.spawn(async move {
                let result = gateway.generate(&prompt, &judge).await;
                (judge, result)
            });
        }

        let mut outcome = RankingsOutcome::default();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((judge, Ok(reply))) => match parse_ranking_reply(&reply.content) {
                    Ok(parsed) => {
                        let response_ids = find_response_ids(&parsed.rankings, responses);
                        info!("Judge {} ranked {} responses", judge, response_ids.len());
                        progress.on_task_complete(Stage::Rankings, &judge, true);

                        let mut ranking = Ranking::new(judge, response_ids)
                            .with_confidence(parsed.confidence)
                            .automated();
                        if !parsed.reasoning.is_empty() {
                            ranking = ranking.with_reasoning(parsed.reasoning);
                        }
                        outcome.rankings.push(ranking);
                    }
                    Err(e) => {
                        warn!("Judge {} reply unparseable: {}", judge, e);
                        progress.on_task_complete(Stage::Rankings, &judge, false);
                        outcome.errors.push(CollectionError {
                            model: judge,
                            message: e.to_string(),
                            round: 1,
                        });
                    }
                },
                Ok((judge, Err(e))) => {
                    warn!("Judge {} failed: {}", judge, e);
                    progress.on_task_complete(Stage::Rankings, &judge, false);
                    outcome.errors.push(CollectionError {
                        model: judge,
                        message: e.to_string(),
                        round: 1,
                    });
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        progress.on_stage_complete(Stage::Rankings);
        Ok(outcome)
    }
}
