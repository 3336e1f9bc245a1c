//! Method comparison use case
//!
//! Runs every aggregation method over one question's rankings and reports the
//! per-method scores, winners, and how much the judges disagreed.

use deliberate_domain::aggregation::AgreementMatrix;
use deliberate_domain::{
    AggregationMethod, CandidateId, Question, ScoreMap, agreement_matrix, diversity_score,
    get_ranking, get_winner,
};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Question has no rankings to aggregate")]
    NoRankings,

    #[error("Need at least 2 responses to compare, got {0}")]
    NotEnoughResponses(usize),
}

/// One method's verdict over the rankings
#[derive(Debug, Clone)]
pub struct MethodResult {
    pub method: AggregationMethod,
    pub scores: ScoreMap,
    pub winner: CandidateId,
    /// Candidates sorted by score, best first
    pub ranking: Vec<CandidateId>,
}

/// All methods' verdicts plus cross-method and cross-judge agreement
#[derive(Debug, Clone)]
pub struct MethodComparison {
    pub results: Vec<MethodResult>,
    /// Did every method pick the same winner?
    pub unanimous: bool,
    pub agreement: AgreementMatrix,
    /// 0.0 = judges fully agree, 1.0 = maximal disagreement
    pub diversity: f64,
}

impl MethodComparison {
    pub fn result(&self, method: AggregationMethod) -> Option<&MethodResult> {
        self.results.iter().find(|r| r.method == method)
    }
}

/// Use case comparing all aggregation methods over a question
pub struct CompareMethodsUseCase;

impl CompareMethodsUseCase {
    /// Aggregate the question's rankings with every method.
    pub fn execute(&self, question: &Question) -> Result<MethodComparison, CompareError> {
        if question.rankings.is_empty() {
            return Err(CompareError::NoRankings);
        }
        if question.responses.len() < 2 {
            return Err(CompareError::NotEnoughResponses(question.responses.len()));
        }

        let candidates = question.candidate_ids();

        let results: Vec<MethodResult> = AggregationMethod::all()
            .into_iter()
            .map(|method| {
                let scores = method.score(&question.rankings, &candidates);
                let winner = get_winner(&scores);
                let ranking = get_ranking(&scores);
                debug!("{}: winner {}", method.label(), winner);
                MethodResult {
                    method,
                    scores,
                    winner,
                    ranking,
                }
            })
            .collect();

        let unanimous = results
            .windows(2)
            .all(|pair| pair[0].winner == pair[1].winner);

        Ok(MethodComparison {
            unanimous,
            agreement: agreement_matrix(&question.rankings, &candidates),
            diversity: diversity_score(&question.rankings, &candidates),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_domain::{QuestionType, Ranking, Response};

    fn question_with_rankings(orders: &[&[usize]]) -> Question {
        let mut question = Question::new("Q?", QuestionType::Reasoning);
        question.responses = vec![
            Response::new("m1", "answer one"),
            Response::new("m2", "answer two"),
            Response::new("m3", "answer three"),
        ];
        let ids = question.candidate_ids();
        question.rankings = orders
            .iter()
            .enumerate()
            .map(|(judge, order)| {
                Ranking::new(
                    format!("judge-{}", judge),
                    order.iter().map(|&i| ids[i].clone()).collect(),
                )
            })
            .collect();
        question
    }

    #[test]
    fn test_unanimous_winner_across_methods() {
        // Every judge prefers response 0
        let question = question_with_rankings(&[&[0, 1, 2], &[0, 2, 1], &[0, 1, 2]]);
        let comparison = CompareMethodsUseCase.execute(&question).unwrap();

        assert_eq!(comparison.results.len(), 5);
        assert!(comparison.unanimous);
        let expected = question.responses[0].id.clone();
        for result in &comparison.results {
            assert_eq!(result.winner, expected);
            assert_eq!(result.ranking[0], expected);
        }
    }

    #[test]
    fn test_split_judges_raise_diversity() {
        let agreed = question_with_rankings(&[&[0, 1, 2], &[0, 1, 2]]);
        let split = question_with_rankings(&[&[0, 1, 2], &[2, 1, 0]]);

        let low = CompareMethodsUseCase.execute(&agreed).unwrap().diversity;
        let high = CompareMethodsUseCase.execute(&split).unwrap().diversity;
        assert_eq!(low, 0.0);
        assert!(high > low);
    }

    #[test]
    fn test_agreement_matrix_covers_all_judges() {
        let question = question_with_rankings(&[&[0, 1, 2], &[1, 0, 2]]);
        let comparison = CompareMethodsUseCase.execute(&question).unwrap();

        assert_eq!(comparison.agreement.len(), 2);
        assert_eq!(comparison.agreement["judge-0"]["judge-0"], 1.0);
        assert_eq!(
            comparison.agreement["judge-0"]["judge-1"],
            comparison.agreement["judge-1"]["judge-0"]
        );
    }

    #[test]
    fn test_rejects_question_without_rankings() {
        let question = question_with_rankings(&[]);
        assert!(matches!(
            CompareMethodsUseCase.execute(&question),
            Err(CompareError::NoRankings)
        ));
    }

    #[test]
    fn test_rejects_single_response() {
        let mut question = Question::new("Q?", QuestionType::Reasoning);
        question.responses = vec![Response::new("m1", "only")];
        question.rankings = vec![Ranking::new("j", vec![question.responses[0].id.clone()])];

        assert!(matches!(
            CompareMethodsUseCase.execute(&question),
            Err(CompareError::NotEnoughResponses(1))
        ));
    }
}
