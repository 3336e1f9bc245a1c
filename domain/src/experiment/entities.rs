//! Experiment, question, response, and ranking entities

use crate::util::short_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a question, used to pick evaluation criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Factual,
    #[default]
    Reasoning,
    Subjective,
    Creative,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuestionType::Factual => write!(f, "factual"),
            QuestionType::Reasoning => write!(f, "reasoning"),
            QuestionType::Subjective => write!(f, "subjective"),
            QuestionType::Creative => write!(f, "creative"),
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "factual" => Ok(QuestionType::Factual),
            "reasoning" => Ok(QuestionType::Reasoning),
            "subjective" => Ok(QuestionType::Subjective),
            "creative" => Ok(QuestionType::Creative),
            _ => Err(format!(
                "Unknown question type: {} (expected factual, reasoning, subjective, creative)",
                s
            )),
        }
    }
}

/// Whether an entity was entered by hand or produced through the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Manual,
    Automated,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Manual => write!(f, "manual"),
            Source::Automated => write!(f, "automated"),
        }
    }
}

/// Per-call accounting attached to an automated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_input: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_output: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_model: Option<String>,
    /// Id of the response this one refined (deliberation rounds 2+)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_response: Option<String>,
}

/// A single model's answer to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: String,
    /// Model that produced the answer (e.g., "openai/gpt-4o")
    pub model: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: ResponseMetadata,
    #[serde(default)]
    pub source: Source,
    /// Deliberation round (1 = initial, 2+ = refined)
    #[serde(default = "default_round")]
    pub round: u32,
}

fn default_round() -> u32 {
    1
}

impl Response {
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            model: model.into(),
            content: content.into(),
            created_at: Utc::now(),
            metadata: ResponseMetadata::default(),
            source: Source::Manual,
            round: 1,
        }
    }

    pub fn automated(mut self) -> Self {
        self.source = Source::Automated;
        self
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// One judge's ordered preference over responses
///
/// The `rankings` list holds response ids best-to-worst. It may be partial,
/// and malformed input (duplicates, unknown ids) is tolerated by the
/// aggregation core rather than rejected here.
///
/// # Example
///
/// ```
/// use deliberate_domain::Ranking;
///
/// let ranking = Ranking::new("claude-3.5-sonnet", vec!["r1".into(), "r2".into()])
///     .with_confidence(0.8);
/// assert_eq!(ranking.judge, "claude-3.5-sonnet");
/// assert_eq!(ranking.confidence, 0.8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Identity of this ranking instance (a judge may submit several)
    pub id: String,
    /// The model doing the judging
    pub judge: String,
    /// Response ids in order, best to worst
    pub rankings: Vec<String>,
    /// Self-reported certainty, intended to lie in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// The judge's explanation, if it gave one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub source: Source,
}

fn default_confidence() -> f64 {
    1.0
}

impl Ranking {
    pub fn new(judge: impl Into<String>, rankings: Vec<String>) -> Self {
        Self {
            id: short_id(),
            judge: judge.into(),
            rankings,
            confidence: 1.0,
            reasoning: None,
            created_at: Utc::now(),
            source: Source::Manual,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }

    pub fn automated(mut self) -> Self {
        self.source = Source::Automated;
        self
    }
}

/// A question with its responses and rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    /// Expected answer, for factual/reasoning questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    #[serde(default)]
    pub responses: Vec<Response>,
    #[serde(default)]
    pub rankings: Vec<Ranking>,
    pub created_at: DateTime<Utc>,
    /// Maximum deliberation rounds for this question
    #[serde(default = "default_round")]
    pub max_rounds: u32,
    #[serde(default = "default_round")]
    pub current_round: u32,
}

impl Question {
    pub fn new(text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            id: short_id(),
            text: text.into(),
            question_type,
            ground_truth: None,
            responses: Vec::new(),
            rankings: Vec::new(),
            created_at: Utc::now(),
            max_rounds: 1,
            current_round: 1,
        }
    }

    pub fn with_ground_truth(mut self, truth: impl Into<String>) -> Self {
        self.ground_truth = Some(truth.into());
        self
    }

    pub fn response(&self, response_id: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.id == response_id)
    }

    pub fn response_by_model(&self, model: &str) -> Option<&Response> {
        self.responses.iter().find(|r| r.model == model)
    }

    /// Candidate ids for aggregation: the ids of all responses, in insertion
    /// order.
    pub fn candidate_ids(&self) -> Vec<String> {
        self.responses.iter().map(|r| r.id.clone()).collect()
    }

    /// Responses from the latest deliberation round only.
    pub fn latest_round_responses(&self) -> Vec<&Response> {
        let latest = self.responses.iter().map(|r| r.round).max().unwrap_or(1);
        self.responses.iter().filter(|r| r.round == latest).collect()
    }
}

/// A collection of questions for one deliberation experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    /// Council: models that answer and judge
    #[serde(default)]
    pub models: Vec<String>,
}

impl Experiment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: short_id(),
            name: name.into(),
            description: None,
            questions: Vec::new(),
            created_at: Utc::now(),
            models: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    pub fn question_mut(&mut self, question_id: &str) -> Option<&mut Question> {
        self.questions.iter_mut().find(|q| q.id == question_id)
    }
}
