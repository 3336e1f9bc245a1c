//! Console output formatter for experiments and method comparisons

use colored::Colorize;
use deliberate_application::{ExperimentSummary, MethodComparison};
use deliberate_domain::{Experiment, Question};
use std::collections::HashMap;

/// Formats experiment data for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the experiment listing as a table.
    pub fn experiment_list(summaries: &[ExperimentSummary]) -> String {
        if summaries.is_empty() {
            return "No experiments found.\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<10} {:<30} {:<10}\n",
            "ID".bold(),
            "Name".bold(),
            "Questions".bold()
        ));
        output.push_str(&format!("{}\n", "-".repeat(52)));
        for summary in summaries {
            output.push_str(&format!(
                "{:<10} {:<30} {:<10}\n",
                summary.id,
                clip(&summary.name, 28),
                summary.question_count
            ));
        }
        output
    }

    /// Format one experiment with its questions and response overviews.
    pub fn experiment_details(experiment: &Experiment) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n",
            "Experiment:".cyan().bold(),
            experiment.name
        ));
        output.push_str(&format!("   ID: {}\n", experiment.id));
        output.push_str(&format!(
            "   Description: {}\n",
            experiment.description.as_deref().unwrap_or("(none)")
        ));
        output.push_str(&format!("   Created: {}\n", experiment.created_at.to_rfc3339()));
        output.push_str(&format!(
            "\n   Questions ({}):\n",
            experiment.questions.len()
        ));

        for question in &experiment.questions {
            output.push_str(&format!(
                "\n   [{}] {}\n",
                question.id.yellow(),
                clip(&question.text, 60)
            ));
            output.push_str(&format!(
                "       Type: {} | Responses: {} | Rankings: {}\n",
                question.question_type,
                question.responses.len(),
                question.rankings.len()
            ));
            if let Some(truth) = &question.ground_truth {
                output.push_str(&format!("       Ground truth: {}\n", truth));
            }

            for response in &question.responses {
                output.push_str(&format!(
                    "       - {} ({}): {}\n",
                    response.model.bold(),
                    response.id,
                    clip(&response.content, 40)
                ));
            }
        }

        output
    }

    /// Format a method comparison: per-method score bars, winner markers,
    /// unanimity status, and the diversity line.
    pub fn comparison(question: &Question, comparison: &MethodComparison) -> String {
        let id_to_model: HashMap<&str, &str> = question
            .responses
            .iter()
            .map(|r| (r.id.as_str(), r.model.as_str()))
            .collect();
        let display = |id: &str| id_to_model.get(id).copied().unwrap_or(id).to_string();

        let mut output = String::new();
        output.push_str(&format!(
            "\n{} {}\n",
            "Comparison for:".cyan().bold(),
            clip(&question.text, 60)
        ));
        output.push_str(&format!(
            "   Responses: {} | Rankings: {}\n\n",
            question.responses.len(),
            question.rankings.len()
        ));

        for result in &comparison.results {
            output.push_str(&format!("   {}:\n", result.method.label().bold()));
            for candidate in &result.ranking {
                let score = result.scores.get(candidate).copied().unwrap_or(0.0);
                let marker = if *candidate == result.winner {
                    " <- winner".green().to_string()
                } else {
                    String::new()
                };
                output.push_str(&format!(
                    "      {:<20} {:>5.1} {}{}\n",
                    display(candidate),
                    score,
                    score_bar(score),
                    marker
                ));
            }
            output.push('\n');
        }

        if comparison.unanimous {
            let winner = comparison
                .results
                .first()
                .map(|r| display(&r.winner))
                .unwrap_or_default();
            output.push_str(&format!(
                "   {} All methods agree on {}\n",
                "UNANIMOUS:".green().bold(),
                winner.bold()
            ));
        } else {
            output.push_str(&format!("   {} Methods disagree\n", "SPLIT:".yellow().bold()));
            for result in &comparison.results {
                output.push_str(&format!(
                    "      {}: {}\n",
                    result.method.label(),
                    display(&result.winner)
                ));
            }
        }

        output.push_str(&format!(
            "\n   Diversity score: {:.2} (0=agreement, 1=disagreement)\n",
            comparison.diversity
        ));

        if let Some(truth) = &question.ground_truth {
            output.push_str(&format!("\n   Ground truth: {}\n", truth));
        }

        output
    }
}

/// Horizontal bar sized to the score; negative scores get no bar.
fn score_bar(score: f64) -> String {
    if score > 0.0 {
        "█".repeat((score * 2.0) as usize)
    } else {
        String::new()
    }
}

fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_application::CompareMethodsUseCase;
    use deliberate_domain::{QuestionType, Ranking, Response};

    fn ranked_question() -> Question {
        let mut question = Question::new("Capital of Australia?", QuestionType::Factual);
        question.responses = vec![
            Response::new("gpt-4o", "Canberra"),
            Response::new("claude", "Sydney"),
        ];
        let ids = question.candidate_ids();
        question.rankings = vec![
            Ranking::new("judge-1", vec![ids[0].clone(), ids[1].clone()]),
            Ranking::new("judge-2", vec![ids[0].clone(), ids[1].clone()]),
        ];
        question
    }

    #[test]
    fn test_comparison_shows_models_not_ids() {
        colored::control::set_override(false);
        let question = ranked_question();
        let comparison = CompareMethodsUseCase.execute(&question).unwrap();

        let output = ConsoleFormatter::comparison(&question, &comparison);
        assert!(output.contains("gpt-4o"));
        assert!(output.contains("UNANIMOUS"));
        assert!(output.contains("Diversity score: 0.00"));
        // Raw response ids should not leak into the table
        for response in &question.responses {
            assert!(!output.contains(&format!("      {:<20}", response.id)));
        }
    }

    #[test]
    fn test_experiment_list_empty() {
        assert!(ConsoleFormatter::experiment_list(&[]).contains("No experiments"));
    }

    #[test]
    fn test_experiment_details_mentions_questions() {
        colored::control::set_override(false);
        let mut experiment = Experiment::new("capitals");
        experiment.questions.push(ranked_question());

        let output = ConsoleFormatter::experiment_details(&experiment);
        assert!(output.contains("capitals"));
        assert!(output.contains("Capital of Australia?"));
        assert!(output.contains("Responses: 2 | Rankings: 2"));
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(2.0), "████");
        assert_eq!(score_bar(0.0), "");
        assert_eq!(score_bar(-1.0), "");
    }
}
