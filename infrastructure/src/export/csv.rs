//! CSV export for experiments
//!
//! Flattened views for spreadsheet analysis: one CSV of responses and one of
//! rankings. Fields are quoted per RFC 4180.

use deliberate_domain::{Experiment, Ranking};

/// Response content is truncated in the CSV to keep rows readable
const CONTENT_LIMIT: usize = 500;

/// Rankings wider than this lose their tail columns
const RANK_COLUMNS: usize = 10;

/// Export every response across the experiment, one row per response.
pub fn experiment_responses_csv(experiment: &Experiment) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &[
            "experiment_id",
            "experiment_name",
            "question_id",
            "question_text",
            "question_type",
            "response_id",
            "model",
            "round",
            "content",
            "tokens_input",
            "tokens_output",
            "cost_usd",
            "latency_ms",
            "source",
            "created_at",
        ],
    );

    for question in &experiment.questions {
        for response in &question.responses {
            let row = [
                experiment.id.clone(),
                experiment.name.clone(),
                question.id.clone(),
                question.text.clone(),
                question.question_type.to_string(),
                response.id.clone(),
                response.model.clone(),
                response.round.to_string(),
                truncate(&response.content, CONTENT_LIMIT),
                opt_string(response.metadata.tokens_input),
                opt_string(response.metadata.tokens_output),
                opt_string(response.metadata.cost_usd),
                opt_string(response.metadata.latency_ms),
                response.source.to_string(),
                response.created_at.to_rfc3339(),
            ];
            push_row(&mut out, &row.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    out
}

/// Export every ranking across the experiment, one row per ranking with
/// `rank_1..rank_10` columns.
pub fn experiment_rankings_csv(experiment: &Experiment) -> String {
    let mut header: Vec<String> = [
        "experiment_id",
        "experiment_name",
        "question_id",
        "question_text",
        "ranking_id",
        "judge",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for i in 1..=RANK_COLUMNS {
        header.push(format!("rank_{}", i));
    }
    header.extend(["confidence", "reasoning", "source", "created_at"].map(String::from));

    let mut out = String::new();
    push_row(&mut out, &header.iter().map(String::as_str).collect::<Vec<_>>());

    for question in &experiment.questions {
        for ranking in &question.rankings {
            let mut row = vec![
                experiment.id.clone(),
                experiment.name.clone(),
                question.id.clone(),
                question.text.clone(),
                ranking.id.clone(),
                ranking.judge.clone(),
            ];
            row.extend(rank_cells(ranking));
            row.push(ranking.confidence.to_string());
            row.push(ranking.reasoning.clone().unwrap_or_default());
            row.push(ranking.source.to_string());
            row.push(ranking.created_at.to_rfc3339());

            push_row(&mut out, &row.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    out
}

/// Fixed-width rank cells: truncated past RANK_COLUMNS, padded with blanks.
fn rank_cells(ranking: &Ranking) -> Vec<String> {
    let mut cells: Vec<String> = ranking
        .rankings
        .iter()
        .take(RANK_COLUMNS)
        .cloned()
        .collect();
    cells.resize(RANK_COLUMNS, String::new());
    cells
}

fn opt_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let head: String = text.chars().take(limit).collect();
        format!("{}...", head)
    }
}

fn push_row(out: &mut String, fields: &[&str]) {
    let escaped: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
    out.push_str(&escaped.join(","));
    out.push('\n');
}

/// RFC 4180: quote fields containing commas, quotes, or newlines; double any
/// embedded quotes.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deliberate_domain::{Question, QuestionType, Response};

    fn experiment_with_data() -> Experiment {
        let mut experiment = Experiment::new("test-run");
        let mut question = Question::new("What is 2+2, really?", QuestionType::Factual);
        question.responses.push(Response::new("gpt-4o", "It is 4"));
        question.responses.push(Response::new("claude", "Four"));
        let ids = question.candidate_ids();
        question
            .rankings
            .push(Ranking::new("judge-1", ids).with_reasoning("said \"four\" plainly"));
        experiment.questions.push(question);
        experiment
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn test_truncate_long_content() {
        let long = "x".repeat(600);
        let cell = truncate(&long, CONTENT_LIMIT);
        assert_eq!(cell.len(), CONTENT_LIMIT + 3);
        assert!(cell.ends_with("..."));

        assert_eq!(truncate("short", CONTENT_LIMIT), "short");
    }

    #[test]
    fn test_responses_csv_shape() {
        let csv = experiment_responses_csv(&experiment_with_data());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3); // header + 2 responses
        assert!(lines[0].starts_with("experiment_id,experiment_name"));
        // The question text contains a comma, so it must be quoted
        assert!(lines[1].contains("\"What is 2+2, really?\""));
        assert!(lines[1].contains("gpt-4o"));
    }

    #[test]
    fn test_rankings_csv_pads_rank_columns() {
        let csv = experiment_rankings_csv(&experiment_with_data());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("rank_1"));
        assert!(lines[0].contains("rank_10"));
        // 6 leading + 10 rank + 4 trailing columns; embedded quotes stay escaped
        assert!(lines[1].contains("judge-1"));
        assert!(lines[1].contains("\"\"four\"\""));
    }

    #[test]
    fn test_empty_experiment_exports_header_only() {
        let experiment = Experiment::new("empty");
        assert_eq!(experiment_responses_csv(&experiment).lines().count(), 1);
        assert_eq!(experiment_rankings_csv(&experiment).lines().count(), 1);
    }
}
