//! Prompt templates for the deliberation flow

use crate::experiment::Response;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Prompt for the initial answer to a question.
    pub fn response_prompt(question: &str) -> String {
        format!(
            r#"You are tasked with answering a question thoughtfully and thoroughly.

Question: {}

Please provide a clear, well-reasoned response."#,
            question
        )
    }

    /// Prompt asking a judge to rank the responses.
    ///
    /// Responses are labelled "Response A", "Response B", ... in order, and
    /// the judge is asked for JSON that [`crate::judging::parse_ranking_reply`]
    /// understands.
    pub fn ranking_prompt(question: &str, responses: &[Response]) -> String {
        let responses_formatted = responses
            .iter()
            .enumerate()
            .map(|(i, r)| format!("Response {}: {}", letter(i), r.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You are an expert evaluator tasked with ranking responses to a question.

Question: {}

Below are {} responses from different AI models:

{}

Please evaluate each response based on:
1. **Accuracy**: How correct and factually sound is the response?
2. **Completeness**: Does it fully address the question?
3. **Clarity**: Is the explanation clear and well-organized?
4. **Depth**: Does it show genuine insight and reasoning?

Provide your ranking from best to worst. Respond in valid JSON format (no markdown):
{{
  "rankings": ["Response A", "Response B", "Response C"],
  "confidence": 0.85,
  "reasoning": "Brief explanation of your ranking decisions"
}}

Important: The "rankings" array should contain the response letters (A, B, C, etc.) in order from best to worst.
Make sure the JSON is valid and can be parsed."#,
            question,
            responses.len(),
            responses_formatted
        )
    }

    /// Prompt asking a model to refine its answer after seeing the others'.
    pub fn deliberation_prompt(
        question: &str,
        previous_response: &str,
        other_responses: &[&Response],
    ) -> String {
        let others_formatted = other_responses
            .iter()
            .map(|r| format!("**{}**: {}", r.model, r.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            r#"You previously answered the following question:

Question: {}

Your previous response: {}

You now see responses from other models:

{}

Given these other perspectives, would you like to refine or modify your answer?
Consider if other models have made valid points you hadn't considered, identified errors in your reasoning, or provided complementary insights.

Please provide your updated response (or confirm your previous response if you still think it's best):"#,
            question, previous_response, others_formatted
        )
    }
}

/// 0 -> "A", 1 -> "B", ... wraps past "Z" into multi-letter labels rather
/// than producing garbage for absurdly large councils.
///
/// Inverted by [`crate::judging::rank_letter_to_index`].
pub(crate) fn letter(index: usize) -> String {
    let mut label = String::new();
    let mut i = index;
    loop {
        label.insert(0, (b'A' + (i % 26) as u8) as char);
        if i < 26 {
            break;
        }
        i = i / 26 - 1;
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_labels() {
        assert_eq!(letter(0), "A");
        assert_eq!(letter(2), "C");
        assert_eq!(letter(25), "Z");
        assert_eq!(letter(26), "AA");
    }

    #[test]
    fn test_ranking_prompt_labels_responses() {
        let responses = vec![
            Response::new("gpt-4o", "first answer"),
            Response::new("claude", "second answer"),
        ];
        let prompt = PromptTemplate::ranking_prompt("What is 2+2?", &responses);

        assert!(prompt.contains("Response A: first answer"));
        assert!(prompt.contains("Response B: second answer"));
        assert!(prompt.contains("2 responses"));
    }

    #[test]
    fn test_deliberation_prompt_includes_others() {
        let other = Response::new("claude", "peer answer");
        let prompt =
            PromptTemplate::deliberation_prompt("Q?", "my old answer", &[&other]);

        assert!(prompt.contains("my old answer"));
        assert!(prompt.contains("**claude**: peer answer"));
    }
}
