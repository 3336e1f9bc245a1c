//! Ranking reply parsing for judge responses.
//!
//! Pure domain logic: no I/O, no session handling, just text to structure.

use crate::core::error::DomainError;
use crate::experiment::Response;
use serde::Deserialize;

/// Parsed judge reply to the ranking prompt
#[derive(Debug, Clone, PartialEq)]
pub struct RankingReply {
    /// Response labels in order, best to worst (e.g., "Response A", "B")
    pub rankings: Vec<String>,
    /// Confidence clamped to [0, 1] at this boundary
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Deserialize)]
struct RawReply {
    #[serde(default)]
    rankings: Vec<String>,
    #[serde(default = "default_confidence")]
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

fn default_confidence() -> f64 {
    0.5
}

/// Parse a judge's JSON reply.
///
/// Accepts the JSON bare or wrapped in surrounding prose / a markdown code
/// fence (the first `{` to the last `}` is taken). Confidence is clamped to
/// [0, 1] here; the aggregation core applies it verbatim afterwards.
pub fn parse_ranking_reply(text: &str) -> Result<RankingReply, DomainError> {
    let start = text.find('{');
    let end = text.rfind('}');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if e > s => &text[s..=e],
        _ => {
            return Err(DomainError::RankingParse(format!(
                "no JSON object found in reply: {}",
                text.chars().take(80).collect::<String>()
            )));
        }
    };

    let raw: RawReply = serde_json::from_str(json_str)
        .map_err(|e| DomainError::RankingParse(e.to_string()))?;

    Ok(RankingReply {
        rankings: raw.rankings,
        confidence: raw.confidence.clamp(0.0, 1.0),
        reasoning: raw.reasoning,
    })
}

/// Convert a ranking token like "A" or "Response A" to a 0-based index.
///
/// Labels wrap past "Z" into multi-letter form ("AA" = 26, "AB" = 27), the
/// inverse of the prompt-side labelling. Returns `None` for anything that is
/// not all letters.
pub fn rank_letter_to_index(token: &str) -> Option<usize> {
    let letters = token
        .trim()
        .strip_prefix("Response ")
        .unwrap_or(token.trim())
        .trim()
        .to_uppercase();

    if letters.is_empty() {
        return None;
    }

    let mut index: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_uppercase() {
            return None;
        }
        index = index.checked_mul(26)?.checked_add(c as usize - 'A' as usize + 1)?;
    }
    Some(index - 1)
}

/// Map ranking labels onto response ids.
///
/// Labels that do not parse or index past the response list are skipped, so
/// the result may be shorter than the input (a partial ranking, which the
/// aggregation core tolerates).
pub fn find_response_ids(labels: &[String], responses: &[Response]) -> Vec<String> {
    labels
        .iter()
        .filter_map(|label| rank_letter_to_index(label))
        .filter_map(|idx| responses.get(idx).map(|r| r.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let reply = parse_ranking_reply(
            r#"{"rankings": ["Response B", "Response A"], "confidence": 0.9, "reasoning": "B was deeper"}"#,
        )
        .unwrap();

        assert_eq!(reply.rankings, vec!["Response B", "Response A"]);
        assert_eq!(reply.confidence, 0.9);
        assert_eq!(reply.reasoning, "B was deeper");
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = r#"Here is my evaluation:
```json
{"rankings": ["A", "B"], "confidence": 0.7, "reasoning": "close call"}
```
"#;
        let reply = parse_ranking_reply(text).unwrap();
        assert_eq!(reply.rankings, vec!["A", "B"]);
    }

    #[test]
    fn test_parse_clamps_confidence() {
        let reply =
            parse_ranking_reply(r#"{"rankings": ["A"], "confidence": 1.7}"#).unwrap();
        assert_eq!(reply.confidence, 1.0);

        let reply =
            parse_ranking_reply(r#"{"rankings": ["A"], "confidence": -0.3}"#).unwrap();
        assert_eq!(reply.confidence, 0.0);
    }

    #[test]
    fn test_parse_defaults() {
        let reply = parse_ranking_reply(r#"{"rankings": ["A"]}"#).unwrap();
        assert_eq!(reply.confidence, 0.5);
        assert_eq!(reply.reasoning, "");
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_ranking_reply("I think A is best").is_err());
        assert!(parse_ranking_reply("{not json}").is_err());
    }

    #[test]
    fn test_rank_letter_to_index() {
        assert_eq!(rank_letter_to_index("A"), Some(0));
        assert_eq!(rank_letter_to_index("c"), Some(2));
        assert_eq!(rank_letter_to_index("Response B"), Some(1));
        assert_eq!(rank_letter_to_index(" Response d "), Some(3));
        assert_eq!(rank_letter_to_index("1"), None);
        assert_eq!(rank_letter_to_index("A1"), None);
        assert_eq!(rank_letter_to_index(""), None);
    }

    #[test]
    fn test_rank_letter_round_trips_multi_letter_labels() {
        // Labels past "Z" wrap into two letters; the parser must invert the
        // prompt-side labelling exactly
        assert_eq!(rank_letter_to_index("Z"), Some(25));
        assert_eq!(rank_letter_to_index("AA"), Some(26));
        assert_eq!(rank_letter_to_index("Response AB"), Some(27));
        assert_eq!(rank_letter_to_index("az"), Some(51));
        assert_eq!(rank_letter_to_index("BA"), Some(52));
        for index in [0, 25, 26, 51, 52, 700] {
            assert_eq!(
                rank_letter_to_index(&crate::prompt::letter(index)),
                Some(index)
            );
        }
    }

    #[test]
    fn test_find_response_ids_skips_out_of_range() {
        let responses = vec![Response::new("m1", "x"), Response::new("m2", "y")];
        let labels = vec![
            "Response B".to_string(),
            "Z".to_string(), // index 25, out of range
            "A".to_string(),
            "??".to_string(),
        ];

        let ids = find_response_ids(&labels, &responses);
        assert_eq!(ids, vec![responses[1].id.clone(), responses[0].id.clone()]);
    }
}
