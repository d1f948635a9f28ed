//! Extraction of structured FAQ pairs from an assistant's reply.
//!
//! Assistants asked for JSON routinely wrap it in a markdown code fence,
//! so the payload arrives as free text like:
//!
//! ````text
//! ```json
//! [{"question": "...", "answer": "..."}]
//! ```
//! ````
//!
//! [`strip_code_fences`] documents exactly which wrappings are accepted;
//! [`extract_faq_pairs`] locates the assistant message, strips, decodes,
//! and validates. Both are pure functions, tested without any network.

use crate::error::GenerateError;
use crate::models::{ConversationMessage, FaqPair, MessageRole};

/// Strip a surrounding markdown code fence from `text`, if present.
///
/// Accepted input variants, each with optional surrounding whitespace:
///
/// - ```` ```json ```` fence with a case-insensitive language tag,
///   closed by ```` ``` ````
/// - a bare ```` ``` ```` fence, closed by ```` ``` ````
/// - an opening fence with no closing fence
/// - no fence at all (returned unchanged apart from trimming)
///
/// Idempotent: applying it twice yields the same result.
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        s = rest.trim_start();
    }

    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }

    s
}

/// Decode the FAQ pairs from a conversation's messages.
///
/// Scans `messages` in the given order and takes the first one authored
/// by the assistant. Its text must decode (after fence stripping) to a
/// JSON array of objects with `question` and `answer` string fields, all
/// non-empty.
///
/// # Errors
///
/// - `NoAssistantResponse` if no assistant-authored message exists.
/// - `MalformedResponse` if the text does not decode, is not an array of
///   question/answer objects, or any pair has an empty field.
pub fn extract_faq_pairs(
    messages: &[ConversationMessage],
) -> Result<Vec<FaqPair>, GenerateError> {
    let reply = messages
        .iter()
        .find(|m| m.role == MessageRole::Assistant)
        .ok_or(GenerateError::NoAssistantResponse)?;

    let payload = strip_code_fences(&reply.text);

    let pairs: Vec<FaqPair> = serde_json::from_str(payload)
        .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;

    for (i, pair) in pairs.iter().enumerate() {
        if pair.question.trim().is_empty() || pair.answer.trim().is_empty() {
            return Err(GenerateError::MalformedResponse(format!(
                "record {} has an empty question or answer",
                i
            )));
        }
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assistant(text: &str) -> ConversationMessage {
        ConversationMessage {
            role: MessageRole::Assistant,
            text: text.to_string(),
        }
    }

    fn requester(text: &str) -> ConversationMessage {
        ConversationMessage {
            role: MessageRole::Requester,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_strip_json_fence() {
        let input = "```json\n[{\"a\":1}]\n```";
        assert_eq!(strip_code_fences(input), "[{\"a\":1}]");
    }

    #[test]
    fn test_strip_fence_case_insensitive_tag() {
        assert_eq!(strip_code_fences("```JSON\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```Json\n[]\n```"), "[]");
    }

    #[test]
    fn test_strip_bare_fence() {
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
    }

    #[test]
    fn test_strip_missing_closing_fence() {
        assert_eq!(strip_code_fences("```json\n[]"), "[]");
    }

    #[test]
    fn test_unfenced_passthrough() {
        assert_eq!(strip_code_fences("  [{\"a\":1}]  "), "[{\"a\":1}]");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_code_fences("```json\n[1,2]\n```");
        assert_eq!(strip_code_fences(once), once);
    }

    #[test]
    fn test_extract_fenced_payload() {
        let messages = vec![assistant(
            "```json\n[{\"question\":\"Q\",\"answer\":\"A\"}]\n```",
        )];

        let pairs = extract_faq_pairs(&messages).unwrap();
        assert_eq!(
            pairs,
            vec![FaqPair {
                question: "Q".to_string(),
                answer: "A".to_string()
            }]
        );
    }

    #[test]
    fn test_extract_unfenced_payload_identical() {
        let fenced = vec![assistant(
            "```json\n[{\"question\":\"Q\",\"answer\":\"A\"}]\n```",
        )];
        let plain = vec![assistant("[{\"question\":\"Q\",\"answer\":\"A\"}]")];

        assert_eq!(
            extract_faq_pairs(&fenced).unwrap(),
            extract_faq_pairs(&plain).unwrap()
        );
    }

    #[test]
    fn test_extract_takes_first_assistant_message() {
        let messages = vec![
            requester("please analyze"),
            assistant("[{\"question\":\"Q1\",\"answer\":\"A1\"}]"),
            assistant("[{\"question\":\"stale\",\"answer\":\"stale\"}]"),
        ];

        let pairs = extract_faq_pairs(&messages).unwrap();
        assert_eq!(pairs[0].question, "Q1");
    }

    #[test]
    fn test_extract_no_assistant_message() {
        let messages = vec![requester("please analyze")];
        assert!(matches!(
            extract_faq_pairs(&messages),
            Err(GenerateError::NoAssistantResponse)
        ));
    }

    #[test]
    fn test_extract_invalid_json_is_malformed() {
        let messages = vec![assistant("Here are your FAQs: 1. What is...")];
        assert!(matches!(
            extract_faq_pairs(&messages),
            Err(GenerateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_wrong_shape_is_malformed() {
        let messages = vec![assistant("{\"question\":\"Q\",\"answer\":\"A\"}")];
        assert!(matches!(
            extract_faq_pairs(&messages),
            Err(GenerateError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_rejects_empty_fields() {
        let messages = vec![assistant(
            "[{\"question\":\"Q\",\"answer\":\"A\"},{\"question\":\"\",\"answer\":\"A2\"}]",
        )];

        match extract_faq_pairs(&messages) {
            Err(GenerateError::MalformedResponse(msg)) => assert!(msg.contains("record 1")),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }
}
