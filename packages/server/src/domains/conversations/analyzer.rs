//! Conversation triage: topic keywords plus a flag for chats an admin
//! should read (angry customers, refund demands, unresolved issues).

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::domains::chat::ChatMessage;

pub const MAX_KEYWORDS: usize = 5;

lazy_static! {
    static ref FENCED_JSON: Regex = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagLevel {
    #[default]
    None,
    Warning,
    Alert,
}

impl FlagLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagLevel::None => "none",
            FlagLevel::Warning => "warning",
            FlagLevel::Alert => "alert",
        }
    }

    /// Anything unrecognised counts as unflagged.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "alert" => FlagLevel::Alert,
            "warning" => FlagLevel::Warning,
            _ => FlagLevel::None,
        }
    }
}

impl std::fmt::Display for FlagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ConversationAnalysis {
    pub keywords: Vec<String>,
    pub flag_level: FlagLevel,
    pub flag_reason: Option<String>,
}

/// `Customer:` / `Assistant:` lines, oldest first
pub fn transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let speaker = if m.role == "user" { "Customer" } else { "Assistant" };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_analysis_prompt(transcript: &str) -> String {
    format!(
        r#"Review this customer service conversation.

1. KEYWORDS: 3-5 short tags for the main topics and, when notable, the customer's mood
   (e.g. order, shipping, refund, product, price, angry, confused, complaint, purchase).

2. FLAG_LEVEL: does this conversation need a human to look at it?
   - "alert": angry customer, complaint, refund demand, threats, very negative
   - "warning": mild frustration, unresolved issue, confusion
   - "none": normal conversation, happy customer, resolved issue

3. FLAG_REASON: when FLAG_LEVEL is not "none", one short sentence saying why.

CONVERSATION:
{}

Reply with JSON only, no other text:
{{"keywords": ["tag1", "tag2", "tag3"], "flag_level": "none|warning|alert", "flag_reason": "reason or null"}}"#,
        transcript
    )
}

/// The JSON object inside a model reply, with or without a code fence.
fn json_body(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(inner) = FENCED_JSON.captures(trimmed).and_then(|c| c.get(1)) {
        return inner.as_str();
    }
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Parse a model reply; `None` when it holds no JSON object.
pub fn parse_analysis(response: &str) -> Option<ConversationAnalysis> {
    let value: serde_json::Value = serde_json::from_str(json_body(response)).ok()?;
    let object = value.as_object()?;

    let mut keywords: Vec<String> = Vec::new();
    for keyword in object
        .get("keywords")
        .and_then(|k| k.as_array())
        .into_iter()
        .flatten()
        .filter_map(|k| k.as_str())
        .map(str::trim)
        .filter(|k| !k.is_empty())
    {
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
        if !keywords.iter().any(|existing| existing.eq_ignore_ascii_case(keyword)) {
            keywords.push(keyword.to_string());
        }
    }

    let flag_level = object
        .get("flag_level")
        .and_then(|f| f.as_str())
        .map(FlagLevel::parse_lenient)
        .unwrap_or_default();

    let flag_reason = match flag_level {
        FlagLevel::None => None,
        _ => object
            .get("flag_reason")
            .and_then(|r| r.as_str())
            .map(str::trim)
            .filter(|r| !r.is_empty() && !r.eq_ignore_ascii_case("null"))
            .map(str::to_string),
    };

    Some(ConversationAnalysis {
        keywords,
        flag_level,
        flag_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fenced_json() {
        let reply = "```json\n{\"keywords\": [\"refund\", \"angry\"], \"flag_level\": \"alert\", \"flag_reason\": \"Customer demands refund\"}\n```";
        let analysis = parse_analysis(reply).unwrap();
        assert_eq!(analysis.keywords, vec!["refund", "angry"]);
        assert_eq!(analysis.flag_level, FlagLevel::Alert);
        assert_eq!(analysis.flag_reason.as_deref(), Some("Customer demands refund"));
    }

    #[test]
    fn reads_json_with_surrounding_chatter() {
        let reply = "Sure! {\"keywords\": [\"shipping\"], \"flag_level\": \"warning\", \"flag_reason\": \"Late parcel\"} Hope this helps.";
        let analysis = parse_analysis(reply).unwrap();
        assert_eq!(analysis.flag_level, FlagLevel::Warning);
        assert_eq!(analysis.keywords, vec!["shipping"]);
    }

    #[test]
    fn keeps_at_most_five_distinct_keywords() {
        let reply = r#"{"keywords": ["a", "A", "b", "", "c", "d", "e", "f"], "flag_level": "none"}"#;
        let analysis = parse_analysis(reply).unwrap();
        assert_eq!(analysis.keywords, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn unflagged_conversations_have_no_reason() {
        let reply = r#"{"keywords": [], "flag_level": "none", "flag_reason": "all good"}"#;
        assert_eq!(parse_analysis(reply).unwrap().flag_reason, None);

        let reply = r#"{"keywords": [], "flag_level": "panic", "flag_reason": "??"}"#;
        let analysis = parse_analysis(reply).unwrap();
        assert_eq!(analysis.flag_level, FlagLevel::None);
        assert_eq!(analysis.flag_reason, None);
    }

    #[test]
    fn null_reason_on_a_flag_is_dropped() {
        let reply = r#"{"keywords": ["price"], "flag_level": "warning", "flag_reason": "null"}"#;
        assert_eq!(parse_analysis(reply).unwrap().flag_reason, None);
    }

    #[test]
    fn prose_is_not_an_analysis() {
        assert_eq!(parse_analysis("I could not analyze this conversation."), None);
    }

    #[test]
    fn prompt_embeds_the_transcript() {
        let prompt = build_analysis_prompt("Customer: where is my order?");
        assert!(prompt.contains("Customer: where is my order?"));
        assert!(prompt.contains("\"flag_level\""));
    }
}
