//! Keyword retrieval over the knowledge base

use super::models::KnowledgeEntry;

/// Message words shorter than this are ignored
const MIN_WORD_CHARS: usize = 3;

fn matches(entry: &KnowledgeEntry, message: &str, words: &[&str]) -> bool {
    if entry.content.trim().is_empty() {
        return false;
    }

    let content = entry.content.to_lowercase();
    let category = entry.category.to_lowercase();
    let topic = entry.topic.as_deref().unwrap_or_default().to_lowercase();

    let word_hit = words
        .iter()
        .any(|w| topic.contains(w) || category.contains(w) || content.contains(w));

    word_hit
        || entry
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .any(|k| !k.is_empty() && message.contains(&k))
}

/// Entries relevant to a customer message.
///
/// An entry matches when any message word (3+ characters) appears in its
/// topic, category or content, or when one of its keywords appears in the
/// message. If nothing matches, every entry is returned.
pub fn relevant_entries<'a>(message: &str, entries: &'a [KnowledgeEntry]) -> Vec<&'a KnowledgeEntry> {
    let message = message.to_lowercase();
    let words: Vec<&str> = message
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();

    let relevant: Vec<&KnowledgeEntry> = entries
        .iter()
        .filter(|e| matches(e, &message, &words))
        .collect();

    if relevant.is_empty() {
        entries.iter().collect()
    } else {
        relevant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BusinessUnitId, KnowledgeEntryId};
    use chrono::Utc;

    fn entry(category: &str, topic: Option<&str>, content: &str, keywords: &[&str]) -> KnowledgeEntry {
        KnowledgeEntry {
            id: KnowledgeEntryId::new(),
            business_unit_id: BusinessUnitId::new(),
            category: category.to_string(),
            topic: topic.map(str::to_string),
            content: content.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            confidence: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn words_match_topic_category_or_content() {
        let entries = vec![
            entry("shipping", Some("Delivery"), "We ship within 3 days", &[]),
            entry("products", Some("Vitamin C Serum"), "Brightens dull skin", &[]),
        ];

        let found = relevant_entries("Do you have a SERUM for me?", &entries);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].topic.as_deref(), Some("Vitamin C Serum"));
    }

    #[test]
    fn keywords_match_inside_the_message() {
        let entries = vec![
            entry("general", None, "Open 9-5", &["hours"]),
            entry("general", None, "Returns within 30 days", &["refund"]),
        ];

        let found = relevant_entries("whatarethehours", &entries);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].content, "Open 9-5");
    }

    #[test]
    fn short_words_and_empty_entries_never_match() {
        let entries = vec![
            entry("faq", Some("Is it ok"), "", &["ok"]),
            entry("faq", Some("Gift cards"), "Available online", &["", " "]),
        ];

        // "is" and "ok" are too short; the empty entry is skipped, and blank
        // keywords do not match, so nothing is relevant and all come back.
        let found = relevant_entries("is ok", &entries);
        assert_eq!(found.len(), 2);
    }
}
