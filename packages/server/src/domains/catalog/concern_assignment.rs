//! Booster → concern tagging from free-text benefit descriptions.
//!
//! The LLM reads one benefit text per body area and names the matching
//! concerns from that area's list. Names come back loosely formatted, so
//! matching is case-insensitive and accepts containment either way.

use crate::common::OptionId;

/// Body-area category handles paired with the product benefit column they read.
pub const CATEGORY_BENEFIT_FIELDS: [(&str, &str); 4] = [
    ("face", "face_benefits"),
    ("eye", "eye_benefits"),
    ("body", "body_benefits"),
    ("scalp", "hair_benefits"),
];

/// A concern option offered to the model.
#[derive(Debug, Clone)]
pub struct ConcernChoice {
    pub id: OptionId,
    pub name: String,
}

pub fn build_assignment_prompt(
    booster_title: &str,
    benefits: &str,
    concerns: &[ConcernChoice],
) -> String {
    let list = concerns
        .iter()
        .map(|c| format!("- {}", c.name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a skincare expert. Analyze the following booster product benefits and determine which skin concerns it addresses.

BOOSTER: {booster_title}

BENEFITS:
{benefits}

AVAILABLE SKIN CONCERNS:
{list}

Based on the benefits text, which of the above skin concerns does this booster help with?

IMPORTANT: Only return the exact concern names from the list above, separated by commas. If none match, return "NONE".

Example response: "Acne, Oiliness, Large Pores"
Or: "Dark Circles, Eye Bags"
Or: "NONE"

Your response (just the concern names):"#
    )
}

/// Map the model's comma list back to concern ids.
///
/// `NONE` or an empty reply yields nothing. Surrounding quotes are ignored.
pub fn match_concern_names(response: &str, concerns: &[ConcernChoice]) -> Vec<OptionId> {
    let response = response.trim().trim_matches('"').trim();
    if response.is_empty() || response.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let mentioned: Vec<String> = response
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    concerns
        .iter()
        .filter(|c| {
            let name = c.name.to_lowercase();
            mentioned
                .iter()
                .any(|m| name == *m || name.contains(m.as_str()) || m.contains(name.as_str()))
        })
        .map(|c| c.id)
        .collect()
}
