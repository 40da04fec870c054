//! Static quiz questionnaire
//!
//! Four steps; step 3 carries no options of its own because concerns are
//! loaded per business unit from the `skin_concerns` attribute.

use lazy_static::lazy_static;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    ConcernsMulti,
}

#[derive(Debug, Serialize)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    pub options: Vec<QuizOption>,
}

#[derive(Debug, Serialize)]
pub struct QuizStep {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub questions: Vec<QuizQuestion>,
}

/// The step that, once saved, completes the quiz
pub const FINAL_STEP: i32 = 4;

fn opt(value: &'static str, label: &'static str) -> QuizOption {
    QuizOption {
        value,
        label,
        description: None,
    }
}

fn described(value: &'static str, label: &'static str, description: &'static str) -> QuizOption {
    QuizOption {
        value,
        label,
        description: Some(description),
    }
}

fn single(id: &'static str, question: &'static str, options: Vec<QuizOption>) -> QuizQuestion {
    QuizQuestion {
        id,
        kind: QuestionKind::Single,
        question,
        description: None,
        options,
    }
}

lazy_static! {
    pub static ref QUIZ_STEPS: Vec<QuizStep> = vec![
        QuizStep {
            id: 1,
            title: "About You",
            description: "Help us understand your basics",
            questions: vec![
                single(
                    "gender",
                    "What is your gender?",
                    vec![
                        opt("female", "Female"),
                        opt("male", "Male"),
                        opt("other", "Other"),
                        opt("prefer_not_to_say", "Prefer not to say"),
                    ],
                ),
                single(
                    "age_group",
                    "What is your age group?",
                    vec![
                        opt("18-25", "18-25"),
                        opt("26-35", "26-35"),
                        opt("36-45", "36-45"),
                        opt("46-55", "46-55"),
                        opt("55+", "55+"),
                    ],
                ),
                single(
                    "climate",
                    "What climate do you live in?",
                    vec![
                        opt("humid", "Humid"),
                        opt("dry", "Dry"),
                        opt("tropical", "Tropical"),
                        opt("temperate", "Temperate"),
                        opt("cold", "Cold"),
                    ],
                ),
            ],
        },
        QuizStep {
            id: 2,
            title: "Your Skin",
            description: "Tell us about your skin type",
            questions: vec![
                single(
                    "skin_type",
                    "What is your skin type?",
                    vec![
                        described("oily", "Oily", "Shiny, prone to breakouts"),
                        described("dry", "Dry", "Tight, flaky, rough"),
                        described("combination", "Combination", "Oily T-zone, dry cheeks"),
                        described("sensitive", "Sensitive", "Easily irritated, reactive"),
                        described("normal", "Normal", "Balanced, few issues"),
                    ],
                ),
                single(
                    "skin_tone",
                    "What is your skin tone?",
                    vec![
                        opt("fair", "Fair"),
                        opt("medium", "Medium"),
                        opt("olive", "Olive"),
                        opt("dark", "Dark"),
                    ],
                ),
                single(
                    "sun_exposure",
                    "How often are you exposed to the sun?",
                    vec![
                        described("rarely", "Rarely", "Mostly indoors"),
                        described("sometimes", "Sometimes", "A few hours daily"),
                        described("often", "Often", "Frequently outdoors"),
                    ],
                ),
            ],
        },
        QuizStep {
            id: 3,
            title: "Your Concerns",
            description: "Select the skin concerns you want to address",
            questions: vec![QuizQuestion {
                id: "concerns",
                kind: QuestionKind::ConcernsMulti,
                question: "What are your main skin concerns?",
                description: Some("Select all that apply. You can mark your top priorities."),
                options: Vec::new(),
            }],
        },
        QuizStep {
            id: 4,
            title: "Your Preferences",
            description: "Help us tailor your recommendations",
            questions: vec![
                single(
                    "current_routine",
                    "What is your current skincare routine?",
                    vec![
                        described("none", "None", "I don't use any skincare"),
                        described("basic", "Basic", "Cleanser + moisturizer"),
                        described("advanced", "Advanced", "Multiple products daily"),
                    ],
                ),
                single(
                    "product_preference",
                    "What type of products do you prefer?",
                    vec![
                        described("natural", "Natural", "Plant-based, organic"),
                        described("clinical", "Clinical", "Science-backed, active ingredients"),
                        described("no_preference", "No Preference", "Whatever works best"),
                    ],
                ),
                single(
                    "monthly_budget",
                    "What is your monthly skincare budget?",
                    vec![
                        opt("0-50", "$0 - $50"),
                        opt("50-100", "$50 - $100"),
                        opt("100-200", "$100 - $200"),
                        opt("200+", "$200+"),
                    ],
                ),
            ],
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_with_concerns_on_step_three() {
        assert_eq!(QUIZ_STEPS.len(), FINAL_STEP as usize);
        let concerns = &QUIZ_STEPS[2].questions[0];
        assert_eq!(concerns.id, "concerns");
        assert_eq!(concerns.kind, QuestionKind::ConcernsMulti);
        assert!(concerns.options.is_empty());
    }

    #[test]
    fn serializes_type_and_skips_missing_descriptions() {
        let json = serde_json::to_value(&QUIZ_STEPS[0]).unwrap();
        let gender = &json["questions"][0];
        assert_eq!(gender["type"], "single");
        assert!(gender.get("description").is_none());
        assert!(gender["options"][0].get("description").is_none());

        let budget = serde_json::to_value(&QUIZ_STEPS[3].questions[2]).unwrap();
        assert_eq!(budget["options"][3]["label"], "$200+");
    }
}
