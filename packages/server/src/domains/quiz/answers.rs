//! Quiz answer payloads and their validation

use serde::Deserialize;

use super::error::QuizError;
use crate::common::OptionId;

pub const DEFAULT_SEVERITY: i32 = 3;
pub const MIN_SEVERITY: i32 = 1;
pub const MAX_SEVERITY: i32 = 5;

/// Answers collected so far. Blank strings count as unanswered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizAnswers {
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub climate: Option<String>,
    pub skin_type: Option<String>,
    pub skin_tone: Option<String>,
    pub sun_exposure: Option<String>,
    pub current_routine: Option<String>,
    pub product_preference: Option<String>,
    pub monthly_budget: Option<String>,
    pub concerns: Option<Vec<ConcernInput>>,
}

impl QuizAnswers {
    /// Same answers with blank strings dropped
    pub fn normalized(mut self) -> Self {
        for field in [
            &mut self.gender,
            &mut self.age_group,
            &mut self.climate,
            &mut self.skin_type,
            &mut self.skin_tone,
            &mut self.sun_exposure,
            &mut self.current_routine,
            &mut self.product_preference,
            &mut self.monthly_budget,
        ] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }
}

/// A selected concern: a bare option id or an object carrying weighting.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ConcernInput {
    Id(String),
    Detailed {
        #[serde(default)]
        concern_id: Option<String>,
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        severity: Option<i32>,
        #[serde(default)]
        is_priority: Option<bool>,
    },
}

/// A validated concern selection ready to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcernSelection {
    pub concern_id: OptionId,
    pub severity: i32,
    pub is_priority: bool,
}

impl ConcernInput {
    pub fn validate(&self) -> Result<ConcernSelection, QuizError> {
        let (raw_id, severity, is_priority) = match self {
            ConcernInput::Id(id) => (Some(id.as_str()), None, None),
            ConcernInput::Detailed {
                concern_id,
                id,
                severity,
                is_priority,
            } => (
                concern_id.as_deref().or(id.as_deref()),
                *severity,
                *is_priority,
            ),
        };

        let raw_id = raw_id.unwrap_or_default();
        let concern_id = OptionId::parse(raw_id.trim())
            .map_err(|_| QuizError::InvalidConcernId(raw_id.to_string()))?;

        let severity = severity.unwrap_or(DEFAULT_SEVERITY);
        if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
            return Err(QuizError::InvalidSeverity(severity));
        }

        Ok(ConcernSelection {
            concern_id,
            severity,
            is_priority: is_priority.unwrap_or(false),
        })
    }
}

/// Validate every selection, failing on the first bad one.
pub fn validate_concerns(inputs: &[ConcernInput]) -> Result<Vec<ConcernSelection>, QuizError> {
    inputs.iter().map(ConcernInput::validate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ids_get_default_weighting() {
        let id = OptionId::new();
        let inputs: Vec<ConcernInput> =
            serde_json::from_value(serde_json::json!([id.to_string()])).unwrap();

        let selections = validate_concerns(&inputs).unwrap();
        assert_eq!(
            selections,
            vec![ConcernSelection {
                concern_id: id,
                severity: 3,
                is_priority: false
            }]
        );
    }

    #[test]
    fn objects_accept_concern_id_or_id() {
        let a = OptionId::new();
        let b = OptionId::new();
        let inputs: Vec<ConcernInput> = serde_json::from_value(serde_json::json!([
            { "concern_id": a.to_string(), "severity": 5, "is_priority": true },
            { "id": b.to_string(), "severity": 1 }
        ]))
        .unwrap();

        let selections = validate_concerns(&inputs).unwrap();
        assert_eq!(selections[0].concern_id, a);
        assert_eq!(selections[0].severity, 5);
        assert!(selections[0].is_priority);
        assert_eq!(selections[1].concern_id, b);
        assert!(!selections[1].is_priority);
    }

    #[test]
    fn out_of_range_severity_is_rejected() {
        let input = ConcernInput::Detailed {
            concern_id: Some(OptionId::new().to_string()),
            id: None,
            severity: Some(9),
            is_priority: None,
        };
        assert!(matches!(input.validate(), Err(QuizError::InvalidSeverity(9))));
    }

    #[test]
    fn non_uuid_concern_is_rejected() {
        let input = ConcernInput::Id("acne".into());
        assert!(matches!(input.validate(), Err(QuizError::InvalidConcernId(_))));
    }

    #[test]
    fn blank_answers_are_dropped() {
        let answers = QuizAnswers {
            gender: Some("  ".into()),
            skin_type: Some("oily".into()),
            ..Default::default()
        }
        .normalized();
        assert!(answers.gender.is_none());
        assert_eq!(answers.skin_type.as_deref(), Some("oily"));
    }
}
