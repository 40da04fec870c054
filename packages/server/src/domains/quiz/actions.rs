//! Quiz operations behind the public `/api/quiz` endpoints

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::answers::{validate_concerns, ConcernInput, ConcernSelection, QuizAnswers};
use super::config::{QuizStep, FINAL_STEP, QUIZ_STEPS};
use super::error::QuizError;
use super::models::{ConcernDetail, CustomerConcern, CustomerProfile, ProfileProgress};
use crate::common::{BusinessUnitRef, OptionId, ProfileId};
use crate::domains::business_units::BusinessUnit;
use crate::domains::catalog::{AttributeOption, OptionWithCategory, ProductAttribute, DEFAULT_CATEGORY};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConcernChoiceView {
    /// Option id
    pub value: String,
    pub label: String,
    pub handle: String,
}

#[derive(Debug, Serialize)]
pub struct QuizConfigView {
    pub steps: &'static [QuizStep],
    /// Concern options keyed by category handle
    pub concerns: BTreeMap<String, Vec<ConcernChoiceView>>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: CustomerProfile,
    pub concerns: Vec<ConcernDetail>,
}

#[derive(Debug)]
pub struct SaveProgress {
    pub business_unit: Option<BusinessUnitRef>,
    pub profile_id: Option<ProfileId>,
    pub step: Option<i32>,
    pub answers: QuizAnswers,
    pub email: Option<String>,
    pub name: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug)]
pub struct SavedProfile {
    pub profile: CustomerProfile,
    /// True when a new profile was started
    pub created: bool,
}

/// Group concern options by category handle, keeping option order.
pub fn group_concerns(options: Vec<OptionWithCategory>) -> BTreeMap<String, Vec<ConcernChoiceView>> {
    let mut grouped: BTreeMap<String, Vec<ConcernChoiceView>> = BTreeMap::new();
    for option in options {
        let category = option
            .category_handle
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        grouped.entry(category).or_default().push(ConcernChoiceView {
            value: option.id.to_string(),
            label: option.name,
            handle: option.handle,
        });
    }
    grouped
}

/// Static steps plus the tenant's concern options.
///
/// An unknown business unit or one without a `skin_concerns` attribute
/// yields an empty concern map.
pub async fn get_config(
    business_unit: Option<&BusinessUnitRef>,
    pool: &PgPool,
) -> anyhow::Result<QuizConfigView> {
    let business_unit_id = match business_unit {
        Some(reference) => BusinessUnit::resolve(reference, pool).await?,
        None => None,
    };

    let attribute = match business_unit_id {
        Some(id) => ProductAttribute::skin_concerns(id, pool).await?,
        None => None,
    };

    let options = match attribute {
        Some(attribute) => AttributeOption::find_for_attribute(attribute.id, pool).await?,
        None => Vec::new(),
    };

    Ok(QuizConfigView {
        steps: QUIZ_STEPS.as_slice(),
        concerns: group_concerns(options),
    })
}

pub async fn get_profile(profile_id: ProfileId, pool: &PgPool) -> Result<ProfileView, QuizError> {
    let profile = CustomerProfile::find_by_id(profile_id, pool)
        .await?
        .ok_or(QuizError::ProfileNotFound)?;
    let concerns = CustomerConcern::details_for_profile(profile_id, pool).await?;

    Ok(ProfileView { profile, concerns })
}

/// Start a quiz or save a step of one in progress.
pub async fn save_progress(input: SaveProgress, pool: &PgPool) -> Result<SavedProfile, QuizError> {
    let answers = input.answers.normalized();
    let selections = answers
        .concerns
        .as_deref()
        .map(validate_concerns)
        .transpose()?;
    // Unknown concern ids reject the whole save before anything is written
    let concerns = match selections {
        Some(selections) => Some(ResolvedConcerns::resolve(selections, pool).await?),
        None => None,
    };
    let email = input.email.filter(|e| !e.trim().is_empty());
    let name = input.name.filter(|n| !n.trim().is_empty());

    let Some(profile_id) = input.profile_id else {
        let business_unit_id = match &input.business_unit {
            Some(reference) => BusinessUnit::resolve(reference, pool).await?,
            None => None,
        };

        let profile = CustomerProfile::create(
            business_unit_id,
            email.as_deref(),
            name.as_deref(),
            input.source.as_deref().filter(|s| !s.trim().is_empty()),
            &answers,
            pool,
        )
        .await?;

        if let Some(concerns) = &concerns {
            concerns.store(profile.id, pool).await?;
        }

        info!(profile_id = %profile.id, business_unit_id = ?business_unit_id, "Quiz started");
        return Ok(SavedProfile {
            profile,
            created: true,
        });
    };

    let completed = input.step.is_some_and(|step| step >= FINAL_STEP);
    let progress = ProfileProgress {
        quiz_step: input.step,
        email,
        name,
        completed,
    };

    let profile = CustomerProfile::save_progress(profile_id, &progress, &answers, pool)
        .await?
        .ok_or(QuizError::ProfileNotFound)?;

    if let Some(concerns) = &concerns {
        concerns.store(profile_id, pool).await?;
    }

    if completed {
        info!(profile_id = %profile_id, "Quiz completed");
    }

    Ok(SavedProfile {
        profile,
        created: false,
    })
}

/// Replace every concern of a profile. Returns how many were stored.
pub async fn replace_concerns(
    profile_id: ProfileId,
    concerns: &[ConcernInput],
    pool: &PgPool,
) -> Result<usize, QuizError> {
    let concerns = ResolvedConcerns::resolve(validate_concerns(concerns)?, pool).await?;

    CustomerProfile::find_by_id(profile_id, pool)
        .await?
        .ok_or(QuizError::ProfileNotFound)?;

    concerns.store(profile_id, pool).await?;
    Ok(concerns.selections.len())
}

/// Validated selections whose options all exist, with their categories.
struct ResolvedConcerns {
    selections: Vec<ConcernSelection>,
    categories: HashMap<OptionId, String>,
}

impl ResolvedConcerns {
    async fn resolve(selections: Vec<ConcernSelection>, pool: &PgPool) -> Result<Self, QuizError> {
        let ids: Vec<OptionId> = selections.iter().map(|s| s.concern_id).collect();
        let categories = CustomerConcern::option_categories(&ids, pool).await?;

        if let Some(unknown) = ids.iter().find(|id| !categories.contains_key(id)) {
            return Err(QuizError::UnknownConcern(*unknown));
        }

        Ok(Self {
            selections,
            categories,
        })
    }

    async fn store(&self, profile_id: ProfileId, pool: &PgPool) -> Result<(), QuizError> {
        CustomerConcern::replace_for_profile(profile_id, &self.selections, &self.categories, pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, category: Option<&str>, order: i32) -> OptionWithCategory {
        OptionWithCategory {
            id: OptionId::new(),
            name: name.to_string(),
            handle: crate::common::slugify(name),
            display_order: order,
            category_handle: category.map(str::to_string),
        }
    }

    #[test]
    fn concerns_group_by_category_with_face_default() {
        let grouped = group_concerns(vec![
            option("Acne", Some("face"), 0),
            option("Dark Circles", Some("eye"), 1),
            option("Dullness", None, 2),
        ]);

        let face: Vec<&str> = grouped["face"].iter().map(|c| c.label.as_str()).collect();
        assert_eq!(face, vec!["Acne", "Dullness"]);
        assert_eq!(grouped["eye"][0].handle, "dark-circles");
        assert_eq!(grouped.len(), 2);
    }
}
