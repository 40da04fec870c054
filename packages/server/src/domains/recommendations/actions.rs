//! Recommendation generation and history

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{debug, info};

use super::engine::{build_recommendations, ProfileConcern, ProfileSummary, RecommendationInputs, RecommendationSet};
use super::error::RecommendationError;
use super::models::{find_base_matches, BoosterHitRow, CustomerRecommendation, NewRecommendation, FULL_ROUTINE_TYPE};
use super::pricing::BudgetRange;
use super::scoring::{group_by_base, rank_boosters, score_boosters, select_bases, BoosterHit, ConcernWeight};
use crate::common::{OptionId, ProfileId, RecommendationId};
use crate::domains::catalog::{ProductCategory, DEFAULT_CATEGORY};
use crate::domains::quiz::{CustomerConcern, CustomerProfile};

#[derive(Debug)]
pub enum GenerateOutcome {
    /// The profile has no concerns to score against
    NoConcerns,
    Generated {
        recommendations: RecommendationSet,
        recommendation_id: RecommendationId,
    },
}

/// Score the profile's concerns, build the bundle offers and persist the
/// full routine as a pending recommendation.
pub async fn generate_recommendations(
    profile_id: ProfileId,
    pool: &PgPool,
) -> Result<GenerateOutcome, RecommendationError> {
    let profile = CustomerProfile::find_by_id(profile_id, pool)
        .await?
        .ok_or(RecommendationError::ProfileNotFound)?;
    let concerns = CustomerConcern::details_for_profile(profile_id, pool).await?;

    if concerns.is_empty() {
        return Ok(GenerateOutcome::NoConcerns);
    }

    let weights: Vec<ConcernWeight> = concerns
        .iter()
        .map(|c| ConcernWeight {
            concern_id: c.concern_id,
            severity: Some(c.severity),
            is_priority: c.is_priority,
        })
        .collect();
    let concern_ids: Vec<OptionId> = weights.iter().map(|w| w.concern_id).collect();

    let hits: Vec<BoosterHit> =
        BoosterHitRow::find_for_concerns(profile.business_unit_id, &concern_ids, pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
    let ranked = rank_boosters(score_boosters(&weights, &hits));

    let booster_ids: Vec<_> = ranked.iter().map(|b| b.booster.id).collect();
    let matches = find_base_matches(&booster_ids, pool).await?;
    let selected = select_bases(group_by_base(&ranked, &matches));

    let mut bases = Vec::with_capacity(selected.len());
    for candidate in selected {
        let category = ProductCategory::handles_for_product(candidate.product.id, pool)
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        bases.push((candidate, category));
    }

    debug!(
        profile_id = %profile_id,
        boosters = ranked.len(),
        bases = bases.len(),
        "Scored recommendation candidates"
    );

    let mut concern_names: HashMap<OptionId, String> = HashMap::new();
    for c in &concerns {
        if let Some(name) = &c.concern_name {
            concern_names.entry(c.concern_id).or_insert_with(|| name.clone());
        }
    }

    let summary = ProfileSummary {
        id: profile.id,
        skin_type: profile.skin_type.clone(),
        age_group: profile.age_group.clone(),
        concerns: concerns
            .iter()
            .map(|c| ProfileConcern {
                name: c.concern_name.clone(),
                category: c.category.clone().or_else(|| c.option_category.clone()),
                severity: c.severity,
                is_priority: c.is_priority,
            })
            .collect(),
    };

    let recommendations = build_recommendations(RecommendationInputs {
        profile: summary,
        budget: BudgetRange::resolve(profile.monthly_budget.as_deref()),
        concern_names: &concern_names,
        ranked: &ranked,
        bases: &bases,
    });

    let routine = &recommendations.full_routine;
    let saved = CustomerRecommendation::create(
        NewRecommendation {
            profile_id,
            recommendation_type: FULL_ROUTINE_TYPE.to_string(),
            title: routine.title.to_string(),
            description: Some(routine.description.to_string()),
            original_price: routine.original_price,
            discount_percent: routine.discount as i32,
            final_price: routine.final_price,
            duration_months: routine.duration_months as i32,
            products: serde_json::to_value(&routine.products)
                .map_err(|e| RecommendationError::InternalError(e.into()))?,
        },
        pool,
    )
    .await?;

    CustomerProfile::mark_recommendation_generated(profile_id, pool).await?;

    info!(
        profile_id = %profile_id,
        recommendation_id = %saved.id,
        products = routine.products.len(),
        "Recommendation generated"
    );

    Ok(GenerateOutcome::Generated {
        recommendations,
        recommendation_id: saved.id,
    })
}

/// Stored recommendations for a profile, newest first.
pub async fn list_recommendations(
    profile_id: ProfileId,
    pool: &PgPool,
) -> anyhow::Result<Vec<CustomerRecommendation>> {
    CustomerRecommendation::find_for_profile(profile_id, pool).await
}
