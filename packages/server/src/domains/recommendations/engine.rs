//! Assemble the customer-facing recommendation set
//!
//! Takes the scored boosters and selected base products and produces the
//! four bundle offers, the top-booster list and the profile summary.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::pricing::{price_tier, BudgetRange, BundleTier, Incentives};
use super::scoring::{BaseCandidate, ScoredBooster};
use crate::common::{OptionId, ProductId, ProfileId};

pub const TOP_BOOSTERS: usize = 5;
pub const UNKNOWN_CONCERN: &str = "Unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedBooster {
    pub id: ProductId,
    pub title: String,
    pub thumbnail: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Concern names
    pub concerns: Vec<String>,
    pub total_score: i32,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: ProductId,
    pub title: String,
    pub thumbnail: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: String,
    pub boosters: Vec<RecommendedBooster>,
}

impl RecommendedProduct {
    /// Product price plus every paired booster
    pub fn line_total(&self) -> Decimal {
        self.price + self.boosters.iter().map(|b| b.price).sum::<Decimal>()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleOffer {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub discount: u32,
    pub products: Vec<RecommendedProduct>,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub duration_months: u32,
    /// Monthly cost within the customer's budget
    pub fits_budget: bool,
}

impl BundleOffer {
    fn build(tier: BundleTier, routine: &[RecommendedProduct], budget: &BudgetRange) -> Self {
        let take = tier.product_limit().unwrap_or(routine.len()).min(routine.len());
        let products = routine[..take].to_vec();
        let price = price_tier(tier, products.iter().map(RecommendedProduct::line_total));

        Self {
            kind: tier.kind(),
            title: tier.title(),
            description: tier.description(),
            discount: tier.discount_percent(),
            original_price: price.original,
            final_price: price.final_price,
            duration_months: tier.duration_months(),
            fits_budget: budget.fits(price.final_price, tier.duration_months()),
            products,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConcern {
    pub name: Option<String>,
    pub category: Option<String>,
    pub severity: i32,
    pub is_priority: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub skin_type: Option<String>,
    pub age_group: Option<String>,
    pub concerns: Vec<ProfileConcern>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub profile: ProfileSummary,
    pub top_boosters: Vec<RecommendedBooster>,
    pub full_routine: BundleOffer,
    pub starter_bundle: BundleOffer,
    pub trial_bundle: BundleOffer,
    pub single_product: BundleOffer,
    pub budget: BudgetRange,
    pub incentives: Incentives,
}

/// Everything the builder needs, already loaded and scored
pub struct RecommendationInputs<'a> {
    pub profile: ProfileSummary,
    pub budget: BudgetRange,
    /// Concern id -> display name
    pub concern_names: &'a HashMap<OptionId, String>,
    /// Ranked boosters, best first
    pub ranked: &'a [ScoredBooster],
    /// Selected bases, best first, each with its category handle
    pub bases: &'a [(BaseCandidate, String)],
}

fn format_booster(scored: &ScoredBooster, names: &HashMap<OptionId, String>) -> RecommendedBooster {
    RecommendedBooster {
        id: scored.booster.id,
        title: scored.booster.title.clone(),
        thumbnail: scored.booster.thumbnail.clone(),
        price: scored.booster.price,
        concerns: scored
            .concerns
            .iter()
            .map(|id| {
                names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_CONCERN.to_string())
            })
            .collect(),
        total_score: scored.total_score,
        is_primary: false,
    }
}

pub fn build_recommendations(inputs: RecommendationInputs<'_>) -> RecommendationSet {
    let names = inputs.concern_names;

    let routine: Vec<RecommendedProduct> = inputs
        .bases
        .iter()
        .map(|(candidate, category)| RecommendedProduct {
            id: candidate.product.id,
            title: candidate.product.title.clone(),
            thumbnail: candidate.product.thumbnail.clone(),
            price: candidate.product.price,
            category: category.clone(),
            boosters: candidate
                .boosters
                .iter()
                .map(|b| format_booster(b, names))
                .collect(),
        })
        .collect();

    let budget = inputs.budget;
    let [six, three, one, single] =
        BundleTier::ALL.map(|tier| BundleOffer::build(tier, &routine, &budget));

    RecommendationSet {
        profile: inputs.profile,
        top_boosters: inputs
            .ranked
            .iter()
            .take(TOP_BOOSTERS)
            .map(|b| format_booster(b, names))
            .collect(),
        full_routine: six,
        starter_bundle: three,
        trial_bundle: one,
        single_product: single,
        budget,
        incentives: Incentives::default(),
    }
}
