//! Booster scoring and base product grouping
//!
//! Pure functions over rows already loaded from the catalog. Ties keep the
//! order rows arrived in (sorts are stable), so results are deterministic
//! for a given query order.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::common::{OptionId, ProductId};

/// Points a booster earns per matched concern before weighting
pub const BASE_POINTS: i32 = 3;
/// Severity assumed when a selection carries none
pub const DEFAULT_SEVERITY: i32 = 3;
pub const PRIORITY_MULTIPLIER: i32 = 2;
pub const MAX_RANKED_BOOSTERS: usize = 10;
pub const MAX_ROUTINE_PRODUCTS: usize = 6;

/// A customer's weighting for one selected concern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcernWeight {
    pub concern_id: OptionId,
    pub severity: Option<i32>,
    pub is_priority: bool,
}

impl ConcernWeight {
    pub fn points(&self) -> i32 {
        let severity = self.severity.unwrap_or(DEFAULT_SEVERITY);
        let priority = if self.is_priority { PRIORITY_MULTIPLIER } else { 1 };
        BASE_POINTS * severity * priority
    }
}

/// The product fields a recommendation displays and prices
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub price: Decimal,
    pub published: bool,
}

/// One booster tagged with one of the customer's concerns
#[derive(Debug, Clone)]
pub struct BoosterHit {
    pub booster: ProductCard,
    pub option_id: OptionId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredBooster {
    pub booster: ProductCard,
    pub total_score: i32,
    /// Matched concern ids in the order they were found
    pub concerns: Vec<OptionId>,
}

/// A base product paired with one of the ranked boosters
#[derive(Debug, Clone)]
pub struct BaseMatch {
    pub base: ProductCard,
    pub addon_product_id: ProductId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaseCandidate {
    pub product: ProductCard,
    pub boosters: Vec<ScoredBooster>,
    pub total_score: i32,
}

/// Sum weighted points per published booster.
///
/// A concern selected more than once is weighted by its first selection.
pub fn score_boosters(weights: &[ConcernWeight], hits: &[BoosterHit]) -> Vec<ScoredBooster> {
    let mut scored: Vec<ScoredBooster> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for hit in hits.iter().filter(|h| h.booster.published) {
        let points = weights
            .iter()
            .find(|w| w.concern_id == hit.option_id)
            .map(ConcernWeight::points)
            .unwrap_or(BASE_POINTS * DEFAULT_SEVERITY);

        match index.get(&hit.booster.id) {
            Some(&i) => {
                scored[i].total_score += points;
                scored[i].concerns.push(hit.option_id);
            }
            None => {
                index.insert(hit.booster.id, scored.len());
                scored.push(ScoredBooster {
                    booster: hit.booster.clone(),
                    total_score: points,
                    concerns: vec![hit.option_id],
                });
            }
        }
    }

    scored
}

/// Highest score first, at most [`MAX_RANKED_BOOSTERS`].
pub fn rank_boosters(mut scored: Vec<ScoredBooster>) -> Vec<ScoredBooster> {
    scored.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    scored.truncate(MAX_RANKED_BOOSTERS);
    scored
}

/// Group ranked boosters under the published base products they pair with.
///
/// `matches` must already be in display order; boosters are appended in
/// that order and a base scores the sum of its boosters.
pub fn group_by_base(ranked: &[ScoredBooster], matches: &[BaseMatch]) -> Vec<BaseCandidate> {
    let mut candidates: Vec<BaseCandidate> = Vec::new();
    let mut index: HashMap<ProductId, usize> = HashMap::new();

    for m in matches.iter().filter(|m| m.base.published) {
        let Some(booster) = ranked.iter().find(|b| b.booster.id == m.addon_product_id) else {
            continue;
        };

        match index.get(&m.base.id) {
            Some(&i) => {
                candidates[i].boosters.push(booster.clone());
                candidates[i].total_score += booster.total_score;
            }
            None => {
                index.insert(m.base.id, candidates.len());
                candidates.push(BaseCandidate {
                    product: m.base.clone(),
                    boosters: vec![booster.clone()],
                    total_score: booster.total_score,
                });
            }
        }
    }

    candidates
}

/// Best-scoring bases for the full routine, at most [`MAX_ROUTINE_PRODUCTS`].
pub fn select_bases(mut candidates: Vec<BaseCandidate>) -> Vec<BaseCandidate> {
    candidates.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    candidates.truncate(MAX_ROUTINE_PRODUCTS);
    candidates
}
