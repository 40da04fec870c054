//! Shared-concern scoring between base products and boosters.
//!
//! Pure functions over rows already loaded from the database, so the
//! ranking rules can be tested without Postgres. Equal scores keep the order
//! in which candidates were first seen (the mapping order).

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::common::{OptionId, ProductId};

use super::models::ConcernMapping;

/// Points per shared concern when suggesting boosters in the admin UI.
pub const SUGGESTION_POINTS: i32 = 3;
pub const MAX_SUGGESTIONS: usize = 10;
pub const MAX_AUTO_MATCHES: usize = 10;

/// A published booster tagged with one of the product's concerns.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SharedConcernRow {
    pub addon_id: ProductId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub option_id: OptionId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonSuggestion {
    pub id: ProductId,
    pub title: String,
    pub thumbnail: Option<String>,
    pub score: i32,
    pub shared_concerns: Vec<String>,
}

/// Rank boosters sharing concerns with a product.
///
/// Each shared mapping adds [`SUGGESTION_POINTS`]; concern names are
/// deduplicated (unknown ids show as `Unknown`). Boosters already matched are
/// dropped. Highest score first, at most [`MAX_SUGGESTIONS`].
pub fn rank_suggestions(
    rows: &[SharedConcernRow],
    concern_names: &HashMap<OptionId, String>,
    already_matched: &[ProductId],
) -> Vec<AddonSuggestion> {
    let mut order: Vec<ProductId> = Vec::new();
    let mut by_id: HashMap<ProductId, AddonSuggestion> = HashMap::new();

    for row in rows {
        let name = concern_names
            .get(&row.option_id)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let entry = by_id.entry(row.addon_id).or_insert_with(|| {
            order.push(row.addon_id);
            AddonSuggestion {
                id: row.addon_id,
                title: row.title.clone(),
                thumbnail: row.thumbnail.clone(),
                score: 0,
                shared_concerns: Vec::new(),
            }
        });

        entry.score += SUGGESTION_POINTS;
        if !entry.shared_concerns.contains(&name) {
            entry.shared_concerns.push(name);
        }
    }

    let mut suggestions: Vec<AddonSuggestion> = order
        .into_iter()
        .filter(|id| !already_matched.contains(id))
        .filter_map(|id| by_id.remove(&id))
        .collect();

    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Concern ↔ product index built once per regeneration run.
#[derive(Debug, Default)]
pub struct ConcernIndex {
    concern_to_products: HashMap<OptionId, Vec<ProductId>>,
    product_to_concerns: HashMap<ProductId, Vec<OptionId>>,
}

impl ConcernIndex {
    pub fn build(mappings: &[ConcernMapping]) -> Self {
        let mut index = Self::default();
        for m in mappings {
            index
                .concern_to_products
                .entry(m.option_id)
                .or_default()
                .push(m.product_id);
            index
                .product_to_concerns
                .entry(m.product_id)
                .or_default()
                .push(m.option_id);
        }
        index
    }

    pub fn concerns_of(&self, product_id: ProductId) -> &[OptionId] {
        self.product_to_concerns
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Boosters sharing at least one concern with `product_id`, by number of
    /// shared concerns (desc), capped at [`MAX_AUTO_MATCHES`]. The product
    /// itself never matches.
    pub fn best_addons_for(
        &self,
        product_id: ProductId,
        addon_ids: &HashSet<ProductId>,
    ) -> Vec<ProductId> {
        let mut order: Vec<ProductId> = Vec::new();
        let mut counts: HashMap<ProductId, usize> = HashMap::new();

        for concern in self.concerns_of(product_id) {
            let Some(products) = self.concern_to_products.get(concern) else {
                continue;
            };
            for &candidate in products {
                if candidate == product_id || !addon_ids.contains(&candidate) {
                    continue;
                }
                let count = counts.entry(candidate).or_insert_with(|| {
                    order.push(candidate);
                    0
                });
                *count += 1;
            }
        }

        let mut ranked: Vec<(ProductId, usize)> = order
            .into_iter()
            .map(|id| (id, counts[&id]))
            .filter(|(_, count)| *count > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(MAX_AUTO_MATCHES);
        ranked.into_iter().map(|(id, _)| id).collect()
    }
}
