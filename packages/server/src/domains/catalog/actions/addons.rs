use anyhow::{anyhow, Result};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

use crate::common::{BusinessUnitId, ProductId};
use crate::domains::catalog::addon_scoring::{rank_suggestions, AddonSuggestion, ConcernIndex};
use crate::domains::catalog::models::{
    AddonMatch, AttributeOption, AttributeValue, Product, ProductAttribute,
};

/// Current matches for a product, optionally with ranked suggestions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonMatchesView {
    pub addon_ids: Vec<ProductId>,
    pub suggestions: Vec<AddonSuggestion>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductMatchCount {
    pub product_id: ProductId,
    pub title: String,
    pub match_count: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerationReport {
    pub processed: i32,
    pub matches: i32,
    pub results: Vec<ProductMatchCount>,
}

pub async fn get_addon_matches(
    product_id: ProductId,
    include_suggestions: bool,
    pool: &PgPool,
) -> Result<AddonMatchesView> {
    let addon_ids = AddonMatch::addon_ids_for_product(product_id, pool).await?;
    let suggestions = if include_suggestions {
        suggest_addons(product_id, &addon_ids, pool).await?
    } else {
        Vec::new()
    };

    Ok(AddonMatchesView {
        addon_ids,
        suggestions,
    })
}

/// Published boosters sharing skin concerns with `product_id`, excluding
/// `already_matched`.
pub async fn suggest_addons(
    product_id: ProductId,
    already_matched: &[ProductId],
    pool: &PgPool,
) -> Result<Vec<AddonSuggestion>> {
    let product = Product::find_by_id(product_id, pool)
        .await?
        .ok_or_else(|| anyhow!("Product not found"))?;

    let Some(attribute) = ProductAttribute::skin_concerns(product.business_unit_id, pool).await?
    else {
        return Ok(Vec::new());
    };

    let concern_ids = AttributeValue::option_ids_for_product(product_id, attribute.id, pool).await?;
    if concern_ids.is_empty() {
        return Ok(Vec::new());
    }

    let concern_names: HashMap<_, _> = AttributeOption::find_with_category(&concern_ids, pool)
        .await?
        .into_iter()
        .map(|o| (o.id, o.name))
        .collect();

    let rows = AddonMatch::shared_concern_rows(product_id, attribute.id, &concern_ids, pool).await?;

    Ok(rank_suggestions(&rows, &concern_names, already_matched))
}

/// Replace a product's matches; display order follows `addon_ids`.
pub async fn set_addon_matches(
    product_id: ProductId,
    addon_ids: &[ProductId],
    pool: &PgPool,
) -> Result<usize> {
    let count = AddonMatch::replace(product_id, addon_ids, pool).await?;
    info!(product_id = %product_id, count, "Add-on matches saved");
    Ok(count)
}

/// Group by tenant, tenants in id order, items in input order.
fn group_by_unit<T>(
    items: Vec<T>,
    unit_of: impl Fn(&T) -> BusinessUnitId,
) -> BTreeMap<BusinessUnitId, Vec<T>> {
    let mut grouped: BTreeMap<BusinessUnitId, Vec<T>> = BTreeMap::new();
    for item in items {
        grouped.entry(unit_of(&item)).or_default().push(item);
    }
    grouped
}

/// Rebuild matches from shared concerns for every published base product in
/// a business unit (or just `product_id`).
///
/// Each base product gets up to ten boosters, ranked by number of shared
/// concerns. Products without concerns have their matches cleared.
pub async fn regenerate_addon_matches(
    business_unit_id: Option<BusinessUnitId>,
    product_id: Option<ProductId>,
    pool: &PgPool,
) -> Result<RegenerationReport> {
    let products =
        Product::find_published_with_kind(business_unit_id, product_id, pool).await?;
    let base_products: Vec<_> = products.into_iter().filter(|p| !p.is_addon).collect();

    if base_products.is_empty() {
        info!("No base products to process");
        return Ok(RegenerationReport {
            processed: 0,
            matches: 0,
            results: Vec::new(),
        });
    }

    let mut processed = 0;
    let mut total_matches = 0;
    let mut results = Vec::with_capacity(base_products.len());

    // Products can span tenants when no business unit was given.
    let by_unit = group_by_unit(base_products, |p| p.product.business_unit_id);

    for (unit_id, unit_products) in by_unit {
        let attribute = ProductAttribute::skin_concerns(unit_id, pool).await?;
        let mappings = match &attribute {
            Some(a) => AttributeValue::mappings_for_attribute(a.id, pool).await?,
            None => Vec::new(),
        };
        let index = ConcernIndex::build(&mappings);

        let addon_ids: HashSet<ProductId> =
            Product::find_published_with_kind(Some(unit_id), None, pool)
                .await?
                .into_iter()
                .filter(|p| p.is_addon)
                .map(|p| p.product.id)
                .collect();

        for base in unit_products {
            let matched = index.best_addons_for(base.product.id, &addon_ids);

            AddonMatch::replace(base.product.id, &matched, pool).await?;

            processed += 1;
            total_matches += matched.len() as i32;
            results.push(ProductMatchCount {
                product_id: base.product.id,
                title: base.product.title,
                match_count: matched.len() as i32,
            });
        }
    }

    info!(processed, matches = total_matches, "Add-on matches regenerated");

    Ok(RegenerationReport {
        processed,
        matches: total_matches,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenants_are_processed_in_a_stable_order() {
        let first = BusinessUnitId::from_uuid(uuid::Uuid::from_u128(1));
        let second = BusinessUnitId::from_uuid(uuid::Uuid::from_u128(2));
        let items = vec![(second, "eye cream"), (first, "serum"), (second, "toner")];

        let grouped = group_by_unit(items, |(unit, _)| *unit);

        let order: Vec<(BusinessUnitId, Vec<&str>)> = grouped
            .into_iter()
            .map(|(unit, items)| (unit, items.into_iter().map(|(_, title)| title).collect()))
            .collect();
        assert_eq!(
            order,
            vec![(first, vec!["serum"]), (second, vec!["eye cream", "toner"])]
        );
    }
}
