use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use crate::common::{BusinessUnitId, OptionId, ProductId};
use crate::domains::catalog::concern_assignment::{
    build_assignment_prompt, match_concern_names, ConcernChoice, CATEGORY_BENEFIT_FIELDS,
};
use crate::domains::catalog::models::{
    AttributeOption, AttributeValue, Product, ProductAttribute, ProductCategory,
};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct AssignOptions {
    /// Report what would be assigned without writing
    pub dry_run: bool,
    /// Pause between LLM calls (provider rate limits)
    pub pause: Duration,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            pause: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BoosterAssignment {
    pub product_id: ProductId,
    pub title: String,
    pub concern_ids: Vec<OptionId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentReport {
    pub boosters: usize,
    pub links: usize,
    pub written: bool,
    pub assignments: Vec<BoosterAssignment>,
}

/// Tag every booster of a business unit with the skin concerns its benefit
/// texts address, as judged by the LLM.
///
/// Each (booster, category) pair with benefit text is one LLM call against
/// that category's concerns. A failed call counts as "no match" for that
/// pair. Existing skin-concern tags of the boosters are replaced only when
/// at least one link was found.
pub async fn assign_booster_concerns(
    business_unit_id: BusinessUnitId,
    options: &AssignOptions,
    deps: &ServerDeps,
) -> Result<AssignmentReport> {
    let pool = &deps.db_pool;

    let attribute = ProductAttribute::skin_concerns(business_unit_id, pool)
        .await?
        .ok_or_else(|| anyhow!("skin_concerns attribute not configured"))?;

    let mut concerns_by_category: HashMap<String, Vec<ConcernChoice>> = HashMap::new();
    for category in ProductCategory::find_by_business_unit(business_unit_id, pool).await? {
        let choices = AttributeOption::find_for_category(attribute.id, category.id, pool)
            .await?
            .into_iter()
            .map(|o| ConcernChoice {
                id: o.id,
                name: o.name,
            })
            .collect();
        concerns_by_category.insert(category.handle, choices);
    }

    let boosters = Product::find_addons(business_unit_id, pool).await?;
    info!(boosters = boosters.len(), "Assigning booster concerns");

    let mut assignments = Vec::with_capacity(boosters.len());

    for booster in &boosters {
        let mut concern_ids: Vec<OptionId> = Vec::new();

        for (handle, _) in CATEGORY_BENEFIT_FIELDS {
            let Some(benefits) = booster.benefits_for(handle) else {
                continue;
            };
            let Some(concerns) = concerns_by_category.get(handle).filter(|c| !c.is_empty())
            else {
                continue;
            };

            let prompt = build_assignment_prompt(&booster.title, benefits, concerns);
            let matched = match deps.llm.complete(&prompt).await {
                Ok(response) => match_concern_names(&response, concerns),
                Err(e) => {
                    warn!(booster = %booster.title, category = handle, error = %e, "Concern analysis failed");
                    Vec::new()
                }
            };

            for id in matched {
                if !concern_ids.contains(&id) {
                    concern_ids.push(id);
                }
            }

            if !options.pause.is_zero() {
                tokio::time::sleep(options.pause).await;
            }
        }

        info!(booster = %booster.title, concerns = concern_ids.len(), "Booster analyzed");
        assignments.push(BoosterAssignment {
            product_id: booster.id,
            title: booster.title.clone(),
            concern_ids,
        });
    }

    let links: usize = assignments.iter().map(|a| a.concern_ids.len()).sum();
    let write = !options.dry_run && links > 0;

    if write {
        for assignment in &assignments {
            AttributeValue::replace(
                assignment.product_id,
                attribute.id,
                &assignment.concern_ids,
                pool,
            )
            .await?;
        }
        info!(links, "Booster concern links written");
    }

    Ok(AssignmentReport {
        boosters: boosters.len(),
        links,
        written: write,
        assignments,
    })
}
