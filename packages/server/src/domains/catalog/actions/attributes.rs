use anyhow::{anyhow, Result};
use sqlx::PgPool;
use tracing::info;

use crate::common::{AttributeId, OptionId, ProductId};
use crate::domains::catalog::models::{
    AttributeOption, AttributeValue, AttributeValueRow, Product,
};

/// Replace the options a product carries for one attribute.
///
/// Options must belong to `attribute_id`.
pub async fn set_attribute_values(
    product_id: ProductId,
    attribute_id: AttributeId,
    option_ids: &[OptionId],
    pool: &PgPool,
) -> Result<()> {
    Product::find_by_id(product_id, pool)
        .await?
        .ok_or_else(|| anyhow!("Product not found"))?;

    for option_id in option_ids {
        let option = AttributeOption::find_by_id(*option_id, pool)
            .await?
            .ok_or_else(|| anyhow!("Attribute option {} not found", option_id))?;
        if option.attribute_id != attribute_id {
            return Err(anyhow!(
                "Option {} does not belong to attribute {}",
                option_id,
                attribute_id
            ));
        }
    }

    AttributeValue::replace(product_id, attribute_id, option_ids, pool).await?;

    info!(
        product_id = %product_id,
        attribute_id = %attribute_id,
        count = option_ids.len(),
        "Attribute values replaced"
    );
    Ok(())
}

pub async fn list_attribute_values(
    product_ids: &[ProductId],
    pool: &PgPool,
) -> Result<Vec<AttributeValueRow>> {
    AttributeValue::list_for_products(product_ids, pool).await
}
