//! Test fixtures for creating test data.
//!
//! Fixtures go through the model methods, the same way the admin API does.

use anyhow::Result;
use commerce_core::common::{
    BusinessUnitId, CategoryId, ChatSessionId, OptionId, ProductId, ProductTypeId,
};
use commerce_core::domains::business_units::BusinessUnit;
use commerce_core::domains::catalog::{
    AddonMatch, AttributeOption, AttributeValue, CreateProduct, Product, ProductAttribute,
    ProductCategory, ProductStatus, ProductType, SKIN_CONCERNS_HANDLE,
};
use commerce_core::domains::chat::{ChatMessage, ChatMode, ChatSession, CreateChatSession};
use commerce_core::domains::knowledge::{CreateKnowledgeEntry, Guideline, KnowledgeEntry};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// A tenant with two body areas, three concerns, two published bases and
/// two boosters wired to them.
///
/// | product              | kind    | price | concerns               | matched to        |
/// |----------------------|---------|-------|------------------------|-------------------|
/// | Clarifying Serum     | base    | 40.00 | Acne                   |                   |
/// | Bright Eye Cream     | base    | 30.00 | Dark Circles           |                   |
/// | Draft Cream          | base    | 25.00 | (draft)                |                   |
/// | Niacinamide Booster  | booster | 10.00 | Acne, Dark Spots       | Clarifying Serum  |
/// | Caffeine Booster     | booster |  8.00 | Dark Circles           | Bright Eye Cream  |
pub struct CatalogFixture {
    pub business_unit_id: BusinessUnitId,
    pub slug: String,
    pub face: CategoryId,
    pub eye: CategoryId,
    pub acne: OptionId,
    pub dark_spots: OptionId,
    pub dark_circles: OptionId,
    pub serum: ProductId,
    pub eye_cream: ProductId,
    pub draft_cream: ProductId,
    pub niacinamide: ProductId,
    pub caffeine: ProductId,
    pub booster_type: ProductTypeId,
}

fn money(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

/// A business unit with a unique slug.
pub async fn create_business_unit(pool: &PgPool) -> Result<BusinessUnit> {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    BusinessUnit::create("Glow Lab", &format!("glow-lab-{}", suffix), pool).await
}

pub async fn seed_catalog(pool: &PgPool) -> Result<CatalogFixture> {
    let unit = create_business_unit(pool).await?;
    let bu = unit.id;

    let face = ProductCategory::create(bu, "Face", "face", 0, pool).await?;
    let eye = ProductCategory::create(bu, "Eye", "eye", 1, pool).await?;

    let attribute = ProductAttribute::create(bu, "Skin Concerns", SKIN_CONCERNS_HANDLE, pool).await?;
    let acne = AttributeOption::create(attribute.id, Some(face.id), "Acne", "acne", 0, pool).await?;
    let dark_spots =
        AttributeOption::create(attribute.id, Some(face.id), "Dark Spots", "dark-spots", 1, pool)
            .await?;
    let dark_circles =
        AttributeOption::create(attribute.id, Some(eye.id), "Dark Circles", "dark-circles", 0, pool)
            .await?;

    let serum_type = ProductType::create(bu, "Serum", "serum", false, pool).await?;
    let booster_type = ProductType::create(bu, "Booster", "booster", true, pool).await?;

    let serum = Product::create(
        CreateProduct::builder()
            .business_unit_id(bu)
            .title("Clarifying Serum")
            .handle("clarifying-serum")
            .product_type_id(Some(serum_type.id))
            .status(ProductStatus::Published)
            .price(money("40.00"))
            .build(),
        pool,
    )
    .await?;
    let eye_cream = Product::create(
        CreateProduct::builder()
            .business_unit_id(bu)
            .title("Bright Eye Cream")
            .handle("bright-eye-cream")
            .product_type_id(Some(serum_type.id))
            .status(ProductStatus::Published)
            .price(money("30.00"))
            .build(),
        pool,
    )
    .await?;
    let draft_cream = Product::create(
        CreateProduct::builder()
            .business_unit_id(bu)
            .title("Draft Cream")
            .handle("draft-cream")
            .product_type_id(Some(serum_type.id))
            .price(money("25.00"))
            .build(),
        pool,
    )
    .await?;
    let niacinamide = Product::create(
        CreateProduct::builder()
            .business_unit_id(bu)
            .title("Niacinamide Booster")
            .handle("niacinamide-booster")
            .product_type_id(Some(booster_type.id))
            .status(ProductStatus::Published)
            .price(money("10.00"))
            .face_benefits(Some("Calms breakouts and fades dark spots".to_string()))
            .build(),
        pool,
    )
    .await?;
    let caffeine = Product::create(
        CreateProduct::builder()
            .business_unit_id(bu)
            .title("Caffeine Booster")
            .handle("caffeine-booster")
            .product_type_id(Some(booster_type.id))
            .status(ProductStatus::Published)
            .price(money("8.00"))
            .eye_benefits(Some("Depuffs and brightens the under-eye area".to_string()))
            .build(),
        pool,
    )
    .await?;

    ProductCategory::set_for_product(serum.id, &[face.id], pool).await?;
    ProductCategory::set_for_product(eye_cream.id, &[eye.id], pool).await?;
    ProductCategory::set_for_product(draft_cream.id, &[face.id], pool).await?;

    AttributeValue::replace(serum.id, attribute.id, &[acne.id], pool).await?;
    AttributeValue::replace(eye_cream.id, attribute.id, &[dark_circles.id], pool).await?;
    AttributeValue::replace(draft_cream.id, attribute.id, &[acne.id], pool).await?;
    AttributeValue::replace(niacinamide.id, attribute.id, &[acne.id, dark_spots.id], pool).await?;
    AttributeValue::replace(caffeine.id, attribute.id, &[dark_circles.id], pool).await?;

    AddonMatch::replace(serum.id, &[niacinamide.id], pool).await?;
    AddonMatch::replace(eye_cream.id, &[caffeine.id], pool).await?;

    Ok(CatalogFixture {
        business_unit_id: bu,
        slug: unit.slug,
        face: face.id,
        eye: eye.id,
        acne: acne.id,
        dark_spots: dark_spots.id,
        dark_circles: dark_circles.id,
        serum: serum.id,
        eye_cream: eye_cream.id,
        draft_cream: draft_cream.id,
        niacinamide: niacinamide.id,
        caffeine: caffeine.id,
        booster_type: booster_type.id,
    })
}

/// A knowledge entry and a guideline for the sales assistant.
pub async fn seed_knowledge(business_unit_id: BusinessUnitId, pool: &PgPool) -> Result<()> {
    KnowledgeEntry::create(
        CreateKnowledgeEntry::builder()
            .business_unit_id(business_unit_id)
            .category("products")
            .topic(Some("Niacinamide".to_string()))
            .content("Niacinamide Booster can be mixed into any serum, twice daily.")
            .keywords(vec!["niacinamide".to_string(), "booster".to_string()])
            .build(),
        pool,
    )
    .await?;

    Guideline::create(
        business_unit_id,
        "tone",
        "Be warm",
        "Greet the customer by name when you know it.",
        pool,
    )
    .await?;

    Ok(())
}

/// A livechat session with the given (customer, assistant) exchanges.
pub async fn seed_conversation(
    business_unit_id: BusinessUnitId,
    user_name: Option<&str>,
    exchanges: &[(&str, &str)],
    pool: &PgPool,
) -> Result<ChatSessionId> {
    let session = ChatSession::create(
        CreateChatSession {
            business_unit_id,
            mode: ChatMode::Livechat,
            staff_name: "Mia".to_string(),
            staff_role: "skin coach".to_string(),
            language: None,
            user_name: user_name.map(str::to_string),
        },
        pool,
    )
    .await?;

    for (customer, reply) in exchanges {
        ChatMessage::record_exchange(session.id, customer, reply, pool).await?;
    }

    Ok(session.id)
}
