//! Admin GraphQL schema.
//!
//! Every resolver requires an admin JWT. Resolvers stay thin: parse ids,
//! call the model or domain action, convert to the `*Data` type.

use super::context::GraphQLContext;
use chrono::{DateTime, Utc};
use juniper::{EmptySubscription, FieldError, FieldResult, RootNode};
use tracing::info;

use crate::common::{
    slugify, AttributeId, BundleId, BusinessUnitId, BusinessUnitRef, CategoryId, ChatSessionId,
    GuidelineId, KnowledgeEntryId, MediaFileId, OperationResult, OptionId, ProductId,
    ProductTypeId, TrainingLessonId,
};

// Domain actions
use crate::domains::catalog::actions as catalog_actions;
use crate::domains::conversations::actions as conversation_actions;
use crate::domains::media::actions::{self as media_actions, RegisterMedia};

// Domain data types (GraphQL types)
use crate::domains::bundles::data::{BundleData, BundleInput};
use crate::domains::business_units::data::BusinessUnitData;
use crate::domains::catalog::data::{
    money_from_f64, AddonMatchesData, AttributeData, AttributeOptionData, AttributeOptionInput,
    AttributeValueData, CategoryData, CategoryInput, CreateProductInput, ProductData,
    ProductTypeData, RegenerationReportData, UpdateProductInput,
};
use crate::domains::conversations::data::{
    AnalysisBatchData, ChatMessageData, ConversationAnalysisData, ConversationPageData,
};
use crate::domains::knowledge::data::{
    GuidelineData, GuidelineInput, KnowledgeEntryData, KnowledgeEntryInput, TrainingLessonData,
};
use crate::domains::media::data::{MediaFileData, MediaFileInput};

// Domain models
use crate::domains::bundles::{BundleType, CreateBundle, DiscountType, ProductBundle, UpdateBundle};
use crate::domains::business_units::BusinessUnit;
use crate::domains::catalog::{
    AttributeOption, CreateProduct, Product, ProductAttribute, ProductCategory, ProductStatus,
    ProductType, UpdateProduct,
};
use crate::domains::conversations::{ConversationFilter, FlagFilter};
use crate::domains::knowledge::{
    CreateKnowledgeEntry, Guideline, KnowledgeEntry, TrainingMemory, UpdateKnowledgeEntry,
};
use crate::domains::media::MediaError;

/// Result of the booster concern assignment job
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct AssignmentReportData {
    pub boosters: i32,
    pub links: i32,
    pub written: bool,
}

// =============================================================================
// Helper functions
// =============================================================================

/// Convert anyhow::Error to juniper FieldError for thin resolvers
fn to_field_error(e: anyhow::Error) -> FieldError {
    FieldError::new(e.to_string(), juniper::Value::null())
}

fn media_error(e: MediaError) -> FieldError {
    FieldError::new(e.to_string(), juniper::Value::null())
}

fn not_found(what: &str) -> FieldError {
    FieldError::new(format!("{} not found", what), juniper::Value::null())
}

/// Accepts either the UUID or the slug of a business unit.
async fn resolve_business_unit(ctx: &GraphQLContext, raw: &str) -> FieldResult<BusinessUnitId> {
    BusinessUnit::resolve(&BusinessUnitRef::parse(raw), &ctx.db_pool)
        .await?
        .ok_or_else(|| not_found("Business unit"))
}

fn parse_ids<T>(raw: &[String]) -> FieldResult<Vec<crate::common::Id<T>>> {
    raw.iter()
        .map(|s| crate::common::Id::parse(s).map_err(Into::into))
        .collect()
}

fn parse_money(value: Option<f64>) -> FieldResult<Option<rust_decimal::Decimal>> {
    value.map(money_from_f64).transpose().map_err(to_field_error)
}

fn parse_json(value: Option<String>) -> FieldResult<Option<serde_json::Value>> {
    value
        .map(|s| serde_json::from_str(&s))
        .transpose()
        .map_err(|e| FieldError::new(format!("Invalid JSON: {}", e), juniper::Value::null()))
}

async fn option_data(id: OptionId, ctx: &GraphQLContext) -> FieldResult<AttributeOptionData> {
    AttributeOption::find_with_category(&[id], &ctx.db_pool)
        .await?
        .into_iter()
        .next()
        .map(AttributeOptionData::from)
        .ok_or_else(|| not_found("Attribute option"))
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    // =========================================================================
    // Business units
    // =========================================================================

    async fn business_units(ctx: &GraphQLContext) -> FieldResult<Vec<BusinessUnitData>> {
        ctx.require_admin()?;

        let units = BusinessUnit::find_all(&ctx.db_pool).await?;
        Ok(units.into_iter().map(BusinessUnitData::from).collect())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Products of a business unit (soft-deleted excluded)
    async fn products(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<ProductData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let products = Product::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(products.into_iter().map(ProductData::from).collect())
    }

    async fn product(ctx: &GraphQLContext, id: String) -> FieldResult<Option<ProductData>> {
        ctx.require_admin()?;

        let product_id = ProductId::parse(&id)?;
        let product = Product::find_by_id(product_id, &ctx.db_pool).await?;
        Ok(product.map(ProductData::from))
    }

    async fn product_types(
        ctx: &GraphQLContext,
        business_unit_id: String,
    ) -> FieldResult<Vec<ProductTypeData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let types = ProductType::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(types.into_iter().map(ProductTypeData::from).collect())
    }

    async fn categories(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<CategoryData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let categories = ProductCategory::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(categories.into_iter().map(CategoryData::from).collect())
    }

    async fn attributes(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<AttributeData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let attributes = ProductAttribute::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(attributes.into_iter().map(AttributeData::from).collect())
    }

    async fn attribute_options(
        ctx: &GraphQLContext,
        attribute_id: String,
    ) -> FieldResult<Vec<AttributeOptionData>> {
        ctx.require_admin()?;

        let attribute_id = AttributeId::parse(&attribute_id)?;
        let options = AttributeOption::find_for_attribute(attribute_id, &ctx.db_pool).await?;
        Ok(options.into_iter().map(AttributeOptionData::from).collect())
    }

    /// Attribute values for a set of products
    async fn attribute_values(
        ctx: &GraphQLContext,
        product_ids: Vec<String>,
    ) -> FieldResult<Vec<AttributeValueData>> {
        ctx.require_admin()?;

        let ids: Vec<ProductId> = parse_ids(&product_ids)?;
        let rows = catalog_actions::list_attribute_values(&ids, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(rows.into_iter().map(AttributeValueData::from).collect())
    }

    /// Boosters matched to a base product, optionally with ranked suggestions
    async fn addon_matches(
        ctx: &GraphQLContext,
        product_id: String,
        include_suggestions: Option<bool>,
    ) -> FieldResult<AddonMatchesData> {
        ctx.require_admin()?;

        let product_id = ProductId::parse(&product_id)?;
        let view = catalog_actions::get_addon_matches(
            product_id,
            include_suggestions.unwrap_or(false),
            &ctx.db_pool,
        )
        .await
        .map_err(to_field_error)?;
        Ok(AddonMatchesData::from(view))
    }

    // =========================================================================
    // Bundles
    // =========================================================================

    async fn bundles(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<BundleData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let bundles = ProductBundle::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(bundles.into_iter().map(BundleData::from).collect())
    }

    async fn bundle(ctx: &GraphQLContext, id: String) -> FieldResult<Option<BundleData>> {
        ctx.require_admin()?;

        let bundle = ProductBundle::find_by_id(BundleId::parse(&id)?, &ctx.db_pool).await?;
        Ok(bundle.map(BundleData::from))
    }

    // =========================================================================
    // Knowledge base
    // =========================================================================

    async fn knowledge_entries(
        ctx: &GraphQLContext,
        business_unit_id: String,
    ) -> FieldResult<Vec<KnowledgeEntryData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let entries = KnowledgeEntry::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(entries.into_iter().map(KnowledgeEntryData::from).collect())
    }

    async fn guidelines(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<GuidelineData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let guidelines = Guideline::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(guidelines.into_iter().map(GuidelineData::from).collect())
    }

    async fn training_memory(
        ctx: &GraphQLContext,
        business_unit_id: String,
    ) -> FieldResult<Vec<TrainingLessonData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let lessons = TrainingMemory::find_by_business_unit(bu, &ctx.db_pool).await?;
        Ok(lessons.into_iter().map(TrainingLessonData::from).collect())
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    /// Chat sessions for review, newest first. `flag` is all, warning
    /// (warnings and alerts) or alert.
    async fn conversations(
        ctx: &GraphQLContext,
        business_unit_id: Option<String>,
        search: Option<String>,
        flag: Option<String>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: Option<i32>,
        limit: Option<i32>,
    ) -> FieldResult<ConversationPageData> {
        ctx.require_admin()?;

        let bu = match business_unit_id {
            Some(raw) => Some(resolve_business_unit(ctx, &raw).await?),
            None => None,
        };
        let filter = ConversationFilter {
            business_unit_id: bu,
            search,
            flag: flag.as_deref().map(str::parse::<FlagFilter>).transpose()?.unwrap_or_default(),
            from,
            to,
        };

        let page = conversation_actions::list_conversations(
            &filter,
            page.map(i64::from),
            limit.map(i64::from),
            &ctx.db_pool,
        )
        .await
        .map_err(to_field_error)?;
        Ok(ConversationPageData::from(page))
    }

    async fn conversation_messages(
        ctx: &GraphQLContext,
        session_id: String,
    ) -> FieldResult<Vec<ChatMessageData>> {
        ctx.require_admin()?;

        let messages =
            conversation_actions::conversation_messages(ChatSessionId::parse(&session_id)?, &ctx.db_pool)
                .await
                .map_err(to_field_error)?
                .ok_or_else(|| not_found("Chat session"))?;
        Ok(messages.into_iter().map(ChatMessageData::from).collect())
    }

    // =========================================================================
    // Media library
    // =========================================================================

    async fn media_files(ctx: &GraphQLContext, business_unit_id: String) -> FieldResult<Vec<MediaFileData>> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let files = media_actions::list_media(bu, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(files.into_iter().map(MediaFileData::from).collect())
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Business units
    // =========================================================================

    async fn create_business_unit(
        ctx: &GraphQLContext,
        name: String,
        slug: Option<String>,
    ) -> FieldResult<BusinessUnitData> {
        ctx.require_admin()?;

        let slug = slug.unwrap_or_else(|| slugify(&name));
        let unit = BusinessUnit::create(&name, &slug, &ctx.db_pool).await?;
        info!(business_unit_id = %unit.id, slug = %unit.slug, "Business unit created");
        Ok(BusinessUnitData::from(unit))
    }

    // =========================================================================
    // Products
    // =========================================================================

    async fn create_product(ctx: &GraphQLContext, input: CreateProductInput) -> FieldResult<ProductData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &input.business_unit_id).await?;
        let product_type_id = input
            .product_type_id
            .as_deref()
            .map(ProductTypeId::parse)
            .transpose()?;
        let status = match input.status.as_deref() {
            Some(s) => s.parse::<ProductStatus>()?,
            None => ProductStatus::Draft,
        };
        let handle = input.handle.unwrap_or_else(|| slugify(&input.title));

        let product = Product::create(
            CreateProduct::builder()
                .business_unit_id(bu)
                .title(input.title)
                .handle(handle)
                .product_type_id(product_type_id)
                .description(input.description)
                .thumbnail(input.thumbnail)
                .status(status)
                .price(parse_money(input.price)?.unwrap_or_default())
                .face_benefits(input.face_benefits)
                .eye_benefits(input.eye_benefits)
                .body_benefits(input.body_benefits)
                .hair_benefits(input.hair_benefits)
                .build(),
            &ctx.db_pool,
        )
        .await?;

        if let Some(raw) = input.category_ids {
            let category_ids: Vec<CategoryId> = parse_ids(&raw)?;
            ProductCategory::set_for_product(product.id, &category_ids, &ctx.db_pool).await?;
        }

        info!(product_id = %product.id, "Product created");
        Ok(ProductData::from(product))
    }

    async fn update_product(
        ctx: &GraphQLContext,
        id: String,
        input: UpdateProductInput,
    ) -> FieldResult<ProductData> {
        ctx.require_admin()?;

        let product_id = ProductId::parse(&id)?;
        let update = UpdateProduct {
            title: input.title,
            handle: input.handle,
            product_type_id: input
                .product_type_id
                .as_deref()
                .map(ProductTypeId::parse)
                .transpose()?,
            description: input.description,
            thumbnail: input.thumbnail,
            status: input
                .status
                .as_deref()
                .map(str::parse::<ProductStatus>)
                .transpose()?,
            price: parse_money(input.price)?,
            face_benefits: input.face_benefits,
            eye_benefits: input.eye_benefits,
            body_benefits: input.body_benefits,
            hair_benefits: input.hair_benefits,
            metadata: None,
        };
        let product = Product::update(product_id, update, &ctx.db_pool).await?;

        if let Some(raw) = input.category_ids {
            let category_ids: Vec<CategoryId> = parse_ids(&raw)?;
            ProductCategory::set_for_product(product.id, &category_ids, &ctx.db_pool).await?;
        }

        Ok(ProductData::from(product))
    }

    async fn delete_product(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        Product::soft_delete(ProductId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    async fn create_product_type(
        ctx: &GraphQLContext,
        business_unit_id: String,
        name: String,
        is_addon: bool,
    ) -> FieldResult<ProductTypeData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let product_type = ProductType::create(bu, &name, &slugify(&name), is_addon, &ctx.db_pool).await?;
        Ok(ProductTypeData::from(product_type))
    }

    // =========================================================================
    // Categories and attributes
    // =========================================================================

    async fn create_category(
        ctx: &GraphQLContext,
        business_unit_id: String,
        input: CategoryInput,
    ) -> FieldResult<CategoryData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let handle = input.handle.unwrap_or_else(|| slugify(&input.name));
        let category = ProductCategory::create(
            bu,
            &input.name,
            &handle,
            input.display_order.unwrap_or(0),
            &ctx.db_pool,
        )
        .await?;
        Ok(CategoryData::from(category))
    }

    async fn update_category(
        ctx: &GraphQLContext,
        id: String,
        input: CategoryInput,
    ) -> FieldResult<CategoryData> {
        ctx.require_admin()?;

        let category = ProductCategory::update(
            CategoryId::parse(&id)?,
            Some(input.name.as_str()),
            input.handle.as_deref(),
            input.display_order,
            &ctx.db_pool,
        )
        .await?;
        Ok(CategoryData::from(category))
    }

    async fn delete_category(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        ProductCategory::delete(CategoryId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    async fn create_attribute(
        ctx: &GraphQLContext,
        business_unit_id: String,
        name: String,
        handle: Option<String>,
    ) -> FieldResult<AttributeData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let handle = handle.unwrap_or_else(|| slugify(&name).replace('-', "_"));
        let attribute = ProductAttribute::create(bu, &name, &handle, &ctx.db_pool).await?;
        Ok(AttributeData::from(attribute))
    }

    async fn delete_attribute(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        ProductAttribute::delete(AttributeId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    async fn create_attribute_option(
        ctx: &GraphQLContext,
        attribute_id: String,
        input: AttributeOptionInput,
    ) -> FieldResult<AttributeOptionData> {
        ctx.require_admin()?;

        let category_id = input.category_id.as_deref().map(CategoryId::parse).transpose()?;
        let handle = input.handle.unwrap_or_else(|| slugify(&input.name));
        let option = AttributeOption::create(
            AttributeId::parse(&attribute_id)?,
            category_id,
            &input.name,
            &handle,
            input.display_order.unwrap_or(0),
            &ctx.db_pool,
        )
        .await?;
        option_data(option.id, ctx).await
    }

    async fn update_attribute_option(
        ctx: &GraphQLContext,
        id: String,
        input: AttributeOptionInput,
    ) -> FieldResult<AttributeOptionData> {
        ctx.require_admin()?;

        let category_id = input.category_id.as_deref().map(CategoryId::parse).transpose()?;
        let option = AttributeOption::update(
            OptionId::parse(&id)?,
            Some(input.name.as_str()),
            category_id,
            input.display_order,
            &ctx.db_pool,
        )
        .await?;
        option_data(option.id, ctx).await
    }

    async fn delete_attribute_option(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        AttributeOption::delete(OptionId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    /// Replace the options a product carries for one attribute
    async fn set_attribute_values(
        ctx: &GraphQLContext,
        product_id: String,
        attribute_id: String,
        option_ids: Vec<String>,
    ) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        let options: Vec<OptionId> = parse_ids(&option_ids)?;
        catalog_actions::set_attribute_values(
            ProductId::parse(&product_id)?,
            AttributeId::parse(&attribute_id)?,
            &options,
            &ctx.db_pool,
        )
        .await
        .map_err(to_field_error)?;
        Ok(OperationResult::ok())
    }

    // =========================================================================
    // Booster matching
    // =========================================================================

    async fn set_addon_matches(
        ctx: &GraphQLContext,
        product_id: String,
        addon_ids: Vec<String>,
    ) -> FieldResult<AddonMatchesData> {
        ctx.require_admin()?;

        let product_id = ProductId::parse(&product_id)?;
        let addons: Vec<ProductId> = parse_ids(&addon_ids)?;
        catalog_actions::set_addon_matches(product_id, &addons, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;

        let view = catalog_actions::get_addon_matches(product_id, false, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(AddonMatchesData::from(view))
    }

    /// Rebuild base → booster matches from shared skin concerns
    async fn regenerate_addon_matches(
        ctx: &GraphQLContext,
        business_unit_id: Option<String>,
        product_id: Option<String>,
    ) -> FieldResult<RegenerationReportData> {
        ctx.require_admin()?;

        let bu = match business_unit_id {
            Some(raw) => Some(resolve_business_unit(ctx, &raw).await?),
            None => None,
        };
        let product_id = product_id.as_deref().map(ProductId::parse).transpose()?;

        let report = catalog_actions::regenerate_addon_matches(bu, product_id, &ctx.db_pool)
            .await
            .map_err(to_field_error)?;
        Ok(RegenerationReportData::from(report))
    }

    /// Tag boosters with skin concerns using the LLM
    async fn assign_booster_concerns(
        ctx: &GraphQLContext,
        business_unit_id: String,
        dry_run: Option<bool>,
    ) -> FieldResult<AssignmentReportData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let options = catalog_actions::AssignOptions {
            dry_run: dry_run.unwrap_or(false),
            ..Default::default()
        };
        let report = catalog_actions::assign_booster_concerns(bu, &options, ctx.deps())
            .await
            .map_err(to_field_error)?;

        Ok(AssignmentReportData {
            boosters: report.boosters as i32,
            links: report.links as i32,
            written: report.written,
        })
    }

    // =========================================================================
    // Bundles
    // =========================================================================

    async fn create_bundle(
        ctx: &GraphQLContext,
        business_unit_id: String,
        input: BundleInput,
    ) -> FieldResult<BundleData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let create = CreateBundle::builder()
            .business_unit_id(bu)
            .name(input.name.unwrap_or_default())
            .description(input.description)
            .thumbnail(input.thumbnail)
            .bundle_type(
                input
                    .bundle_type
                    .as_deref()
                    .map(str::parse::<BundleType>)
                    .transpose()?
                    .unwrap_or(BundleType::Fixed),
            )
            .products(parse_json(input.products)?.unwrap_or_else(|| serde_json::json!([])))
            .discount_type(
                input
                    .discount_type
                    .as_deref()
                    .map(str::parse::<DiscountType>)
                    .transpose()?
                    .unwrap_or(DiscountType::Percentage),
            )
            .discount_value(parse_money(input.discount_value)?.unwrap_or_default())
            .original_price(parse_money(input.original_price)?.unwrap_or_default())
            .final_price(parse_money(input.final_price)?.unwrap_or_default())
            .savings(parse_money(input.savings)?.unwrap_or_default())
            .subscription_duration(input.subscription_duration)
            .is_active(input.is_active.unwrap_or(true))
            .is_featured(input.is_featured.unwrap_or(false))
            .build();

        let bundle = ProductBundle::create(create, &ctx.db_pool).await?;
        info!(bundle_id = %bundle.id, handle = %bundle.handle, "Bundle created");
        Ok(BundleData::from(bundle))
    }

    async fn update_bundle(ctx: &GraphQLContext, id: String, input: BundleInput) -> FieldResult<BundleData> {
        ctx.require_admin()?;

        let update = UpdateBundle {
            name: input.name,
            description: input.description,
            thumbnail: input.thumbnail,
            bundle_type: input
                .bundle_type
                .as_deref()
                .map(str::parse::<BundleType>)
                .transpose()?,
            products: parse_json(input.products)?,
            discount_type: input
                .discount_type
                .as_deref()
                .map(str::parse::<DiscountType>)
                .transpose()?,
            discount_value: parse_money(input.discount_value)?,
            original_price: parse_money(input.original_price)?,
            final_price: parse_money(input.final_price)?,
            savings: parse_money(input.savings)?,
            subscription_duration: input.subscription_duration,
            is_active: input.is_active,
            is_featured: input.is_featured,
        };

        let bundle = ProductBundle::update(BundleId::parse(&id)?, update, &ctx.db_pool).await?;
        Ok(BundleData::from(bundle))
    }

    async fn delete_bundle(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        ProductBundle::delete(BundleId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    // =========================================================================
    // Knowledge base
    // =========================================================================

    async fn create_knowledge_entry(
        ctx: &GraphQLContext,
        business_unit_id: String,
        input: KnowledgeEntryInput,
    ) -> FieldResult<KnowledgeEntryData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let content = input
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| FieldError::new("Content is required", juniper::Value::null()))?;

        let create = CreateKnowledgeEntry::builder()
            .business_unit_id(bu)
            .content(content)
            .topic(input.topic)
            .keywords(input.keywords.unwrap_or_default())
            .confidence(input.confidence);
        let entry = match input.category {
            Some(category) => KnowledgeEntry::create(create.category(category).build(), &ctx.db_pool).await?,
            None => KnowledgeEntry::create(create.build(), &ctx.db_pool).await?,
        };
        Ok(KnowledgeEntryData::from(entry))
    }

    async fn update_knowledge_entry(
        ctx: &GraphQLContext,
        id: String,
        input: KnowledgeEntryInput,
    ) -> FieldResult<KnowledgeEntryData> {
        ctx.require_admin()?;

        let update = UpdateKnowledgeEntry {
            category: input.category,
            topic: input.topic,
            content: input.content,
            keywords: input.keywords,
            confidence: input.confidence,
        };
        let entry = KnowledgeEntry::update(KnowledgeEntryId::parse(&id)?, update, &ctx.db_pool).await?;
        Ok(KnowledgeEntryData::from(entry))
    }

    async fn delete_knowledge_entry(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        KnowledgeEntry::delete(KnowledgeEntryId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    async fn create_guideline(
        ctx: &GraphQLContext,
        business_unit_id: String,
        input: GuidelineInput,
    ) -> FieldResult<GuidelineData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let (Some(title), Some(content)) = (input.title, input.content) else {
            return Err(FieldError::new(
                "Title and content are required",
                juniper::Value::null(),
            ));
        };
        let category = input.category.unwrap_or_else(|| "general".to_string());

        let guideline = Guideline::create(bu, &category, &title, &content, &ctx.db_pool).await?;
        Ok(GuidelineData::from(guideline))
    }

    async fn update_guideline(
        ctx: &GraphQLContext,
        id: String,
        input: GuidelineInput,
    ) -> FieldResult<GuidelineData> {
        ctx.require_admin()?;

        let guideline = Guideline::update(
            GuidelineId::parse(&id)?,
            input.category.as_deref(),
            input.title.as_deref(),
            input.content.as_deref(),
            &ctx.db_pool,
        )
        .await?;
        Ok(GuidelineData::from(guideline))
    }

    async fn delete_guideline(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        Guideline::delete(GuidelineId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    async fn delete_training_lesson(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        TrainingMemory::delete(TrainingLessonId::parse(&id)?, &ctx.db_pool).await?;
        Ok(OperationResult::ok())
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    /// Tag and flag one conversation with the LLM
    async fn analyze_conversation(
        ctx: &GraphQLContext,
        session_id: String,
    ) -> FieldResult<ConversationAnalysisData> {
        ctx.require_admin()?;

        let analysis =
            conversation_actions::analyze_conversation(ChatSessionId::parse(&session_id)?, ctx.deps())
                .await
                .map_err(to_field_error)?
                .ok_or_else(|| not_found("Chat session"))?;
        Ok(ConversationAnalysisData::from(analysis))
    }

    /// Analyze the oldest conversations that were never analyzed (20 by default)
    async fn analyze_unanalyzed_conversations(
        ctx: &GraphQLContext,
        business_unit_id: Option<String>,
        limit: Option<i32>,
    ) -> FieldResult<AnalysisBatchData> {
        ctx.require_admin()?;

        let bu = match business_unit_id {
            Some(raw) => Some(resolve_business_unit(ctx, &raw).await?),
            None => None,
        };
        let report = conversation_actions::analyze_unanalyzed(bu, limit.map(i64::from), ctx.deps())
            .await
            .map_err(to_field_error)?;
        Ok(AnalysisBatchData::from(report))
    }

    // =========================================================================
    // Media library
    // =========================================================================

    /// Record a file uploaded to object storage
    async fn register_media_file(
        ctx: &GraphQLContext,
        business_unit_id: String,
        input: MediaFileInput,
    ) -> FieldResult<MediaFileData> {
        ctx.require_admin()?;

        let bu = resolve_business_unit(ctx, &business_unit_id).await?;
        let file = media_actions::register_media(
            bu,
            RegisterMedia {
                original_name: input.original_name,
                mime_type: input.mime_type,
                size_bytes: i64::from(input.size_bytes),
                url: input.url,
                alt_text: input.alt_text,
            },
            &ctx.db_pool,
        )
        .await
        .map_err(media_error)?;
        Ok(MediaFileData::from(file))
    }

    async fn update_media_file(
        ctx: &GraphQLContext,
        id: String,
        original_name: Option<String>,
        alt_text: Option<String>,
    ) -> FieldResult<MediaFileData> {
        ctx.require_admin()?;

        let file = media_actions::update_media(
            MediaFileId::parse(&id)?,
            original_name.as_deref(),
            alt_text.as_deref(),
            &ctx.db_pool,
        )
        .await
        .map_err(media_error)?;
        Ok(MediaFileData::from(file))
    }

    async fn delete_media_file(ctx: &GraphQLContext, id: String) -> FieldResult<OperationResult> {
        ctx.require_admin()?;

        media_actions::delete_media(MediaFileId::parse(&id)?, &ctx.db_pool)
            .await
            .map_err(media_error)?;
        Ok(OperationResult::ok())
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
