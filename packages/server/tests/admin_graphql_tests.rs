//! Admin GraphQL: authorization, catalog edits, booster matching and the
//! LLM concern assignment job.

mod common;

use crate::common::{seed_catalog, TestHarness};
use axum::http::StatusCode;
use commerce_core::kernel::MockLlm;
use serde_json::{json, Value};
use test_context::test_context;

const BUSINESS_UNITS: &str = "query { businessUnits { id slug } }";

fn first_error(body: &Value) -> &str {
    body["errors"][0]["message"].as_str().unwrap_or_default()
}

// =============================================================================
// Authorization
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_queries_require_a_token(ctx: &mut TestHarness) {
    let res = ctx.graphql(BUSINESS_UNITS, json!({}), None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&res.body), "Authentication required");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn staff_without_admin_flag_is_refused(ctx: &mut TestHarness) {
    let token = ctx.staff_token();
    let res = ctx.graphql(BUSINESS_UNITS, json!({}), Some(&token)).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&res.body), "Admin access required");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn tampered_token_counts_as_anonymous(ctx: &mut TestHarness) {
    let token = format!("{}x", ctx.admin_token());
    let res = ctx.graphql(BUSINESS_UNITS, json!({}), Some(&token)).await;

    assert_eq!(first_error(&res.body), "Authentication required");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_can_create_and_list_business_units(ctx: &mut TestHarness) {
    let token = ctx.admin_token();

    let created = ctx
        .graphql(
            "mutation($name: String!) { createBusinessUnit(name: $name) { id name slug } }",
            vars!("name" => "Sun & Sea Skincare"),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let unit = &created.body["data"]["createBusinessUnit"];
    assert_eq!(unit["slug"], "sun-sea-skincare");

    let listed = ctx.graphql(BUSINESS_UNITS, json!({}), Some(&token)).await;
    let units = listed.body["data"]["businessUnits"].as_array().unwrap();
    assert!(units.iter().any(|u| u["id"] == unit["id"]));
}

// =============================================================================
// Catalog
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn products_are_listed_per_business_unit(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "query($bu: String!) { products(businessUnitId: $bu) { id title status price } }",
            vars!("bu" => catalog.business_unit_id.to_string()),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    let products = res.body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 5);

    let serum = products
        .iter()
        .find(|p| p["id"] == json!(catalog.serum.to_string()))
        .unwrap();
    assert_eq!(serum["price"], 40.0);
    assert_eq!(serum["status"], "published");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn deleted_products_disappear_from_listings(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "mutation($id: String!) { deleteProduct(id: $id) { success } }",
            vars!("id" => catalog.draft_cream.to_string()),
            Some(&token),
        )
        .await;
    assert_eq!(res.body["data"]["deleteProduct"]["success"], true);

    let listed = ctx
        .graphql(
            "query($bu: String!) { products(businessUnitId: $bu) { id } }",
            vars!("bu" => catalog.slug.clone()),
            Some(&token),
        )
        .await;
    let products = listed.body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 4);
    assert!(products
        .iter()
        .all(|p| p["id"] != json!(catalog.draft_cream.to_string())));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn bundles_can_be_created_and_updated(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let created = ctx
        .graphql(
            r#"mutation($bu: String!, $input: BundleInput!) {
                createBundle(businessUnitId: $bu, input: $input) {
                    id handle bundleType discountType finalPrice isActive
                }
            }"#,
            vars!(
                "bu" => catalog.slug.clone(),
                "input" => json!({
                    "name": "Clear Skin Duo",
                    "products": "[{\"productId\":\"x\",\"quantity\":1}]",
                    "discountValue": 15.0,
                    "originalPrice": 50.0,
                    "finalPrice": 42.5,
                    "savings": 7.5,
                }),
            ),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let bundle = &created.body["data"]["createBundle"];
    assert_eq!(bundle["handle"], "clear-skin-duo");
    assert_eq!(bundle["bundleType"], "fixed");
    assert_eq!(bundle["discountType"], "percentage");
    assert_eq!(bundle["finalPrice"], 42.5);
    assert_eq!(bundle["isActive"], true);

    let updated = ctx
        .graphql(
            r#"mutation($id: String!, $input: BundleInput!) {
                updateBundle(id: $id, input: $input) { name handle isFeatured finalPrice }
            }"#,
            vars!(
                "id" => bundle["id"].clone(),
                "input" => json!({ "name": "Clear Skin Trio", "isFeatured": true }),
            ),
            Some(&token),
        )
        .await;
    let bundle = &updated.body["data"]["updateBundle"];
    assert_eq!(bundle["handle"], "clear-skin-trio");
    assert_eq!(bundle["isFeatured"], true);
    assert_eq!(bundle["finalPrice"], 42.5);
}

// =============================================================================
// Booster matching
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn suggestions_rank_boosters_by_shared_concerns(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    ctx.graphql(
        "mutation($id: String!) { setAddonMatches(productId: $id, addonIds: []) { addonIds } }",
        vars!("id" => catalog.serum.to_string()),
        Some(&token),
    )
    .await;

    let res = ctx
        .graphql(
            r#"query($id: String!) {
                addonMatches(productId: $id, includeSuggestions: true) {
                    addonIds
                    suggestions { id score sharedConcerns }
                }
            }"#,
            vars!("id" => catalog.serum.to_string()),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    let matches = &res.body["data"]["addonMatches"];
    assert_eq!(matches["addonIds"], json!([]));
    assert_eq!(
        matches["suggestions"],
        json!([{
            "id": catalog.niacinamide.to_string(),
            "score": 3,
            "sharedConcerns": ["Acne"],
        }])
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn regeneration_rebuilds_matches_from_concerns(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    // Wrong pairing on purpose
    ctx.graphql(
        "mutation($id: String!, $addons: [String!]!) { setAddonMatches(productId: $id, addonIds: $addons) { addonIds } }",
        vars!(
            "id" => catalog.serum.to_string(),
            "addons" => vec![catalog.caffeine.to_string()],
        ),
        Some(&token),
    )
    .await;

    let res = ctx
        .graphql(
            r#"mutation($bu: String!) {
                regenerateAddonMatches(businessUnitId: $bu) {
                    processed matches results { productId matchCount }
                }
            }"#,
            vars!("bu" => catalog.slug.clone()),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    let report = &res.body["data"]["regenerateAddonMatches"];
    // The draft cream is not a published base
    assert_eq!(report["processed"], 2);
    assert_eq!(report["matches"], 2);

    let serum = ctx
        .graphql(
            "query($id: String!) { addonMatches(productId: $id) { addonIds } }",
            vars!("id" => catalog.serum.to_string()),
            Some(&token),
        )
        .await;
    assert_eq!(
        serum.body["data"]["addonMatches"]["addonIds"],
        json!([catalog.niacinamide.to_string()])
    );
}

// =============================================================================
// Concern assignment
// =============================================================================

#[tokio::test]
async fn assignment_tags_boosters_from_llm_answers() {
    // Boosters are processed by title: Caffeine (eye) then Niacinamide (face)
    let ctx = TestHarness::with_llm(
        MockLlm::new()
            .with_response("Dark Circles")
            .with_response("\"acne, Dark Spots\""),
    )
    .await
    .unwrap();
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "mutation($bu: String!) { assignBoosterConcerns(businessUnitId: $bu) { boosters links written } }",
            vars!("bu" => catalog.slug.clone()),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(
        res.body["data"]["assignBoosterConcerns"],
        json!({ "boosters": 2, "links": 3, "written": true })
    );

    assert_eq!(ctx.llm.call_count(), 2);
    let first = ctx.llm.calls()[0].last_user_message().unwrap().to_string();
    assert!(first.contains("BOOSTER: Caffeine Booster"));
    assert!(first.contains("- Dark Circles"));
    assert!(!first.contains("- Acne"));

    let values = ctx
        .graphql(
            "query($ids: [String!]!) { attributeValues(productIds: $ids) { productId optionName } }",
            vars!("ids" => vec![catalog.niacinamide.to_string()]),
            Some(&token),
        )
        .await;
    let mut names: Vec<String> = values.body["data"]["attributeValues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["optionName"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Acne", "Dark Spots"]);
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let ctx = TestHarness::with_llm(MockLlm::new().with_response("NONE").with_response("Acne"))
        .await
        .unwrap();
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "mutation($bu: String!) { assignBoosterConcerns(businessUnitId: $bu, dryRun: true) { links written } }",
            vars!("bu" => catalog.slug.clone()),
            Some(&token),
        )
        .await;

    assert_eq!(
        res.body["data"]["assignBoosterConcerns"],
        json!({ "links": 1, "written": false })
    );

    // Niacinamide keeps both of its seeded tags
    let values = ctx
        .graphql(
            "query($ids: [String!]!) { attributeValues(productIds: $ids) { optionName } }",
            vars!("ids" => vec![catalog.niacinamide.to_string()]),
            Some(&token),
        )
        .await;
    assert_eq!(
        values.body["data"]["attributeValues"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn failed_llm_calls_leave_tags_untouched() {
    let ctx = TestHarness::with_llm(MockLlm::failing()).await.unwrap();
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "mutation($bu: String!) { assignBoosterConcerns(businessUnitId: $bu) { boosters links written } }",
            vars!("bu" => catalog.slug.clone()),
            Some(&token),
        )
        .await;

    assert_eq!(
        res.body["data"]["assignBoosterConcerns"],
        json!({ "boosters": 2, "links": 0, "written": false })
    );
    assert_eq!(ctx.llm.call_count(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn repeated_addons_are_stored_once_with_dense_order(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let token = ctx.admin_token();

    let res = ctx
        .graphql(
            "mutation($id: String!, $addons: [String!]!) { setAddonMatches(productId: $id, addonIds: $addons) { addonIds } }",
            vars!(
                "id" => catalog.eye_cream.to_string(),
                "addons" => vec![
                    catalog.caffeine.to_string(),
                    catalog.niacinamide.to_string(),
                    catalog.caffeine.to_string(),
                ],
            ),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(
        res.body["data"]["setAddonMatches"]["addonIds"],
        json!([catalog.caffeine.to_string(), catalog.niacinamide.to_string()])
    );

    let orders: Vec<i32> = sqlx::query_scalar(
        "SELECT display_order FROM product_addon_matches WHERE product_id = $1 ORDER BY display_order",
    )
    .bind(catalog.eye_cream)
    .fetch_all(&ctx.db_pool)
    .await
    .unwrap();
    assert_eq!(orders, vec![0, 1]);
}
