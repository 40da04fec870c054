//! Recommendation generation against a seeded catalog.
//!
//! Weighting used below (3 × severity × priority multiplier):
//! Acne 5/priority = 30, Dark Spots default = 9, Dark Circles 1 = 3.
//! Niacinamide (Acne + Dark Spots) = 39, Caffeine (Dark Circles) = 3.

mod common;

use crate::common::{seed_catalog, CatalogFixture, TestHarness};
use axum::http::StatusCode;
use serde_json::{json, Value};
use test_context::test_context;
use uuid::Uuid;

async fn profile_with_concerns(ctx: &TestHarness, catalog: &CatalogFixture, budget: &str) -> String {
    let res = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.slug,
                "answers": {
                    "skin_type": "combination",
                    "monthly_budget": budget,
                    "concerns": [
                        { "concern_id": catalog.acne.to_string(), "severity": 5, "is_priority": true },
                        catalog.dark_spots.to_string(),
                        { "concern_id": catalog.dark_circles.to_string(), "severity": 1 },
                    ],
                },
            }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    res.body["profileId"].as_str().unwrap().to_string()
}

fn price(value: &Value) -> f64 {
    value.as_f64().expect("price is a number")
}

#[test_context(TestHarness)]
#[tokio::test]
async fn boosters_are_scored_by_weighted_concerns(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let profile_id = profile_with_concerns(ctx, &catalog, "50-100").await;

    let res = ctx
        .post("/api/recommendations", json!({ "profileId": profile_id }), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let recs = &res.body["recommendations"];
    let top = recs["topBoosters"].as_array().unwrap();

    assert_eq!(top[0]["id"], json!(catalog.niacinamide.to_string()));
    assert_eq!(top[0]["totalScore"], 39);
    assert_eq!(top[0]["isPrimary"], false);
    let mut names: Vec<&str> = top[0]["concerns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Acne", "Dark Spots"]);

    // The serum carries the Acne tag itself
    assert_eq!(top[1]["id"], json!(catalog.serum.to_string()));
    assert_eq!(top[1]["totalScore"], 30);

    // The draft product is never scored
    assert!(top
        .iter()
        .all(|b| b["id"] != json!(catalog.draft_cream.to_string())));
    assert_eq!(top.len(), 4);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn full_routine_groups_boosters_under_matched_bases(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let profile_id = profile_with_concerns(ctx, &catalog, "50-100").await;

    let res = ctx
        .post("/api/recommendations", json!({ "profileId": profile_id }), None)
        .await;
    let recs = &res.body["recommendations"];
    let routine = &recs["fullRoutine"];

    assert_eq!(routine["type"], "6_month");
    assert_eq!(routine["discount"], 40);
    assert_eq!(routine["durationMonths"], 6);

    let products = routine["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["id"], json!(catalog.serum.to_string()));
    assert_eq!(products[0]["category"], "face");
    assert_eq!(
        products[0]["boosters"][0]["id"],
        json!(catalog.niacinamide.to_string())
    );
    assert_eq!(products[1]["id"], json!(catalog.eye_cream.to_string()));
    assert_eq!(products[1]["category"], "eye");
    assert_eq!(
        products[1]["boosters"][0]["id"],
        json!(catalog.caffeine.to_string())
    );

    // (40 + 10) + (30 + 8) = 88 per month
    assert_eq!(price(&routine["originalPrice"]), 528.0);
    assert_eq!(price(&routine["finalPrice"]), 316.8);

    let starter = &recs["starterBundle"];
    assert_eq!(starter["type"], "3_month");
    assert_eq!(price(&starter["originalPrice"]), 264.0);
    assert_eq!(price(&starter["finalPrice"]), 184.8);

    let trial = &recs["trialBundle"];
    assert_eq!(price(&trial["originalPrice"]), 88.0);
    assert_eq!(price(&trial["finalPrice"]), 70.4);

    let single = &recs["singleProduct"];
    assert_eq!(single["products"].as_array().unwrap().len(), 1);
    assert_eq!(price(&single["originalPrice"]), 50.0);
    assert_eq!(price(&single["finalPrice"]), 50.0);

    assert_eq!(recs["incentives"]["moneyBackGuarantee"], 90);
    assert_eq!(recs["profile"]["skinType"], "combination");
    assert_eq!(recs["profile"]["concerns"].as_array().unwrap().len(), 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn budget_bracket_flags_bundles_over_the_monthly_limit(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let profile_id = profile_with_concerns(ctx, &catalog, "0-50").await;

    let res = ctx
        .post("/api/recommendations", json!({ "profileId": profile_id }), None)
        .await;
    let recs = &res.body["recommendations"];

    assert_eq!(recs["budget"]["key"], "0-50");
    // 52.80 a month
    assert_eq!(recs["fullRoutine"]["fitsBudget"], false);
    // 50.00 for the single product
    assert_eq!(recs["singleProduct"]["fitsBudget"], true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn generated_routine_is_stored_and_listed(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();
    let profile_id = profile_with_concerns(ctx, &catalog, "100-200").await;

    let generated = ctx
        .post("/api/recommendations", json!({ "profileId": profile_id }), None)
        .await;
    let recommendation_id = generated.body["recommendationId"].clone();
    assert!(recommendation_id.is_string());

    let listed = ctx
        .get(&format!("/api/recommendations?profileId={}", profile_id), None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);

    let stored = listed.body["recommendations"].as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"], recommendation_id);
    assert_eq!(stored[0]["recommendation_type"], "full_routine");
    assert_eq!(stored[0]["discount_percent"], 40);
    assert_eq!(stored[0]["duration_months"], 6);
    assert_eq!(stored[0]["status"], "pending");
    assert_eq!(stored[0]["products"].as_array().unwrap().len(), 2);

    let profile = ctx
        .get(&format!("/api/quiz?profileId={}", profile_id), None)
        .await;
    assert_eq!(profile.body["profile"]["recommendation_generated"], true);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn profile_without_concerns_gets_an_empty_answer(ctx: &mut TestHarness) {
    let created = ctx.post("/api/quiz", json!({}), None).await;
    let profile_id = created.body["profileId"].as_str().unwrap().to_string();

    let res = ctx
        .post("/api/recommendations", json!({ "profileId": profile_id }), None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({ "error": "No concerns selected", "recommendations": [] })
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn profile_id_is_required(ctx: &mut TestHarness) {
    let res = ctx.post("/api/recommendations", json!({}), None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = ctx.get("/api/recommendations", None).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_profile_is_not_found(ctx: &mut TestHarness) {
    let res = ctx
        .post(
            "/api/recommendations",
            json!({ "profileId": Uuid::new_v4().to_string() }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
