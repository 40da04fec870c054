//! Quiz flow over HTTP: config, start, save progress, replace concerns.

mod common;

use crate::common::{seed_catalog, TestHarness};
use axum::http::StatusCode;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestHarness)]
#[tokio::test]
async fn config_groups_concerns_by_category(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let res = ctx
        .get(&format!("/api/quiz?businessUnitId={}", catalog.slug), None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    let config = &res.body["config"];
    assert_eq!(config["steps"].as_array().unwrap().len(), 4);

    let face: Vec<&str> = config["concerns"]["face"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(face, vec!["Acne", "Dark Spots"]);
    assert_eq!(
        config["concerns"]["eye"][0]["value"],
        json!(catalog.dark_circles.to_string())
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn config_for_unknown_business_unit_has_no_concerns(ctx: &mut TestHarness) {
    let res = ctx.get("/api/quiz?businessUnitId=no-such-brand", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["config"]["concerns"], json!({}));
    assert_eq!(res.body["config"]["steps"].as_array().unwrap().len(), 4);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn starting_a_quiz_creates_a_profile(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let res = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.business_unit_id.to_string(),
                "answers": { "gender": "female", "age_group": "26-35", "climate": "  " },
                "email": "jo@example.com",
            }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    let profile = &res.body["profile"];
    assert_eq!(res.body["profileId"], profile["id"]);
    assert_eq!(profile["gender"], "female");
    assert_eq!(profile["age_group"], "26-35");
    assert_eq!(profile["climate"], json!(null));
    assert_eq!(profile["source"], "website");
    assert_eq!(profile["quiz_step"], 1);
    assert_eq!(profile["quiz_completed"], false);
    assert_eq!(
        profile["business_unit_id"],
        json!(catalog.business_unit_id.to_string())
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn saving_the_final_step_completes_the_quiz(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let created = ctx
        .post("/api/quiz", json!({ "businessUnitId": catalog.slug }), None)
        .await;
    let profile_id = created.body["profileId"].as_str().unwrap().to_string();

    let step2 = ctx
        .post(
            "/api/quiz",
            json!({
                "profileId": profile_id,
                "step": 2,
                "answers": { "skin_type": "oily" },
            }),
            None,
        )
        .await;
    assert_eq!(step2.status, StatusCode::OK);
    assert_eq!(step2.body["profile"]["skin_type"], "oily");
    assert_eq!(step2.body["profile"]["quiz_completed"], false);

    let step4 = ctx
        .post(
            "/api/quiz",
            json!({
                "profileId": profile_id,
                "step": 4,
                "answers": {
                    "monthly_budget": "50-100",
                    "concerns": [
                        { "concern_id": catalog.acne.to_string(), "severity": 5, "is_priority": true },
                        catalog.dark_circles.to_string(),
                    ],
                },
            }),
            None,
        )
        .await;
    assert_eq!(step4.status, StatusCode::OK);
    assert_eq!(step4.body["profile"]["quiz_completed"], true);
    assert_eq!(step4.body["profile"]["quiz_step"], 4);
    // Earlier answers survive later steps
    assert_eq!(step4.body["profile"]["skin_type"], "oily");

    let fetched = ctx
        .get(&format!("/api/quiz?profileId={}", profile_id), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    let concerns = fetched.body["profile"]["concerns"].as_array().unwrap();
    assert_eq!(concerns.len(), 2);

    let acne = concerns
        .iter()
        .find(|c| c["concern_id"] == json!(catalog.acne.to_string()))
        .unwrap();
    assert_eq!(acne["severity"], 5);
    assert_eq!(acne["is_priority"], true);
    assert_eq!(acne["concern_name"], "Acne");

    let circles = concerns
        .iter()
        .find(|c| c["concern_id"] == json!(catalog.dark_circles.to_string()))
        .unwrap();
    assert_eq!(circles["severity"], 3);
    assert_eq!(circles["option_category"], "eye");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn put_replaces_all_concerns(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let created = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.slug,
                "answers": { "concerns": [catalog.acne.to_string(), catalog.dark_spots.to_string()] },
            }),
            None,
        )
        .await;
    let profile_id = created.body["profileId"].as_str().unwrap().to_string();

    let res = ctx
        .put(
            "/api/quiz",
            json!({
                "profileId": profile_id,
                "concerns": [{ "id": catalog.dark_circles.to_string(), "severity": 2 }],
            }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "success": true }));

    let fetched = ctx
        .get(&format!("/api/quiz?profileId={}", profile_id), None)
        .await;
    let concerns = fetched.body["profile"]["concerns"].as_array().unwrap();
    assert_eq!(concerns.len(), 1);
    assert_eq!(concerns[0]["concern_id"], json!(catalog.dark_circles.to_string()));
    assert_eq!(concerns[0]["severity"], 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn put_without_profile_id_is_rejected(ctx: &mut TestHarness) {
    let res = ctx.put("/api/quiz", json!({ "concerns": [] }), None).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "profileId is required");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn out_of_range_severity_is_rejected(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let res = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.slug,
                "answers": { "concerns": [{ "concern_id": catalog.acne.to_string(), "severity": 7 }] },
            }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_concern_is_rejected(ctx: &mut TestHarness) {
    let created = ctx.post("/api/quiz", json!({}), None).await;
    assert_eq!(created.status, StatusCode::CREATED);
    let profile_id = created.body["profileId"].as_str().unwrap().to_string();

    let res = ctx
        .put(
            "/api/quiz",
            json!({ "profileId": profile_id, "concerns": [Uuid::new_v4().to_string()] }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_profile_is_not_found(ctx: &mut TestHarness) {
    let res = ctx
        .get(&format!("/api/quiz?profileId={}", Uuid::new_v4()), None)
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_start_leaves_no_profile_behind(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let res = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.slug,
                "answers": { "concerns": [catalog.acne.to_string(), Uuid::new_v4().to_string()] },
            }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let (profiles,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM customer_profiles WHERE business_unit_id = $1")
            .bind(catalog.business_unit_id)
            .fetch_one(&ctx.db_pool)
            .await
            .unwrap();
    assert_eq!(profiles, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejected_final_step_keeps_the_quiz_open(ctx: &mut TestHarness) {
    let catalog = seed_catalog(&ctx.db_pool).await.unwrap();

    let created = ctx
        .post(
            "/api/quiz",
            json!({
                "businessUnitId": catalog.slug,
                "answers": { "concerns": [catalog.acne.to_string()] },
            }),
            None,
        )
        .await;
    let profile_id = created.body["profileId"].as_str().unwrap().to_string();

    let res = ctx
        .post(
            "/api/quiz",
            json!({
                "profileId": profile_id,
                "step": 4,
                "answers": {
                    "monthly_budget": "200+",
                    "concerns": [Uuid::new_v4().to_string()],
                },
            }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let fetched = ctx
        .get(&format!("/api/quiz?profileId={}", profile_id), None)
        .await;
    let profile = &fetched.body["profile"];
    assert_eq!(profile["quiz_completed"], false);
    assert_eq!(profile["quiz_step"], 1);
    assert_eq!(profile["monthly_budget"], json!(null));
    assert_eq!(profile["concerns"].as_array().unwrap().len(), 1);
}
