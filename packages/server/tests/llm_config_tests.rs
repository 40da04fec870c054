//! Runtime LLM provider switch and the health endpoint.

mod common;

use crate::common::TestHarness;
use axum::http::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn config_is_admin_only(ctx: &mut TestHarness) {
    let res = ctx.get("/api/llm-config", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let staff = ctx.staff_token();
    let res = ctx.get("/api/llm-config", Some(&staff)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "Admin access required");

    let res = ctx
        .post(
            "/api/llm-config",
            json!({ "provider": "ollama", "model": "llama3.1" }),
            Some(&staff),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_reads_config_without_the_key(ctx: &mut TestHarness) {
    let admin = ctx.admin_token();
    let res = ctx.get("/api/llm-config", Some(&admin)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["config"]["provider"], "ollama");
    assert!(res.body["config"].get("api_key").is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn admin_switches_to_a_local_model(ctx: &mut TestHarness) {
    let admin = ctx.admin_token();

    let res = ctx
        .post(
            "/api/llm-config",
            json!({
                "provider": "ollama",
                "model": "qwen2.5:7b",
                "ollamaUrl": "http://gpu-box:11434",
                "temperature": 0.2,
            }),
            Some(&admin),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["message"], "LLM configuration updated successfully");
    assert_eq!(res.body["config"]["model"], "qwen2.5:7b");

    let current = ctx.get("/api/llm-config", Some(&admin)).await;
    assert_eq!(current.body["config"]["model"], "qwen2.5:7b");
    assert_eq!(current.body["config"]["base_url"], "http://gpu-box:11434");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn provider_and_model_are_required(ctx: &mut TestHarness) {
    let admin = ctx.admin_token();

    let res = ctx
        .post("/api/llm-config", json!({ "provider": "ollama" }), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["error"], "Provider and model are required");

    let res = ctx
        .post(
            "/api/llm-config",
            json!({ "provider": "gemini", "model": "pro" }),
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn health_reports_database_and_provider(ctx: &mut TestHarness) {
    let res = ctx.get("/health", None).await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"]["status"], "ok");
    assert_eq!(res.body["llm_provider"], "ollama");
}
