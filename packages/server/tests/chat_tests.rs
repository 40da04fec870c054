//! Sales assistant chat: livechat sessions, roleplay training, revisions
//! and training lessons.

mod common;

use crate::common::{create_business_unit, seed_knowledge, TestHarness};
use axum::http::StatusCode;
use commerce_core::domains::chat::actions::FALLBACK_REPLY;
use commerce_core::kernel::MockLlm;
use llm_client::Role;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

async fn start_session(ctx: &TestHarness, business_unit: &str) -> String {
    let res = ctx
        .post(
            "/api/chat/sessions",
            json!({
                "businessUnitId": business_unit,
                "staffName": "Mia",
                "staffRole": "skin coach",
                "userName": "Jo",
            }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    res.body["session"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn reply_uses_knowledge_and_stores_both_turns() {
    let ctx = TestHarness::with_llm(MockLlm::new().with_response("Yes! Twice daily is fine."))
        .await
        .unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    seed_knowledge(unit.id, &ctx.db_pool).await.unwrap();
    let session_id = start_session(&ctx, &unit.slug).await;

    let res = ctx
        .post(
            &format!("/api/chat/sessions/{}/messages", session_id),
            json!({ "message": "Can I use the niacinamide booster every day?" }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["response"], "Yes! Twice daily is fine.");
    assert_eq!(res.body["generated"], true);
    assert!(res.body["timestamp"].is_string());

    let call = ctx.llm.last_call().unwrap();
    let system = call.system_prompt.unwrap();
    assert!(system.contains("Mia"));
    assert!(system.contains("KNOWLEDGE BASE"));
    assert!(system.contains("twice daily"));
    assert!(system.contains("Be warm"));
    assert!(system.contains("Jo"));

    assert_eq!(call.messages.len(), 1);
    let sent = &call.messages[0].content;
    assert!(sent.starts_with("Can I use the niacinamide booster every day?"));
    assert!(sent.contains("REMINDER"));

    let history = ctx
        .get(&format!("/api/chat/sessions/{}/messages", session_id), None)
        .await;
    let messages = history.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(
        messages[0]["content"],
        "Can I use the niacinamide booster every day?"
    );
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "Yes! Twice daily is fine.");
}

#[tokio::test]
async fn earlier_turns_reach_the_prompt_as_a_transcript() {
    let ctx = TestHarness::with_llm(
        MockLlm::new()
            .with_response("Hello Jo!")
            .with_response("Our Caffeine Booster."),
    )
    .await
    .unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let session_id = start_session(&ctx, &unit.id.to_string()).await;
    let uri = format!("/api/chat/sessions/{}/messages", session_id);

    ctx.post(&uri, json!({ "message": "Hi there" }), None).await;
    ctx.post(&uri, json!({ "message": "Anything for puffy eyes?" }), None)
        .await;

    let call = ctx.llm.last_call().unwrap();
    let system = call.system_prompt.unwrap();
    assert!(system.contains("Customer: Hi there"));
    assert!(system.contains("AI: Hello Jo!"));
    assert!(!system.contains("Customer: Anything for puffy eyes?"));

    // Earlier turns are also sent as alternating messages
    let sent: Vec<(Role, &str)> = call
        .messages
        .iter()
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0], (Role::User, "Hi there"));
    assert_eq!(sent[1], (Role::Assistant, "Hello Jo!"));
    assert_eq!(sent[2].0, Role::User);
    assert!(sent[2].1.starts_with("Anything for puffy eyes?"));
}

#[tokio::test]
async fn long_sessions_keep_every_turn() {
    let mut llm = MockLlm::new();
    for i in 0..7 {
        llm = llm.with_response(format!("Answer {}", i));
    }
    let ctx = TestHarness::with_llm(llm).await.unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let session_id = start_session(&ctx, &unit.slug).await;
    let uri = format!("/api/chat/sessions/{}/messages", session_id);

    for i in 0..7 {
        ctx.post(&uri, json!({ "message": format!("Question {}", i) }), None)
            .await;
    }

    let call = ctx.llm.last_call().unwrap();
    assert_eq!(call.messages.len(), 13);
    assert_eq!(call.messages[0].content, "Question 0");
    assert!(call.system_prompt.unwrap().contains("Customer: Question 0"));
}

#[tokio::test]
async fn provider_failure_falls_back_to_canned_reply() {
    let ctx = TestHarness::with_llm(MockLlm::failing()).await.unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let session_id = start_session(&ctx, &unit.slug).await;

    let res = ctx
        .post(
            &format!("/api/chat/sessions/{}/messages", session_id),
            json!({ "message": "hello", "imageUrl": "https://cdn.example.com/face.jpg" }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["response"], FALLBACK_REPLY);
    assert_eq!(res.body["generated"], false);

    let call = ctx.llm.last_call().unwrap();
    assert!(call.messages[0]
        .content
        .contains("[Customer attached an image: https://cdn.example.com/face.jpg]"));
    assert!(call.system_prompt.unwrap().contains("IMAGE ANALYSIS"));

    // The fallback reply is stored together with the customer turn
    let history = ctx
        .get(&format!("/api/chat/sessions/{}/messages", session_id), None)
        .await;
    let messages = history.body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["content"], "hello");
    assert_eq!(messages[1]["content"], FALLBACK_REPLY);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_message_is_rejected(ctx: &mut TestHarness) {
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let session_id = start_session(ctx, &unit.slug).await;

    let res = ctx
        .post(
            &format!("/api/chat/sessions/{}/messages", session_id),
            json!({ "message": "   " }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(ctx.llm.call_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_session_and_business_unit_are_not_found(ctx: &mut TestHarness) {
    let res = ctx
        .post(
            &format!("/api/chat/sessions/{}/messages", Uuid::new_v4()),
            json!({ "message": "hello" }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx
        .post(
            "/api/chat/sessions",
            json!({ "businessUnitId": "no-such-brand" }),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn session_defaults_to_livechat_persona(ctx: &mut TestHarness) {
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();

    let res = ctx
        .post("/api/chat/sessions", json!({ "businessUnitId": unit.slug }), None)
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["session"]["mode"], "livechat");
    assert_eq!(res.body["session"]["staff_name"], "AI Coach");
    assert_eq!(res.body["session"]["staff_role"], "coach");
}

// =============================================================================
// Roleplay training (staff only)
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn roleplay_requires_a_staff_token(ctx: &mut TestHarness) {
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();

    let res = ctx
        .post(
            "/api/chat/roleplay",
            json!({ "businessUnitId": unit.slug, "message": "hi", "scenarioName": "Upsell" }),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.llm.call_count(), 0);
}

#[tokio::test]
async fn roleplay_prompt_carries_scenario_and_corrections() {
    let ctx = TestHarness::with_llm(MockLlm::new().with_response("Let me suggest our eye duo."))
        .await
        .unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let token = ctx.staff_token();

    let res = ctx
        .post(
            "/api/chat/roleplay",
            json!({
                "businessUnitId": unit.slug,
                "message": "My eyes look tired",
                "conversation": [
                    { "role": "user", "content": "Hello" },
                    { "role": "assistant", "content": "Welcome in!" },
                ],
                "scenarioName": "Tired eyes upsell",
                "scenarioDescription": "Customer wants a quick fix",
                "customerType": "busy professional",
                "successCriteria": ["Recommend a booster"],
                "feedbackMemory": ["Do not promise overnight results"],
                "staffName": "Mia",
            }),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["response"], "Let me suggest our eye duo.");

    let call = ctx.llm.last_call().unwrap();
    let system = call.system_prompt.unwrap();
    assert!(system.contains("TRAINING SCENARIO: Tired eyes upsell"));
    assert!(system.contains("- Recommend a booster"));
    assert!(system.contains("1. CORRECTION REQUIRED: Do not promise overnight results"));
    assert!(system.contains("Customer: Hello"));
    assert!(system.contains("AI: Welcome in!"));

    assert_eq!(call.messages.len(), 3);
    assert_eq!(call.messages[0].content, "Hello");
    assert_eq!(call.messages[1].role, Role::Assistant);
    assert_eq!(call.messages[2].content, "My eyes look tired");
}

#[tokio::test]
async fn revision_asks_for_a_shorter_answer() {
    let ctx = TestHarness::with_llm(MockLlm::new().with_response("Try our Caffeine Booster."))
        .await
        .unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let token = ctx.staff_token();

    let res = ctx
        .post(
            "/api/chat/revise",
            json!({
                "businessUnitId": unit.id.to_string(),
                "previousResponse": "Well, there are many options to consider for tired eyes, starting with sleep.",
                "feedback": "Make it shorter please",
                "customerQuestion": "What helps puffy eyes?",
            }),
            Some(&token),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK, "{:?}", res.body);
    assert_eq!(res.body["response"], "Try our Caffeine Booster.");

    let call = ctx.llm.last_call().unwrap();
    assert!(call.system_prompt.unwrap().contains("SHORTER"));
    assert_eq!(call.messages[0].content, "What helps puffy eyes?");
}

#[tokio::test]
async fn recorded_lessons_shape_later_prompts() {
    let ctx = TestHarness::with_llm(MockLlm::new()).await.unwrap();
    let unit = create_business_unit(&ctx.db_pool).await.unwrap();
    let token = ctx.staff_token();

    let res = ctx
        .post(
            "/api/chat/lessons",
            json!({
                "businessUnitId": unit.slug,
                "scenario": "",
                "lesson": "Always ask about skin type first",
            }),
            Some(&token),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    assert_eq!(res.body["lesson"]["scenario"], "general");

    let session_id = start_session(&ctx, &unit.slug).await;
    ctx.post(
        &format!("/api/chat/sessions/{}/messages", session_id),
        json!({ "message": "What should I buy?" }),
        None,
    )
    .await;

    let system = ctx.llm.last_call().unwrap().system_prompt.unwrap();
    assert!(system.contains("TRAINING MEMORY"));
    assert!(system.contains("Scenario: general"));
    assert!(system.contains("  • Always ask about skin type first"));
}
