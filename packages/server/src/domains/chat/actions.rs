//! Chat actions - livechat replies, roleplay training and revisions

use anyhow::Result;
use llm_client::{Message, Role};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info, warn};

use super::error::ChatError;
use super::models::{ChatMessage, ChatMode, ChatSession, CreateChatSession};
use crate::common::{BusinessUnitId, BusinessUnitRef, ChatSessionId};
use crate::domains::business_units::BusinessUnit;
use crate::domains::knowledge::prompt::{
    build_prompt, build_user_reminder, PromptOptions, Revision, Scenario,
};
use crate::domains::knowledge::{relevant_entries, Guideline, KnowledgeEntry, TrainingMemory};
use crate::kernel::ServerDeps;

/// Sent to the customer when the provider cannot answer.
pub const FALLBACK_REPLY: &str = "I'm here to help! Could you please provide more details about your question? I'll do my best to assist you based on the information available.";

pub const DEFAULT_STAFF_NAME: &str = "AI Coach";
pub const DEFAULT_STAFF_ROLE: &str = "coach";

#[derive(Debug, Clone, Default)]
pub struct StartSession {
    pub business_unit: Option<BusinessUnitRef>,
    pub mode: ChatMode,
    pub staff_name: Option<String>,
    pub staff_role: Option<String>,
    pub language: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub response: String,
    /// False when the fallback text was used
    pub generated: bool,
}

/// A stateless roleplay turn; the trainer UI keeps the transcript.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleplayTurn {
    pub message: String,
    #[serde(default)]
    pub conversation: Vec<Message>,
    pub scenario_name: String,
    #[serde(default)]
    pub scenario_description: String,
    #[serde(default)]
    pub customer_type: String,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub feedback_memory: Vec<String>,
    pub staff_name: Option<String>,
    pub staff_role: Option<String>,
    pub language: Option<String>,
}

impl RoleplayTurn {
    fn scenario(&self) -> Scenario {
        Scenario {
            name: self.scenario_name.clone(),
            description: self.scenario_description.clone(),
            customer_type: self.customer_type.clone(),
            success_criteria: self.success_criteria.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRequest {
    pub previous_response: String,
    pub feedback: String,
    pub customer_question: String,
    pub scenario_name: Option<String>,
    pub staff_name: Option<String>,
    pub staff_role: Option<String>,
}

/// Everything the prompt needs from the business unit's knowledge base.
struct KnowledgeContext {
    entries: Vec<KnowledgeEntry>,
    guidelines: Vec<Guideline>,
    lessons: Vec<(String, Vec<String>)>,
}

impl KnowledgeContext {
    async fn load(business_unit_id: BusinessUnitId, pool: &PgPool) -> Result<Self> {
        let entries = KnowledgeEntry::find_by_business_unit(business_unit_id, pool).await?;
        let guidelines = Guideline::find_by_business_unit(business_unit_id, pool).await?;
        let lessons = TrainingMemory::group_by_scenario(
            TrainingMemory::find_by_business_unit(business_unit_id, pool).await?,
        );

        Ok(Self {
            entries,
            guidelines,
            lessons,
        })
    }
}

/// Render stored turns as the `Customer:` / `AI:` transcript used in prompts.
pub fn format_transcript<'a>(turns: impl IntoIterator<Item = (&'a Role, &'a str)>) -> String {
    turns
        .into_iter()
        .filter(|(role, _)| **role != Role::System)
        .map(|(role, content)| {
            let speaker = if *role == Role::User { "Customer" } else { "AI" };
            format!("{}: {}", speaker, content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn transcript_of(history: &[Message]) -> String {
    format_transcript(history.iter().map(|m| (&m.role, m.content.as_str())))
}

/// Earlier turns as alternating messages, then the current customer turn.
fn with_customer_turn(mut history: Vec<Message>, content: String) -> Vec<Message> {
    history.push(Message::user(content));
    history
}

/// Customer text as sent to the model: image note, then the reminder.
fn customer_message(message: &str, image_url: Option<&str>, has_knowledge: bool) -> String {
    let mut content = message.to_string();
    if let Some(url) = image_url {
        content.push_str(&format!("\n\n[Customer attached an image: {}]", url));
    }
    content.push_str(build_user_reminder(has_knowledge));
    content
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

async fn generate_or_fallback(
    deps: &ServerDeps,
    messages: &[Message],
    system_prompt: &str,
) -> ChatReply {
    match deps.llm.generate(messages, Some(system_prompt)).await {
        Ok(response) if !response.text.trim().is_empty() => ChatReply {
            response: response.text,
            generated: true,
        },
        Ok(_) => {
            warn!("LLM returned an empty reply, using fallback");
            ChatReply {
                response: FALLBACK_REPLY.to_string(),
                generated: false,
            }
        }
        Err(e) => {
            warn!(error = %e, "LLM generation failed, using fallback");
            ChatReply {
                response: FALLBACK_REPLY.to_string(),
                generated: false,
            }
        }
    }
}

pub async fn start_session(input: StartSession, pool: &PgPool) -> Result<ChatSession, ChatError> {
    let business_unit_id = match input.business_unit.as_ref() {
        Some(reference) => BusinessUnit::resolve(reference, pool)
            .await?
            .ok_or(ChatError::BusinessUnitNotFound)?,
        None => return Err(ChatError::BusinessUnitNotFound),
    };

    let session = ChatSession::create(
        CreateChatSession {
            business_unit_id,
            mode: input.mode,
            staff_name: input
                .staff_name
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STAFF_NAME.to_string()),
            staff_role: input
                .staff_role
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STAFF_ROLE.to_string()),
            language: input.language,
            user_name: input.user_name,
        },
        pool,
    )
    .await?;

    info!(session_id = %session.id, business_unit_id = %business_unit_id, mode = %session.mode, "Chat session started");
    Ok(session)
}

/// Answer a customer message within a stored session.
pub async fn reply(
    session_id: ChatSessionId,
    message: &str,
    image_url: Option<&str>,
    deps: &ServerDeps,
) -> Result<ChatReply, ChatError> {
    let message = non_blank(message).ok_or(ChatError::EmptyMessage)?;
    let pool = &deps.db_pool;

    let session = ChatSession::find_by_id(session_id, pool)
        .await?
        .ok_or(ChatError::SessionNotFound)?;

    let context = KnowledgeContext::load(session.business_unit_id, pool).await?;
    let knowledge = relevant_entries(message, &context.entries);

    let history: Vec<Message> = ChatMessage::history(session_id, pool)
        .await?
        .iter()
        .map(ChatMessage::to_message)
        .collect();
    let transcript = transcript_of(&history);

    debug!(
        session_id = %session_id,
        knowledge = knowledge.len(),
        guidelines = context.guidelines.len(),
        history = history.len(),
        "Building chat prompt"
    );

    let has_knowledge = !knowledge.is_empty();
    let options = PromptOptions::builder()
        .staff_name(session.staff_name.as_str())
        .staff_role(session.staff_role.as_str())
        .knowledge(knowledge)
        .guidelines(&context.guidelines)
        .training_memory(&context.lessons)
        .conversation_history(&transcript)
        .has_image(image_url.is_some())
        .build();
    let options = PromptOptions {
        language: session.language.as_deref(),
        user_name: session.user_name.as_deref(),
        ..options
    };
    let system_prompt = build_prompt(&options);

    let messages = with_customer_turn(
        history,
        customer_message(message, image_url, has_knowledge),
    );
    let answer = generate_or_fallback(deps, &messages, &system_prompt).await;

    ChatMessage::record_exchange(session_id, message, &answer.response, pool).await?;

    Ok(answer)
}

/// Stored transcript of a session.
pub async fn history(session_id: ChatSessionId, pool: &PgPool) -> Result<Vec<ChatMessage>, ChatError> {
    ChatSession::find_by_id(session_id, pool)
        .await?
        .ok_or(ChatError::SessionNotFound)?;
    Ok(ChatMessage::history(session_id, pool).await?)
}

/// Answer as the trainee would inside a roleplay scenario.
pub async fn roleplay_reply(
    business_unit_id: BusinessUnitId,
    turn: &RoleplayTurn,
    deps: &ServerDeps,
) -> Result<ChatReply, ChatError> {
    let message = non_blank(&turn.message).ok_or(ChatError::EmptyMessage)?;

    let context = KnowledgeContext::load(business_unit_id, &deps.db_pool).await?;
    let knowledge = relevant_entries(message, &context.entries);
    let has_knowledge = !knowledge.is_empty();

    let history: Vec<Message> = turn
        .conversation
        .iter()
        .filter(|m| m.role != Role::System)
        .cloned()
        .collect();
    let transcript = transcript_of(&history);

    let scenario = turn.scenario();
    let staff_name = turn.staff_name.as_deref().unwrap_or(DEFAULT_STAFF_NAME);
    let staff_role = turn.staff_role.as_deref().unwrap_or(DEFAULT_STAFF_ROLE);

    let options = PromptOptions::builder()
        .staff_name(staff_name)
        .staff_role(staff_role)
        .knowledge(knowledge)
        .guidelines(&context.guidelines)
        .training_memory(&context.lessons)
        .conversation_history(&transcript)
        .scenario(&scenario)
        .feedback_memory(&turn.feedback_memory)
        .build();
    let options = PromptOptions {
        language: turn.language.as_deref(),
        ..options
    };
    let system_prompt = build_prompt(&options);

    let messages = with_customer_turn(history, customer_message(message, None, has_knowledge));
    let answer = generate_or_fallback(deps, &messages, &system_prompt).await;

    info!(scenario = %scenario.name, generated = answer.generated, "Roleplay reply");
    Ok(answer)
}

/// Rewrite a previous answer following trainer feedback.
pub async fn revise(
    business_unit_id: BusinessUnitId,
    request: &RevisionRequest,
    deps: &ServerDeps,
) -> Result<ChatReply, ChatError> {
    non_blank(&request.feedback).ok_or(ChatError::EmptyMessage)?;

    let revision = Revision::from_feedback(
        request.previous_response.as_str(),
        request.feedback.as_str(),
        request.customer_question.as_str(),
    );

    let context = KnowledgeContext::load(business_unit_id, &deps.db_pool).await?;
    let knowledge = relevant_entries(&request.customer_question, &context.entries);

    let scenario = request.scenario_name.as_ref().map(|name| Scenario {
        name: name.clone(),
        ..Default::default()
    });

    let options = PromptOptions::builder()
        .staff_name(request.staff_name.as_deref().unwrap_or(DEFAULT_STAFF_NAME))
        .staff_role(request.staff_role.as_deref().unwrap_or(DEFAULT_STAFF_ROLE))
        .knowledge(knowledge)
        .guidelines(&context.guidelines)
        .training_memory(&context.lessons)
        .revision(&revision)
        .build();
    let options = PromptOptions {
        scenario: scenario.as_ref(),
        ..options
    };
    let system_prompt = build_prompt(&options);

    let messages = vec![Message::user(request.customer_question.clone())];
    let answer = generate_or_fallback(deps, &messages, &system_prompt).await;

    info!(
        shorter = revision.needs_shorter,
        longer = revision.needs_longer,
        generated = answer.generated,
        "Revised reply"
    );
    Ok(answer)
}

/// Keep a trainer lesson for future prompts.
pub async fn record_lesson(
    business_unit_id: BusinessUnitId,
    scenario: &str,
    lesson: &str,
    pool: &PgPool,
) -> Result<TrainingMemory, ChatError> {
    let lesson = non_blank(lesson).ok_or(ChatError::EmptyMessage)?;
    let scenario = non_blank(scenario).unwrap_or("general");

    let saved = TrainingMemory::record(business_unit_id, scenario, lesson, pool).await?;
    info!(business_unit_id = %business_unit_id, scenario = %scenario, "Training lesson recorded");
    Ok(saved)
}
