use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use super::models::{Guideline, KnowledgeEntry, TrainingMemory};

#[derive(Debug, Clone, GraphQLObject)]
pub struct KnowledgeEntryData {
    pub id: String,
    pub business_unit_id: String,
    pub category: String,
    pub topic: Option<String>,
    pub content: String,
    pub keywords: Vec<String>,
    pub confidence: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl From<KnowledgeEntry> for KnowledgeEntryData {
    fn from(e: KnowledgeEntry) -> Self {
        Self {
            id: e.id.to_string(),
            business_unit_id: e.business_unit_id.to_string(),
            category: e.category,
            topic: e.topic,
            content: e.content,
            keywords: e.keywords,
            confidence: e.confidence,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct GuidelineData {
    pub id: String,
    pub category: String,
    pub title: String,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl From<Guideline> for GuidelineData {
    fn from(g: Guideline) -> Self {
        Self {
            id: g.id.to_string(),
            category: g.category,
            title: g.title,
            content: g.content,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
pub struct TrainingLessonData {
    pub id: String,
    pub scenario: String,
    pub lesson: String,
    pub created_at: DateTime<Utc>,
}

impl From<TrainingMemory> for TrainingLessonData {
    fn from(t: TrainingMemory) -> Self {
        Self {
            id: t.id.to_string(),
            scenario: t.scenario,
            lesson: t.lesson,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct KnowledgeEntryInput {
    pub category: Option<String>,
    pub topic: Option<String>,
    pub content: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct GuidelineInput {
    pub category: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
}
