use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::question::Question;

pub const DEFAULT_QUIZ_NAME: &str = "New quiz";
pub const DEFAULT_QUIZ_DESCRIPTION: &str = "Quiz description";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_subtitle: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn empty(id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: DEFAULT_QUIZ_NAME.to_string(),
            description: DEFAULT_QUIZ_DESCRIPTION.to_string(),
            welcome_title: None,
            welcome_subtitle: None,
            questions: Vec::new(),
            created_at,
        }
    }

    /// Every answer key in step order.
    pub fn answer_keys(&self) -> Vec<&str> {
        self.questions.iter().flat_map(|q| q.answer_keys()).collect()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// The question that declares `key`.
    pub fn question_for_key(&self, key: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|q| q.answer_keys().iter().any(|k| *k == key))
    }
}
