use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::Question;
use crate::models::quiz::{Quiz, DEFAULT_QUIZ_NAME};
use crate::models::template::PublishedTemplate;

pub const DEFAULT_WELCOME_TITLE: &str = "Welcome";
pub const DEFAULT_WELCOME_SUBTITLE: &str = "Take a short quiz";

/// Body of `POST /template` and `PUT /template`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePayload {
    /// Remote id to update. `PUT` without it targets the latest template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub welcome_title: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub welcome_subtitle: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TemplatePayload {
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: None,
            title: non_blank_or(&quiz.name, DEFAULT_QUIZ_NAME),
            description: quiz.description.clone(),
            welcome_title: non_blank_or(quiz.welcome_title.as_deref().unwrap_or(""), DEFAULT_WELCOME_TITLE),
            welcome_subtitle: non_blank_or(
                quiz.welcome_subtitle.as_deref().unwrap_or(""),
                DEFAULT_WELCOME_SUBTITLE,
            ),
            questions: quiz.questions.clone(),
        }
    }

    pub fn with_id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }

    /// The copy kept locally when the remote side has not (yet) answered.
    pub fn to_local(&self) -> PublishedTemplate {
        PublishedTemplate {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            welcome_title: self.welcome_title.clone(),
            welcome_subtitle: self.welcome_subtitle.clone(),
            questions: self.questions.clone(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTemplateResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
