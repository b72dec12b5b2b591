use serde::{Deserialize, Serialize};

use crate::models::question::{FieldSpec, Question, QuestionType};

/// Editable form behind the question dialog.
///
/// `options` holds one radio option per line; `fields` holds the rows of a
/// `fields` question, including half-filled ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionForm {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub field: String,
    pub options: String,
    pub placeholder: String,
    pub fields: Vec<FieldSpec>,
}

impl QuestionForm {
    pub fn new(question_type: QuestionType, title: impl Into<String>) -> Self {
        Self {
            question_type,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Pre-fills the form for editing `question`.
    pub fn from_question(question: &Question) -> Self {
        Self {
            title: question.title.clone(),
            description: question.description.clone(),
            question_type: question.question_type,
            field: question.field.clone().unwrap_or_default(),
            options: question.options().join("\n"),
            placeholder: question.placeholder.clone().unwrap_or_default(),
            fields: question.field_specs().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizField {
    Name,
    Description,
    WelcomeTitle,
    WelcomeSubtitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}
