use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::question::{FieldType, Question, QuestionType};
use super::quiz::Quiz;
use crate::error::{Error, Result};

/// Answer slot, tagged by the kind of question that declared it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    Text(String),
    LongText(String),
    Choice(Option<String>),
    Field { field_type: FieldType, value: String },
}

impl AnswerValue {
    /// Empty slot for `key` of `question`, or `None` if the question does not declare it.
    pub fn empty_for(question: &Question, key: &str) -> Option<Self> {
        match question.question_type {
            QuestionType::Text => question.field.as_deref().filter(|f| *f == key).map(|_| Self::Text(String::new())),
            QuestionType::Textarea => question
                .field
                .as_deref()
                .filter(|f| *f == key)
                .map(|_| Self::LongText(String::new())),
            QuestionType::Radio => question.field.as_deref().filter(|f| *f == key).map(|_| Self::Choice(None)),
            QuestionType::Fields => question.field_spec(key).map(|spec| Self::Field {
                field_type: spec.field_type,
                value: String::new(),
            }),
        }
    }

    /// Checks `raw` against what `question` declares for `key`.
    pub fn parse(question: &Question, key: &str, raw: String) -> Result<Self> {
        let empty = Self::empty_for(question, key).ok_or_else(|| {
            Error::InvalidAnswer(format!("question '{}' has no answer field '{}'", question.id, key))
        })?;

        match empty {
            Self::Text(_) => Ok(Self::Text(raw)),
            Self::LongText(_) => Ok(Self::LongText(raw)),
            Self::Choice(_) => {
                if raw.is_empty() {
                    Ok(Self::Choice(None))
                } else if question.options().iter().any(|o| *o == raw) {
                    Ok(Self::Choice(Some(raw)))
                } else {
                    Err(Error::InvalidAnswer(format!("'{}' is not an option of '{}'", raw, key)))
                }
            }
            Self::Field { field_type, .. } => {
                if field_type == FieldType::Number && !raw.trim().is_empty() {
                    let parsed = raw.trim().parse::<f64>().ok().filter(|n| n.is_finite());
                    if parsed.is_none() {
                        return Err(Error::InvalidAnswer(format!("'{}' expects a number", key)));
                    }
                }
                Ok(Self::Field { field_type, value: raw })
            }
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(v) | Self::LongText(v) => v,
            Self::Choice(v) => v.as_deref().unwrap_or(""),
            Self::Field { value, .. } => value,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().trim().is_empty()
    }
}

/// Answers collected by the runner, one slot per key the quiz declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: BTreeMap<String, AnswerValue>,
}

impl Answers {
    pub fn for_quiz(quiz: &Quiz) -> Self {
        let mut values = BTreeMap::new();
        for question in &quiz.questions {
            for key in question.answer_keys() {
                if values.contains_key(key) {
                    continue;
                }
                if let Some(empty) = AnswerValue::empty_for(question, key) {
                    values.insert(key.to_string(), empty);
                }
            }
        }
        Self { values }
    }

    /// Rebuilds the slots for `quiz` and re-applies whatever part of `flat` is still valid.
    pub fn restore(quiz: &Quiz, flat: &BTreeMap<String, String>) -> Self {
        let mut answers = Self::for_quiz(quiz);
        for (key, value) in flat {
            if !answers.values.contains_key(key) {
                continue;
            }
            if let Err(e) = answers.set(quiz, key, value.clone()) {
                tracing::warn!(key = %key, error = %e, "Dropping persisted answer");
            }
        }
        answers
    }

    pub fn set(&mut self, quiz: &Quiz, key: &str, value: impl Into<String>) -> Result<()> {
        if !self.values.contains_key(key) {
            return Err(Error::InvalidAnswer(format!("unknown answer field '{}'", key)));
        }
        let question = quiz
            .question_for_key(key)
            .ok_or_else(|| Error::InvalidAnswer(format!("unknown answer field '{}'", key)))?;
        let parsed = AnswerValue::parse(question, key, value.into())?;
        self.values.insert(key.to_string(), parsed);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(AnswerValue::as_str)
    }

    pub fn is_filled(&self, key: &str) -> bool {
        self.values.get(key).map(|v| !v.is_blank()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_flat(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), v.as_str().to_string()))
            .collect()
    }

    pub fn to_json_map(&self) -> Map<String, JsonValue> {
        self.values
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.as_str().to_string())))
            .collect()
    }
}
