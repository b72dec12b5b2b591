use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Text,
    Textarea,
    Radio,
    Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Email,
    Tel,
    Number,
}

/// One input of a `fields` question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType, required: bool) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Question {
    /// Keys this question writes into the answer record.
    pub fn answer_keys(&self) -> Vec<&str> {
        match self.question_type {
            QuestionType::Fields => self
                .field_specs()
                .iter()
                .map(|spec| spec.name.as_str())
                .collect(),
            _ => self.field.as_deref().into_iter().collect(),
        }
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    pub fn field_specs(&self) -> &[FieldSpec] {
        self.fields.as_deref().unwrap_or_default()
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.field_specs().iter().find(|spec| spec.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_shape_matches_builder_output() {
        let question: Question = serde_json::from_value(json!({
            "id": "1700000000000",
            "title": "Contact",
            "description": "Tell us about yourself",
            "type": "fields",
            "fields": [
                { "name": "name", "label": "Your name", "type": "text", "required": true },
                { "name": "email", "label": "Email", "type": "email", "required": false }
            ]
        }))
        .unwrap();

        assert_eq!(question.question_type, QuestionType::Fields);
        assert_eq!(question.answer_keys(), vec!["name", "email"]);
        assert_eq!(question.field_spec("email").unwrap().field_type, FieldType::Email);

        let back = serde_json::to_value(&question).unwrap();
        assert!(back.get("field").is_none());
        assert_eq!(back["fields"][0]["type"], "text");
    }

    #[test]
    fn single_key_questions() {
        let question: Question = serde_json::from_value(json!({
            "id": "age",
            "title": "Age",
            "type": "radio",
            "field": "ageRange",
            "options": ["18-25", "26-35"]
        }))
        .unwrap();
        assert_eq!(question.answer_keys(), vec!["ageRange"]);
        assert_eq!(question.options().len(), 2);
        assert!(question.field_specs().is_empty());
    }
}
