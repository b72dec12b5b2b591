use std::collections::HashSet;

use crate::dto::builder_dto::{Direction, QuestionForm, QuizField};
use crate::error::{Error, Result};
use crate::models::question::{FieldSpec, Question, QuestionType};
use crate::models::quiz::Quiz;
use crate::services::template_service::TemplateService;
use crate::storage::{keys, load_json, save_json, KeyValueStore, SharedStore};
use crate::utils::{time, validation};

/// Admin-side editor over the template list.
///
/// Holds at most one draft. Every draft mutation is written back under its own
/// key so an interrupted session can pick the draft up again; the template
/// list itself only changes on [`QuizBuilder::save_draft`] and
/// [`QuizBuilder::delete_quiz`].
pub struct QuizBuilder {
    store: SharedStore,
    templates: TemplateService,
    draft: Option<Quiz>,
}

impl QuizBuilder {
    pub fn new(store: SharedStore) -> Self {
        let draft = load_json(store.as_ref(), keys::QUIZ_DRAFT);
        let templates = TemplateService::new(store.clone());
        Self { store, templates, draft }
    }

    pub fn templates(&self) -> Vec<Quiz> {
        self.templates.list()
    }

    pub fn draft(&self) -> Option<&Quiz> {
        self.draft.as_ref()
    }

    pub fn create_draft(&mut self) -> Result<&Quiz> {
        let templates = self.templates.list();
        let id = time::next_string_id(templates.iter().map(|q| q.id.as_str()));
        let quiz = Quiz::empty(id, time::now());
        tracing::info!(quiz_id = %quiz.id, "Draft created");
        self.replace_draft(quiz)
    }

    /// Starts editing a committed quiz.
    pub fn open_draft(&mut self, quiz_id: &str) -> Result<&Quiz> {
        let quiz = self
            .templates
            .get(quiz_id)
            .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;
        self.replace_draft(quiz)
    }

    pub fn discard_draft(&mut self) -> Result<()> {
        self.draft = None;
        self.store.remove(keys::QUIZ_DRAFT)
    }

    pub fn edit_field(&mut self, field: QuizField, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.mutate_draft(|quiz| {
            match field {
                QuizField::Name => quiz.name = value,
                QuizField::Description => quiz.description = value,
                QuizField::WelcomeTitle => quiz.welcome_title = Some(value),
                QuizField::WelcomeSubtitle => quiz.welcome_subtitle = Some(value),
            }
            Ok(())
        })
    }

    /// Adds a question built from `form`, or replaces the question `editing` in place.
    pub fn add_or_update_question(&mut self, form: QuestionForm, editing: Option<&str>) -> Result<Question> {
        self.mutate_draft(|quiz| {
            let id = match editing {
                Some(id) => id.to_string(),
                None => time::next_string_id(quiz.questions.iter().map(|q| q.id.as_str())),
            };
            let question = build_question(id, form)?;
            ensure_unique_keys(quiz, &question)?;

            match editing {
                Some(id) => {
                    let slot = quiz
                        .questions
                        .iter_mut()
                        .find(|q| q.id == id)
                        .ok_or_else(|| Error::NotFound(format!("Question {} not found", id)))?;
                    *slot = question.clone();
                }
                None => quiz.questions.push(question.clone()),
            }
            Ok(question)
        })
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<()> {
        self.mutate_draft(|quiz| {
            let index = quiz
                .questions
                .iter()
                .position(|q| q.id == question_id)
                .ok_or_else(|| Error::NotFound(format!("Question {} not found", question_id)))?;
            quiz.questions.remove(index);
            Ok(())
        })
    }

    /// Swaps the question at `index` with its neighbour. Returns `false` at the bounds.
    pub fn reorder(&mut self, index: usize, direction: Direction) -> Result<bool> {
        self.mutate_draft(|quiz| Ok(move_question(&mut quiz.questions, index, direction)))
    }

    /// Commits the draft to the template list and clears it.
    pub fn save_draft(&mut self) -> Result<Quiz> {
        let quiz = self
            .draft
            .clone()
            .ok_or_else(|| Error::NotFound("No draft to save".to_string()))?;
        self.templates.upsert(quiz.clone())?;
        self.store.remove(keys::QUIZ_DRAFT)?;
        self.draft = None;
        tracing::info!(quiz_id = %quiz.id, questions = quiz.questions.len(), "Quiz saved");
        Ok(quiz)
    }

    pub fn delete_quiz(&mut self, quiz_id: &str) -> Result<bool> {
        let deleted = self.templates.delete(quiz_id)?;
        if self.draft.as_ref().is_some_and(|d| d.id == quiz_id) {
            self.discard_draft()?;
        }
        if deleted {
            tracing::info!(quiz_id, "Quiz deleted");
        }
        Ok(deleted)
    }

    fn replace_draft(&mut self, quiz: Quiz) -> Result<&Quiz> {
        save_json(self.store.as_ref(), keys::QUIZ_DRAFT, &quiz)?;
        Ok(self.draft.insert(quiz))
    }

    fn mutate_draft<T>(&mut self, f: impl FnOnce(&mut Quiz) -> Result<T>) -> Result<T> {
        let quiz = self
            .draft
            .as_mut()
            .ok_or_else(|| Error::BadRequest("No draft is being edited".to_string()))?;
        let out = f(quiz)?;
        save_json(self.store.as_ref(), keys::QUIZ_DRAFT, quiz)?;
        Ok(out)
    }
}

fn move_question(questions: &mut [Question], index: usize, direction: Direction) -> bool {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    match target {
        Some(target) if index < questions.len() && target < questions.len() => {
            questions.swap(index, target);
            true
        }
        _ => false,
    }
}

fn build_question(id: String, form: QuestionForm) -> Result<Question> {
    let QuestionForm {
        title,
        description,
        question_type,
        field,
        options,
        placeholder,
        fields,
    } = form;

    let mut question = Question {
        id,
        title,
        description,
        question_type,
        field: None,
        options: None,
        fields: None,
        placeholder: None,
    };

    if question_type == QuestionType::Fields {
        question.fields = Some(clean_field_specs(fields)?);
        return Ok(question);
    }

    let key = if !validation::is_blank(&field) {
        field.trim().to_string()
    } else if !validation::is_blank(&question.title) {
        validation::field_key_from_title(&question.title)
    } else {
        String::new()
    };
    if key.is_empty() {
        return Err(Error::InvalidQuestion(
            "A field key or a title to derive it from is required".to_string(),
        ));
    }
    question.field = Some(key);

    match question_type {
        QuestionType::Radio => {
            let options = validation::parse_option_lines(&options);
            if options.is_empty() {
                return Err(Error::InvalidQuestion(
                    "A single-choice question needs at least one option".to_string(),
                ));
            }
            question.options = Some(options);
        }
        QuestionType::Textarea => question.placeholder = Some(placeholder),
        QuestionType::Text | QuestionType::Fields => {}
    }
    Ok(question)
}

/// Every answer key is owned by exactly one question of the quiz.
fn ensure_unique_keys(quiz: &Quiz, question: &Question) -> Result<()> {
    for key in question.answer_keys() {
        let owner = quiz
            .questions
            .iter()
            .filter(|q| q.id != question.id)
            .find(|q| q.answer_keys().contains(&key));
        if let Some(owner) = owner {
            return Err(Error::InvalidQuestion(format!(
                "Field key '{}' is already used by question '{}'",
                key, owner.title
            )));
        }
    }
    Ok(())
}

/// Drops rows without a name and rejects empty or ambiguous sets.
fn clean_field_specs(fields: Vec<FieldSpec>) -> Result<Vec<FieldSpec>> {
    let specs: Vec<FieldSpec> = fields
        .into_iter()
        .filter(|f| !validation::is_blank(&f.name))
        .map(|mut f| {
            f.name = f.name.trim().to_string();
            f
        })
        .collect();

    if specs.is_empty() {
        return Err(Error::InvalidQuestion(
            "A multi-field question needs at least one named field".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = specs.iter().find(|f| !seen.insert(f.name.as_str())) {
        return Err(Error::InvalidQuestion(format!("Field name '{}' is used twice", dup.name)));
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::FieldType;
    use crate::storage::MemoryStore;

    fn text_form(title: &str) -> QuestionForm {
        QuestionForm::new(QuestionType::Text, title)
    }

    fn builder_with_questions(titles: &[&str]) -> QuizBuilder {
        let mut builder = QuizBuilder::new(MemoryStore::shared());
        builder.create_draft().unwrap();
        for title in titles {
            builder.add_or_update_question(text_form(title), None).unwrap();
        }
        builder
    }

    fn titles(builder: &QuizBuilder) -> Vec<String> {
        builder.draft().unwrap().questions.iter().map(|q| q.title.clone()).collect()
    }

    #[test]
    fn new_draft_has_placeholders() {
        let mut builder = QuizBuilder::new(MemoryStore::shared());
        let draft = builder.create_draft().unwrap().clone();
        assert_eq!(draft.name, crate::models::quiz::DEFAULT_QUIZ_NAME);
        assert!(draft.questions.is_empty());
        assert!(draft.id.parse::<i64>().is_ok());
    }

    #[test]
    fn draft_survives_a_reload() {
        let store = MemoryStore::shared();
        let mut builder = QuizBuilder::new(store.clone());
        builder.create_draft().unwrap();
        builder.edit_field(QuizField::Name, "Stylist quiz").unwrap();

        let reloaded = QuizBuilder::new(store);
        assert_eq!(reloaded.draft().unwrap().name, "Stylist quiz");
        assert!(reloaded.templates().is_empty());
    }

    #[test]
    fn field_key_derived_from_title() {
        let mut builder = builder_with_questions(&[]);
        let question = builder.add_or_update_question(text_form("Body  Type"), None).unwrap();
        assert_eq!(question.field.as_deref(), Some("body_type"));

        let mut form = text_form("Budget");
        form.field = "budgetRange".into();
        let question = builder.add_or_update_question(form, None).unwrap();
        assert_eq!(question.field.as_deref(), Some("budgetRange"));

        assert!(matches!(
            builder.add_or_update_question(text_form("   "), None),
            Err(Error::InvalidQuestion(_))
        ));
    }

    #[test]
    fn radio_needs_options() {
        let mut builder = builder_with_questions(&[]);
        let mut form = QuestionForm::new(QuestionType::Radio, "Age");
        form.options = "\n  \n".into();
        assert!(builder.add_or_update_question(form.clone(), None).is_err());

        form.options = "18-25\n26-35\n".into();
        let question = builder.add_or_update_question(form, None).unwrap();
        assert_eq!(question.options(), ["18-25", "26-35"]);
        assert_eq!(builder.draft().unwrap().questions.len(), 1);
    }

    #[test]
    fn fields_question_needs_a_named_field() {
        let mut builder = builder_with_questions(&[]);
        let mut form = QuestionForm::new(QuestionType::Fields, "Contact");
        form.field = "ignored".into();
        form.fields = vec![FieldSpec::new("  ", "Blank row", FieldType::Text, true)];
        assert!(builder.add_or_update_question(form.clone(), None).is_err());

        form.fields.push(FieldSpec::new("name", "Name", FieldType::Text, true));
        let question = builder.add_or_update_question(form.clone(), None).unwrap();
        assert!(question.field.is_none());
        assert_eq!(question.answer_keys(), vec!["name"]);

        form.fields.push(FieldSpec::new("name", "Again", FieldType::Email, false));
        assert!(builder.add_or_update_question(form, None).is_err());
    }

    #[test]
    fn placeholder_only_kept_for_long_text() {
        let mut builder = builder_with_questions(&[]);
        let mut form = text_form("Style");
        form.placeholder = "casual".into();
        assert!(builder.add_or_update_question(form.clone(), None).unwrap().placeholder.is_none());

        form.question_type = QuestionType::Textarea;
        form.field = "style_notes".into();
        let question = builder.add_or_update_question(form, None).unwrap();
        assert_eq!(question.placeholder.as_deref(), Some("casual"));
    }

    #[test]
    fn editing_replaces_in_place() {
        let mut builder = builder_with_questions(&["a", "b", "c"]);
        let id = builder.draft().unwrap().questions[1].id.clone();
        let current = builder.draft().unwrap().questions[1].clone();

        let mut form = QuestionForm::from_question(&current);
        form.title = "b2".into();
        builder.add_or_update_question(form, Some(&id)).unwrap();

        assert_eq!(titles(&builder), vec!["a", "b2", "c"]);
        assert_eq!(builder.draft().unwrap().questions[1].id, id);
        assert!(builder.add_or_update_question(text_form("x"), Some("missing")).is_err());
    }

    #[test]
    fn field_keys_are_unique_across_questions() {
        let mut builder = builder_with_questions(&[]);
        let mut choice = QuestionForm::new(QuestionType::Radio, "Choice");
        choice.options = "A\nB".into();
        builder.add_or_update_question(choice.clone(), None).unwrap();

        choice.options = "X\nY".into();
        assert!(matches!(
            builder.add_or_update_question(choice.clone(), None),
            Err(Error::InvalidQuestion(_))
        ));

        let mut contact = QuestionForm::new(QuestionType::Fields, "Contact");
        contact.fields = vec![FieldSpec::new("choice", "Choice", FieldType::Text, true)];
        assert!(matches!(
            builder.add_or_update_question(contact, None),
            Err(Error::InvalidQuestion(_))
        ));
        assert_eq!(builder.draft().unwrap().questions.len(), 1);

        // editing a question may keep its own key
        let id = builder.draft().unwrap().questions[0].id.clone();
        let edited = builder.add_or_update_question(choice, Some(&id)).unwrap();
        assert_eq!(edited.options(), ["X", "Y"]);

        choice = QuestionForm::new(QuestionType::Radio, "Choice");
        choice.field = "second_choice".into();
        choice.options = "X\nY".into();
        builder.add_or_update_question(choice, None).unwrap();
        assert_eq!(builder.draft().unwrap().questions.len(), 2);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut builder = builder_with_questions(&["a", "b", "c", "d"]);
        let id = builder.draft().unwrap().questions[2].id.clone();
        builder.delete_question(&id).unwrap();
        assert_eq!(titles(&builder), vec!["a", "b", "d"]);
        assert!(builder.delete_question(&id).is_err());
    }

    #[test]
    fn reorder_swaps_neighbours_and_stops_at_bounds() {
        let mut builder = builder_with_questions(&["a", "b", "c"]);

        assert!(!builder.reorder(0, Direction::Up).unwrap());
        assert!(!builder.reorder(2, Direction::Down).unwrap());
        assert!(!builder.reorder(7, Direction::Up).unwrap());
        assert_eq!(titles(&builder), vec!["a", "b", "c"]);

        assert!(builder.reorder(1, Direction::Up).unwrap());
        assert_eq!(titles(&builder), vec!["b", "a", "c"]);
        assert!(builder.reorder(1, Direction::Down).unwrap());
        assert_eq!(titles(&builder), vec!["b", "c", "a"]);
    }

    #[test]
    fn save_upserts_and_clears_draft() {
        let store = MemoryStore::shared();
        let mut builder = QuizBuilder::new(store.clone());
        builder.create_draft().unwrap();
        let first = builder.save_draft().unwrap();
        builder.create_draft().unwrap();
        builder.save_draft().unwrap();
        assert!(builder.draft().is_none());
        assert!(store.get(keys::QUIZ_DRAFT).unwrap().is_none());

        builder.open_draft(&first.id).unwrap();
        builder.edit_field(QuizField::Description, "edited").unwrap();
        builder.save_draft().unwrap();

        let saved = builder.templates();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, first.id);
        assert_eq!(saved[0].description, "edited");
        assert!(builder.save_draft().is_err());
    }

    struct TemplatesUnwritable(MemoryStore);

    impl KeyValueStore for TemplatesUnwritable {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if key == keys::QUIZ_TEMPLATES {
                return Err(Error::Storage("disk full".to_string()));
            }
            self.0.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn failed_save_keeps_draft() {
        let store: SharedStore = std::sync::Arc::new(TemplatesUnwritable(MemoryStore::new()));
        let mut builder = QuizBuilder::new(store.clone());
        builder.create_draft().unwrap();
        builder.edit_field(QuizField::Name, "Unsaved").unwrap();

        assert!(matches!(builder.save_draft(), Err(Error::Storage(_))));
        assert_eq!(builder.draft().unwrap().name, "Unsaved");
        assert!(store.get(keys::QUIZ_DRAFT).unwrap().is_some());
        assert!(builder.templates().is_empty());
    }

    #[test]
    fn deleting_quiz_clears_matching_draft() {
        let mut builder = QuizBuilder::new(MemoryStore::shared());
        builder.create_draft().unwrap();
        let quiz = builder.save_draft().unwrap();
        builder.open_draft(&quiz.id).unwrap();

        assert!(builder.delete_quiz(&quiz.id).unwrap());
        assert!(builder.draft().is_none());
        assert!(builder.templates().is_empty());
        assert!(!builder.delete_quiz(&quiz.id).unwrap());
    }

    #[test]
    fn mutations_without_draft_are_rejected() {
        let mut builder = QuizBuilder::new(MemoryStore::shared());
        assert!(builder.edit_field(QuizField::Name, "x").is_err());
        assert!(builder.reorder(0, Direction::Down).is_err());
    }
}
