use crate::error::Result;
use crate::models::quiz::Quiz;
use crate::storage::{keys, load_json, save_json, SharedStore};

/// Committed quiz definitions, kept as one ordered list.
#[derive(Clone)]
pub struct TemplateService {
    store: SharedStore,
}

impl TemplateService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Vec<Quiz> {
        load_json(self.store.as_ref(), keys::QUIZ_TEMPLATES).unwrap_or_default()
    }

    pub fn get(&self, id: &str) -> Option<Quiz> {
        self.list().into_iter().find(|q| q.id == id)
    }

    /// The quiz the taking flow runs: the first committed one.
    pub fn active(&self) -> Option<Quiz> {
        self.list().into_iter().next()
    }

    /// Replaces the entry with the same id in place, or appends.
    pub fn upsert(&self, quiz: Quiz) -> Result<()> {
        let mut quizzes = self.list();
        match quizzes.iter_mut().find(|q| q.id == quiz.id) {
            Some(existing) => *existing = quiz,
            None => quizzes.push(quiz),
        }
        self.save_all(&quizzes)
    }

    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut quizzes = self.list();
        let before = quizzes.len();
        quizzes.retain(|q| q.id != id);
        if quizzes.len() == before {
            return Ok(false);
        }
        self.save_all(&quizzes)?;
        Ok(true)
    }

    fn save_all(&self, quizzes: &[Quiz]) -> Result<()> {
        save_json(self.store.as_ref(), keys::QUIZ_TEMPLATES, quizzes)
    }
}
