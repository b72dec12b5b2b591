use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::response::Response;
use crate::storage::{keys, load_json, save_json, SharedStore};
use crate::utils::time;

const RESERVED_KEYS: [&str; 3] = ["id", "completed_at", "template_id"];
const CONTACT_KEYS: [&str; 3] = ["name", "phone", "email"];

/// Append-only list of submitted responses.
#[derive(Clone)]
pub struct ResponseService {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
}

impl ResponseService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Responses in submission order.
    pub fn list(&self) -> Vec<Response> {
        load_json(self.store.as_ref(), keys::RESPONSES).unwrap_or_default()
    }

    pub fn list_newest_first(&self) -> Vec<Response> {
        let mut responses = self.list();
        responses.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));
        responses
    }

    pub fn get(&self, id: i64) -> Option<Response> {
        self.list().into_iter().find(|r| r.id == id)
    }

    /// Stores `answers` as a new response with a fresh id and completion time.
    pub fn append(&self, answers: Map<String, JsonValue>) -> Result<Response> {
        self.append_with_template(answers, None)
    }

    /// Server-side variant: the record also carries the template it answers and
    /// always has `name`, `phone` and `email`, lifted from a nested `contact`
    /// object when the top-level keys are missing.
    pub fn record_submission(&self, body: Map<String, JsonValue>, template_id: Option<i64>) -> Result<Response> {
        let mut answers = body;
        for key in CONTACT_KEYS {
            let value = contact_value(&answers, key);
            answers.insert(key.to_string(), JsonValue::String(value));
        }
        self.append_with_template(answers, template_id)
    }

    /// Stores an already-built response unless one with the same id exists.
    pub fn insert(&self, response: Response) -> Result<bool> {
        let _guard = self.guard()?;
        let mut responses = self.list();
        if responses.iter().any(|r| r.id == response.id) {
            return Ok(false);
        }
        responses.push(response);
        self.save_all(&responses)?;
        Ok(true)
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        let _guard = self.guard()?;
        let mut responses = self.list();
        let before = responses.len();
        responses.retain(|r| r.id != id);
        if responses.len() == before {
            return Ok(false);
        }
        self.save_all(&responses)?;
        Ok(true)
    }

    fn append_with_template(&self, mut answers: Map<String, JsonValue>, template_id: Option<i64>) -> Result<Response> {
        for key in RESERVED_KEYS {
            answers.remove(key);
        }

        let _guard = self.guard()?;
        let mut responses = self.list();
        let last_id = responses.iter().map(|r| r.id).max();
        let response = Response {
            id: time::next_timestamp_id(last_id),
            completed_at: Some(time::now()),
            template_id,
            answers,
        };
        responses.push(response.clone());
        self.save_all(&responses)?;

        tracing::info!(response_id = response.id, "Response stored");
        Ok(response)
    }

    fn save_all(&self, responses: &[Response]) -> Result<()> {
        save_json(self.store.as_ref(), keys::RESPONSES, responses)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::Storage("response store lock poisoned".to_string()))
    }
}

fn contact_value(body: &Map<String, JsonValue>, key: &str) -> String {
    let top_level = body.get(key).and_then(JsonValue::as_str).filter(|v| !v.is_empty());
    let nested = || {
        body.get("contact")
            .and_then(|c| c.get(key))
            .and_then(JsonValue::as_str)
    };
    top_level.or_else(nested).unwrap_or_default().to_string()
}
