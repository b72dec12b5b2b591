use std::sync::{Arc, Mutex, MutexGuard};

use crate::dto::template_dto::TemplatePayload;
use crate::error::{Error, Result};
use crate::models::template::PublishedTemplate;
use crate::storage::{keys, load_json, save_json, SharedStore};
use crate::utils::time;

/// Server-side storage behind the `/template` endpoints.
///
/// Every create adds a record with the next integer id; reads and id-less
/// updates address the latest (highest id) record.
#[derive(Clone)]
pub struct PublishedTemplateService {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
}

impl PublishedTemplateService {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn latest(&self) -> Option<PublishedTemplate> {
        self.list().into_iter().max_by_key(|t| t.id)
    }

    pub fn create(&self, payload: TemplatePayload) -> Result<PublishedTemplate> {
        let _guard = self.guard()?;
        let mut templates = self.list();
        let next_id = templates.iter().filter_map(|t| t.id).max().unwrap_or(0) + 1;
        let now = time::now();

        let mut template = payload.to_local();
        template.id = Some(next_id);
        template.created_at = Some(now);
        template.updated_at = Some(now);

        templates.push(template.clone());
        self.save_all(&templates)?;
        tracing::info!(template_id = next_id, "Template created");
        Ok(template)
    }

    /// Updates `payload.id`, or the latest template when no id is given.
    pub fn update(&self, payload: TemplatePayload) -> Result<PublishedTemplate> {
        let _guard = self.guard()?;
        let mut templates = self.list();
        let target_id = match payload.id {
            Some(id) => id,
            None => templates
                .iter()
                .filter_map(|t| t.id)
                .max()
                .ok_or_else(|| Error::NotFound("Template not found".to_string()))?,
        };

        let existing = templates
            .iter_mut()
            .find(|t| t.id == Some(target_id))
            .ok_or_else(|| Error::NotFound(format!("Template {} not found", target_id)))?;

        let mut updated = payload.to_local();
        updated.id = Some(target_id);
        updated.created_at = existing.created_at;
        updated.updated_at = Some(time::now());
        *existing = updated.clone();

        self.save_all(&templates)?;
        tracing::info!(template_id = target_id, "Template updated");
        Ok(updated)
    }

    /// Removes the latest template and returns its id.
    pub fn delete_latest(&self) -> Result<i64> {
        let _guard = self.guard()?;
        let mut templates = self.list();
        let latest_id = templates
            .iter()
            .filter_map(|t| t.id)
            .max()
            .ok_or_else(|| Error::NotFound("Template not found".to_string()))?;

        templates.retain(|t| t.id != Some(latest_id));
        self.save_all(&templates)?;
        tracing::info!(template_id = latest_id, "Template deleted");
        Ok(latest_id)
    }

    fn list(&self) -> Vec<PublishedTemplate> {
        load_json(self.store.as_ref(), keys::PUBLISHED_TEMPLATES).unwrap_or_default()
    }

    fn save_all(&self, templates: &[PublishedTemplate]) -> Result<()> {
        save_json(self.store.as_ref(), keys::PUBLISHED_TEMPLATES, templates)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| Error::Storage("template store lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn payload(title: &str) -> TemplatePayload {
        serde_json::from_value(serde_json::json!({ "title": title })).unwrap()
    }

    #[test]
    fn create_assigns_increasing_ids() {
        let service = PublishedTemplateService::new(MemoryStore::shared());
        assert!(service.latest().is_none());

        let first = service.create(payload("one")).unwrap();
        let second = service.create(payload("two")).unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(second.created_at.is_some());
        assert_eq!(service.latest().unwrap().title, "two");
    }

    #[test]
    fn update_without_id_targets_latest() {
        let service = PublishedTemplateService::new(MemoryStore::shared());
        assert!(matches!(service.update(payload("none")), Err(Error::NotFound(_))));

        let first = service.create(payload("one")).unwrap();
        service.create(payload("two")).unwrap();

        let updated = service.update(payload("two, edited")).unwrap();
        assert_eq!(updated.id, Some(2));
        assert_eq!(service.latest().unwrap().title, "two, edited");

        let by_id = service.update(payload("one, edited").with_id(first.id)).unwrap();
        assert_eq!(by_id.created_at, first.created_at);
        assert!(matches!(
            service.update(payload("ghost").with_id(Some(42))),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn delete_latest_reports_removed_id() {
        let service = PublishedTemplateService::new(MemoryStore::shared());
        assert!(matches!(service.delete_latest(), Err(Error::NotFound(_))));

        service.create(payload("one")).unwrap();
        service.create(payload("two")).unwrap();
        assert_eq!(service.delete_latest().unwrap(), 2);
        assert_eq!(service.latest().unwrap().id, Some(1));
    }
}
