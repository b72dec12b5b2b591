use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::response::Response;
use crate::services::response_service::ResponseService;
use crate::services::sync_service::RemoteSync;
use crate::storage::{keys, load_json, save_json, KeyValueStore, SharedStore};
use crate::utils::crypto;

/// Decides whether an admin login attempt is accepted.
#[cfg_attr(test, mockall::automock)]
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, email: &str, password: &str) -> bool;
}

/// Email plus argon2 password hash, both taken from configuration.
pub struct PasswordAuthenticator {
    email: String,
    password_hash: String,
}

impl PasswordAuthenticator {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        match (&config.admin_email, &config.admin_password_hash) {
            (Some(email), Some(hash)) => Ok(Self::new(email.clone(), hash.clone())),
            _ => Err(Error::Config(
                "ADMIN_EMAIL and ADMIN_PASSWORD_HASH must both be set".to_string(),
            )),
        }
    }
}

impl Authenticator for PasswordAuthenticator {
    fn authenticate(&self, email: &str, password: &str) -> bool {
        let email_ok = crypto::constant_time_eq(email.trim(), &self.email);
        let password_ok = crypto::verify_password(password, &self.password_hash);
        email_ok && password_ok
    }
}

/// Admin view over submitted responses.
///
/// The authenticated flag is persisted without expiry; it gates the panel for
/// a trusted demo and is not a security boundary.
pub struct AdminPanel {
    store: SharedStore,
    authenticator: Arc<dyn Authenticator>,
    responses: ResponseService,
}

impl AdminPanel {
    pub fn new(store: SharedStore, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            responses: ResponseService::new(store.clone()),
            store,
            authenticator,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<()> {
        if !self.authenticator.authenticate(email, password) {
            tracing::warn!("Rejected admin login attempt");
            return Err(Error::Unauthorized("Invalid email or password".to_string()));
        }
        save_json(self.store.as_ref(), keys::ADMIN_AUTHENTICATED, &true)?;
        tracing::info!("Admin logged in");
        Ok(())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::ADMIN_AUTHENTICATED)?;
        self.store.remove(keys::ADMIN_PANEL_VISIBLE)
    }

    pub fn is_authenticated(&self) -> bool {
        load_json(self.store.as_ref(), keys::ADMIN_AUTHENTICATED).unwrap_or(false)
    }

    pub fn show(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::ADMIN_PANEL_VISIBLE, &true)
    }

    pub fn hide(&self) -> Result<()> {
        save_json(self.store.as_ref(), keys::ADMIN_PANEL_VISIBLE, &false)
    }

    pub fn is_visible(&self) -> bool {
        load_json(self.store.as_ref(), keys::ADMIN_PANEL_VISIBLE).unwrap_or(false)
    }

    pub fn responses(&self) -> Result<Vec<Response>> {
        self.require_auth()?;
        Ok(self.responses.list())
    }

    /// Same list as [`AdminPanel::responses`], read through the remote mirror.
    pub async fn synced_responses(&self, sync: &RemoteSync) -> Result<Vec<Response>> {
        self.require_auth()?;
        Ok(sync.list_responses().await.value)
    }

    pub fn response(&self, id: i64) -> Result<Response> {
        self.require_auth()?;
        self.responses
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Response {} not found", id)))
    }

    pub fn delete_response(&self, id: i64) -> Result<()> {
        self.require_auth()?;
        if !self.responses.delete(id)? {
            return Err(Error::NotFound(format!("Response {} not found", id)));
        }
        tracing::info!(response_id = id, "Response deleted");
        Ok(())
    }

    fn require_auth(&self) -> Result<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(Error::Unauthorized("Admin login required".to_string()))
        }
    }
}
