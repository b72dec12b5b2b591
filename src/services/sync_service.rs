use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::dto::template_dto::TemplatePayload;
use crate::error::{Error, Result};
use crate::models::quiz::Quiz;
use crate::models::response::Response;
use crate::models::template::PublishedTemplate;
use crate::services::response_service::ResponseService;
use crate::services::template_service::TemplateService;
use crate::storage::{keys, load_json, save_json, KeyValueStore, SharedStore};

/// What happened on the remote side of a mirrored operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No remote endpoint configured.
    Disabled,
    Mirrored,
    /// The remote answered with a non-success status.
    Rejected(u16),
    /// Transport failure or a response that was not JSON.
    Unreachable,
}

/// A value that is always usable, plus how the remote call went.
#[derive(Debug, Clone)]
pub struct Synced<T> {
    pub value: T,
    pub outcome: SyncOutcome,
}

impl<T> Synced<T> {
    fn new(value: T, outcome: SyncOutcome) -> Self {
        Self { value, outcome }
    }
}

/// Best-effort mirror of the local stores to the template API.
///
/// The local store is written first and stays authoritative: remote failures
/// are logged and fall back to local data, never returned as errors.
#[derive(Clone)]
pub struct RemoteSync {
    client: Client,
    base_url: Option<Url>,
    store: SharedStore,
    templates: TemplateService,
    responses: ResponseService,
}

impl RemoteSync {
    pub fn new(store: SharedStore, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = base_url
            .map(|raw| {
                Url::parse(raw).map_err(|e| Error::Config(format!("Invalid QUIZ_API_URL {}: {}", raw, e)))
            })
            .transpose()?;
        let client = Client::builder().timeout(timeout).build()?;

        match &base_url {
            Some(url) => tracing::info!("Remote sync enabled, base URL: {}", url),
            None => tracing::info!("Remote sync disabled (QUIZ_API_URL not set)"),
        }

        Ok(Self {
            client,
            base_url,
            templates: TemplateService::new(store.clone()),
            responses: ResponseService::new(store.clone()),
            store,
        })
    }

    pub fn from_config(store: SharedStore, config: &Config) -> Result<Self> {
        Self::new(
            store,
            config.quiz_api_url.as_deref(),
            Duration::from_secs(config.remote_timeout_secs),
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.base_url.is_some()
    }

    /// Reads the published template. A remote 404 means there is none.
    pub async fn get_template(&self) -> Synced<Option<PublishedTemplate>> {
        let request = match self.request(Method::GET, "template") {
            Some(request) => request,
            None => return Synced::new(self.local_template(), SyncOutcome::Disabled),
        };

        match self.send(request, "template").await {
            Ok(resp) => match read_json::<PublishedTemplate>(resp, "template").await {
                Ok(template) => Synced::new(Some(template), SyncOutcome::Mirrored),
                Err(outcome) => Synced::new(self.local_template(), outcome),
            },
            Err(SyncOutcome::Rejected(404)) => Synced::new(None, SyncOutcome::Mirrored),
            Err(outcome) => Synced::new(self.local_template(), outcome),
        }
    }

    pub async fn save_template(&self, quiz: &Quiz) -> Synced<PublishedTemplate> {
        let payload = TemplatePayload::from_quiz(quiz);
        self.write_template(Method::POST, payload).await
    }

    /// Updates the remote template this client last published, or the latest one.
    pub async fn update_template(&self, quiz: &Quiz) -> Synced<PublishedTemplate> {
        let remote_id = self.local_template().and_then(|t| t.id);
        let payload = TemplatePayload::from_quiz(quiz).with_id(remote_id);
        self.write_template(Method::PUT, payload).await
    }

    /// Drops the published copy and, when given, the committed quiz `quiz_id`.
    pub async fn delete_template(&self, quiz_id: Option<&str>) -> SyncOutcome {
        if let Err(e) = self.store.remove(keys::PUBLIC_TEMPLATE) {
            tracing::warn!(error = %e, "Failed to clear local published template");
        }
        if let Some(id) = quiz_id {
            if let Err(e) = self.templates.delete(id) {
                tracing::warn!(quiz_id = id, error = %e, "Failed to delete local quiz");
            }
        }

        match self.request(Method::DELETE, "template") {
            Some(request) => outcome_of(self.send(request, "template").await),
            None => SyncOutcome::Disabled,
        }
    }

    /// Makes sure `response` is stored locally, then posts its answers.
    pub async fn submit_response(&self, response: &Response) -> SyncOutcome {
        if let Err(e) = self.responses.insert(response.clone()) {
            tracing::warn!(response_id = response.id, error = %e, "Failed to store response locally");
        }

        match self.request(Method::POST, "response") {
            Some(request) => {
                let request = request.json(&response.answers);
                outcome_of(self.send(request, "response").await)
            }
            None => SyncOutcome::Disabled,
        }
    }

    pub async fn list_responses(&self) -> Synced<Vec<Response>> {
        let request = match self.request(Method::GET, "admin/responses") {
            Some(request) => request,
            None => return Synced::new(self.responses.list(), SyncOutcome::Disabled),
        };

        let outcome = match self.send(request, "admin/responses").await {
            Ok(resp) => match read_json::<Vec<Response>>(resp, "admin/responses").await {
                Ok(responses) => return Synced::new(responses, SyncOutcome::Mirrored),
                Err(outcome) => outcome,
            },
            Err(outcome) => outcome,
        };
        Synced::new(self.responses.list(), outcome)
    }

    async fn write_template(&self, method: Method, payload: TemplatePayload) -> Synced<PublishedTemplate> {
        let local = payload.to_local();
        self.store_local_template(&local);

        let request = match self.request(method, "template") {
            Some(request) => request.json(&payload),
            None => return Synced::new(local, SyncOutcome::Disabled),
        };

        match self.send(request, "template").await {
            Ok(resp) => match resp.json::<PublishedTemplate>().await {
                Ok(remote) => {
                    self.store_local_template(&remote);
                    Synced::new(remote, SyncOutcome::Mirrored)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote accepted the template but returned an unreadable body");
                    Synced::new(local, SyncOutcome::Mirrored)
                }
            },
            Err(outcome) => Synced::new(local, outcome),
        }
    }

    fn request(&self, method: Method, path: &str) -> Option<RequestBuilder> {
        let base = self.base_url.as_ref()?;
        let url = format!(
            "{}/{}",
            base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Some(
            self.client
                .request(method, url)
                .header(header::CONTENT_TYPE, "application/json"),
        )
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> std::result::Result<reqwest::Response, SyncOutcome> {
        match request.send().await {
            Ok(resp) if resp.status().is_success() => Ok(resp),
            Ok(resp) => {
                let status = resp.status();
                if status != StatusCode::NOT_FOUND {
                    let body = resp.text().await.unwrap_or_default();
                    tracing::warn!(path, %status, body = %body, "Remote rejected request, using local store");
                }
                Err(SyncOutcome::Rejected(status.as_u16()))
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "Remote unreachable, using local store");
                Err(SyncOutcome::Unreachable)
            }
        }
    }

    fn local_template(&self) -> Option<PublishedTemplate> {
        load_json(self.store.as_ref(), keys::PUBLIC_TEMPLATE)
    }

    fn store_local_template(&self, template: &PublishedTemplate) {
        if let Err(e) = save_json(self.store.as_ref(), keys::PUBLIC_TEMPLATE, template) {
            tracing::warn!(error = %e, "Failed to store published template locally");
        }
    }
}

fn outcome_of(result: std::result::Result<reqwest::Response, SyncOutcome>) -> SyncOutcome {
    match result {
        Ok(_) => SyncOutcome::Mirrored,
        Err(outcome) => outcome,
    }
}

/// Decodes a read. Anything but a JSON body counts as the backend being unavailable.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response, path: &str) -> std::result::Result<T, SyncOutcome> {
    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if !is_json {
        tracing::warn!(path, "Backend not available, using local store");
        return Err(SyncOutcome::Unreachable);
    }

    resp.json::<T>().await.map_err(|e| {
        tracing::warn!(path, error = %e, "Remote returned unreadable JSON, using local store");
        SyncOutcome::Unreachable
    })
}
