pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;
pub mod utils;

use crate::services::{
    published_template_service::PublishedTemplateService, response_service::ResponseService,
};
use crate::storage::SharedStore;

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub published: PublishedTemplateService,
    pub responses: ResponseService,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        let published = PublishedTemplateService::new(store.clone());
        let responses = ResponseService::new(store.clone());

        Self {
            store,
            published,
            responses,
        }
    }
}
