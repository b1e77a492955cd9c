use std::sync::Arc;

use actix_web::web;

use crate::{
    classifier::SiteClassifier, infrastructure::notifier::Notifier,
    web_content::ContentExtractor,
};

pub mod classify;
pub mod error;
pub mod health;

/// Collaborators shared by every request. All of them are read-only after startup.
pub struct AppState {
    pub extractor: Arc<dyn ContentExtractor>,
    pub classifier: Arc<dyn SiteClassifier>,
    pub notifier: Arc<dyn Notifier>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(classify::classify).service(health::liveness);
}
