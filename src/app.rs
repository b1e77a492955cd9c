use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use reqwest::Client;

use crate::{
    api::{self, AppState},
    classifier::BundleClassifier,
    config::AppConfig,
    infrastructure::notifier::SmtpNotifier,
    web_content::WebContentFetcher,
};

pub struct SentinelApp {
    config: AppConfig,
    state: web::Data<AppState>,
}

impl SentinelApp {
    pub fn initialize(config: AppConfig) -> Result<Self> {
        let classifier = BundleClassifier::from_path(&config.model_path).with_context(|| {
            format!("cannot start without a model bundle at {}", config.model_path.display())
        })?;

        let http_client = Client::builder()
            .user_agent(config.web.user_agent.clone())
            .build()?;
        let extractor = WebContentFetcher::new(http_client, config.web.clone());

        let notifier = SmtpNotifier::new(config.smtp.as_ref())?;

        let state = web::Data::new(AppState {
            extractor: Arc::new(extractor),
            classifier: Arc::new(classifier),
            notifier: Arc::new(notifier),
        });

        Ok(Self { config, state })
    }

    pub async fn run(self) -> Result<()> {
        let SentinelApp { config, state } = self;

        tracing::info!(addr = %config.bind_addr, "site classification service starting");

        HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .wrap(Cors::permissive())
                .app_data(state.clone())
                .configure(api::configure)
        })
        .bind(config.bind_addr)
        .with_context(|| format!("failed to bind {}", config.bind_addr))?
        .run()
        .await?;

        tracing::info!("site classification service stopped");
        Ok(())
    }
}
