use actix_web::{post, web, HttpResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::{
    error::{ApiError, ValidationError},
    AppState,
};
use crate::{
    domain::{format_float, NotificationRequest},
    web_content::parse_target_url,
};

/// Validated body of `POST /api/classify`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyRequest {
    pub raw_url: String,
    pub url: Url,
    pub email: Option<String>,
}

impl ClassifyRequest {
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationError> {
        let fields: Map<String, Value> = match serde_json::from_slice(body) {
            Ok(Value::Object(fields)) if !fields.is_empty() => fields,
            _ => return Err(ValidationError::NoData),
        };

        let raw_url = match fields.get("url") {
            None => return Err(ValidationError::NoUrl),
            Some(Value::String(url)) => url.clone(),
            Some(_) => return Err(ValidationError::InvalidUrl),
        };
        let url = parse_target_url(&raw_url).map_err(|_| ValidationError::InvalidUrl)?;

        let email = fields
            .get("email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_string);

        Ok(Self {
            raw_url,
            url,
            email,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub message: &'static str,
    pub prediction: String,
    pub proba: String,
}

#[post("/api/classify")]
pub async fn classify(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let request = ClassifyRequest::from_body(&body)?;
    tracing::info!(target: "api", url = %request.url, "classification requested");

    let document = state.extractor.extract(&request.url).await?;
    let result = state.classifier.classify(&document)?;
    tracing::info!(
        target: "api",
        url = %request.url,
        raw_chars = document.raw_chars,
        prediction = %result.verdict,
        proba = result.probability,
        "site classified"
    );

    match request.email.as_deref() {
        Some(recipient) => {
            let notification =
                NotificationRequest::for_result(recipient, &request.raw_url, &result);
            state.notifier.notify(notification).await;
        }
        None => tracing::warn!(
            target: "api",
            url = %request.url,
            "no email provided, result notification skipped"
        ),
    }

    Ok(HttpResponse::Ok().json(ClassifyResponse {
        message: "Success",
        prediction: result.verdict.to_string(),
        proba: format_float(result.probability),
    }))
}
