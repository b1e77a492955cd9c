use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::{config::SmtpConfig, domain::NotificationRequest};

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("smtp is not configured")]
    Disabled,
}

/// Delivers classification results. Failures never reach the caller.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: NotificationRequest);
}

pub struct SmtpNotifier {
    transport: Option<(AsyncSmtpTransport<Tokio1Executor>, Mailbox)>,
}

impl SmtpNotifier {
    pub fn new(config: Option<&SmtpConfig>) -> Result<Self, NotificationError> {
        let Some(config) = config else {
            tracing::warn!(
                target: "notify",
                "SMTP_USERNAME/SMTP_PASSWORD not set; result emails are disabled"
            );
            return Ok(Self { transport: None });
        };

        let sender = parse_mailbox(&config.sender)?;
        // No pool: every message opens, authenticates, sends and quits its own session.
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        tracing::info!(
            target: "notify",
            host = %config.host,
            port = config.port,
            sender = %config.sender,
            "smtp notifier ready"
        );
        Ok(Self {
            transport: Some((transport, sender)),
        })
    }

    async fn deliver(&self, request: &NotificationRequest) -> Result<(), NotificationError> {
        let (transport, sender) = self.transport.as_ref().ok_or(NotificationError::Disabled)?;
        let message = build_message(sender.clone(), request)?;
        transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, request: NotificationRequest) {
        match self.deliver(&request).await {
            Ok(()) => tracing::info!(
                target: "notify",
                recipient = %request.recipient,
                body = %request.body,
                "result email sent"
            ),
            Err(NotificationError::Disabled) => tracing::debug!(
                target: "notify",
                recipient = %request.recipient,
                "result email skipped, smtp disabled"
            ),
            Err(err) => tracing::error!(
                target: "notify",
                recipient = %request.recipient,
                error = %err,
                "failed to send result email"
            ),
        }
    }
}

pub fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| NotificationError::Address {
            address: address.to_string(),
            source,
        })
}

fn build_message(sender: Mailbox, request: &NotificationRequest) -> Result<Message, NotificationError> {
    let recipient = parse_mailbox(&request.recipient)?;
    let message = Message::builder()
        .from(sender)
        .to(recipient)
        .subject(request.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(request.body.clone())?;
    Ok(message)
}
