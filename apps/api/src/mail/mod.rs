//! Outbound email. Resend is used when an API key is configured, SMTP
//! otherwise; without either the service runs with no mailer.

pub mod resend;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

pub use resend::ResendMailer;
pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("No email provider configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Email provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Picks the mail transport from configuration.
pub fn from_config(config: &Config) -> Result<Option<Arc<dyn Mailer>>, MailError> {
    if let Some(key) = &config.resend_api_key {
        info!("Mail transport: Resend");
        return Ok(Some(Arc::new(ResendMailer::new(key.clone())?)));
    }
    if let Some(smtp) = &config.smtp {
        info!("Mail transport: SMTP via {}:{}", smtp.host, smtp.port);
        return Ok(Some(Arc::new(SmtpMailer::new(smtp)?)));
    }
    info!("Mail transport: none configured");
    Ok(None)
}
