//! Transactional email: client confirmations and back-office
//! notifications.

use std::sync::Arc;

use aria_types::Client;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::NotifyError;

/// Mail provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Provider API key. Empty means mail is disabled.
    #[serde(default)]
    pub api_key: String,

    /// Sender address for all outbound mail.
    #[serde(default)]
    pub sender_email: String,

    /// Provider endpoint; defaults to the SendGrid v3 send endpoint.
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,

    /// Fixed internal recipient for back-office notifications
    /// (quote requests, callback demands, escalations).
    #[serde(default)]
    pub back_office_email: String,
}

fn default_mail_api_url() -> String {
    "https://api.sendgrid.com/v3/mail/send".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            sender_email: String::new(),
            api_url: default_mail_api_url(),
            back_office_email: String::new(),
        }
    }
}

/// One-shot mail delivery. Implementations must not retry; retrying is
/// the caller's decision.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

/// SendGrid-style HTTP mail transport.
pub struct SendGridMailer {
    config: MailConfig,
    client: reqwest::Client,
}

impl SendGridMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MailTransport for SendGridMailer {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        if self.config.api_key.is_empty() {
            return Err(NotifyError::NotConfigured("mail api key"));
        }
        if self.config.sender_email.is_empty() {
            return Err(NotifyError::NotConfigured("sender email"));
        }

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.config.sender_email },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html_body }],
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%status, to, "mail provider rejected the send");
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::info!(to, subject, "email sent");
        Ok(())
    }
}

/// High-level mail operations over a [`MailTransport`].
///
/// Owns the phrasing conventions: HTML line breaks, the client greeting
/// and signature, and the fixed back-office recipient.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    back_office_email: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, back_office_email: impl Into<String>) -> Self {
        Self {
            transport,
            back_office_email: back_office_email.into(),
        }
    }

    /// Sends an internal notification to the back office.
    pub async fn send_notification(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        if self.back_office_email.is_empty() {
            return Err(NotifyError::NotConfigured("back-office email"));
        }
        self.transport
            .send(&self.back_office_email, subject, &newline_to_br(body))
            .await
    }

    /// Sends a confirmation email to a client, wrapped in the standard
    /// greeting and signature.
    pub async fn send_client_email(
        &self,
        client: &Client,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let Some(to) = client.email.as_deref() else {
            return Err(NotifyError::NoRecipient);
        };
        let full_body = format!(
            "Bonjour {},<br><br>{}<br><br>Cordialement,<br>L'équipe d'ARTEX ASSURANCES",
            client.full_name(),
            newline_to_br(body)
        );
        self.transport.send(to, subject, &full_body).await
    }
}

fn newline_to_br(text: &str) -> String {
    text.replace('\n', "<br>")
}
