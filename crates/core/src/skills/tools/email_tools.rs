//! # Email Tools
//!
//! Optional delivery of finished research reports.

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// `body` is markdown
    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()>;
}

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Mailer backed by the SendGrid v3 API
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    to: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from: String, to: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            api_key,
            from,
            to,
        })
    }

    /// Reads `SENDGRID_API_KEY`, `REPORT_EMAIL_FROM` and `REPORT_EMAIL_TO`.
    /// Returns `None` when any of them is missing, which disables the email stage.
    pub fn from_env() -> Option<Self> {
        let api_key = non_empty_env("SENDGRID_API_KEY")?;
        let from = non_empty_env("REPORT_EMAIL_FROM")?;
        let to = non_empty_env("REPORT_EMAIL_TO")?;

        match Self::new(api_key, from, to) {
            Ok(mailer) => Some(mailer),
            Err(e) => {
                tracing::warn!("Email delivery disabled: {:#}", e);
                None
            }
        }
    }

    fn payload(&self, subject: &str, body: &str) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": self.to }] }],
            "from": { "email": self.from },
            "subject": subject,
            "content": [{ "type": "text/plain", "value": body }]
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        self.client
            .post(SENDGRID_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&self.payload(subject, body))
            .send()
            .await
            .context("SendGrid request failed")?
            .error_for_status()
            .context("SendGrid rejected the message")?;

        tracing::info!("Report emailed to {}", self.to);
        Ok(())
    }
}
