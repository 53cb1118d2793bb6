//! Outbound email forwarding.
//!
//! Without a configured provider the client logs the message and
//! reports a simulated success, which keeps the approval flow usable
//! in development.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::json;

use crate::config::EmailSection;

/// Forwarding request as the intake clients send it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
}

impl EmailRequest {
    /// All four fields must be present and non-empty.
    pub fn validate(&self) -> Result<(&str, &str, &str, &str)> {
        let fields = [&self.to, &self.subject, &self.body, &self.request_id];
        if fields.iter().any(|f| f.as_deref().map_or(true, |s| s.trim().is_empty())) {
            bail!("Missing required fields: to, subject, body, requestId");
        }
        Ok((
            self.to.as_deref().unwrap_or_default(),
            self.subject.as_deref().unwrap_or_default(),
            self.body.as_deref().unwrap_or_default(),
            self.request_id.as_deref().unwrap_or_default(),
        ))
    }
}

/// Email delivery, either simulated or through a JSON provider.
#[derive(Debug, Clone)]
pub enum EmailClient {
    Simulated,
    Provider {
        http: reqwest::Client,
        url: String,
        api_key: String,
        from: String,
    },
}

impl EmailClient {
    pub fn from_config(email: Option<&EmailSection>) -> Self {
        match email {
            Some(section) => EmailClient::Provider {
                http: reqwest::Client::new(),
                url: section.provider_url.clone(),
                api_key: section.api_key.clone(),
                from: section.from.clone(),
            },
            None => EmailClient::Simulated,
        }
    }

    /// Deliver one message. Returns the status line reported back to
    /// the caller.
    pub async fn send(&self, to: &str, subject: &str, body: &str, request_id: &str) -> Result<String> {
        tracing::info!(to, request_id, "sending email");
        match self {
            EmailClient::Simulated => {
                tracing::info!(subject, body, "simulated delivery");
                Ok("Email sent successfully (simulated)".to_string())
            }
            EmailClient::Provider { http, url, api_key, from } => {
                let response = http
                    .post(url)
                    .bearer_auth(api_key)
                    .json(&json!({
                        "from": from,
                        "to": to,
                        "subject": subject,
                        "body": body,
                    }))
                    .send()
                    .await
                    .with_context(|| format!("Failed to reach email provider at {url}"))?;

                let status = response.status();
                if !status.is_success() {
                    let detail = response.text().await.unwrap_or_default();
                    bail!("Email provider returned {status}: {detail}");
                }
                Ok("Email sent successfully".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> EmailRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn all_fields_required() {
        let full = request(json!({
            "to": "treasurer@example.org",
            "subject": "Approved",
            "body": "Your reimbursement was approved.",
            "requestId": "req-17"
        }));
        assert!(full.validate().is_ok());

        let missing = request(json!({
            "to": "treasurer@example.org",
            "subject": "Approved",
            "body": "Your reimbursement was approved."
        }));
        let err = missing.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: to, subject, body, requestId"
        );

        let blank = request(json!({
            "to": " ",
            "subject": "x",
            "body": "y",
            "requestId": "z"
        }));
        assert!(blank.validate().is_err());
    }

    #[tokio::test]
    async fn simulated_delivery_reports_itself() {
        let client = EmailClient::Simulated;
        let message = client.send("a@b.c", "s", "b", "req-1").await.unwrap();
        assert_eq!(message, "Email sent successfully (simulated)");
    }
}
