/// Disposable mailbox client for a MailSlurp-style HTTP API
use async_trait::async_trait;
use formsentry_core::{MailboxConfig, ProbeError};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Inbox {
    pub id: String,
    #[serde(rename = "emailAddress")]
    pub email_address: String,
}

/// Entry from the inbox listing; the provider returns newest first
#[derive(Debug, Clone, Deserialize)]
pub struct EmailSummary {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Full message as fetched by id; immutable once fetched.
/// Schema beyond `id`/`body` is not load-bearing, unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Email {
    pub id: String,
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Read access to a provisioned mailbox
#[async_trait]
pub trait MailboxApi: Send + Sync {
    async fn list_emails(&self, inbox_id: &str) -> Result<Vec<EmailSummary>, ProbeError>;
    async fn fetch_email(&self, email_id: &str) -> Result<Email, ProbeError>;
}

pub struct MailslurpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MailslurpClient {
    pub fn new(config: &MailboxConfig) -> Result<Self, ProbeError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ProbeError::Config(format!("invalid api_base_url: {}", e)))?;

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| ProbeError::Config(format!("invalid api_key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(mailbox_err)?;

        Ok(Self { http, base_url })
    }

    /// Provision a fresh disposable inbox
    pub async fn create_inbox(&self) -> Result<Inbox, ProbeError> {
        let url = self.endpoint("inboxes")?;

        let inbox: Inbox = self
            .http
            .post(url)
            .send()
            .await
            .map_err(mailbox_err)?
            .error_for_status()
            .map_err(mailbox_err)?
            .json()
            .await
            .map_err(mailbox_err)?;

        info!("provisioned disposable inbox {}", inbox.email_address);
        Ok(inbox)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ProbeError> {
        self.base_url
            .join(path)
            .map_err(|e| ProbeError::Mailbox(format!("bad endpoint {}: {}", path, e)))
    }
}

#[async_trait]
impl MailboxApi for MailslurpClient {
    async fn list_emails(&self, inbox_id: &str) -> Result<Vec<EmailSummary>, ProbeError> {
        let url = self.endpoint(&format!("inboxes/{}/emails", inbox_id))?;

        self.http
            .get(url)
            .send()
            .await
            .map_err(mailbox_err)?
            .error_for_status()
            .map_err(mailbox_err)?
            .json()
            .await
            .map_err(mailbox_err)
    }

    async fn fetch_email(&self, email_id: &str) -> Result<Email, ProbeError> {
        let url = self.endpoint(&format!("emails/{}", email_id))?;

        self.http
            .get(url)
            .send()
            .await
            .map_err(mailbox_err)?
            .error_for_status()
            .map_err(mailbox_err)?
            .json()
            .await
            .map_err(mailbox_err)
    }
}

fn mailbox_err(e: reqwest::Error) -> ProbeError {
    ProbeError::Mailbox(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_inbox_payload() {
        let inbox: Inbox = serde_json::from_str(
            r#"{"id":"inbox-1","emailAddress":"happy_cloud@mailslurp.net","userId":"ignored"}"#,
        )
        .unwrap();

        assert_eq!(inbox.id, "inbox-1");
        assert_eq!(inbox.email_address, "happy_cloud@mailslurp.net");
    }

    #[test]
    fn decodes_email_listing_with_and_without_timestamps() {
        let summaries: Vec<EmailSummary> = serde_json::from_str(
            r#"[{"id":"e-2","createdAt":"2026-01-05T10:00:00Z","subject":"Verify"},{"id":"e-1"}]"#,
        )
        .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "e-2");
        assert!(summaries[0].created_at.is_some());
        assert!(summaries[1].created_at.is_none());
    }

    #[test]
    fn decodes_email_with_missing_body() {
        let email: Email =
            serde_json::from_str(r#"{"id":"e-1","subject":"Your code","from":"x@y.z"}"#).unwrap();

        assert_eq!(email.id, "e-1");
        assert!(email.body.is_none());
    }
}
