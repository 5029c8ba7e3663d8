//! Gmail send client
//!
//! Assembles a minimal RFC 822 message (UTF-8 subject and body, base64
//! framed) and submits it through the users.messages.send endpoint.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const GMAIL_SEND_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
const USER_AGENT: &str = "evishare/0.1";

/// Gmail client errors
#[derive(Debug, Error)]
pub enum GmailError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),
}

/// Gmail API client
pub struct GmailClient {
    http_client: reqwest::Client,
    token: String,
}

impl GmailClient {
    pub fn new(token: String) -> Result<Self, GmailError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| GmailError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Send a plain-text mail as the authenticated user.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), GmailError> {
        let raw = URL_SAFE_NO_PAD.encode(build_mime(to, subject, body));

        tracing::debug!(to = to, "Sending notification mail");

        let response = self
            .http_client
            .post(GMAIL_SEND_URL)
            .bearer_auth(&self.token)
            .json(&json!({ "raw": raw }))
            .send()
            .await
            .map_err(|e| GmailError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GmailError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// RFC 822 message with B-encoded subject and base64 text/plain body, so
/// non-ASCII content survives every hop.
pub fn build_mime(to: &str, subject: &str, body: &str) -> String {
    let encoded_subject = format!("=?UTF-8?B?{}?=", STANDARD.encode(subject));
    let encoded_body = STANDARD.encode(body);

    format!(
        "To: {}\r\n\
         Subject: {}\r\n\
         MIME-Version: 1.0\r\n\
         Content-Type: text/plain; charset=\"UTF-8\"\r\n\
         Content-Transfer-Encoding: base64\r\n\
         \r\n\
         {}",
        to, encoded_subject, encoded_body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(GmailClient::new("test-token".to_string()).is_ok());
    }

    #[test]
    fn test_build_mime_headers() {
        let mime = build_mime("team@example.com", "7. 表題 (tanaka)", "body text");

        assert!(mime.starts_with("To: team@example.com\r\n"));
        assert!(mime.contains("Subject: =?UTF-8?B?"));
        assert!(mime.contains("Content-Type: text/plain; charset=\"UTF-8\"\r\n"));
        assert!(mime.contains("\r\n\r\n"));
    }

    #[test]
    fn test_build_mime_body_round_trips() {
        let mime = build_mime("team@example.com", "subject", "【投稿者】tanaka");
        let encoded_body = mime.rsplit("\r\n\r\n").next().unwrap();

        let decoded = STANDARD.decode(encoded_body).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), "【投稿者】tanaka");
    }
}
