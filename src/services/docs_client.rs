//! Google Docs API client
//!
//! Fetches the archive document structure and applies batchUpdate request
//! lists. All index arithmetic for the requests happens in UTF-16 code
//! units, which is the unit the Docs API counts in.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1/documents";
const USER_AGENT: &str = "evishare/0.1";

/// Docs client errors
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Google Docs API client
pub struct GoogleDocsClient {
    http_client: reqwest::Client,
    token: String,
}

impl GoogleDocsClient {
    pub fn new(token: String) -> Result<Self, DocsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DocsError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Fetch the document as raw JSON structure.
    pub async fn get_document(&self, document_id: &str) -> Result<Value, DocsError> {
        let url = format!("{}/{}", DOCS_BASE_URL, document_id);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| DocsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocsError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| DocsError::ParseError(e.to_string()))
    }

    /// Apply a batchUpdate request list. No-op for an empty list.
    pub async fn batch_update(
        &self,
        document_id: &str,
        requests: Vec<Value>,
    ) -> Result<(), DocsError> {
        if requests.is_empty() {
            return Ok(());
        }

        let url = format!("{}/{}:batchUpdate", DOCS_BASE_URL, document_id);

        tracing::debug!(
            document_id = document_id,
            requests = requests.len(),
            "Applying document batch update"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "requests": requests }))
            .send()
            .await
            .map_err(|e| DocsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DocsError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// End index of the document body. Appends insert at this index minus one
/// (nothing may be inserted after the final newline).
pub fn body_end_index(document: &Value) -> Option<u32> {
    document
        .get("body")?
        .get("content")?
        .as_array()?
        .last()?
        .get("endIndex")?
        .as_u64()
        .map(|v| v as u32)
}

/// Start index of the first paragraph inside the first cell of the LAST
/// table in the document body. Used to fill a freshly inserted table.
pub fn last_table_cell_index(document: &Value) -> Option<u32> {
    let content = document.get("body")?.get("content")?.as_array()?;
    let table_element = content.iter().rev().find(|el| el.get("table").is_some())?;
    table_element
        .get("table")?
        .get("tableRows")?
        .as_array()?
        .first()?
        .get("tableCells")?
        .as_array()?
        .first()?
        .get("content")?
        .as_array()?
        .first()?
        .get("startIndex")?
        .as_u64()
        .map(|v| v as u32)
}

/// Length of a string in UTF-16 code units (the Docs index unit).
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf16_len_ascii() {
        assert_eq!(utf16_len("hello"), 5);
    }

    #[test]
    fn test_utf16_len_japanese() {
        // BMP characters count one unit each
        assert_eq!(utf16_len("資料番号"), 4);
    }

    #[test]
    fn test_utf16_len_supplementary_plane() {
        // characters outside the BMP count two units
        assert_eq!(utf16_len("𝄞"), 2);
    }

    #[test]
    fn test_body_end_index() {
        let document = json!({
            "body": { "content": [
                { "endIndex": 1 },
                { "startIndex": 1, "endIndex": 42 }
            ]}
        });
        assert_eq!(body_end_index(&document), Some(42));
    }

    #[test]
    fn test_last_table_cell_index_picks_last_table() {
        let cell = |start: u32| {
            json!({ "tableRows": [ { "tableCells": [ { "content": [
                { "startIndex": start, "endIndex": start + 1 }
            ]}]}]})
        };
        let document = json!({
            "body": { "content": [
                { "endIndex": 1 },
                { "startIndex": 1, "endIndex": 10, "table": cell(3) },
                { "startIndex": 10, "endIndex": 20, "paragraph": {} },
                { "startIndex": 20, "endIndex": 30, "table": cell(23) }
            ]}
        });
        assert_eq!(last_table_cell_index(&document), Some(23));
    }

    #[test]
    fn test_last_table_cell_index_without_tables() {
        let document = json!({ "body": { "content": [ { "endIndex": 5 } ] } });
        assert_eq!(last_table_cell_index(&document), None);
    }
}
