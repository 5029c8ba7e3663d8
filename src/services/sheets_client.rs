//! Google Sheets values API client
//!
//! Thin wrapper over the v4 values endpoints: ranged reads, single-cell
//! updates, and row appends. Values travel as formatted strings (the API
//! default), so callers parse counts themselves.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const USER_AGENT: &str = "evishare/0.1";

/// Sheets client errors
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Response body for values.get
#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Absent entirely when the range holds no values
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets API client
pub struct GoogleSheetsClient {
    http_client: reqwest::Client,
    token: String,
}

impl GoogleSheetsClient {
    pub fn new(token: String) -> Result<Self, SheetsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SheetsError::NetworkError(e.to_string()))?;

        Ok(Self { http_client, token })
    }

    /// Read a cell range as rows of strings.
    ///
    /// Trailing empty cells and trailing empty rows are trimmed by the API;
    /// an entirely empty range yields an empty vector.
    pub async fn get_values(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        cells: &str,
    ) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_BASE_URL,
            spreadsheet_id,
            a1_range(sheet, cells)
        );

        tracing::debug!(sheet = sheet, cells = cells, "Reading sheet values");

        let response = self
            .http_client
            .get(&url)
            .query(&[("majorDimension", "ROWS")])
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SheetsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetsError::ApiError(status.as_u16(), error_text));
        }

        let value_range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetsError::ParseError(e.to_string()))?;

        Ok(value_range.values)
    }

    /// Overwrite a single cell with a raw (uninterpreted) value.
    pub async fn update_cell(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        cell: &str,
        value: &str,
    ) -> Result<(), SheetsError> {
        let url = format!(
            "{}/{}/values/{}",
            SHEETS_BASE_URL,
            spreadsheet_id,
            a1_range(sheet, cell)
        );

        tracing::debug!(sheet = sheet, cell = cell, value = value, "Updating cell");

        let response = self
            .http_client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(&self.token)
            .json(&json!({ "values": [[value]] }))
            .send()
            .await
            .map_err(|e| SheetsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetsError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }

    /// Append one row after the sheet's existing table of data.
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        sheet: &str,
        cells: &[String],
    ) -> Result<(), SheetsError> {
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_BASE_URL,
            spreadsheet_id,
            quote_sheet(sheet)
        );

        tracing::debug!(sheet = sheet, "Appending row");

        let response = self
            .http_client
            .post(&url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.token)
            .json(&json!({ "values": [cells] }))
            .send()
            .await
            .map_err(|e| SheetsError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetsError::ApiError(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// A1 range for a sheet, with the sheet name quoted.
pub fn a1_range(sheet: &str, cells: &str) -> String {
    format!("{}!{}", quote_sheet(sheet), cells)
}

/// Single-quote a sheet name for A1 notation (embedded quotes doubled).
pub fn quote_sheet(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}
