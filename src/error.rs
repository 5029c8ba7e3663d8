//! Error types for the submission pipeline

use thiserror::Error;

use crate::services::chat_client::WebhookError;
use crate::services::docs_client::DocsError;
use crate::services::drive_client::DriveError;
use crate::services::forms_client::FormsError;
use crate::services::gmail_client::GmailError;
use crate::services::sheets_client::SheetsError;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by pipeline components.
///
/// Translation faults are absent by design: the translator recovers from
/// them locally and they never reach callers. Every other external fault
/// aborts the invocation that raised it.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Spreadsheet access error
    #[error("Sheets error: {0}")]
    Sheets(#[from] SheetsError),

    /// Archive document access error
    #[error("Docs error: {0}")]
    Docs(#[from] DocsError),

    /// File store access error
    #[error("Drive error: {0}")]
    Drive(#[from] DriveError),

    /// Mail delivery error
    #[error("Gmail error: {0}")]
    Gmail(#[from] GmailError),

    /// Form update error
    #[error("Forms error: {0}")]
    Forms(#[from] FormsError),

    /// Chat webhook delivery error
    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),
}
