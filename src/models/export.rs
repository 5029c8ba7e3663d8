//! Structured export records for downstream search ingestion

use serde::{Deserialize, Serialize};

/// One archived submission in export form: original and translated text side
/// by side, plus source and processing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// "entry_<row>" where <row> is the response sheet row
    pub id: String,
    pub timestamp: String,
    pub submitter: String,
    pub title: BilingualText,
    pub quote: BilingualText,
    pub tags: TagSides,
    pub source: SourceRef,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilingualText {
    pub original: String,
    pub translated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagSides {
    pub affirmative: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub update_date: String,
    pub source_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub attachments: Vec<String>,
    pub remark: String,
    /// RFC 3339 local timestamp of export processing
    pub processed_at: String,
}
