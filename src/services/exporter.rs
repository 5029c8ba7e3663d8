//! Bulk export of archived submissions as structured JSON
//!
//! Reads the response sheet in one call and emits one [`ExportEntry`] per
//! data row, with original and translated text side by side. Translation
//! degrades per field exactly as it does in the live pipeline.

use crate::config::Config;
use crate::error::Result;
use crate::models::{BilingualText, ExportEntry, ExportMetadata, SourceRef, Submission, TagSides};
use crate::services::row_reader::FIRST_DATA_ROW;
use crate::services::sheets_client::GoogleSheetsClient;
use crate::services::translate_client::GoogleTranslateClient;
use crate::services::translator::Translator;
use std::path::Path;

pub struct Exporter {
    sheets: GoogleSheetsClient,
    translator: Translator<GoogleTranslateClient>,
    spreadsheet_id: String,
    responses_sheet: String,
}

/// Assemble the export record for one data row.
fn build_entry(
    row: u32,
    submission: &Submission,
    title_translated: String,
    quote_translated: String,
    processed_at: String,
) -> ExportEntry {
    ExportEntry {
        id: format!("entry_{}", row),
        timestamp: submission.timestamp.clone(),
        submitter: submission.submitter.clone(),
        title: BilingualText {
            original: submission.title.clone(),
            translated: title_translated,
        },
        quote: BilingualText {
            original: submission.quote.clone(),
            translated: quote_translated,
        },
        tags: TagSides {
            affirmative: submission.supporting_tags.clone(),
            negative: submission.opposing_tags.clone(),
        },
        source: SourceRef {
            url: submission.source_url.clone(),
            update_date: submission.update_date.clone(),
            source_label: submission.source_label.clone(),
        },
        metadata: ExportMetadata {
            attachments: submission.attachments.clone(),
            remark: submission.remark.clone(),
            processed_at,
        },
    }
}

impl Exporter {
    pub fn connect(config: &Config) -> Result<Self> {
        let translate = GoogleTranslateClient::new(config.google_token.clone()).map_err(|e| {
            crate::error::Error::Internal(format!("Failed to build translate client: {}", e))
        })?;

        Ok(Self {
            sheets: GoogleSheetsClient::new(config.google_token.clone())?,
            translator: Translator::new(
                translate,
                config.source_lang.clone(),
                config.target_lang.clone(),
            ),
            spreadsheet_id: config.spreadsheet_id.clone(),
            responses_sheet: config.responses_sheet.clone(),
        })
    }

    /// Export data rows, optionally restricted to an inclusive row range.
    /// Empty rows inside the range are skipped.
    pub async fn export_range(
        &self,
        from: Option<u32>,
        to: Option<u32>,
    ) -> Result<Vec<ExportEntry>> {
        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, &self.responses_sheet, "A:K")
            .await?;
        let last_row = rows.len() as u32;

        let first = from.unwrap_or(FIRST_DATA_ROW).max(FIRST_DATA_ROW);
        let last = to.unwrap_or(last_row).min(last_row);

        let mut entries = Vec::new();
        for row in first..=last {
            let cells = &rows[(row - 1) as usize];
            if cells.iter().all(|c| c.is_empty()) {
                tracing::debug!(row = row, "Skipping empty row");
                continue;
            }

            let submission = Submission::from_row(cells);
            let title_translated = self.translator.translate(&submission.title).await;
            let quote_translated = self.translator.translate(&submission.quote).await;

            entries.push(build_entry(
                row,
                &submission,
                title_translated,
                quote_translated,
                chrono::Local::now().to_rfc3339(),
            ));
        }

        tracing::info!(count = entries.len(), "Export assembled");
        Ok(entries)
    }

    /// Export to a pretty-printed JSON file. Returns the entry count.
    pub async fn export_to_file(
        &self,
        path: &Path,
        from: Option<u32>,
        to: Option<u32>,
    ) -> Result<usize> {
        let entries = self.export_range(from, to).await?;
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, json)?;

        tracing::info!(count = entries.len(), path = %path.display(), "Export written");
        Ok(entries.len())
    }
}
