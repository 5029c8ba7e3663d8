//! Orchestrator: fixed-order processing of one submission row
//!
//! Row to record, archive append, email notification, frequency tracking
//! for the submitter and both tag categories, then form refresh. There is
//! no transactionality: a fault partway through leaves the earlier side
//! effects applied, and nothing is retried or compensated.

use crate::config::{resolve_locations, Config, Locations};
use crate::error::{Error, Result};
use crate::services::archive_writer::append_entry;
use crate::services::docs_client::GoogleDocsClient;
use crate::services::drive_client::GoogleDriveClient;
use crate::services::form_refresher::refresh_form;
use crate::services::forms_client::GoogleFormsClient;
use crate::services::frequency::FrequencyTable;
use crate::services::gmail_client::GmailClient;
use crate::services::notifier::EmailNotifier;
use crate::services::row_reader::read_submission;
use crate::services::sheets_client::GoogleSheetsClient;
use crate::services::translate_client::GoogleTranslateClient;
use crate::services::translator::Translator;

/// Archive entry number for a response row: rows 1-2 are header/prior
/// content, so the first data row (3) is entry 1.
pub fn entry_number(row: u32) -> u32 {
    row - 2
}

/// The processing pipeline with its resolved runtime context.
pub struct Pipeline {
    sheets: GoogleSheetsClient,
    docs: GoogleDocsClient,
    drive: GoogleDriveClient,
    forms: GoogleFormsClient,
    translator: Translator<GoogleTranslateClient>,
    email: EmailNotifier,
    spreadsheet_id: String,
    responses_sheet: String,
    locations: Locations,
}

impl Pipeline {
    /// Build all clients and resolve the runtime locations.
    pub async fn connect(config: &Config) -> Result<Self> {
        let sheets = GoogleSheetsClient::new(config.google_token.clone())?;
        let locations = resolve_locations(&sheets, config).await?;

        let translate = GoogleTranslateClient::new(config.google_token.clone())
            .map_err(|e| Error::Internal(format!("Failed to build translate client: {}", e)))?;
        let translator = Translator::new(
            translate,
            config.source_lang.clone(),
            config.target_lang.clone(),
        );
        let email = EmailNotifier::new(
            GmailClient::new(config.google_token.clone())?,
            config.notify_email.clone(),
        );

        Ok(Self {
            sheets,
            docs: GoogleDocsClient::new(config.google_token.clone())?,
            drive: GoogleDriveClient::new(config.google_token.clone())?,
            forms: GoogleFormsClient::new(config.google_token.clone())?,
            translator,
            email,
            spreadsheet_id: config.spreadsheet_id.clone(),
            responses_sheet: config.responses_sheet.clone(),
            locations,
        })
    }

    /// Process one response row end to end.
    pub async fn process(&self, row: u32) -> Result<()> {
        let submission = read_submission(
            &self.sheets,
            &self.spreadsheet_id,
            &self.responses_sheet,
            row,
        )
        .await?;
        let entry = entry_number(row);

        tracing::info!(row = row, entry = entry, title = %submission.title, "Processing submission");

        // translate once; archive and email share the result
        let translated_quote = self.translator.translate(&submission.quote).await;

        append_entry(
            &self.docs,
            &self.drive,
            &self.locations.archive_document_id,
            entry,
            &submission,
            &translated_quote,
        )
        .await?;

        self.email.notify(entry, &submission, &translated_quote).await?;

        // frequency passes: submitter, then each tag per category
        let mut submitters = self.load_table(&self.locations.submitters_sheet).await?;
        submitters
            .record_and_apply(&self.sheets, &self.spreadsheet_id, &submission.submitter)
            .await?;

        let mut supporting = self.load_table(&self.locations.supporting_tags_sheet).await?;
        for tag in &submission.supporting_tags {
            supporting
                .record_and_apply(&self.sheets, &self.spreadsheet_id, tag)
                .await?;
        }

        let mut opposing = self.load_table(&self.locations.opposing_tags_sheet).await?;
        for tag in &submission.opposing_tags {
            opposing
                .record_and_apply(&self.sheets, &self.spreadsheet_id, tag)
                .await?;
        }

        refresh_form(&self.forms, &self.locations, &submitters, &supporting, &opposing).await?;

        tracing::info!(row = row, entry = entry, "Submission processed");
        Ok(())
    }

    /// Run the form refresh alone, from the tables as they stand.
    pub async fn refresh_form_only(&self) -> Result<()> {
        let submitters = self.load_table(&self.locations.submitters_sheet).await?;
        let supporting = self.load_table(&self.locations.supporting_tags_sheet).await?;
        let opposing = self.load_table(&self.locations.opposing_tags_sheet).await?;

        refresh_form(&self.forms, &self.locations, &submitters, &supporting, &opposing).await
    }

    async fn load_table(&self, sheet: &str) -> Result<FrequencyTable> {
        Ok(FrequencyTable::load(&self.sheets, &self.spreadsheet_id, sheet).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_number_offset() {
        assert_eq!(entry_number(3), 1);
        assert_eq!(entry_number(10), 8);
    }
}
