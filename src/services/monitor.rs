//! Polling monitor over the response sheet
//!
//! Each pass compares the sheet's row count against the persisted cursor
//! and handles every new row: pipeline processing first, then the chat
//! announcement, as two separate uncoordinated invocations. Per-row
//! failures are logged and skipped, never retried; the cursor advances to
//! the row count regardless.

use crate::config::Config;
use crate::error::Result;
use crate::services::notifier::Announcer;
use crate::services::pipeline::Pipeline;
use crate::services::row_reader::FIRST_DATA_ROW;
use crate::services::sheets_client::GoogleSheetsClient;
use crate::state::WatchState;
use std::path::PathBuf;
use std::time::Duration;

pub struct Monitor {
    pipeline: Pipeline,
    announcer: Announcer,
    sheets: GoogleSheetsClient,
    spreadsheet_id: String,
    responses_sheet: String,
    state_dir: PathBuf,
    interval: Duration,
}

/// Rows a pass must handle given the cursor and the current row count.
/// Empty when nothing new arrived.
pub fn rows_to_process(last_processed_row: u32, row_count: u32) -> std::ops::RangeInclusive<u32> {
    let first = (last_processed_row + 1).max(FIRST_DATA_ROW);
    first..=row_count
}

impl Monitor {
    pub async fn connect(
        config: &Config,
        state_dir: PathBuf,
        interval_secs: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::connect(config).await?,
            announcer: Announcer::new(config)?,
            sheets: GoogleSheetsClient::new(config.google_token.clone())?,
            spreadsheet_id: config.spreadsheet_id.clone(),
            responses_sheet: config.responses_sheet.clone(),
            state_dir,
            interval: Duration::from_secs(interval_secs.unwrap_or(config.poll_interval_secs)),
        })
    }

    /// One pass: handle all rows past the cursor, then advance and persist
    /// it. Returns how many rows were handled.
    pub async fn run_once(&self) -> Result<u32> {
        let mut state = WatchState::load(&self.state_dir)?;

        let rows = self
            .sheets
            .get_values(&self.spreadsheet_id, &self.responses_sheet, "A:A")
            .await?;
        let row_count = rows.len() as u32;

        let range = rows_to_process(state.last_processed_row, row_count);
        if range.is_empty() {
            tracing::debug!(row_count = row_count, "No new responses");
            return Ok(0);
        }

        let mut handled = 0;
        for row in range {
            if let Err(e) = self.pipeline.process(row).await {
                tracing::error!(row = row, error = %e, "Submission processing failed");
            }
            if let Err(e) = self.announcer.announce(row).await {
                tracing::error!(row = row, error = %e, "Chat announcement failed");
            }
            handled += 1;
        }

        state.last_processed_row = row_count;
        state.save(&self.state_dir)?;

        tracing::info!(handled = handled, cursor = row_count, "Monitor pass complete");
        Ok(handled)
    }

    /// Poll forever. Pass failures are logged and the loop keeps going.
    pub async fn run(&self) -> Result<()> {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            sheet = %self.responses_sheet,
            "Starting response sheet monitor"
        );

        loop {
            if let Err(e) = self.run_once().await {
                tracing::error!(error = %e, "Monitor pass failed");
            }
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_to_process_from_fresh_cursor() {
        // default cursor 2 with five sheet rows: data rows 3..=5
        let range = rows_to_process(2, 5);
        assert_eq!(range.collect::<Vec<_>>(), vec![3, 4, 5]);
    }

    #[test]
    fn test_rows_to_process_nothing_new() {
        assert!(rows_to_process(5, 5).is_empty());
        assert!(rows_to_process(7, 5).is_empty());
    }

    #[test]
    fn test_rows_to_process_skips_header_rows() {
        // a zeroed cursor must not reach into the header rows
        let range = rows_to_process(0, 4);
        assert_eq!(range.collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_rows_to_process_resumes_after_cursor() {
        let range = rows_to_process(6, 8);
        assert_eq!(range.collect::<Vec<_>>(), vec![7, 8]);
    }
}
