//! Row Reader: one response sheet row to a typed Submission

use crate::error::{Error, Result};
use crate::models::Submission;
use crate::services::sheets_client::GoogleSheetsClient;

/// First row holding a submission; rows 1-2 are header/prior content.
pub const FIRST_DATA_ROW: u32 = 3;

/// Read one response row and assemble the submission record.
///
/// Rows below [`FIRST_DATA_ROW`] are rejected before any network call; a row
/// past the data range surfaces as NotFound.
pub async fn read_submission(
    sheets: &GoogleSheetsClient,
    spreadsheet_id: &str,
    sheet: &str,
    row: u32,
) -> Result<Submission> {
    if row < FIRST_DATA_ROW {
        return Err(Error::InvalidInput(format!(
            "Row {} is header content; data rows start at {}",
            row, FIRST_DATA_ROW
        )));
    }

    let cells = format!("A{}:K{}", row, row);
    let rows = sheets.get_values(spreadsheet_id, sheet, &cells).await?;

    let row_cells = rows
        .into_iter()
        .next()
        .filter(|cells| !cells.is_empty())
        .ok_or_else(|| Error::NotFound(format!("No response at row {}", row)))?;

    Ok(Submission::from_row(&row_cells))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_header_rows_rejected_without_network() {
        // bogus token: the guard must fire before any request is attempted
        let sheets = GoogleSheetsClient::new("unused".to_string()).unwrap();
        let result = read_submission(&sheets, "sheet-id", "Responses", 2).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
