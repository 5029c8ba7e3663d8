//! Frequency tables backing the form choice lists
//!
//! Each table mirrors one sheet: a header row, then (name, count) rows.
//! The table is loaded once per invocation into an ordered list plus a
//! name-to-index map; recording an occurrence mutates memory and yields the
//! targeted change the caller applies to the sheet. Counts only grow and
//! rows are only appended, never removed.

use crate::services::sheets_client::{GoogleSheetsClient, SheetsError};
use std::collections::HashMap;

/// Header rows above the first entry in a frequency sheet
const HEADER_ROWS: u32 = 1;

/// One (name, count) pair
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyEntry {
    pub name: String,
    pub count: u32,
}

/// A pending sheet mutation produced by [`FrequencyTable::record`].
/// Rows are 1-based sheet rows.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyChange {
    /// Overwrite the count cell of an existing row
    Increment { row: u32, count: u32 },
    /// Append a fresh (name, 1) row
    Append { name: String },
}

/// In-memory view of one frequency sheet
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    sheet: String,
    entries: Vec<FrequencyEntry>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Build from sheet rows (header row already excluded). Entry i mirrors
    /// sheet row i + 2. On a duplicate name the first row wins; later
    /// duplicates stay in the list to keep row numbering aligned but are
    /// never matched.
    pub fn from_rows(sheet: &str, rows: &[Vec<String>]) -> Self {
        let mut table = Self {
            sheet: sheet.to_string(),
            entries: Vec::new(),
            index: HashMap::new(),
        };

        for cells in rows {
            let name = match cells.first() {
                Some(name) if !name.is_empty() => name.clone(),
                _ => {
                    // blank row: keep the slot so row arithmetic stays true
                    table.entries.push(FrequencyEntry {
                        name: String::new(),
                        count: 0,
                    });
                    continue;
                }
            };
            let count = cells
                .get(1)
                .and_then(|c| c.trim().parse().ok())
                .unwrap_or(0);

            if !table.index.contains_key(&name) {
                table.index.insert(name.clone(), table.entries.len());
            }
            table.entries.push(FrequencyEntry { name, count });
        }

        table
    }

    /// Load a table from its sheet.
    pub async fn load(
        sheets: &GoogleSheetsClient,
        spreadsheet_id: &str,
        sheet: &str,
    ) -> Result<Self, SheetsError> {
        let rows = sheets.get_values(spreadsheet_id, sheet, "A2:B").await?;
        Ok(Self::from_rows(sheet, &rows))
    }

    /// Count one occurrence of `name`. Returns the sheet change the caller
    /// must apply to keep the sheet in sync.
    pub fn record(&mut self, name: &str) -> FrequencyChange {
        match self.index.get(name) {
            Some(&i) => {
                self.entries[i].count += 1;
                FrequencyChange::Increment {
                    row: i as u32 + HEADER_ROWS + 1,
                    count: self.entries[i].count,
                }
            }
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(FrequencyEntry {
                    name: name.to_string(),
                    count: 1,
                });
                FrequencyChange::Append {
                    name: name.to_string(),
                }
            }
        }
    }

    /// Apply a recorded change to the backing sheet.
    pub async fn apply_change(
        &self,
        sheets: &GoogleSheetsClient,
        spreadsheet_id: &str,
        change: &FrequencyChange,
    ) -> Result<(), SheetsError> {
        match change {
            FrequencyChange::Increment { row, count } => {
                sheets
                    .update_cell(
                        spreadsheet_id,
                        &self.sheet,
                        &count_cell(*row),
                        &count.to_string(),
                    )
                    .await
            }
            FrequencyChange::Append { name } => {
                sheets
                    .append_row(
                        spreadsheet_id,
                        &self.sheet,
                        &[name.clone(), "1".to_string()],
                    )
                    .await
            }
        }
    }

    /// Record an occurrence and immediately sync the sheet.
    pub async fn record_and_apply(
        &mut self,
        sheets: &GoogleSheetsClient,
        spreadsheet_id: &str,
        name: &str,
    ) -> Result<(), SheetsError> {
        let change = self.record(name);
        self.apply_change(sheets, spreadsheet_id, &change).await
    }

    /// Entry names in sheet order, shadowed duplicates and blank slots
    /// excluded. This is the choice list the form refresh consumes.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, entry)| self.index.get(&entry.name) == Some(i))
            .map(|(_, entry)| entry.name.clone())
            .collect()
    }

    /// Current count for a name, if present.
    pub fn count(&self, name: &str) -> Option<u32> {
        self.index.get(name).map(|&i| self.entries[i].count)
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A1 cell holding the count for a given entry row.
pub fn count_cell(row: u32) -> String {
    format!("B{}", row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(pairs: &[(&str, &str)]) -> Vec<Vec<String>> {
        pairs
            .iter()
            .map(|(name, count)| vec![name.to_string(), count.to_string()])
            .collect()
    }

    #[test]
    fn test_new_name_appends_then_increments() {
        let mut table = FrequencyTable::from_rows("names", &[]);

        let first = table.record("tanaka");
        assert_eq!(
            first,
            FrequencyChange::Append {
                name: "tanaka".to_string()
            }
        );

        let second = table.record("tanaka");
        assert_eq!(second, FrequencyChange::Increment { row: 2, count: 2 });
        assert_eq!(table.count("tanaka"), Some(2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_existing_entry_increments_without_duplicate_row() {
        let mut table = FrequencyTable::from_rows("tags", &rows(&[("Equality", "4")]));

        let change = table.record("Equality");

        assert_eq!(change, FrequencyChange::Increment { row: 2, count: 5 });
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_increment_row_accounts_for_header() {
        let mut table =
            FrequencyTable::from_rows("tags", &rows(&[("a", "1"), ("b", "2"), ("c", "3")]));

        // entry index 2 lives at sheet row 4 (one header row, 1-based rows)
        let change = table.record("c");
        assert_eq!(change, FrequencyChange::Increment { row: 4, count: 4 });
    }

    #[test]
    fn test_duplicate_sheet_rows_first_match_wins() {
        let mut table =
            FrequencyTable::from_rows("names", &rows(&[("sato", "3"), ("sato", "9")]));

        let change = table.record("sato");

        assert_eq!(change, FrequencyChange::Increment { row: 2, count: 4 });
        // the shadowed row is untouched and excluded from the choice list
        assert_eq!(table.names(), vec!["sato".to_string()]);
    }

    #[test]
    fn test_blank_row_keeps_row_alignment() {
        let raw = vec![
            vec!["a".to_string(), "1".to_string()],
            vec![],
            vec!["b".to_string(), "2".to_string()],
        ];
        let mut table = FrequencyTable::from_rows("tags", &raw);

        let change = table.record("b");
        assert_eq!(change, FrequencyChange::Increment { row: 4, count: 3 });
        assert_eq!(table.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_unparseable_count_treated_as_zero() {
        let mut table = FrequencyTable::from_rows("tags", &rows(&[("x", "n/a")]));

        let change = table.record("x");
        assert_eq!(change, FrequencyChange::Increment { row: 2, count: 1 });
    }

    #[test]
    fn test_count_cell_targets_column_b() {
        assert_eq!(count_cell(4), "B4");
    }

    #[test]
    fn test_names_in_sheet_order() {
        let table =
            FrequencyTable::from_rows("tags", &rows(&[("c", "1"), ("a", "5"), ("b", "2")]));

        assert_eq!(
            table.names(),
            vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }
}
