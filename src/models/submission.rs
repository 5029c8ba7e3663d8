//! Typed form submission record

use serde::{Deserialize, Serialize};

/// One response row, parsed into named fields.
///
/// Column order in the response sheet: timestamp, submitter, title,
/// supporting tags, opposing tags, source URL, update date, source label,
/// quote, attachments, remark (columns A through K).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub timestamp: String,
    pub submitter: String,
    pub title: String,
    pub supporting_tags: Vec<String>,
    pub opposing_tags: Vec<String>,
    pub source_url: String,
    pub update_date: String,
    pub source_label: String,
    pub quote: String,
    pub attachments: Vec<String>,
    pub remark: String,
}

impl Submission {
    /// Build a submission from raw row cells.
    ///
    /// Missing trailing cells are treated as empty strings (the spreadsheet
    /// API trims trailing empties from returned rows). No type validation.
    pub fn from_row(cells: &[String]) -> Self {
        let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();

        Self {
            timestamp: cell(0),
            submitter: cell(1),
            title: cell(2),
            supporting_tags: split_list(&cell(3)),
            opposing_tags: split_list(&cell(4)),
            source_url: cell(5),
            update_date: cell(6),
            source_label: cell(7),
            quote: cell(8),
            attachments: split_list(&cell(9)),
            remark: cell(10),
        }
    }

    /// Heading line shared by the archive and the email subject.
    pub fn heading(&self, entry_number: u32) -> String {
        format!("{}. {} ({})", entry_number, self.title, self.submitter)
    }
}

/// Split a comma-and-space delimited cell into its values.
///
/// The empty string means "none", not a single empty value.
pub fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(", ").map(str::to_string).collect()
}

/// Inverse of [`split_list`] for non-empty inputs.
pub fn join_list(values: &[String]) -> String {
    values.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_split_list_round_trips() {
        let inputs = ["Equality, Quality Education", "Economy", "a, b, c"];
        for input in inputs {
            assert_eq!(join_list(&split_list(input)), input);
        }
    }

    #[test]
    fn test_split_list_empty_means_none() {
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_from_row_parses_all_columns() {
        let cells = row(&[
            "2024/05/01 12:00:00",
            "tanaka",
            "Renewable subsidies",
            "Equality, Quality Education",
            "Economy",
            "https://example.com/article",
            "2024/04/30",
            "Example Times",
            "引用本文",
            "https://drive.google.com/open?id=abcdefghijklmnopqrstuvwxy1234",
            "要確認",
        ]);
        let submission = Submission::from_row(&cells);

        assert_eq!(submission.submitter, "tanaka");
        assert_eq!(
            submission.supporting_tags,
            vec!["Equality".to_string(), "Quality Education".to_string()]
        );
        assert_eq!(submission.opposing_tags, vec!["Economy".to_string()]);
        assert_eq!(submission.attachments.len(), 1);
        assert_eq!(submission.remark, "要確認");
    }

    #[test]
    fn test_from_row_missing_trailing_cells() {
        let cells = row(&["t", "sub", "title"]);
        let submission = Submission::from_row(&cells);

        assert_eq!(submission.title, "title");
        assert!(submission.supporting_tags.is_empty());
        assert!(submission.opposing_tags.is_empty());
        assert!(submission.attachments.is_empty());
        assert_eq!(submission.remark, "");
    }

    #[test]
    fn test_heading_format() {
        let mut submission = Submission::from_row(&row(&[]));
        submission.title = "Renewable subsidies".to_string();
        submission.submitter = "tanaka".to_string();

        assert_eq!(submission.heading(7), "7. Renewable subsidies (tanaka)");
    }
}
