//! Archive Writer: formats a submission into document blocks
//!
//! Each entry appends, in order: a page break, a heading, the colored tag
//! line, an optional small gray remark, one inline image per attachment,
//! and a single-cell table holding the source reference and the quote with
//! its translation. Blocks are expressed as Docs batchUpdate requests with
//! all offsets tracked in UTF-16 code units.
//!
//! The table cell is filled in a second batch: rather than hardcoding the
//! cell offset after InsertTable, the document is re-fetched and the last
//! table located, trading one extra GET for robustness.

use crate::error::{Error, Result};
use crate::models::Submission;
use crate::services::docs_client::{
    body_end_index, last_table_cell_index, utf16_len, GoogleDocsClient,
};
use crate::services::drive_client::{
    content_uri, extract_file_id, probe_dimensions, GoogleDriveClient,
};
use serde_json::{json, Value};

/// Longer image dimension is capped at this many pixels
pub const IMAGE_MAX_PX: u32 = 500;
/// Docs object sizes are given in points
const PX_TO_PT: f64 = 0.75;

const SUPPORTING_COLOR: (f64, f64, f64) = (0.8, 0.0, 0.0);
const OPPOSING_COLOR: (f64, f64, f64) = (0.0, 0.0, 0.8);
const REMARK_COLOR: (f64, f64, f64) = (0.4, 0.4, 0.4);
const REMARK_FONT_PT: f64 = 9.0;

/// Tag line text plus the UTF-16 spans to color, relative to line start.
#[derive(Debug, Clone, PartialEq)]
pub struct TagLine {
    pub text: String,
    pub supporting_span: Option<(u32, u32)>,
    pub opposing_span: Option<(u32, u32)>,
}

/// Build the tag line: submitter hashtag, then the [AFF] group, then the
/// [NEG] group. A group is omitted entirely when its tag list is empty.
pub fn build_tag_line(submission: &Submission) -> TagLine {
    let mut text = format!("#{}", submission.submitter);
    let mut supporting_span = None;
    let mut opposing_span = None;

    if !submission.supporting_tags.is_empty() {
        let start = utf16_len(&text) + 1; // past the separating space
        text.push_str(" [AFF]");
        for tag in &submission.supporting_tags {
            text.push_str(" #");
            text.push_str(tag);
        }
        supporting_span = Some((start, utf16_len(&text)));
    }

    if !submission.opposing_tags.is_empty() {
        let start = utf16_len(&text) + 1;
        text.push_str(" [NEG]");
        for tag in &submission.opposing_tags {
            text.push_str(" #");
            text.push_str(tag);
        }
        opposing_span = Some((start, utf16_len(&text)));
    }

    TagLine {
        text,
        supporting_span,
        opposing_span,
    }
}

/// Text of the entry's source/quote table cell.
pub fn source_cell_text(entry_number: u32, submission: &Submission, translated_quote: &str) -> String {
    format!(
        "[資料番号:{}] {}: {}\n{}\n\n【Original (Japanese)】\n{}\n\n【English Translation】\n{}",
        entry_number,
        submission.update_date,
        submission.source_label,
        submission.source_url,
        submission.quote,
        translated_quote
    )
}

/// Scale natural pixel dimensions so the longer side fits the cap,
/// preserving aspect ratio. Never returns a zero dimension.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    let longer = width.max(height);
    if longer <= IMAGE_MAX_PX {
        return (width, height);
    }
    if width >= height {
        let scaled = (u64::from(height) * u64::from(IMAGE_MAX_PX) / u64::from(width)).max(1);
        (IMAGE_MAX_PX, scaled as u32)
    } else {
        let scaled = (u64::from(width) * u64::from(IMAGE_MAX_PX) / u64::from(height)).max(1);
        (scaled as u32, IMAGE_MAX_PX)
    }
}

/// One attachment prepared for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct EntryImage {
    pub uri: String,
    /// (width, height) in points; None inserts at natural size
    pub size_pt: Option<(f64, f64)>,
}

/// Resolve attachments to insertable images: extract each file ID, download
/// the bytes to measure, and compute the capped display size.
///
/// An attachment whose URL carries no recognizable ID is skipped with a
/// warning; a download failure aborts. Unknown image dimensions fall back
/// to natural-size insertion.
pub async fn prepare_images(
    drive: &GoogleDriveClient,
    attachments: &[String],
) -> Result<Vec<EntryImage>> {
    let mut images = Vec::new();

    for url in attachments {
        let file_id = match extract_file_id(url) {
            Some(id) => id,
            None => {
                tracing::warn!(url = %url, "No file ID in attachment URL, skipping");
                continue;
            }
        };

        let bytes = drive.download(&file_id).await?;
        let size_pt = match probe_dimensions(&bytes) {
            Some((width, height)) => {
                let (scaled_width, scaled_height) = scaled_dimensions(width, height);
                Some((
                    f64::from(scaled_width) * PX_TO_PT,
                    f64::from(scaled_height) * PX_TO_PT,
                ))
            }
            None => {
                tracing::warn!(
                    file_id = %file_id,
                    "Unknown image dimensions, inserting at natural size"
                );
                None
            }
        };

        images.push(EntryImage {
            uri: content_uri(&file_id),
            size_pt,
        });
    }

    Ok(images)
}

/// Requests for the first batch: every block of the entry plus the empty
/// table shell, inserted forward from `insert_at`, followed by the styling
/// requests (whose ranges are stable once all inserts are listed).
pub fn build_entry_requests(
    insert_at: u32,
    entry_number: u32,
    submission: &Submission,
    images: &[EntryImage],
) -> Vec<Value> {
    let mut requests = Vec::new();
    let mut styles = Vec::new();
    let mut index = insert_at;

    // page break so each entry starts a fresh page
    requests.push(json!({ "insertPageBreak": { "location": { "index": index } } }));
    index += 2; // the page break element plus the newline it carries

    // heading paragraph
    let heading = format!("{}\n", submission.heading(entry_number));
    let heading_start = index;
    requests.push(insert_text(index, &heading));
    index += utf16_len(&heading);
    styles.push(json!({
        "updateParagraphStyle": {
            "range": { "startIndex": heading_start, "endIndex": index - 1 },
            "paragraphStyle": { "namedStyleType": "HEADING_2" },
            "fields": "namedStyleType"
        }
    }));

    // tag line with colored groups
    let tag_line = build_tag_line(submission);
    let tag_start = index;
    let tag_text = format!("{}\n", tag_line.text);
    requests.push(insert_text(index, &tag_text));
    index += utf16_len(&tag_text);
    if let Some((start, end)) = tag_line.supporting_span {
        styles.push(color_request(tag_start + start, tag_start + end, SUPPORTING_COLOR));
    }
    if let Some((start, end)) = tag_line.opposing_span {
        styles.push(color_request(tag_start + start, tag_start + end, OPPOSING_COLOR));
    }

    // small gray remark paragraph
    if !submission.remark.is_empty() {
        let remark_text = format!("{}\n", submission.remark);
        let remark_start = index;
        requests.push(insert_text(index, &remark_text));
        index += utf16_len(&remark_text);
        styles.push(json!({
            "updateTextStyle": {
                "range": {
                    "startIndex": remark_start,
                    "endIndex": remark_start + utf16_len(&submission.remark)
                },
                "textStyle": {
                    "foregroundColor": rgb_color(REMARK_COLOR),
                    "fontSize": { "magnitude": REMARK_FONT_PT, "unit": "PT" }
                },
                "fields": "foregroundColor,fontSize"
            }
        }));
    }

    // one inline image per attachment, each on its own line
    for image in images {
        requests.push(image_request(index, image));
        index += 1;
        requests.push(insert_text(index, "\n"));
        index += 1;
    }

    // table shell; the cell is filled by the second batch
    requests.push(json!({
        "insertTable": { "location": { "index": index }, "rows": 1, "columns": 1 }
    }));

    requests.extend(styles);
    requests
}

/// Requests for the second batch: the table cell content.
pub fn build_cell_requests(cell_start: u32, cell_text: &str) -> Vec<Value> {
    vec![insert_text(cell_start, cell_text)]
}

fn insert_text(index: u32, text: &str) -> Value {
    json!({ "insertText": { "location": { "index": index }, "text": text } })
}

fn rgb_color((red, green, blue): (f64, f64, f64)) -> Value {
    json!({ "color": { "rgbColor": { "red": red, "green": green, "blue": blue } } })
}

fn color_request(start: u32, end: u32, color: (f64, f64, f64)) -> Value {
    json!({
        "updateTextStyle": {
            "range": { "startIndex": start, "endIndex": end },
            "textStyle": { "foregroundColor": rgb_color(color) },
            "fields": "foregroundColor"
        }
    })
}

fn image_request(index: u32, image: &EntryImage) -> Value {
    match image.size_pt {
        Some((width_pt, height_pt)) => json!({
            "insertInlineImage": {
                "location": { "index": index },
                "uri": image.uri,
                "objectSize": {
                    "width": { "magnitude": width_pt, "unit": "PT" },
                    "height": { "magnitude": height_pt, "unit": "PT" }
                }
            }
        }),
        None => json!({
            "insertInlineImage": { "location": { "index": index }, "uri": image.uri }
        }),
    }
}

/// Append one complete entry to the archive document.
///
/// Mutates the shared document with no rollback: a fault partway through
/// can leave a partial record behind.
pub async fn append_entry(
    docs: &GoogleDocsClient,
    drive: &GoogleDriveClient,
    document_id: &str,
    entry_number: u32,
    submission: &Submission,
    translated_quote: &str,
) -> Result<()> {
    let images = prepare_images(drive, &submission.attachments).await?;

    let document = docs.get_document(document_id).await?;
    let insert_at = body_end_index(&document)
        .map(|end| end - 1)
        .ok_or_else(|| Error::Internal("Archive document body has no content".to_string()))?;

    let requests = build_entry_requests(insert_at, entry_number, submission, &images);
    docs.batch_update(document_id, requests).await?;

    let document = docs.get_document(document_id).await?;
    let cell_start = last_table_cell_index(&document).ok_or_else(|| {
        Error::Internal("Table cell not found after entry insert".to_string())
    })?;

    let cell_text = source_cell_text(entry_number, submission, translated_quote);
    docs.batch_update(document_id, build_cell_requests(cell_start, &cell_text))
        .await?;

    tracing::info!(entry = entry_number, images = images.len(), "Archived entry");

    Ok(())
}
