//! Notification composition and delivery
//!
//! Two independent paths that are never coordinated: the pipeline sends a
//! fixed-recipient email for each processed row, and a separately triggered
//! announcer posts a differently-formatted summary to the chat webhook.
//! Either may fire without the other depending on which trigger ran.

use crate::config::Config;
use crate::error::Result;
use crate::models::Submission;
use crate::services::chat_client::ChatWebhookClient;
use crate::services::gmail_client::GmailClient;
use crate::services::pipeline::entry_number;
use crate::services::row_reader::read_submission;
use crate::services::sheets_client::GoogleSheetsClient;

/// Tag summary for notifications: same [AFF]/[NEG] vocabulary as the
/// archive tag line, uncolored, one line per group.
pub fn notification_tag_lines(submission: &Submission) -> String {
    let mut text = String::new();

    if !submission.supporting_tags.is_empty() {
        text.push_str("[AFF]");
        for tag in &submission.supporting_tags {
            text.push('#');
            text.push_str(tag);
            text.push(' ');
        }
    }

    if !submission.supporting_tags.is_empty() && !submission.opposing_tags.is_empty() {
        text.push('\n');
    }

    if !submission.opposing_tags.is_empty() {
        text.push_str("[NEG]");
        for tag in &submission.opposing_tags {
            text.push('#');
            text.push_str(tag);
            text.push(' ');
        }
    }

    text
}

/// Attachment listing, one URL per line, or the localized "none".
pub fn attachment_section(attachments: &[String]) -> String {
    let mut text = String::from("\n添付ファイル：\n");
    if attachments.is_empty() {
        text.push_str("なし");
    } else {
        text.push_str(&attachments.join("\n"));
    }
    text
}

/// Email subject: the same heading line the archive uses.
pub fn email_subject(entry_number: u32, submission: &Submission) -> String {
    submission.heading(entry_number)
}

/// Email body: tag lines, fenced original quote, fenced translation,
/// optional remark, attachment listing, submitter/source footer.
pub fn email_body(submission: &Submission, translated_quote: &str) -> String {
    let remark = if submission.remark.is_empty() {
        String::new()
    } else {
        format!("\n※{}", submission.remark)
    };

    format!(
        "\n{}\n\n```{}```\n\n**English Translation:**\n```{}```{}{}\n\n【投稿者】{}\n【引用元】{}\n{}",
        notification_tag_lines(submission),
        submission.quote,
        translated_quote,
        remark,
        attachment_section(&submission.attachments),
        submission.submitter,
        submission.update_date,
        submission.source_url
    )
}

/// Chat summary: submitter, title, URL, source/date, quote, attachments,
/// remark. Deliberately a different layout from the email, and untranslated.
pub fn chat_summary(entry_number: u32, submission: &Submission) -> String {
    let mut text = format!(
        "【投稿者】{}\n{}. {}\n{}\n【引用元】{}: {}\n\n{}\n",
        submission.submitter,
        entry_number,
        submission.title,
        submission.source_url,
        submission.update_date,
        submission.source_label,
        submission.quote
    );

    text.push_str(&attachment_section(&submission.attachments));

    if !submission.remark.is_empty() {
        text.push_str(&format!("\n※{}", submission.remark));
    }

    text
}

/// Email path: fixed recipient, invoked by the pipeline.
pub struct EmailNotifier {
    gmail: GmailClient,
    recipient: String,
}

impl EmailNotifier {
    pub fn new(gmail: GmailClient, recipient: String) -> Self {
        Self { gmail, recipient }
    }

    pub async fn notify(
        &self,
        entry_number: u32,
        submission: &Submission,
        translated_quote: &str,
    ) -> Result<()> {
        let subject = email_subject(entry_number, submission);
        let body = email_body(submission, translated_quote);

        self.gmail.send(&self.recipient, &subject, &body).await?;

        tracing::info!(entry = entry_number, to = %self.recipient, "Notification mail sent");
        Ok(())
    }
}

/// Chat path: reads the row itself and posts the webhook summary. Runs off
/// its own trigger, never from the pipeline.
pub struct Announcer {
    sheets: GoogleSheetsClient,
    chat: ChatWebhookClient,
    spreadsheet_id: String,
    responses_sheet: String,
}

impl Announcer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            sheets: GoogleSheetsClient::new(config.google_token.clone())?,
            chat: ChatWebhookClient::new(config.webhook_url.clone())?,
            spreadsheet_id: config.spreadsheet_id.clone(),
            responses_sheet: config.responses_sheet.clone(),
        })
    }

    /// Post the chat announcement for one response row.
    pub async fn announce(&self, row: u32) -> Result<()> {
        let submission = read_submission(
            &self.sheets,
            &self.spreadsheet_id,
            &self.responses_sheet,
            row,
        )
        .await?;
        let entry = entry_number(row);

        let content = format!(
            "{}\n{}",
            submission.heading(entry),
            chat_summary(entry, &submission)
        );
        self.chat.post(&content).await?;

        tracing::info!(row = row, entry = entry, "Chat announcement posted");
        Ok(())
    }
}
