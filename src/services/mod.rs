//! Service modules for the submission pipeline
//!
//! One client module per remote API, plus the processing stages that
//! compose them: row reading, translation, archive writing, notification,
//! frequency tracking, form refresh, and the orchestration layers.

pub mod archive_writer;
pub mod chat_client;
pub mod docs_client;
pub mod drive_client;
pub mod exporter;
pub mod form_refresher;
pub mod forms_client;
pub mod frequency;
pub mod gmail_client;
pub mod monitor;
pub mod notifier;
pub mod pipeline;
pub mod row_reader;
pub mod sheets_client;
pub mod translate_client;
pub mod translator;

pub use archive_writer::{EntryImage, TagLine};
pub use chat_client::{ChatWebhookClient, WebhookError};
pub use docs_client::{DocsError, GoogleDocsClient};
pub use drive_client::{DriveError, GoogleDriveClient};
pub use exporter::Exporter;
pub use forms_client::{FormsError, GoogleFormsClient};
pub use frequency::{FrequencyChange, FrequencyEntry, FrequencyTable};
pub use gmail_client::{GmailClient, GmailError};
pub use monitor::Monitor;
pub use notifier::{Announcer, EmailNotifier};
pub use pipeline::Pipeline;
pub use sheets_client::{GoogleSheetsClient, SheetsError};
pub use translate_client::{GoogleTranslateClient, TranslateError};
pub use translator::{TranslationApi, Translator};
