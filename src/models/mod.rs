//! Data models for the submission pipeline

pub mod export;
pub mod submission;

pub use export::{BilingualText, ExportEntry, ExportMetadata, SourceRef, TagSides};
pub use submission::{join_list, split_list, Submission};
