//! evishare library interface
//!
//! Automates debate evidence intake: a form response lands in a
//! spreadsheet row, gets translated, archived into a shared document,
//! announced over email and chat, counted into frequency sheets, and
//! reflected back into the form's choice lists.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;

pub use crate::error::{Error, Result};
