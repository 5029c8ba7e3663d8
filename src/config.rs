//! Configuration loading and runtime location resolution
//!
//! Two layers of configuration exist. The TOML file (plus environment
//! overrides for secrets) holds what the operator controls: spreadsheet ID,
//! sheet names, recipient address, webhook URL, token, languages. The
//! document ID, form ID, frequency sheet names, and form item IDs live in
//! fixed cells of a lookup sheet inside the spreadsheet itself, so they can
//! be swapped without redeploying.

use crate::error::{Error, Result};
use crate::services::sheets_client::GoogleSheetsClient;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file path
pub const ENV_CONFIG: &str = "EVISHARE_CONFIG";
/// Environment variable carrying the Google OAuth bearer token
pub const ENV_GOOGLE_TOKEN: &str = "EVISHARE_GOOGLE_TOKEN";
/// Environment variable overriding the chat webhook URL
pub const ENV_WEBHOOK_URL: &str = "EVISHARE_WEBHOOK_URL";
/// Environment variable overriding the state directory
pub const ENV_STATE_DIR: &str = "EVISHARE_STATE_DIR";

const DEFAULT_RESPONSES_SHEET: &str = "Responses";
const DEFAULT_LOCATIONS_SHEET: &str = "locations";
const DEFAULT_SOURCE_LANG: &str = "ja";
const DEFAULT_TARGET_LANG: &str = "en";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Raw TOML file shape
#[derive(Debug, Deserialize)]
struct FileConfig {
    spreadsheet_id: String,
    responses_sheet: Option<String>,
    locations_sheet: Option<String>,
    notify_email: String,
    webhook_url: Option<String>,
    google_token: Option<String>,
    source_lang: Option<String>,
    target_lang: Option<String>,
    poll_interval_secs: Option<u64>,
    state_dir: Option<PathBuf>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_id: String,
    pub responses_sheet: String,
    pub locations_sheet: String,
    pub notify_email: String,
    pub webhook_url: String,
    pub google_token: String,
    pub source_lang: String,
    pub target_lang: String,
    pub poll_interval_secs: u64,
    pub state_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration following the priority order:
    /// 1. Command-line `--config` path
    /// 2. `EVISHARE_CONFIG` environment variable
    /// 3. `<config_dir>/evishare/evishare.toml`
    ///
    /// Secrets may arrive from the environment instead of the file;
    /// environment values win when both are present.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(cli_path)?;
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        tracing::info!("Loaded configuration from {}", path.display());

        let google_token = resolve_secret(ENV_GOOGLE_TOKEN, file.google_token, "google_token")?;
        let webhook_url = resolve_secret(ENV_WEBHOOK_URL, file.webhook_url, "webhook_url")?;

        Ok(Self {
            spreadsheet_id: file.spreadsheet_id,
            responses_sheet: file
                .responses_sheet
                .unwrap_or_else(|| DEFAULT_RESPONSES_SHEET.to_string()),
            locations_sheet: file
                .locations_sheet
                .unwrap_or_else(|| DEFAULT_LOCATIONS_SHEET.to_string()),
            notify_email: file.notify_email,
            webhook_url,
            google_token,
            source_lang: file
                .source_lang
                .unwrap_or_else(|| DEFAULT_SOURCE_LANG.to_string()),
            target_lang: file
                .target_lang
                .unwrap_or_else(|| DEFAULT_TARGET_LANG.to_string()),
            poll_interval_secs: file.poll_interval_secs.unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
            state_dir: file.state_dir,
        })
    }
}

/// Resolve the config file path (CLI, then env, then platform default).
fn resolve_config_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = cli_path {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(ENV_CONFIG) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let default = dirs::config_dir()
        .map(|d| d.join("evishare").join("evishare.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    if default.exists() {
        Ok(default)
    } else {
        Err(Error::Config(format!(
            "No config file found (looked for {}); pass --config or set {}",
            default.display(),
            ENV_CONFIG
        )))
    }
}

/// A value that may come from the environment or the config file, with the
/// environment winning (and a notice logged) when both are set.
fn resolve_secret(env_var: &str, file_value: Option<String>, key: &str) -> Result<String> {
    let env_value = std::env::var(env_var).ok().filter(|v| !v.is_empty());

    match (env_value, file_value) {
        (Some(value), Some(_)) => {
            tracing::info!("Using {} from {} (overrides config file)", key, env_var);
            Ok(value)
        }
        (Some(value), None) => Ok(value),
        (None, Some(value)) => Ok(value),
        (None, None) => Err(Error::Config(format!(
            "{} not set; provide it in the config file or via {}",
            key, env_var
        ))),
    }
}

/// Resolve the state directory following the priority order:
/// 1. Command-line `--state-dir` path
/// 2. `EVISHARE_STATE_DIR` environment variable
/// 3. `state_dir` key in the config file
/// 4. `<data_local_dir>/evishare` (fallback `./evishare_data`)
pub fn resolve_state_dir(cli_path: Option<&Path>, config: &Config) -> PathBuf {
    if let Some(path) = cli_path {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_STATE_DIR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.state_dir {
        return path.clone();
    }

    dirs::data_local_dir()
        .map(|d| d.join("evishare"))
        .unwrap_or_else(|| PathBuf::from("./evishare_data"))
}

/// Identifiers resolved from the locations lookup sheet, threaded into the
/// components that touch the document, the form, and the frequency sheets.
#[derive(Debug, Clone)]
pub struct Locations {
    pub archive_document_id: String,
    pub form_id: String,
    pub submitters_sheet: String,
    pub supporting_tags_sheet: String,
    pub opposing_tags_sheet: String,
    pub submitter_item_id: String,
    pub supporting_item_id: String,
    pub opposing_item_id: String,
}

impl Locations {
    /// Build from the B1:B8 column of the locations sheet.
    ///
    /// Cell layout: B1 archive document ID, B2 form ID, B3-B5 frequency
    /// sheet names (submitters, supporting tags, opposing tags), B6-B8 form
    /// item IDs in the same order. Column A carries labels and is ignored.
    pub fn from_cells(rows: &[Vec<String>], sheet: &str) -> Result<Self> {
        let cell = |i: usize| -> Result<String> {
            rows.get(i)
                .and_then(|row| row.first())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    Error::Config(format!("Locations sheet '{}' cell B{} is empty", sheet, i + 1))
                })
        };

        Ok(Self {
            archive_document_id: cell(0)?,
            form_id: cell(1)?,
            submitters_sheet: cell(2)?,
            supporting_tags_sheet: cell(3)?,
            opposing_tags_sheet: cell(4)?,
            submitter_item_id: cell(5)?,
            supporting_item_id: cell(6)?,
            opposing_item_id: cell(7)?,
        })
    }
}

/// Read the locations sheet and resolve all runtime identifiers.
pub async fn resolve_locations(
    sheets: &GoogleSheetsClient,
    config: &Config,
) -> Result<Locations> {
    let rows = sheets
        .get_values(&config.spreadsheet_id, &config.locations_sheet, "B1:B8")
        .await?;
    let locations = Locations::from_cells(&rows, &config.locations_sheet)?;

    tracing::info!(
        document = %locations.archive_document_id,
        form = %locations.form_id,
        "Resolved runtime locations"
    );

    Ok(locations)
}
