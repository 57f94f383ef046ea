//! Where spreadsheet grids come from.
//!
//! A [`RowSource`] fetches the raw value grid (header row followed by data
//! rows) of one domain, either from the Google Sheets values endpoint or from
//! `<key>.json` files in a local directory. Every fetch is retried up to three
//! times with linear back-off (0 ms → 100 ms → 200 ms).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracker_core::models::Domain;
use tracker_core::settings::Settings;
use tracker_core::{Result, TrackerError};

/// A spreadsheet range as returned by the values endpoint.
pub type Grid = Vec<Vec<Value>>;

/// Base URL of the spreadsheet values endpoint.
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Maximum number of fetch attempts per domain.
const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Per-request timeout for the spreadsheet service.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body of a values response. `values` is omitted for an empty range.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

/// A grid file may hold the bare grid or a saved values response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GridFile {
    Bare(Grid),
    Response(ValueRange),
}

// ── RowSource ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum RowSource {
    /// Google Sheets values endpoint.
    Sheets {
        client: reqwest::Client,
        api_key: String,
        spreadsheet_ids: HashMap<Domain, String>,
    },
    /// `<dir>/<key>.json` files.
    Directory(PathBuf),
}

impl RowSource {
    /// Sheets source with explicit spreadsheet ids.
    pub fn sheets(api_key: String, spreadsheet_ids: HashMap<Domain, String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TrackerError::Http(e.to_string()))?;
        Ok(RowSource::Sheets {
            client,
            api_key,
            spreadsheet_ids,
        })
    }

    /// Sheets source whose spreadsheet ids come from each domain's
    /// `<PREFIX>_SPREADSHEET_ID` environment variable.
    pub fn sheets_from_env(api_key: String) -> Result<Self> {
        let spreadsheet_ids: HashMap<Domain, String> = Domain::ALL
            .into_iter()
            .filter_map(|d| Settings::spreadsheet_id(d).map(|id| (d, id)))
            .collect();
        tracing::debug!(
            configured = spreadsheet_ids.len(),
            "spreadsheet ids loaded from environment"
        );
        Self::sheets(api_key, spreadsheet_ids)
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        RowSource::Directory(path.into())
    }

    /// Build the source selected by the CLI settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        match settings.source.as_str() {
            "directory" => Ok(Self::directory(settings.data_dir_or_default())),
            "sheets" => {
                let api_key = settings.sheets_api_key.clone().ok_or_else(|| {
                    TrackerError::Config("SHEETS_API_KEY is not set".to_string())
                })?;
                Self::sheets_from_env(api_key)
            }
            other => Err(TrackerError::Config(format!("unknown source: {}", other))),
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Fetch the grid of `domain`, retrying transient failures.
    ///
    /// Configuration errors are not retried. An empty grid is reported as
    /// [`TrackerError::NoData`].
    pub async fn fetch(&self, domain: Domain) -> Result<Grid> {
        let mut last_err = TrackerError::NoData(domain.key().to_string());

        for attempt in 0..MAX_RETRY_ATTEMPTS {
            if attempt > 0 {
                let sleep_ms = (attempt as u64) * 100;
                tracing::debug!(%domain, attempt, sleep_ms, "retrying fetch after back-off");
                tokio::time::sleep(Duration::from_millis(sleep_ms)).await;
            }

            match self.fetch_once(domain).await {
                Ok(grid) if grid.is_empty() => {
                    return Err(TrackerError::NoData(domain.key().to_string()));
                }
                Ok(grid) => return Ok(grid),
                Err(e @ TrackerError::Config(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(%domain, attempt, error = %e, "fetch attempt failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    // ── Private helpers ───────────────────────────────────────────────────

    async fn fetch_once(&self, domain: Domain) -> Result<Grid> {
        match self {
            RowSource::Sheets {
                client,
                api_key,
                spreadsheet_ids,
            } => {
                let id = spreadsheet_ids.get(&domain).ok_or_else(|| {
                    TrackerError::Config(format!("{} is not set", domain.spreadsheet_env()))
                })?;
                fetch_sheet(client, &values_url(id, domain.range(), api_key)?, domain).await
            }
            RowSource::Directory(dir) => read_grid_file(&grid_path(dir, domain)).await,
        }
    }
}

/// URL of the values endpoint for one spreadsheet range.
pub fn values_url(spreadsheet_id: &str, range: &str, api_key: &str) -> Result<Url> {
    let mut url = Url::parse(SHEETS_API_BASE)
        .map_err(|e| TrackerError::Config(format!("invalid API base URL: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| TrackerError::Config("API base URL cannot hold a path".to_string()))?
        .push(spreadsheet_id)
        .push("values")
        .push(range);
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

/// Path of the grid file for `domain` under `dir`.
pub fn grid_path(dir: &Path, domain: Domain) -> PathBuf {
    dir.join(format!("{}.json", domain.key()))
}

async fn fetch_sheet(client: &reqwest::Client, url: &Url, domain: Domain) -> Result<Grid> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| TrackerError::Http(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TrackerError::HttpStatus {
            domain: domain.key().to_string(),
            status: status.as_u16(),
        });
    }

    let body: ValueRange = response
        .json()
        .await
        .map_err(|e| TrackerError::Http(e.to_string()))?;
    Ok(body.values)
}

async fn read_grid_file(path: &Path) -> Result<Grid> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| TrackerError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let grid = match serde_json::from_str::<GridFile>(&text)? {
        GridFile::Bare(grid) => grid,
        GridFile::Response(response) => response.values,
    };
    Ok(grid)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
