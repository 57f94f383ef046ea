use clap::Parser;
use std::path::PathBuf;

use crate::models::Domain;
use crate::time_utils::TimezoneHandler;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Spreadsheet-backed activity statistics server
#[derive(Parser, Debug, Clone)]
#[command(
    name = "activity-tracker",
    about = "Spreadsheet-backed activity statistics server",
    version
)]
pub struct Settings {
    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value = "2036")]
    pub port: u16,

    /// Timezone used for day and hour grouping (auto-detected if not specified)
    #[arg(long, env = "TRACKER_TIMEZONE", default_value = "auto", value_parser = parse_timezone)]
    pub timezone: String,

    /// Where spreadsheet grids are read from
    #[arg(long, env = "TRACKER_SOURCE", default_value = "sheets", value_parser = ["sheets", "directory"])]
    pub source: String,

    /// Directory holding `<key>.json` grids for the directory source
    #[arg(long, env = "TRACKER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// API key for the Google Sheets values endpoint
    #[arg(long, env = "SHEETS_API_KEY", hide_env_values = true)]
    pub sheets_api_key: Option<String>,

    /// Hours between refreshes (1-168)
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=168))]
    pub refresh_interval_hours: u64,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Fetch and process a single domain, print the result and exit
    #[arg(long, value_name = "KEY")]
    pub test: Option<String>,
}

/// Accept `auto` or a recognised IANA timezone name.
fn parse_timezone(value: &str) -> Result<String, String> {
    if value == "auto" || TimezoneHandler::validate_timezone(value) {
        Ok(value.to_string())
    } else {
        Err(format!("unknown IANA timezone: {}", value))
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments (with environment fallbacks) and resolve `"auto"`
    /// values.
    pub fn load() -> Self {
        Self::resolve_auto_values(Settings::parse())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        // Resolve "auto" timezone → system timezone.
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// Directory for the directory source, defaulting to
    /// `~/.activity-tracker/sheets`.
    pub fn data_dir_or_default(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".activity-tracker")
                .join("sheets")
        })
    }

    /// Spreadsheet id configured for `domain`, read from its environment
    /// variable. Blank values count as unset.
    pub fn spreadsheet_id(domain: Domain) -> Option<String> {
        std::env::var(domain.spreadsheet_env())
            .ok()
            .filter(|id| !id.trim().is_empty())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
