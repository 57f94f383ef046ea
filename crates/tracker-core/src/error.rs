use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the activity tracker outside the aggregation core.
///
/// The aggregation pipeline itself never fails: coercion problems are absorbed
/// per field. These variants cover fetching, configuration and serving.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// A grid file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The HTTP request to the spreadsheet service failed.
    #[error("Request to spreadsheet service failed: {0}")]
    Http(String),

    /// The spreadsheet service answered with a non-success status.
    #[error("Spreadsheet service returned status {status} for {domain}")]
    HttpStatus { domain: String, status: u16 },

    /// A domain key is not one of the configured domains.
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// The source returned no rows for a domain.
    #[error("No data found for {0}")]
    NoData(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the tracker crates.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TrackerError::FileRead {
            path: PathBuf::from("/sheets/chess.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/sheets/chess.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_http_status() {
        let err = TrackerError::HttpStatus {
            domain: "chess".to_string(),
            status: 403,
        };
        assert_eq!(
            err.to_string(),
            "Spreadsheet service returned status 403 for chess"
        );
    }

    #[test]
    fn test_error_display_unknown_domain() {
        let err = TrackerError::UnknownDomain("golf".to_string());
        assert_eq!(err.to_string(), "Unknown domain: golf");
    }

    #[test]
    fn test_error_display_no_data() {
        let err = TrackerError::NoData("k5".to_string());
        assert_eq!(err.to_string(), "No data found for k5");
    }

    #[test]
    fn test_error_display_config() {
        let err = TrackerError::Config("CHESS_SPREADSHEET_ID is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: CHESS_SPREADSHEET_ID is not set"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: TrackerError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
