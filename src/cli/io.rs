//! JSON I/O handling for CLI
//!
//! - Input: JSON files named on the command line
//! - Output: single JSON object via stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read and parse a JSON file; `wrap` maps failures to the caller's error code
pub fn read_json(path: &Path, wrap: fn(String) -> CliError) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| wrap(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| wrap(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Success envelope
pub fn ok_response(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope
pub fn error_response(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&ok_response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&error_response(code, message))
}

fn write_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_envelopes() {
        assert_eq!(ok_response(json!([1])), json!({"status": "ok", "data": [1]}));
        assert_eq!(
            error_response("CLI_IO_ERROR", "boom"),
            json!({"status": "error", "code": "CLI_IO_ERROR", "message": "boom"})
        );
    }

    #[test]
    fn test_read_json_errors_use_wrapper() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let err = read_json(&missing, |m| CliError::data_error(m)).unwrap_err();
        assert_eq!(err.code_str(), "CLI_DATA_ERROR");

        let bad = temp_dir.path().join("bad.json");
        fs::write(&bad, "{not json").unwrap();
        let err = read_json(&bad, |m| CliError::config_error(m)).unwrap_err();
        assert_eq!(err.code_str(), "CLI_CONFIG_ERROR");
        assert!(err.message().contains("Invalid JSON"));
    }
}
