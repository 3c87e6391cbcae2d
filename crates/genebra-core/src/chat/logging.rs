//! Completion request/response logging
//!
//! Set the `GENEBRA_LOG_FILE` environment variable to append one JSON line
//! per completion to that file. File contents are never logged, only their
//! names and MIME types.
//!
//! Example: `GENEBRA_LOG_FILE=/tmp/completions.log genebra`

use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable naming the log file
pub const LOG_FILE_ENV: &str = "GENEBRA_LOG_FILE";

/// Data for one log entry
#[derive(Default)]
pub struct LogConfig<'a> {
    /// Model the request went to
    pub model: &'a str,
    /// Prompt text
    pub text: &'a str,
    /// (name, MIME type) of each attachment
    pub attachments: &'a [(String, String)],
    /// Rendered answer
    pub answer: Option<&'a str>,
    /// Error message if the request failed
    pub error: Option<&'a str>,
}

/// Log a completion interaction to file if GENEBRA_LOG_FILE is set
pub fn log_completion_interaction(config: LogConfig<'_>) {
    let log_file = match std::env::var(LOG_FILE_ENV) {
        Ok(path) => path,
        Err(_) => return,
    };

    append_entry(Path::new(&log_file), &config);
}

/// Append one JSON line for `config` to `path`
fn append_entry(path: &Path, config: &LogConfig<'_>) {
    let entry = json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model": config.model,
        "request": {
            "text": config.text,
            "attachments": config.attachments.iter().map(|(name, mime)| json!({
                "name": name,
                "mime_type": mime,
            })).collect::<Vec<_>>(),
        },
        "answer": config.answer,
        "error": config.error,
    });

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
    {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", entry) {
                warn!("Failed to write to completion log file: {}", e);
            }
        }
        Err(e) => {
            warn!("Failed to open completion log file {}: {}", path.display(), e);
        }
    }

    debug!("Logged completion interaction to {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(config.model.is_empty());
        assert!(config.attachments.is_empty());
        assert!(config.answer.is_none());
        assert!(config.error.is_none());
    }

    #[test]
    fn test_each_entry_is_one_json_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("completions.log");
        let attachments = vec![("report.pdf".to_string(), "application/pdf".to_string())];

        append_entry(
            &path,
            &LogConfig {
                model: "gemini-test",
                text: "summarize",
                attachments: &attachments,
                answer: Some("A summary.\nSecond line."),
                error: None,
            },
        );
        append_entry(
            &path,
            &LogConfig {
                model: "gemini-test",
                text: "again",
                error: Some("An error occurred: boom"),
                ..Default::default()
            },
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["model"], "gemini-test");
        assert_eq!(first["answer"], "A summary.\nSecond line.");
        assert!(first["error"].is_null());
        let attachment = &first["request"]["attachments"][0];
        assert_eq!(attachment["name"], "report.pdf");
        assert_eq!(attachment["mime_type"], "application/pdf");
        assert!(attachment.get("data").is_none());
        assert!(!lines[0].contains("inlineData"));

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], "An error occurred: boom");
        assert!(second["answer"].is_null());
    }
}
