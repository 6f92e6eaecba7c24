//! Error types for the signsheet pipeline.
//!
//! Every failure is fatal: the pipeline aborts on the first error and leaves
//! already-written intermediate files in place for inspection.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SignsheetError>;

#[derive(thiserror::Error, Debug)]
pub enum SignsheetError {
    /// Missing or malformed run configuration. Raised before any work starts.
    #[error("config error: {0}")]
    Config(String),

    /// Empty or malformed row source.
    #[error("data format error: {0}")]
    DataFormat(String),

    /// Template or mask document unreadable.
    #[error("template error: {path}: {message}")]
    Template { path: PathBuf, message: String },

    /// An external program failed to start or exited non-zero.
    #[error("external tool '{tool}' failed ({status}): {stderr}")]
    ExternalTool {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Filesystem failure not attributable to one of the kinds above.
    #[error("io error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SignsheetError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn data_format(msg: impl Into<String>) -> Self {
        Self::DataFormat(msg.into())
    }

    pub fn template(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::Template {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn tool_failed(tool: &str, status: ExitStatus, stderr: &[u8]) -> Self {
        Self::ExternalTool {
            tool: tool.to_string(),
            status: status.to_string(),
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }

    pub fn tool_spawn(tool: &str, err: &io::Error) -> Self {
        Self::ExternalTool {
            tool: tool.to_string(),
            status: "failed to start".to_string(),
            stderr: err.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(SignsheetError::config("x")
            .to_string()
            .contains("config error:"));
        assert!(SignsheetError::data_format("x")
            .to_string()
            .contains("data format error:"));
    }

    #[test]
    fn tool_error_names_the_tool() {
        let err = SignsheetError::ExternalTool {
            tool: "inkscape".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "boom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("inkscape"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = SignsheetError::io("/tmp/missing.svg", io::Error::other("gone"));
        assert!(err.to_string().contains("/tmp/missing.svg"));
    }
}
