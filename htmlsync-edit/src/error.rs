//! Error types for htmlsync-edit.
//!
//! Every variant maps to exit code 1. `ContentMismatch` is a verdict rather than a fault:
//! both documents were read fine but their regions differ.
//!
//! I/O variants name only the path in their own message; the `fs_err` source carries the
//! operation and OS detail.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// A required file does not exist.
    #[error("{path} not found")]
    NotFound { path: Utf8PathBuf },

    /// The standalone document lacks one or both sentinel lines.
    #[error("sync markers not found in {path} (missing {missing})")]
    MarkerMissing {
        path: Utf8PathBuf,
        missing: &'static str,
    },

    /// The firmware document lacks the handler/literal convention or one of its tokens.
    #[error("could not find {what} in {path}")]
    PatternNotFound { path: Utf8PathBuf, what: String },

    /// Both regions were extracted but differ after normalization.
    #[error("HTML content is NOT synchronized ({standalone_chars} vs {firmware_chars} characters)")]
    ContentMismatch {
        standalone_chars: usize,
        firmware_chars: usize,
    },

    /// The file exists but could not be read.
    #[error("read {path}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rewriting the firmware document failed. No rollback is attempted.
    #[error("write {path}")]
    WriteFailure {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured handler or variable name produced an unusable pattern.
    #[error("invalid firmware convention: {0}")]
    InvalidConvention(#[from] regex::Error),
}

impl SyncError {
    /// Stable machine token for reports.
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::NotFound { .. } => "not_found",
            SyncError::MarkerMissing { .. } => "marker_missing",
            SyncError::PatternNotFound { .. } => "pattern_not_found",
            SyncError::ContentMismatch { .. } => "content_mismatch",
            SyncError::Read { .. } => "read_failure",
            SyncError::WriteFailure { .. } => "write_failure",
            SyncError::InvalidConvention(_) => "invalid_convention",
        }
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

impl From<&SyncError> for htmlsync_types::report::Reason {
    fn from(err: &SyncError) -> Self {
        Self {
            code: err.code().to_string(),
            message: error_chain(err),
        }
    }
}

/// `err` followed by each of its sources, joined with `: `.
fn error_chain(err: &SyncError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}

/// Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::SyncError;
    use camino::Utf8PathBuf;
    use htmlsync_types::report::Reason;

    #[test]
    fn not_found_names_the_file() {
        let err = SyncError::NotFound {
            path: Utf8PathBuf::from("config_interface.html"),
        };
        assert_eq!(err.to_string(), "config_interface.html not found");
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn content_mismatch_reports_both_lengths() {
        let err = SyncError::ContentMismatch {
            standalone_chars: 16,
            firmware_chars: 13,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("16 vs 13"));
    }

    #[test]
    fn reason_copies_code_and_message() {
        let err = SyncError::PatternNotFound {
            path: Utf8PathBuf::from("swim_pacer.ino"),
            what: "end marker".to_string(),
        };
        let reason = Reason::from(&err);
        assert_eq!(reason.code, "pattern_not_found");
        assert_eq!(reason.message, "could not find end marker in swim_pacer.ino");
    }

    #[test]
    fn write_failure_names_path_once() {
        let err = SyncError::WriteFailure {
            path: Utf8PathBuf::from("swim_pacer.ino"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "write swim_pacer.ino");
        assert_eq!(err.code(), "write_failure");

        let reason = Reason::from(&err);
        assert_eq!(reason.message, "write swim_pacer.ino: denied");
    }
}
