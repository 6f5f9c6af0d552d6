use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl RunInfo {
    pub fn started_now() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ended_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Both regions normalize to the same text.
    InSync,
    /// Both regions were extracted but differ after normalization.
    OutOfSync,
    /// At least one region could not be extracted.
    Error,
}

/// A single failure reason attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    /// Stable machine token (`not_found`, `marker_missing`, ...).
    pub code: String,
    pub message: String,
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: String,

    /// Character count of the region: normalized for `check`, verbatim for `update`.
    /// Absent when the file could not be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chars: Option<u64>,
}

impl SourceInfo {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            chars: None,
        }
    }
}

/// First character position at which the two normalized regions diverge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstDifference {
    /// Zero-based character index.
    pub position: u64,
    pub standalone_context: String,
    pub firmware_context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    pub status: CheckStatus,
    pub standalone: SourceInfo,
    pub firmware: SourceInfo,

    /// Only set for out-of-sync results where a differing character exists within the
    /// shared length. A strict prefix relationship leaves this empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_difference: Option<FirstDifference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<Reason>,
}

impl CheckReport {
    pub fn new(tool: ToolInfo, standalone: impl Into<String>, firmware: impl Into<String>) -> Self {
        Self {
            schema: crate::schema::HTMLSYNC_CHECK_V1.to_string(),
            tool,
            run: RunInfo::started_now(),
            status: CheckStatus::Error,
            standalone: SourceInfo::new(standalone),
            firmware: SourceInfo::new(firmware),
            first_difference: None,
            reasons: vec![],
        }
    }

    pub fn is_in_sync(&self) -> bool {
        self.status == CheckStatus::InSync
    }
}

/// Before/after fingerprint of the rewritten firmware document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub before_sha256: String,
    pub after_sha256: String,
    pub before_bytes: u64,
    pub after_bytes: u64,
}

impl FileChange {
    pub fn is_changed(&self) -> bool {
        self.before_sha256 != self.after_sha256
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default)]
    pub run: RunInfo,

    pub standalone: SourceInfo,
    pub dry_run: bool,

    /// Whether the firmware document was written to disk.
    pub written: bool,

    pub change: FileChange,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<String>,
}

impl UpdateReport {
    pub fn new(tool: ToolInfo, standalone: SourceInfo, change: FileChange, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::HTMLSYNC_UPDATE_V1.to_string(),
            tool,
            run: RunInfo::started_now(),
            standalone,
            dry_run,
            written: false,
            change,
            backup: None,
        }
    }
}
