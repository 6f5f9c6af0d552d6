//! Sync engine for the standalone page and its firmware copy.
//!
//! Responsibilities:
//! - Extract the shared region from each document.
//! - Normalize and compare the regions (`check`).
//! - Splice the standalone page into the firmware literal (`update`).

pub mod compare;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod splice;

pub use compare::{Comparison, compare, compare_normalized, first_difference};
pub use error::{SyncError, SyncResult};
pub use extract::{FirmwareConvention, extract_firmware, extract_standalone};
pub use normalize::normalize;
pub use splice::{MissingToken, UpdateOptions, read_standalone, splice_literal, update_firmware};

use camino::Utf8Path;
use chrono::Utc;
use htmlsync_types::report::{CheckReport, CheckStatus, Reason, ToolInfo};
use tracing::{debug, warn};

/// Run both extractors and compare their normalized regions.
///
/// Both extractors always run so every missing input shows up in one report. Extraction
/// failures yield `CheckStatus::Error` and no comparison is attempted.
pub fn check_sync(
    standalone: &Utf8Path,
    firmware: &Utf8Path,
    convention: &FirmwareConvention,
    tool: ToolInfo,
) -> CheckReport {
    let mut report = CheckReport::new(tool, standalone.as_str(), firmware.as_str());

    let standalone_html = extract_standalone(standalone);
    let firmware_html = extract_firmware(firmware, convention);

    let (standalone_html, firmware_html) = match (standalone_html, firmware_html) {
        (Ok(a), Ok(b)) => (a, b),
        (a, b) => {
            for err in [a.err(), b.err()].into_iter().flatten() {
                warn!(code = err.code(), "{}", err);
                report.reasons.push(Reason::from(&err));
            }
            report.status = CheckStatus::Error;
            report.run.ended_at = Some(Utc::now());
            return report;
        }
    };

    match compare(&standalone_html, &firmware_html) {
        Comparison::InSync { chars } => {
            debug!(chars, "regions in sync");
            report.status = CheckStatus::InSync;
            report.standalone.chars = Some(chars as u64);
            report.firmware.chars = Some(chars as u64);
        }
        Comparison::OutOfSync {
            standalone_chars,
            firmware_chars,
            first_difference,
        } => {
            debug!(standalone_chars, firmware_chars, "regions differ");
            report.status = CheckStatus::OutOfSync;
            report.standalone.chars = Some(standalone_chars as u64);
            report.firmware.chars = Some(firmware_chars as u64);
            report.first_difference = first_difference;
            let err = SyncError::ContentMismatch {
                standalone_chars,
                firmware_chars,
            };
            report.reasons.push(Reason::from(&err));
        }
    }

    report.run.ended_at = Some(Utc::now());
    report
}
