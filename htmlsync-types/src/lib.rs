//! Shared DTOs and fixed file conventions for the htmlsync workspace.
//!
//! # Design constraints
//! - Report types are serialized for `--format json` consumers.
//! - Convention constants must match the firmware and markup files byte for byte.

pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const HTMLSYNC_CHECK_V1: &str = "htmlsync.check.v1";
    pub const HTMLSYNC_UPDATE_V1: &str = "htmlsync.update.v1";
}

/// File names, sentinels and literal tokens shared by the standalone page and the firmware.
pub mod convention {
    /// Browser-facing markup file.
    pub const STANDALONE_FILE: &str = "config_interface.html";

    /// Firmware source embedding the same markup.
    pub const FIRMWARE_FILE: &str = "swim_pacer.ino";

    pub const START_MARKER: &str = "<!-- ========== SYNC MARKER: START ESP32 HTML ========== -->";
    pub const END_MARKER: &str = "<!-- ========== SYNC MARKER: END ESP32 HTML ========== -->";

    /// Comments containing this text survive normalization.
    pub const SYNC_MARKER_TAG: &str = "SYNC MARKER";

    pub const DEFAULT_HANDLER: &str = "handleRoot";
    pub const DEFAULT_VARIABLE: &str = "html";

    /// Raw string literal opening, as written after `String <variable> = `.
    pub const RAW_STRING_OPEN: &str = "R\"(";

    /// Raw string literal closing plus statement terminator.
    pub const RAW_STRING_CLOSE: &str = ")\";";
}
