//! Locating the shared markup region in each document.

use crate::error::{SyncError, SyncResult};
use camino::Utf8Path;
use fs_err as fs;
use htmlsync_types::convention::{
    DEFAULT_HANDLER, DEFAULT_VARIABLE, END_MARKER, RAW_STRING_OPEN, START_MARKER,
};
use regex::Regex;
use std::io;
use tracing::debug;

/// Where the firmware keeps its copy of the page: `void <handler>() { ... String <variable> = R"(`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareConvention {
    pub handler: String,
    pub variable: String,
}

impl Default for FirmwareConvention {
    fn default() -> Self {
        Self {
            handler: DEFAULT_HANDLER.to_string(),
            variable: DEFAULT_VARIABLE.to_string(),
        }
    }
}

impl FirmwareConvention {
    /// The assignment prefix that opens the literal, e.g. `String html = R"(`.
    pub fn literal_open(&self) -> String {
        format!("String {} = {}", self.variable, RAW_STRING_OPEN)
    }

    /// Handler opening brace, then (lazily) the literal assignment, then the captured body.
    pub fn body_pattern(&self) -> SyncResult<Regex> {
        let pattern = format!(
            r#"(?s)void {handler}\(\) \{{.*?String {variable} = R"\(\s*(.*?)\s*\)";"#,
            handler = regex::escape(&self.handler),
            variable = regex::escape(&self.variable),
        );
        Ok(Regex::new(&pattern)?)
    }

    fn describe(&self) -> String {
        format!("HTML content in {}() function", self.handler)
    }
}

/// Read a document, distinguishing a missing file from other read failures.
pub(crate) fn read_document(path: &Utf8Path) -> SyncResult<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SyncError::NotFound {
            path: path.to_path_buf(),
        },
        _ => SyncError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Region between the sentinel lines, trimmed.
///
/// Returns the name of the missing sentinel on failure.
pub fn standalone_region(content: &str) -> Result<&str, &'static str> {
    let Some(start) = content.find(START_MARKER) else {
        return Err("start marker");
    };
    let Some(end) = content.find(END_MARKER) else {
        return Err("end marker");
    };

    let after_marker = start + START_MARKER.len();
    let body_start = content[start..]
        .find('\n')
        .map(|i| start + i + 1)
        .unwrap_or(after_marker);

    if body_start >= end {
        return Ok("");
    }
    Ok(content[body_start..end].trim())
}

/// Literal body of the first matching handler assignment, trimmed.
pub fn firmware_body<'a>(
    content: &'a str,
    convention: &FirmwareConvention,
) -> SyncResult<Option<&'a str>> {
    let re = convention.body_pattern()?;
    Ok(re
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim()))
}

/// Extract the marker-delimited region from the standalone page.
pub fn extract_standalone(path: &Utf8Path) -> SyncResult<String> {
    let content = read_document(path)?;
    let region = standalone_region(&content).map_err(|missing| SyncError::MarkerMissing {
        path: path.to_path_buf(),
        missing,
    })?;
    debug!(path = %path, bytes = region.len(), "extracted standalone region");
    Ok(region.to_string())
}

/// Extract the raw string literal body from the firmware handler.
pub fn extract_firmware(path: &Utf8Path, convention: &FirmwareConvention) -> SyncResult<String> {
    let content = read_document(path)?;
    let body = firmware_body(&content, convention)?.ok_or_else(|| SyncError::PatternNotFound {
        path: path.to_path_buf(),
        what: convention.describe(),
    })?;
    debug!(path = %path, bytes = body.len(), "extracted firmware literal");
    Ok(body.to_string())
}
