//! In-place replacement of the firmware literal with the standalone page.

use crate::error::{SyncError, SyncResult};
use crate::extract::{FirmwareConvention, read_document};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use diffy::PatchFormatter;
use fs_err as fs;
use htmlsync_types::convention::{END_MARKER, RAW_STRING_CLOSE};
use htmlsync_types::report::{FileChange, SourceInfo, ToolInfo, UpdateReport};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Write;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Compute the rewrite and patch but leave the firmware document untouched.
    pub dry_run: bool,
    /// Write through a temporary file in the same directory and rename it over the target.
    pub atomic: bool,
    /// Copy the original firmware document to `<path><suffix>` before rewriting.
    pub backup_suffix: Option<String>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            atomic: true,
            backup_suffix: None,
        }
    }
}

/// The token the splicer could not locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingToken {
    LiteralOpen,
    EndMarker,
    LiteralClose,
}

impl fmt::Display for MissingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingToken::LiteralOpen => f.write_str("HTML string start"),
            MissingToken::EndMarker => f.write_str("end marker"),
            MissingToken::LiteralClose => f.write_str("HTML string end"),
        }
    }
}

/// Replace the literal span with `content` flanked by single newlines.
///
/// The span runs from the end of the literal opening to the first closing token at or after
/// the end sentinel. Everything outside it is preserved byte for byte.
pub fn splice_literal(
    document: &str,
    content: &str,
    convention: &FirmwareConvention,
) -> Result<String, MissingToken> {
    let open = convention.literal_open();
    let start = document
        .find(&open)
        .map(|i| i + open.len())
        .ok_or(MissingToken::LiteralOpen)?;

    let marker = document[start..]
        .find(END_MARKER)
        .map(|i| start + i)
        .ok_or(MissingToken::EndMarker)?;

    let close = document[marker..]
        .find(RAW_STRING_CLOSE)
        .map(|i| marker + i)
        .ok_or(MissingToken::LiteralClose)?;

    let mut out = String::with_capacity(document.len() + content.len());
    out.push_str(&document[..start]);
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(&document[close..]);
    Ok(out)
}

/// Read the whole standalone page, trimmed of outer whitespace. No marker stripping.
pub fn read_standalone(path: &Utf8Path) -> SyncResult<String> {
    let content = read_document(path)?;
    Ok(content.trim().to_string())
}

/// Splice `content` into the firmware document.
///
/// All tokens are located before anything touches the disk, so a lookup failure leaves the
/// firmware document unmodified. Returns the report and a unified diff of the rewrite.
pub fn update_firmware(
    standalone: &Utf8Path,
    content: &str,
    firmware: &Utf8Path,
    convention: &FirmwareConvention,
    tool: ToolInfo,
    opts: &UpdateOptions,
) -> SyncResult<(UpdateReport, String)> {
    let before = read_document(firmware)?;
    let after =
        splice_literal(&before, content, convention).map_err(|missing| SyncError::PatternNotFound {
            path: firmware.to_path_buf(),
            what: missing.to_string(),
        })?;

    let change = file_change(firmware, &before, &after);
    let patch = render_patch(firmware, &before, &after);

    let mut source = SourceInfo::new(standalone.as_str());
    source.chars = Some(content.chars().count() as u64);
    let mut report = UpdateReport::new(tool, source, change, opts.dry_run);

    if opts.dry_run {
        debug!(path = %firmware, "dry-run: not written");
    } else if !report.change.is_changed() {
        debug!(path = %firmware, "firmware literal already up to date");
    } else {
        if let Some(suffix) = &opts.backup_suffix {
            let backup = backup_path(firmware, suffix);
            fs::copy(firmware, &backup).map_err(|source| SyncError::WriteFailure {
                path: backup.clone(),
                source,
            })?;
            debug!(backup = %backup, "wrote backup");
            report.backup = Some(backup.to_string());
        }
        write_document(firmware, &after, opts.atomic)?;
        report.written = true;
        info!(path = %firmware, bytes = after.len(), "updated firmware literal");
    }

    report.run.ended_at = Some(Utc::now());
    Ok((report, patch))
}

fn backup_path(path: &Utf8Path, suffix: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{path}{suffix}"))
}

fn write_document(path: &Utf8Path, contents: &str, atomic: bool) -> SyncResult<()> {
    let write_failure = |source: std::io::Error| SyncError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    if !atomic {
        return fs::write(path, contents).map_err(write_failure);
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failure)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failure)?;
    tmp.as_file().sync_all().map_err(write_failure)?;

    let permissions = fs::metadata(path).map_err(write_failure)?.permissions();
    fs::set_permissions(tmp.path(), permissions).map_err(write_failure)?;

    tmp.persist(path).map_err(|e| write_failure(e.error))?;
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

fn file_change(path: &Utf8Path, before: &str, after: &str) -> FileChange {
    FileChange {
        path: path.to_string(),
        before_sha256: sha256_hex(before.as_bytes()),
        after_sha256: sha256_hex(after.as_bytes()),
        before_bytes: before.len() as u64,
        after_bytes: after.len() as u64,
    }
}

fn render_patch(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let formatter = PatchFormatter::new();
    let body = formatter.fmt_patch(&patch).to_string();
    // diffy emits its own `---`/`+++` header; keep only the hunks.
    let hunks = body
        .split_inclusive('\n')
        .skip_while(|line| line.starts_with("---") || line.starts_with("+++"));
    for line in hunks {
        out.push_str(line);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn firmware(body: &str) -> String {
        format!(
            "#include <WebServer.h>\n\nvoid handleRoot() {{\n  String html = R\"(\n{body}\n{END_MARKER}\n)\";\n  server.send(200, \"text/html\", html);\n}}\n"
        )
    }

    #[test]
    fn splice_replaces_literal_span() {
        let doc = firmware("<p>old</p>");
        let out = splice_literal(&doc, "<p>new</p>", &FirmwareConvention::default()).unwrap();
        assert_eq!(
            out,
            "#include <WebServer.h>\n\nvoid handleRoot() {\n  String html = R\"(\n<p>new</p>\n)\";\n  server.send(200, \"text/html\", html);\n}\n"
        );
    }

    #[test]
    fn splice_is_idempotent() {
        let page = format!("<p>new</p>\n{END_MARKER}");
        let doc = firmware("<p>old</p>");
        let once = splice_literal(&doc, &page, &FirmwareConvention::default()).unwrap();
        let twice = splice_literal(&once, &page, &FirmwareConvention::default()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn splice_skips_close_tokens_before_end_marker() {
        let doc = format!("String html = R\"(\nfoo)\"; bar\n{END_MARKER}\n)\";\nrest");
        let out = splice_literal(&doc, "X", &FirmwareConvention::default()).unwrap();
        assert_eq!(out, "String html = R\"(\nX\n)\";\nrest");
    }

    #[test]
    fn splice_requires_literal_open() {
        let doc = format!("String page = R\"(\n{END_MARKER}\n)\";\n");
        assert_eq!(
            splice_literal(&doc, "x", &FirmwareConvention::default()),
            Err(MissingToken::LiteralOpen)
        );
    }

    #[test]
    fn splice_requires_end_marker_after_open() {
        let doc = format!("{END_MARKER}\nString html = R\"(\n<p/>\n)\";\n");
        assert_eq!(
            splice_literal(&doc, "x", &FirmwareConvention::default()),
            Err(MissingToken::EndMarker)
        );
    }

    #[test]
    fn splice_requires_close_after_end_marker() {
        let doc = format!("String html = R\"(\n<p/>)\";\n{END_MARKER}\n");
        assert_eq!(
            splice_literal(&doc, "x", &FirmwareConvention::default()),
            Err(MissingToken::LiteralClose)
        );
    }

    #[test]
    fn missing_token_messages() {
        assert_eq!(MissingToken::LiteralOpen.to_string(), "HTML string start");
        assert_eq!(MissingToken::EndMarker.to_string(), "end marker");
        assert_eq!(MissingToken::LiteralClose.to_string(), "HTML string end");
    }

    #[test]
    fn patch_is_empty_without_changes() {
        assert_eq!(render_patch(Utf8Path::new("a.ino"), "x\n", "x\n"), "");
    }

    #[test]
    fn patch_has_single_header() {
        let patch = render_patch(Utf8Path::new("a.ino"), "one\ntwo\n", "one\nthree\n");
        assert!(patch.starts_with("--- a/a.ino\n+++ b/a.ino\n@@"));
        assert_eq!(patch.matches("+++").count(), 1);
        assert!(patch.contains("-two\n"));
        assert!(patch.contains("+three\n"));
    }
}
