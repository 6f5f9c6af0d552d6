//! Rendering helpers (plain text) for the operator-facing report.

use htmlsync_types::report::{CheckReport, CheckStatus, UpdateReport};

pub const RULE: &str = "==================================================";

pub fn render_check_text(report: &CheckReport) -> String {
    let mut out = String::new();
    out.push_str("Swim Pacer HTML Sync Checker\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str("Checking HTML synchronization...\n");
    out.push_str(RULE);
    out.push('\n');

    match report.status {
        CheckStatus::InSync => {
            out.push_str("✓ HTML content is synchronized!\n");
            out.push_str(&format!(
                "Content length: {} characters\n",
                report.standalone.chars.unwrap_or(0)
            ));
            out.push_str("\nFiles are in sync! Ready for development.\n");
            return out;
        }
        CheckStatus::OutOfSync => {
            out.push_str("✗ HTML content is NOT synchronized!\n");
            out.push_str(&format!(
                "Standalone HTML: {} characters\n",
                report.standalone.chars.unwrap_or(0)
            ));
            out.push_str(&format!(
                "ESP32 INO HTML: {} characters\n",
                report.firmware.chars.unwrap_or(0)
            ));
            if let Some(diff) = &report.first_difference {
                out.push_str(&format!(
                    "\nFirst difference at position {}:\n",
                    diff.position
                ));
                out.push_str(&format!("Standalone: ...{}...\n", diff.standalone_context));
                out.push_str(&format!("ESP32:      ...{}...\n", diff.firmware_context));
            }
        }
        CheckStatus::Error => {
            for reason in &report.reasons {
                out.push_str(&format!("✗ {}\n", reason.message));
            }
        }
    }

    out.push_str("\nFiles need synchronization.\n");
    out.push_str("Update the ESP32 code or standalone HTML to match.\n");
    out
}

pub fn render_update_text(report: &UpdateReport) -> String {
    let mut out = String::new();
    let change = &report.change;

    if report.dry_run {
        out.push_str(&format!(
            "Dry run: {} not written ({} -> {} bytes)\n",
            change.path, change.before_bytes, change.after_bytes
        ));
        if !change.is_changed() {
            out.push_str("ESP32 HTML content is already up to date.\n");
        }
        return out;
    }

    if !report.written {
        out.push_str("✓ ESP32 HTML content is already up to date.\n");
        return out;
    }

    if let Some(backup) = &report.backup {
        out.push_str(&format!("Backup written to {}\n", backup));
    }
    out.push_str("✓ Successfully updated ESP32 HTML content!\n");
    out.push_str("The files should now be synchronized.\n");
    out
}
