use htmlsync_types::report::{
    CheckReport, CheckStatus, FileChange, FirstDifference, Reason, SourceInfo, ToolInfo,
    UpdateReport,
};
use pretty_assertions::assert_eq;

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "htmlsync".to_string(),
        version: Some("0.0.0".to_string()),
    }
}

#[test]
fn check_status_serializes_snake_case() {
    let in_sync = serde_json::to_value(CheckStatus::InSync).expect("serialize");
    let out_of_sync = serde_json::to_value(CheckStatus::OutOfSync).expect("serialize");
    let error = serde_json::to_value(CheckStatus::Error).expect("serialize");

    assert_eq!(in_sync, serde_json::json!("in_sync"));
    assert_eq!(out_of_sync, serde_json::json!("out_of_sync"));
    assert_eq!(error, serde_json::json!("error"));
}

#[test]
fn check_report_new_sets_schema_and_defaults() {
    let report = CheckReport::new(tool_info(), "config_interface.html", "swim_pacer.ino");

    assert_eq!(report.schema, htmlsync_types::schema::HTMLSYNC_CHECK_V1);
    assert_eq!(report.status, CheckStatus::Error);
    assert_eq!(report.standalone.path, "config_interface.html");
    assert_eq!(report.firmware.path, "swim_pacer.ino");
    assert!(report.standalone.chars.is_none());
    assert!(report.first_difference.is_none());
    assert!(report.reasons.is_empty());
    assert!(report.run.started_at.is_some());
    assert!(!report.is_in_sync());
}

#[test]
fn check_report_omits_empty_optionals() {
    let mut report = CheckReport::new(tool_info(), "a.html", "b.ino");
    report.status = CheckStatus::InSync;
    report.standalone.chars = Some(13);
    report.firmware.chars = Some(13);

    let json = serde_json::to_value(&report).expect("serialize");
    assert!(json.get("first_difference").is_none());
    assert!(json.get("reasons").is_none());
    assert_eq!(json["standalone"]["chars"], serde_json::json!(13));
    assert_eq!(json["status"], serde_json::json!("in_sync"));
}

#[test]
fn check_report_carries_first_difference_and_reasons() {
    let mut report = CheckReport::new(tool_info(), "a.html", "b.ino");
    report.status = CheckStatus::OutOfSync;
    report.first_difference = Some(FirstDifference {
        position: 6,
        standalone_context: "<div>Hello</div>".to_string(),
        firmware_context: "<div>Hi</div>".to_string(),
    });
    report.reasons.push(Reason {
        code: "content_mismatch".to_string(),
        message: "HTML content is NOT synchronized".to_string(),
    });

    let json = serde_json::to_string(&report).expect("serialize");
    let back: CheckReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.status, CheckStatus::OutOfSync);
    assert_eq!(back.first_difference, report.first_difference);
    assert_eq!(back.reasons, report.reasons);
}

#[test]
fn check_report_deserializes_without_run_block() {
    let json = r#"{
        "schema": "htmlsync.check.v1",
        "tool": {"name": "htmlsync"},
        "status": "error",
        "standalone": {"path": "config_interface.html"},
        "firmware": {"path": "swim_pacer.ino"}
    }"#;

    let report: CheckReport = serde_json::from_str(json).expect("deserialize");
    assert!(report.run.started_at.is_none());
    assert!(report.tool.version.is_none());
    assert!(report.reasons.is_empty());
}

#[test]
fn file_change_detects_identical_digests() {
    let same = FileChange {
        path: "swim_pacer.ino".to_string(),
        before_sha256: "aa".to_string(),
        after_sha256: "aa".to_string(),
        before_bytes: 10,
        after_bytes: 10,
    };
    assert!(!same.is_changed());

    let changed = FileChange {
        after_sha256: "bb".to_string(),
        after_bytes: 12,
        ..same
    };
    assert!(changed.is_changed());
}

#[test]
fn update_report_new_is_unwritten() {
    let change = FileChange {
        path: "swim_pacer.ino".to_string(),
        before_sha256: "aa".to_string(),
        after_sha256: "bb".to_string(),
        before_bytes: 1,
        after_bytes: 2,
    };
    let report = UpdateReport::new(
        tool_info(),
        SourceInfo::new("config_interface.html"),
        change,
        true,
    );

    assert_eq!(report.schema, htmlsync_types::schema::HTMLSYNC_UPDATE_V1);
    assert!(report.dry_run);
    assert!(!report.written);
    assert!(report.backup.is_none());

    let json = serde_json::to_value(&report).expect("serialize");
    assert!(json.get("backup").is_none());
    assert_eq!(json["change"]["after_bytes"], serde_json::json!(2));
}
