#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use runbridge_host::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
timer:
  interval_ms: 50
  intervall_ms: 60 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.timer.interval_ms, 100);
    assert_eq!(cfg.timer.operation, "tick");
    assert_eq!(cfg.line.font_size, 16.0);
    assert!(cfg.attachments.is_empty());
}

#[test]
fn attachments_with_user_info() {
    let ok = r#"
version: 1
attachments:
  - ascent: 20
    descent: 4
    width: 20
    user_info: { kind: "emoji", tags: [a, b] }
  - ascent: 12.5
    descent: 3.5
    width: 40
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.attachments.len(), 2);

    let d = cfg.attachments[0].to_delegate();
    assert_eq!(d.width(), 20.0);
    let info = d.user_info().unwrap();
    assert_eq!(info["kind"], serde_json::json!("emoji"));
    assert!(cfg.attachments[1].to_delegate().user_info().is_none());
}

#[test]
fn rejects_wrong_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_out_of_range_values() {
    for bad in [
        "version: 1\ntimer: { interval_ms: 0 }\n",
        "version: 1\ntimer: { operation: \"  \" }\n",
        "version: 1\ntimer: { fire_limit: 0 }\n",
        "version: 1\nline: { font_size: -2 }\n",
        "version: 1\nattachments: [{ ascent: .inf, descent: 0, width: 1 }]\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code().as_str(), "INVALID_CONFIG", "{bad}");
    }
}

#[test]
fn missing_file_is_internal() {
    let err = config::load_from_file("/nonexistent/runbridge.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "INTERNAL");
}
