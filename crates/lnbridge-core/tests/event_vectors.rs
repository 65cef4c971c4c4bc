//! Stream event notification vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use lnbridge_core::protocol::{EventPayload, StreamEvent};

use vector_loader::load;

#[test]
fn event_vectors() {
    let files = [
        "event_data.json",
        "event_end_empty.json",
        "event_error.json",
        "event_status.json",
        "event_unknown_type.json",
        "event_bad_base64.json",
        "event_unknown_field.json",
        "event_missing_id.json",
    ];

    for f in files {
        let v = load(f);
        let json = v.notification.as_ref().expect("missing notification").to_string();
        let res = StreamEvent::from_json(&json);

        if let Some(err) = v.expect_error {
            let e = res.expect_err("expected error");
            assert_eq!(e.code().as_str(), err.code, "vector={}", v.description);
            continue;
        }

        let ev = res.expect("expected ok event");
        let ex = v.expect.expect("missing expect block");

        assert_eq!(ev.stream_id.as_str(), ex["stream_id"].as_str().unwrap(), "vector={}", v.description);
        assert_eq!(ev.kind.as_str(), ex["kind"].as_str().unwrap(), "vector={}", v.description);

        if let Some(len) = ex.get("payload_len").and_then(|l| l.as_u64()) {
            let actual = match &ev.payload {
                EventPayload::Bytes(b) => b.len() as u64,
                EventPayload::Empty => 0,
                EventPayload::Text(t) => panic!("unexpected text payload {t}"),
            };
            assert_eq!(actual, len, "vector={}", v.description);
        }

        if let Some(text) = ex.get("text").and_then(|t| t.as_str()) {
            assert_eq!(ev.text(), Some(text), "vector={}", v.description);
        }
    }
}

#[test]
fn terminal_kinds() {
    let end = StreamEvent::end("1");
    let err = StreamEvent::error("1", "boom");
    let status = StreamEvent::status("1", "IN_FLIGHT");
    assert!(end.kind.is_terminal());
    assert!(err.kind.is_terminal());
    assert!(!status.kind.is_terminal());
}
