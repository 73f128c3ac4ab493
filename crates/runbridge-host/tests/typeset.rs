//! Typesetter line consuming run delegate handles.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use runbridge_core::delegate::{RunMetrics, TextRunDelegate};
use runbridge_host::typeset::{FontMetrics, Line};

#[test]
fn measures_text_and_attachments() {
    let font = FontMetrics::new(10.0);
    let image = Arc::new(TextRunDelegate::with_metrics(20.0, 4.0, 20.0));

    let mut line = Line::new();
    line.push_text("ab", font);
    assert!(line.attach(&image));
    line.push_text("c", font);

    assert_eq!(line.text(), "ab\u{FFFC}c");
    assert_eq!(line.attachment_count(), 1);
    assert_eq!(
        line.metrics(),
        RunMetrics { ascent: 20.0, descent: 4.0, width: 35.0 }
    );
}

#[test]
fn remeasure_sees_delegate_changes() {
    let image = Arc::new(TextRunDelegate::with_metrics(20.0, 4.0, 20.0));
    let mut line = Line::new();
    line.attach(&image);
    assert_eq!(line.metrics().width, 20.0);

    image.set_width(30.0);
    image.set_descent(6.0);
    let m = line.metrics();
    assert_eq!(m.width, 30.0);
    assert_eq!(m.descent, 6.0);

    line.delegates()[0].set_width(5.0);
    assert_eq!(line.metrics().width, 5.0);
}

#[test]
fn line_owns_handle_references() {
    let image = Arc::new(TextRunDelegate::with_metrics(8.0, 2.0, 8.0));
    let weak = Arc::downgrade(&image);

    let mut line = Line::new();
    line.attach(&image);
    line.attach(&image);
    assert_eq!(Arc::strong_count(&image), 3);

    drop(image);
    assert_eq!(line.metrics().width, 16.0);

    assert_eq!(line.remove_attachments(), 2);
    assert!(weak.upgrade().is_none());
    assert_eq!(line.attachment_count(), 0);
}

#[test]
fn dropping_line_releases_handles() {
    let image = Arc::new(TextRunDelegate::new());
    {
        let mut line = Line::new();
        line.push_text("x", FontMetrics::new(12.0));
        line.attach(&image);
        assert_eq!(Arc::strong_count(&image), 2);
    }
    assert_eq!(Arc::strong_count(&image), 1);
}
