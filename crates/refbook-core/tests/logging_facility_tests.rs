use refbook_core::errors::RefBookError;
use refbook_core::logging_facility::test_capture::init_test_capture;
use refbook_core::{log_op_end, log_op_error, log_op_start};
use refbook_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_start_event_carries_fields() {
    let capture = init_test_capture();
    let op = "test_start_event_carries_fields";

    log_op_start!(op, book_id = 7);

    let events = capture.events_for_op(op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field("book_id"), Some("7"));
}

#[test]
fn test_end_event_has_duration() {
    let capture = init_test_capture();
    let op = "test_end_event_has_duration";

    log_op_end!(op, duration_ms = 42u64);

    let events = capture.events_for_op(op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_error_event_has_stable_code() {
    let capture = init_test_capture();
    let op = "test_error_event_has_stable_code";

    log_op_error!(op, RefBookError::BookNotFound { book_id: 1 }, duration_ms = 3u64);

    let events = capture.events_for_op(op);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field("err.code"), Some("ERR_NOT_FOUND"));
    assert_eq!(events[0].level, tracing::Level::ERROR);
}

#[test]
fn test_single_start_and_end_per_op() {
    let capture = init_test_capture();
    let op = "test_single_start_and_end_per_op";

    log_op_start!(op);
    log_op_end!(op, duration_ms = 1u64);

    capture.assert_event_exists(op, EVENT_START);
    capture.assert_event_exists(op, EVENT_END);
    assert_eq!(capture.events_for_op(op).len(), 2);
}
