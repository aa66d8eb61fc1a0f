mod support;

use eventstore_client::{ClientError, ErrorDetailCapture, Method, RecordErrorCode, StreamOptions};
use serde_json::json;
use support::{client, client_with_sink, event_line, FakeTransport, Reply, BASE_URL, TOKEN};

#[tokio::test]
async fn read_events_returns_events_in_arrival_order() {
    let body = format!(
        "{}\n{}\n",
        event_line("1", "/customer/1", "com.example.registered"),
        event_line("2", "/customer/1", "com.example.renamed"),
    );
    let transport = FakeTransport::new([Reply::ok(&body)]);
    let events = client(transport.clone())
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    let ids: Vec<_> = events.iter().map(|e| e.id.as_deref().unwrap()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(events[1].event_type, "com.example.renamed");
    assert_eq!(events[0].data, json!({"seq": 1}));
    assert!(events[0].time.is_some());
}

#[tokio::test]
async fn read_request_targets_versioned_endpoint_with_bearer_token() {
    let transport = FakeTransport::new([Reply::ok("")]);
    client(transport.clone())
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    let request = transport.only_request();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url, format!("{BASE_URL}/api/v1/read-events"));
    assert_eq!(request.bearer_token.as_deref(), Some(TOKEN));
    assert_eq!(transport.request_body(), json!({"subject": "/customer/1"}));
}

#[tokio::test]
async fn read_options_are_sent_in_camel_case() {
    let transport = FakeTransport::new([Reply::ok("")]);
    let options = StreamOptions::new()
        .lower_bound("10")
        .include_lower_bound_event(false)
        .recursive(true);
    client(transport.clone())
        .read_events("/customer", Some(&options))
        .await
        .expect("read events");

    assert_eq!(
        transport.request_body(),
        json!({
            "subject": "/customer",
            "options": {"lowerBound": "10", "includeLowerBoundEvent": false, "recursive": true}
        })
    );
}

#[tokio::test]
async fn empty_body_returns_before_decoding() {
    let transport = FakeTransport::new([Reply::ok("")]);
    let (client, log) = client_with_sink(transport, ErrorDetailCapture::RedactedSummaryOnly);
    let events = client
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    assert!(events.is_empty());
    assert_eq!(log.sinks_built(), 0, "no decoder is built for an empty body");
}

#[tokio::test]
async fn blank_lines_only_yield_no_events() {
    let transport = FakeTransport::new([Reply::ok("\n  \n\r\n")]);
    let (client, log) = client_with_sink(transport, ErrorDetailCapture::RedactedSummaryOnly);
    let events = client
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    assert!(events.is_empty());
    assert_eq!(log.sinks_built(), 1);
    assert!(log.details().is_empty());
}

#[tokio::test]
async fn skipped_read_records_reach_the_error_sink() {
    let body = format!(
        "{}\n{{\"payload\":\"\"}}\nnot json\n",
        event_line("1", "/customer/1", "a"),
    );
    let transport = FakeTransport::new([Reply::ok(&body)]);
    let (client, log) = client_with_sink(transport, ErrorDetailCapture::RedactedSummaryOnly);
    let events = client
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    assert_eq!(events.len(), 1);
    let summary: Vec<_> = log
        .details()
        .iter()
        .map(|detail| (detail.line_number, detail.code))
        .collect();
    assert_eq!(
        summary,
        [(2, RecordErrorCode::Materialize), (3, RecordErrorCode::JsonParse)]
    );
}

#[tokio::test]
async fn malformed_records_are_skipped_without_failing_the_read() {
    let body = format!(
        "{}\nnot json\n{{\"payload\":\"\"}}\n[1,2]\n{}",
        event_line("1", "/customer/1", "a"),
        event_line("2", "/customer/1", "b"),
    );
    let transport = FakeTransport::new([Reply::ok(&body)]);
    let events = client(transport)
        .read_events("/customer/1", None)
        .await
        .expect("read events");

    let ids: Vec<_> = events.iter().map(|e| e.id.as_deref().unwrap()).collect();
    assert_eq!(ids, ["1", "2"]);
}

#[tokio::test]
async fn sse_prefixed_records_are_accepted_on_read() {
    let body = format!("data: {}\n", event_line("7", "/customer/1", "a"));
    let transport = FakeTransport::new([Reply::ok(&body)]);
    let events = client(transport)
        .read_events("/customer/1", None)
        .await
        .expect("read events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id.as_deref(), Some("7"));
}

#[tokio::test]
async fn non_success_status_fails_without_partial_result() {
    let body = format!("{}\n", event_line("1", "/customer/1", "a"));
    let transport = FakeTransport::new([Reply::status(500, &body)]);
    let err = client(transport)
        .read_events("/customer/1", None)
        .await
        .unwrap_err();

    match err {
        ClientError::UnexpectedStatus {
            endpoint, status, ..
        } => {
            assert_eq!(endpoint, "read-events");
            assert_eq!(status, 500);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_error_body_still_reports_the_status() {
    let transport = FakeTransport::new([Reply::Chunks {
        status: 503,
        chunks: vec![
            Ok(b"service ".to_vec()),
            Err(std::io::ErrorKind::ConnectionReset),
        ],
        hold_open: false,
    }]);
    let err = client(transport)
        .read_events("/customer/1", None)
        .await
        .unwrap_err();

    match err {
        ClientError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 503);
            assert!(body.is_empty(), "partial body must not be reported: {body:?}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_returned() {
    let transport = FakeTransport::new([Reply::Fail("connection refused".to_string())]);
    let err = client(transport)
        .read_events("/customer/1", None)
        .await
        .unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn relative_subject_is_rejected_before_sending() {
    let transport = FakeTransport::default();
    let err = client(transport.clone())
        .read_events("customer/1", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn oversized_records_are_skipped_when_limit_is_set() {
    let big = event_line("1", "/customer/1", &"x".repeat(512));
    let body = format!("{big}\n{}\n", event_line("2", "/customer/1", "small"));
    let transport = FakeTransport::new([Reply::ok(&body)]);
    let client = eventstore_client::EventStoreClient::builder()
        .base_url(BASE_URL)
        .max_line_bytes(Some(256))
        .build_with_transport(transport)
        .expect("client builds");

    let events = client.read_events("/customer/1", None).await.expect("read");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id.as_deref(), Some("2"));
}
