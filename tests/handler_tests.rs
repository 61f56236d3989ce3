use std::io;
use std::sync::{Arc, Mutex};

use lambda_runtime::{Context, LambdaEvent};
use s3_upload_notifier::core::models::{HandlerResponse, QueueEvent, QueueRecord};
use s3_upload_notifier::worker::handler::{BatchSummary, process_batch};
use serde_json::json;

fn body_with(notification: &serde_json::Value) -> String {
    json!({ "Message": notification.to_string() }).to_string()
}

fn mixed_batch() -> QueueEvent {
    QueueEvent {
        records: vec![
            QueueRecord::with_body(body_with(&json!({
                "Records": [
                    { "s3": { "bucket": { "name": "b1" }, "object": { "key": "k1" } } },
                    { "s3": { "bucket": { "name": "b1" }, "object": { "key": "k2" } } }
                ]
            }))),
            QueueRecord::with_body(body_with(&json!({ "foo": 1 }))),
            QueueRecord::with_body("garbage"),
            QueueRecord::default(),
        ],
    }
}

#[test]
fn test_process_batch_summary() {
    let summary = process_batch(&mixed_batch());

    assert_eq!(
        summary,
        BatchSummary {
            records: 4,
            uploads: 2,
            no_s3_records: 1,
            failures: 2,
        }
    );
}

#[test]
fn test_process_empty_batch() {
    let summary = process_batch(&QueueEvent { records: vec![] });
    assert_eq!(summary, BatchSummary::default());
}

#[tokio::test]
async fn test_handler_always_returns_200() {
    let event = LambdaEvent::new(mixed_batch(), Context::default());
    let response = s3_upload_notifier::worker::handler(event).await.unwrap();

    assert_eq!(response, HandlerResponse { status_code: 200 });
}

#[tokio::test]
async fn test_handler_all_records_failing_still_returns_200() {
    let batch = QueueEvent {
        records: vec![QueueRecord::with_body("{"), QueueRecord::with_body("[")],
    };
    let response = s3_upload_notifier::worker::handler(LambdaEvent::new(batch, Context::default()))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
}

/// Collects everything the fmt subscriber writes.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CapturedLog {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[test]
fn test_process_batch_logs_one_line_per_notice_in_order() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::INFO)
        .finish();

    tracing::subscriber::with_default(subscriber, || process_batch(&mixed_batch()));

    let lines = log.lines();
    assert_eq!(lines.len(), 5, "Unexpected log output: {lines:#?}");

    let expected = [
        ("INFO", "New file uploaded: s3://b1/k1"),
        ("INFO", "New file uploaded: s3://b1/k2"),
        ("WARN", r#"SNS message does not contain S3 Records: {"foo":1}"#),
        ("ERROR", "Error processing record: record body is not a valid SNS envelope"),
        ("ERROR", "Error processing record: missing field 'body'"),
    ];
    for (line, (level, text)) in lines.iter().zip(expected) {
        assert!(line.trim_start().starts_with(level), "Wrong level in {line:?}");
        assert!(line.contains(text), "Expected {text:?} in {line:?}");
    }
}

#[test]
fn test_process_batch_logs_nothing_for_empty_batch() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        process_batch(&QueueEvent { records: vec![] })
    });

    assert!(log.lines().is_empty());
}
