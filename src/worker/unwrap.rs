//! Unwrapping of SQS records into the S3 uploads carried by their SNS notifications.
//!
//! Each record is handled on its own: whatever goes wrong while decoding one record
//! becomes a [`Notice::Failed`] for that record and the rest of the batch is unaffected.

use std::fmt;

use serde_json::Value;

use crate::core::models::{
    QueueEvent, QueueRecord, S3EventRecord, S3Upload, SnsEnvelope, from_object,
};
use crate::errors::UnwrapError;

/// A single loggable outcome of unwrapping a record.
#[derive(Debug)]
pub enum Notice {
    Uploaded(S3Upload),
    /// The SNS message decoded fine but carried no `Records` key.
    NoS3Records(Value),
    Failed(UnwrapError),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Uploaded(upload) => write!(f, "New file uploaded: {upload}"),
            Notice::NoS3Records(payload) => {
                write!(f, "SNS message does not contain S3 Records: {payload}")
            }
            Notice::Failed(error) => write!(f, "Error processing record: {error}"),
        }
    }
}

/// Notices produced by one record, in the order they occurred.
#[derive(Debug)]
pub struct RecordReport {
    pub message_id: Option<String>,
    pub notices: Vec<Notice>,
}

impl RecordReport {
    pub fn uploads(&self) -> impl Iterator<Item = &S3Upload> {
        self.notices.iter().filter_map(|notice| match notice {
            Notice::Uploaded(upload) => Some(upload),
            _ => None,
        })
    }

    #[must_use]
    pub fn failed(&self) -> bool {
        self.notices
            .iter()
            .any(|notice| matches!(notice, Notice::Failed(_)))
    }
}

/// Unwraps one SQS record.
///
/// Uploads extracted before a failing sub-event are kept; the failure is appended
/// after them and the remaining sub-events of the record are skipped.
#[must_use]
pub fn unwrap_record(record: &QueueRecord) -> Vec<Notice> {
    let mut notices = Vec::new();
    if let Err(e) = collect_notices(record, &mut notices) {
        notices.push(Notice::Failed(e));
    }
    notices
}

/// Unwraps every record of the batch, preserving input order.
#[must_use]
pub fn unwrap_batch(batch: &QueueEvent) -> Vec<RecordReport> {
    batch
        .records
        .iter()
        .map(|record| RecordReport {
            message_id: record.message_id.clone(),
            notices: unwrap_record(record),
        })
        .collect()
}

fn collect_notices(record: &QueueRecord, out: &mut Vec<Notice>) -> Result<(), UnwrapError> {
    let payload = notification_payload(record)?;

    if payload.get("Records").is_none() {
        out.push(Notice::NoS3Records(payload));
        return Ok(());
    }

    let sub_events = payload
        .get("Records")
        .and_then(Value::as_array)
        .ok_or_else(|| UnwrapError::UnexpectedShape("'Records' is not a list".to_string()))?;

    for sub_event in sub_events {
        out.push(Notice::Uploaded(s3_upload(sub_event)?));
    }

    Ok(())
}

/// Body -> SNS envelope -> decoded `Message`.
fn notification_payload(record: &QueueRecord) -> Result<Value, UnwrapError> {
    let body = record
        .body
        .as_deref()
        .ok_or_else(|| UnwrapError::missing("body"))?;

    let body: Value = serde_json::from_str(body).map_err(UnwrapError::InvalidBody)?;
    let envelope: SnsEnvelope = from_object(&body).map_err(UnwrapError::InvalidBody)?;
    let message = envelope
        .message
        .ok_or_else(|| UnwrapError::missing("Message"))?;

    serde_json::from_str(&message).map_err(UnwrapError::InvalidMessage)
}

fn s3_upload(sub_event: &Value) -> Result<S3Upload, UnwrapError> {
    let event: S3EventRecord = from_object(sub_event).map_err(UnwrapError::InvalidSubEvent)?;
    let s3 = event.s3.ok_or_else(|| UnwrapError::missing("s3"))?;

    let bucket = s3
        .bucket
        .ok_or_else(|| UnwrapError::missing("s3.bucket"))?
        .name
        .ok_or_else(|| UnwrapError::missing("s3.bucket.name"))?;
    let key = s3
        .object
        .ok_or_else(|| UnwrapError::missing("s3.object"))?
        .key
        .ok_or_else(|| UnwrapError::missing("s3.object.key"))?;

    Ok(S3Upload { bucket, key })
}
