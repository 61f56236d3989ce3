use lambda_runtime::{Error, LambdaEvent};
use tracing::{error, info, info_span, warn};

use super::unwrap::{Notice, RecordReport, unwrap_batch};
use crate::core::models::{HandlerResponse, QueueEvent};

/// Counts for the end-of-batch log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub records: usize,
    pub uploads: usize,
    pub no_s3_records: usize,
    pub failures: usize,
}

impl BatchSummary {
    #[must_use]
    pub fn from_reports(reports: &[RecordReport]) -> Self {
        let mut summary = Self {
            records: reports.len(),
            ..Self::default()
        };
        for notice in reports.iter().flat_map(|report| &report.notices) {
            match notice {
                Notice::Uploaded(_) => summary.uploads += 1,
                Notice::NoS3Records(_) => summary.no_s3_records += 1,
                Notice::Failed(_) => summary.failures += 1,
            }
        }
        summary
    }
}

/// Unwraps and logs a whole batch. Never fails; per-record problems only show up in the log.
pub fn process_batch(batch: &QueueEvent) -> BatchSummary {
    let reports = unwrap_batch(batch);

    for report in &reports {
        let span = info_span!(
            "record",
            message_id = report.message_id.as_deref().unwrap_or("-")
        );
        let _guard = span.enter();
        for notice in &report.notices {
            log_notice(notice);
        }
    }

    BatchSummary::from_reports(&reports)
}

fn log_notice(notice: &Notice) {
    match notice {
        Notice::Uploaded(upload) => info!(
            bucket = %upload.bucket,
            decoded_key = %upload.decoded_key(),
            "{notice}"
        ),
        Notice::NoS3Records(_) => warn!("{notice}"),
        Notice::Failed(_) => error!("{notice}"),
    }
}

/// Lambda handler for the SQS trigger. Always answers `{"statusCode": 200}`.
pub async fn function_handler(event: LambdaEvent<QueueEvent>) -> Result<HandlerResponse, Error> {
    let (batch, context) = event.into_parts();

    #[cfg(feature = "debug-logs")]
    info!("Received SQS batch: {:?}", batch);

    #[cfg(not(feature = "debug-logs"))]
    info!(
        request_id = %context.request_id,
        "Received SQS batch with {} records",
        batch.records.len()
    );

    let summary = process_batch(&batch);

    info!(
        request_id = %context.request_id,
        records = summary.records,
        uploads = summary.uploads,
        no_s3_records = summary.no_s3_records,
        failures = summary.failures,
        "Finished processing SQS batch"
    );

    Ok(HandlerResponse::ok())
}

pub use self::function_handler as handler;
