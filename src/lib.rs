//! S3 upload notifier - an SQS-triggered Lambda that logs S3 uploads.
//!
//! S3 publishes object-created notifications to an SNS topic, the topic fans out to an
//! SQS queue, and the queue triggers this function. Every record of the batch is
//! unwrapped twice (SQS body -> SNS envelope -> S3 notification) and each upload found
//! is written to the log as `New file uploaded: s3://bucket/key`.
//!
//! Records that cannot be unwrapped are logged and skipped; the function always
//! reports `{"statusCode": 200}` to the runtime.
//!
//! # Example
//!
//! ```
//! use s3_upload_notifier::core::models::QueueRecord;
//! use s3_upload_notifier::worker::unwrap::unwrap_record;
//!
//! let body = r#"{"Message": "{\"Records\":[{\"s3\":{\"bucket\":{\"name\":\"b1\"},\"object\":{\"key\":\"k1\"}}}]}"}"#;
//! let notices = unwrap_record(&QueueRecord::with_body(body));
//!
//! assert_eq!(notices.len(), 1);
//! assert_eq!(notices[0].to_string(), "New file uploaded: s3://b1/k1");
//! ```

pub mod core;
pub mod errors;
pub mod worker;

use crate::core::config::{AppConfig, LogFormat};

/// Configure structured logging for AWS Lambda environments.
///
/// JSON lines by default, which `CloudWatch` Logs can query by field; plain text when
/// `LOG_FORMAT=text`. `RUST_LOG` wins over the configured level when set.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
///
/// # Example
///
/// ```
/// use s3_upload_notifier::core::config::AppConfig;
///
/// s3_upload_notifier::setup_logging(&AppConfig::default()).unwrap();
/// ```
pub fn setup_logging(config: &AppConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().without_time().with_target(false))
            .try_init(),
    }
}
