// Lambda bootstrap entry point for the SQS worker

use lambda_runtime::{Error, run, service_fn};
use s3_upload_notifier::core::config::AppConfig;
use s3_upload_notifier::worker;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = AppConfig::from_env()?;
    s3_upload_notifier::setup_logging(&config)?;

    run(service_fn(worker::handler)).await
}
