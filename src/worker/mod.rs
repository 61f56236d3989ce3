//! SQS worker: unwraps SNS-wrapped S3 notifications and logs the uploads

pub mod handler;
pub mod unwrap;

// Re-export the main handler for convenience
pub use handler::handler;
