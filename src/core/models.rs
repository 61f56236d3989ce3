use std::fmt;

use percent_encoding::percent_decode_str;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// SQS batch delivered to the function.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueEvent {
    #[serde(rename = "Records")]
    pub records: Vec<QueueRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl QueueRecord {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            message_id: None,
            body: Some(body.into()),
        }
    }
}

/// SNS notification as it arrives inside an SQS body.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

/// One entry of an S3 notification's `Records` list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3EventRecord {
    #[serde(default, deserialize_with = "object_or_null")]
    pub s3: Option<S3Entity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Entity {
    #[serde(default, deserialize_with = "object_or_null")]
    pub bucket: Option<S3Bucket>,
    #[serde(default, deserialize_with = "object_or_null")]
    pub object: Option<S3Object>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Bucket {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct S3Object {
    #[serde(default)]
    pub key: Option<String>,
}

/// Decodes `value` into `T` only when it is a JSON object.
///
/// Derived struct impls also accept arrays as positional fields, which would let
/// `[["b1"], ["k1"]]` pass for a bucket/object pair without any of the keys.
pub fn from_object<T: DeserializeOwned>(value: &Value) -> Result<T, serde_json::Error> {
    if !value.is_object() {
        return Err(not_an_object(value));
    }
    T::deserialize(value)
}

fn not_an_object(value: &Value) -> serde_json::Error {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    serde_json::Error::custom(format!("expected a JSON object, found {found}"))
}

fn object_or_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => from_object(&value).map(Some).map_err(D::Error::custom),
    }
}

/// An uploaded object extracted from an S3 notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Upload {
    pub bucket: String,
    /// Key exactly as S3 put it in the notification (URL-encoded).
    pub key: String,
}

impl S3Upload {
    /// Object key with the notification encoding undone: `+` is a space, `%XX` is a byte.
    #[must_use]
    pub fn decoded_key(&self) -> String {
        let plus_as_space = self.key.replace('+', " ");
        percent_decode_str(&plus_as_space)
            .decode_utf8_lossy()
            .into_owned()
    }
}

impl fmt::Display for S3Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl HandlerResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}
