//! Error types for `obt-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("payload is not valid JSON: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("payload is not a JSON object")]
  PayloadNotObject,

  #[error("payload encoding produced invalid UTF-8: {0}")]
  Utf8(#[from] std::string::FromUtf8Error),

  #[error("torque-off value {0:?} is not a number")]
  InvalidTorque(String),

  #[error("torque-off value {0:?} is not finite")]
  NonFiniteTorque(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
