use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kdf::KdfError;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EncoderError {
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
  #[error("Invalid scrypt parameters: {0}")]
  InvalidParameter(String),
  #[error("Invalid hash: {0}")]
  InvalidEnvelope(String),
  #[error("Unable to allocate {0} bytes for key derivation")]
  OutOfMemory(usize),
}

pub type EncoderResult<T> = Result<T, EncoderError>;

error_convert_from!(data_encoding::DecodeError, EncoderError, InvalidEnvelope(display));
error_convert_from!(std::num::ParseIntError, EncoderError, InvalidEnvelope(display));

impl From<KdfError> for EncoderError {
  fn from(error: KdfError) -> Self {
    match error {
      KdfError::InvalidParameter(message) => EncoderError::InvalidParameter(message),
      KdfError::OutOfMemory(size) => EncoderError::OutOfMemory(size),
    }
  }
}
