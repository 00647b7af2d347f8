use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum KdfError {
  #[error("Invalid scrypt parameters: {0}")]
  InvalidParameter(String),
  #[error("Unable to allocate {0} bytes for key derivation")]
  OutOfMemory(usize),
}

pub type KdfResult<T> = Result<T, KdfError>;
