#[macro_use]
pub mod macros;

pub mod encoder;
pub mod kdf;

pub use crate::encoder::{Envelope, EncoderError, EncoderResult, ScryptEncoder};
pub use crate::kdf::{scrypt, KdfError, KdfResult, ScryptParams};
