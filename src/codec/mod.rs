//! Reading-to-payload encoding.
//!
//! A codec is a pure function from one fixed-shape reading to a topic plus
//! a byte payload; the JSON wire shapes live in [`json`].

pub mod json;

use heapless::Vec;

pub use json::{AirQualityJsonCodec, ClimateJsonCodec, LightJsonCodec, SoilJsonCodec};

/// The deployed payloads fit in well under 128 bytes (the originals
/// serialized into 64–128 byte stack buffers).
pub const PAYLOAD_MAX: usize = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodeError {
    /// Encoded form does not fit [`PAYLOAD_MAX`].
    BufferFull,
}

impl EncodeError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BufferFull => "buffer_full",
        }
    }
}

/// Encoded bytes plus destination topic, ready for the session transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishPayload {
    pub topic: &'static str,
    pub bytes: Vec<u8, PAYLOAD_MAX>,
}

impl PublishPayload {
    pub fn from_bytes(topic: &'static str, bytes: &[u8]) -> Result<Self, EncodeError> {
        Ok(Self {
            topic,
            bytes: Vec::from_slice(bytes).map_err(|_| EncodeError::BufferFull)?,
        })
    }
}

/// Pure encoder from a reading to a publishable payload.
pub trait Codec<R> {
    fn encode(&self, reading: &R) -> Result<PublishPayload, EncodeError>;
}
