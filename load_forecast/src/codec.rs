//! Model transport encoding

use crate::error::{ForecastError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts fitted models to bytes and back
pub trait ModelCodec {
    fn encode<M: Serialize>(&self, model: &M) -> Result<Vec<u8>>;

    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M>;
}

/// JSON encoding via serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent the encoded output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ModelCodec for JsonCodec {
    fn encode<M: Serialize>(&self, model: &M) -> Result<Vec<u8>> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(model)
        } else {
            serde_json::to_vec(model)
        };
        encoded.map_err(|e| ForecastError::SerializationFailed(format!("Failed to encode model: {}", e)))
    }

    fn decode<M: DeserializeOwned>(&self, bytes: &[u8]) -> Result<M> {
        serde_json::from_slice(bytes)
            .map_err(|e| ForecastError::DeserializationFailed(format!("Failed to load model: {}", e)))
    }
}
