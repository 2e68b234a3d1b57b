//! Encoder configuration.

use crate::codec::error::CodecError;
use serde::{Deserialize, Serialize};

/// Binary layout of an encoded table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One `u32` per cell; every row is as long as the event count
    #[default]
    FixedWidth,
    /// Variable-stride packing; no format is defined yet
    Strided,
}

/// Options for [`encode`](crate::codec::encode).
///
/// # Example
///
/// ```rust
/// use arrowfsm::codec::{CodecConfig, Layout};
///
/// let config = CodecConfig::from_json(r#"{ "name_token_len": 12 }"#).unwrap();
/// assert_eq!(config.layout, Layout::FixedWidth);
/// assert_eq!(config.name_token_len, 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub layout: Layout,
    /// Length of the random hex token naming anonymous identifiers
    pub name_token_len: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            layout: Layout::FixedWidth,
            name_token_len: 8,
        }
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Token length; values outside `1..=32` are clamped when names are generated.
    pub fn name_token_len(mut self, len: usize) -> Self {
        self.name_token_len = len;
        self
    }

    /// Load a configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        serde_json::from_str(json).map_err(|e| CodecError::DeserializationFailed(e.to_string()))
    }
}
