//! Codec configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Shape of decoded results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeShape {
    /// Values in parameter order
    #[default]
    Array,
    /// Values keyed by parameter name
    Object,
}

/// Options shared by the parser, encoder and decoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Nesting ceiling for tuples and arrays
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Shape of decoded results
    #[serde(default)]
    pub decode_as: DecodeShape,
    /// Return a single decoded value bare instead of in a collection
    #[serde(default = "default_unwrap_single")]
    pub unwrap_single: bool,
}

fn default_max_depth() -> usize {
    64
}

fn default_unwrap_single() -> bool {
    true
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            decode_as: DecodeShape::default(),
            unwrap_single: default_unwrap_single(),
        }
    }
}

impl CodecConfig {
    /// Load from a TOML fragment; missing keys take their defaults
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Same config with a different result shape
    pub fn with_shape(mut self, shape: DecodeShape) -> Self {
        self.decode_as = shape;
        self
    }

    /// Same config with single-value unwrapping toggled
    pub fn with_unwrap_single(mut self, unwrap: bool) -> Self {
        self.unwrap_single = unwrap;
        self
    }
}
