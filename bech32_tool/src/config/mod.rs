use bech32_codec::{Case, Variant};
use serde::Deserialize;

use crate::payload::PayloadFormat;

pub mod setup;
#[cfg(test)]
mod tests;

/// The built-in configuration, loaded as the first layer.
pub const DEFAULT: &str = include_str!("../../assets/default_config.toml");

/// Prefix of environment variables that override configuration keys.
pub const ENV_PREFIX: &str = "BECH32_TOOL__";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub log: log4rs::config::RawConfig,
}

#[derive(Debug, Deserialize)]
pub struct CodecConfig {
    #[serde(default = "default_variant")]
    pub variant: Variant,
    #[serde(default)]
    pub case: Case,
    #[serde(default)]
    pub format: PayloadFormat,
    /// Strings longer than this are rejected, both when decoding and encoding.
    pub max_len: Option<usize>,
}

const fn default_variant() -> Variant {
    Variant::Bech32m
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            case: Case::default(),
            format: PayloadFormat::default(),
            max_len: None,
        }
    }
}
