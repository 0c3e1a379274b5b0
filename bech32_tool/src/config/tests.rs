use std::ffi::OsString;

use serde::Deserialize as _;
use toml::Table;

use super::setup::{Builder, Layer as _, TomlText, insert_vars};
use super::*;

#[test]
fn default_config_is_valid() {
    let config: Config = Builder::new()
        .add_layer(TomlText::new(DEFAULT))
        .build()
        .expect("default config must deserialize");

    assert_eq!(config.codec.variant, Variant::Bech32m);
    assert_eq!(config.codec.case, Case::Lower);
    assert_eq!(config.codec.format, PayloadFormat::Hex);
    assert_eq!(config.codec.max_len, None);

    let (appenders, errors) = config.log.appenders_lossy(&crate::logging::deserializers());
    assert!(errors.is_empty(), "log appenders must be valid: {errors:?}");
    assert_eq!(appenders.len(), 1);
}

#[test]
fn later_layers_take_precedence() {
    let config: Config = Builder::new()
        .add_layer(TomlText::new(DEFAULT))
        .add_layer(TomlText::new(
            r#"
            [codec]
            variant = "bech32"
            max_len = 90
            "#,
        ))
        .build()
        .expect("config must deserialize");

    assert_eq!(config.codec.variant, Variant::Bech32);
    assert_eq!(config.codec.max_len, Some(90));
    // untouched keys keep their defaults
    assert_eq!(config.codec.format, PayloadFormat::Hex);
}

#[test]
fn empty_config_uses_defaults() {
    let config: Config = Builder::new().build().expect("empty config is valid");
    assert_eq!(config.codec.variant, Variant::Bech32m);
    assert_eq!(config.codec.case, Case::Lower);
}

#[test]
fn invalid_layer_fails() {
    Builder::new()
        .add_layer(TomlText::new("[codec"))
        .build::<Config>()
        .expect_err("toml is malformed");

    Builder::new()
        .add_layer(TomlText::new("codec.variant = \"bech64\""))
        .build::<Config>()
        .expect_err("variant is unknown");
}

#[test]
fn env_vars_nest_and_parse() {
    let vars = [
        ("BECH32_TOOL__CODEC__VARIANT", "bech32"),
        ("BECH32_TOOL__CODEC__MAX_LEN", "120"),
        ("BECH32_TOOL__CODEC__CASE", "upper"),
        ("UNRELATED__CODEC__FORMAT", "base64"),
    ]
    .map(|(k, v)| (OsString::from(k), OsString::from(v)));

    let mut table = Table::new();
    TomlText::new(DEFAULT)
        .extend_table(&mut table)
        .expect("default config must parse");
    insert_vars(&mut table, ENV_PREFIX, vars);

    let config: Config = Config::deserialize(table).expect("config must deserialize");
    assert_eq!(config.codec.variant, Variant::Bech32);
    assert_eq!(config.codec.max_len, Some(120));
    assert_eq!(config.codec.case, Case::Upper);
    assert_eq!(config.codec.format, PayloadFormat::Hex);
}
