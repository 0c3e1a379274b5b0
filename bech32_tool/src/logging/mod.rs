use log4rs::config::{Deserializers, RawConfig};

mod default_pattern;

pub fn deserializers() -> Deserializers {
    let mut d = Deserializers::new();
    d.insert("default", default_pattern::DefaultPatternDeserializer);
    d
}

/// Initializes the global logger from the `log` section of the config.
pub fn init(config: RawConfig) -> anyhow::Result<()> {
    let (appenders, errors) = config.appenders_lossy(&deserializers());
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let config = log4rs::Config::builder()
        .appenders(appenders)
        .loggers(config.loggers())
        .build(config.root())?;

    log4rs::init_config(config)?;
    Ok(())
}
