use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use bech32_codec::{Case, Decoded, Variant};
use clap::{Parser, Subcommand};

mod config;
mod logging;
mod payload;

use config::{CodecConfig, Config};
use payload::PayloadFormat;

/// Encodes and decodes Bech32 and Bech32m strings.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Additional configuration file to load.
    ///
    /// It overrides `bech32_tool.toml` in the working directory and is in
    /// turn overridden by `BECH32_TOOL__*` environment variables.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decodes a string and prints its human-readable part, checksum variant,
    /// and payload.
    Decode {
        /// The encoded string.
        input: String,

        /// Only accept strings with this checksum variant.
        #[arg(short, long)]
        expect: Option<Variant>,

        /// The format to print the payload in.
        #[arg(short, long)]
        format: Option<PayloadFormat>,
    },
    /// Encodes a payload and prints the resulting string.
    Encode {
        /// The human-readable part to prefix the string with.
        #[arg(long)]
        hrp: String,

        /// The checksum variant to use.
        ///
        /// Defaults to `codec.variant` from the configuration.
        #[arg(short, long)]
        variant: Option<Variant>,

        /// Print the string in uppercase.
        #[arg(short, long)]
        upper: bool,

        /// The format the payload is given in.
        #[arg(short, long)]
        format: Option<PayloadFormat>,

        /// The payload. May be empty.
        #[arg(default_value = "")]
        payload: String,
    },
    /// Checks whether strings are valid, printing the result for each.
    ///
    /// Exits with a failure code if any string is invalid.
    Check {
        /// The encoded strings.
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Only accept strings with this checksum variant.
        #[arg(short, long)]
        expect: Option<Variant>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let Config { codec, log } = build_config(cli.config.as_deref())?;
    logging::init(log)?;

    log::debug!(
        target: "bech32_tool::version",
        "bech32_tool v{}",
        env!("CARGO_PKG_VERSION")
    );

    let res = run(cli.command, &codec);
    if let Err(why) = &res {
        log::error!("Exiting due to error: {why:?}");
    }

    log::logger().flush();
    res
}

fn build_config(extra: Option<&Path>) -> anyhow::Result<Config> {
    use crate::config::setup::{Builder, Env, File, TomlText};

    let mut builder = Builder::new()
        .add_layer(TomlText::new(config::DEFAULT))
        .add_layer(File::new("bech32_tool.toml").required(false));

    if let Some(extra) = extra {
        builder = builder.add_layer(File::new(extra));
    }

    builder.add_layer(Env::new(config::ENV_PREFIX)).build()
}

fn run(command: Command, config: &CodecConfig) -> anyhow::Result<ExitCode> {
    match command {
        Command::Decode {
            input,
            expect,
            format,
        } => {
            let decoded = decode(config, &input, expect)?;
            let format = format.unwrap_or(config.format);

            println!("hrp: {}", decoded.hrp);
            println!("variant: {}", decoded.variant);
            println!("payload: {}", format.to_text(&decoded.data));
            Ok(ExitCode::SUCCESS)
        },
        Command::Encode {
            hrp,
            variant,
            upper,
            format,
            payload,
        } => {
            let format = format.unwrap_or(config.format);
            let data = format.parse(&payload)?;
            let variant = variant.unwrap_or(config.variant);
            let case = if upper { Case::Upper } else { config.case };

            let encoded = bech32_codec::to_string_with_case(&hrp, &data, variant, case)
                .with_context(|| format!("cannot encode with hrp {hrp:?}"))?;

            check_len(config, &encoded)?;
            log::debug!("Encoded {} byte(s) as {variant}.", data.len());

            println!("{encoded}");
            Ok(ExitCode::SUCCESS)
        },
        Command::Check { inputs, expect } => {
            let mut invalid = 0usize;
            for input in &inputs {
                match decode(config, input, expect) {
                    Ok(decoded) => println!(
                        "{input}: ok ({}, {} byte(s))",
                        decoded.variant,
                        decoded.data.len()
                    ),
                    Err(why) => {
                        invalid += 1;
                        println!("{input}: {why:#}");
                    },
                }
            }

            if invalid == 0 {
                Ok(ExitCode::SUCCESS)
            } else {
                log::warn!("{invalid} of {} string(s) are invalid.", inputs.len());
                Ok(ExitCode::FAILURE)
            }
        },
    }
}

fn decode(config: &CodecConfig, input: &str, expect: Option<Variant>) -> anyhow::Result<Decoded> {
    check_len(config, input)?;

    let decoded = match expect {
        Some(expect) => bech32_codec::from_str_as(input, expect)?,
        None => bech32_codec::from_str(input)?,
    };

    log::debug!(
        "Decoded {} byte(s) with hrp {:?} as {}.",
        decoded.data.len(),
        decoded.hrp,
        decoded.variant
    );

    Ok(decoded)
}

/// Enforces the configured maximum string length, if any.
fn check_len(config: &CodecConfig, s: &str) -> anyhow::Result<()> {
    if let Some(max_len) = config.max_len {
        let len = s.chars().count();
        anyhow::ensure!(
            len <= max_len,
            "string is {len} characters long, exceeding the limit of {max_len}"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec_config(max_len: Option<usize>) -> CodecConfig {
        CodecConfig {
            max_len,
            ..CodecConfig::default()
        }
    }

    #[test]
    fn cli_parses() {
        use clap::CommandFactory as _;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "bech32_tool",
            "encode",
            "--hrp",
            "bc",
            "-v",
            "bech32",
            "--upper",
            "00ff",
        ])
        .expect("args are valid");

        let Command::Encode {
            hrp,
            variant,
            upper,
            payload,
            ..
        } = cli.command
        else {
            panic!("expected encode command");
        };

        assert_eq!(hrp, "bc");
        assert_eq!(variant, Some(Variant::Bech32));
        assert!(upper, "--upper was passed");
        assert_eq!(payload, "00ff");
    }

    #[test]
    fn unknown_variant_is_rejected() {
        Cli::try_parse_from(["bech32_tool", "decode", "a12uel5l", "-e", "bech64"])
            .expect_err("bech64 is not a variant");
    }

    #[test]
    fn decode_respects_expectation() {
        let config = codec_config(None);

        let decoded = decode(&config, "A1LQFN3A", None).expect("valid string");
        assert_eq!(decoded.variant, Variant::Bech32m);

        let err = decode(&config, "A1LQFN3A", Some(Variant::Bech32)).expect_err("wrong variant");
        assert!(
            matches!(
                err.downcast_ref::<bech32_codec::DecodeError>(),
                Some(bech32_codec::DecodeError::WrongVariant { .. })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn max_len_is_enforced() {
        let config = codec_config(Some(8));
        decode(&config, "a12uel5l", None).expect("exactly at the limit");

        let config = codec_config(Some(7));
        decode(&config, "a12uel5l", None).expect_err("over the limit");
    }
}
