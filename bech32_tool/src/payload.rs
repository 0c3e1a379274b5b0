//! Text formats payload bytes are read from and printed in.

use anyhow::Context as _;
use base64::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Lowercase hexadecimal.
    #[default]
    Hex,
    /// Standard base64 with padding.
    Base64,
}

impl PayloadFormat {
    /// Formats bytes as text.
    pub fn to_text(self, data: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(data),
            Self::Base64 => BASE64_STANDARD.encode(data),
        }
    }

    /// Parses bytes from text.
    ///
    /// Leading and trailing whitespace is ignored.
    pub fn parse(self, text: &str) -> anyhow::Result<Vec<u8>> {
        let text = text.trim();
        match self {
            Self::Hex => hex::decode(text).context("payload is not valid hex"),
            Self::Base64 => BASE64_STANDARD
                .decode(text)
                .context("payload is not valid base64"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let text = PayloadFormat::Hex.to_text(&[0x00, 0x7F, 0xAB]);
        assert_eq!(text, "007fab");

        let back = PayloadFormat::Hex.parse(" 007FAB\n").expect("valid hex");
        assert_eq!(back, &[0x00, 0x7F, 0xAB]);
    }

    #[test]
    fn base64_round_trip() {
        let text = PayloadFormat::Base64.to_text(b"bech32");
        assert_eq!(text, "YmVjaDMy");

        let back = PayloadFormat::Base64.parse(&text).expect("valid base64");
        assert_eq!(back, b"bech32");
    }

    #[test]
    fn empty_payload() {
        for format in [PayloadFormat::Hex, PayloadFormat::Base64] {
            assert_eq!(format.to_text(&[]), "");
            let back = format.parse("").expect("empty is valid");
            assert!(back.is_empty(), "{format:?} must parse to nothing");
        }
    }

    #[test]
    fn invalid_payload_fails() {
        PayloadFormat::Hex.parse("abc").expect_err("odd length");
        PayloadFormat::Hex.parse("zz").expect_err("not hex");
        PayloadFormat::Base64.parse("!!!!").expect_err("not base64");
    }
}
