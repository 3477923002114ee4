//! Textual encodings for file content.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Errors converting between bytes and text.
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("unknown encoding: {0}")]
    Unknown(String),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("content is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("content is not valid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("character {0:?} cannot be represented in latin1")]
    Unrepresentable(char),
}

/// How file bytes are turned into text on read, and text into bytes on write.
///
/// `Base64` and `Hex` render the raw bytes as text when reading and expect
/// encoded text when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Encoding {
    #[default]
    Utf8,
    Latin1,
    Base64,
    Hex,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf8",
            Encoding::Latin1 => "latin1",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        }
    }

    /// Turn raw file bytes into text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            Encoding::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            Encoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Encoding::Hex => Ok(hex::encode(bytes)),
        }
    }

    /// Turn text into the bytes to store.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Latin1 => text
                .chars()
                .map(|c| u8::try_from(c).map_err(|_| EncodingError::Unrepresentable(c)))
                .collect(),
            Encoding::Base64 => Ok(base64::engine::general_purpose::STANDARD.decode(text)?),
            Encoding::Hex => Ok(hex::decode(text)?),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Encoding::Utf8),
            "latin1" | "binary" => Ok(Encoding::Latin1),
            "base64" => Ok(Encoding::Base64),
            "hex" => Ok(Encoding::Hex),
            _ => Err(EncodingError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<String> for Encoding {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for Encoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
