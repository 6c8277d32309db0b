use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Display;

/// Number of symbols in a generated short code.
pub const CODE_LENGTH: usize = 6;

/// The 32 symbols generated codes are drawn from (lowercase letters and `2`-`7`).
pub const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// A short code identifier for a shortened URL.
///
/// Generated codes are always [`CODE_LENGTH`] symbols from [`ALPHABET`].
/// Codes read back from the durable log are not re-validated, so a store
/// replays exactly what was persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wraps a code without checking its shape.
    ///
    /// Lookups take whatever the client sent: an ill-shaped code simply
    /// isn't found.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Builds a code from symbols already known to be in the alphabet.
    pub fn from_symbols(symbols: [u8; CODE_LENGTH]) -> Self {
        Self(symbols.iter().map(|&b| b as char).collect())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ShortCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
