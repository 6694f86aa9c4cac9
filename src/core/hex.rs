// src/core/hex.rs
// Hex digests <-> URL-safe unpadded base64, a third shorter and safe in paths.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexError {
    #[error("not a hex digit: {0:?}")]
    InvalidHex(char),
    #[error("not url-safe base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// `"0aff"` -> `"Cv8"`. Odd-length input gets a leading `0`.
pub fn compress_hex(hex: &str) -> Result<String, HexError> {
    let digits: Vec<u8> = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(HexError::InvalidHex(c)))
        .collect::<Result<_, _>>()?;

    let mut bytes = Vec::with_capacity(digits.len() / 2 + 1);
    let mut rest = digits.as_slice();
    if rest.len() % 2 == 1 {
        bytes.push(rest[0]);
        rest = &rest[1..];
    }
    bytes.extend(rest.chunks_exact(2).map(|p| (p[0] << 4) | p[1]));

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Inverse of [`compress_hex`]; uppercase hex out.
pub fn expand_hex(compact: &str) -> Result<String, HexError> {
    let bytes = URL_SAFE_NO_PAD.decode(compact.trim_end_matches('='))?;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    Ok(out)
}
