//! Reversible payload obfuscation.
//!
//! Catalog payloads are shipped as `v1.` followed by a reversed,
//! character-substituted Base64 rendering of the UTF-8 text. The transform is
//! not encryption; it only keeps casual tools from reading the data.
//!
//! Encoding steps, undone in exact opposite order by [`decode`]:
//! 1. Base64 (standard alphabet, padded) of the UTF-8 bytes
//! 2. Substitute every character through the fixed cipher permutation
//! 3. Reverse the character sequence
//! 4. Prepend [`VERSION_TAG`]

mod charmap;

use base64::engine::general_purpose::STANDARD as BASE64_ENGINE;
use base64::Engine as _;

use charmap::{decode_char, encode_char};

/// Prefix identifying the payload format version.
pub const VERSION_TAG: &str = "v1.";

/// Errors raised while decoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Input does not start with the version tag.
    #[error("Invalid data format: payload does not start with 'v1.'")]
    Format,

    #[error("Invalid payload body: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Obfuscate `plain` into a versioned payload.
pub fn encode(plain: &str) -> String {
    let base64 = BASE64_ENGINE.encode(plain.as_bytes());
    let mut out = String::with_capacity(VERSION_TAG.len() + base64.len());
    out.push_str(VERSION_TAG);
    out.extend(base64.chars().rev().map(encode_char));
    out
}

/// Recover the plain text from a versioned payload.
pub fn decode(payload: &str) -> Result<String, CodecError> {
    let body = payload
        .strip_prefix(VERSION_TAG)
        .ok_or(CodecError::Format)?;
    let base64: String = body.chars().rev().map(decode_char).collect();
    let bytes = BASE64_ENGINE.decode(base64.as_bytes())?;
    Ok(String::from_utf8(bytes)?)
}

/// Whether `text` looks like a codec payload (carries the version tag).
pub fn is_encoded(text: &str) -> bool {
    text.starts_with(VERSION_TAG)
}
