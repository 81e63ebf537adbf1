//! Substitution tables for the payload codec.
//!
//! The cipher alphabet is a keyboard-row permutation of the Base64 alphabet:
//! letters follow QWERTY order, digits are rotated by five and the three
//! Base64 symbols `+/=` become `-_.`. Bytes outside the alphabet map to
//! themselves.

/// Standard Base64 alphabet, padding included.
const PLAIN: &[u8; 65] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Cipher character for each entry of [`PLAIN`], position for position.
const CIPHER: &[u8; 65] = b"QWERTYUIOPASDFGHJKLZXCVBNMqwertyuiopasdfghjklzxcvbnm5678901234-_.";

const fn build_table(from: &[u8; 65], to: &[u8; 65]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    let mut j = 0;
    while j < from.len() {
        table[from[j] as usize] = to[j];
        j += 1;
    }
    table
}

static ENCODE: [u8; 256] = build_table(PLAIN, CIPHER);
static DECODE: [u8; 256] = build_table(CIPHER, PLAIN);

/// Map a Base64 character to its cipher character.
#[inline]
pub(crate) fn encode_char(c: char) -> char {
    if c.is_ascii() {
        ENCODE[c as usize] as char
    } else {
        c
    }
}

/// Map a cipher character back to its Base64 character.
#[inline]
pub(crate) fn decode_char(c: char) -> char {
    if c.is_ascii() {
        DECODE[c as usize] as char
    } else {
        c
    }
}
