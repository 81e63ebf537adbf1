//! Integration tests for the payload codec

use proptest::prelude::*;
use wallpipe::codec::{self, CodecError, VERSION_TAG};

use crate::helpers::load_fixture;

const CIPHER_ALPHABET: &str =
    "qwertyuiopasdfghjklzxcvbnmQWERTYUIOPASDFGHJKLZXCVBNM5678901234-_.";

#[test]
fn known_payload_decodes() {
    assert_eq!(codec::encode("hello"), "v1..3UwlCUq");
    assert_eq!(codec::decode("v1..3UwlCUq").unwrap(), "hello");
}

#[test]
fn catalog_fixture_survives_encoding() {
    let catalog = load_fixture("catalog.json");
    let encoded = codec::encode(&catalog);

    assert!(codec::is_encoded(&encoded));
    assert!(!encoded.contains("wallpapers"));
    assert_eq!(codec::decode(&encoded).unwrap(), catalog);
}

#[test]
fn missing_tag_is_a_format_error() {
    for input in ["", "v1", "v2.abc", "V1.abc", "hello"] {
        assert!(
            matches!(codec::decode(input), Err(CodecError::Format)),
            "expected format error for {input:?}"
        );
    }
}

#[test]
fn tag_alone_decodes_to_empty() {
    assert_eq!(codec::decode(VERSION_TAG).unwrap(), "");
}

proptest! {
    #[test]
    fn round_trips_printable_text(text in "\\PC*") {
        prop_assert_eq!(codec::decode(&codec::encode(&text)).unwrap(), text);
    }

    #[test]
    fn body_uses_only_cipher_alphabet(text in ".*") {
        let encoded = codec::encode(&text);
        let body = encoded.strip_prefix(VERSION_TAG).unwrap();
        prop_assert!(body.chars().all(|c| CIPHER_ALPHABET.contains(c)));
    }
}
