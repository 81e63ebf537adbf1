//! encode / decode handlers

use std::path::Path;

use anyhow::{Context, Result};

use wallpipe::codec;
use wallpipe::Dispatcher;

use super::read_input;

pub fn handle_encode(input: &Path) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", codec::encode(&text));
    Ok(())
}

/// Decode a payload, optionally parsing the result as JSON.
pub async fn handle_decode(dispatcher: &Dispatcher, input: &Path, parse: bool) -> Result<()> {
    let raw = read_input(input)?;
    let payload = raw.trim();

    if parse {
        let value = dispatcher
            .decode_and_parse(payload)
            .await
            .with_context(|| format!("Failed to decode {}", input.display()))?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let text = dispatcher
            .decode(payload)
            .await
            .with_context(|| format!("Failed to decode {}", input.display()))?;
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
