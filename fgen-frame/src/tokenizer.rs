//! Frame text tokenizer
//!
//! All splitting is non-destructive: tokens are sub-slices of the text they
//! were taken from, so the stored frame text is never modified.

use fgen_core::{Error, Result};

/// Split frame text on `/` into layer tokens.
///
/// Tokens are trimmed and empty tokens (a trailing `/` or `//`) are skipped.
pub fn split_layers(text: &str, max: usize) -> Result<Vec<&str>> {
    let layers: Vec<&str> = text
        .split('/')
        .map(str::trim)
        .filter(|layer| !layer.is_empty())
        .collect();

    if layers.len() > max {
        return Err(Error::TooManyLayers(max));
    }
    Ok(layers)
}

/// Split a layer's parameter text on `,` and whitespace.
///
/// `params` is everything after the opening parenthesis; a closing
/// parenthesis is removed if present. An empty list yields no tokens.
pub fn split_params(params: &str, max: usize) -> Result<Vec<&str>> {
    let inner = strip_parens(params);
    let tokens: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    if tokens.len() > max {
        return Err(Error::TooManyParams {
            text: inner.to_string(),
            max,
        });
    }
    Ok(tokens)
}

/// Split `key=value` into exactly two non-empty tokens
pub fn split_kv(param: &str) -> Result<(&str, &str)> {
    let mut parts = param.split('=').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.is_empty() && !value.is_empty() => Ok((key, value)),
        _ => Err(Error::KeyValue(param.to_string())),
    }
}

/// Text between the parentheses of a layer token
pub fn strip_parens(params: &str) -> &str {
    let inner = params.trim();
    let inner = inner.strip_prefix('(').unwrap_or(inner);
    inner.strip_suffix(')').unwrap_or(inner).trim()
}

/// Parse an unsigned number given in decimal or `0x` hex
pub fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: TryFrom<u64>,
{
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };

    let number = parsed.map_err(|_| Error::invalid_value(key, value, "not a number"))?;
    T::try_from(number).map_err(|_| Error::invalid_value(key, value, "out of range"))
}
