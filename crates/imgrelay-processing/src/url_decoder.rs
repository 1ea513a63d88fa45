//! Source URL decoding
//!
//! The trailing path segments carry the source image URL in one of two forms:
//!
//! * base64 (default): segments joined without separator, optional `.ext` suffix
//! * plain: `plain/<percent-escaped URL>[@ext]`

use base64::Engine;
use imgrelay_core::{ErrorKind, ParseError, ParseResult};
use percent_encoding::percent_decode_str;

const URL_TOKEN_PLAIN: &str = "plain";

/// Decoded source URL and the explicit output extension, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedUrl {
    pub url: String,
    pub extension: Option<String>,
}

pub fn decode_url(parts: &[String], base_url: &str) -> ParseResult<DecodedUrl> {
    match parts {
        [] => Err(ParseError::new(ErrorKind::EmptyUrl, "Image URL is missing")),
        [first, rest @ ..] if first == URL_TOKEN_PLAIN && !rest.is_empty() => {
            decode_plain_url(rest, base_url)
        }
        _ => decode_base64_url(parts, base_url),
    }
}

fn decode_base64_url(parts: &[String], base_url: &str) -> ParseResult<DecodedUrl> {
    let encoded = parts.concat();
    let (payload, extension) = split_format(&encoded, '.')?;

    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| ParseError::invalid_argument(format!("Invalid url encoding: {}", encoded)))?;

    Ok(DecodedUrl {
        url: format!("{}{}", base_url, decoded),
        extension,
    })
}

fn decode_plain_url(parts: &[String], base_url: &str) -> ParseResult<DecodedUrl> {
    let encoded = parts.join("/");
    let (escaped, extension) = split_format(&encoded, '@')?;

    if !is_well_formed_escape(escaped) {
        return Err(ParseError::invalid_argument(format!(
            "Invalid url encoding: {}",
            encoded
        )));
    }

    let unescaped = percent_decode_str(escaped)
        .decode_utf8()
        .map_err(|_| ParseError::invalid_argument(format!("Invalid url encoding: {}", encoded)))?;

    Ok(DecodedUrl {
        url: format!("{}{}", base_url, unescaped),
        extension,
    })
}

/// Split `payload[<delimiter>ext]`; more than one delimiter is rejected.
fn split_format(encoded: &str, delimiter: char) -> ParseResult<(&str, Option<String>)> {
    let url_parts: Vec<&str> = encoded.split(delimiter).collect();

    if url_parts[0].is_empty() {
        return Err(ParseError::empty_url());
    }

    if url_parts.len() > 2 {
        return Err(ParseError::new(
            ErrorKind::MultipleFormats,
            format!("Multiple formats are specified: {}", encoded),
        ));
    }

    let extension = url_parts
        .get(1)
        .filter(|ext| !ext.is_empty())
        .map(|ext| ext.to_string());

    Ok((url_parts[0], extension))
}

/// Every `%` must start a two-hex-digit escape.
fn is_well_formed_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
