use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::errors::PayseraError;

/// Everything except `A-Z a-z 0-9 _ . - ~` is percent-encoded. Spaces are handled separately and become `+`.
const FORM_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC.remove(b' ').remove(b'_').remove(b'.').remove(b'-').remove(b'~');

/// Form-encodes a single key or value. `%XX` escapes are upper case and a space is written as `+`.
pub fn escape(s: &str) -> String {
    utf8_percent_encode(s, FORM_ESCAPE).to_string().replace(' ', "+")
}

/// Reverses [`escape`]. Applying it to text that contains no `%` or `+` returns the text unchanged.
pub fn unescape(s: &str) -> Result<String, PayseraError> {
    String::from_utf8(unescape_bytes(s))
        .map_err(|e| PayseraError::DecodeError(format!("Escaped text is not valid UTF-8. {e}")))
}

/// Like [`unescape`], but without requiring the result to be UTF-8.
pub fn unescape_bytes(s: &str) -> Vec<u8> {
    percent_decode_str(&s.replace('+', " ")).collect()
}

/// Builds the canonical query string: every pair escaped as `key=value`, the pairs sorted by their *encoded* text,
/// then joined with `&`.
pub fn encode_query<I, K, V>(fields: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs = fields
        .into_iter()
        .map(|(k, v)| format!("{}={}", escape(k.as_ref()), escape(v.as_ref())))
        .collect::<Vec<String>>();
    pairs.sort();
    pairs.join("&")
}

/// Splits `key=value&key=value` into a map, unescaping keys and values independently. Only the first `=` of a pair
/// separates key from value. A later duplicate key replaces an earlier one.
pub fn parse_query(query: &str) -> Result<BTreeMap<String, String>, PayseraError> {
    let mut result = BTreeMap::new();
    if query.is_empty() {
        return Ok(result);
    }
    for pair in query.split('&') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| PayseraError::ParseError(format!("'{pair}' is not a key=value pair")))?;
        let key = unescape(key).map_err(|e| PayseraError::ParseError(e.to_string()))?;
        let value = unescape(value).map_err(|e| PayseraError::ParseError(e.to_string()))?;
        result.insert(key, value);
    }
    Ok(result)
}
