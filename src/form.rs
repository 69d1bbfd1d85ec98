//! Form parsing module
//!
//! Merges query-string and urlencoded-body fields into one mapping.
//! Decoding is strict: a malformed percent escape is an error, not a
//! pass-through, so the caller can surface it as a 500.

use std::collections::BTreeMap;
use std::fmt;

/// Parsed form fields. A field name may repeat, so each key holds the
/// ordered list of values seen for it. `BTreeMap` keeps the stringified
/// output deterministic.
pub type FormMap = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    InvalidEscape(String),
    InvalidUtf8,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEscape(seq) => write!(f, "invalid URL escape \"{seq}\""),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8 in form data"),
        }
    }
}

impl std::error::Error for FormError {}

/// Parse a `k=v&k2=v2` string into an existing map, appending values.
pub fn parse_pairs(input: &str, form: &mut FormMap) -> Result<(), FormError> {
    for pair in input.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        let value = decode_component(value)?;
        form.entry(key).or_default().push(value);
    }
    Ok(())
}

/// Merge query string and body fields into one mapping. Query pairs are
/// inserted first, body pairs appended after.
pub fn parse_form(query: Option<&str>, body: Option<&str>) -> Result<FormMap, FormError> {
    let mut form = FormMap::new();
    if let Some(query) = query {
        parse_pairs(query, &mut form)?;
    }
    if let Some(body) = body {
        parse_pairs(body, &mut form)?;
    }
    Ok(form)
}

/// Decode one urlencoded component: `+` is a space, `%XX` is a byte.
fn decode_component(s: &str) -> Result<String, FormError> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = || {
                    let end = (i + 3).min(bytes.len());
                    FormError::InvalidEscape(String::from_utf8_lossy(&bytes[i..end]).into_owned())
                };
                let hex = bytes.get(i + 1..i + 3).ok_or_else(escape)?;
                let hi = hex_digit(hex[0]).ok_or_else(escape)?;
                let lo = hex_digit(hex[1]).ok_or_else(escape)?;
                out.push((hi << 4) | lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|_| FormError::InvalidUtf8)
}

pub(crate) const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Stringify a form mapping as `map[color:[purple] size:[s m]]`, the
/// format the diagnostic dump echoes to clients.
pub fn format_form(form: &FormMap) -> String {
    let fields: Vec<String> = form
        .iter()
        .map(|(key, values)| format!("{key}:[{}]", values.join(" ")))
        .collect();
    format!("map[{}]", fields.join(" "))
}
