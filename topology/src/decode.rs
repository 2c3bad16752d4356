//! Decoding of tenant parameter values.
//!
//! Values are written by several tools and may arrive as a plain JSON object,
//! a JSON object with its quotes doubled (spreadsheet style), wrapped in one
//! extra pair of quotes, or as a JSON string that itself holds the object.
//! Decoding runs in two explicit stages: [`normalize`] undoes the quoting,
//! then [`parse_nested`] parses and falls back to a second parse when the
//! first one yields a string.
use serde_json::Value;

const CP_URL_FIELD: &str = "cpUrl";

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("decoded value is not a JSON object")]
    NotAnObject,
    #[error("missing field `cpUrl`")]
    MissingCpUrl,
    #[error("field `cpUrl` is not a string")]
    CpUrlNotAString,
}

/// Extracts the `cpUrl` field from a raw parameter value.
///
/// Doubled quotes are collapsed before parsing, so a literal `""` inside the
/// value never reaches the JSON parser intact: `{"cpUrl":""}` fails as
/// invalid JSON. An empty `cpUrl` only comes back as `Ok("")` when it was
/// written escaped, e.g. `"{""cpUrl"":""""}"`.
pub fn decode_cp_url(raw: &str) -> Result<String, DecodeError> {
    let normalized = normalize(raw);
    let value = parse_nested(&normalized)?;

    let Value::Object(fields) = value else {
        return Err(DecodeError::NotAnObject);
    };

    match fields.get(CP_URL_FIELD) {
        Some(Value::String(url)) => Ok(url.clone()),
        Some(_) => Err(DecodeError::CpUrlNotAString),
        None => Err(DecodeError::MissingCpUrl),
    }
}

/// Trims whitespace, collapses doubled quotes, then removes one pair of
/// enclosing quotes if both are present.
fn normalize(raw: &str) -> String {
    let unescaped = raw.trim().replace("\"\"", "\"");

    match unescaped
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.to_string(),
        None => unescaped,
    }
}

fn parse_nested(text: &str) -> Result<Value, DecodeError> {
    match serde_json::from_str(text)? {
        Value::String(inner) => Ok(serde_json::from_str(&inner)?),
        value => Ok(value),
    }
}
