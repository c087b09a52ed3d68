//! Result repair and parsing. Turns unreliable model text into the analysis schema.
//!
//! Order matters: cut the outermost `{ ... }` span first, then drop trailing
//! commas, then deserialize.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepairError {
    #[error("model output contains no JSON object")]
    NoJsonObject,

    #[error("model output is not valid JSON after repair: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Slice from the first `{` to the last `}` inclusive.
///
/// Drops markdown fences and any commentary the model wraps around the object.
pub fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Removes commas that directly precede a closing `]` or `}`.
///
/// Whitespace between the comma and the bracket is kept; commas inside string
/// literals are never touched.
pub fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in json.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' if json[i + 1..].trim_start().starts_with(&[']', '}'][..]) => {}
            _ => out.push(c),
        }
    }

    out
}

/// Span extraction followed by trailing-comma removal.
pub fn repair_json(raw: &str) -> Result<String, RepairError> {
    let span = extract_json_span(raw).ok_or(RepairError::NoJsonObject)?;
    Ok(strip_trailing_commas(span))
}

/// Repairs `raw` and deserializes it into `T`.
pub fn parse_model_output<T: DeserializeOwned>(raw: &str) -> Result<T, RepairError> {
    let repaired = repair_json(raw)?;
    Ok(serde_json::from_str(&repaired)?)
}
