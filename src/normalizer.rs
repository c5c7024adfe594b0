//! Provider record normalization.
//!
//! Turns one raw provider-shaped record into a display-ready candidate:
//! empty and null fields are removed (never rendered as "None" or ""),
//! list values are joined into comma-delimited text, and the one
//! kind-designated artwork field is split out of the display set.

use serde_json::Value;

use crate::backends::ProviderRecord;
use crate::protocol::{CandidateRecord, MediaKind};

/// Renders a JSON value as display text. Returns `None` for null, blank
/// strings, empty lists, and anything without a sensible text form.
fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        // Adapters flatten provider objects before this point.
        Value::Object(_) => None,
    }
}

/// Cleans one provider record into a candidate. Deterministic and pure.
pub fn normalize(kind: MediaKind, record: &ProviderRecord) -> CandidateRecord {
    let artwork_field = kind.artwork_field();
    let mut display_fields = Vec::new();
    let mut artwork_url = None;
    for (name, value) in record {
        if name == artwork_field {
            artwork_url = display_value(value);
            continue;
        }
        if let Some(text) = display_value(value) {
            display_fields.push((name.clone(), text));
        }
    }
    CandidateRecord {
        kind,
        display_fields,
        artwork_url,
    }
}
