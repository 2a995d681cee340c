use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::state::Mode;
use crate::wizard::CREDENTIAL_PLACEHOLDER;

/// Direction the storage connection moves data in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Import,
    Export,
}

impl Target {
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Import => "import",
            Target::Export => "export",
        }
    }
}

/// One remote file descriptor from the listing endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RemoteFile {
    #[serde(alias = "name")]
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Page size for the file preview listing.
pub const PREVIEW_LIMIT: u32 = 10;

/// Builds the submission body from the form values.
///
/// In edit mode, entries that are empty, null, or still equal to the
/// credential placeholder are omitted so the backend leaves them
/// unchanged; the existing record id rides along when present.
pub fn clean_payload(
    values: &Map<String, Value>,
    mode: Mode,
    storage_id: Option<i64>,
) -> Value {
    let mut body = Map::new();
    for (name, value) in values {
        if mode == Mode::Edit {
            let unchanged = value.is_null()
                || value
                    .as_str()
                    .map(|s| s.is_empty() || s == CREDENTIAL_PLACEHOLDER)
                    .unwrap_or(false);
            if unchanged {
                continue;
            }
        }
        body.insert(name.clone(), value.clone());
    }
    if let Some(id) = storage_id {
        body.insert("id".to_string(), Value::from(id));
    }
    Value::Object(body)
}

/// Human-readable byte count for the preview listing.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB", "PB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exp])
    } else {
        format!("{} {}", rounded, UNITS[exp])
    }
}
