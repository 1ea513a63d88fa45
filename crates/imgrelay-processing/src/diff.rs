//! Projection of the options that differ from the request defaults, for logs and
//! diagnostic responses.

use crate::options::ProcessingOptions;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionsDiff {
    entries: Map<String, Value>,
}

impl OptionsDiff {
    /// Fields of `current` that differ from `base`. Nested structs keep only their
    /// changed fields.
    pub fn between(base: &ProcessingOptions, current: &ProcessingOptions) -> Self {
        let base = serde_json::to_value(base).unwrap_or_default();
        let current = serde_json::to_value(current).unwrap_or_default();

        let entries = match (base, current) {
            (Value::Object(base), Value::Object(current)) => diff_objects(&base, current),
            _ => Map::new(),
        };

        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

fn diff_objects(base: &Map<String, Value>, current: Map<String, Value>) -> Map<String, Value> {
    let mut changed = Map::new();

    for (name, value) in current {
        match (base.get(&name), value) {
            (Some(Value::Object(base_obj)), Value::Object(obj)) => {
                let nested = diff_objects(base_obj, obj);
                if !nested.is_empty() {
                    changed.insert(name, Value::Object(nested));
                }
            }
            (Some(base_value), value) if *base_value == value => {}
            (_, value) => {
                changed.insert(name, value);
            }
        }
    }

    changed
}

fn write_entries(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    entries: &Map<String, Value>,
    first: &mut bool,
) -> fmt::Result {
    for (name, value) in entries {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        if let Value::Object(nested) = value {
            write_entries(f, &path, nested, first)?;
            continue;
        }

        if !*first {
            f.write_str("; ")?;
        }
        *first = false;

        match value {
            Value::String(s) => write!(f, "{}: {}", path, s)?,
            other => write!(f, "{}: {}", path, other)?,
        }
    }

    Ok(())
}

impl fmt::Display for OptionsDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        write_entries(f, "", &self.entries, &mut first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravity::GravityType;
    use crate::options::ResizeType;

    #[test]
    fn test_no_changes() {
        let base = ProcessingOptions::baseline(80);
        let diff = OptionsDiff::between(&base, &base.clone());
        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), "");
    }

    #[test]
    fn test_changed_fields_only() {
        let base = ProcessingOptions::baseline(80);
        let mut po = base.clone();
        po.resizing_type = ResizeType::Fill;
        po.width = 300;
        po.gravity.gravity_type = GravityType::North;
        po.used_presets.push("thumb".to_string());

        let diff = OptionsDiff::between(&base, &po);
        assert_eq!(diff.len(), 4);
        assert_eq!(diff.get("resizing_type"), Some(&Value::from("fill")));
        assert_eq!(diff.get("width"), Some(&Value::from(300)));
        assert_eq!(diff.get("gravity").unwrap()["type"], "no");
        assert!(diff.get("gravity").unwrap().get("x").is_none());
        assert!(diff.get("height").is_none());
    }

    #[test]
    fn test_display_uses_dotted_names() {
        let base = ProcessingOptions::baseline(80);
        let mut po = base.clone();
        po.quality = 60;
        po.crop.width = 10;

        let diff = OptionsDiff::between(&base, &po);
        let rendered = diff.to_string();
        assert!(rendered.contains("quality: 60"));
        assert!(rendered.contains("crop.width: 10"));
        assert_eq!(rendered.matches("; ").count(), 1);
    }

    #[test]
    fn test_serializes_as_object() {
        let base = ProcessingOptions::baseline(80);
        let mut po = base.clone();
        po.cache_buster = "v2".to_string();

        let json = serde_json::to_value(OptionsDiff::between(&base, &po)).unwrap();
        assert_eq!(json, serde_json::json!({ "cache_buster": "v2" }));
    }
}
