use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::NormalizedError;

/// Renders normalized errors for clients.
pub trait ErrorSerializer: Send + Sync {
    /// Serializes `error`.
    ///
    /// `map` renames output fields, `exclude` omits the fields mapped to `true`.
    fn serialize(
        &self,
        error: &NormalizedError,
        pretty: bool,
        map: Option<&BTreeMap<String, String>>,
        exclude: Option<&BTreeMap<String, bool>>,
    ) -> String;
}

/// Serializes errors as JSON objects.
///
/// Fields are written in the order `name`, `message`, `status_code`. Exclusion is
/// checked against these field names before renaming, so excluding `status_code`
/// removes it whatever it is mapped to.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl ErrorSerializer for JsonSerializer {
    fn serialize(
        &self,
        error: &NormalizedError,
        pretty: bool,
        map: Option<&BTreeMap<String, String>>,
        exclude: Option<&BTreeMap<String, bool>>,
    ) -> String {
        let fields = [
            ("name", Value::from(error.name.as_str())),
            ("message", Value::from(error.message.as_str())),
            ("status_code", Value::from(error.status_code)),
        ];

        let mut out = Map::new();
        for (field, value) in fields.iter() {
            let excluded = exclude
                .and_then(|exclude| exclude.get(*field))
                .copied()
                .unwrap_or(false);
            if excluded {
                continue;
            }
            let key = map
                .and_then(|map| map.get(*field))
                .map_or(*field, String::as_str);
            out.insert(key.to_string(), value.clone());
        }

        let out = Value::Object(out);
        if pretty {
            format!("{:#}", out)
        } else {
            out.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn flags(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn compact_default_shape() {
        let json = JsonSerializer.serialize(&NormalizedError::default(), false, None, None);
        assert_eq!(
            json,
            r#"{"name":"Error","message":"There was an error.","status_code":500}"#
        );
    }

    #[test]
    fn pretty_output() {
        let err = NormalizedError::new("NotFound", "Item not found.", 404);
        let json = JsonSerializer.serialize(&err, true, None, None);
        assert_eq!(
            json,
            "{\n  \"name\": \"NotFound\",\n  \"message\": \"Item not found.\",\n  \"status_code\": 404\n}"
        );
    }

    #[test]
    fn map_renames_in_place() {
        let map = names(&[("message", "message_of_doom"), ("name", "cause_of_doom")]);
        let json = JsonSerializer.serialize(&NormalizedError::default(), false, Some(&map), None);
        assert_eq!(
            json,
            r#"{"cause_of_doom":"Error","message_of_doom":"There was an error.","status_code":500}"#
        );
    }

    #[test]
    fn exclude_only_drops_true_flags() {
        let exclude = flags(&[("status_code", true), ("name", false)]);
        let json = JsonSerializer.serialize(&NormalizedError::default(), false, None, Some(&exclude));
        assert_eq!(json, r#"{"name":"Error","message":"There was an error."}"#);
    }

    #[test]
    fn exclude_applies_before_rename() {
        let map = names(&[("status_code", "code"), ("message", "detail")]);

        let exclude = flags(&[("status_code", true)]);
        let json = JsonSerializer.serialize(&NormalizedError::default(), false, Some(&map), Some(&exclude));
        assert_eq!(json, r#"{"name":"Error","detail":"There was an error."}"#);

        let exclude = flags(&[("code", true)]);
        let json = JsonSerializer.serialize(&NormalizedError::default(), false, Some(&map), Some(&exclude));
        assert_eq!(
            json,
            r#"{"name":"Error","detail":"There was an error.","code":500}"#
        );
    }

    #[test]
    fn additional_is_never_serialized() {
        let err = NormalizedError::invalid_value("secret".into());
        let json = JsonSerializer.serialize(&err, false, None, None);
        assert!(!json.contains("secret"));
    }
}
