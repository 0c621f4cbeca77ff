use std::{collections::BTreeMap, env, fmt};

use serde::Deserialize;

use crate::Error;

const LOG_VAR: &str = "LAMBDA_ERRORS_LOG";
const MAP_VAR: &str = "LAMBDA_ERRORS_MAP";
const EXCLUDE_VAR: &str = "LAMBDA_ERRORS_EXCLUDE";

/// Options applied to every error a wrapped handler produces.
///
/// Deserializes from `{ "log": bool, "map": { from: to }, "exclude": { field: bool } }`,
/// with every key optional. Unrecognised keys are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Whether errors are written to the error console.
    pub log: bool,
    /// Renames output fields.
    pub map: Option<BTreeMap<String, String>>,
    /// Omits the output fields mapped to `true`.
    pub exclude: Option<BTreeMap<String, bool>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log: true,
            map: None,
            exclude: None,
        }
    }
}

#[derive(Debug)]
struct InvalidVar {
    name: &'static str,
    reason: String,
}

impl fmt::Display for InvalidVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {}", self.name, self.reason)
    }
}

impl std::error::Error for InvalidVar {}

impl Settings {
    /// Enables or disables error logging.
    pub fn log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    /// Renames the output field `from` to `to`.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.map.get_or_insert_with(BTreeMap::new).insert(from.into(), to.into());
        self
    }

    /// Omits the output field `field`.
    pub fn exclude(mut self, field: impl Into<String>) -> Self {
        self.exclude.get_or_insert_with(BTreeMap::new).insert(field.into(), true);
        self
    }

    /// Parses settings from a JSON document.
    ///
    /// Errors name the path of the offending value.
    ///
    /// ```
    /// use lamedh_errors::Settings;
    ///
    /// let settings = Settings::from_json(r#"{ "log": false, "exclude": { "status_code": true } }"#)?;
    /// assert_eq!(settings, Settings::default().log(false).exclude("status_code"));
    /// # Ok::<(), lamedh_errors::Error>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let de = &mut serde_json::Deserializer::from_str(json);
        let settings = serde_path_to_error::deserialize(de)?;
        Ok(settings)
    }

    /// Attempts to read settings from environment variables.
    ///
    /// * `LAMBDA_ERRORS_LOG`: `true`, `false`, `1` or `0`.
    /// * `LAMBDA_ERRORS_MAP`: a JSON object of field renames.
    /// * `LAMBDA_ERRORS_EXCLUDE`: comma separated field names.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(log) = lookup(LOG_VAR) {
            settings.log = match log.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                other => {
                    return Err(InvalidVar {
                        name: LOG_VAR,
                        reason: format!("expected a boolean, got {:?}", other),
                    }
                    .into())
                }
            };
        }

        if let Some(map) = lookup(MAP_VAR) {
            let de = &mut serde_json::Deserializer::from_str(&map);
            let map = serde_path_to_error::deserialize(de).map_err(|e| InvalidVar {
                name: MAP_VAR,
                reason: e.to_string(),
            })?;
            settings.map = Some(map);
        }

        if let Some(exclude) = lookup(EXCLUDE_VAR) {
            let fields = exclude
                .split(',')
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(|field| (field.to_string(), true))
                .collect();
            settings.exclude = Some(fields);
        }

        Ok(settings)
    }
}
