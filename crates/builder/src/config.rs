//! Configuration for the selector path builder.
//!
//! Settings can be constructed programmatically, read from environment variables or
//! loaded from a JSON file. Missing fields fall back to [`BuilderConfig::default`].

use std::env;
use std::fs;
use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::Grammar;

/// Attributes offered for refinement when nothing else is configured.
pub const DEFAULT_ATTRIBUTE_WHITELIST: &[&str] = &[
    "id", "class", "href", "name", "title", "type", "role", "alt", "src", "for",
];

/// Runtime configuration for one builder instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Attribute names that may be toggled into a descriptor. Compared case-insensitively.
    pub attribute_whitelist: Vec<String>,
    /// Render XPath instead of CSS.
    pub use_xpath: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            attribute_whitelist: DEFAULT_ATTRIBUTE_WHITELIST
                .iter()
                .map(|name| (*name).to_owned())
                .collect(),
            use_xpath: false,
        }
    }
}

impl BuilderConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SELPATH_ATTRIBUTES`: comma separated whitelist (default: [`DEFAULT_ATTRIBUTE_WHITELIST`])
    /// - `SELPATH_GRAMMAR`: `css` or `xpath` (default: `css`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`BuilderConfig::from_env`], reading values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(list) = lookup("SELPATH_ATTRIBUTES") {
            let names: Vec<String> = list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_ascii_lowercase)
                .collect();
            if !names.is_empty() {
                config.attribute_whitelist = names;
            }
        }
        match lookup("SELPATH_GRAMMAR").map(|value| value.parse::<Grammar>()) {
            Some(Ok(grammar)) => config.use_xpath = grammar == Grammar::XPath,
            Some(Err(value)) => log::warn!(target: "selpath_builder", "ignoring SELPATH_GRAMMAR={value}"),
            None => {}
        }
        config
    }

    /// Parse configuration from JSON text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON for this structure.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &FsPath) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&text)?)
    }

    pub fn grammar(&self) -> Grammar {
        if self.use_xpath { Grammar::XPath } else { Grammar::Css }
    }

    pub fn allows(&self, name: &str) -> bool {
        self.attribute_whitelist
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> =
            HashMap::from([("SELPATH_ATTRIBUTES", " ID, data-test ,,"), ("SELPATH_GRAMMAR", "XPath")]);
        let config = BuilderConfig::from_lookup(|key| vars.get(key).map(|value| (*value).to_owned()));
        assert_eq!(config.attribute_whitelist, vec!["id", "data-test"]);
        assert_eq!(config.grammar(), Grammar::XPath);
        assert!(config.allows("DATA-TEST"));
        assert!(!config.allows("class"));
    }

    #[test]
    fn invalid_grammar_keeps_default() {
        let config = BuilderConfig::from_lookup(|key| (key == "SELPATH_GRAMMAR").then(|| "sql".to_owned()));
        assert_eq!(config, BuilderConfig::default());
    }

    #[test]
    fn json_fills_missing_fields() {
        let config = BuilderConfig::from_json_str(r#"{ "use_xpath": true }"#).unwrap();
        assert!(config.use_xpath);
        assert!(config.allows("href"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "attribute_whitelist": ["class"] }}"#).unwrap();
        let config = BuilderConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.attribute_whitelist, vec!["class"]);
        assert!(!config.use_xpath);

        let missing = BuilderConfig::from_json_file(FsPath::new("/nonexistent/selpath.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
