//! Loader for workspace configuration with YAML + environment overlays.
//!
//! A `birdseye.yaml` file supplies credentials and fetch/stream defaults;
//! `BIRDSEYE_`-prefixed environment variables override individual fields and
//! `${VAR}` placeholders inside string values are expanded recursively, so
//! secrets never need to live in the file itself.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct BirdseyeConfig {
    pub version: Option<String>,
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

/// Platform credentials. The v2 API authenticates app-only requests with a
/// single bearer token.
#[derive(Debug, Deserialize)]
pub struct TwitterConfig {
    pub bearer_token: String,
    /// Username consulted when a command does not name one explicitly.
    #[serde(default)]
    pub default_user: Option<String>,
}

/// Defaults for paginated fetches.
#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    /// Items requested per page (the platform caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Total items collected before pagination stops.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_items: default_max_items(),
        }
    }
}

/// Filtered-stream settings.
#[derive(Debug, Deserialize)]
pub struct StreamConfig {
    /// Keyword rules installed before the stream opens.
    #[serde(default)]
    pub rules: Vec<String>,
    /// Append-only sink for raw streamed records, one per line.
    #[serde(default = "default_stream_file")]
    pub output_file: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            output_file: default_stream_file(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}
fn default_max_items() -> usize {
    100
}
fn default_stream_file() -> String {
    "tweets.jsonl".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct BirdseyeConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for BirdseyeConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BirdseyeConfigLoader {
    /// Start with sensible defaults: YAML file + `BIRDSEYE_` env overrides.
    ///
    /// ```
    /// use birdseye_config::BirdseyeConfigLoader;
    ///
    /// let config = BirdseyeConfigLoader::new()
    ///     .with_yaml_str("version: '1'\ntwitter:\n  bearer_token: example")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.fetch.page_size, 100);
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("BIRDSEYE").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// ```
    /// use birdseye_config::BirdseyeConfigLoader;
    ///
    /// unsafe { std::env::set_var("BEARER", "injected-from-env"); }
    ///
    /// let config = BirdseyeConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// version: "1"
    /// twitter:
    ///   bearer_token: "${BEARER}"
    ///   default_user: "FamilyGuyonFOX"
    /// stream:
    ///   rules: ["kakashi", "sasuke"]
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.twitter.bearer_token, "injected-from-env");
    /// assert_eq!(config.twitter.default_user.as_deref(), Some("FamilyGuyonFOX"));
    /// assert_eq!(config.stream.rules.len(), 2);
    /// assert_eq!(config.stream.output_file, "tweets.jsonl");
    ///
    /// unsafe { std::env::remove_var("BEARER"); }
    /// ```
    pub fn load(self) -> Result<BirdseyeConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Round-trip through serde_json::Value so ${VAR} placeholders can be
        // expanded before the typed deserialize.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: BirdseyeConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use temp_env;

    #[test]
    fn expands_placeholder_inside_string() {
        temp_env::with_var("BEARER", Some("tok-123"), || {
            let mut v = json!("Bearer ${BEARER}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("Bearer tok-123"));
        });
    }

    #[test]
    fn expands_inside_arrays_and_objects() {
        temp_env::with_vars([("TAG", Some("kakashi")), ("FILE", Some("out.jsonl"))], || {
            let mut v = json!({
                "rules": ["$TAG", "${TAG}-extra"],
                "output_file": "${FILE}",
                "page_size": 100,
                "enabled": true
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "rules": ["kakashi", "kakashi-extra"],
                    "output_file": "out.jsonl",
                    "page_size": 100,
                    "enabled": true
                })
            );
        });
    }

    #[test]
    fn expands_through_nested_env_references() {
        temp_env::with_vars(
            [
                ("INNER", Some("deep")),
                ("MIDDLE", Some("via-${INNER}")),
                ("OUTER", Some("top-${MIDDLE}")),
            ],
            || {
                let mut v = json!("value=${OUTER}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("value=top-via-deep"));
            },
        );
    }

    #[test]
    fn cyclic_references_terminate() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            // The depth cap guarantees termination; the cycle stays unresolved.
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }
}
