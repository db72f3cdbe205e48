use std::fs;
use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::IndexError;

/// File name probed under the root when no --config path is given. The
/// leading dot keeps the file itself out of indexing.
pub const CONFIG_FILE_NAME: &str = ".jdfix.yaml";

// On-disk shape. Every key is required; an unknown or missing key is a
// configuration error, not a silent default.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    prefixes_excluded_from_indexing: Vec<String>,
    patterns_excluded_from_indexing: Vec<String>,
    update_wiki_links: bool,
}

/// Exclusion rules and feature flags, loaded once at startup and passed by
/// reference into the classifier, fixer, and orchestrator.
#[derive(Debug)]
pub struct Config {
    prefixes: Vec<String>,
    patterns: Vec<Regex>,
    pub update_wiki_links: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefixes: vec![".".to_string(), "Index of ".to_string()],
            patterns: [r"^\d{4}-\d{2}-\d{2}", r"^\d{2}-\d{2}-\d{2}"]
                .iter()
                .map(|source| compile_default(source))
                .collect(),
            update_wiki_links: false,
        }
    }
}

fn compile_default(source: &str) -> Regex {
    // Built-in patterns are constants; failure is a defect in this file.
    Regex::new(source).unwrap_or_else(|e| panic!("bad default exclusion pattern '{source}': {e}"))
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, IndexError> {
        let contents = fs::read_to_string(path)?;
        let raw: RawConfig =
            serde_yaml::from_str(&contents).map_err(|e| IndexError::Configuration {
                message: format!("invalid config file '{}': {e}", path.display()),
            })?;
        let mut patterns = Vec::with_capacity(raw.patterns_excluded_from_indexing.len());
        for source in &raw.patterns_excluded_from_indexing {
            patterns.push(Regex::new(source)?);
        }
        debug!("Loaded config from {:?}", path);
        Ok(Config {
            prefixes: raw.prefixes_excluded_from_indexing,
            patterns,
            update_wiki_links: raw.update_wiki_links,
        })
    }

    /// Resolve the effective configuration for a run: an explicit path wins,
    /// then a `.jdfix.yaml` sitting in the root, then the built-in defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Config, IndexError> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Config::load(&candidate);
        }
        debug!("No config file found under {:?}, using defaults", root);
        Ok(Config::default())
    }

    /// Whether a name is exempt from classification and renumbering.
    pub fn is_excluded(&self, name: &str) -> bool {
        if self.prefixes.iter().any(|prefix| name.starts_with(prefix)) {
            return true;
        }
        self.patterns.iter().any(|pattern| pattern.is_match(name))
    }
}
