//! Flat `KEY=value` secrets file.
//!
//! The file is re-read on every [`SecretsFile::load`] so a rotated secret is
//! picked up by the very next request.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, error};

static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z_]+)=(.+)$").expect("static regex is valid"));

/// Secret values keyed by their uppercase name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SecretStore {
    entries: HashMap<String, String>,
}

impl SecretStore {
    /// Parses `KEY=value` lines. Anything else is skipped.
    pub fn parse(content: &str) -> Self {
        let mut entries = HashMap::new();

        for line in content.lines() {
            if let Some(captures) = ENTRY.captures(line) {
                entries.insert(captures[1].to_string(), captures[2].trim().to_string());
            }
        }

        Self { entries }
    }

    /// Returns the value for `key` when it is present and non-empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SecretsFile {
    path: PathBuf,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads and parses the file. Read failures are logged and yield an
    /// empty store, so every key then looks unconfigured.
    pub fn load(&self) -> SecretStore {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let store = SecretStore::parse(&content);
                debug!(path = %self.path.display(), entries = store.len(), "loaded secrets");
                store
            }
            Err(e) => {
                error!(path = %self.path.display(), "Failed to load secrets: {e}");
                SecretStore::default()
            }
        }
    }
}
