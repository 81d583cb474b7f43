use std::path::PathBuf;

pub const SECRETS_FILE_ENV: &str = "TOTP_MCP_SECRETS_FILE";
pub const LOG_ENV: &str = "TOTP_MCP_LOG";

const DEFAULT_SECRETS_FILE: &str = "Google Drive/My Drive/.nutrie-secrets";
const DEFAULT_LOG_FILTER: &str = "totp_mcp=info";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub secrets_file: PathBuf,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source, ignoring empty values.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let secrets_file = lookup(SECRETS_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_secrets_file);
        let log_filter = lookup(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            secrets_file,
            log_filter,
        }
    }
}

/// `~/Google Drive/My Drive/.nutrie-secrets`, relative to the working
/// directory when no home directory can be found.
pub fn default_secrets_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(DEFAULT_SECRETS_FILE)
}
