//! The two TOTP tools and their text responses.
//!
//! Every failure is rendered as text for the caller. Nothing here surfaces a
//! protocol-level error.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    accounts::AccountRegistry,
    secrets::SecretsFile,
    totp::{Clock, SystemClock, Totp, TotpReading},
    OtpError,
};

pub const GET_TOTP_CODE: &str = "get_totp_code";
pub const LIST_TOTP_ACCOUNTS: &str = "list_totp_accounts";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, thiserror::Error)]
enum CodeError {
    #[error("Unknown account: {account}. Available: {available}")]
    UnknownAccount { account: String, available: String },
    #[error("No secret found for {0} in secrets file")]
    MissingSecret(&'static str),
    #[error("Failed to generate code: {0}")]
    Derivation(OtpError),
}

pub struct ToolDispatcher<C = SystemClock> {
    registry: AccountRegistry,
    secrets: SecretsFile,
    clock: C,
}

impl ToolDispatcher<SystemClock> {
    pub fn new(registry: AccountRegistry, secrets: SecretsFile) -> Self {
        Self::with_clock(registry, secrets, SystemClock)
    }
}

impl<C: Clock> ToolDispatcher<C> {
    pub fn with_clock(registry: AccountRegistry, secrets: SecretsFile, clock: C) -> Self {
        Self {
            registry,
            secrets,
            clock,
        }
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![
            ToolDefinition {
                name: GET_TOTP_CODE.to_string(),
                description: "Generate a TOTP 2FA code for an account. Returns a 6-digit code valid for ~30 seconds.".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "account": {
                            "type": "string",
                            "description": format!("Account name (e.g., {})", self.quoted_names()),
                        }
                    },
                    "required": ["account"]
                }),
            },
            ToolDefinition {
                name: LIST_TOTP_ACCOUNTS.to_string(),
                description: "List all configured TOTP accounts".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
        ]
    }

    /// Runs the named tool. Unknown tools answer with plain text too.
    pub fn call(&self, name: &str, arguments: &Value) -> String {
        debug!(tool = name, "tool call");

        match name {
            GET_TOTP_CODE => match arguments.get("account").and_then(Value::as_str) {
                Some(account) => self.get_totp_code(account),
                None => "Error: Missing required argument: account".to_string(),
            },
            LIST_TOTP_ACCOUNTS => self.list_totp_accounts(),
            _ => format!("Unknown tool: {name}"),
        }
    }

    pub fn get_totp_code(&self, account: &str) -> String {
        match self.code_for(account) {
            Ok(reading) => format!(
                "TOTP code for {account}: {}\nValid for {} more seconds",
                reading.code, reading.seconds_remaining
            ),
            Err(e) => {
                debug!(account, "code request failed: {e}");
                format!("Error: {e}")
            }
        }
    }

    pub fn list_totp_accounts(&self) -> String {
        let store = self.secrets.load();

        let lines: Vec<String> = self
            .registry
            .list_all()
            .iter()
            .map(|account| {
                if store.contains(account.secret_key) {
                    format!("- {}: configured", account.name)
                } else {
                    format!(
                        "- {}: NOT configured (missing {})",
                        account.name, account.secret_key
                    )
                }
            })
            .collect();

        format!("Available TOTP accounts:\n{}", lines.join("\n"))
    }

    fn code_for(&self, account: &str) -> Result<TotpReading, CodeError> {
        let definition = self
            .registry
            .resolve(account)
            .ok_or_else(|| CodeError::UnknownAccount {
                account: account.to_string(),
                available: self.registry.names().join(", "),
            })?;

        let store = self.secrets.load();
        let secret = store
            .get(definition.secret_key)
            .ok_or(CodeError::MissingSecret(definition.secret_key))?;

        Totp::parse(secret)
            .reading_now(&self.clock)
            .map_err(CodeError::Derivation)
    }

    fn quoted_names(&self) -> String {
        self.registry
            .names()
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
