/// An account name and the secrets-file key holding its shared secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountDefinition {
    pub name: &'static str,
    pub secret_key: &'static str,
}

/// Accounts served by this process, in listing order. Aliases share a key.
pub const ACCOUNTS: &[AccountDefinition] = &[
    AccountDefinition {
        name: "google",
        secret_key: "GOOGLE_TOTP_SECRET",
    },
    AccountDefinition {
        name: "codiedev42",
        secret_key: "GOOGLE_TOTP_SECRET",
    },
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountRegistry {
    accounts: &'static [AccountDefinition],
}

impl Default for AccountRegistry {
    fn default() -> Self {
        Self::new(ACCOUNTS)
    }
}

impl AccountRegistry {
    pub fn new(accounts: &'static [AccountDefinition]) -> Self {
        Self { accounts }
    }

    /// Case-insensitive lookup by account name
    pub fn resolve(&self, name: &str) -> Option<&AccountDefinition> {
        self.accounts
            .iter()
            .find(|account| account.name.eq_ignore_ascii_case(name))
    }

    pub fn list_all(&self) -> &[AccountDefinition] {
        self.accounts
    }

    pub fn names(&self) -> Vec<&str> {
        self.accounts.iter().map(|account| account.name).collect()
    }
}
