use std::fmt;

/// Environment variable holding the Vault AppRole role id
pub const VAULT_ROLE_ID_VAR: &str = "ansible_hashi_vault_role_id";

/// Environment variable holding the Vault AppRole secret id
pub const VAULT_SECRET_ID_VAR: &str = "ansible_hashi_vault_secret_id";

// ============================================================================
// Process configuration
// ============================================================================

/// Settings read once from the environment at startup.
///
/// Unset variables default to empty strings.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub vault_role_id: String,
    pub vault_secret_id: String,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using a custom lookup (testable without touching the environment)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            vault_role_id: lookup(VAULT_ROLE_ID_VAR).unwrap_or_default(),
            vault_secret_id: lookup(VAULT_SECRET_ID_VAR).unwrap_or_default(),
        }
    }

    /// Whether both Vault settings are present
    pub fn is_complete(&self) -> bool {
        !self.vault_role_id.is_empty() && !self.vault_secret_id.is_empty()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("vault_role_id", &self.vault_role_id)
            .field("vault_secret_id", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_to_empty() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert!(!config.is_complete());
    }

    #[test]
    fn test_reads_both_settings() {
        let env: HashMap<&str, &str> = [
            (VAULT_ROLE_ID_VAR, "role-123"),
            (VAULT_SECRET_ID_VAR, "secret-456"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.vault_role_id, "role-123");
        assert_eq!(config.vault_secret_id, "secret-456");
        assert!(config.is_complete());
    }

    #[test]
    fn test_partial_is_incomplete() {
        let config = Config::from_lookup(|key| {
            (key == VAULT_ROLE_ID_VAR).then(|| "role-123".to_string())
        });
        assert!(!config.is_complete());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config {
            vault_role_id: "role".to_string(),
            vault_secret_id: "s3cr3t".to_string(),
        };
        assert!(!format!("{config:?}").contains("s3cr3t"));
    }
}
