//! Equasis account credentials.
//!
//! Sources are consulted in order, and the first one that supplies both a
//! username and a password wins:
//!
//! 1. Explicit arguments
//! 2. `EQUASIS_USERNAME` and `EQUASIS_PASSWORD`
//! 3. The configured username plus its password in the system keychain
//!    (macOS Keychain, Windows Credential Manager, Linux Secret Service)
//!
//! ## Usage
//!
//! ```ignore
//! let provider = CredentialProvider::system();
//! provider.store_password("ops@example.com", "secret")?;
//! let resolved = provider.resolve(&ExplicitCredentials::default(), Some("ops@example.com"));
//! ```

use std::fmt;

use equasis_fetch::Credentials;
use keyring::Entry;
use tracing::{debug, warn};

use crate::error::StoreError;

/// Keychain service name. The account is the Equasis username.
pub const KEYRING_SERVICE: &str = "equasis-cli";

/// Environment variable holding the username.
pub const USERNAME_ENV: &str = "EQUASIS_USERNAME";
/// Environment variable holding the password.
pub const PASSWORD_ENV: &str = "EQUASIS_PASSWORD";

// ============================================================================
// Secret Store
// ============================================================================

/// Password storage keyed by account.
pub trait SecretStore: Send + Sync {
    /// Returns the stored password, or `None` if there is none.
    fn get(&self, account: &str) -> Result<Option<String>, StoreError>;

    /// Stores a password, replacing any previous one.
    fn set(&self, account: &str, secret: &str) -> Result<(), StoreError>;

    /// Deletes a password. Deleting a missing entry succeeds.
    fn delete(&self, account: &str) -> Result<(), StoreError>;
}

/// [`SecretStore`] backed by the system keychain.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Creates a store under [`KEYRING_SERVICE`].
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates a store under a custom service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, account)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringStore {
    fn get(&self, account: &str) -> Result<Option<String>, StoreError> {
        match self.entry(account)?.get_password() {
            Ok(secret) if secret.is_empty() => Ok(None),
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, account: &str, secret: &str) -> Result<(), StoreError> {
        self.entry(account)?.set_password(secret)?;
        debug!(service = %self.service, "Password stored in keychain");
        Ok(())
    }

    fn delete(&self, account: &str) -> Result<(), StoreError> {
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => {
                debug!(service = %self.service, "Password removed from keychain");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Sources
// ============================================================================

/// Where resolved credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Command-line arguments.
    Arguments,
    /// Environment variables.
    Environment,
    /// Configured username plus keychain password.
    Keychain,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Arguments => "command-line arguments",
            Self::Environment => "environment",
            Self::Keychain => "system keychain",
        })
    }
}

/// Credentials given on the command line.
#[derive(Default, Clone)]
pub struct ExplicitCredentials {
    /// Username argument.
    pub username: Option<String>,
    /// Password argument.
    pub password: Option<String>,
}

impl fmt::Debug for ExplicitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Credentials and the source that supplied them.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    /// The credentials.
    pub credentials: Credentials,
    /// Their source.
    pub source: CredentialSource,
}

/// Which credential sources are present. Never holds secret values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialReport {
    /// `EQUASIS_USERNAME` is set.
    pub env_username: bool,
    /// `EQUASIS_PASSWORD` is set.
    pub env_password: bool,
    /// Username from the configuration file.
    pub configured_username: Option<String>,
    /// A password for the configured username is in the keychain.
    pub keychain_password: bool,
}

impl CredentialReport {
    /// Returns the source that would be used without explicit arguments.
    pub fn effective_source(&self) -> Option<CredentialSource> {
        if self.env_username && self.env_password {
            Some(CredentialSource::Environment)
        } else if self.configured_username.is_some() && self.keychain_password {
            Some(CredentialSource::Keychain)
        } else {
            None
        }
    }
}

// ============================================================================
// Provider
// ============================================================================

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Resolves credentials from arguments, environment, and keychain.
pub struct CredentialProvider {
    secrets: Box<dyn SecretStore>,
    env: EnvLookup,
}

impl CredentialProvider {
    /// Creates a provider over the process environment and system keychain.
    pub fn system() -> Self {
        Self::new(
            Box::new(KeyringStore::new()),
            Box::new(|name: &str| std::env::var(name).ok()),
        )
    }

    /// Creates a provider over custom sources.
    pub fn new(secrets: Box<dyn SecretStore>, env: EnvLookup) -> Self {
        Self { secrets, env }
    }

    fn env_var(&self, name: &str) -> Option<String> {
        (self.env)(name).filter(|v| !v.trim().is_empty())
    }

    /// Resolves credentials, or `None` if no source supplies both halves.
    ///
    /// A keychain that cannot be reached is logged and treated as empty.
    pub fn resolve(
        &self,
        explicit: &ExplicitCredentials,
        configured_username: Option<&str>,
    ) -> Option<ResolvedCredentials> {
        if let (Some(user), Some(pass)) = (&explicit.username, &explicit.password) {
            return Some(resolved(user, pass, CredentialSource::Arguments));
        }

        if let (Some(user), Some(pass)) = (self.env_var(USERNAME_ENV), self.env_var(PASSWORD_ENV)) {
            return Some(resolved(&user, &pass, CredentialSource::Environment));
        }

        let user = explicit
            .username
            .as_deref()
            .or(configured_username)
            .filter(|u| !u.trim().is_empty())?;
        match self.secrets.get(user) {
            Ok(Some(pass)) => Some(resolved(user, &pass, CredentialSource::Keychain)),
            Ok(None) => {
                debug!("No keychain password for configured username");
                None
            }
            Err(e) => {
                warn!(error = %e, "Keychain unavailable");
                None
            }
        }
    }

    /// Stores the password for `username` in the keychain.
    pub fn store_password(&self, username: &str, password: &str) -> Result<(), StoreError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(StoreError::Config(
                "username and password must not be empty".to_string(),
            ));
        }
        self.secrets.set(username, password)
    }

    /// Removes the password for `username` from the keychain.
    pub fn delete_password(&self, username: &str) -> Result<(), StoreError> {
        self.secrets.delete(username)
    }

    /// Reports which sources are present.
    pub fn describe_sources(&self, configured_username: Option<&str>) -> CredentialReport {
        let keychain_password = configured_username.is_some_and(|user| {
            self.secrets.get(user).is_ok_and(|secret| secret.is_some())
        });

        CredentialReport {
            env_username: self.env_var(USERNAME_ENV).is_some(),
            env_password: self.env_var(PASSWORD_ENV).is_some(),
            configured_username: configured_username.map(str::to_string),
            keychain_password,
        }
    }
}

impl fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProvider").finish_non_exhaustive()
    }
}

fn resolved(username: &str, password: &str, source: CredentialSource) -> ResolvedCredentials {
    debug!(%source, "Resolved credentials");
    ResolvedCredentials {
        credentials: Credentials::new(username.trim(), password),
        source,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default, Clone)]
    struct MemorySecrets {
        entries: Arc<Mutex<HashMap<String, String>>>,
        broken: bool,
    }

    impl SecretStore for MemorySecrets {
        fn get(&self, account: &str) -> Result<Option<String>, StoreError> {
            if self.broken {
                return Err(StoreError::Keychain("no secret service".to_string()));
            }
            Ok(self.entries.lock().unwrap().get(account).cloned())
        }

        fn set(&self, account: &str, secret: &str) -> Result<(), StoreError> {
            self.entries
                .lock()
                .unwrap()
                .insert(account.to_string(), secret.to_string());
            Ok(())
        }

        fn delete(&self, account: &str) -> Result<(), StoreError> {
            self.entries.lock().unwrap().remove(account);
            Ok(())
        }
    }

    fn provider(secrets: &MemorySecrets, env: &[(&str, &str)]) -> CredentialProvider {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CredentialProvider::new(
            Box::new(secrets.clone()),
            Box::new(move |name: &str| env.get(name).cloned()),
        )
    }

    fn args(user: Option<&str>, pass: Option<&str>) -> ExplicitCredentials {
        ExplicitCredentials {
            username: user.map(str::to_string),
            password: pass.map(str::to_string),
        }
    }

    #[test]
    fn test_arguments_win() {
        let secrets = MemorySecrets::default();
        secrets.set("kc@example.com", "kc-pass").unwrap();
        let env = [(USERNAME_ENV, "env@example.com"), (PASSWORD_ENV, "env-pass")];
        let p = provider(&secrets, &env);

        let r = p
            .resolve(&args(Some("arg@example.com"), Some("arg-pass")), Some("kc@example.com"))
            .unwrap();
        assert_eq!(r.source, CredentialSource::Arguments);
        assert_eq!(r.credentials.username(), "arg@example.com");
        assert_eq!(r.credentials.password(), "arg-pass");
    }

    #[test]
    fn test_environment_before_keychain() {
        let secrets = MemorySecrets::default();
        secrets.set("kc@example.com", "kc-pass").unwrap();
        let env = [(USERNAME_ENV, "env@example.com"), (PASSWORD_ENV, "env-pass")];
        let p = provider(&secrets, &env);

        let r = p.resolve(&ExplicitCredentials::default(), Some("kc@example.com")).unwrap();
        assert_eq!(r.source, CredentialSource::Environment);
        assert_eq!(r.credentials.username(), "env@example.com");
    }

    #[test]
    fn test_half_environment_falls_through_to_keychain() {
        let secrets = MemorySecrets::default();
        secrets.set("kc@example.com", "kc-pass").unwrap();
        let p = provider(&secrets, &[(USERNAME_ENV, "env@example.com")]);

        let r = p.resolve(&ExplicitCredentials::default(), Some("kc@example.com")).unwrap();
        assert_eq!(r.source, CredentialSource::Keychain);
        assert_eq!(r.credentials.password(), "kc-pass");
    }

    #[test]
    fn test_username_argument_selects_keychain_entry() {
        let secrets = MemorySecrets::default();
        secrets.set("other@example.com", "other-pass").unwrap();
        let p = provider(&secrets, &[]);

        let r = p
            .resolve(&args(Some("other@example.com"), None), Some("kc@example.com"))
            .unwrap();
        assert_eq!(r.credentials.password(), "other-pass");
    }

    #[test]
    fn test_nothing_configured() {
        let p = provider(&MemorySecrets::default(), &[]);
        assert!(p.resolve(&ExplicitCredentials::default(), None).is_none());
        assert!(p.resolve(&ExplicitCredentials::default(), Some("kc@example.com")).is_none());
    }

    #[test]
    fn test_unreachable_keychain_is_not_configured() {
        let secrets = MemorySecrets {
            broken: true,
            ..MemorySecrets::default()
        };
        let p = provider(&secrets, &[]);
        assert!(p.resolve(&ExplicitCredentials::default(), Some("kc@example.com")).is_none());
    }

    #[test]
    fn test_store_and_delete_password() {
        let secrets = MemorySecrets::default();
        let p = provider(&secrets, &[]);

        p.store_password("kc@example.com", "kc-pass").unwrap();
        assert!(p.describe_sources(Some("kc@example.com")).keychain_password);

        p.delete_password("kc@example.com").unwrap();
        assert!(!p.describe_sources(Some("kc@example.com")).keychain_password);
        assert!(p.store_password("kc@example.com", "").is_err());
    }

    #[test]
    fn test_describe_sources() {
        let secrets = MemorySecrets::default();
        secrets.set("kc@example.com", "kc-pass").unwrap();
        let p = provider(&secrets, &[(PASSWORD_ENV, "env-pass")]);

        let report = p.describe_sources(Some("kc@example.com"));
        assert_eq!(
            report,
            CredentialReport {
                env_username: false,
                env_password: true,
                configured_username: Some("kc@example.com".to_string()),
                keychain_password: true,
            }
        );
        assert_eq!(report.effective_source(), Some(CredentialSource::Keychain));
    }

    #[test]
    fn test_explicit_debug_redacts_password() {
        let debug = format!("{:?}", args(Some("u"), Some("hunter2")));
        assert!(!debug.contains("hunter2"));
    }
}
