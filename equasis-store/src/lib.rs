// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Equasis Store
//!
//! Local state for the Equasis client: the configuration file and the
//! account credentials.
//!
//! - **Config**: JSON settings with defaults for every field
//! - **CredentialProvider**: arguments, then environment, then system keychain
//! - **Persistence**: atomic JSON writes with owner-only permissions
//!
//! Fetched vessel data is never stored.
//!
//! ## Usage
//!
//! ```ignore
//! use equasis_store::{Config, CredentialProvider, ExplicitCredentials};
//!
//! let config = Config::load().await?;
//! let provider = CredentialProvider::system();
//! let resolved = provider.resolve(&ExplicitCredentials::default(), config.username.as_deref());
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod persistence;

pub use config::{BatchConfig, Config, PacingConfig, RetryConfig};
pub use credentials::{
    CredentialProvider, CredentialReport, CredentialSource, ExplicitCredentials, KeyringStore,
    KEYRING_SERVICE, PASSWORD_ENV, ResolvedCredentials, SecretStore, USERNAME_ENV,
};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};
