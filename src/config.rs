//! Provider configuration parsed from environment variables.
//!
//! Configuration arrives as a flat mapping of string keys to string values.
//! [`ProviderConfig::from_vars`] parses that mapping once into a typed record;
//! everything downstream works on the record and never looks at raw strings
//! again. [`ProviderConfig::from_env`] is the only place the ambient process
//! environment is read, after loading a `.env` file with `dotenvy` if one is
//! present.
//!
//! ## Environment Variables
//!
//! All optional:
//! - `ETHEREUM_NETWORK`: network name or numeric chain id (default: "mainnet")
//! - `ETHERSCAN_API_KEY`: enables the Etherscan upstream
//! - `INFURA_PROJECT_ID` / `INFURA_PROJECT_SECRET`: enables Infura (the secret
//!   alone is an error)
//! - `ALCHEMY_API_KEY`: enables Alchemy
//! - `CLOUDFLARE_ENABLED`: enables Cloudflare when truthy
//! - `POCKET_APPLICATION_ID` / `POCKET_APPLICATION_SECRET_KEY`: enables Pocket
//!   (any `POCKET_` key requires both)
//! - `ANKR_API_KEY`: enables Ankr
//! - `JSON_RPC_URL`: enables a plain JSON-RPC endpoint
//! - `FALLBACK_QUORUM`: quorum for the fallback aggregate
//!
//! ## Example
//!
//! ```
//! use eth_provider_selector::config::ProviderConfig;
//!
//! let config = ProviderConfig::from_vars([
//!     ("ETHEREUM_NETWORK", "sepolia"),
//!     ("CLOUDFLARE_ENABLED", "true"),
//! ]);
//! assert!(config.cloudflare_enabled());
//! assert_eq!(config.network().to_string(), "sepolia");
//! ```

use crate::error::{SelectorError, SelectorResult};
use crate::network::Network;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Recognised configuration keys.
pub mod keys {
    /// Network name or chain id.
    pub const ETHEREUM_NETWORK: &str = "ETHEREUM_NETWORK";
    /// Etherscan API key.
    pub const ETHERSCAN_API_KEY: &str = "ETHERSCAN_API_KEY";
    /// Infura project id.
    pub const INFURA_PROJECT_ID: &str = "INFURA_PROJECT_ID";
    /// Infura project secret.
    pub const INFURA_PROJECT_SECRET: &str = "INFURA_PROJECT_SECRET";
    /// Alchemy API key.
    pub const ALCHEMY_API_KEY: &str = "ALCHEMY_API_KEY";
    /// Cloudflare toggle.
    pub const CLOUDFLARE_ENABLED: &str = "CLOUDFLARE_ENABLED";
    /// Prefix shared by every Pocket key.
    pub const POCKET_PREFIX: &str = "POCKET_";
    /// Pocket application id.
    pub const POCKET_APPLICATION_ID: &str = "POCKET_APPLICATION_ID";
    /// Pocket application secret key.
    pub const POCKET_APPLICATION_SECRET_KEY: &str = "POCKET_APPLICATION_SECRET_KEY";
    /// Ankr API key.
    pub const ANKR_API_KEY: &str = "ANKR_API_KEY";
    /// Plain JSON-RPC endpoint URL.
    pub const JSON_RPC_URL: &str = "JSON_RPC_URL";
    /// Fallback aggregate quorum.
    pub const FALLBACK_QUORUM: &str = "FALLBACK_QUORUM";
}

/// Returns `true` for a non-empty value whose lowercase form is not `"false"`.
///
/// ```
/// use eth_provider_selector::config::is_env_true;
///
/// assert!(is_env_true(Some("1")));
/// assert!(is_env_true(Some("no")));
/// assert!(!is_env_true(Some("FALSE")));
/// assert!(!is_env_true(Some("")));
/// assert!(!is_env_true(None));
/// ```
#[must_use]
pub fn is_env_true(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty() && v.to_lowercase() != "false")
}

/// Parse a base-10 integer, returning `default` when the value is absent or
/// does not parse.
///
/// ```
/// use eth_provider_selector::config::parse_config_int;
///
/// assert_eq!(parse_config_int::<usize>(Some("3"), None), Some(3));
/// assert_eq!(parse_config_int::<usize>(Some("three"), None), None);
/// assert_eq!(parse_config_int(None, Some(2_usize)), Some(2));
/// ```
#[must_use]
pub fn parse_config_int<T: FromStr>(value: Option<&str>, default: Option<T>) -> Option<T> {
    value.and_then(|v| v.parse().ok()).or(default)
}

/// A secret configuration value.
///
/// `Debug`, `Display` and serialization never show the value; use
/// [`Secret::expose`] at the point it is handed to an upstream.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

/// Pocket settings, present when any `POCKET_`-prefixed key was configured.
///
/// Both fields are "present" as soon as their key exists, even with an
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PocketSection {
    /// `POCKET_APPLICATION_ID`
    pub application_id: Option<Secret>,
    /// `POCKET_APPLICATION_SECRET_KEY`
    pub application_secret_key: Option<Secret>,
}

/// Typed provider configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    network: Network,
    etherscan_api_key: Option<Secret>,
    infura_project_id: Option<Secret>,
    infura_project_secret: Option<Secret>,
    alchemy_api_key: Option<Secret>,
    cloudflare_enabled: bool,
    pocket: Option<PocketSection>,
    ankr_api_key: Option<Secret>,
    json_rpc_url: Option<Secret>,
    fallback_quorum: Option<usize>,
}

impl ProviderConfig {
    /// Parse configuration from key/value pairs.
    ///
    /// Key order does not matter; when a key repeats, the last value wins.
    /// Single-value keys with an empty value count as absent.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let get = |key: &str| vars.get(key).map(String::as_str);
        let secret = |key: &str| get(key).filter(|v| !v.is_empty()).map(Secret::from);

        let pocket = vars
            .keys()
            .any(|k| k.starts_with(keys::POCKET_PREFIX))
            .then(|| PocketSection {
                application_id: get(keys::POCKET_APPLICATION_ID).map(Secret::from),
                application_secret_key: get(keys::POCKET_APPLICATION_SECRET_KEY)
                    .map(Secret::from),
            });

        let config = Self {
            network: Network::parse(get(keys::ETHEREUM_NETWORK)),
            etherscan_api_key: secret(keys::ETHERSCAN_API_KEY),
            infura_project_id: secret(keys::INFURA_PROJECT_ID),
            infura_project_secret: secret(keys::INFURA_PROJECT_SECRET),
            alchemy_api_key: secret(keys::ALCHEMY_API_KEY),
            cloudflare_enabled: is_env_true(get(keys::CLOUDFLARE_ENABLED)),
            pocket,
            ankr_api_key: secret(keys::ANKR_API_KEY),
            json_rpc_url: secret(keys::JSON_RPC_URL),
            fallback_quorum: parse_config_int(get(keys::FALLBACK_QUORUM), None),
        };

        debug!(config = ?config, "Parsed provider configuration");

        config
    }

    /// Load configuration from the process environment.
    ///
    /// Loads a `.env` file from the current directory first if one exists;
    /// variables already set in the environment take precedence.
    #[must_use]
    pub fn from_env() -> Self {
        // Load .env file if present (ignore error if file doesn't exist)
        dotenvy::dotenv().ok();
        Self::from_vars(ambient_vars())
    }

    /// Load configuration from a specific dotenv file plus the process
    /// environment.
    ///
    /// The process environment is not modified. Variables set in the
    /// environment take precedence over the file, as with `dotenvy`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be opened or
    /// contains a malformed line.
    pub fn from_env_file(path: impl AsRef<Path>) -> SelectorResult<Self> {
        let path = path.as_ref();
        let load_err = |e: dotenvy::Error| {
            SelectorError::config(
                format!("failed to load env file {}", path.display()),
                Some(Box::new(e)),
            )
        };

        let mut vars = BTreeMap::new();
        for item in dotenvy::from_path_iter(path).map_err(load_err)? {
            let (key, value) = item.map_err(load_err)?;
            vars.insert(key, value);
        }
        vars.extend(ambient_vars());

        Ok(Self::from_vars(vars))
    }

    /// Network the providers are built for.
    #[must_use]
    pub const fn network(&self) -> &Network {
        &self.network
    }

    /// `ETHERSCAN_API_KEY`
    #[must_use]
    pub const fn etherscan_api_key(&self) -> Option<&Secret> {
        self.etherscan_api_key.as_ref()
    }

    /// `INFURA_PROJECT_ID`
    #[must_use]
    pub const fn infura_project_id(&self) -> Option<&Secret> {
        self.infura_project_id.as_ref()
    }

    /// `INFURA_PROJECT_SECRET`
    #[must_use]
    pub const fn infura_project_secret(&self) -> Option<&Secret> {
        self.infura_project_secret.as_ref()
    }

    /// `ALCHEMY_API_KEY`
    #[must_use]
    pub const fn alchemy_api_key(&self) -> Option<&Secret> {
        self.alchemy_api_key.as_ref()
    }

    /// Whether `CLOUDFLARE_ENABLED` is truthy.
    #[must_use]
    pub const fn cloudflare_enabled(&self) -> bool {
        self.cloudflare_enabled
    }

    /// Pocket section, if any `POCKET_` key was set.
    #[must_use]
    pub const fn pocket(&self) -> Option<&PocketSection> {
        self.pocket.as_ref()
    }

    /// `ANKR_API_KEY`
    #[must_use]
    pub const fn ankr_api_key(&self) -> Option<&Secret> {
        self.ankr_api_key.as_ref()
    }

    /// `JSON_RPC_URL`. Treated as a secret since hosted URLs often embed keys.
    #[must_use]
    pub const fn json_rpc_url(&self) -> Option<&Secret> {
        self.json_rpc_url.as_ref()
    }

    /// `FALLBACK_QUORUM`, if it parsed as an integer.
    #[must_use]
    pub const fn fallback_quorum(&self) -> Option<usize> {
        self.fallback_quorum
    }
}

/// Environment variables with valid UTF-8 keys and values.
fn ambient_vars() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os().filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config() {
        let config = ProviderConfig::from_vars(Vec::<(String, String)>::new());
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.network(), &Network::Named("mainnet".into()));
        assert!(config.pocket().is_none());
        assert!(!config.cloudflare_enabled());
    }

    #[test]
    fn test_empty_values_count_as_absent() {
        let config = ProviderConfig::from_vars([
            (keys::ETHERSCAN_API_KEY, ""),
            (keys::INFURA_PROJECT_ID, ""),
            (keys::ALCHEMY_API_KEY, ""),
            (keys::ANKR_API_KEY, ""),
            (keys::JSON_RPC_URL, ""),
        ]);
        assert!(config.etherscan_api_key().is_none());
        assert!(config.infura_project_id().is_none());
        assert!(config.alchemy_api_key().is_none());
        assert!(config.ankr_api_key().is_none());
        assert!(config.json_rpc_url().is_none());
    }

    #[test]
    fn test_cloudflare_flag_parsing() {
        for (value, expected) in [
            ("1", true),
            ("true", true),
            ("yes", true),
            ("0", true),
            ("false", false),
            ("False", false),
            ("FALSE", false),
            ("", false),
        ] {
            let config = ProviderConfig::from_vars([(keys::CLOUDFLARE_ENABLED, value)]);
            assert_eq!(config.cloudflare_enabled(), expected, "value {value:?}");
        }
    }

    #[test]
    fn test_any_pocket_prefixed_key_opens_section() {
        let config = ProviderConfig::from_vars([("POCKET_SOMETHING_ELSE", "x")]);
        let pocket = config.pocket();
        assert!(pocket.is_some());
        if let Some(pocket) = pocket {
            assert!(pocket.application_id.is_none());
            assert!(pocket.application_secret_key.is_none());
        }
    }

    #[test]
    fn test_pocket_empty_value_counts_as_present() {
        let config = ProviderConfig::from_vars([(keys::POCKET_APPLICATION_ID, "")]);
        assert_eq!(
            config.pocket().and_then(|p| p.application_id.clone()),
            Some(Secret::new(""))
        );
    }

    #[test]
    fn test_quorum_parsing() {
        let parsed = |v: &str| ProviderConfig::from_vars([(keys::FALLBACK_QUORUM, v)]);
        assert_eq!(parsed("2").fallback_quorum(), Some(2));
        assert_eq!(parsed("0").fallback_quorum(), Some(0));
        assert_eq!(parsed("two").fallback_quorum(), None);
        assert_eq!(parsed("").fallback_quorum(), None);
        assert_eq!(parsed("-1").fallback_quorum(), None);
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = ProviderConfig::from_vars([
            (keys::ALCHEMY_API_KEY, "super-secret-key"),
            (keys::JSON_RPC_URL, "https://rpc.example/super-secret-key"),
        ]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-key"));
        assert_eq!(
            config.alchemy_api_key().map(Secret::expose),
            Some("super-secret-key")
        );
        assert_eq!(Secret::new("x").to_string(), "***");
    }

    #[test]
    fn test_from_env_file_missing_file() {
        let result = ProviderConfig::from_env_file("/nonexistent/dir/.env");
        assert!(matches!(result, Err(SelectorError::ConfigError { .. })));
    }

    #[test]
    fn test_from_env_file_reads_values() {
        let Ok(mut file) = tempfile::NamedTempFile::new() else {
            return;
        };
        assert!(writeln!(file, "JSON_RPC_URL=https://rpc.from-file.example").is_ok());

        let config = ProviderConfig::from_env_file(file.path());
        assert!(config.is_ok());

        // The ambient environment wins when it sets the same key.
        if std::env::var_os(keys::JSON_RPC_URL).is_none() {
            if let Ok(config) = config {
                assert_eq!(
                    config.json_rpc_url().map(Secret::expose),
                    Some("https://rpc.from-file.example")
                );
            }
        }
    }
}
