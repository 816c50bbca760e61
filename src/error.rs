//! Error types for provider selection.
//!
//! This module provides a unified error type [`SelectorError`] covering the
//! two ways provider selection can go wrong:
//! - [`SelectorError::ConfigError`]: missing secrets, unreadable `.env` files,
//!   networks a hosted upstream does not serve
//! - [`SelectorError::RpcError`]: endpoint construction and network round trips
//!
//! All errors implement [`std::error::Error`] and keep the underlying cause in
//! the source chain.
//!
//! # Example
//!
//! ```
//! use eth_provider_selector::error::{SelectorError, SelectorResult};
//!
//! fn require_project_id(project_id: Option<&str>) -> SelectorResult<&str> {
//!     project_id.ok_or_else(|| SelectorError::config("missing INFURA_PROJECT_ID secret", None))
//! }
//!
//! assert!(require_project_id(None).is_err());
//! ```

use std::fmt;

/// Result type alias using [`SelectorError`].
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Boxed underlying cause.
type Source = Option<Box<dyn std::error::Error + Send + Sync>>;

/// Unified error type for provider selection.
#[derive(Debug)]
pub enum SelectorError {
    /// Configuration or environment variable errors.
    ///
    /// Raised for:
    /// - An Infura project secret without a project id
    /// - A Pocket section missing one of its two required keys
    /// - An upstream that cannot serve the requested network
    /// - A `.env` file that cannot be loaded
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Source,
    },

    /// RPC endpoint or network errors.
    ///
    /// Raised for:
    /// - Endpoint URLs that do not parse
    /// - Failed RPC requests
    /// - Chain id mismatches detected by a health check
    RpcError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Source,
    },
}

impl SelectorError {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_provider_selector::error::SelectorError;
    ///
    /// let err = SelectorError::config("missing POCKET_APPLICATION_ID secret", None);
    /// assert!(matches!(err, SelectorError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(message: impl Into<String>, source: Source) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new RPC error.
    ///
    /// # Example
    ///
    /// ```
    /// use eth_provider_selector::error::SelectorError;
    ///
    /// let err = SelectorError::rpc("Failed to fetch chain id", None);
    /// assert!(matches!(err, SelectorError::RpcError { .. }));
    /// ```
    #[must_use]
    pub fn rpc(message: impl Into<String>, source: Source) -> Self {
        Self::RpcError {
            message: message.into(),
            source,
        }
    }

    /// Shorthand for the error raised when a required secret is absent.
    #[must_use]
    pub fn missing_secret(key: &str) -> Self {
        Self::config(format!("missing {key} secret"), None)
    }

    /// The bare message, without the category prefix used by `Display`.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigError { message, .. } | Self::RpcError { message, .. } => message,
        }
    }

    /// Returns `true` for configuration errors.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::RpcError { message, .. } => write!(f, "RPC error: {message}"),
        }
    }
}

impl std::error::Error for SelectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError { source, .. } | Self::RpcError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
        }
    }
}
