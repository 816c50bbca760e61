//! Provider construction.
//!
//! The selector never builds connections itself. It drives a
//! [`ProviderFactory`], which knows how to turn an upstream choice into a
//! handle of its own [`ProviderFactory::Provider`] type.
//!
//! # Factories
//!
//! - **Alloy** ([`http`]): HTTP transports against the hosted upstream
//!   endpoints, aggregated with Alloy's `FallbackLayer`
//! - Anything else: implement the trait, e.g. a recording factory in tests
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        SelectionPlan         │
//! │ (ordered, validated choices) │
//! └──────────────────────────────┘
//!                │
//!      ┌─────────▼─────────┐
//!      │  ProviderFactory  │
//!      └───────────────────┘
//!       │        │        │
//!   default   single   fallback
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use eth_provider_selector::config::ProviderConfig;
//! use eth_provider_selector::rpc::{check_connection, AlloyProviderFactory};
//! use eth_provider_selector::selector::select_provider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::from_env();
//! let handle = select_provider(&config, &AlloyProviderFactory::new())?;
//! check_connection(&handle).await?;
//! # Ok(())
//! # }
//! ```

pub mod endpoints;
pub mod http;

use crate::config::Secret;
use crate::error::SelectorResult;
use crate::network::Network;
use crate::selector::{InfuraCredentials, PocketCredentials};

// Re-export commonly used types
pub use http::{check_connection, get_chain_id, get_latest_block, AlloyProviderFactory, RpcHandle};

/// Builds provider handles for each supported upstream.
///
/// Every method receives the arguments of exactly one upstream. The
/// selector calls them in its fixed evaluation order and then, depending on
/// how many upstreams were enabled, returns one handle directly, calls
/// [`ProviderFactory::fallback`], or calls
/// [`ProviderFactory::default_provider`] instead of any of the others.
pub trait ProviderFactory {
    /// Handle type produced by this factory.
    type Provider;

    /// Etherscan-backed provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn etherscan(&self, network: &Network, api_key: &Secret) -> SelectorResult<Self::Provider>;

    /// Infura provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn infura(
        &self,
        network: &Network,
        credentials: &InfuraCredentials,
    ) -> SelectorResult<Self::Provider>;

    /// Alchemy provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn alchemy(&self, network: &Network, api_key: &Secret) -> SelectorResult<Self::Provider>;

    /// Cloudflare gateway provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn cloudflare(&self, network: &Network) -> SelectorResult<Self::Provider>;

    /// Pocket Network provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn pocket(
        &self,
        network: &Network,
        credentials: &PocketCredentials,
    ) -> SelectorResult<Self::Provider>;

    /// Ankr provider.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn ankr(&self, network: &Network, api_key: &Secret) -> SelectorResult<Self::Provider>;

    /// Provider for an arbitrary JSON-RPC endpoint.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn json_rpc(&self, url: &str, network: &Network) -> SelectorResult<Self::Provider>;

    /// Provider used when no upstream is configured.
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn default_provider(&self, network: &Network) -> SelectorResult<Self::Provider>;

    /// Aggregate over two or more providers, in the order given.
    ///
    /// `quorum` is `None` when `FALLBACK_QUORUM` was not set or did not
    /// parse; implementations should then apply
    /// [`default_quorum`](crate::selector::default_quorum).
    ///
    /// # Errors
    ///
    /// Implementation defined.
    fn fallback(
        &self,
        providers: Vec<Self::Provider>,
        quorum: Option<usize>,
    ) -> SelectorResult<Self::Provider>;
}
