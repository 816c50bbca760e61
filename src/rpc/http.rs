//! Alloy-backed provider construction over HTTP.
//!
//! [`AlloyProviderFactory`] resolves each upstream to an HTTP endpoint (see
//! [`endpoints`](super::endpoints)) and wraps it in an Alloy RPC client.
//! Fallback aggregates stack Alloy's `FallbackLayer` over the member
//! transports with `tower`, the same way a single transport is wrapped.
//!
//! Construction is lazy: no request is sent until the handle is used.
//!
//! ## Example
//!
//! ```no_run
//! use eth_provider_selector::network::Network;
//! use eth_provider_selector::rpc::{get_latest_block, AlloyProviderFactory, ProviderFactory};
//! use eth_provider_selector::error::SelectorResult;
//!
//! # async fn example() -> SelectorResult<()> {
//! let factory = AlloyProviderFactory::new();
//! let handle = factory.json_rpc("http://localhost:8545", &Network::ChainId(31337))?;
//! let latest_block = get_latest_block(&handle).await?;
//! println!("Latest block: {}", latest_block);
//! # Ok(())
//! # }
//! ```

use super::endpoints;
use super::ProviderFactory;
use crate::config::Secret;
use crate::error::{SelectorError, SelectorResult};
use crate::network::Network;
use crate::selector::{default_quorum, InfuraCredentials, PocketCredentials};
use alloy::providers::{Provider as AlloyProvider, RootProvider};
use alloy::rpc::client::RpcClient;
use alloy::transports::http::reqwest::{Client, Url};
use alloy::transports::http::Http;
use alloy::transports::layers::FallbackLayer;
use std::fmt;
use std::num::NonZeroUsize;
use tower::ServiceBuilder;
use tracing::{debug, info, warn};

/// A constructed connection: one endpoint or a fallback aggregate.
#[derive(Clone)]
pub struct RpcHandle {
    label: String,
    expected_chain_id: Option<u64>,
    transports: Vec<Http<Client>>,
    client: RpcClient,
}

impl RpcHandle {
    /// Upstream name, or `fallback(a, b, ...)` for aggregates.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Chain id the handle was built for, when the network is known.
    #[must_use]
    pub const fn expected_chain_id(&self) -> Option<u64> {
        self.expected_chain_id
    }

    /// Number of endpoints behind this handle.
    #[must_use]
    pub fn endpoints(&self) -> usize {
        self.transports.len()
    }

    /// The underlying Alloy RPC client.
    #[must_use]
    pub const fn client(&self) -> &RpcClient {
        &self.client
    }

    /// A root provider over this handle's client.
    #[must_use]
    pub fn provider(&self) -> RootProvider {
        RootProvider::new(self.client.clone())
    }
}

impl fmt::Debug for RpcHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Endpoint URLs carry API keys.
        f.debug_struct("RpcHandle")
            .field("label", &self.label)
            .field("expected_chain_id", &self.expected_chain_id)
            .field("endpoints", &self.transports.len())
            .finish_non_exhaustive()
    }
}

/// [`ProviderFactory`] producing Alloy HTTP clients.
#[derive(Debug, Clone, Default)]
pub struct AlloyProviderFactory {
    http: Client,
}

impl AlloyProviderFactory {
    /// Factory with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory sharing an existing `reqwest` client (timeouts, proxies, ...).
    #[must_use]
    pub const fn with_client(http: Client) -> Self {
        Self { http }
    }

    fn endpoint(&self, label: &str, url: Url, network: &Network) -> RpcHandle {
        debug!(label, %network, host = url.host_str(), "Creating HTTP transport");

        let transport = Http::with_client(self.http.clone(), url);
        let client = RpcClient::builder().transport(transport.clone(), false);

        RpcHandle {
            label: label.to_string(),
            expected_chain_id: network.chain_id(),
            transports: vec![transport],
            client,
        }
    }
}

impl ProviderFactory for AlloyProviderFactory {
    type Provider = RpcHandle;

    fn etherscan(&self, network: &Network, _api_key: &Secret) -> SelectorResult<RpcHandle> {
        Err(SelectorError::config(
            format!(
                "etherscan (network {network}) exposes a REST API, not JSON-RPC; \
                 unset ETHERSCAN_API_KEY to use this backend"
            ),
            None,
        ))
    }

    fn infura(
        &self,
        network: &Network,
        credentials: &InfuraCredentials,
    ) -> SelectorResult<RpcHandle> {
        let url = endpoints::infura(
            network,
            &credentials.project_id,
            credentials.project_secret.as_ref(),
        )?;
        Ok(self.endpoint("infura", url, network))
    }

    fn alchemy(&self, network: &Network, api_key: &Secret) -> SelectorResult<RpcHandle> {
        let url = endpoints::alchemy(network, api_key)?;
        Ok(self.endpoint("alchemy", url, network))
    }

    fn cloudflare(&self, network: &Network) -> SelectorResult<RpcHandle> {
        let url = endpoints::cloudflare(network)?;
        Ok(self.endpoint("cloudflare", url, network))
    }

    fn pocket(
        &self,
        network: &Network,
        credentials: &PocketCredentials,
    ) -> SelectorResult<RpcHandle> {
        let url = endpoints::pocket(
            network,
            &credentials.application_id,
            &credentials.application_secret_key,
        )?;
        Ok(self.endpoint("pocket", url, network))
    }

    fn ankr(&self, network: &Network, api_key: &Secret) -> SelectorResult<RpcHandle> {
        let url = endpoints::ankr(network, api_key)?;
        Ok(self.endpoint("ankr", url, network))
    }

    fn json_rpc(&self, url: &str, network: &Network) -> SelectorResult<RpcHandle> {
        let url = endpoints::parse_url(url)?;
        Ok(self.endpoint("json-rpc", url, network))
    }

    fn default_provider(&self, network: &Network) -> SelectorResult<RpcHandle> {
        let url = endpoints::public(network)?;
        Ok(self.endpoint("default", url, network))
    }

    fn fallback(
        &self,
        providers: Vec<RpcHandle>,
        quorum: Option<usize>,
    ) -> SelectorResult<RpcHandle> {
        let labels: Vec<&str> = providers.iter().map(RpcHandle::label).collect();
        let label = format!("fallback({})", labels.join(", "));

        let expected_chain_id = providers.first().and_then(RpcHandle::expected_chain_id);
        let transports: Vec<Http<Client>> = providers
            .iter()
            .flat_map(|p| p.transports.iter().cloned())
            .collect();

        let requested = quorum.unwrap_or_else(|| default_quorum(providers.len()));
        let active = NonZeroUsize::new(requested.clamp(1, transports.len().max(1)))
            .filter(|_| !transports.is_empty())
            .ok_or_else(|| SelectorError::rpc("fallback needs at least one provider", None))?;
        if active.get() != requested {
            warn!(
                requested,
                active = active.get(),
                endpoints = transports.len(),
                "Fallback quorum out of range, clamped"
            );
        }

        // Each request goes to the `active` best-ranked transports; the
        // first successful response wins.
        let layer = FallbackLayer::default().with_active_transport_count(active);
        let service = ServiceBuilder::new().layer(layer).service(transports.clone());
        let client = RpcClient::builder().transport(service, false);

        info!(%label, quorum = active.get(), "Fallback provider assembled");

        Ok(RpcHandle {
            label,
            expected_chain_id,
            transports,
            client,
        })
    }
}

/// Get the latest block number through `handle`.
///
/// # Errors
///
/// Returns an error if the RPC request fails.
pub async fn get_latest_block(handle: &RpcHandle) -> SelectorResult<u64> {
    debug!(label = handle.label(), "Fetching latest block number");

    let block_number = handle
        .provider()
        .get_block_number()
        .await
        .map_err(|e| SelectorError::rpc("Failed to fetch latest block number", Some(Box::new(e))))?;

    info!(label = handle.label(), block_number, "Latest block number");

    Ok(block_number)
}

/// Get the chain id reported by the endpoint behind `handle`.
///
/// # Errors
///
/// Returns an error if the RPC request fails.
pub async fn get_chain_id(handle: &RpcHandle) -> SelectorResult<u64> {
    handle
        .provider()
        .get_chain_id()
        .await
        .map_err(|e| SelectorError::rpc("Failed to fetch chain id", Some(Box::new(e))))
}

/// Check that `handle` answers and serves the network it was built for.
///
/// # Errors
///
/// Returns an error if a request fails or the reported chain id differs
/// from the expected one.
pub async fn check_connection(handle: &RpcHandle) -> SelectorResult<()> {
    debug!(label = handle.label(), "Checking provider connection health");

    let chain_id = get_chain_id(handle).await?;
    if let Some(expected) = handle.expected_chain_id() {
        if chain_id != expected {
            return Err(SelectorError::rpc(
                format!("endpoint serves chain {chain_id}, expected {expected}"),
                None,
            ));
        }
    }

    match get_latest_block(handle).await {
        Ok(block) => {
            info!(chain_id, block, "Connection check successful");
            Ok(())
        }
        Err(e) => {
            warn!("Connection check failed: {}", e);
            Err(SelectorError::rpc(
                format!("Provider connection health check failed: {e}"),
                None,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mainnet() -> Network {
        Network::default()
    }

    #[test]
    fn test_single_endpoint_handle() {
        let factory = AlloyProviderFactory::new();
        let handle = factory.alchemy(&mainnet(), &Secret::new("key"));
        assert!(handle.is_ok());
        if let Ok(handle) = handle {
            assert_eq!(handle.label(), "alchemy");
            assert_eq!(handle.expected_chain_id(), Some(1));
            assert_eq!(handle.endpoints(), 1);
        }
    }

    #[test]
    fn test_etherscan_is_rejected() {
        let factory = AlloyProviderFactory::new();
        let err = factory.etherscan(&mainnet(), &Secret::new("key")).err();
        assert!(err.is_some_and(|e| e.is_config()));
    }

    #[test]
    fn test_json_rpc_unknown_network_has_no_expected_chain() {
        let factory = AlloyProviderFactory::new();
        let handle = factory.json_rpc("https://rpc.example/x", &Network::Named("gnosis".into()));
        assert_eq!(handle.ok().map(|h| h.expected_chain_id()), Some(None));
    }

    #[test]
    fn test_json_rpc_invalid_url() {
        let factory = AlloyProviderFactory::new();
        assert!(factory.json_rpc("not-a-valid-url", &mainnet()).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_urls() {
        let factory = AlloyProviderFactory::new();
        let handle = factory.ankr(&mainnet(), &Secret::new("leaky-key"));
        let debug = handle.map(|h| format!("{h:?}")).unwrap_or_default();
        assert!(debug.contains("ankr"));
        assert!(!debug.contains("leaky-key"));
    }

    #[tokio::test]
    async fn test_fallback_handle() {
        let factory = AlloyProviderFactory::new();
        let members = [
            factory.cloudflare(&mainnet()),
            factory.ankr(&mainnet(), &Secret::new("key")),
        ]
        .into_iter()
        .collect::<SelectorResult<Vec<_>>>();
        assert!(members.is_ok());

        if let Ok(members) = members {
            let handle = factory.fallback(members, None);
            assert!(handle.is_ok());
            if let Ok(handle) = handle {
                assert_eq!(handle.label(), "fallback(cloudflare, ankr)");
                assert_eq!(handle.endpoints(), 2);
                assert_eq!(handle.expected_chain_id(), Some(1));
            }
        }
    }

    #[tokio::test]
    async fn test_fallback_quorum_is_clamped() {
        let factory = AlloyProviderFactory::new();
        let members = [
            factory.cloudflare(&mainnet()),
            factory.alchemy(&mainnet(), &Secret::new("key")),
        ]
        .into_iter()
        .collect::<SelectorResult<Vec<_>>>();

        if let Ok(members) = members {
            assert!(factory.fallback(members.clone(), Some(0)).is_ok());
            assert!(factory.fallback(members, Some(10)).is_ok());
        }
    }

    #[test]
    fn test_fallback_without_members_fails() {
        let factory = AlloyProviderFactory::new();
        assert!(factory.fallback(Vec::new(), None).is_err());
    }

    #[tokio::test]
    #[ignore = "Requires network access to the public mainnet endpoint"]
    async fn test_default_provider_integration() {
        let factory = AlloyProviderFactory::new();
        if let Ok(handle) = factory.default_provider(&mainnet()) {
            let result = check_connection(&handle).await;
            assert!(result.is_ok());
        }
    }

    #[tokio::test]
    #[ignore = "Requires a local node on http://localhost:8545"]
    async fn test_get_latest_block_integration() {
        let factory = AlloyProviderFactory::new();
        if let Ok(handle) = factory.json_rpc("http://localhost:8545", &Network::ChainId(31337)) {
            let block_number = get_latest_block(&handle).await;
            assert!(block_number.is_ok());
        }
    }
}
