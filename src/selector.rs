//! Provider selection policy.
//!
//! Selection happens in two steps:
//!
//! 1. [`SelectionPlan::from_config`] walks the configured upstreams in a fixed
//!    order (Etherscan, Infura, Alchemy, Cloudflare, Pocket, Ankr, JSON-RPC),
//!    validates the secret pairs and records one [`ProviderChoice`] per
//!    enabled upstream. Nothing is constructed yet.
//! 2. [`SelectionPlan::build`] hands each choice to a [`ProviderFactory`] and
//!    shapes the result: no choices yields the factory's default provider,
//!    one yields that provider, more yield a fallback aggregate over all of
//!    them in plan order.
//!
//! ```
//! use eth_provider_selector::config::ProviderConfig;
//! use eth_provider_selector::selector::{SelectionPlan, SelectionShape};
//!
//! let config = ProviderConfig::from_vars([
//!     ("ANKR_API_KEY", "key"),
//!     ("CLOUDFLARE_ENABLED", "1"),
//! ]);
//! let plan = SelectionPlan::from_config(&config).unwrap();
//!
//! // Cloudflare is evaluated before Ankr.
//! assert_eq!(plan.kinds(), vec!["cloudflare", "ankr"]);
//! assert_eq!(plan.shape(), SelectionShape::Fallback { members: 2, quorum: 1 });
//! ```

use crate::config::{keys, ProviderConfig, Secret};
use crate::error::{SelectorError, SelectorResult};
use crate::network::Network;
use crate::rpc::ProviderFactory;
use serde::Serialize;
use tracing::{debug, info};

/// Infura project credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfuraCredentials {
    /// Project id.
    pub project_id: Secret,
    /// Optional project secret, sent as the basic-auth password.
    pub project_secret: Option<Secret>,
}

/// Pocket Network application credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PocketCredentials {
    /// Application id.
    pub application_id: Secret,
    /// Application secret key.
    pub application_secret_key: Secret,
}

/// One enabled upstream together with the arguments it is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProviderChoice {
    /// Etherscan API.
    Etherscan {
        /// API key.
        api_key: Secret,
    },
    /// Infura.
    Infura(InfuraCredentials),
    /// Alchemy.
    Alchemy {
        /// API key.
        api_key: Secret,
    },
    /// Cloudflare public gateway.
    Cloudflare,
    /// Pocket Network.
    Pocket(PocketCredentials),
    /// Ankr.
    Ankr {
        /// API key.
        api_key: Secret,
    },
    /// Arbitrary JSON-RPC endpoint.
    JsonRpc {
        /// Endpoint URL.
        url: Secret,
    },
}

impl ProviderChoice {
    /// Short lowercase name of the upstream.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Etherscan { .. } => "etherscan",
            Self::Infura(_) => "infura",
            Self::Alchemy { .. } => "alchemy",
            Self::Cloudflare => "cloudflare",
            Self::Pocket(_) => "pocket",
            Self::Ankr { .. } => "ankr",
            Self::JsonRpc { .. } => "json-rpc",
        }
    }

    /// Construct the provider through `factory`.
    ///
    /// # Errors
    ///
    /// Propagates whatever the factory reports.
    pub fn build<F: ProviderFactory>(
        &self,
        factory: &F,
        network: &Network,
    ) -> SelectorResult<F::Provider> {
        debug!(kind = self.kind(), %network, "Constructing provider");

        match self {
            Self::Etherscan { api_key } => factory.etherscan(network, api_key),
            Self::Infura(credentials) => factory.infura(network, credentials),
            Self::Alchemy { api_key } => factory.alchemy(network, api_key),
            Self::Cloudflare => factory.cloudflare(network),
            Self::Pocket(credentials) => factory.pocket(network, credentials),
            Self::Ankr { api_key } => factory.ankr(network, api_key),
            Self::JsonRpc { url } => factory.json_rpc(url.expose(), network),
        }
    }
}

/// Quorum applied to a fallback aggregate of `members` providers when
/// `FALLBACK_QUORUM` is not set: half the members, rounded up.
#[must_use]
pub const fn default_quorum(members: usize) -> usize {
    members.div_ceil(2)
}

/// What a plan builds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionShape {
    /// The factory's default provider for the network.
    Default,
    /// A single upstream.
    Single(&'static str),
    /// A fallback aggregate.
    Fallback {
        /// Number of aggregated providers.
        members: usize,
        /// Effective quorum (configured or [`default_quorum`]).
        quorum: usize,
    },
}

/// Validated, ordered list of upstreams to build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionPlan {
    network: Network,
    choices: Vec<ProviderChoice>,
    quorum: Option<usize>,
}

impl SelectionPlan {
    /// Derive the plan from a parsed configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when:
    /// - `INFURA_PROJECT_SECRET` is set without `INFURA_PROJECT_ID`
    /// - a `POCKET_` key is set but `POCKET_APPLICATION_ID` or
    ///   `POCKET_APPLICATION_SECRET_KEY` is missing (the first missing one
    ///   is named)
    pub fn from_config(config: &ProviderConfig) -> SelectorResult<Self> {
        let mut choices = Vec::new();

        if let Some(api_key) = config.etherscan_api_key() {
            choices.push(ProviderChoice::Etherscan {
                api_key: api_key.clone(),
            });
        }

        match (config.infura_project_id(), config.infura_project_secret()) {
            (Some(project_id), project_secret) => {
                choices.push(ProviderChoice::Infura(InfuraCredentials {
                    project_id: project_id.clone(),
                    project_secret: project_secret.cloned(),
                }));
            }
            (None, Some(_)) => return Err(SelectorError::missing_secret(keys::INFURA_PROJECT_ID)),
            (None, None) => {}
        }

        if let Some(api_key) = config.alchemy_api_key() {
            choices.push(ProviderChoice::Alchemy {
                api_key: api_key.clone(),
            });
        }

        if config.cloudflare_enabled() {
            choices.push(ProviderChoice::Cloudflare);
        }

        if let Some(pocket) = config.pocket() {
            let application_id = pocket
                .application_id
                .clone()
                .ok_or_else(|| SelectorError::missing_secret(keys::POCKET_APPLICATION_ID))?;
            let application_secret_key = pocket.application_secret_key.clone().ok_or_else(|| {
                SelectorError::missing_secret(keys::POCKET_APPLICATION_SECRET_KEY)
            })?;
            choices.push(ProviderChoice::Pocket(PocketCredentials {
                application_id,
                application_secret_key,
            }));
        }

        if let Some(api_key) = config.ankr_api_key() {
            choices.push(ProviderChoice::Ankr {
                api_key: api_key.clone(),
            });
        }

        if let Some(url) = config.json_rpc_url() {
            choices.push(ProviderChoice::JsonRpc { url: url.clone() });
        }

        Ok(Self {
            network: config.network().clone(),
            choices,
            quorum: config.fallback_quorum(),
        })
    }

    /// Network every provider is built for.
    #[must_use]
    pub const fn network(&self) -> &Network {
        &self.network
    }

    /// Enabled upstreams in evaluation order.
    #[must_use]
    pub fn choices(&self) -> &[ProviderChoice] {
        &self.choices
    }

    /// Upstream names in evaluation order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.choices.iter().map(ProviderChoice::kind).collect()
    }

    /// Configured quorum, passed to the factory untouched.
    #[must_use]
    pub const fn quorum(&self) -> Option<usize> {
        self.quorum
    }

    /// What [`SelectionPlan::build`] will produce.
    #[must_use]
    pub fn shape(&self) -> SelectionShape {
        match self.choices.as_slice() {
            [] => SelectionShape::Default,
            [only] => SelectionShape::Single(only.kind()),
            many => SelectionShape::Fallback {
                members: many.len(),
                quorum: self.quorum.unwrap_or_else(|| default_quorum(many.len())),
            },
        }
    }

    /// Construct the provider.
    ///
    /// # Errors
    ///
    /// Propagates factory errors.
    pub fn build<F: ProviderFactory>(&self, factory: &F) -> SelectorResult<F::Provider> {
        let network = &self.network;

        match self.choices.as_slice() {
            [] => {
                info!(%network, "No upstream configured, using default provider");
                factory.default_provider(network)
            }
            [only] => {
                info!(%network, kind = only.kind(), "Using single provider");
                only.build(factory, network)
            }
            many => {
                let providers = many
                    .iter()
                    .map(|choice| choice.build(factory, network))
                    .collect::<SelectorResult<Vec<_>>>()?;
                info!(
                    %network,
                    members = ?self.kinds(),
                    quorum = ?self.quorum,
                    "Using fallback provider"
                );
                factory.fallback(providers, self.quorum)
            }
        }
    }
}

/// Select and construct a provider for `config`.
///
/// # Errors
///
/// Returns a configuration error for a missing secret (see
/// [`SelectionPlan::from_config`]) or whatever the factory reports.
pub fn select_provider<F: ProviderFactory>(
    config: &ProviderConfig,
    factory: &F,
) -> SelectorResult<F::Provider> {
    SelectionPlan::from_config(config)?.build(factory)
}

/// [`select_provider`] over the process environment.
///
/// # Errors
///
/// Same as [`select_provider`].
pub fn select_provider_from_env<F: ProviderFactory>(factory: &F) -> SelectorResult<F::Provider> {
    select_provider(&ProviderConfig::from_env(), factory)
}
