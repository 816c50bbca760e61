//! Network identifiers.
//!
//! `ETHEREUM_NETWORK` holds either a network name (`"mainnet"`, `"sepolia"`,
//! ...) or a numeric chain id. [`Network`] keeps whichever form was given so
//! it can be handed to provider constructors unchanged, and
//! [`Network::known`] resolves it against the table of networks the hosted
//! upstreams serve.

use serde::Serialize;
use std::fmt;

/// Network used when `ETHEREUM_NETWORK` is absent.
pub const DEFAULT_NETWORK: &str = "mainnet";

/// A network name or a numeric chain id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Network {
    /// Network referred to by name.
    Named(String),
    /// Network referred to by EIP-155 chain id.
    ChainId(u64),
}

impl Network {
    /// Parse a raw `ETHEREUM_NETWORK` value.
    ///
    /// Absent or empty values fall back to [`DEFAULT_NETWORK`]. A value made
    /// entirely of base-10 digits is a chain id, anything else is a name.
    ///
    /// ```
    /// use eth_provider_selector::network::Network;
    ///
    /// assert_eq!(Network::parse(None), Network::Named("mainnet".into()));
    /// assert_eq!(Network::parse(Some("137")), Network::ChainId(137));
    /// assert_eq!(Network::parse(Some("ropsten")), Network::Named("ropsten".into()));
    /// ```
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            None => Self::Named(DEFAULT_NETWORK.to_string()),
            Some(v) => v
                .parse::<u64>()
                .map_or_else(|_| Self::Named(v.to_string()), Self::ChainId),
        }
    }

    /// Resolve against the well-known network table.
    #[must_use]
    pub fn known(&self) -> Option<KnownNetwork> {
        match self {
            Self::Named(name) => KnownNetwork::from_name(name),
            Self::ChainId(id) => KnownNetwork::from_chain_id(*id),
        }
    }

    /// The chain id, when it is given directly or the name is well known.
    #[must_use]
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::ChainId(id) => Some(*id),
            Self::Named(_) => self.known().map(KnownNetwork::chain_id),
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::Named(DEFAULT_NETWORK.to_string())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::ChainId(id) => write!(f, "{id}"),
        }
    }
}

/// Networks served by at least one hosted upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownNetwork {
    /// Ethereum mainnet (also known as `homestead`).
    Mainnet,
    /// Ropsten testnet.
    Ropsten,
    /// Rinkeby testnet.
    Rinkeby,
    /// Goerli testnet.
    Goerli,
    /// Kovan testnet.
    Kovan,
    /// Sepolia testnet.
    Sepolia,
    /// Holesky testnet.
    Holesky,
    /// Polygon PoS mainnet.
    Matic,
    /// Polygon Mumbai testnet.
    Maticmum,
    /// Optimism mainnet.
    Optimism,
    /// Optimism Goerli testnet.
    OptimismGoerli,
    /// Arbitrum One.
    Arbitrum,
    /// Arbitrum Goerli testnet.
    ArbitrumGoerli,
}

impl KnownNetwork {
    const ALL: [Self; 13] = [
        Self::Mainnet,
        Self::Ropsten,
        Self::Rinkeby,
        Self::Goerli,
        Self::Kovan,
        Self::Sepolia,
        Self::Holesky,
        Self::Matic,
        Self::Maticmum,
        Self::Optimism,
        Self::OptimismGoerli,
        Self::Arbitrum,
        Self::ArbitrumGoerli,
    ];

    /// Look a network up by name. Matching is case-insensitive.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name == "homestead" {
            return Some(Self::Mainnet);
        }
        Self::ALL.into_iter().find(|n| n.name() == name)
    }

    /// Look a network up by chain id.
    #[must_use]
    pub fn from_chain_id(id: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.chain_id() == id)
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Ropsten => "ropsten",
            Self::Rinkeby => "rinkeby",
            Self::Goerli => "goerli",
            Self::Kovan => "kovan",
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
            Self::Matic => "matic",
            Self::Maticmum => "maticmum",
            Self::Optimism => "optimism",
            Self::OptimismGoerli => "optimism-goerli",
            Self::Arbitrum => "arbitrum",
            Self::ArbitrumGoerli => "arbitrum-goerli",
        }
    }

    /// EIP-155 chain id.
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Ropsten => 3,
            Self::Rinkeby => 4,
            Self::Goerli => 5,
            Self::Kovan => 42,
            Self::Sepolia => 11_155_111,
            Self::Holesky => 17_000,
            Self::Matic => 137,
            Self::Maticmum => 80_001,
            Self::Optimism => 10,
            Self::OptimismGoerli => 420,
            Self::Arbitrum => 42_161,
            Self::ArbitrumGoerli => 421_613,
        }
    }
}

impl fmt::Display for KnownNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
