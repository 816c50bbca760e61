//! Endpoint URLs of the hosted upstreams.
//!
//! Each upstream serves a fixed set of networks. Asking for a network an
//! upstream does not serve is a configuration error rather than a silent
//! fallback to mainnet.

use crate::config::Secret;
use crate::error::{SelectorError, SelectorResult};
use crate::network::{KnownNetwork, Network};
use alloy::transports::http::reqwest::Url;

const CLOUDFLARE_URL: &str = "https://cloudflare-eth.com/";

fn infura_host(network: KnownNetwork) -> Option<&'static str> {
    Some(match network {
        KnownNetwork::Mainnet => "mainnet.infura.io",
        KnownNetwork::Ropsten => "ropsten.infura.io",
        KnownNetwork::Rinkeby => "rinkeby.infura.io",
        KnownNetwork::Kovan => "kovan.infura.io",
        KnownNetwork::Goerli => "goerli.infura.io",
        KnownNetwork::Sepolia => "sepolia.infura.io",
        KnownNetwork::Holesky => "holesky.infura.io",
        KnownNetwork::Matic => "polygon-mainnet.infura.io",
        KnownNetwork::Maticmum => "polygon-mumbai.infura.io",
        KnownNetwork::Optimism => "optimism-mainnet.infura.io",
        KnownNetwork::OptimismGoerli => "optimism-goerli.infura.io",
        KnownNetwork::Arbitrum => "arbitrum-mainnet.infura.io",
        KnownNetwork::ArbitrumGoerli => "arbitrum-goerli.infura.io",
    })
}

fn alchemy_host(network: KnownNetwork) -> Option<&'static str> {
    match network {
        KnownNetwork::Mainnet => Some("eth-mainnet.g.alchemy.com"),
        KnownNetwork::Goerli => Some("eth-goerli.g.alchemy.com"),
        KnownNetwork::Sepolia => Some("eth-sepolia.g.alchemy.com"),
        KnownNetwork::Holesky => Some("eth-holesky.g.alchemy.com"),
        KnownNetwork::Matic => Some("polygon-mainnet.g.alchemy.com"),
        KnownNetwork::Maticmum => Some("polygon-mumbai.g.alchemy.com"),
        KnownNetwork::Optimism => Some("opt-mainnet.g.alchemy.com"),
        KnownNetwork::OptimismGoerli => Some("opt-goerli.g.alchemy.com"),
        KnownNetwork::Arbitrum => Some("arb-mainnet.g.alchemy.com"),
        KnownNetwork::ArbitrumGoerli => Some("arb-goerli.g.alchemy.com"),
        KnownNetwork::Ropsten | KnownNetwork::Rinkeby | KnownNetwork::Kovan => None,
    }
}

fn pocket_host(network: KnownNetwork) -> Option<&'static str> {
    match network {
        KnownNetwork::Mainnet => Some("eth-mainnet.gateway.pokt.network"),
        KnownNetwork::Goerli => Some("eth-goerli.gateway.pokt.network"),
        KnownNetwork::Matic => Some("poly-mainnet.gateway.pokt.network"),
        KnownNetwork::Maticmum => Some("polygon-mumbai-rpc.gateway.pokt.network"),
        _ => None,
    }
}

fn ankr_chain(network: KnownNetwork) -> Option<&'static str> {
    match network {
        KnownNetwork::Mainnet => Some("eth"),
        KnownNetwork::Goerli => Some("eth_goerli"),
        KnownNetwork::Sepolia => Some("eth_sepolia"),
        KnownNetwork::Holesky => Some("eth_holesky"),
        KnownNetwork::Matic => Some("polygon"),
        KnownNetwork::Maticmum => Some("polygon_mumbai"),
        KnownNetwork::Optimism => Some("optimism"),
        KnownNetwork::Arbitrum => Some("arbitrum"),
        _ => None,
    }
}

fn public_url(network: KnownNetwork) -> Option<&'static str> {
    match network {
        KnownNetwork::Mainnet => Some("https://ethereum-rpc.publicnode.com"),
        KnownNetwork::Sepolia => Some("https://ethereum-sepolia-rpc.publicnode.com"),
        KnownNetwork::Holesky => Some("https://ethereum-holesky-rpc.publicnode.com"),
        KnownNetwork::Matic => Some("https://polygon-bor-rpc.publicnode.com"),
        KnownNetwork::Optimism => Some("https://optimism-rpc.publicnode.com"),
        KnownNetwork::Arbitrum => Some("https://arbitrum-one-rpc.publicnode.com"),
        _ => None,
    }
}

/// Resolve `network` and look it up in an upstream table.
fn lookup(
    upstream: &str,
    network: &Network,
    table: fn(KnownNetwork) -> Option<&'static str>,
) -> SelectorResult<&'static str> {
    network.known().and_then(table).ok_or_else(|| {
        SelectorError::config(format!("{upstream} does not serve network {network}"), None)
    })
}

/// Parse an endpoint URL.
///
/// # Errors
///
/// Returns an RPC error if `url` does not parse.
pub fn parse_url(url: &str) -> SelectorResult<Url> {
    url.parse()
        .map_err(|e| SelectorError::rpc("Failed to parse RPC URL", Some(Box::new(e))))
}

/// Attach `password` as basic-auth credentials with an empty user name.
fn with_password(mut url: Url, password: &Secret) -> SelectorResult<Url> {
    url.set_password(Some(password.expose()))
        .map_err(|()| SelectorError::rpc("RPC URL cannot carry credentials", None))?;
    Ok(url)
}

/// `https://<host>/v3/<project id>`, with the project secret as basic-auth
/// password when present.
///
/// # Errors
///
/// Configuration error for unsupported networks.
pub fn infura(
    network: &Network,
    project_id: &Secret,
    project_secret: Option<&Secret>,
) -> SelectorResult<Url> {
    let host = lookup("infura", network, infura_host)?;
    let url = parse_url(&format!("https://{host}/v3/{}", project_id.expose()))?;
    match project_secret {
        Some(secret) => with_password(url, secret),
        None => Ok(url),
    }
}

/// `https://<host>/v2/<api key>`
///
/// # Errors
///
/// Configuration error for unsupported networks.
pub fn alchemy(network: &Network, api_key: &Secret) -> SelectorResult<Url> {
    let host = lookup("alchemy", network, alchemy_host)?;
    parse_url(&format!("https://{host}/v2/{}", api_key.expose()))
}

/// Cloudflare's public gateway. Mainnet only.
///
/// # Errors
///
/// Configuration error for any other network.
pub fn cloudflare(network: &Network) -> SelectorResult<Url> {
    lookup("cloudflare", network, |n| {
        (n == KnownNetwork::Mainnet).then_some(CLOUDFLARE_URL)
    })
    .and_then(parse_url)
}

/// `https://<host>/v1/lb/<application id>`, with the secret key as
/// basic-auth password.
///
/// # Errors
///
/// Configuration error for unsupported networks.
pub fn pocket(
    network: &Network,
    application_id: &Secret,
    application_secret_key: &Secret,
) -> SelectorResult<Url> {
    let host = lookup("pocket", network, pocket_host)?;
    let url = parse_url(&format!("https://{host}/v1/lb/{}", application_id.expose()))?;
    with_password(url, application_secret_key)
}

/// `https://rpc.ankr.com/<chain>/<api key>`
///
/// # Errors
///
/// Configuration error for unsupported networks.
pub fn ankr(network: &Network, api_key: &Secret) -> SelectorResult<Url> {
    let chain = lookup("ankr", network, ankr_chain)?;
    parse_url(&format!("https://rpc.ankr.com/{chain}/{}", api_key.expose()))
}

/// Keyless public endpoint used as the default provider.
///
/// # Errors
///
/// Configuration error for networks without a public endpoint.
pub fn public(network: &Network) -> SelectorResult<Url> {
    lookup("the default provider", network, public_url).and_then(parse_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mainnet() -> Network {
        Network::default()
    }

    #[test]
    fn test_infura_url_with_secret() {
        let url = infura(&mainnet(), &Secret::new("pid"), Some(&Secret::new("psecret")));
        assert!(url.is_ok());
        if let Ok(url) = url {
            assert_eq!(url.host_str(), Some("mainnet.infura.io"));
            assert_eq!(url.path(), "/v3/pid");
            assert_eq!(url.username(), "");
            assert_eq!(url.password(), Some("psecret"));
        }
    }

    #[test]
    fn test_infura_url_by_chain_id() {
        let url = infura(&Network::ChainId(11_155_111), &Secret::new("pid"), None);
        assert_eq!(
            url.ok().map(|u| u.to_string()),
            Some("https://sepolia.infura.io/v3/pid".to_string())
        );
    }

    #[test]
    fn test_alchemy_url() {
        let url = alchemy(&mainnet(), &Secret::new("key"));
        assert_eq!(
            url.ok().map(|u| u.to_string()),
            Some("https://eth-mainnet.g.alchemy.com/v2/key".to_string())
        );
    }

    #[test]
    fn test_cloudflare_mainnet_only() {
        assert!(cloudflare(&mainnet()).is_ok());
        let err = cloudflare(&Network::Named("ropsten".into())).err();
        assert_eq!(
            err.as_ref().map(SelectorError::message),
            Some("cloudflare does not serve network ropsten")
        );
    }

    #[test]
    fn test_pocket_url() {
        let url = pocket(&mainnet(), &Secret::new("app"), &Secret::new("key"));
        assert!(url.is_ok());
        if let Ok(url) = url {
            assert_eq!(url.host_str(), Some("eth-mainnet.gateway.pokt.network"));
            assert_eq!(url.path(), "/v1/lb/app");
            assert_eq!(url.password(), Some("key"));
        }
    }

    #[test]
    fn test_ankr_url() {
        let url = ankr(&Network::Named("matic".into()), &Secret::new("key"));
        assert_eq!(
            url.ok().map(|u| u.to_string()),
            Some("https://rpc.ankr.com/polygon/key".to_string())
        );
    }

    #[test]
    fn test_unknown_network_is_config_error() {
        let err = alchemy(&Network::Named("nowhere".into()), &Secret::new("key")).err();
        assert!(err.is_some_and(|e| e.is_config()));
        assert!(public(&Network::ChainId(123_456_789)).is_err());
    }

    #[test]
    fn test_parse_url_rejects_garbage() {
        assert!(parse_url("not-a-valid-url").is_err());
    }
}
