//! # Ethereum RPC Provider Selector
//!
//! Picks and builds an Ethereum RPC provider from environment variables,
//! combining several upstreams into a fallback aggregate when more than one
//! is configured. Connections are built with [Alloy](https://github.com/alloy-rs/alloy).
//!
//! ## Architecture
//!
//! 1. **Config Layer** ([`config`]) - Parse the environment into a typed record
//! 2. **Network** ([`network`]) - Network names and chain ids
//! 3. **Selector** ([`selector`]) - Validate secrets, order upstreams, shape the result
//! 4. **RPC Layer** ([`rpc`]) - Provider construction capability and its Alloy backend
//!
//! ## Selection Rules
//!
//! Upstreams are evaluated in a fixed order: Etherscan, Infura, Alchemy,
//! Cloudflare, Pocket, Ankr, JSON-RPC. None configured yields the default
//! provider for the network, one yields that provider, several yield a
//! fallback aggregate in evaluation order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eth_provider_selector::config::ProviderConfig;
//! use eth_provider_selector::rpc::{get_latest_block, AlloyProviderFactory};
//! use eth_provider_selector::selector::select_provider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig::from_env();
//!     let handle = select_provider(&config, &AlloyProviderFactory::new())?;
//!     println!("Latest block: {}", get_latest_block(&handle).await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Setup
//!
//! ```text
//! ETHEREUM_NETWORK=sepolia
//! INFURA_PROJECT_ID=your_project_id
//! CLOUDFLARE_ENABLED=false
//! FALLBACK_QUORUM=1
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`error::SelectorResult<T>`](error::SelectorResult).
//!
//! ## License
//!
//! Licensed under either of MIT or Apache-2.0 at your option.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod network;
pub mod observability;
pub mod rpc;
pub mod selector;
