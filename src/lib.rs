//! # proxykit
//!
//! Client-side orchestration for counterfactual proxy accounts.
//!
//! The crate takes one or more requested on-chain calls, normalizes them,
//! packs them into a single proxy execution (pass-through or multi-send
//! aggregation), computes and signs the proxy transaction hash, and submits
//! the result either directly through the proxy contract or through a
//! gas-fronting relay service that can also deploy the proxy on first use.

pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod execution;
pub mod managers;
pub mod metrics;
pub mod proxy;
pub mod relay;
pub mod signers;
pub mod signing;
pub mod types;
