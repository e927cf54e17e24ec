//! SCIP Chain
//!
//! Client for the blockchain microservice that stores contracts, deploys
//! them and verifies their source on block explorers.

pub mod client;
pub mod error;

pub use client::{BlockchainClient, HttpBlockchainClient, DEFAULT_TIMEOUT};
pub use error::{ChainError, ChainResult};
