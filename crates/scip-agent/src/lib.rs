//! SCIP Agent
//!
//! LLM integration for the smart contract platform: a provider-agnostic
//! completion trait, an OpenAI-compatible HTTP client and the [`AiService`]
//! that generates, validates and analyzes Solidity contracts.

pub mod client;
pub mod error;
pub mod openai;
pub mod prompts;
pub mod service;

pub use client::{extract_json_block, CompletionRequest, LlmClient};
pub use error::{LlmError, LlmResult};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use service::AiService;
