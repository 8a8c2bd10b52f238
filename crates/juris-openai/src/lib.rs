//! Text generation and embeddings over an OpenAI-compatible HTTP API.
//!
//! [`OpenAiClient`] implements both [`juris_core::collab::TextGenerator`]
//! (`/chat/completions` in JSON mode) and [`juris_core::collab::Embedder`]
//! (`/embeddings`).

mod client;
mod config;
mod wire;

pub mod error;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
pub use error::{Error, Result};
