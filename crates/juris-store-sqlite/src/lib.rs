//! SQLite backend for the juris case corpus.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Embeddings are stored alongside each
//! case and searched by brute-force cosine similarity.

mod encode;
mod retriever;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use retriever::SemanticRetriever;
pub use store::{CourtCount, SqliteCaseStore};

#[cfg(test)]
mod tests;
