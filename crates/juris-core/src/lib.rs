//! Core types and trait definitions for the juris contradiction detector.
//!
//! No HTTP or database dependencies. Every other juris crate depends on
//! this one.

// Implementors use native `async fn`; the trait signatures carry `Send`.
#![allow(async_fn_in_trait)]

pub mod case;
pub mod collab;
pub mod contradiction;
pub mod court;
pub mod error;
pub mod report;
pub mod vector;

pub use error::{Error, GenerationError, Result};
