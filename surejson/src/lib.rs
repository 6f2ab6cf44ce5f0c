//! # surejson
//!
//! A resilient client for obtaining a single well-formed JSON object from a
//! text-generation model that returns free-form, sometimes malformed, text.
//!
//! Two components compose sequentially: an extractor that locates and
//! repairs the first `{...}` span in arbitrary text, and a query client that
//! invokes a remote model through an injected transport and retries the
//! whole cycle with full-jitter exponential backoff until it has a value of
//! the requested type or the attempt budget is spent.
//!
//! ## Example
//!
//! ```no_run
//! # use serde::Deserialize;
//! # use surejson::prelude::*;
//! #[derive(Debug, Deserialize)]
//! struct Answer {
//!     response: String,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let invoker = HttpInvoker::new(std::env::var("BEDROCK_API_KEY")?)?;
//! let client = QueryClient::new(invoker);
//!
//! let answer: Answer = client.query("Question: test").await?;
//! println!("{}", answer.response);
//! # Ok(())
//! # }
//! ```
//!
//! Callers should treat [`Exhausted`] as "no answer available" and degrade
//! gracefully; per-attempt failure reasons are logged and carried in the
//! error's history, never raised individually.

#![deny(missing_docs)]

/// Full-jitter exponential backoff.
pub mod backoff;
/// The resilient query client and its retry loop.
pub mod client;
/// Retry and model configuration.
pub mod config;
/// Failure taxonomy and the terminal error.
pub mod error;
/// Extraction of the first balanced JSON object from free-form text.
pub mod extract;
/// Commonly used types and traits.
pub mod prelude;
/// Tolerant repair of near-valid JSON text.
pub mod repair;

pub use backoff::full_jitter;
pub use client::QueryClient;
pub use config::QueryConfig;
pub use error::{AttemptFailure, AttemptRecord, Exhausted};
pub use extract::extract_first_json_object;
pub use repair::repair_json;
