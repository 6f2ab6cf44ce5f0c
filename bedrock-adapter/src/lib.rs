//! Rust adapter for invoking Anthropic models hosted on Amazon Bedrock.
//!
//! This crate provides the wire types for the Bedrock Anthropic messages
//! protocol, an object-safe [`InvokeModel`] transport trait, and a concrete
//! HTTP implementation with bearer authentication and request timeouts.
//!
//! The trait is the seam consumed by higher layers: production code wires in
//! [`HttpInvoker`], tests substitute a scripted fake.

/// Error types returned by adapter operations.
pub mod error;
/// HTTP transport implementation against the Bedrock runtime endpoint.
pub mod http;
/// Wire types for the Bedrock Anthropic messages protocol.
pub mod types;

pub use error::InvokeError;
pub use http::HttpInvoker;
pub use types::*;

/// Opaque remote model invocation.
///
/// Implementations send an [`types::InvokeRequest`] to a model endpoint and
/// return the raw response body. Decoding the body into a message envelope
/// is the caller's concern ([`types::InvokeResponse::from_slice`]).
#[async_trait::async_trait]
pub trait InvokeModel: Send + Sync {
    /// Performs one model invocation and returns the raw response bytes.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError`] if the request could not be sent, timed out,
    /// or the endpoint answered with a non-success status.
    async fn invoke(&self, request: &types::InvokeRequest) -> Result<Vec<u8>, InvokeError>;
}
