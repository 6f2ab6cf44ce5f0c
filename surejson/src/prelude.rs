//! Common imports for surejson usage.
//!
//! ```
//! use surejson::prelude::*;
//! ```

pub use crate::client::QueryClient;
pub use crate::config::QueryConfig;
pub use crate::error::{AttemptFailure, AttemptRecord, Exhausted};
pub use crate::extract::extract_first_json_object;

// Re-export the transport seam and wire types so callers don't need a
// separate bedrock-adapter import for typical usage.
pub use bedrock_adapter::{
    ChatMessage, HttpInvoker, InvokeError, InvokeModel, InvokeRequest, InvokeResponse,
};
