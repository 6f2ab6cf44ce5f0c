//! Retry and model configuration.

use std::time::Duration;

use bedrock_adapter::DEFAULT_MODEL_ID;

/// Configuration for the resilient query client.
///
/// The defaults reproduce the fixed constants this client shipped with:
/// five attempts, a 10 s backoff base, and a 50 s jitter ceiling. Tests and
/// callers with tighter latency budgets can dial them down.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Identifier of the model to invoke.
    pub model_id: String,

    /// Token budget sent with each request when the caller does not
    /// override it per call. Default: 2000.
    pub max_tokens: u32,

    /// Attempt budget per query, counting the first attempt. Default: 5.
    pub max_attempts: u32,

    /// Backoff base; the delay ceiling for attempt `n` is
    /// `base * 2^n`. Default: 10 s.
    pub base_delay: Duration,

    /// Upper bound on any single backoff delay. Default: 50 s.
    pub jitter_cap: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: 2000,
            max_attempts: 5,
            base_delay: Duration::from_millis(10_000),
            jitter_cap: Duration::from_millis(50_000),
        }
    }
}

impl QueryConfig {
    /// Creates a new `QueryConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Sets the default per-request token budget.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the attempt budget.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the backoff base.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the backoff ceiling.
    #[must_use]
    pub const fn with_jitter_cap(mut self, jitter_cap: Duration) -> Self {
        self.jitter_cap = jitter_cap;
        self
    }
}
