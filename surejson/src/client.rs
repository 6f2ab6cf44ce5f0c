//! The resilient query client and its retry loop.

use bedrock_adapter::{InvokeModel, InvokeRequest, InvokeResponse};
use serde::de::DeserializeOwned;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, warn};

use crate::backoff::full_jitter;
use crate::config::QueryConfig;
use crate::error::{AttemptFailure, AttemptRecord, Exhausted};
use crate::extract::extract_first_json_object;

/// Client that queries a model for a single well-formed JSON object,
/// retrying the whole invoke–extract–parse cycle until it succeeds or the
/// attempt budget is spent.
///
/// The transport is injected at construction, so tests substitute a
/// scripted fake. The client holds no mutable state; concurrent queries on
/// one instance are independent.
pub struct QueryClient<I> {
    invoker: I,
    config: QueryConfig,
}

impl<I: InvokeModel> QueryClient<I> {
    /// Creates a client with the default [`QueryConfig`].
    pub fn new(invoker: I) -> Self {
        Self::with_config(invoker, QueryConfig::default())
    }

    /// Creates a client with an explicit configuration.
    pub const fn with_config(invoker: I, config: QueryConfig) -> Self {
        Self { invoker, config }
    }

    /// Queries the model using the configured default token budget.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] once every attempt in the budget has failed;
    /// no other error is surfaced.
    pub async fn query<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, Exhausted> {
        self.query_with_max_tokens(prompt, self.config.max_tokens)
            .await
    }

    /// Queries the model with a per-call token budget override.
    ///
    /// Each attempt runs the full cycle (invoke, decode the envelope, trim
    /// the first content block, extract a JSON object, deserialize into
    /// `T`), and any failure along the way schedules a retry after a
    /// full-jitter delay. Attempts are sequential; the loop runs to success
    /// or exhaustion.
    ///
    /// # Errors
    ///
    /// Returns [`Exhausted`] once every attempt in the budget has failed.
    pub async fn query_with_max_tokens<T: DeserializeOwned>(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<T, Exhausted> {
        let start = Instant::now();
        let mut history = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            match self.attempt(prompt, max_tokens).await {
                Ok(value) => {
                    debug!(attempt, "query produced a valid JSON object");
                    return Ok(value);
                }
                Err(failure) => {
                    warn!(attempt, error = %failure, "query attempt failed");
                    history.push(AttemptRecord {
                        attempt_number: attempt,
                        failure,
                        elapsed: start.elapsed(),
                    });
                }
            }

            if attempt < self.config.max_attempts {
                let delay = {
                    let mut rng = rand::thread_rng();
                    full_jitter(
                        attempt,
                        self.config.base_delay,
                        self.config.jitter_cap,
                        &mut rng,
                    )
                };
                sleep(delay).await;
            }
        }

        error!(
            attempts = self.config.max_attempts,
            "all query attempts failed"
        );
        Err(Exhausted {
            attempts: self.config.max_attempts,
            history,
        })
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<T, AttemptFailure> {
        let request =
            InvokeRequest::user_message(self.config.model_id.as_str(), prompt, max_tokens);

        let body = self.invoker.invoke(&request).await?;
        let envelope = InvokeResponse::from_slice(&body)?;

        let raw_text = envelope.first_text().map(str::trim).unwrap_or_default();
        if raw_text.is_empty() {
            return Err(AttemptFailure::EmptyOutput);
        }

        let Some(candidate) = extract_first_json_object(raw_text) else {
            error!(raw_text = %raw_text, "no JSON object found in model output");
            return Err(AttemptFailure::Extraction {
                raw_text: raw_text.to_string(),
            });
        };

        serde_json::from_str(&candidate).map_err(|err| AttemptFailure::Parse {
            message: err.to_string(),
            json: candidate,
        })
    }
}
