//! Failure taxonomy and the terminal error.

use std::time::Duration;

use bedrock_adapter::InvokeError;
use thiserror::Error;

/// Why a single query attempt failed.
///
/// The retry policy treats every variant identically: all are retried
/// under the same budget. The kinds stay distinguishable so the policy
/// could diverge per kind without reworking the error surface.
#[derive(Debug, Error)]
pub enum AttemptFailure {
    /// The remote call failed or its body could not be decoded.
    #[error("transport: {0}")]
    Transport(#[from] InvokeError),

    /// The call succeeded but produced no usable text.
    #[error("model returned no usable text")]
    EmptyOutput,

    /// No syntactically repairable JSON object was found in the output.
    #[error("no repairable JSON object in model output")]
    Extraction {
        /// The model text that contained no object.
        raw_text: String,
    },

    /// The repaired JSON did not deserialize into the requested type.
    #[error("extracted JSON did not match the requested type: {message}")]
    Parse {
        /// Deserializer error message.
        message: String,
        /// The repaired JSON that failed to deserialize.
        json: String,
    },
}

/// Diagnostics retained for one failed attempt.
#[derive(Debug)]
pub struct AttemptRecord {
    /// The attempt number (1-indexed).
    pub attempt_number: u32,
    /// What went wrong.
    pub failure: AttemptFailure,
    /// Time elapsed since the query started when the attempt failed.
    pub elapsed: Duration,
}

/// Terminal failure: every attempt in the budget was consumed.
///
/// This is the only error a query surfaces; per-attempt reasons are logged
/// as they happen and carried here as history. Callers should treat it as
/// "no answer available" and degrade gracefully.
#[derive(Debug, Error)]
#[error("no valid JSON answer after {attempts} attempts")]
pub struct Exhausted {
    /// Number of attempts made.
    pub attempts: u32,
    /// Per-attempt failure records, oldest first.
    pub history: Vec<AttemptRecord>,
}
