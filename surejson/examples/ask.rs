//! One-shot structured query against a Bedrock-hosted model.
//!
//! Run with: `BEDROCK_API_KEY=... cargo run --example ask`

use serde::Deserialize;
use surejson::prelude::*;

#[derive(Debug, Deserialize)]
struct Answer {
    response: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("BEDROCK_API_KEY")?;
    let client = QueryClient::new(HttpInvoker::new(api_key)?);

    let answer: Answer = client
        .query("Question: what is Rust? Reply with a JSON object of the form {\"response\": \"...\"}")
        .await?;

    println!("{}", answer.response);
    Ok(())
}
