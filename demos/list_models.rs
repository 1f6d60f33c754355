//! List the models each provider reports.
//!
//! An empty list means the provider could not be queried (missing
//! credentials, endpoint unreachable). Run with `RUST_LOG=llm_wrapper=warn`
//! to see why.
//!
//! ```bash
//! cargo run --example list_models
//! ```

use llm_wrapper::LlmWrapper;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    for provider in LlmWrapper::list_providers() {
        let models = LlmWrapper::list_models(provider).await?;
        if models.is_empty() {
            println!("{provider}: (unknown)");
            continue;
        }
        println!("{provider}: {} models", models.len());
        for model in models.iter().take(10) {
            println!("  - {model}");
        }
    }

    Ok(())
}
