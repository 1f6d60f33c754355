//! Provider switching example - the same request against every configured provider.
//!
//! Providers whose credentials are missing are skipped.
//!
//! # Running
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! export ANTHROPIC_API_KEY="sk-ant-..."
//! cargo run --example provider_switching
//! ```

use llm_wrapper::{LlmError, LlmWrapper};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let settings = llm_wrapper::global_settings();
    println!(
        "{} ({}), metrics enabled: {}\n",
        settings.service_name, settings.environment, settings.metrics_enabled
    );

    for provider in LlmWrapper::list_providers() {
        let llm = match LlmWrapper::new(provider, None) {
            Ok(llm) => llm,
            Err(LlmError::MissingCredentials { variables, .. }) => {
                println!("{provider:>13}: skipped, set {}", variables.join(", "));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let info = llm.get_provider_info();
        match llm.simple_chat("Name one planet. One word only.", None).await {
            Ok(reply) => println!("{provider:>13}: [{}] {}", info.model, reply.trim()),
            Err(e) => println!("{provider:>13}: failed: {}", e.user_message()),
        }
    }

    Ok(())
}
