//! Basic chat example - one provider, one conversation.
//!
//! # Running
//!
//! ```bash
//! export GROQ_API_KEY="gsk_..."
//! cargo run --example basic_chat
//!
//! # Any other provider and model
//! cargo run --example basic_chat -- anthropic claude-3-haiku-20240307
//! ```

use llm_wrapper::{ChatOptions, LlmWrapper, Message};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("llm_wrapper=info".parse()?))
        .init();

    let mut args = std::env::args().skip(1);
    let provider = args.next().unwrap_or_else(|| "groq".to_string());
    let model = args.next();

    let llm = LlmWrapper::new(&provider, model.as_deref())?;
    println!("Using {} / {}", llm.provider_name(), llm.model());

    let messages = vec![
        Message::system("You are a helpful assistant. Keep answers under three sentences."),
        Message::user("Why is the sky blue?"),
    ];

    let response = llm
        .chat(messages, Some(ChatOptions::new().temperature(0.3).max_tokens(200)))
        .await?;

    if response.error {
        println!("No completion: {}", response.message);
    } else {
        println!("\n{}", response.message);
    }

    if let Some(usage) = response.usage {
        println!(
            "\nTokens: {} prompt + {} completion = {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(())
}
