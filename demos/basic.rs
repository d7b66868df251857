use callwhiz_sdk::{
    CallWhiz, CallWhizError, CreateAgentParams, ListAgentsParams, LlmConfig, UpdateAgentParams,
    VoiceConfig,
};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Reads CALLWHIZ_API_KEY, CALLWHIZ_BASE_URL and CALLWHIZ_TIMEOUT_MS
    let client = CallWhiz::from_env()?;

    println!("📞 Creating customer service agent...");
    let agent = client
        .create_agent(CreateAgentParams {
            description: Some("Handles customer support inquiries".to_string()),
            first_message: Some("Hello! How can I help you today?".to_string()),
            ..CreateAgentParams::new(
                "Customer Support Agent",
                VoiceConfig::new("openai", "alloy"),
                LlmConfig::new("openai", "gpt-4"),
                "You are a helpful customer support agent.",
            )
        })
        .await?;
    println!("✅ Agent created: {}", agent.id);

    let agent = client
        .update_agent(
            &agent.id,
            UpdateAgentParams {
                description: Some("Updated from the Rust SDK".to_string()),
                ..Default::default()
            },
        )
        .await?;
    println!("✏️  Agent updated: {}", agent.description.unwrap_or_default());

    println!("📋 Listing agents...");
    for agent in client
        .list_agents(ListAgentsParams {
            limit: Some(5),
            ..Default::default()
        })
        .await?
    {
        println!("   👤 Agent: {} ({})", agent.name, agent.id);
    }

    match client.get_credit_balance().await {
        Ok(credits) => println!("💳 Credits: {credits}"),
        Err(CallWhizError::RateLimit { retry_after, .. }) => {
            eprintln!("⏳ Rate limited, retry after {retry_after:?}s")
        }
        Err(e) => eprintln!("❌ Error: {e}"),
    }

    client.close();
    Ok(())
}
