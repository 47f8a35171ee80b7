//! `niagate serve`: run the HTTP proxy.

use std::path::Path;

pub async fn run(config_path: Option<&Path>, port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(p) = port {
        config.gateway.port = p;
    }

    println!("🛡️  niagate starting");
    println!(
        "   Listening: http://{}:{}{}",
        config.gateway.host, config.gateway.port, config.gateway.path
    );
    println!(
        "   Provider:  {} ({})",
        config.completion.provider, config.completion.model
    );
    println!("   Store:     {}", config.store.backend);
    println!("   Press Ctrl+C to stop");
    println!();

    niagate_gateway::start(config).await
}
