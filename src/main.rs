use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use github_mcp::github::OctocrabClient;
use github_mcp::server::GithubMcpServer;
use github_mcp::transport;
use tracing_subscriber::EnvFilter;

/// MCP server for GitHub: repositories, branches, pull requests, issues, and files
#[derive(Parser)]
#[command(name = "github-mcp", version, about)]
struct Cli {
    /// GitHub personal access token.
    /// Takes precedence over the token environment variable.
    #[arg(long)]
    token: Option<String>,

    /// Read GitHub token from an environment variable.
    /// Default: GITHUB_TOKEN
    #[arg(long = "token-env")]
    token_env: Option<String>,

    /// Base URL of the GitHub API (for GitHub Enterprise Server)
    #[arg(long = "api-url")]
    api_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Resolve token: --token > --token-env > GITHUB_TOKEN
    let env_name = cli.token_env.as_deref().unwrap_or("GITHUB_TOKEN");
    let token = match cli.token {
        Some(t) if !t.is_empty() => t,
        _ => match std::env::var(env_name) {
            Ok(t) if !t.is_empty() => {
                tracing::info!(env = env_name, "Read GitHub token from environment variable");
                t
            }
            _ => anyhow::bail!("{} required", env_name),
        },
    };

    let mut builder = octocrab::OctocrabBuilder::new().personal_token(token);
    if let Some(ref url) = cli.api_url {
        builder = builder
            .base_uri(url.as_str())
            .map_err(|e| anyhow::anyhow!("Invalid API URL '{}': {}", url, e))?;
    }
    let github = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create GitHub client: {}", e))?;

    tracing::info!(
        api_url = cli.api_url.as_deref().unwrap_or("https://api.github.com"),
        "Starting github-mcp server"
    );

    let server = GithubMcpServer::new(Arc::new(OctocrabClient::new(github)));
    transport::serve(&server, tokio::io::stdin(), tokio::io::stdout()).await?;

    Ok(())
}
