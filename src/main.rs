//! adaptive-router - route one prompt to the best available LLM provider
//!
//! Providers are registered from credentials found in the environment (or a
//! `.env` file). The response, or the provider status table, is printed as JSON.

use adaptive_router::utils::logging::{LogFormat, LogLevel, init_logging};
use adaptive_router::{
    AiRequest, AiRequestOptions, Config, OptimizationLayer, RequestPriority, Router, Task,
};
use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "adaptive-router", version, about)]
struct Cli {
    /// Prompt to send
    prompt: Option<String>,

    /// YAML configuration file; defaults plus environment overrides when absent
    #[arg(short, long, env = "ROUTER_CONFIG")]
    config: Option<PathBuf>,

    /// Task capability the provider must support
    #[arg(short, long, default_value = "text_generation")]
    task: Task,

    #[arg(long)]
    max_tokens: Option<u32>,

    /// Soft cost ceiling for this request
    #[arg(long)]
    budget: Option<f64>,

    #[arg(long, default_value = "medium", value_parser = parse_priority)]
    priority: RequestPriority,

    /// Route through the optimization layer (request shaping and simplified retry)
    #[arg(long)]
    optimized: bool,

    /// Print provider status instead of sending a prompt
    #[arg(long)]
    status: bool,

    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: LogLevel,

    #[arg(long, default_value = "pretty", env = "LOG_FORMAT")]
    log_format: LogFormat,
}

fn parse_priority(value: &str) -> Result<RequestPriority, String> {
    match value.to_lowercase().as_str() {
        "low" => Ok(RequestPriority::Low),
        "medium" => Ok(RequestPriority::Medium),
        "high" => Ok(RequestPriority::High),
        _ => Err(format!("Invalid priority: {}", value)),
    }
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .await
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::from_env().context("loading configuration from environment")?,
    };
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref()).await?;
    let router = Arc::new(Router::from_config(&config)?);

    if router.registry().is_empty() {
        bail!(
            "no provider credentials found; set one of {}",
            "OPENAI_API_KEY, ANTHROPIC_API_KEY, GOOGLE_API_KEY or MISTRAL_API_KEY"
        );
    }
    info!(providers = router.registry().len(), "router ready");

    if cli.status {
        println!("{}", serde_json::to_string_pretty(&router.get_provider_status())?);
        return Ok(());
    }

    let Some(prompt) = cli.prompt else {
        bail!("a prompt is required unless --status is given");
    };

    if cli.optimized {
        let layer = OptimizationLayer::new(router, config.optimization.clone())?;
        let options = AiRequestOptions {
            priority: Some(cli.priority),
            max_tokens: cli.max_tokens,
            temperature: None,
            budget: cli.budget,
        };
        let response = layer.optimized_ai_request(&prompt, cli.task, options).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let mut request = AiRequest::new(prompt, cli.task).with_priority(cli.priority);
    request.max_tokens = cli.max_tokens;
    request.budget = cli.budget;
    debug!(?request, "sending request");

    let response = router.execute(request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
