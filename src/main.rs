use anyhow::{Context, Result};
use clap::Parser;
use sentiment_relay::server::{self, AppState};
use sentiment_relay::ProviderConfig;
use tokio::net::TcpListener;
use tracing::{warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Relays customer messages to an LLM provider for sentiment, summary and keywords
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// OpenAI API key (checked first)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Anthropic API key (used when no OpenAI key is set)
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    anthropic_api_key: Option<String>,

    /// Provider to call (openai or anthropic)
    #[arg(long, env = "API_PROVIDER", default_value = "openai")]
    provider: String,

    /// Model name sent to the provider
    #[arg(long, env = "API_MODEL", default_value = "gpt-3.5-turbo")]
    model: String,

    /// Timeout for provider calls, in seconds
    #[arg(long, env = "API_TIMEOUT", default_value_t = 15)]
    timeout: u64,

    /// Override the provider endpoint URL
    #[arg(long, env = "API_ENDPOINT")]
    endpoint: Option<String>,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to bind
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Enable debug logging
    #[arg(long, env = "DEBUG", value_parser = clap::builder::FalseyValueParser::new())]
    debug: bool,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    fn provider_config(&self) -> ProviderConfig {
        let api_key = self
            .openai_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| self.anthropic_api_key.clone());

        ProviderConfig::new(api_key, &self.provider, self.model.clone(), self.timeout)
            .with_endpoint(self.endpoint.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    setup_logging(&args)?;

    let config = args.provider_config();
    if let Err(e) = config.validate() {
        warn!("{}", e);
    }

    let state = AppState::new(config).context("Failed to build HTTP client")?;
    let listener = TcpListener::bind((args.host.as_str(), args.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", args.host, args.port))?;

    server::serve(listener, state).await.context("Server error")?;
    Ok(())
}

fn setup_logging(args: &Args) -> Result<()> {
    let level = if args.debug {
        Level::DEBUG
    } else {
        match args.log_level.to_lowercase().as_str() {
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_names(false)
        .with_ansi(true)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .with_level(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
