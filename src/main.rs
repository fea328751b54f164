use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use zoom_client::{
    HttpMethod, LogMetrics, MetricsSink, NoopMetrics, RequestOptions, RequestSpec, ZoomClient,
    ZoomConfig, runtime::RealRuntime,
};

/// zoom-client - signed requests against the Zoom v2 API
///
/// Credentials are read from ZOOM_API_KEY and ZOOM_API_SECRET unless given on
/// the command line. ZOOM_API_URL overrides the API base URL.
///
/// Examples:
///   zoom-client request get users/me
///   zoom-client request post users/me/meetings -d '{"topic": "standup"}'
#[derive(Parser, Debug)]
#[command(author, version = env!("ZOOM_CLIENT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Zoom API key (defaults to ZOOM_API_KEY)
    #[arg(long = "api-key", value_name = "KEY", global = true)]
    pub api_key: Option<String>,

    /// Zoom API secret (defaults to ZOOM_API_SECRET)
    #[arg(long = "api-secret", value_name = "SECRET", global = true)]
    pub api_secret: Option<String>,

    /// Zoom API URL (defaults to ZOOM_API_URL, then https://api.zoom.us/v2)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Where request metrics go
    #[arg(long, value_enum, default_value_t = MetricsMode::Log, global = true)]
    pub metrics: MetricsMode,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MetricsMode {
    /// Discard metrics
    None,
    /// Log metrics at debug level
    Log,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Send one request and print the response envelope as JSON
    Request(RequestArgs),

    /// Print a freshly minted bearer token
    Token,
}

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// HTTP method: get, post, put, patch or delete
    #[arg(value_name = "METHOD")]
    pub method: HttpMethod,

    /// Endpoint path relative to the API URL, e.g. users/me
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Extra header, e.g. -H 'X-Request-Id: 42'
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// JSON request body
    #[arg(short = 'd', long = "data", value_name = "JSON")]
    pub data: Option<String>,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected 'Name: value', got '{}'", s)),
    }
}

fn metrics_sink(mode: MetricsMode) -> Box<dyn MetricsSink> {
    match mode {
        MetricsMode::None => Box::new(NoopMetrics),
        MetricsMode::Log => Box::new(LogMetrics),
    }
}

fn build_options(args: &RequestArgs) -> Result<RequestOptions> {
    let mut options = RequestOptions::new();
    for (name, value) in &args.headers {
        options = options.header(name, value);
    }
    if let Some(data) = &args.data {
        let body: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
        options = options.body(body);
    }
    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let config = ZoomConfig::resolve(&runtime, cli.api_key, cli.api_secret, cli.api_url)?;
    let client = ZoomClient::from_config(config, runtime, metrics_sink(cli.metrics))?;

    match cli.command {
        Commands::Request(args) => {
            let spec = RequestSpec::new(args.method, args.path.clone())
                .with_options(build_options(&args)?);
            let envelope = client
                .request(spec)
                .await?
                .context("Request to Zoom API failed; run with RUST_LOG=debug for details")?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Commands::Token => {
            println!("{}", client.token()?);
        }
    }
    Ok(())
}
