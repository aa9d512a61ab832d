//! post-ranker: CLI entrypoint
//! Loads a source config (file, env, flags), fetches the timeline and prints the
//! most-liked posts.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use post_ranker::{report, PostRanker, SourceConfig, SourceType, DEFAULT_TOP_LIMIT};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "post-ranker")]
#[command(about = "Fetch a social timeline and rank its posts by likes")]
#[command(version)]
struct Cli {
    /// Config file (TOML or JSON).
    /// Defaults to $POST_RANKER_CONFIG or config/post_ranker.{toml,json}
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Platform name, e.g. "twitter"
    #[arg(long)]
    platform: Option<String>,

    /// timeline | user_timeline | list_timeline | search_timeline
    #[arg(long)]
    source_type: Option<String>,

    /// List, user or search id
    #[arg(long)]
    source_id: Option<String>,

    /// API host; twitter241.p.rapidapi.com selects the RapidAPI proxy
    #[arg(long)]
    api_hostname: Option<String>,

    /// API key. "ENV" reads RAPIDAPI_KEY or TWITTER_BEARER_TOKEN depending on host
    #[arg(long)]
    api_key: Option<String>,

    /// Maximum posts to fetch
    #[arg(long)]
    max_posts: Option<usize>,

    /// Maximum pages to request from paginated APIs
    #[arg(long)]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Number of top posts to print
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_LIMIT)]
    limit: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Emit logs as JSON lines (stderr)
    #[arg(long)]
    log_json: bool,
}

/// Logs go to stderr so stdout stays parseable. RUST_LOG overrides the default filter.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("post_ranker=info,warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

/// File values first, then flags; the key is resolved and the result validated last,
/// so a flag can repair anything the file leaves unusable.
fn build_config(cli: &Cli) -> Result<SourceConfig> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => SourceConfig::default_path().context("locating default config")?,
    };

    let mut cfg = match path {
        Some(path) => SourceConfig::read_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let source_id = cli
                .source_id
                .clone()
                .context("no config file found; pass --config or --source-id")?;
            SourceConfig::new("twitter", SourceType::ListTimeline, source_id, "ENV")
        }
    };

    if let Some(p) = &cli.platform {
        cfg.platform_name = p.clone();
    }
    if let Some(st) = &cli.source_type {
        cfg.source_type = st.parse()?;
    }
    if let Some(id) = &cli.source_id {
        cfg.source_id = id.clone();
    }
    if let Some(host) = &cli.api_hostname {
        cfg.api_hostname = Some(host.clone());
    }
    if let Some(key) = &cli.api_key {
        cfg.api_key = key.clone();
    }
    if let Some(n) = cli.max_posts {
        cfg.max_posts = n;
    }
    if let Some(n) = cli.max_pages {
        cfg.max_pages = n;
    }
    if let Some(s) = cli.timeout_secs {
        cfg.timeout_secs = s;
    }

    cfg.resolve_api_key()?;
    cfg.validate()?;
    Ok(cfg)
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = build_config(&cli)?;
    tracing::info!(
        platform = %cfg.platform_name,
        source_type = %cfg.source_type,
        source_id = %cfg.source_id,
        max_posts = cfg.max_posts,
        "config loaded"
    );

    let ranker = PostRanker::new(cfg)?;
    let top = ranker.top(cli.limit).await.context("fetching timeline")?;

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&top)),
        OutputFormat::Json => println!("{}", report::render_json(&top)?),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
