use anyhow::{Context, Result};
use clap::Parser;
use feedscout::config::Config;
use feedscout::util::{display_width, fit_to_width};
use feedscout::{find_feeds, Feed};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Widest the title column is allowed to grow in text output
const MAX_TITLE_COLUMN: usize = 48;

#[derive(Parser, Debug)]
#[command(
    name = "feedscout",
    version,
    about = "Discover RSS/Atom/JSON feeds reachable from a page or profile URL"
)]
struct Args {
    /// Page, profile or site URL to discover feeds from
    url: String,

    /// Upstream proxy for all requests (overrides FEEDSCOUT_PROXY and config)
    #[arg(long, value_name = "URL")]
    proxy: Option<String>,

    /// Per-request timeout in seconds (overrides config, 0 = none)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Config file (default: ~/.config/feedscout/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Get the default config file path (~/.config/feedscout/config.toml)
fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("feedscout")
            .join("config.toml"),
    )
}

fn print_text(feeds: &[Feed]) {
    let title_width = feeds
        .iter()
        .map(|f| display_width(&f.title))
        .max()
        .unwrap_or(0)
        .min(MAX_TITLE_COLUMN);

    for feed in feeds {
        if title_width == 0 {
            println!("{}", feed.link);
        } else {
            println!("{}  {}", fit_to_width(&feed.title, title_width), feed.link);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for piping
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(default_config_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let proxy = args
        .proxy
        .clone()
        .or_else(|| std::env::var("FEEDSCOUT_PROXY").ok());
    let mut options = config.to_find_options(proxy);
    if let Some(secs) = args.timeout {
        options.timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }

    // Ctrl+C cancels every in-flight request
    let cancel = CancellationToken::new();
    options.cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling discovery");
            cancel.cancel();
        }
    });

    let mut feeds = find_feeds(&args.url, &options)
        .await
        .with_context(|| format!("Cannot discover feeds for '{}'", args.url))?;
    feeds.sort_by(|a, b| a.link.cmp(&b.link));

    if args.json {
        let out = serde_json::to_string_pretty(&feeds).context("Failed to encode results")?;
        println!("{}", out);
    } else {
        print_text(&feeds);
    }

    if feeds.is_empty() {
        eprintln!("No feeds found for {}", args.url);
    }

    Ok(())
}
