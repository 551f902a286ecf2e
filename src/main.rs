use anyhow::Result;
use clap::Parser;
use forum_gateway::{config::Config, server, telemetry};
use tracing::info;

/// API gateway for the forum backends
#[derive(Parser, Debug)]
#[command(name = "forum-gateway")]
#[command(version, about, long_about = None)]
struct Args {
    /// HTTP port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Content (posts) backend URL
    #[arg(long)]
    content_url: Option<String>,

    /// Comment backend URL
    #[arg(long)]
    comment_url: Option<String>,

    /// Statistics backend URL
    #[arg(long)]
    stats_url: Option<String>,

    /// Identity backend URL
    #[arg(long)]
    identity_url: Option<String>,

    /// Category backend URL
    #[arg(long)]
    category_url: Option<String>,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(port) = self.port {
            config.http_port = port;
        }
        let backends = &mut config.backends;
        if let Some(url) = self.content_url {
            backends.content_url = url;
        }
        if let Some(url) = self.comment_url {
            backends.comment_url = url;
        }
        if let Some(url) = self.stats_url {
            backends.stats_url = url;
        }
        if let Some(url) = self.identity_url {
            backends.identity_url = url;
        }
        if let Some(url) = self.category_url {
            backends.category_url = url;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    args.apply(&mut config);

    let prometheus_handle = telemetry::init(&config.telemetry)?;

    info!("Starting forum gateway");
    info!("HTTP server listening on {}", config.http_addr());
    info!(
        content = %config.backends.content_url,
        comments = %config.backends.comment_url,
        stats = %config.backends.stats_url,
        identity = %config.backends.identity_url,
        categories = %config.backends.category_url,
        "Backend endpoints"
    );

    server::run(config, prometheus_handle).await
}
