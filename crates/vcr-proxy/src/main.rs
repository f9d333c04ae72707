use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vcr_proxy::admin_api::AdminApiServer;
use vcr_proxy::config::{Config, LogFormat};
use vcr_proxy::proxy::{HttpUpstream, ProxyHandler, ProxyServer, ProxyState};
use vcr_proxy::recording::{FileRepository, Mode};

/// Libraries whose debug output drowns the proxy's own
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

#[derive(Parser, Debug)]
#[command(name = "vcr-proxy", version, about)]
struct Args {
    /// Proxy listener port
    #[arg(short, long, env = "VCR_PORT")]
    port: Option<u16>,
    /// Admin API listener port
    #[arg(long, env = "VCR_ADMIN_PORT")]
    admin_port: Option<u16>,
    /// Startup mode: record or playback
    #[arg(short, long, env = "VCR_MODE")]
    mode: Option<Mode>,
    /// Directory recordings are stored under
    #[arg(short, long, env = "VCR_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,
    /// YAML configuration file
    #[arg(short, long, env = "VCR_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    /// Load the config file if any, then apply command line overrides.
    fn into_config(self) -> Result<Config, anyhow::Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if let Some(port) = self.admin_port {
            config.admin.port = port;
        }
        if let Some(mode) = self.mode {
            config.recording.mode = mode;
        }
        if let Some(dir) = self.storage_dir {
            config.recording.storage_dir = dir;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut directives = config.log_level.clone().unwrap_or_else(|| "info".to_string());
        for module in NOISY_MODULES {
            directives.push_str(&format!(",{module}=warn"));
        }
        EnvFilter::new(directives)
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Args::parse().into_config()?;
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %config.recording.mode,
        storage_dir = %config.recording.storage_dir.display(),
        "Starting vcr-proxy"
    );

    let repository = Arc::new(
        FileRepository::open(&config.recording.storage_dir).with_context(|| {
            format!(
                "Failed to open storage directory {}",
                config.recording.storage_dir.display()
            )
        })?,
    );
    let state = Arc::new(ProxyState::new(config.recording.mode, repository));
    let upstream = Arc::new(HttpUpstream::new(&config.upstream)?);
    let handler = Arc::new(ProxyHandler::new(Arc::clone(&state), upstream));

    let proxy = ProxyServer::new(config.listen.socket_addr(), handler);
    let admin = AdminApiServer::new(config.admin.socket_addr(), state);

    tokio::select! {
        result = proxy.run() => {
            if let Err(e) = &result {
                error!("Proxy server stopped: {}", e);
            }
            result
        }
        result = admin.run() => {
            if let Err(e) = &result {
                error!("Admin API stopped: {}", e);
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
