//! Conformance suite runner
//!
//! Drives the registered scenarios against a live videooutput service via
//! `luna-send`, prints the report table, and exits non-zero when any
//! scenario fails.

use anyhow::Context as _;
use clap::Parser;
use lunacheck_harness::{Runner, SuiteConfig};
use lunacheck_transport::{ClientConfig, LunaSendBus, ServiceBus};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "lunacheck",
    version,
    about = "Black-box conformance suite for the webOS videooutput service"
)]
struct Cli {
    /// YAML suite configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Only run scenarios whose name contains this substring
    #[arg(long, value_name = "SUBSTR")]
    filter: Option<String>,

    /// Path to the luna-send executable
    #[arg(long, default_value = "luna-send", value_name = "BIN")]
    send_path: String,

    /// Override the service URI prefix
    #[arg(long, value_name = "URI")]
    service_uri: Option<String>,

    /// Override the settle delay between visual steps, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_ms: Option<u64>,

    /// List registered scenarios and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let registry = lunacheck::register_all();

    if cli.list {
        for scenario in registry.scenarios() {
            println!("{:<32} {}", scenario.name(), scenario.summary());
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => SuiteConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SuiteConfig::default(),
    };
    if let Some(settle_ms) = cli.settle_ms {
        config.settle_ms = settle_ms;
    }

    let mut client = ClientConfig::new(&cli.send_path).with_await_timeout(config.update_timeout());
    if let Some(uri) = &cli.service_uri {
        client = client.with_service_uri(uri);
    }

    let scenarios = match &cli.filter {
        Some(filter) => registry.filtered(filter),
        None => registry.scenarios().to_vec(),
    };
    anyhow::ensure!(!scenarios.is_empty(), "no scenarios match the filter");

    let bus: Arc<dyn ServiceBus> = Arc::new(LunaSendBus::new(client));
    let report = Runner::new(bus, config).run(&scenarios).await;
    print!("{}", report.render());

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
