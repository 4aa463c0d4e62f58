use clap::{Parser, ValueEnum};
use ferrous_discovery_application::ports::{EndpointResolver, UpdateOutcome};
use ferrous_discovery_domain::{AddressMode, CliOverrides, Endpoint};
use ferrous_discovery_infrastructure::directory::{ConsulResolver, TracingSink};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

mod bootstrap;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Pick {
    All,
    Random,
    Next,
}

#[derive(Parser)]
#[command(name = "ferrous-discovery")]
#[command(version)]
#[command(about = "Resolve a service through a Consul-style DNS directory")]
struct Cli {
    /// Service name to resolve
    service: String,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Directory address (host:port)
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Datacenter
    #[arg(long)]
    datacenter: Option<String>,

    /// Directory domain
    #[arg(long)]
    domain: Option<String>,

    /// Per-operation timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Attempts per directory query
    #[arg(long)]
    attempts: Option<u32>,

    /// Decode addresses from SRV targets instead of issuing A queries
    #[arg(long)]
    embedded_address: bool,

    /// Which endpoints to print
    #[arg(long, value_enum, default_value_t = Pick::All)]
    pick: Pick,

    /// Number of picks for random/next
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,

    /// Re-resolve every SECS seconds until interrupted
    #[arg(short = 'w', long, value_name = "SECS")]
    watch: Option<u64>,

    /// Print endpoints as a JSON array
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        address: cli.address.clone(),
        datacenter: cli.datacenter.clone(),
        domain: cli.domain.clone(),
        timeout_ms: cli.timeout_ms,
        max_attempts: cli.attempts,
        address_mode: cli.embedded_address.then_some(AddressMode::Embedded),
        log_level: cli.log_level.clone(),
        log_json: cli.log_json,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!("Starting Ferrous Discovery v{}", env!("CARGO_PKG_VERSION"));

    let resolver = ConsulResolver::builder(cli.service.as_str())
        .with_config(config.resolver.clone())
        .with_sink(Arc::new(TracingSink))
        .build()?;

    let result = match cli.watch {
        Some(secs) => {
            let period = Duration::from_secs(secs.max(1));
            watch(&resolver, &cli, period, shutdown_signal()).await
        }
        None => resolve_once(&resolver, &cli).await,
    };

    resolver.close().await;
    result
}

async fn resolve_once(resolver: &ConsulResolver, cli: &Cli) -> anyhow::Result<()> {
    resolver.update().await?;
    print_endpoints(&select(resolver, cli.pick, cli.count), cli.json)
}

/// Refresh every `period` until `shutdown` resolves. One shutdown future
/// covers both the wait between ticks and the refresh in flight.
async fn watch(
    resolver: &dyn EndpointResolver,
    cli: &Cli,
    period: Duration,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<()> {
    tokio::pin!(shutdown);

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut shutdown => return Ok(()),
        }

        let outcome = tokio::select! {
            outcome = resolver.update() => outcome,
            _ = &mut shutdown => return Ok(()),
        };

        match outcome {
            Ok(UpdateOutcome::Refreshed { endpoints }) => {
                info!(service = %cli.service, endpoints, "Resolved");
            }
            Ok(UpdateOutcome::Skipped) => continue,
            // Keep serving the previous list.
            Err(e) => warn!(service = %cli.service, error = %e, "Refresh failed"),
        }
        print_endpoints(&select(resolver, cli.pick, cli.count), cli.json)?;
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn select(resolver: &dyn EndpointResolver, pick: Pick, count: usize) -> Vec<Endpoint> {
    match pick {
        Pick::All => resolver.all().to_vec(),
        Pick::Random => (0..count).filter_map(|_| resolver.random()).collect(),
        Pick::Next => (0..count).filter_map(|_| resolver.next()).collect(),
    }
}

fn render_endpoints(endpoints: &[Endpoint], json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string(endpoints)?));
    }
    Ok(endpoints.iter().map(|endpoint| format!("{}\n", endpoint)).collect())
}

fn print_endpoints(endpoints: &[Endpoint], json: bool) -> anyhow::Result<()> {
    print!("{}", render_endpoints(endpoints, json)?);
    Ok(())
}
