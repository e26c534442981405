//! DevOps info service entry point.

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devops_info_service::api::types::RequestInfo;
use devops_info_service::api::{create_router, AppState};
use devops_info_service::config::{Config, LogFormat};
use devops_info_service::metrics;
use devops_info_service::runtime::ProcessClock;
use devops_info_service::utils::shutdown_signal;
use devops_info_service::ServiceError;

/// Diagnostic HTTP service reporting host and process information.
#[derive(Parser, Debug)]
#[command(name = "devops-info-service")]
#[command(about = "Reports host, runtime and request diagnostics over HTTP")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,

    /// Host address to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Host address to bind (overrides HOST).
        #[arg(long)]
        host: Option<String>,

        /// HTTP server port (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check configuration validity.
    CheckConfig,

    /// Print a one-off diagnostic snapshot and exit.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Captured before anything else so uptime covers startup.
    let clock = ProcessClock::start();

    // Parse CLI arguments
    let args = Args::parse();

    // Handle subcommands
    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(),
        Some(Command::Info) => cmd_info(clock),
        Some(Command::Serve { host, port }) => cmd_serve(clock, host, port, args.verbose).await,
        None => cmd_serve(clock, args.host, args.port, args.verbose).await,
    }
}

/// Install the tracing subscriber.
fn init_logging(config: &Config, verbose: bool) {
    let filter = if verbose || config.debug {
        EnvFilter::new("devops_info_service=debug,tower_http=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.rust_log))
    };

    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(filter)
        .init();
}

/// Check configuration validity.
fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("DEVOPS INFO SERVICE - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(ServiceError::from(e).into());
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(ServiceError::InvalidConfig(e).into());
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
    println!("  Debug: {}", config.debug);
    println!("  Log Level: {}", config.rust_log);
    println!("  Log Format: {}", config.log_format);
    match config.metrics_port {
        Some(port) => println!("  Metrics Port: {}", port),
        None => println!("  Metrics: Disabled"),
    }
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// Print the service info body without a live request.
///
/// Does not read the environment configuration or install logging; the
/// only output is the JSON body on stdout.
fn cmd_info(clock: ProcessClock) -> anyhow::Result<()> {
    let state = AppState::new(clock);
    let request = RequestInfo {
        method: "CLI".to_string(),
        path: "/".to_string(),
        client_ip: "local".to_string(),
        user_agent: concat!("devops-info-service/", env!("CARGO_PKG_VERSION")).to_string(),
    };

    let body = serde_json::to_string_pretty(&state.info(request)).map_err(ServiceError::from)?;
    println!("{}", body);

    Ok(())
}

/// Run the HTTP server until a shutdown signal arrives.
async fn cmd_serve(
    clock: ProcessClock,
    host: Option<String>,
    port: Option<u16>,
    verbose: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load().map_err(ServiceError::from)?;
    init_logging(&config, verbose);

    // Override with CLI args if provided
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(ServiceError::InvalidConfig(e).into());
    }

    let addr = config.bind_addr().map_err(ServiceError::InvalidConfig)?;

    metrics::init_metrics();
    if let Some(metrics_addr) = config.metrics_addr() {
        let metrics_addr = metrics_addr.map_err(ServiceError::InvalidConfig)?;
        metrics::install_exporter(metrics_addr)?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        ServiceError::from(e)
    })?;
    info!(
        "devops-info-service v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr().map_err(ServiceError::from)?
    );

    let router = create_router(AppState::new(clock));

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(ServiceError::from)?;

    info!(uptime_seconds = clock.uptime_seconds(), "Server stopped");

    Ok(())
}
