//! `ninjagraphd` — spec.md §6 CLI entry point.

use clap::{Parser, Subcommand};
use ninjagraph::config::{Protocol, ServeConfig};
use ninjagraph::service::rpc::{health_reporter, reflection_service, RpcService};
use ninjagraph::service::ServiceFacade;
use ninjagraph::store::QuadStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "ninjagraphd", version, about = "Persistent Ninja build-graph server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server on exactly one of the two equivalent surfaces.
    Serve {
        /// Bind address for the HTTP/JSON surface. Mutually exclusive with --grpc.
        #[arg(long)]
        http: Option<String>,

        /// Bind address for the typed RPC over HTTP/2 surface. Mutually exclusive with --http.
        #[arg(long)]
        grpc: Option<String>,

        /// Persistent store directory. Must be empty or absent.
        #[arg(long)]
        store: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let Commands::Serve { http, grpc, store } = cli.command;

    let config = match ServeConfig::build(http, grpc, store) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ninjagraphd: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("ninjagraphd: {e}");
        std::process::exit(1);
    }
}

async fn run(config: ServeConfig) -> anyhow::Result<()> {
    let store = Arc::new(QuadStore::open(&config.store_path)?);
    let facade = Arc::new(ServiceFacade::new(Arc::clone(&store)));

    let addr: std::net::SocketAddr = config.addr.parse()?;

    match config.protocol {
        Protocol::Http => serve_http(addr, facade).await?,
        Protocol::Grpc => serve_grpc(addr, facade).await?,
    }

    store.close();
    Ok(())
}

async fn serve_http(addr: std::net::SocketAddr, facade: Arc<ServiceFacade>) -> anyhow::Result<()> {
    let app = ninjagraph::service::http::router(facade);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("ninjagraphd listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn serve_grpc(addr: std::net::SocketAddr, facade: Arc<ServiceFacade>) -> anyhow::Result<()> {
    let (mut health, health_service) = health_reporter();
    health
        .set_serving::<ninjagraph::service::rpc::pb::ninja_graph_server::NinjaGraphServer<RpcService>>()
        .await;

    info!("ninjagraphd listening on grpc://{addr}");
    tonic::transport::Server::builder()
        .add_service(health_service)
        .add_service(reflection_service())
        .add_service(RpcService::new(facade).into_server())
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on SIGINT/SIGTERM so the server stops accepting new requests,
/// drains in-flight ones, and then closes the store (spec.md §5).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
