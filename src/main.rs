use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use impls_lens::adapters::fs::FileDocumentProvider;
use impls_lens::app::service::LensService;
use impls_lens::cli;
use impls_lens::config::LensConfig;
use impls_lens::domain::cancel::CancellationToken;
use impls_lens::domain::orchestrator::NavigationOutcome;
use impls_lens::server::{http, mcp::LensMcpServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "implslens", version, about = "Impls lenses for Go interfaces and container-aware debug launch")]
struct Cli {
    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// gopls binary (overrides impls-lens.toml)
    #[arg(long, global = true)]
    gopls: Option<String>,

    /// dlv binary (overrides impls-lens.toml)
    #[arg(long, global = true)]
    dlv: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the impls lenses of a Go file as JSON
    Scan { file: PathBuf },

    /// List implementations of the interface method at FILE:LINE:COLUMN and jump to one
    Impls {
        file: PathBuf,
        /// 1-based line
        line: u32,
        /// 1-based column
        column: u32,
        /// Method name; looked up from the lens under the cursor when omitted
        #[arg(long)]
        name: Option<String>,
    },

    /// Print the debug launch configuration as JSON
    LaunchPlan { dir: Option<PathBuf> },

    /// Start a headless delve session with the container-ready environment
    Debug { dir: Option<PathBuf> },

    /// Serve the HTTP API
    ServeHttp {
        #[arg(long)]
        addr: Option<SocketAddr>,
    },

    /// Serve MCP over stdio
    ServeMcp,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("impls_lens=info,implslens=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Cli::parse();

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };
    let mut config = LensConfig::load(&root)?;
    if let Some(gopls) = args.gopls {
        config.gopls_path = gopls;
    }
    if let Some(dlv) = args.dlv {
        config.dlv_path = dlv;
    }
    debug!(?config, root = %root.display(), "configuration loaded");

    let http_addr = config.http_addr.clone();
    let service = LensService::new(
        root.clone(),
        config,
        Arc::new(FileDocumentProvider::new(&root)),
    );

    match args.command {
        Command::Scan { file } => cli::scan_file(&service, &file).await,
        Command::Impls {
            file,
            line,
            column,
            name,
        } => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });
            let outcome =
                cli::show_implementations(&service, &file, line, column, name, &cancel).await?;
            match outcome {
                NavigationOutcome::Failed(message) => Err(anyhow::anyhow!(message)),
                other => {
                    debug!(?other, "impls finished");
                    Ok(())
                }
            }
        }
        Command::LaunchPlan { dir } => cli::print_launch_plan(&service, dir.as_deref()).await,
        Command::Debug { dir } => cli::debug(&service, dir.as_deref()).await,
        Command::ServeHttp { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => http_addr
                    .parse()
                    .with_context(|| format!("Invalid http_addr: {http_addr}"))?,
            };
            http::serve(service, addr).await
        }
        Command::ServeMcp => {
            info!("serving MCP over stdio");
            LensMcpServer::new(service).serve_stdio().await
        }
    }
}
