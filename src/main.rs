//! yamldocs — loopback web server for the YAML API docs UI
//!
//! Serves the bundled web UI and a small file API scoped to one workspace
//! directory, so a locally rendered page can read `redocly.yaml`, the specs
//! it references, and save generated markdown back into the project.
//!
//! Usage:
//!   yamldocs                                 # Serve the current directory
//!   yamldocs --workspace /path/to/project    # Serve another project
//!   yamldocs --port-range 3000-3999          # Prefer a port from a range
//!   yamldocs --workers 8                     # Larger worker pool

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yamldocs_protocol::Routes;
use yamldocs_services::FixedRoot;
use yamldocs_transport::{BrowserView, ServerConfig, ViewerSession, WebServer, BLANK_PAGE};

#[derive(Parser, Debug)]
#[command(name = "yamldocs", about = "YAML Docs — local web UI and workspace file API")]
struct Cli {
    /// Workspace root directory (defaults to the current directory)
    #[arg(long)]
    workspace: Option<PathBuf>,

    /// Loopback address to bind
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// Worker threads serving requests
    #[arg(long, default_value = "4")]
    workers: usize,

    /// Preferred port range, e.g. 3000-3999 (ephemeral port if omitted or exhausted)
    #[arg(long, value_parser = parse_port_range)]
    port_range: Option<RangeInclusive<u16>>,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Write logs to a file (defaults to ~/.yamldocs/logs/server.log if no path given)
    #[arg(long, default_missing_value = "DEFAULT", num_args = 0..=1)]
    log_file: Option<String>,
}

fn parse_port_range(value: &str) -> Result<RangeInclusive<u16>, String> {
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got `{value}`"))?;
    let start: u16 = start.trim().parse().map_err(|e| format!("bad start port: {e}"))?;
    let end: u16 = end.trim().parse().map_err(|e| format!("bad end port: {e}"))?;
    if start == 0 || start > end {
        return Err(format!("invalid port range {start}-{end}"));
    }
    Ok(start..=end)
}

/// Stand-in for an embedded browser: prints where the UI lives.
struct ConsoleView;

impl BrowserView for ConsoleView {
    fn load_url(&self, url: &str) {
        info!("Browser view -> {url}");
        if url != BLANK_PAGE {
            println!("  Open:       {url}");
        }
    }
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let Some(log_file_arg) = cli.log_file.as_deref() else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return;
    };

    let log_path = if log_file_arg == "DEFAULT" {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(".yamldocs/logs/server.log")
    } else {
        PathBuf::from(log_file_arg)
    };

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
            eprintln!("Logging to {}", log_path.display());
        }
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            error!("Failed to open log file {}: {e}", log_path.display());
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let workspace = match cli.workspace.clone() {
        Some(w) => w,
        None => match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(e) => {
                error!("Cannot determine current directory: {e}");
                std::process::exit(1);
            }
        },
    };
    let workspace = workspace.canonicalize().unwrap_or(workspace);
    if !workspace.is_dir() {
        error!("Workspace {} is not a directory", workspace.display());
        std::process::exit(1);
    }

    let config = ServerConfig {
        hostname: cli.hostname.clone(),
        workers: cli.workers,
        preferred_ports: cli.port_range.clone(),
    };

    println!();
    println!("  YAML Docs server");
    println!();
    println!("  Workspace:  {}", workspace.display());
    println!("  Binding:    {} (loopback only)", config.hostname);
    println!("  Workers:    {}", config.workers);
    println!(
        "  File API:   {} | {} | {}",
        Routes::EXISTS,
        Routes::FILE,
        Routes::SAVE
    );

    let server = WebServer::new(config, Arc::new(FixedRoot::new(workspace)));
    let session = ViewerSession::new(server, ConsoleView);

    if let Err(e) = session.start() {
        error!("Failed to start web server: {e}");
        std::process::exit(1);
    }

    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    // Stop on Ctrl+C or when stdin closes (host process went away).
    let shutdown_notify = Arc::new(tokio::sync::Notify::new());
    {
        let notify = shutdown_notify.clone();
        std::thread::spawn(move || {
            use std::io::Read;
            let mut buf = [0u8; 1];
            loop {
                match std::io::stdin().read(&mut buf) {
                    Ok(0) | Err(_) => {
                        notify.notify_one();
                        return;
                    }
                    Ok(_) => continue,
                }
            }
        });
    }

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = shutdown_notify.notified() => {
            info!("stdin closed, shutting down");
        }
    }

    session.stop();
    println!("  Server stopped.");
}
