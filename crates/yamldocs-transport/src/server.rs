//! Server lifecycle — start, stop, and state queries for the loopback listener.
//!
//! Each running instance owns a dedicated multi-thread runtime sized by
//! [`ServerConfig::workers`]. That runtime is the worker pool: it accepts
//! connections and runs every handler, and its blocking pool (used for
//! filesystem calls) is capped at the same size. Stopping waits only until
//! the listener is closed, then tears the runtime down without draining
//! in-flight requests.

use std::net::{IpAddr, Ipv4Addr};
use std::ops::RangeInclusive;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use yamldocs_services::{AssetBundle, FileService, WorkspaceRootProvider};

use crate::{port, router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Loopback host to bind (`127.0.0.1`, `::1` or `localhost`)
    pub hostname: String,
    /// Worker threads serving requests
    pub workers: usize,
    /// Ports to try before falling back to an ephemeral one
    pub preferred_ports: Option<RangeInclusive<u16>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "127.0.0.1".into(),
            workers: 4,
            preferred_ports: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{0}` is not a loopback address")]
    NonLoopbackHost(String),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("invalid port range {start}-{end}")]
    InvalidPortRange { start: u16, end: u16 },
}

impl ServerConfig {
    /// Check the configuration and return the address to bind.
    pub fn validate(&self) -> Result<IpAddr, ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if let Some(range) = &self.preferred_ports {
            if range.is_empty() || *range.start() == 0 {
                return Err(ConfigError::InvalidPortRange {
                    start: *range.start(),
                    end: *range.end(),
                });
            }
        }
        self.loopback_ip()
    }

    fn loopback_ip(&self) -> Result<IpAddr, ConfigError> {
        if self.hostname.eq_ignore_ascii_case("localhost") {
            return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        match self.hostname.parse::<IpAddr>() {
            Ok(ip) if ip.is_loopback() => Ok(ip),
            _ => Err(ConfigError::NonLoopbackHost(self.hostname.clone())),
        }
    }
}

/// Startup failures. The server never reaches the running state when one is returned.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("server is already running on port {port}")]
    AlreadyRunning { port: u16 },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("no loopback port available: {0}")]
    Allocation(#[source] std::io::Error),

    #[error("failed to bind listener on port {port}: {source}")]
    ListenerBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build worker runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Observable server state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    NotStarted,
    Running { port: u16 },
    Stopped,
}

enum State {
    NotStarted,
    Running(RunningServer),
    Stopped,
}

struct RunningServer {
    port: u16,
    runtime: Runtime,
    shutdown: oneshot::Sender<()>,
    /// Signalled once the serve loop, and with it the listener, is dropped.
    released: mpsc::Receiver<()>,
}

/// Upper bound on how long `stop` waits for the listener to close.
const RELEASE_TIMEOUT: Duration = Duration::from_secs(5);

/// URL a browser view should load for a server on `port`.
pub fn local_url(port: u16) -> String {
    format!("http://localhost:{port}/")
}

/// The web server — owns the listener and its worker pool.
pub struct WebServer {
    config: ServerConfig,
    roots: Arc<dyn WorkspaceRootProvider>,
    assets: AssetBundle,
    state: Mutex<State>,
}

impl WebServer {
    pub fn new(config: ServerConfig, roots: Arc<dyn WorkspaceRootProvider>) -> Self {
        Self {
            config,
            roots,
            assets: AssetBundle::bundled(),
            state: Mutex::new(State::NotStarted),
        }
    }

    /// Allocate a port, bind it on loopback, and start serving.
    ///
    /// Fails with [`StartError::AlreadyRunning`] if called while running.
    pub fn start(&self) -> Result<u16, StartError> {
        let mut state = self.state.lock();
        if let State::Running(running) = &*state {
            warn!("Start requested while already running on port {}", running.port);
            return Err(StartError::AlreadyRunning { port: running.port });
        }

        let ip = self.config.validate()?;
        let port = port::allocate(ip, self.config.preferred_ports.as_ref())?;

        let std_listener = std::net::TcpListener::bind((ip, port))
            .and_then(|l| l.set_nonblocking(true).map(|()| l))
            .map_err(|source| StartError::ListenerBind { port, source })?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .max_blocking_threads(self.config.workers)
            .thread_name("yamldocs-http")
            .enable_all()
            .build()
            .map_err(StartError::Runtime)?;

        let listener = {
            let _guard = runtime.enter();
            tokio::net::TcpListener::from_std(std_listener)
        };
        let listener = match listener {
            Ok(l) => l,
            Err(source) => {
                runtime.shutdown_background();
                return Err(StartError::ListenerBind { port, source });
            }
        };

        let app = router::build_router(FileService::new(self.roots.clone()), self.assets);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let (released_tx, released) = mpsc::channel();
        runtime.spawn(async move {
            tokio::select! {
                result = axum::serve(listener, app).into_future() => {
                    if let Err(e) = result {
                        error!("HTTP listener on port {port} failed: {e}");
                    }
                }
                _ = shutdown_rx => debug!("Closing listener on port {port}"),
            }
            let _ = released_tx.send(());
        });

        info!(
            "Web server started on {} ({} workers)",
            local_url(port),
            self.config.workers
        );
        *state = State::Running(RunningServer {
            port,
            runtime,
            shutdown,
            released,
        });
        Ok(port)
    }

    /// Close the listener and release the port before returning.
    /// In-flight responses are abandoned. No-op when not running.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if !matches!(*state, State::Running(_)) {
            return;
        }
        if let State::Running(running) = std::mem::replace(&mut *state, State::Stopped) {
            let _ = running.shutdown.send(());
            if running.released.recv_timeout(RELEASE_TIMEOUT).is_err() {
                warn!("Listener on port {} did not close in time", running.port);
            }
            running.runtime.shutdown_background();
            info!("Web server on port {} stopped", running.port);
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.state.lock(), State::Running(_))
    }

    /// The bound port, only while running.
    pub fn port(&self) -> Option<u16> {
        match &*self.state.lock() {
            State::Running(running) => Some(running.port),
            _ => None,
        }
    }

    /// `http://localhost:<port>/` while running.
    pub fn url(&self) -> Option<String> {
        self.port().map(local_url)
    }

    pub fn status(&self) -> ServerStatus {
        match &*self.state.lock() {
            State::NotStarted => ServerStatus::NotStarted,
            State::Running(running) => ServerStatus::Running { port: running.port },
            State::Stopped => ServerStatus::Stopped,
        }
    }
}

impl Drop for WebServer {
    fn drop(&mut self) {
        self.stop();
    }
}
