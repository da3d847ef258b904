//! Server module
//!
//! Accepts TCP connections and runs each one on its own task. `Server` is
//! the handle host code keeps: it owns the store, remembers the address it
//! bound, and can be closed and restarted on that same address with the
//! data intact.

mod connection;

pub use connection::Connection;

use crate::dispatch::Dispatcher;
use crate::store::Store;
use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::net::TcpListener;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Address used when the server has never been bound
const DEFAULT_ADDR: &str = "127.0.0.1:0";

struct Running {
    shutdown: CancellationToken,
    accept_loop: JoinHandle<()>,
}

/// An embeddable server instance
pub struct Server {
    store: Arc<Store>,
    addr: Option<SocketAddr>,
    running: Option<Running>,
}

impl Server {
    /// Create a server that is not listening yet
    pub fn new() -> Self {
        Server {
            store: Arc::new(Store::new()),
            addr: None,
            running: None,
        }
    }

    /// Create and start a server on a random local port
    pub async fn run() -> anyhow::Result<Self> {
        let mut server = Self::new();
        server.start().await?;
        Ok(server)
    }

    /// Start listening on the previously bound address, or a random local
    /// port on first start
    pub async fn start(&mut self) -> anyhow::Result<()> {
        let addr = self
            .addr
            .map_or_else(|| DEFAULT_ADDR.to_string(), |addr| addr.to_string());
        self.start_addr(&addr).await
    }

    /// Start listening on `addr`
    pub async fn start_addr(&mut self, addr: &str) -> anyhow::Result<()> {
        if self.running.is_some() {
            bail!("server already running on {}", self.addr_string());
        }
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let local = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let dispatcher = Arc::new(Dispatcher::new(self.store.clone()));
        let accept_loop = tokio::spawn(accept_loop(listener, dispatcher, shutdown.clone()));

        info!("ferrum-lite listening on {}", local);
        self.addr = Some(local);
        self.running = Some(Running {
            shutdown,
            accept_loop,
        });
        Ok(())
    }

    /// Stop accepting and drop every open connection
    ///
    /// Returns once the listening socket is released. Safe to call on a
    /// server that is not running.
    pub async fn close(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.shutdown.cancel();
        if let Err(e) = running.accept_loop.await {
            error!("accept loop failed: {}", e);
        }
        info!("ferrum-lite on {} closed", self.addr_string());
    }

    /// Close, then start again on the same address, keeping all data
    pub async fn restart(&mut self) -> anyhow::Result<()> {
        self.close().await;
        self.start().await
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bound address; None before the first start
    pub fn addr(&self) -> Option<SocketAddr> {
        self.addr
    }

    fn addr_string(&self) -> String {
        self.addr.map_or_else(String::new, |addr| addr.to_string())
    }

    /// Bound host, empty before the first start
    pub fn host(&self) -> String {
        self.addr.map_or_else(String::new, |addr| addr.ip().to_string())
    }

    /// Bound port, 0 before the first start
    pub fn port(&self) -> u16 {
        self.addr.map_or(0, |addr| addr.port())
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Require clients to AUTH with `password`; empty disables
    pub fn require_auth(&self, password: impl Into<String>) {
        self.store.require_auth(password);
    }

    /// Pin the time the server considers "now"
    pub fn set_time(&self, now: SystemTime) {
        self.store.set_time(now);
    }

    /// Commands processed so far
    pub fn command_count(&self) -> u64 {
        self.store.command_count()
    }

    pub fn current_connection_count(&self) -> u64 {
        self.store.current_connection_count()
    }

    pub fn total_connection_count(&self) -> u64 {
        self.store.total_connection_count()
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.shutdown.cancel();
        }
    }
}

/// Keeps the open connection count right however the task ends
struct ConnectionGuard(Arc<Store>);

impl ConnectionGuard {
    fn new(store: Arc<Store>) -> Self {
        store.connection_opened();
        ConnectionGuard(store)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.connection_closed();
    }
}

async fn accept_loop(listener: TcpListener, dispatcher: Arc<Dispatcher>, shutdown: CancellationToken) {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
            accepted = listener.accept() => {
                let (socket, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("accept failed: {}", e);
                        continue;
                    }
                };
                info!("New connection from {}", peer);
                let guard = ConnectionGuard::new(dispatcher.store().clone());
                let dispatcher = dispatcher.clone();
                let shutdown = shutdown.clone();

                connections.spawn(async move {
                    let _guard = guard;
                    let mut connection = Connection::new(socket);
                    tokio::select! {
                        result = connection.handle(&dispatcher) => {
                            if let Err(e) = result {
                                error!("Connection error from {}: {}", peer, e);
                            }
                        }
                        _ = shutdown.cancelled() => debug!("closing {} on shutdown", peer),
                    }
                    info!("Connection closed: {}", peer);
                });
            }
        }
    }
    drop(listener);
    connections.shutdown().await;
}
