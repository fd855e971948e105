//! TLS listener and per-session serving loop.

mod tls;

pub use tls::TlsOptions;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use kmip::codec::{self, CodecError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::dispatch::Dispatcher;
use crate::repository::Repository;

/// The assembled server: listener address, TLS acceptor and dispatcher.
/// Construct with the [`KmipServerBuilder`], run with [`serve`](Self::serve).
pub struct KmipServer {
    addr: SocketAddr,
    acceptor: TlsAcceptor,
    dispatcher: Arc<Dispatcher>,
    shutdown: CancellationToken,
}

/// A builder that lets us configure the server.
#[derive(Debug, Default)]
pub struct KmipServerBuilder {
    addr: Option<SocketAddr>,
    tls: Option<TlsOptions>,
    repository: Option<Arc<Repository>>,
}

impl KmipServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn with_tls(mut self, tls: TlsOptions) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Injects a repository, e.g. one shared with tests. A fresh empty one
    /// is used otherwise.
    pub fn with_repository(mut self, repository: Arc<Repository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn build(self) -> Result<KmipServer> {
        let addr = self
            .addr
            .ok_or_else(|| anyhow!("no listen address supplied to builder"))?;
        let tls = self
            .tls
            .ok_or_else(|| anyhow!("no TLS options supplied to builder"))?;
        let acceptor = tls.acceptor().context("TLS configuration")?;
        let repository = self.repository.unwrap_or_default();

        Ok(KmipServer {
            addr,
            acceptor,
            dispatcher: Arc::new(Dispatcher::new(repository)),
            shutdown: CancellationToken::new(),
        })
    }
}

impl KmipServer {
    pub fn builder() -> KmipServerBuilder {
        KmipServerBuilder::new()
    }

    /// Token that stops the accept loop and marks in-flight batch items as
    /// failed.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Accept loop: one task per connection until the shutdown token fires.
    pub async fn serve(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("listen on {}", self.addr))?;
        info!(target: "kmip::server", "KMIP server listening on {}", self.addr);

        loop {
            let (stream, peer) = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                accepted = listener.accept() => accepted.context("accept connection")?,
            };

            let acceptor = self.acceptor.clone();
            let dispatcher = self.dispatcher.clone();
            let session_token = self.shutdown.child_token();
            tokio::spawn(async move {
                let stream = match acceptor.accept(stream).await {
                    Ok(stream) => stream,
                    Err(e) => {
                        warn!(target: "kmip::server", "TLS handshake with {peer} failed: {e}");
                        return;
                    }
                };
                debug!(target: "kmip::server", "session opened for {peer}");
                if let Err(e) = serve_session(stream, &dispatcher, &session_token).await {
                    warn!(target: "kmip::server", "session with {peer} ended with error: {e}");
                }
                debug!(target: "kmip::server", "session closed for {peer}");
            });
        }

        info!(target: "kmip::server", "KMIP server shut down");
        Ok(())
    }
}

/// Serves one session until the peer closes the stream: read a request,
/// dispatch it, write the response. Batches from one session are handled
/// sequentially; concurrency happens across sessions.
pub async fn serve_session<S>(
    mut stream: S,
    dispatcher: &Dispatcher,
    cancel: &CancellationToken,
) -> Result<(), CodecError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let request = match codec::read_message(&mut stream).await {
            Ok(request) => request,
            Err(CodecError::Closed) => return Ok(()),
            Err(e) => return Err(e),
        };
        let response = dispatcher.dispatch(cancel, request);
        codec::write_message(&mut stream, &response).await?;
    }
}

pub fn init_tracing() {
    // Read log level from RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}
