//! Async client used by administration tooling and integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustls_pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::codec::{self, CodecError};
use crate::message::{ProtocolVersion, RequestBatchItem, RequestMessage, ResponseMessage};
use crate::payloads::RequestPayload;
use crate::tls::{load_certificates, load_private_key};

/// Client-side TLS material: the CA that signed the server certificate plus
/// this client's own certificate, since the server authenticates clients.
#[derive(Debug, Clone)]
pub struct TlsClientOptions {
    pub ca_path: PathBuf,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// Client for one established session.
///
/// Keeps one request in flight at a time; the server answers batches in
/// arrival order, so the next read always belongs to the last write.
#[derive(Debug)]
pub struct KmipClient<S> {
    stream: S,
    protocol_version: ProtocolVersion,
    next_item_id: u8,
}

impl<S> KmipClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an established stream, speaking the newest supported version.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            protocol_version: ProtocolVersion::V1_4,
            next_item_id: 0,
        }
    }

    pub fn with_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    /// Sends the payloads as one batch and awaits the response. Each item
    /// gets a one-byte correlation id from a wrapping counter.
    pub async fn request(
        &mut self,
        payloads: Vec<RequestPayload>,
    ) -> Result<ResponseMessage, CodecError> {
        let batch_items = payloads
            .into_iter()
            .map(|payload| {
                let id = self.next_item_id;
                self.next_item_id = self.next_item_id.wrapping_add(1);
                RequestBatchItem::new(payload).with_id([id])
            })
            .collect();
        self.send(RequestMessage::new(self.protocol_version, batch_items))
            .await
    }

    /// Sends an already-assembled message.
    pub async fn send(&mut self, message: RequestMessage) -> Result<ResponseMessage, CodecError> {
        debug!(
            target: "kmip::client",
            batch_count = message.header.batch_count,
            "sending request"
        );
        codec::write_message(&mut self.stream, &message).await?;
        codec::read_message(&mut self.stream).await
    }
}

/// Opens a mutually authenticated session with a server.
pub async fn connect(
    addr: impl ToSocketAddrs,
    server_name: &str,
    options: &TlsClientOptions,
) -> Result<KmipClient<TlsStream<TcpStream>>> {
    let mut roots = RootCertStore::empty();
    for cert in load_certificates(&options.ca_path)? {
        roots.add(cert).context("add CA certificate to root store")?;
    }
    let certs = load_certificates(&options.cert_path)?;
    let key = load_private_key(&options.key_path)?;
    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_client_auth_cert(certs, key)
        .context("client certificate/key mismatch")?;

    let server_name = ServerName::try_from(server_name.to_owned())
        .with_context(|| format!("invalid server name {server_name}"))?;
    let tcp = TcpStream::connect(addr).await.context("connect")?;
    let stream = TlsConnector::from(Arc::new(config))
        .connect(server_name, tcp)
        .await
        .context("TLS handshake")?;

    Ok(KmipClient::new(stream))
}
