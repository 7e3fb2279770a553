//! TLS-terminating TCP listener.

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};

use super::factory::RustlsContextFactory;
use crate::client_auth::ClientAuth;
use crate::error::TlsError;
use crate::listener::SecureListener;

/// Server side of an accepted TLS connection.
pub type TlsStream<S> = tokio_rustls::server::TlsStream<S>;

const DEFAULT_HOST: &str = "0.0.0.0";

struct Bound {
    listener: TcpListener,
    acceptor: tokio_rustls::TlsAcceptor,
}

/// A listener that accepts TCP connections and completes the TLS handshake.
///
/// TLS settings live on the embedded [`RustlsContextFactory`] and are turned
/// into a server configuration when the listener starts.
pub struct SslListener {
    host: String,
    port: u16,
    client_auth: ClientAuth,
    factory: RustlsContextFactory,
    bound: Option<Bound>,
}

impl std::fmt::Debug for SslListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SslListener")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("client_auth", &self.client_auth)
            .field("factory", &self.factory)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Default for SslListener {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: 0,
            client_auth: ClientAuth::default(),
            factory: RustlsContextFactory::default(),
            bound: None,
        }
    }
}

impl SslListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Port to bind. `0` picks an ephemeral port.
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub fn tls_context_factory(&self) -> &RustlsContextFactory {
        &self.factory
    }

    pub fn needs_client_auth(&self) -> bool {
        self.client_auth.is_required()
    }

    pub fn wants_client_auth(&self) -> bool {
        self.client_auth == ClientAuth::Want
    }

    pub fn is_running(&self) -> bool {
        self.bound.is_some()
    }

    /// Address the listener is bound to, once started.
    pub fn local_addr(&self) -> Result<SocketAddr, TlsError> {
        let bound = self.bound.as_ref().ok_or(TlsError::NotStarted)?;
        Ok(bound.listener.local_addr()?)
    }

    /// Build the server configuration and bind the socket.
    pub async fn start(&mut self) -> Result<SocketAddr, TlsError> {
        if self.bound.is_some() {
            return Err(TlsError::AlreadyStarted);
        }

        let config = self.factory.server_config(self.client_auth)?;
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        let addr = listener.local_addr()?;

        tracing::info!(%addr, client_auth = %self.client_auth, "TLS listener started");
        self.bound = Some(Bound {
            listener,
            acceptor: tokio_rustls::TlsAcceptor::from(config),
        });
        Ok(addr)
    }

    /// Accept the next connection and complete its TLS handshake.
    pub async fn accept(&self) -> Result<(TlsStream<TcpStream>, SocketAddr), TlsError> {
        let bound = self.bound.as_ref().ok_or(TlsError::NotStarted)?;
        let (stream, peer) = bound.listener.accept().await?;
        let tls_stream = bound.acceptor.accept(stream).await.map_err(TlsError::Io)?;
        Ok((tls_stream, peer))
    }

    /// Close the socket. The listener may be started again.
    pub fn stop(&mut self) {
        if let Some(bound) = self.bound.take() {
            if let Ok(addr) = bound.listener.local_addr() {
                tracing::info!(%addr, "TLS listener stopped");
            }
        }
    }
}

impl SecureListener for SslListener {
    type Factory = RustlsContextFactory;

    fn create() -> Result<Self, TlsError> {
        Ok(Self::new())
    }

    fn tls_context_factory_mut(&mut self) -> &mut RustlsContextFactory {
        &mut self.factory
    }

    fn set_client_auth_mode(&mut self, mode: &str) -> Result<(), TlsError> {
        self.client_auth = mode.parse()?;
        Ok(())
    }

    fn client_auth(&self) -> ClientAuth {
        self.client_auth
    }
}
