//! rustls-backed secure listener.
//!
//! This module provides the concrete [`SecureListener`](crate::SecureListener)
//! used by default:
//!
//! - [`SslListener`]: accepts TCP connections and terminates TLS
//! - [`RustlsContextFactory`]: the listener's TLS settings
//! - [`TlsContext`]: a prebuilt `rustls::ServerConfig` that bypasses those settings
//!
//! Key stores are PEM files holding the certificate chain and private key. The
//! key may be an encrypted PKCS#8 `ENCRYPTED PRIVATE KEY`, decrypted with the
//! configured key password.

mod factory;
mod key_store;
mod listener;

#[cfg(test)]
pub(crate) mod testing;

pub use factory::{Protocol, RustlsContextFactory, TlsContext};
pub use key_store::{KeyStore, load_certs_from_file, load_key_store};
pub use listener::{SslListener, TlsStream};

/// Resolver producing [`SslListener`]s.
pub type SslConnectorResolver = crate::ConnectorConfigResolver<SslListener>;
