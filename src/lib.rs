//! # tlsconnector - TLS connector configuration
//!
//! `tlsconnector` turns either a prebuilt TLS context or a set of named
//! transport options into a configured secure listener.
//!
//! ## Features
//!
//! - **Explicit precedence**: a supplied TLS context always wins and is
//!   installed as is; otherwise options are bound and applied field by field
//! - **Typed option binding** with a fixed key table and per-field errors
//! - **Key password fallback** to the key store password
//! - **rustls listener** (feature `tls-rustls`, on by default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tlsconnector::{ConnectorConfiguration, tls::SslConnectorResolver};
//!
//! let mut resolver = SslConnectorResolver::new(None)
//!     .with_configuration(ConnectorConfiguration::from_env())
//!     .with_transport_options([("keyStore", "/etc/tls/server.pem"), ("auth", "want")]);
//! let mut listener = resolver.create_connector()?;
//! listener.set_port(8443);
//! listener.start().await?;
//! ```

pub mod client_auth;
pub mod config;
pub mod error;
pub mod listener;
pub mod resolver;

pub use client_auth::ClientAuth;
pub use config::{ConfigKey, ConnectorConfiguration};
pub use error::{AlgorithmKind, BindError, Error, Result, TlsError};
pub use listener::{ContextOf, SecureListener, TlsContextFactory};
pub use resolver::ConnectorConfigResolver;

#[cfg(feature = "tls-rustls")]
pub mod tls;
