//! Error types for connector resolution.
//!
//! Two families exist: binding errors raised while copying option values into
//! a [`ConnectorConfiguration`](crate::ConnectorConfiguration), and TLS errors
//! raised by the secure listener when it rejects a setting.

use thiserror::Error;

/// Result type alias for connector operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`create_connector`](crate::ConnectorConfigResolver::create_connector).
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An option value could not be bound to its configuration field.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// The secure listener rejected a value.
    #[error(transparent)]
    Tls(#[from] TlsError),
}

/// Errors raised while binding transport options.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    /// A recognized option was given an empty value.
    #[error("option `{key}` must not be empty")]
    EmptyValue {
        /// The option name as it appeared in the map.
        key: String,
    },
}

/// The kind of algorithm a name was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    /// Secure random number generator.
    SecureRandom,
    /// Key-manager factory.
    KeyManager,
    /// Trust-manager factory.
    TrustManager,
}

impl std::fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlgorithmKind::SecureRandom => "secure random",
            AlgorithmKind::KeyManager => "key manager",
            AlgorithmKind::TrustManager => "trust manager",
        };
        f.write_str(name)
    }
}

/// Errors raised by a secure listener or its TLS context factory.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TlsError {
    /// Reading key or trust material failed.
    #[error("TLS I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TLS library refused the assembled configuration.
    #[error("TLS configuration error: {0}")]
    Configuration(String),

    /// The key store contained no certificates.
    #[error("no certificates found in file")]
    NoCertificatesFound,

    /// The key store contained no private key.
    #[error("no private key found in file")]
    NoPrivateKeyFound,

    /// The key store's private key could not be parsed.
    #[error("invalid private key")]
    InvalidPrivateKey,

    /// The key store's private key is encrypted and no password was set.
    #[error("private key is encrypted but no key password is set")]
    MissingKeyPassword,

    /// The key password did not decrypt the private key.
    #[error("failed to decrypt private key: wrong key password")]
    KeyDecryptionFailed,

    /// A key password was set for a private key that is not encrypted.
    #[error("a key password is set but the private key is not encrypted")]
    KeyNotEncrypted,

    /// No key store path was configured and no TLS context was installed.
    #[error("no key store configured")]
    MissingKeyStore,

    /// Key store format not understood by this backend.
    #[error("unsupported key store type: {0}")]
    UnsupportedKeyStoreType(String),

    /// Protocol identifier not understood by this backend.
    #[error("unsupported TLS protocol: {0}")]
    UnsupportedProtocol(String),

    /// Algorithm name not understood by this backend.
    #[error("unsupported {kind} algorithm: {name}")]
    UnsupportedAlgorithm {
        /// Which setting the name was given for.
        kind: AlgorithmKind,
        /// The rejected name.
        name: String,
    },

    /// Client authentication mode other than `none`, `want` or `need`.
    #[error("unsupported client auth mode: {0}")]
    UnsupportedClientAuthMode(String),

    /// The listener has not been started.
    #[error("listener is not started")]
    NotStarted,

    /// The listener is already bound.
    #[error("listener is already started")]
    AlreadyStarted,
}
