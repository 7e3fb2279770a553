//! Interfaces of the secure listener being configured.
//!
//! The resolver only talks to a listener through these traits. The rustls
//! backend in [`crate::tls`] is one implementation.

use crate::client_auth::ClientAuth;
use crate::error::TlsError;

/// The TLS context type accepted by a listener's factory.
pub type ContextOf<L> = <<L as SecureListener>::Factory as TlsContextFactory>::Context;

/// Fine-grained TLS settings exposed by a secure listener.
///
/// Setters reject values the underlying TLS library cannot use. There is no
/// way to clear a setting once applied.
pub trait TlsContextFactory {
    /// A fully resolved TLS context.
    type Context: Clone;

    /// Install a whole TLS context, superseding the individual settings.
    fn set_tls_context(&mut self, context: Self::Context);

    /// Set the key store path.
    fn set_key_store_path(&mut self, path: &str) -> Result<(), TlsError>;

    /// Set the key store password.
    fn set_key_store_password(&mut self, password: &str) -> Result<(), TlsError>;

    /// Set the password of the key entry.
    fn set_key_manager_password(&mut self, password: &str) -> Result<(), TlsError>;

    /// Set the key store format.
    fn set_key_store_type(&mut self, store_type: &str) -> Result<(), TlsError>;

    /// Set the secure random algorithm.
    fn set_secure_random_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError>;

    /// Set the key-manager factory algorithm.
    fn set_key_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError>;

    /// Set the trust-manager factory algorithm.
    fn set_trust_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError>;

    /// Set the TLS protocol.
    fn set_protocol(&mut self, protocol: &str) -> Result<(), TlsError>;
}

/// A network listener that terminates TLS.
pub trait SecureListener: Sized {
    /// The embedded TLS context factory.
    type Factory: TlsContextFactory;

    /// Create a listener with the library's defaults.
    fn create() -> Result<Self, TlsError>;

    /// Handle to the listener's TLS context factory.
    fn tls_context_factory_mut(&mut self) -> &mut Self::Factory;

    /// Select the client authentication mode by name.
    fn set_client_auth_mode(&mut self, mode: &str) -> Result<(), TlsError>;

    /// The current client authentication mode.
    fn client_auth(&self) -> ClientAuth;
}
