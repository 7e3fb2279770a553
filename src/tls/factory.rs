//! rustls-backed TLS context factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustls::crypto::{CryptoProvider, ring};
use rustls::server::WebPkiClientVerifier;
use rustls::{ServerConfig, SupportedProtocolVersion};

use super::key_store::{KeyStore, load_certs_from_file, load_key_store, root_store};
use crate::client_auth::ClientAuth;
use crate::error::{AlgorithmKind, TlsError};
use crate::listener::TlsContextFactory;

const KEY_STORE_TYPES: &[&str] = &["PEM"];
const SECURE_RANDOM_ALGORITHMS: &[&str] = &["default", "system", "ring"];
const KEY_MANAGER_ALGORITHMS: &[&str] = &["PKIX", "X509"];
const TRUST_MANAGER_ALGORITHMS: &[&str] = &["PKIX", "WebPKI"];

/// A resolved rustls server configuration.
///
/// Cloning shares the underlying configuration.
#[derive(Debug, Clone)]
pub struct TlsContext(Arc<ServerConfig>);

impl TlsContext {
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self(config)
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        Arc::clone(&self.0)
    }

    /// Returns `true` if both handles share the same configuration.
    pub fn ptr_eq(&self, other: &TlsContext) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Arc<ServerConfig>> for TlsContext {
    fn from(config: Arc<ServerConfig>) -> Self {
        Self(config)
    }
}

impl From<ServerConfig> for TlsContext {
    fn from(config: ServerConfig) -> Self {
        Self(Arc::new(config))
    }
}

/// Protocol versions a listener will negotiate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    /// TLS 1.2 and 1.3.
    #[default]
    Tls,
    /// TLS 1.2 only.
    Tls12,
    /// TLS 1.3 only.
    Tls13,
}

impl Protocol {
    fn parse(name: &str) -> Result<Self, TlsError> {
        match name {
            "TLS" => Ok(Protocol::Tls),
            "TLSv1.2" => Ok(Protocol::Tls12),
            "TLSv1.3" => Ok(Protocol::Tls13),
            _ => Err(TlsError::UnsupportedProtocol(name.to_string())),
        }
    }

    fn versions(self) -> Vec<&'static SupportedProtocolVersion> {
        match self {
            Protocol::Tls => vec![&rustls::version::TLS13, &rustls::version::TLS12],
            Protocol::Tls12 => vec![&rustls::version::TLS12],
            Protocol::Tls13 => vec![&rustls::version::TLS13],
        }
    }
}

fn supported(kind: AlgorithmKind, name: &str, names: &[&str]) -> Result<String, TlsError> {
    match names.iter().find(|n| n.eq_ignore_ascii_case(name)) {
        Some(n) => Ok((*n).to_string()),
        None => Err(TlsError::UnsupportedAlgorithm {
            kind,
            name: name.to_string(),
        }),
    }
}

/// TLS settings of an [`SslListener`](super::SslListener).
///
/// Settings are validated when set. The key store is read when the server
/// configuration is built, and its private key is decrypted with
/// [`key_password`](Self::key_password).
#[derive(Clone, Default)]
pub struct RustlsContextFactory {
    context: Option<TlsContext>,
    key_store_path: Option<PathBuf>,
    key_store_password: Option<String>,
    key_manager_password: Option<String>,
    key_store_type: Option<String>,
    trust_store_path: Option<PathBuf>,
    secure_random_algorithm: Option<String>,
    key_manager_algorithm: Option<String>,
    trust_manager_algorithm: Option<String>,
    protocol: Protocol,
}

impl std::fmt::Debug for RustlsContextFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustlsContextFactory")
            .field("has_context", &self.context.is_some())
            .field("key_store_path", &self.key_store_path)
            .field("key_store_type", &self.key_store_type())
            .field("trust_store_path", &self.trust_store_path)
            .field("secure_random_algorithm", &self.secure_random_algorithm)
            .field("key_manager_algorithm", &self.key_manager_algorithm)
            .field("trust_manager_algorithm", &self.trust_manager_algorithm)
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl RustlsContextFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tls_context(&self) -> Option<&TlsContext> {
        self.context.as_ref()
    }

    pub fn key_store_path(&self) -> Option<&Path> {
        self.key_store_path.as_deref()
    }

    pub fn key_store_password(&self) -> Option<&str> {
        self.key_store_password.as_deref()
    }

    pub fn key_manager_password(&self) -> Option<&str> {
        self.key_manager_password.as_deref()
    }

    /// Password for the key store's private key: the key-manager password,
    /// else the key-store password.
    pub fn key_password(&self) -> Option<&str> {
        self.key_manager_password
            .as_deref()
            .or(self.key_store_password.as_deref())
    }

    pub fn key_store_type(&self) -> &str {
        self.key_store_type.as_deref().unwrap_or(KEY_STORE_TYPES[0])
    }

    pub fn secure_random_algorithm(&self) -> Option<&str> {
        self.secure_random_algorithm.as_deref()
    }

    pub fn key_manager_factory_algorithm(&self) -> Option<&str> {
        self.key_manager_algorithm.as_deref()
    }

    pub fn trust_manager_factory_algorithm(&self) -> Option<&str> {
        self.trust_manager_algorithm.as_deref()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn trust_store_path(&self) -> Option<&Path> {
        self.trust_store_path.as_deref()
    }

    /// Read client trust anchors from a PEM file instead of the key store.
    pub fn set_trust_store_path(&mut self, path: impl Into<PathBuf>) {
        self.trust_store_path = Some(path.into());
    }

    /// Build the rustls server configuration.
    ///
    /// An installed [`TlsContext`] is returned as is and `client_auth` is not
    /// applied to it. Otherwise the key store is loaded and, for
    /// [`ClientAuth::Want`] or [`ClientAuth::Need`], client certificates are
    /// verified against the trust store, or the key store's own certificates
    /// when no trust store is set.
    pub fn server_config(&self, client_auth: ClientAuth) -> Result<Arc<ServerConfig>, TlsError> {
        if let Some(context) = &self.context {
            return Ok(context.server_config());
        }

        let path = self
            .key_store_path
            .as_deref()
            .ok_or(TlsError::MissingKeyStore)?;
        let KeyStore {
            cert_chain,
            private_key,
        } = load_key_store(path, self.key_password())?;

        let provider = Arc::new(ring::default_provider());
        let builder = ServerConfig::builder_with_provider(Arc::clone(&provider))
            .with_protocol_versions(&self.protocol.versions())
            .map_err(|e| TlsError::Configuration(e.to_string()))?;

        let builder = if client_auth.is_requested() {
            let anchors = match &self.trust_store_path {
                Some(trust_store) => load_certs_from_file(trust_store)?,
                None => cert_chain.clone(),
            };
            let verifier = client_verifier(&anchors, provider, client_auth)?;
            builder.with_client_cert_verifier(verifier)
        } else {
            builder.with_no_client_auth()
        };

        let config = builder
            .with_single_cert(cert_chain, private_key)
            .map_err(|e| TlsError::Configuration(e.to_string()))?;

        Ok(Arc::new(config))
    }
}

fn client_verifier(
    anchors: &[rustls::pki_types::CertificateDer<'static>],
    provider: Arc<CryptoProvider>,
    client_auth: ClientAuth,
) -> Result<Arc<dyn rustls::server::danger::ClientCertVerifier>, TlsError> {
    let roots = Arc::new(root_store(anchors)?);
    let mut builder = WebPkiClientVerifier::builder_with_provider(roots, provider);
    if !client_auth.is_required() {
        builder = builder.allow_unauthenticated();
    }
    builder
        .build()
        .map_err(|e| TlsError::Configuration(e.to_string()))
}

impl TlsContextFactory for RustlsContextFactory {
    type Context = TlsContext;

    fn set_tls_context(&mut self, context: TlsContext) {
        self.context = Some(context);
    }

    fn set_key_store_path(&mut self, path: &str) -> Result<(), TlsError> {
        self.key_store_path = Some(PathBuf::from(path));
        Ok(())
    }

    fn set_key_store_password(&mut self, password: &str) -> Result<(), TlsError> {
        self.key_store_password = Some(password.to_string());
        Ok(())
    }

    fn set_key_manager_password(&mut self, password: &str) -> Result<(), TlsError> {
        self.key_manager_password = Some(password.to_string());
        Ok(())
    }

    fn set_key_store_type(&mut self, store_type: &str) -> Result<(), TlsError> {
        if !KEY_STORE_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(store_type))
        {
            return Err(TlsError::UnsupportedKeyStoreType(store_type.to_string()));
        }
        self.key_store_type = Some(store_type.to_ascii_uppercase());
        Ok(())
    }

    fn set_secure_random_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        let name = supported(AlgorithmKind::SecureRandom, algorithm, SECURE_RANDOM_ALGORITHMS)?;
        self.secure_random_algorithm = Some(name);
        Ok(())
    }

    fn set_key_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        let name = supported(AlgorithmKind::KeyManager, algorithm, KEY_MANAGER_ALGORITHMS)?;
        self.key_manager_algorithm = Some(name);
        Ok(())
    }

    fn set_trust_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        let name = supported(AlgorithmKind::TrustManager, algorithm, TRUST_MANAGER_ALGORITHMS)?;
        self.trust_manager_algorithm = Some(name);
        Ok(())
    }

    fn set_protocol(&mut self, protocol: &str) -> Result<(), TlsError> {
        self.protocol = Protocol::parse(protocol)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::testing::{generate_encrypted_key_store, generate_key_store};

    #[test]
    fn test_factory_defaults() {
        let factory = RustlsContextFactory::new();
        assert!(factory.tls_context().is_none());
        assert!(factory.key_store_path().is_none());
        assert_eq!(factory.key_store_type(), "PEM");
        assert_eq!(factory.protocol(), Protocol::Tls);
    }

    #[test]
    fn test_protocol_parse() {
        let mut factory = RustlsContextFactory::new();
        factory.set_protocol("TLSv1.2").unwrap();
        assert_eq!(factory.protocol(), Protocol::Tls12);
        factory.set_protocol("TLSv1.3").unwrap();
        assert_eq!(factory.protocol(), Protocol::Tls13);

        let err = factory.set_protocol("SSLv3").unwrap_err();
        assert!(matches!(err, TlsError::UnsupportedProtocol(ref p) if p == "SSLv3"));
        assert_eq!(factory.protocol(), Protocol::Tls13);
    }

    #[test]
    fn test_key_store_type_validation() {
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_type("pem").unwrap();
        assert_eq!(factory.key_store_type(), "PEM");

        let err = factory.set_key_store_type("JKS").unwrap_err();
        assert!(matches!(err, TlsError::UnsupportedKeyStoreType(_)));
    }

    #[test]
    fn test_algorithm_validation() {
        let mut factory = RustlsContextFactory::new();
        factory.set_secure_random_algorithm("SYSTEM").unwrap();
        factory.set_key_manager_factory_algorithm("pkix").unwrap();
        factory.set_trust_manager_factory_algorithm("webpki").unwrap();

        assert_eq!(factory.secure_random_algorithm(), Some("system"));
        assert_eq!(factory.key_manager_factory_algorithm(), Some("PKIX"));
        assert_eq!(factory.trust_manager_factory_algorithm(), Some("WebPKI"));

        let err = factory
            .set_trust_manager_factory_algorithm("SunX509")
            .unwrap_err();
        assert!(matches!(
            err,
            TlsError::UnsupportedAlgorithm {
                kind: AlgorithmKind::TrustManager,
                ..
            }
        ));
    }

    #[test]
    fn test_server_config_without_key_store() {
        let factory = RustlsContextFactory::new();
        let err = factory.server_config(ClientAuth::None).unwrap_err();
        assert!(matches!(err, TlsError::MissingKeyStore));
    }

    #[test]
    fn test_server_config_unreadable_key_store() {
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path("/nonexistent/server.pem").unwrap();
        let err = factory.server_config(ClientAuth::None).unwrap_err();
        assert!(matches!(err, TlsError::Io(_)));
    }

    #[test]
    fn test_server_config_from_key_store() {
        let store = generate_key_store();
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_protocol("TLSv1.2").unwrap();

        assert!(factory.server_config(ClientAuth::None).is_ok());
        assert!(factory.server_config(ClientAuth::Want).is_ok());
        assert!(factory.server_config(ClientAuth::Need).is_ok());
    }

    #[test]
    fn test_server_config_decrypts_key_with_key_password() {
        let store = generate_encrypted_key_store("key-secret");
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_key_store_password("store-secret").unwrap();
        factory.set_key_manager_password("key-secret").unwrap();

        assert_eq!(factory.key_password(), Some("key-secret"));
        assert!(factory.server_config(ClientAuth::None).is_ok());
    }

    #[test]
    fn test_server_config_falls_back_to_key_store_password() {
        let store = generate_encrypted_key_store("store-secret");
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_key_store_password("store-secret").unwrap();

        assert_eq!(factory.key_password(), Some("store-secret"));
        assert!(factory.server_config(ClientAuth::None).is_ok());
    }

    #[test]
    fn test_server_config_wrong_key_password() {
        let store = generate_encrypted_key_store("key-secret");
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_key_manager_password("not-it").unwrap();

        let err = factory.server_config(ClientAuth::None).unwrap_err();
        assert!(matches!(err, TlsError::KeyDecryptionFailed));
    }

    #[test]
    fn test_server_config_password_for_plain_key() {
        let store = generate_key_store();
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_key_store_password("wrong").unwrap();

        let err = factory.server_config(ClientAuth::None).unwrap_err();
        assert!(matches!(err, TlsError::KeyNotEncrypted));
    }

    #[test]
    fn test_server_config_with_trust_store() {
        let store = generate_key_store();
        let trust = generate_key_store();
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path(store.path_str()).unwrap();
        factory.set_trust_store_path(trust.file.path());

        assert_eq!(factory.trust_store_path(), Some(trust.file.path()));
        assert!(factory.server_config(ClientAuth::Need).is_ok());
    }

    #[test]
    fn test_installed_context_is_returned_unchanged() {
        let store = generate_key_store();
        let mut source = RustlsContextFactory::new();
        source.set_key_store_path(store.path_str()).unwrap();
        let context = TlsContext::new(source.server_config(ClientAuth::None).unwrap());

        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_path("/nonexistent/ignored.pem").unwrap();
        factory.set_tls_context(context.clone());

        let config = factory.server_config(ClientAuth::Need).unwrap();
        assert!(TlsContext::new(config).ptr_eq(&context));
    }

    #[test]
    fn test_debug_hides_passwords() {
        let mut factory = RustlsContextFactory::new();
        factory.set_key_store_password("hunter2").unwrap();
        factory.set_key_manager_password("swordfish").unwrap();

        let debug = format!("{factory:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("swordfish"));
    }
}
