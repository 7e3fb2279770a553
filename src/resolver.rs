//! Resolution of connector settings into a configured secure listener.
//!
//! A [`ConnectorConfigResolver`] has two mutually exclusive sources of TLS
//! settings: an externally built TLS context, or a [`ConnectorConfiguration`]
//! populated from transport options. Exactly one is applied per call to
//! [`create_connector`](ConnectorConfigResolver::create_connector).

use std::collections::BTreeMap;

use crate::config::{ConfigKey, ConnectorConfiguration};
use crate::error::Result;
use crate::listener::{ContextOf, SecureListener, TlsContextFactory};

/// Builds secure listeners from either a TLS context or a configuration record.
pub struct ConnectorConfigResolver<L: SecureListener> {
    configuration: ConnectorConfiguration,
    context: Option<ContextOf<L>>,
    transport_options: BTreeMap<String, String>,
}

impl<L: SecureListener> std::fmt::Debug for ConnectorConfigResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfigResolver")
            .field("configuration", &self.configuration)
            .field("has_context", &self.context.is_some())
            .field(
                "transport_options",
                &self.transport_options.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<L: SecureListener> ConnectorConfigResolver<L> {
    /// Create a resolver. When `context` is `Some`, it takes precedence over
    /// every configuration field.
    #[must_use]
    pub fn new(context: Option<ContextOf<L>>) -> Self {
        Self {
            configuration: ConnectorConfiguration::default(),
            context,
            transport_options: BTreeMap::new(),
        }
    }

    /// Start from an existing configuration, typically environment defaults.
    #[must_use]
    pub fn with_configuration(mut self, configuration: ConnectorConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Set the transport options bound when no context is present.
    #[must_use]
    pub fn with_transport_options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.set_transport_options(options);
        self
    }

    /// Replace the transport options.
    pub fn set_transport_options<I, K, V>(&mut self, options: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.transport_options = options
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// The configuration record.
    #[must_use]
    pub fn configuration(&self) -> &ConnectorConfiguration {
        &self.configuration
    }

    /// Mutable access to the configuration record.
    pub fn configuration_mut(&mut self) -> &mut ConnectorConfiguration {
        &mut self.configuration
    }

    /// The externally supplied TLS context, if any.
    #[must_use]
    pub fn context(&self) -> Option<&ContextOf<L>> {
        self.context.as_ref()
    }

    /// Create a new listener and apply exactly one configuration source to it.
    ///
    /// With a TLS context present, the context is installed as a whole and
    /// the configuration record is not consulted. Otherwise the transport
    /// options are bound into the record and each present field is applied,
    /// in order: client auth, key store path, key store password, key
    /// password (falling back to the key store password), key store type,
    /// secure random, key-manager, trust-manager, protocol.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bind`](crate::Error::Bind) if a transport option cannot
    /// be bound, and [`Error::Tls`](crate::Error::Tls) if the listener rejects
    /// a value. The listener is discarded on failure.
    pub fn create_connector(&mut self) -> Result<L> {
        let mut listener = L::create()?;

        if let Some(context) = &self.context {
            listener.tls_context_factory_mut().set_tls_context(context.clone());
            return Ok(listener);
        }

        self.configuration.bind_options(&self.transport_options)?;
        apply_configuration(&self.configuration, &mut listener)?;

        Ok(listener)
    }
}

fn apply_configuration<L: SecureListener>(
    config: &ConnectorConfiguration,
    listener: &mut L,
) -> Result<()> {
    if let Some(auth) = config.get(ConfigKey::Auth) {
        listener.set_client_auth_mode(auth)?;
    }

    let factory = listener.tls_context_factory_mut();

    if let Some(path) = config.get(ConfigKey::KeyStore) {
        factory.set_key_store_path(path)?;
    }
    if let Some(password) = config.get(ConfigKey::KeyStorePassword) {
        factory.set_key_store_password(password)?;
    }
    if let Some(password) = config.effective_key_password() {
        factory.set_key_manager_password(password)?;
    }
    if let Some(store_type) = config.get(ConfigKey::KeyStoreType) {
        factory.set_key_store_type(store_type)?;
    }
    if let Some(algorithm) = config.get(ConfigKey::SecureRandomCertificateAlgorithm) {
        factory.set_secure_random_algorithm(algorithm)?;
    }
    if let Some(algorithm) = config.get(ConfigKey::KeyCertificateAlgorithm) {
        factory.set_key_manager_factory_algorithm(algorithm)?;
    }
    if let Some(algorithm) = config.get(ConfigKey::TrustCertificateAlgorithm) {
        factory.set_trust_manager_factory_algorithm(algorithm)?;
    }
    if let Some(protocol) = config.get(ConfigKey::Protocol) {
        factory.set_protocol(protocol)?;
    }

    Ok(())
}
