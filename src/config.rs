//! Connector configuration record and transport option binding.

use crate::error::BindError;

/// Environment variable holding the default key store path.
pub const KEY_STORE_ENV: &str = "SSL_KEY_STORE";

/// Environment variable holding the default key store password.
pub const KEY_STORE_PASSWORD_ENV: &str = "SSL_KEY_STORE_PASSWORD";

/// Environment variable holding the default key password.
pub const KEY_PASSWORD_ENV: &str = "SSL_KEY_PASSWORD";

/// Names of the recognized transport options.
///
/// Option names are matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// `keyStore`
    KeyStore,
    /// `keyStorePassword`
    KeyStorePassword,
    /// `keyPassword`
    KeyPassword,
    /// `keyStoreType`
    KeyStoreType,
    /// `protocol`
    Protocol,
    /// `secureRandomCertificateAlgorithm`
    SecureRandomCertificateAlgorithm,
    /// `keyCertificateAlgorithm`
    KeyCertificateAlgorithm,
    /// `trustCertificateAlgorithm`
    TrustCertificateAlgorithm,
    /// `auth`
    Auth,
}

impl ConfigKey {
    /// Every recognized option.
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::KeyStore,
        ConfigKey::KeyStorePassword,
        ConfigKey::KeyPassword,
        ConfigKey::KeyStoreType,
        ConfigKey::Protocol,
        ConfigKey::SecureRandomCertificateAlgorithm,
        ConfigKey::KeyCertificateAlgorithm,
        ConfigKey::TrustCertificateAlgorithm,
        ConfigKey::Auth,
    ];

    /// Look up an option by name. Returns `None` for unrecognized names.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let key = match key {
            "keyStore" => ConfigKey::KeyStore,
            "keyStorePassword" => ConfigKey::KeyStorePassword,
            "keyPassword" => ConfigKey::KeyPassword,
            "keyStoreType" => ConfigKey::KeyStoreType,
            "protocol" => ConfigKey::Protocol,
            "secureRandomCertificateAlgorithm" => ConfigKey::SecureRandomCertificateAlgorithm,
            "keyCertificateAlgorithm" => ConfigKey::KeyCertificateAlgorithm,
            "trustCertificateAlgorithm" => ConfigKey::TrustCertificateAlgorithm,
            "auth" => ConfigKey::Auth,
            _ => return None,
        };
        Some(key)
    }

    /// The option name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigKey::KeyStore => "keyStore",
            ConfigKey::KeyStorePassword => "keyStorePassword",
            ConfigKey::KeyPassword => "keyPassword",
            ConfigKey::KeyStoreType => "keyStoreType",
            ConfigKey::Protocol => "protocol",
            ConfigKey::SecureRandomCertificateAlgorithm => "secureRandomCertificateAlgorithm",
            ConfigKey::KeyCertificateAlgorithm => "keyCertificateAlgorithm",
            ConfigKey::TrustCertificateAlgorithm => "trustCertificateAlgorithm",
            ConfigKey::Auth => "auth",
        }
    }

    const fn is_secret(self) -> bool {
        matches!(self, ConfigKey::KeyStorePassword | ConfigKey::KeyPassword)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS settings applied to a secure listener when no TLS context is supplied.
///
/// Every field is either absent or a non-empty string. An absent field leaves
/// the listener's own default in place.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectorConfiguration {
    /// Filesystem path to the key store.
    pub key_store: Option<String>,
    /// Password protecting the key store.
    pub key_store_password: Option<String>,
    /// Password protecting the key entry. Falls back to `key_store_password`.
    pub key_password: Option<String>,
    /// Key store format identifier.
    pub key_store_type: Option<String>,
    /// TLS protocol identifier.
    pub protocol: Option<String>,
    /// Secure random number generator algorithm.
    pub secure_random_certificate_algorithm: Option<String>,
    /// Key-manager factory algorithm.
    pub key_certificate_algorithm: Option<String>,
    /// Trust-manager factory algorithm.
    pub trust_certificate_algorithm: Option<String>,
    /// Client authentication mode (`none`, `want`, `need`).
    pub auth: Option<String>,
}

impl std::fmt::Debug for ConnectorConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ConnectorConfiguration");
        for key in ConfigKey::ALL {
            let value = match self.get(key) {
                Some(_) if key.is_secret() => Some("<redacted>"),
                other => other,
            };
            s.field(key.as_str(), &value);
        }
        s.finish()
    }
}

impl ConnectorConfiguration {
    /// Create a configuration with every field absent.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read key store defaults from the process environment.
    ///
    /// See [`KEY_STORE_ENV`], [`KEY_STORE_PASSWORD_ENV`] and [`KEY_PASSWORD_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build key store defaults from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    #[must_use]
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut read = |name: &str| lookup(name).filter(|v| !v.is_empty());
        Self {
            key_store: read(KEY_STORE_ENV),
            key_store_password: read(KEY_STORE_PASSWORD_ENV),
            key_password: read(KEY_PASSWORD_ENV),
            ..Self::default()
        }
    }

    /// Set the key store path.
    #[must_use]
    pub fn with_key_store(mut self, path: impl Into<String>) -> Self {
        self.key_store = Some(path.into());
        self
    }

    /// Set the key store password.
    #[must_use]
    pub fn with_key_store_password(mut self, password: impl Into<String>) -> Self {
        self.key_store_password = Some(password.into());
        self
    }

    /// Set the key password.
    #[must_use]
    pub fn with_key_password(mut self, password: impl Into<String>) -> Self {
        self.key_password = Some(password.into());
        self
    }

    /// Set the key store type.
    #[must_use]
    pub fn with_key_store_type(mut self, store_type: impl Into<String>) -> Self {
        self.key_store_type = Some(store_type.into());
        self
    }

    /// Set the TLS protocol.
    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Set the secure random algorithm.
    #[must_use]
    pub fn with_secure_random_certificate_algorithm(
        mut self,
        algorithm: impl Into<String>,
    ) -> Self {
        self.secure_random_certificate_algorithm = Some(algorithm.into());
        self
    }

    /// Set the key-manager factory algorithm.
    #[must_use]
    pub fn with_key_certificate_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.key_certificate_algorithm = Some(algorithm.into());
        self
    }

    /// Set the trust-manager factory algorithm.
    #[must_use]
    pub fn with_trust_certificate_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.trust_certificate_algorithm = Some(algorithm.into());
        self
    }

    /// Set the client authentication mode.
    #[must_use]
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Value of a field, if set.
    ///
    /// An empty value reads as unset.
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.slot(key).as_deref().filter(|v| !v.is_empty())
    }

    /// Overwrite a field.
    pub fn set(&mut self, key: ConfigKey, value: String) {
        *self.slot_mut(key) = Some(value);
    }

    /// The password to use for the key entry.
    #[must_use]
    pub fn effective_key_password(&self) -> Option<&str> {
        self.get(ConfigKey::KeyPassword)
            .or_else(|| self.get(ConfigKey::KeyStorePassword))
    }

    /// Copy recognized options into this configuration.
    ///
    /// Unrecognized names are skipped. A recognized name with an empty value
    /// stops binding and is reported as [`BindError::EmptyValue`]; fields bound
    /// before the failing entry keep their new values.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::EmptyValue`] for the first recognized option with
    /// an empty value.
    pub fn bind_options<I, K, V>(&mut self, options: I) -> Result<(), BindError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (name, value) in options {
            let name = name.as_ref();
            let Some(key) = ConfigKey::from_key(name) else {
                tracing::trace!(option = name, "ignoring unrecognized transport option");
                continue;
            };

            let value = value.as_ref();
            if value.is_empty() {
                return Err(BindError::EmptyValue {
                    key: name.to_string(),
                });
            }
            self.set(key, value.to_string());
        }
        Ok(())
    }

    fn slot(&self, key: ConfigKey) -> &Option<String> {
        match key {
            ConfigKey::KeyStore => &self.key_store,
            ConfigKey::KeyStorePassword => &self.key_store_password,
            ConfigKey::KeyPassword => &self.key_password,
            ConfigKey::KeyStoreType => &self.key_store_type,
            ConfigKey::Protocol => &self.protocol,
            ConfigKey::SecureRandomCertificateAlgorithm => {
                &self.secure_random_certificate_algorithm
            }
            ConfigKey::KeyCertificateAlgorithm => &self.key_certificate_algorithm,
            ConfigKey::TrustCertificateAlgorithm => &self.trust_certificate_algorithm,
            ConfigKey::Auth => &self.auth,
        }
    }

    fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::KeyStore => &mut self.key_store,
            ConfigKey::KeyStorePassword => &mut self.key_store_password,
            ConfigKey::KeyPassword => &mut self.key_password,
            ConfigKey::KeyStoreType => &mut self.key_store_type,
            ConfigKey::Protocol => &mut self.protocol,
            ConfigKey::SecureRandomCertificateAlgorithm => {
                &mut self.secure_random_certificate_algorithm
            }
            ConfigKey::KeyCertificateAlgorithm => &mut self.key_certificate_algorithm,
            ConfigKey::TrustCertificateAlgorithm => &mut self.trust_certificate_algorithm,
            ConfigKey::Auth => &mut self.auth,
        }
    }
}
