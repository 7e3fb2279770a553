use tlsconnector::{ClientAuth, SecureListener, TlsContextFactory, TlsError};

/// A setter invocation observed on the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Context(u32),
    KeyStorePath(String),
    KeyStorePassword(String),
    KeyManagerPassword(String),
    KeyStoreType(String),
    SecureRandom(String),
    KeyManagerAlgorithm(String),
    TrustManagerAlgorithm(String),
    Protocol(String),
}

impl Call {
    /// Position of the setter in the application order.
    pub fn rank(&self) -> usize {
        match self {
            Call::Context(_) => 0,
            Call::KeyStorePath(_) => 1,
            Call::KeyStorePassword(_) => 2,
            Call::KeyManagerPassword(_) => 3,
            Call::KeyStoreType(_) => 4,
            Call::SecureRandom(_) => 5,
            Call::KeyManagerAlgorithm(_) => 6,
            Call::TrustManagerAlgorithm(_) => 7,
            Call::Protocol(_) => 8,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingFactory {
    pub calls: Vec<Call>,
}

impl RecordingFactory {
    fn record(&mut self, call: Call) -> Result<(), TlsError> {
        self.calls.push(call);
        Ok(())
    }
}

impl TlsContextFactory for RecordingFactory {
    type Context = u32;

    fn set_tls_context(&mut self, context: u32) {
        self.calls.push(Call::Context(context));
    }

    fn set_key_store_path(&mut self, path: &str) -> Result<(), TlsError> {
        self.record(Call::KeyStorePath(path.to_string()))
    }

    fn set_key_store_password(&mut self, password: &str) -> Result<(), TlsError> {
        self.record(Call::KeyStorePassword(password.to_string()))
    }

    fn set_key_manager_password(&mut self, password: &str) -> Result<(), TlsError> {
        self.record(Call::KeyManagerPassword(password.to_string()))
    }

    fn set_key_store_type(&mut self, store_type: &str) -> Result<(), TlsError> {
        self.record(Call::KeyStoreType(store_type.to_string()))
    }

    fn set_secure_random_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        self.record(Call::SecureRandom(algorithm.to_string()))
    }

    fn set_key_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        self.record(Call::KeyManagerAlgorithm(algorithm.to_string()))
    }

    fn set_trust_manager_factory_algorithm(&mut self, algorithm: &str) -> Result<(), TlsError> {
        self.record(Call::TrustManagerAlgorithm(algorithm.to_string()))
    }

    fn set_protocol(&mut self, protocol: &str) -> Result<(), TlsError> {
        self.record(Call::Protocol(protocol.to_string()))
    }
}

/// Listener that accepts any auth mode string and records factory calls.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub factory: RecordingFactory,
    pub auth_modes: Vec<String>,
}

impl SecureListener for RecordingListener {
    type Factory = RecordingFactory;

    fn create() -> Result<Self, TlsError> {
        Ok(Self::default())
    }

    fn tls_context_factory_mut(&mut self) -> &mut RecordingFactory {
        &mut self.factory
    }

    fn set_client_auth_mode(&mut self, mode: &str) -> Result<(), TlsError> {
        self.auth_modes.push(mode.to_string());
        Ok(())
    }

    fn client_auth(&self) -> ClientAuth {
        self.auth_modes
            .last()
            .and_then(|m| m.parse().ok())
            .unwrap_or_default()
    }
}
