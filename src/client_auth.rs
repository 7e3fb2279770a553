//! Client certificate authentication modes.

use std::str::FromStr;

use crate::error::TlsError;

/// Whether a connecting client must present a certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClientAuth {
    /// No client certificate is requested.
    #[default]
    None,
    /// A certificate is requested; clients without one are still accepted.
    Want,
    /// A valid certificate is required.
    Need,
}

impl ClientAuth {
    /// Mode name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientAuth::None => "none",
            ClientAuth::Want => "want",
            ClientAuth::Need => "need",
        }
    }

    /// Returns `true` if clients must authenticate.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, ClientAuth::Need)
    }

    /// Returns `true` if a client certificate is requested at all.
    #[must_use]
    pub const fn is_requested(self) -> bool {
        !matches!(self, ClientAuth::None)
    }
}

impl FromStr for ClientAuth {
    type Err = TlsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(ClientAuth::None)
        } else if s.eq_ignore_ascii_case("want") {
            Ok(ClientAuth::Want)
        } else if s.eq_ignore_ascii_case("need") {
            Ok(ClientAuth::Need)
        } else {
            Err(TlsError::UnsupportedClientAuthMode(s.to_string()))
        }
    }
}

impl std::fmt::Display for ClientAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
