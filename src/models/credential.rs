use chrono::{DateTime, Utc};
use std::fmt::{self, Display};
use std::str::FromStr;

/// External application a stored credential belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum App {
    ListenBrainz,
    LastFm,
}

impl App {
    /// Tag stored in the `app` column of the credentials table
    pub fn as_tag(&self) -> &'static str {
        match self {
            App::ListenBrainz => "LISTENBRAINZ",
            App::LastFm => "LASTFM",
        }
    }
}

impl Display for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for App {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LISTENBRAINZ" => Ok(App::ListenBrainz),
            "LASTFM" => Ok(App::LastFm),
            other => Err(format!("unknown app tag '{}'", other)),
        }
    }
}

/// A per-user secret for an external application, as stored by the host
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredential {
    /// Local username owning the credential
    pub username: String,
    pub app: App,
    /// Identifier of the encoder that produced `credential`
    pub encoder: String,
    /// Encoded secret
    pub credential: String,
    /// Account name on the external service
    pub app_username: String,
    pub updated: DateTime<Utc>,
}

/// A credential decoded for the duration of one request.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedToken {
    pub app_username: String,
    secret: String,
}

impl DecodedToken {
    pub fn new(app_username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_username: app_username.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for DecodedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedToken")
            .field("app_username", &self.app_username)
            .field("secret", &"<redacted>")
            .finish()
    }
}
