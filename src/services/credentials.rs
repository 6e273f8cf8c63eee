use std::sync::Arc;

use crate::{
    db::{CredentialStore, SettingsStore},
    error::RecommendationError,
    models::{App, DecodedToken},
    services::encoders::EncoderRegistry,
};

/// Finds and decodes the ListenBrainz token a user stored
pub struct CredentialResolver {
    settings: Arc<dyn SettingsStore>,
    credentials: Arc<dyn CredentialStore>,
    encoders: EncoderRegistry,
}

impl CredentialResolver {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        credentials: Arc<dyn CredentialStore>,
        encoders: EncoderRegistry,
    ) -> Self {
        Self {
            settings,
            credentials,
            encoders,
        }
    }

    /// Resolves the user's ListenBrainz account name and plaintext token.
    ///
    /// The credential store is not consulted at all when the integration is
    /// switched off for the user.
    pub async fn resolve(&self, username: &str) -> Result<DecodedToken, RecommendationError> {
        if !self.settings.is_listenbrainz_enabled(username).await? {
            tracing::debug!(username = %username, "ListenBrainz integration disabled");
            return Err(RecommendationError::ServiceDisabled(username.to_string()));
        }

        let credential = self
            .credentials
            .find_credential(username, App::ListenBrainz)
            .await?
            .ok_or_else(|| RecommendationError::MissingCredential(username.to_string()))?;

        match self
            .encoders
            .decode(&credential.encoder, &credential.credential)
        {
            Ok(secret) => Ok(DecodedToken::new(credential.app_username, secret)),
            Err(e) => {
                tracing::warn!(
                    username = %credential.username,
                    app = %credential.app,
                    encoder = %credential.encoder,
                    registered_encoder = self.encoders.is_decodable(&credential.encoder),
                    error = %e,
                    "Could not decode credentials"
                );
                Err(RecommendationError::DecodeFailure {
                    username: credential.username,
                    source: e,
                })
            }
        }
    }
}
