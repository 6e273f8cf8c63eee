use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::{CredentialStore, MediaStore, SettingsStore},
    error::RecommendationError,
    models::{MediaFile, MusicFolder, RecommendationRequest},
    services::{
        credentials::CredentialResolver,
        encoders::EncoderRegistry,
        providers::{parse_recommendations, RecommendationTransport},
        track_resolver::TrackResolver,
    },
};

/// Builds a list of local songs from a user's ListenBrainz recommendations.
///
/// This is the only entry point the web layer and the play queue use. Every
/// failure ends in a log entry and an empty list; callers cannot tell the
/// failure kinds apart.
pub struct RecommendationService {
    credentials: CredentialResolver,
    transport: Arc<dyn RecommendationTransport>,
    tracks: TrackResolver,
}

impl RecommendationService {
    pub fn new(
        credentials: CredentialResolver,
        transport: Arc<dyn RecommendationTransport>,
        tracks: TrackResolver,
    ) -> Self {
        Self {
            credentials,
            transport,
            tracks,
        }
    }

    /// Wires the service from its storage collaborators
    pub fn from_stores(
        settings: Arc<dyn SettingsStore>,
        credentials: Arc<dyn CredentialStore>,
        media: Arc<dyn MediaStore>,
        encoders: EncoderRegistry,
        transport: Arc<dyn RecommendationTransport>,
    ) -> Self {
        Self::new(
            CredentialResolver::new(settings, credentials, encoders),
            transport,
            TrackResolver::new(media),
        )
    }

    /// Returns at most `count` recommended songs from `folders`, in the order
    /// ListenBrainz ranked them. Recordings without a local match are skipped.
    #[instrument(skip(self, folders), fields(folder_count = folders.len()))]
    pub async fn get_recommended_songs(
        &self,
        count: u32,
        artist_type: &str,
        username: &str,
        folders: &[MusicFolder],
    ) -> Vec<MediaFile> {
        if count == 0 {
            tracing::debug!("Zero songs requested");
            return Vec::new();
        }

        match self
            .try_recommended_songs(count, artist_type, username, folders)
            .await
        {
            Ok(songs) => songs,
            Err(
                e @ (RecommendationError::ServiceDisabled(_)
                | RecommendationError::MissingCredential(_)
                | RecommendationError::DecodeFailure { .. }),
            ) => {
                tracing::error!(
                    username = %username,
                    reason = e.kind(),
                    "Unable to get API token for ListenBrainz API. Is the ListenBrainz username and token configured?"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load recommendations from ListenBrainz");
                Vec::new()
            }
        }
    }

    async fn try_recommended_songs(
        &self,
        count: u32,
        artist_type: &str,
        username: &str,
        folders: &[MusicFolder],
    ) -> Result<Vec<MediaFile>, RecommendationError> {
        let token = self.credentials.resolve(username).await?;
        let request = RecommendationRequest::new(token, artist_type, count);

        let body = self.transport.fetch(&request).await?;
        let records = parse_recommendations(&body)?;

        let limit = count as usize;
        let mut songs = Vec::with_capacity(limit.min(records.len()));

        for record in &records {
            if songs.len() >= limit {
                break;
            }

            match self.tracks.resolve(record, folders).await? {
                Some(file) => songs.push(file),
                None => tracing::debug!(
                    recording_mbid = %record.recording_mbid,
                    "No local song for recommended recording"
                ),
            }
        }

        tracing::info!(
            records = records.len(),
            resolved = songs.len(),
            "Recommended songs resolved"
        );

        Ok(songs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{MockCredentialStore, MockMediaStore, MockSettingsStore},
        models::{App, UserCredential},
        services::providers::MockRecommendationTransport,
        test_support::{capture_logs, folder, media_file},
    };
    use chrono::Utc;

    const FOUR_RECORDS: &str = r#"{"payload": {"mbids": [
        {"recording_mbid": "m1", "score": 0.9},
        {"recording_mbid": "m2", "score": 0.8},
        {"recording_mbid": "m3", "score": 0.7},
        {"recording_mbid": "m4", "score": 0.6}
    ], "user_name": "alice_lb"}}"#;

    fn settings(enabled: bool) -> MockSettingsStore {
        let mut settings = MockSettingsStore::new();
        settings
            .expect_is_listenbrainz_enabled()
            .returning(move |_| Ok(enabled));
        settings
    }

    fn credentials(encoder: &'static str, secret: &'static str) -> MockCredentialStore {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_find_credential().returning(move |_, _| {
            Ok(Some(UserCredential {
                username: "alice".to_string(),
                app: App::ListenBrainz,
                encoder: encoder.to_string(),
                credential: secret.to_string(),
                app_username: "alice_lb".to_string(),
                updated: Utc::now(),
            }))
        });
        credentials
    }

    fn no_credentials() -> MockCredentialStore {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_find_credential().returning(|_, _| Ok(None));
        credentials
    }

    fn silent_transport() -> MockRecommendationTransport {
        let mut transport = MockRecommendationTransport::new();
        transport.expect_fetch().never();
        transport
    }

    fn responding_transport(body: &'static str) -> MockRecommendationTransport {
        let mut transport = MockRecommendationTransport::new();
        transport
            .expect_fetch()
            .returning(move |_| Ok(body.to_string()));
        transport
    }

    /// Library where only m2 and m4 exist locally, both in folder 1
    fn library() -> MockMediaStore {
        let mut media = MockMediaStore::new();
        media
            .expect_find_by_recording_mbid()
            .returning(|mbid, _| {
                Ok(match mbid {
                    "m2" => vec![media_file(2, 1, "Portishead", "Roads")],
                    "m4" => vec![media_file(4, 1, "Tricky", "Hell Is Round the Corner")],
                    _ => Vec::new(),
                })
            });
        media
            .expect_find_by_artist_and_title()
            .returning(|_, _, _| Ok(Vec::new()));
        media
    }

    fn service(
        settings: MockSettingsStore,
        credentials: MockCredentialStore,
        media: MockMediaStore,
        transport: MockRecommendationTransport,
    ) -> RecommendationService {
        RecommendationService::from_stores(
            Arc::new(settings),
            Arc::new(credentials),
            Arc::new(media),
            EncoderRegistry::with_builtin(),
            Arc::new(transport),
        )
    }

    #[tokio::test]
    async fn test_disabled_integration_makes_no_network_call() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_find_credential().never();

        let service = service(settings(false), credentials, library(), silent_transport());
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_network_call() {
        let (logs, _guard) = capture_logs();

        let service = service(settings(true), no_credentials(), library(), silent_transport());
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
        assert_eq!(logs.count("Unable to get API token for ListenBrainz API"), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_makes_no_network_call() {
        let (logs, _guard) = capture_logs();

        let service = service(
            settings(true),
            credentials("hex", "definitely not hex"),
            library(),
            silent_transport(),
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
        assert_eq!(logs.count("Could not decode credentials"), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_logged_once_without_secret_characters() {
        let (logs, _guard) = capture_logs();

        let service = service(
            settings(true),
            credentials("hex", "746f6bQZ"),
            library(),
            silent_transport(),
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
        assert_eq!(logs.count("decode"), 1);
        assert_eq!(logs.count("Unable to get API token for ListenBrainz API"), 1);
        assert!(logs.contents().contains("credential_unusable"));
        assert!(logs.contents().contains("invalid hex digit at position 6"));
        assert!(!logs.contents().contains("'Q'"));
        assert!(!logs.contents().contains("746f6b"));
    }

    #[tokio::test]
    async fn test_request_carries_account_and_token() {
        let mut transport = MockRecommendationTransport::new();
        transport
            .expect_fetch()
            .withf(|request| {
                request.app_username() == "alice_lb"
                    && request.token.secret() == "tok123"
                    && request.artist_type == "user"
                    && request.count == 40
            })
            .times(1)
            .returning(|_| Ok(r#"{"payload": {"mbids": []}}"#.to_string()));

        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            library(),
            transport,
        );
        let songs = service
            .get_recommended_songs(40, "user", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_resolved_songs_keep_record_order() {
        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            library(),
            responding_transport(FOUR_RECORDS),
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        let ids: Vec<i64> = songs.iter().map(|song| song.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[tokio::test]
    async fn test_stops_once_count_is_reached() {
        let mut media = MockMediaStore::new();
        media
            .expect_find_by_recording_mbid()
            .times(2)
            .returning(|mbid, _| {
                let id = mbid.trim_start_matches('m').parse::<i64>().unwrap();
                Ok(vec![media_file(id, 1, "Artist", mbid)])
            });

        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            media,
            responding_transport(FOUR_RECORDS),
        );
        let songs = service
            .get_recommended_songs(2, "top", "alice", &[folder(1)])
            .await;

        let ids: Vec<i64> = songs.iter().map(|song| song.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_not_found_logs_username_hint() {
        let (logs, _guard) = capture_logs();

        let mut transport = MockRecommendationTransport::new();
        transport
            .expect_fetch()
            .returning(|request| {
                Err(RecommendationError::NotFound(
                    request.app_username().to_string(),
                ))
            });

        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            library(),
            transport,
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
        assert_eq!(
            logs.count("verify that the ListenBrainz username is configured correctly"),
            1
        );
    }

    #[tokio::test]
    async fn test_unexpected_status_yields_empty_list() {
        let mut transport = MockRecommendationTransport::new();
        transport.expect_fetch().returning(|_| {
            Err(RecommendationError::UnexpectedStatus {
                status: 500,
                body: "boom".to_string(),
            })
        });

        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            library(),
            transport,
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_skips_resolution() {
        let mut media = MockMediaStore::new();
        media.expect_find_by_recording_mbid().never();
        media.expect_find_by_artist_and_title().never();

        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            media,
            responding_transport(r#"{"recommendations": "soon"}"#),
        );
        let songs = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_output() {
        let service = service(
            settings(true),
            credentials("noop", "tok123"),
            library(),
            responding_transport(FOUR_RECORDS),
        );

        let first = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;
        let second = service
            .get_recommended_songs(40, "top", "alice", &[folder(1)])
            .await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_count_does_nothing() {
        let mut settings = MockSettingsStore::new();
        settings.expect_is_listenbrainz_enabled().never();

        let service = service(settings, no_credentials(), library(), silent_transport());
        let songs = service
            .get_recommended_songs(0, "top", "alice", &[folder(1)])
            .await;

        assert!(songs.is_empty());
    }
}
