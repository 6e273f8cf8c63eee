//! Read-only access to the host application's storage.
//!
//! The recommendation pipeline only depends on these traits; `PgStore`
//! implements all of them against the host's PostgreSQL schema.
use crate::{
    error::AppResult,
    models::{App, MediaFile, MusicFolder, UserCredential},
};

pub mod postgres;

pub use postgres::{create_pool, PgStore};

/// Per-user settings lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    /// Whether the user switched the ListenBrainz integration on
    async fn is_listenbrainz_enabled(&self, username: &str) -> AppResult<bool>;
}

/// Stored credentials for external applications
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Most recently updated credential the user stored for `app`
    async fn find_credential(&self, username: &str, app: App)
        -> AppResult<Option<UserCredential>>;
}

/// Media library lookups, always scoped to a set of music folders
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    /// Songs tagged with the given MusicBrainz recording id
    async fn find_by_recording_mbid(
        &self,
        mbid: &str,
        folders: &[MusicFolder],
    ) -> AppResult<Vec<MediaFile>>;

    /// Songs whose artist and title match, ignoring case
    async fn find_by_artist_and_title(
        &self,
        artist: &str,
        title: &str,
        folders: &[MusicFolder],
    ) -> AppResult<Vec<MediaFile>>;

    /// Music folders the user is allowed to see
    async fn visible_folders(&self, username: &str) -> AppResult<Vec<MusicFolder>>;
}
