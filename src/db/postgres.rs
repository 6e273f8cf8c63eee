use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{CredentialStore, MediaStore, SettingsStore};
use crate::{
    error::{AppError, AppResult},
    models::{App, MediaFile, MusicFolder, UserCredential},
};

/// Creates a PostgreSQL connection pool
///
/// The pool is only ever used for reads against the host application's tables.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

const MEDIA_FILE_COLUMNS: &str =
    "id, path, folder_id, artist, title, album, mb_recording_id, duration_seconds";

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    username: String,
    app: String,
    encoder: String,
    credential: String,
    app_username: String,
    updated: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for UserCredential {
    type Error = AppError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let app = row.app.parse::<App>().map_err(AppError::Internal)?;

        Ok(UserCredential {
            username: row.username,
            app,
            encoder: row.encoder,
            credential: row.credential,
            app_username: row.app_username,
            updated: row.updated,
        })
    }
}

/// Storage backed by the host application's PostgreSQL database
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn folder_ids(folders: &[MusicFolder]) -> Vec<i32> {
    folders.iter().map(|folder| folder.id).collect()
}

#[async_trait::async_trait]
impl SettingsStore for PgStore {
    async fn is_listenbrainz_enabled(&self, username: &str) -> AppResult<bool> {
        let enabled: Option<Option<bool>> = sqlx::query_scalar(
            "SELECT listenbrainz_enabled FROM user_settings WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enabled.flatten().unwrap_or(false))
    }
}

#[async_trait::async_trait]
impl CredentialStore for PgStore {
    async fn find_credential(
        &self,
        username: &str,
        app: App,
    ) -> AppResult<Option<UserCredential>> {
        let row: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT username, app, encoder, credential, app_username, updated
            FROM user_credentials
            WHERE username = $1 AND app = $2
            ORDER BY updated DESC
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(app.as_tag())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserCredential::try_from).transpose()
    }
}

#[async_trait::async_trait]
impl MediaStore for PgStore {
    async fn find_by_recording_mbid(
        &self,
        mbid: &str,
        folders: &[MusicFolder],
    ) -> AppResult<Vec<MediaFile>> {
        if folders.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM media_file \
             WHERE mb_recording_id = $1 AND folder_id = ANY($2) AND present = true",
            MEDIA_FILE_COLUMNS
        );

        let files = sqlx::query_as::<_, MediaFile>(&query)
            .bind(mbid)
            .bind(folder_ids(folders))
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }

    async fn find_by_artist_and_title(
        &self,
        artist: &str,
        title: &str,
        folders: &[MusicFolder],
    ) -> AppResult<Vec<MediaFile>> {
        if folders.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM media_file \
             WHERE lower(artist) = lower($1) AND lower(title) = lower($2) \
             AND folder_id = ANY($3) AND present = true",
            MEDIA_FILE_COLUMNS
        );

        let files = sqlx::query_as::<_, MediaFile>(&query)
            .bind(artist)
            .bind(title)
            .bind(folder_ids(folders))
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }

    async fn visible_folders(&self, username: &str) -> AppResult<Vec<MusicFolder>> {
        let folders = sqlx::query_as::<_, MusicFolder>(
            r#"
            SELECT f.id, f.name, f.path
            FROM music_folder f
            JOIN music_folder_user u ON u.music_folder_id = f.id
            WHERE u.username = $1 AND f.enabled = true
            ORDER BY f.id
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(folders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential_row(app: &str) -> CredentialRow {
        CredentialRow {
            username: "alice".to_string(),
            app: app.to_string(),
            encoder: "hex".to_string(),
            credential: "746f6b313233".to_string(),
            app_username: "alice_lb".to_string(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn test_credential_row_conversion() {
        let credential = UserCredential::try_from(credential_row("LISTENBRAINZ")).unwrap();

        assert_eq!(credential.app, App::ListenBrainz);
        assert_eq!(credential.app_username, "alice_lb");
        assert_eq!(credential.encoder, "hex");
    }

    #[test]
    fn test_credential_row_unknown_app() {
        let result = UserCredential::try_from(credential_row("MYSPACE"));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_folder_ids() {
        let folders = vec![
            MusicFolder {
                id: 3,
                name: "Music".to_string(),
                path: "/music".to_string(),
            },
            MusicFolder {
                id: 7,
                name: "Podcasts".to_string(),
                path: "/podcasts".to_string(),
            },
        ];

        assert_eq!(folder_ids(&folders), vec![3, 7]);
        assert!(folder_ids(&[]).is_empty());
    }
}
