use serde::{Deserialize, Serialize};

/// A storage location songs are scanned from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct MusicFolder {
    pub id: i32,
    pub name: String,
    pub path: String,
}

/// A locally known playable song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct MediaFile {
    pub id: i64,
    pub path: String,
    /// Music folder the file was scanned from
    pub folder_id: i32,
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// MusicBrainz recording id read from the file tags
    pub mb_recording_id: Option<String>,
    pub duration_seconds: Option<i32>,
}

impl MediaFile {
    /// Checks if the file lives in one of the given folders
    pub fn is_in(&self, folders: &[MusicFolder]) -> bool {
        folders.iter().any(|folder| folder.id == self.folder_id)
    }
}
