use std::sync::Arc;

use crate::{
    db::MediaStore,
    error::AppResult,
    models::{MediaFile, MusicFolder, RecommendationRecord},
};

/// Maps recommended recordings onto songs in the local library
pub struct TrackResolver {
    media: Arc<dyn MediaStore>,
}

impl TrackResolver {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }

    /// Finds the single local song matching `record` in the visible folders.
    ///
    /// The MusicBrainz recording id is tried first, then artist and title.
    /// Zero or several matches resolve to `None`.
    pub async fn resolve(
        &self,
        record: &RecommendationRecord,
        folders: &[MusicFolder],
    ) -> AppResult<Option<MediaFile>> {
        if folders.is_empty() {
            return Ok(None);
        }

        let by_mbid = self
            .media
            .find_by_recording_mbid(&record.recording_mbid, folders)
            .await?;
        if let Some(file) = single_visible(by_mbid, folders) {
            return Ok(Some(file));
        }

        let (Some(artist), Some(title)) = (&record.artist_name, &record.recording_name) else {
            return Ok(None);
        };

        let by_name = self
            .media
            .find_by_artist_and_title(artist, title, folders)
            .await?;

        Ok(single_visible(by_name, folders))
    }
}

/// The only candidate inside `folders`, if there is exactly one
fn single_visible(candidates: Vec<MediaFile>, folders: &[MusicFolder]) -> Option<MediaFile> {
    let mut visible = candidates.into_iter().filter(|file| file.is_in(folders));

    match (visible.next(), visible.next()) {
        (Some(file), None) => Some(file),
        _ => None,
    }
}
