use serde::{Deserialize, Serialize};

use super::DecodedToken;

/// Parameters of one call to the ListenBrainz recommendation endpoint.
///
/// Only the first page is ever requested.
#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub token: DecodedToken,
    /// Recommendation algorithm variant (e.g. "top", "similar")
    pub artist_type: String,
    pub count: u32,
}

impl RecommendationRequest {
    pub const OFFSET: u32 = 0;

    pub fn new(token: DecodedToken, artist_type: impl Into<String>, count: u32) -> Self {
        Self {
            token,
            artist_type: artist_type.into(),
            count,
        }
    }

    pub fn app_username(&self) -> &str {
        &self.token.app_username
    }
}

/// One recommended recording, in the order ListenBrainz ranked it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationRecord {
    pub recording_mbid: String,
    pub recording_name: Option<String>,
    pub artist_name: Option<String>,
    pub artist_mbids: Vec<String>,
    pub score: Option<f64>,
}

impl From<ApiRecording> for RecommendationRecord {
    fn from(recording: ApiRecording) -> Self {
        Self {
            recording_mbid: recording.recording_mbid,
            recording_name: recording.recording_name,
            artist_name: recording.artist_name,
            artist_mbids: recording.artist_mbids,
            score: recording.score,
        }
    }
}

// ============================================================================
// ListenBrainz API Types
// ============================================================================

/// Body of GET /1/cf/recommendation/user/{user}/recording
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecommendationResponse {
    pub payload: ApiRecommendationPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecommendationPayload {
    pub mbids: Vec<ApiRecording>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub total_mbid_count: Option<u32>,
    #[serde(default)]
    pub last_updated: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRecording {
    pub recording_mbid: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub recording_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub artist_mbids: Vec<String>,
}
