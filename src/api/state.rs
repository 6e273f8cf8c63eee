use std::sync::Arc;

use crate::{config::Config, db::MediaStore, services::RecommendationService};

/// Values used when a request leaves them out
#[derive(Debug, Clone)]
pub struct RecommendationDefaults {
    pub count: u32,
    pub artist_type: String,
}

impl Default for RecommendationDefaults {
    fn default() -> Self {
        Self {
            count: 40,
            artist_type: "top".to_string(),
        }
    }
}

impl From<&Config> for RecommendationDefaults {
    fn from(config: &Config) -> Self {
        Self {
            count: config.recommendation_count,
            artist_type: config.recommendation_artist_type.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    /// Used to look up the folders a caller may see
    pub media: Arc<dyn MediaStore>,
    pub defaults: RecommendationDefaults,
}

impl AppState {
    pub fn new(
        recommendations: Arc<RecommendationService>,
        media: Arc<dyn MediaStore>,
        defaults: RecommendationDefaults,
    ) -> Self {
        Self {
            recommendations,
            media,
            defaults,
        }
    }
}
