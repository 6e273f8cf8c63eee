pub mod credential;
pub mod media;
pub mod recommendation;

pub use credential::{App, DecodedToken, UserCredential};
pub use media::{MediaFile, MusicFolder};
pub use recommendation::{
    ApiRecommendationPayload, ApiRecommendationResponse, ApiRecording, RecommendationRecord,
    RecommendationRequest,
};
