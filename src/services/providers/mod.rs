/// Recommendation service abstraction
///
/// The orchestrator talks to the external recommendation service through this
/// trait so it can be exercised without network access. `ListenBrainzClient`
/// is the production implementation.
use crate::{error::RecommendationError, models::RecommendationRequest};

pub mod listenbrainz;

pub use listenbrainz::{parse_recommendations, ListenBrainzClient, ListenBrainzSettings};

/// Transport for the recommendation endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationTransport: Send + Sync {
    /// Executes one request and returns the raw body of a 200 response.
    ///
    /// Any other outcome is classified as `NetworkFailure`, `NotFound` or
    /// `UnexpectedStatus`.
    async fn fetch(&self, request: &RecommendationRequest) -> Result<String, RecommendationError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
