/// ListenBrainz API provider
///
/// Fetches collaborative-filtering recording recommendations for a user.
///
/// API Flow:
/// 1. GET /1/cf/recommendation/user/{user_name}/recording?artist_type=..&count=..&offset=0
///    with `Authorization: token {user token}`
/// 2. 200 → JSON body with `payload.mbids`, ranked best first
use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client as HttpClient, StatusCode, Url};

use crate::{
    error::{AppError, AppResult, RecommendationError},
    models::{ApiRecommendationResponse, RecommendationRecord, RecommendationRequest},
    services::providers::RecommendationTransport,
};

const DEFAULT_API_URL: &str = "https://api.listenbrainz.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const BODY_SUMMARY_LIMIT: usize = 200;

/// Where and how patiently to reach ListenBrainz
#[derive(Debug, Clone)]
pub struct ListenBrainzSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ListenBrainzSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            connect_timeout: DEFAULT_TIMEOUT,
            read_timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct ListenBrainzClient {
    base_url: Url,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl ListenBrainzClient {
    pub fn new(settings: ListenBrainzSettings) -> AppResult<Self> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid ListenBrainz API URL '{}': {}",
                settings.base_url, e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::InvalidInput(format!(
                "ListenBrainz API URL '{}' cannot be used as a base",
                settings.base_url
            )));
        }

        Ok(Self {
            base_url,
            connect_timeout: settings.connect_timeout,
            read_timeout: settings.read_timeout,
        })
    }

    /// Builds the recommendation URL; the user name is percent-encoded as a
    /// single path segment
    fn recommendation_url(&self, request: &RecommendationRequest) -> Url {
        let mut url = self.base_url.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "1",
                "cf",
                "recommendation",
                "user",
                request.app_username(),
                "recording",
            ]);
        }

        url.query_pairs_mut()
            .append_pair("artist_type", &request.artist_type)
            .append_pair("count", &request.count.to_string())
            .append_pair("offset", &RecommendationRequest::OFFSET.to_string());

        url
    }

    /// A fresh HTTP client per call, dropped when the call returns
    fn http_client(&self) -> Result<HttpClient, RecommendationError> {
        let client = HttpClient::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .build()?;

        Ok(client)
    }
}

/// Shortens an error body for logs and error values
fn summarize_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= BODY_SUMMARY_LIMIT {
        return body.to_string();
    }

    let mut summary: String = body.chars().take(BODY_SUMMARY_LIMIT).collect();
    summary.push_str("...");
    summary
}

/// Decodes a recommendation body into records, preserving their ranking.
///
/// A payload with an empty `mbids` list is a valid empty result.
pub fn parse_recommendations(body: &str) -> Result<Vec<RecommendationRecord>, RecommendationError> {
    let response: ApiRecommendationResponse = serde_json::from_str(body)?;

    let records: Vec<RecommendationRecord> = response
        .payload
        .mbids
        .into_iter()
        .map(RecommendationRecord::from)
        .collect();

    tracing::debug!(
        records = records.len(),
        user_name = ?response.payload.user_name,
        total = ?response.payload.total_mbid_count,
        "Parsed ListenBrainz recommendations"
    );

    Ok(records)
}

#[async_trait::async_trait]
impl RecommendationTransport for ListenBrainzClient {
    async fn fetch(&self, request: &RecommendationRequest) -> Result<String, RecommendationError> {
        let url = self.recommendation_url(request);
        let http_client = self.http_client()?;

        tracing::debug!(
            app_username = %request.app_username(),
            artist_type = %request.artist_type,
            count = request.count,
            "Requesting ListenBrainz recommendations"
        );

        let response = http_client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", request.token.secret()))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            let body = response.text().await?;
            return Ok(body);
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(
                    status = %status,
                    error = %e,
                    "Could not read ListenBrainz error body"
                );
                String::new()
            }
        };
        let body = summarize_body(&text);
        tracing::warn!(
            status = %status,
            body = %body,
            "Failed to execute ListenBrainz request"
        );

        if status == StatusCode::NOT_FOUND {
            tracing::warn!(
                app_username = %request.app_username(),
                "Verify that the ListenBrainz username is correct"
            );
            return Err(RecommendationError::NotFound(
                request.app_username().to_string(),
            ));
        }

        Err(RecommendationError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }

    fn name(&self) -> &'static str {
        "listenbrainz"
    }
}
