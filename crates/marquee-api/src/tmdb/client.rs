use reqwest::Client;

use super::error::ProviderError;
use super::types::{TmdbMovie, TmdbStatus};
use crate::traits::{MediaRecord, MetadataProvider};

pub const BASE_URL: &str = "https://api.themoviedb.org/3";

/// Sub-resources fetched together with the movie details.
const APPEND_TO_RESPONSE: &str = "images,videos,credits,watch/providers";

/// Image languages to include; `null` keeps language-neutral backdrops.
const IMAGE_LANGUAGES: &str = "null,en";

/// TMDB v3 client.
pub struct TmdbClient {
    api_key: Option<String>,
    base_url: String,
    language: String,
    http: Client,
}

impl TmdbClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: "en-US".into(),
            http: Client::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Turn a non-success response into an error, preferring TMDB's own message.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<TmdbStatus>(&body)
            .ok()
            .and_then(|s| s.status_message)
            .unwrap_or(body);
        tracing::warn!(status, %message, "TMDB API error");
        Err(ProviderError::Api { status, message })
    }
}

impl MetadataProvider for TmdbClient {
    async fn fetch_movie(&self, movie_id: u64) -> Result<MediaRecord, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingCredentials)?;

        tracing::debug!(movie_id, "Fetching movie from TMDB");
        let resp = self
            .http
            .get(format!("{}/movie/{movie_id}", self.base_url))
            .query(&[
                ("api_key", api_key),
                ("language", self.language.as_str()),
                ("append_to_response", APPEND_TO_RESPONSE),
                ("include_image_language", IMAGE_LANGUAGES),
            ])
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        // Some failures come back as 2xx with a status envelope.
        if body.get("success").and_then(|s| s.as_bool()) == Some(false) {
            let message = body
                .get("status_message")
                .and_then(|m| m.as_str())
                .unwrap_or("Failed to load movie data")
                .to_string();
            return Err(ProviderError::Rejected(message));
        }

        let movie: TmdbMovie =
            serde_json::from_value(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
        Ok(movie.into_media_record())
    }
}
