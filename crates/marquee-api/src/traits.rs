//! Trait definitions for the metadata provider and the preference backend.
//!
//! The TMDB and backend clients implement these traits, allowing the runtime
//! to be driven by test doubles as easily as by the real services.

use std::collections::BTreeMap;
use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;
use crate::tmdb::ProviderError;

/// Source of raw movie records.
pub trait MetadataProvider: Send + Sync {
    /// Fetch a movie with all enriched sub-resources in a single request.
    fn fetch_movie(
        &self,
        movie_id: u64,
    ) -> impl Future<Output = Result<MediaRecord, ProviderError>> + Send;
}

/// The private backend holding per-user favorite / watch-later entries.
pub trait PreferenceBackend: Send + Sync {
    /// Whether the movie is currently on the given list.
    fn is_marked(
        &self,
        list: PreferenceList,
        movie_id: u64,
    ) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Create an entry on the given list.
    fn add(
        &self,
        list: PreferenceList,
        entry: &PreferenceEntry,
    ) -> impl Future<Output = Result<BackendReply, BackendError>> + Send;

    /// Remove an entry from the given list.
    fn remove(
        &self,
        list: PreferenceList,
        movie_id: u64,
    ) -> impl Future<Output = Result<BackendReply, BackendError>> + Send;
}

/// The two per-user lists the backend keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceList {
    Favorite,
    WatchLater,
}

impl PreferenceList {
    pub const ALL: &[PreferenceList] = &[Self::Favorite, Self::WatchLater];

    /// Resource path for create / delete.
    pub fn resource_path(self) -> &'static str {
        match self {
            Self::Favorite => "/api/favorite",
            Self::WatchLater => "/api/watchlater",
        }
    }

    /// Resource path for the "is this movie on the list" query.
    pub fn status_path(self) -> &'static str {
        match self {
            Self::Favorite => "/api/isfavorite",
            Self::WatchLater => "/api/iswatchlater",
        }
    }
}

impl std::fmt::Display for PreferenceList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Favorite => write!(f, "favorites"),
            Self::WatchLater => write!(f, "watch later"),
        }
    }
}

/// Snapshot of the fields the backend stores so it can render its lists
/// without calling the provider again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceEntry {
    pub movieid: u64,
    pub poster_path: Option<String>,
    pub title: String,
    pub release_date: String,
    pub original_language: String,
    pub vote_average: f32,
}

impl PreferenceEntry {
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            movieid: record.id,
            poster_path: record.poster_path.clone(),
            title: record.title.clone(),
            release_date: record
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            original_language: record.original_language.clone(),
            vote_average: record.vote_average,
        }
    }
}

/// Reply body of every backend mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Media record ────────────────────────────────────────────────

/// A movie as returned by the provider, with its embedded sub-resources.
///
/// Records are immutable once fetched: a re-fetch replaces the whole value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: u64,
    pub title: String,
    pub original_language: String,
    pub overview: String,
    pub release_date: Option<NaiveDate>,
    pub runtime_minutes: Option<u32>,
    /// 0–10 scale.
    pub vote_average: f32,
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// Backdrop image paths, in provider order.
    pub backdrops: Vec<String>,
    pub adult: bool,
    pub videos: Vec<Video>,
    pub credits: Credits,
    /// Purchase availability keyed by ISO 3166-1 region code.
    pub watch_providers: BTreeMap<String, RegionProviders>,
}

impl MediaRecord {
    /// Providers selling the movie in `region`. Empty when the region has no data.
    pub fn buy_providers(&self, region: &str) -> &[WatchProvider] {
        self.watch_providers
            .get(region)
            .map(|r| r.buy.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionProviders {
    pub buy: Vec<WatchProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub provider_name: String,
    pub logo_path: Option<String>,
}
