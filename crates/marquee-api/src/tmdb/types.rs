use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::traits::{
    CastMember, Credits, CrewMember, Genre, MediaRecord, RegionProviders, Video, WatchProvider,
};

// ── Error / status body ─────────────────────────────────────────

/// Status envelope TMDB returns on failures (and occasionally with 2xx).
#[derive(Debug, Deserialize)]
pub struct TmdbStatus {
    pub success: Option<bool>,
    pub status_code: Option<u32>,
    pub status_message: Option<String>,
}

// ── Movie details with appended sub-resources ──────────────────

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub vote_average: Option<f32>,
    #[serde(default)]
    pub genres: Option<Vec<TmdbGenre>>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub images: Option<TmdbImages>,
    #[serde(default)]
    pub videos: Option<TmdbResults<TmdbVideo>>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default, rename = "watch/providers")]
    pub watch_providers: Option<TmdbWatchProviders>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbImages {
    #[serde(default)]
    pub backdrops: Vec<TmdbImage>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbImage {
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbVideo {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCast>,
    #[serde(default)]
    pub crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCast {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbCrew {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub job: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, TmdbRegion>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbRegion {
    #[serde(default)]
    pub buy: Vec<TmdbProvider>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbProvider {
    pub provider_name: String,
    pub logo_path: Option<String>,
}

// ── Conversions ──────────────────────────────────────────────────

/// TMDB uses `""` for unknown release dates.
fn parse_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(raw, error = %e, "Unparseable release date");
            None
        }
    }
}

impl TmdbMovie {
    pub fn into_media_record(self) -> MediaRecord {
        let release_date = parse_release_date(self.release_date.as_deref());

        let backdrops = self
            .images
            .map(|i| i.backdrops.into_iter().filter_map(|b| b.file_path).collect())
            .unwrap_or_default();

        let videos = self
            .videos
            .map(|v| {
                v.results
                    .into_iter()
                    .map(|v| Video {
                        site: v.site,
                        kind: v.type_,
                        key: v.key,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let credits = self
            .credits
            .map(|c| Credits {
                cast: c
                    .cast
                    .into_iter()
                    .map(|p| CastMember {
                        id: p.id,
                        name: p.name,
                        character: p.character.unwrap_or_default(),
                        profile_path: p.profile_path,
                    })
                    .collect(),
                crew: c
                    .crew
                    .into_iter()
                    .map(|p| CrewMember {
                        name: p.name,
                        job: p.job,
                    })
                    .collect(),
            })
            .unwrap_or_default();

        let watch_providers: BTreeMap<String, RegionProviders> = self
            .watch_providers
            .map(|w| {
                w.results
                    .into_iter()
                    .map(|(region, r)| {
                        let buy = r
                            .buy
                            .into_iter()
                            .map(|p| WatchProvider {
                                provider_name: p.provider_name,
                                logo_path: p.logo_path,
                            })
                            .collect();
                        (region, RegionProviders { buy })
                    })
                    .collect()
            })
            .unwrap_or_default();

        MediaRecord {
            id: self.id,
            title: self.title.unwrap_or_default(),
            original_language: self.original_language.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            release_date,
            runtime_minutes: self.runtime,
            vote_average: self.vote_average.unwrap_or(0.0).clamp(0.0, 10.0),
            genres: self
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| Genre {
                    id: g.id,
                    name: g.name,
                })
                .collect(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            backdrops,
            adult: self.adult.unwrap_or(false),
            videos,
            credits,
            watch_providers,
        }
    }
}
