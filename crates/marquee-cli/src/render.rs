//! Plain-text rendering of a detail view model.

use marquee_core::config::AppConfig;
use marquee_core::format;
use marquee_core::view::{LoadState, ViewModel};

const LOADING: &str = "Loading movie details...";
const UNAVAILABLE: &str = "The movie you are trying to search is not available";
const NO_PROVIDERS: &str = "No Watch Providers Available for this Movie";
const NO_IMAGES: &str = "No images available for this movie";
const NO_TRAILER: &str = "No trailer available for this movie";

pub fn detail(view: &ViewModel, config: &AppConfig) -> String {
    let mut lines = Vec::new();
    match view.load_state {
        LoadState::Loading => lines.push(LOADING.to_string()),
        LoadState::Failed => {
            lines.push(UNAVAILABLE.to_string());
            if let Some(failure) = &view.failure {
                lines.push(format!("  ({failure})"));
            }
        }
        LoadState::Ready => body(view, config, &mut lines),
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn body(view: &ViewModel, config: &AppConfig, lines: &mut Vec<String>) {
    let Some(record) = view.record.as_deref() else {
        return;
    };
    let images = &config.provider.image_base_url;
    let display = &config.display;

    let mut title = record.title.clone();
    if record.adult {
        title.push_str("  [18+]");
    }
    lines.push(title);

    let facts: Vec<String> = [
        format::runtime(record.runtime_minutes),
        format::release_year(record.release_date).map(|y| y.to_string()),
        Some(format!("★ {}", format::vote(record.vote_average))),
    ]
    .into_iter()
    .flatten()
    .collect();
    lines.push(facts.join("  ·  "));

    if !record.genres.is_empty() {
        lines.push(format::genres(&record.genres));
    }
    if let Some(poster) = format::image_url(images, format::POSTER_SIZE, record.poster_path.as_deref())
    {
        lines.push(format!("Poster: {poster}"));
    }
    if !record.overview.is_empty() {
        lines.push(String::new());
        lines.push(record.overview.clone());
    }

    let director = view.derived.as_ref().and_then(|d| d.director_name.as_deref());
    lines.push(String::new());
    lines.push(format!("A movie by - {}", format::director(director)));

    lines.push(String::new());
    lines.push(format!("Favorite:    {}", flag(view.preference.is_favorite)));
    lines.push(format!("Watch later: {}", flag(view.preference.is_watch_later)));

    lines.push(String::new());
    lines.push(format!("Buy ({}):", display.region));
    let providers = view.buy_providers(&display.region, display.max_providers);
    if providers.is_empty() {
        lines.push(format!("  {NO_PROVIDERS}"));
    }
    for provider in providers {
        match format::image_url(images, format::LOGO_SIZE, provider.logo_path.as_deref()) {
            Some(logo) => lines.push(format!("  {}  {logo}", provider.provider_name)),
            None => lines.push(format!("  {}", provider.provider_name)),
        }
    }

    lines.push(String::new());
    lines.push("Images:".to_string());
    let backdrops = view.backdrops(display.max_backdrops);
    if backdrops.is_empty() {
        lines.push(format!("  {NO_IMAGES}"));
    }
    for path in backdrops {
        if let Some(url) = format::image_url(images, format::BACKDROP_SIZE, Some(path)) {
            lines.push(format!("  {url}"));
        }
    }

    lines.push(String::new());
    match view.derived.as_ref().and_then(|d| d.trailer_key.as_deref()) {
        Some(key) => lines.push(format!("Trailer: {}", format::trailer_url(key))),
        None => lines.push(NO_TRAILER.to_string()),
    }

    let cast = view.top_cast(display.max_cast);
    if !cast.is_empty() {
        lines.push(String::new());
        lines.push("Cast:".to_string());
        for member in cast {
            let mut line = format!("  {}", member.name);
            if !member.character.is_empty() {
                line.push_str(&format!(" as {}", member.character));
            }
            if let Some(url) =
                format::image_url(images, format::PROFILE_SIZE, member.profile_path.as_deref())
            {
                line.push_str(&format!("  {url}"));
            }
            lines.push(line);
        }
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use marquee_api::traits::{
        CastMember, Credits, CrewMember, Genre, MediaRecord, RegionProviders, Video, WatchProvider,
    };
    use marquee_core::view::{assemble, LoadedRecord, RecordSlot, UserPreferenceState};

    use super::*;

    fn record() -> MediaRecord {
        let mut providers = BTreeMap::new();
        providers.insert(
            "CA".to_string(),
            RegionProviders {
                buy: vec![WatchProvider {
                    provider_name: "Apple TV".into(),
                    logo_path: Some("/apple.jpg".into()),
                }],
            },
        );
        MediaRecord {
            id: 550,
            title: "Fight Club".into(),
            original_language: "en".into(),
            overview: "An insomniac office worker...".into(),
            release_date: NaiveDate::from_ymd_opt(1999, 10, 15),
            runtime_minutes: Some(139),
            vote_average: 8.433,
            genres: vec![
                Genre {
                    id: 18,
                    name: "Drama".into(),
                },
                Genre {
                    id: 53,
                    name: "Thriller".into(),
                },
            ],
            poster_path: Some("/poster.jpg".into()),
            backdrop_path: None,
            backdrops: vec!["/b1.jpg".into(), "/b2.jpg".into()],
            adult: false,
            videos: vec![Video {
                site: "YouTube".into(),
                kind: "Trailer".into(),
                key: "qtRKdVHc-cE".into(),
            }],
            credits: Credits {
                cast: vec![CastMember {
                    id: 819,
                    name: "Edward Norton".into(),
                    character: "The Narrator".into(),
                    profile_path: None,
                }],
                crew: vec![CrewMember {
                    name: "David Fincher".into(),
                    job: "Director".into(),
                }],
            },
            watch_providers: providers,
        }
    }

    fn ready(record: MediaRecord) -> ViewModel {
        let preference = UserPreferenceState {
            is_favorite: true,
            is_watch_later: false,
        };
        assemble(
            Some(record.id),
            &RecordSlot::Loaded(LoadedRecord::new(record)),
            preference,
        )
    }

    #[test]
    fn test_loading_and_failed() {
        let config = AppConfig::default();
        let loading = assemble(Some(1), &RecordSlot::Pending, UserPreferenceState::default());
        assert_eq!(detail(&loading, &config), "Loading movie details...\n");

        let failed = assemble(
            Some(1),
            &RecordSlot::Failed("not found".into()),
            UserPreferenceState::default(),
        );
        let out = detail(&failed, &config);
        assert!(out.starts_with(UNAVAILABLE));
        assert!(out.contains("not found"));
    }

    #[test]
    fn test_ready_view() {
        let out = detail(&ready(record()), &AppConfig::default());
        assert!(out.starts_with("Fight Club\n"));
        assert!(out.contains("2h 19m  ·  1999  ·  ★ 8.4"));
        assert!(out.contains("Drama   |   Thriller"));
        assert!(out.contains("A movie by - David Fincher"));
        assert!(out.contains("Favorite:    yes"));
        assert!(out.contains("Watch later: no"));
        assert!(out.contains("Apple TV  https://image.tmdb.org/t/p/w200/apple.jpg"));
        assert!(out.contains("https://image.tmdb.org/t/p/w500/b2.jpg"));
        assert!(out.contains("Trailer: https://www.youtube.com/watch?v=qtRKdVHc-cE"));
        assert!(out.contains("Edward Norton as The Narrator"));
    }

    #[test]
    fn test_empty_sections_and_limits() {
        let mut bare = record();
        bare.watch_providers.clear();
        bare.videos.clear();
        bare.credits.crew.clear();
        bare.adult = true;
        let mut config = AppConfig::default();
        config.display.max_backdrops = 0;

        let out = detail(&ready(bare), &config);
        assert!(out.starts_with("Fight Club  [18+]"));
        assert!(out.contains(NO_PROVIDERS));
        assert!(out.contains(NO_IMAGES));
        assert!(out.contains(NO_TRAILER));
        assert!(out.contains("A movie by - Unknown Director"));
    }
}
