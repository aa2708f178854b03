//! Display formatting helpers for movie metadata values.

use chrono::{Datelike, NaiveDate};

use marquee_api::traits::Genre;

pub const POSTER_SIZE: &str = "w500";
pub const BACKDROP_SIZE: &str = "w500";
pub const PROFILE_SIZE: &str = "w200";
pub const LOGO_SIZE: &str = "w200";

const GENRE_SEPARATOR: &str = "   |   ";
const UNKNOWN_DIRECTOR: &str = "Unknown Director";

/// `155` → `"2h 35m"`, `45` → `"45m"`.
pub fn runtime(minutes: Option<u32>) -> Option<String> {
    let minutes = minutes?;
    let (h, m) = (minutes / 60, minutes % 60);
    Some(if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    })
}

pub fn release_year(date: Option<NaiveDate>) -> Option<i32> {
    date.map(|d| d.year())
}

/// One decimal, as shown next to the star.
pub fn vote(average: f32) -> String {
    format!("{average:.1}")
}

pub fn genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(GENRE_SEPARATOR)
}

pub fn director(name: Option<&str>) -> &str {
    name.unwrap_or(UNKNOWN_DIRECTOR)
}

/// Full image URL for a TMDB path, or `None` when the path is absent.
pub fn image_url(base: &str, size: &str, path: Option<&str>) -> Option<String> {
    let path = path.filter(|p| !p.is_empty())?;
    Some(format!("{}/{size}{path}", base.trim_end_matches('/')))
}

pub fn trailer_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}
