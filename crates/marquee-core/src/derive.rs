//! Values computed from a media record rather than copied from it.

use serde::{Deserialize, Serialize};

use marquee_api::traits::{CrewMember, MediaRecord, Video};

const TRAILER_SITE: &str = "YouTube";

/// Derived fields of a record. Never mutated on their own: a new record means
/// a new derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFields {
    /// External video id of the trailer to play.
    pub trailer_key: Option<String>,
    pub director_name: Option<String>,
}

impl DerivedFields {
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            trailer_key: select_trailer(&record.videos).map(|v| v.key.clone()),
            director_name: find_director(&record.credits.crew).map(str::to_string),
        }
    }
}

/// Pick the video to play: the first YouTube trailer, else the first YouTube
/// teaser, else nothing.
pub fn select_trailer(videos: &[Video]) -> Option<&Video> {
    let first_of = |kind: &str| {
        videos
            .iter()
            .find(|v| v.site == TRAILER_SITE && v.kind == kind)
    };
    first_of("Trailer").or_else(|| first_of("Teaser"))
}

/// First crew member credited exactly as "Director".
pub fn find_director(crew: &[CrewMember]) -> Option<&str> {
    crew.iter()
        .find(|c| c.job == "Director")
        .map(|c| c.name.as_str())
}
