//! The detail view model and the pure step that assembles it.
//!
//! A [`ViewModel`] is a snapshot: every change to the record, its derived
//! fields, or the preference flags produces a new value. Consumers can hold an
//! old one for as long as they like.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use marquee_api::traits::{
    CastMember, MediaRecord, PreferenceEntry, PreferenceList, WatchProvider,
};

use crate::derive::DerivedFields;

/// Per-user flags for the current movie. Absent means "not marked".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferenceState {
    pub is_favorite: bool,
    pub is_watch_later: bool,
}

impl UserPreferenceState {
    pub fn get(&self, list: PreferenceList) -> bool {
        match list {
            PreferenceList::Favorite => self.is_favorite,
            PreferenceList::WatchLater => self.is_watch_later,
        }
    }

    pub fn set(&mut self, list: PreferenceList, value: bool) {
        match list {
            PreferenceList::Favorite => self.is_favorite = value,
            PreferenceList::WatchLater => self.is_watch_later = value,
        }
    }
}

/// Where the record fetch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Loading,
    Ready,
    Failed,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "Loading",
            Self::Ready => "Ready",
            Self::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record together with the fields derived from it. Built only through
/// [`LoadedRecord::new`], so the pair can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    record: Arc<MediaRecord>,
    derived: DerivedFields,
}

impl LoadedRecord {
    pub fn new(record: MediaRecord) -> Self {
        let derived = DerivedFields::from_record(&record);
        Self {
            record: Arc::new(record),
            derived,
        }
    }

    pub fn record(&self) -> &Arc<MediaRecord> {
        &self.record
    }

    pub fn derived(&self) -> &DerivedFields {
        &self.derived
    }
}

/// Outcome of the record fetch for the current movie.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RecordSlot {
    #[default]
    Pending,
    Loaded(LoadedRecord),
    Failed(String),
}

/// Everything the presentation layer sees.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub media_id: Option<u64>,
    pub record: Option<Arc<MediaRecord>>,
    pub derived: Option<DerivedFields>,
    pub preference: UserPreferenceState,
    pub load_state: LoadState,
    /// Provider error message when `load_state` is `Failed`.
    pub failure: Option<String>,
}

/// Combine the current pieces into a fresh snapshot.
pub fn assemble(
    media_id: Option<u64>,
    slot: &RecordSlot,
    preference: UserPreferenceState,
) -> ViewModel {
    let (record, derived, load_state, failure) = match slot {
        RecordSlot::Pending => (None, None, LoadState::Loading, None),
        RecordSlot::Loaded(loaded) => (
            Some(Arc::clone(&loaded.record)),
            Some(loaded.derived.clone()),
            LoadState::Ready,
            None,
        ),
        RecordSlot::Failed(message) => (None, None, LoadState::Failed, Some(message.clone())),
    };

    ViewModel {
        media_id,
        record,
        derived,
        preference,
        load_state,
        failure,
    }
}

impl ViewModel {
    /// The snapshot shown before any movie is selected.
    pub fn empty() -> Self {
        assemble(None, &RecordSlot::Pending, UserPreferenceState::default())
    }

    /// Backend snapshot for the current record, if one is loaded.
    pub fn preference_entry(&self) -> Option<PreferenceEntry> {
        self.record.as_deref().map(PreferenceEntry::from_record)
    }

    /// Up to `limit` purchase providers for `region`.
    pub fn buy_providers(&self, region: &str, limit: usize) -> &[WatchProvider] {
        let providers = self
            .record
            .as_deref()
            .map(|r| r.buy_providers(region))
            .unwrap_or_default();
        &providers[..providers.len().min(limit)]
    }

    /// Up to `limit` backdrop paths.
    pub fn backdrops(&self, limit: usize) -> &[String] {
        let backdrops = self
            .record
            .as_deref()
            .map(|r| r.backdrops.as_slice())
            .unwrap_or_default();
        &backdrops[..backdrops.len().min(limit)]
    }

    /// Up to `limit` billed cast members.
    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        let cast = self
            .record
            .as_deref()
            .map(|r| r.credits.cast.as_slice())
            .unwrap_or_default();
        &cast[..cast.len().min(limit)]
    }
}
