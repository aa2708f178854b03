//! In-memory provider and backend doubles for the runtime tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

use marquee_api::backend::BackendError;
use marquee_api::tmdb::ProviderError;
use marquee_api::traits::{
    BackendReply, Credits, CrewMember, MediaRecord, MetadataProvider, PreferenceBackend,
    PreferenceEntry, PreferenceList, Video,
};

pub fn record(id: u64) -> MediaRecord {
    MediaRecord {
        id,
        title: format!("Movie {id}"),
        original_language: "en".into(),
        overview: "A movie.".into(),
        release_date: NaiveDate::from_ymd_opt(2019, 12, 25),
        runtime_minutes: Some(135),
        vote_average: 7.8,
        genres: Vec::new(),
        poster_path: Some(format!("/poster{id}.jpg")),
        backdrop_path: None,
        backdrops: Vec::new(),
        adult: false,
        videos: vec![Video {
            site: "YouTube".into(),
            kind: "Trailer".into(),
            key: format!("trailer{id}"),
        }],
        credits: Credits {
            cast: Vec::new(),
            crew: vec![CrewMember {
                name: "Greta Gerwig".into(),
                job: "Director".into(),
            }],
        },
        watch_providers: BTreeMap::new(),
    }
}

pub fn entry(id: u64) -> PreferenceEntry {
    PreferenceEntry::from_record(&record(id))
}

#[derive(Default)]
struct ProviderState {
    records: HashMap<u64, MediaRecord>,
    delays: HashMap<u64, Duration>,
}

/// Serves inserted records; anything else is a 404.
#[derive(Default)]
pub struct FakeProvider {
    state: Mutex<ProviderState>,
}

impl FakeProvider {
    pub fn insert(&self, record: MediaRecord) {
        self.state.lock().unwrap().records.insert(record.id, record);
    }

    pub fn delay(&self, movie_id: u64, delay: Duration) {
        self.state.lock().unwrap().delays.insert(movie_id, delay);
    }
}

impl MetadataProvider for FakeProvider {
    async fn fetch_movie(&self, movie_id: u64) -> Result<MediaRecord, ProviderError> {
        let (delay, record) = {
            let state = self.state.lock().unwrap();
            (
                state.delays.get(&movie_id).copied(),
                state.records.get(&movie_id).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        record.ok_or_else(|| ProviderError::Api {
            status: 404,
            message: "The resource you requested could not be found.".into(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Add(PreferenceList, u64),
    Remove(PreferenceList, u64),
}

#[derive(Default)]
struct BackendState {
    marked: HashSet<PreferenceList>,
    failing_status: HashSet<PreferenceList>,
    failing_mutations: HashSet<PreferenceList>,
    replies: HashMap<PreferenceList, BackendReply>,
    add_delay: Duration,
    status_delay: Duration,
    mutations: Vec<BackendCall>,
}

/// Accepts every mutation unless told otherwise. Clones share state.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn mark(&self, list: PreferenceList, value: bool) {
        let mut state = self.state.lock().unwrap();
        if value {
            state.marked.insert(list);
        } else {
            state.marked.remove(&list);
        }
    }

    pub fn fail_status(&self, list: PreferenceList) {
        self.state.lock().unwrap().failing_status.insert(list);
    }

    pub fn fail_mutations(&self, list: PreferenceList) {
        self.state.lock().unwrap().failing_mutations.insert(list);
    }

    pub fn reply_with(&self, list: PreferenceList, success: bool, message: Option<&str>) {
        self.state.lock().unwrap().replies.insert(
            list,
            BackendReply {
                success,
                message: message.map(str::to_string),
            },
        );
    }

    pub fn delay_add(&self, delay: Duration) {
        self.state.lock().unwrap().add_delay = delay;
    }

    pub fn delay_status(&self, delay: Duration) {
        self.state.lock().unwrap().status_delay = delay;
    }

    pub fn mutations(&self) -> Vec<BackendCall> {
        self.state.lock().unwrap().mutations.clone()
    }

    fn unavailable() -> BackendError {
        BackendError::Api {
            status: 503,
            message: "unavailable".into(),
        }
    }

    fn log(&self, call: BackendCall) {
        self.state.lock().unwrap().mutations.push(call);
    }

    /// Decide the reply for a landed mutation and apply it on success.
    fn reply(&self, list: PreferenceList, value: bool) -> Result<BackendReply, BackendError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_mutations.contains(&list) {
            return Err(Self::unavailable());
        }
        let reply = state.replies.get(&list).cloned().unwrap_or(BackendReply {
            success: true,
            message: None,
        });
        if reply.success {
            if value {
                state.marked.insert(list);
            } else {
                state.marked.remove(&list);
            }
        }
        Ok(reply)
    }
}

impl PreferenceBackend for FakeBackend {
    async fn is_marked(&self, list: PreferenceList, _movie_id: u64) -> Result<bool, BackendError> {
        let (delay, failing, marked) = {
            let state = self.state.lock().unwrap();
            (
                state.status_delay,
                state.failing_status.contains(&list),
                state.marked.contains(&list),
            )
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if failing {
            Err(Self::unavailable())
        } else {
            Ok(marked)
        }
    }

    async fn add(
        &self,
        list: PreferenceList,
        entry: &PreferenceEntry,
    ) -> Result<BackendReply, BackendError> {
        self.log(BackendCall::Add(list, entry.movieid));
        let delay = self.state.lock().unwrap().add_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.reply(list, true)
    }

    async fn remove(
        &self,
        list: PreferenceList,
        movie_id: u64,
    ) -> Result<BackendReply, BackendError> {
        self.log(BackendCall::Remove(list, movie_id));
        self.reply(list, false)
    }
}
