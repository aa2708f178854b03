use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::{broadcast, watch, RwLock};

use marquee_api::tmdb::ProviderError;
use marquee_api::traits::{MediaRecord, PreferenceEntry, PreferenceList};
use marquee_core::notice::Notice;
use marquee_core::view::{assemble, LoadedRecord, RecordSlot, UserPreferenceState, ViewModel};

use crate::error::ToggleError;

const NOTICE_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct DetailState {
    media_id: Option<u64>,
    /// Bumped on every navigation; results tagged with an older value are stale.
    generation: u64,
    slot: RecordSlot,
    preference: UserPreferenceState,
    preference_resolved: bool,
    /// Flags a confirmed mutation has set since the last navigation.
    confirmed: HashSet<PreferenceList>,
}

impl DetailState {
    fn view(&self) -> ViewModel {
        assemble(self.media_id, &self.slot, self.preference)
    }
}

/// What a click-style toggle needs to decide its direction.
#[derive(Debug)]
pub(crate) struct ToggleBase {
    pub entry: PreferenceEntry,
    pub current: bool,
}

/// Shared state of one detail session. Every mutation republishes a freshly
/// assembled view model while still holding the write lock, so subscribers
/// see changes in the order they were applied.
pub(crate) struct DetailStore {
    state: RwLock<DetailState>,
    view_tx: watch::Sender<Arc<ViewModel>>,
    notice_tx: broadcast::Sender<Notice>,
}

impl DetailStore {
    pub fn new() -> Self {
        let (view_tx, _) = watch::channel(Arc::new(ViewModel::empty()));
        let (notice_tx, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            state: RwLock::new(DetailState::default()),
            view_tx,
            notice_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewModel>> {
        self.view_tx.subscribe()
    }

    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }

    pub fn view(&self) -> Arc<ViewModel> {
        self.view_tx.borrow().clone()
    }

    pub fn notify(&self, notice: Notice) {
        // No subscribers is fine.
        let _ = self.notice_tx.send(notice);
    }

    fn publish(&self, state: &DetailState) {
        self.view_tx.send_replace(Arc::new(state.view()));
    }

    /// Switch to a new movie and return the generation its results must carry.
    pub async fn begin(&self, media_id: u64) -> u64 {
        let mut state = self.state.write().await;
        let generation = state.generation + 1;
        *state = DetailState {
            media_id: Some(media_id),
            generation,
            ..Default::default()
        };
        self.publish(&state);
        generation
    }

    /// Apply the record fetch result. Returns `false` if it was stale.
    pub async fn apply_record(
        &self,
        generation: u64,
        result: Result<MediaRecord, ProviderError>,
    ) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        state.slot = match result {
            Ok(record) => RecordSlot::Loaded(LoadedRecord::new(record)),
            Err(e) => {
                let message = e.to_string();
                self.notify(Notice::error(message.clone()));
                RecordSlot::Failed(message)
            }
        };
        self.publish(&state);
        true
    }

    /// Apply the status query result. Flags already confirmed by a toggle in
    /// this generation keep their confirmed value. Returns `false` if stale.
    pub async fn apply_user_state(&self, generation: u64, fetched: UserPreferenceState) -> bool {
        let mut state = self.state.write().await;
        if state.generation != generation {
            return false;
        }
        for &list in PreferenceList::ALL {
            if !state.confirmed.contains(&list) {
                state.preference.set(list, fetched.get(list));
            }
        }
        state.preference_resolved = true;
        self.publish(&state);
        true
    }

    /// Record a backend-confirmed flag change. Ignored when the session has
    /// since moved to another movie.
    pub async fn confirm(&self, movie_id: u64, list: PreferenceList, value: bool) -> bool {
        let mut state = self.state.write().await;
        if state.media_id != Some(movie_id) {
            return false;
        }
        state.preference.set(list, value);
        state.confirmed.insert(list);
        self.publish(&state);
        true
    }

    pub async fn toggle_base(&self, list: PreferenceList) -> Result<ToggleBase, ToggleError> {
        let state = self.state.read().await;
        let RecordSlot::Loaded(loaded) = &state.slot else {
            return Err(ToggleError::NoRecord);
        };
        if !state.preference_resolved && !state.confirmed.contains(&list) {
            return Err(ToggleError::NotReady(list));
        }
        Ok(ToggleBase {
            entry: PreferenceEntry::from_record(loaded.record()),
            current: state.preference.get(list),
        })
    }
}
