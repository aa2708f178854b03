use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use marquee_api::traits::{MetadataProvider, PreferenceBackend};
use marquee_core::notice::Notice;
use marquee_core::view::ViewModel;

use crate::store::DetailStore;
use crate::toggle::ToggleController;
use crate::user_state::fetch_user_state;

struct Inner<P, B> {
    provider: P,
    backend: Arc<B>,
    store: Arc<DetailStore>,
    toggles: ToggleController<B>,
}

/// The detail view of one movie at a time.
///
/// Cloning is cheap; clones share the same state, so a navigation started from
/// one clone and a toggle issued from another see each other's effects.
pub struct DetailSession<P, B> {
    inner: Arc<Inner<P, B>>,
}

impl<P, B> Clone for DetailSession<P, B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: MetadataProvider, B: PreferenceBackend> DetailSession<P, B> {
    pub fn new(provider: P, backend: B) -> Self {
        let backend = Arc::new(backend);
        let store = Arc::new(DetailStore::new());
        let toggles = ToggleController::new(Arc::clone(&backend), Arc::clone(&store));
        Self {
            inner: Arc::new(Inner {
                provider,
                backend,
                store,
                toggles,
            }),
        }
    }

    /// Latest view model.
    pub fn view(&self) -> Arc<ViewModel> {
        self.inner.store.view()
    }

    /// Receive every new view model as it is assembled.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewModel>> {
        self.inner.store.subscribe()
    }

    /// Receive user-visible notices (toggle outcomes, load failures).
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.inner.store.subscribe_notices()
    }

    pub fn toggles(&self) -> &ToggleController<B> {
        &self.inner.toggles
    }

    /// Show `movie_id`: fetch its record and the user's flags concurrently and
    /// publish each as it arrives.
    ///
    /// Resolves once both fetches are done. If another navigation starts in
    /// the meantime, whatever this one still receives is dropped.
    pub async fn navigate(&self, movie_id: u64) {
        let store = &self.inner.store;
        let generation = store.begin(movie_id).await;
        info!(movie_id, generation, "Loading movie");

        let load_record = async {
            let result = self.inner.provider.fetch_movie(movie_id).await;
            if let Err(e) = &result {
                warn!(movie_id, error = %e, "Failed to load movie");
            }
            if !store.apply_record(generation, result).await {
                debug!(movie_id, generation, "Discarding stale movie record");
            }
        };

        let load_user_state = async {
            let report = fetch_user_state(self.inner.backend.as_ref(), movie_id).await;
            if !store.apply_user_state(generation, report.state).await {
                debug!(movie_id, generation, "Discarding stale user status");
            }
        };

        tokio::join!(load_record, load_user_state);
    }
}
