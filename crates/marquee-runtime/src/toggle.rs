//! Favorite / watch-later mutations.
//!
//! The local flag only changes after the backend confirms, and calls for the
//! same list are queued behind each other so their responses cannot land out
//! of order. Favorite and watch-later have separate queues.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use marquee_api::traits::{BackendReply, PreferenceBackend, PreferenceEntry, PreferenceList};
use marquee_core::notice::Notice;

use crate::error::ToggleError;
use crate::store::DetailStore;

/// Requested end state of a flag.
#[derive(Debug)]
enum Change {
    Enable(PreferenceEntry),
    Disable(u64),
}

impl Change {
    fn movie_id(&self) -> u64 {
        match self {
            Self::Enable(entry) => entry.movieid,
            Self::Disable(id) => *id,
        }
    }

    fn target(&self) -> bool {
        matches!(self, Self::Enable(_))
    }
}

pub struct ToggleController<B> {
    backend: Arc<B>,
    store: Arc<DetailStore>,
    // tokio's mutex is fair, so queued calls run in the order they arrived.
    favorite: Mutex<()>,
    watch_later: Mutex<()>,
}

impl<B: PreferenceBackend> ToggleController<B> {
    pub(crate) fn new(backend: Arc<B>, store: Arc<DetailStore>) -> Self {
        Self {
            backend,
            store,
            favorite: Mutex::new(()),
            watch_later: Mutex::new(()),
        }
    }

    pub async fn enable_favorite(&self, entry: PreferenceEntry) -> Result<(), ToggleError> {
        self.set(PreferenceList::Favorite, Change::Enable(entry)).await
    }

    pub async fn disable_favorite(&self, movie_id: u64) -> Result<(), ToggleError> {
        self.set(PreferenceList::Favorite, Change::Disable(movie_id)).await
    }

    pub async fn enable_watch_later(&self, entry: PreferenceEntry) -> Result<(), ToggleError> {
        self.set(PreferenceList::WatchLater, Change::Enable(entry)).await
    }

    pub async fn disable_watch_later(&self, movie_id: u64) -> Result<(), ToggleError> {
        self.set(PreferenceList::WatchLater, Change::Disable(movie_id)).await
    }

    /// Flip `list` for the movie on screen, as a click on its button would.
    /// Returns the new value.
    ///
    /// The direction is decided only once this call reaches the front of the
    /// list's queue, so two quick clicks add and then remove.
    pub async fn toggle(&self, list: PreferenceList) -> Result<bool, ToggleError> {
        let _turn = self.queue(list).lock().await;

        let base = match self.store.toggle_base(list).await {
            Ok(base) => base,
            Err(e) => {
                self.store.notify(match &e {
                    ToggleError::NotReady(_) => {
                        Notice::info("Still checking your lists, try again in a moment")
                    }
                    _ => Notice::error(e.to_string()),
                });
                return Err(e);
            }
        };

        let change = if base.current {
            Change::Disable(base.entry.movieid)
        } else {
            Change::Enable(base.entry)
        };
        let target = change.target();
        self.run(list, change).await?;
        Ok(target)
    }

    fn queue(&self, list: PreferenceList) -> &Mutex<()> {
        match list {
            PreferenceList::Favorite => &self.favorite,
            PreferenceList::WatchLater => &self.watch_later,
        }
    }

    async fn set(&self, list: PreferenceList, change: Change) -> Result<(), ToggleError> {
        let _turn = self.queue(list).lock().await;
        self.run(list, change).await
    }

    /// Send one mutation and apply it if confirmed. Caller holds the queue.
    async fn run(&self, list: PreferenceList, change: Change) -> Result<(), ToggleError> {
        let movie_id = change.movie_id();
        let target = change.target();

        let result = match &change {
            Change::Enable(entry) => self.backend.add(list, entry).await,
            Change::Disable(id) => self.backend.remove(list, *id).await,
        };

        let outcome = match result {
            Ok(reply) if reply.success => Ok(reply),
            Ok(reply) => Err(ToggleError::Rejected {
                list,
                message: reply
                    .message
                    .unwrap_or_else(|| "request was not accepted".into()),
            }),
            Err(source) => Err(ToggleError::Backend { list, source }),
        };

        match outcome {
            Ok(reply) => {
                if self.store.confirm(movie_id, list, target).await {
                    info!(movie_id, %list, value = target, "Preference updated");
                } else {
                    debug!(movie_id, %list, "Confirmed change for a movie no longer shown");
                }
                self.store
                    .notify(Notice::success(success_message(list, target, &reply)));
                Ok(())
            }
            Err(e) => {
                warn!(movie_id, %list, error = %e, "Preference change failed");
                self.store.notify(Notice::error(failure_message(list, target, &e)));
                Err(e)
            }
        }
    }
}

fn success_message(list: PreferenceList, enabled: bool, reply: &BackendReply) -> String {
    match (list, enabled) {
        (PreferenceList::Favorite, true) => "Added to favorites".into(),
        (PreferenceList::Favorite, false) => "Removed from Favorites".into(),
        (PreferenceList::WatchLater, true) => reply
            .message
            .clone()
            .unwrap_or_else(|| "Added to watch later".into()),
        (PreferenceList::WatchLater, false) => reply
            .message
            .clone()
            .unwrap_or_else(|| "Removed from watch later".into()),
    }
}

fn failure_message(list: PreferenceList, enabled: bool, error: &ToggleError) -> String {
    let action = if enabled { "add to" } else { "remove from" };
    match error {
        ToggleError::Rejected { message, .. } => format!("Could not {action} {list}: {message}"),
        _ => format!("Could not {action} {list}"),
    }
}
