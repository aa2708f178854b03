use marquee_api::traits::{PreferenceBackend, PreferenceList};
use marquee_core::view::UserPreferenceState;

use crate::error::UserStateError;

/// Result of the two status queries. Failed queries leave their flag false.
#[derive(Debug, Default)]
pub struct UserStateReport {
    pub state: UserPreferenceState,
    pub errors: Vec<UserStateError>,
}

/// Ask the backend whether `movie_id` is a favorite and whether it is on the
/// watch-later list. Both queries run concurrently and fail independently.
pub async fn fetch_user_state<B: PreferenceBackend>(backend: &B, movie_id: u64) -> UserStateReport {
    let (favorite, watch_later) = tokio::join!(
        backend.is_marked(PreferenceList::Favorite, movie_id),
        backend.is_marked(PreferenceList::WatchLater, movie_id),
    );

    let mut report = UserStateReport::default();
    for (list, result) in [
        (PreferenceList::Favorite, favorite),
        (PreferenceList::WatchLater, watch_later),
    ] {
        match result {
            Ok(marked) => report.state.set(list, marked),
            Err(source) => {
                tracing::warn!(movie_id, %list, error = %source, "Status query failed, assuming unmarked");
                report.errors.push(UserStateError { list, source });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn test_both_flags_set() {
        let backend = FakeBackend::default();
        backend.mark(PreferenceList::Favorite, true);
        backend.mark(PreferenceList::WatchLater, true);

        let report = fetch_user_state(&backend, 42).await;
        assert!(report.state.is_favorite);
        assert!(report.state.is_watch_later);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_other() {
        let backend = FakeBackend::default();
        backend.mark(PreferenceList::WatchLater, true);
        backend.fail_status(PreferenceList::Favorite);

        let report = fetch_user_state(&backend, 42).await;
        assert!(!report.state.is_favorite);
        assert!(report.state.is_watch_later);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].list, PreferenceList::Favorite);
    }

    #[tokio::test]
    async fn test_all_failures_default_to_false() {
        let backend = FakeBackend::default();
        backend.fail_status(PreferenceList::Favorite);
        backend.fail_status(PreferenceList::WatchLater);

        let report = fetch_user_state(&backend, 42).await;
        assert_eq!(report.state, UserPreferenceState::default());
        assert_eq!(report.errors.len(), 2);
    }
}
