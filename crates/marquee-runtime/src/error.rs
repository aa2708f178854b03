use marquee_api::backend::BackendError;
use marquee_api::traits::PreferenceList;

/// A favorite / watch-later mutation that did not go through. The flag is
/// left as it was.
#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("{list} request failed: {source}")]
    Backend {
        list: PreferenceList,
        source: BackendError,
    },
    #[error("backend rejected {list} change: {message}")]
    Rejected {
        list: PreferenceList,
        message: String,
    },
    #[error("no movie loaded")]
    NoRecord,
    #[error("{0} status is not known yet")]
    NotReady(PreferenceList),
}

/// One of the status queries failed. Logged, never shown.
#[derive(Debug, thiserror::Error)]
#[error("{list} status query failed: {source}")]
pub struct UserStateError {
    pub list: PreferenceList,
    pub source: BackendError,
}
