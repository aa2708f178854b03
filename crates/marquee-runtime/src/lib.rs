//! Async orchestration of the movie detail view.
//!
//! [`DetailSession`] owns the only mutable state: which movie is shown, its
//! record, and the user's flags for it. Presentation layers subscribe to
//! immutable [`ViewModel`](marquee_core::view::ViewModel) snapshots and to a
//! stream of [`Notice`](marquee_core::notice::Notice)s.

mod error;
mod session;
mod store;
mod toggle;
mod user_state;

#[cfg(test)]
mod testing;

pub use error::{ToggleError, UserStateError};
pub use session::DetailSession;
pub use toggle::ToggleController;
pub use user_state::{fetch_user_state, UserStateReport};
