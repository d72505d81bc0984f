//! Client-side cache of fetched history and the loading status of each section.

mod container;
mod mutations;
mod state;
mod status;

pub use container::{Store, StoreObserver, TracingObserver};
pub use mutations::Mutation;
pub use state::*;
pub use status::{FetchGuard, Section, Status, StatusTracker};
