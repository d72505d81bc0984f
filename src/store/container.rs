use super::mutations::Mutation;
use super::state::AppState;
use super::status::{FetchGuard, Section, Status};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;
use tracing::debug;

/// Receives every mutation the store applies.
///
/// Observers run while the store is read-locked: they may read through the given state
/// but must not commit from inside `on_commit`.
pub trait StoreObserver: Send + Sync {
    fn on_commit(&self, mutation: &Mutation, state: &AppState);

    /// Get the name of this observer for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Logs each applied mutation at debug level.
pub struct TracingObserver;

impl StoreObserver for TracingObserver {
    fn on_commit(&self, mutation: &Mutation, _state: &AppState) {
        debug!("Store commit: {}", mutation.name());
    }

    fn name(&self) -> &'static str {
        "tracing"
    }
}

/// Single-writer state container.
///
/// All writes are serialized through `commit`/`commit_with`. Observers are told about a
/// mutation after it is applied, in registration order, and only if it changed the state.
#[derive(Default)]
pub struct Store {
    state: RwLock<AppState>,
    observers: RwLock<Vec<Arc<dyn StoreObserver>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(state),
            observers: RwLock::new(Vec::new()),
        }
    }

    pub fn register_observer(&self, observer: Arc<dyn StoreObserver>) {
        debug!("Registering store observer {}", observer.name());
        self.observers.write().push(observer);
    }

    /// Apply a mutation. Returns whether the state changed.
    pub fn commit(&self, mutation: Mutation) -> bool {
        self.commit_with(|_| mutation)
    }

    /// Build a mutation from the current state and apply it under the same write lock,
    /// so the read and the write cannot interleave with another commit.
    pub fn commit_with<F>(&self, build: F) -> bool
    where
        F: FnOnce(&AppState) -> Mutation,
    {
        let state = self.state.write();
        let mutation = build(&state);
        self.apply(state, &mutation)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, AppState> {
        self.state.read()
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn status(&self, section: Section) -> Status {
        self.state.read().statuses.status(section)
    }

    pub fn set_status(&self, section: Section, status: Status) {
        self.commit(Mutation::SetStatus { section, status });
    }

    /// Check the guard for `section` and, if the fetch may proceed, move the section to
    /// `Refreshing` or `Loading`. Check and transition happen under one write lock.
    ///
    /// Returns false if the fetch must be skipped.
    pub fn begin_fetch(&self, section: Section, refresh: bool, guard: FetchGuard) -> bool {
        self.try_transition(section, |current| {
            (!guard.blocks(current, refresh)).then_some(Status::starting(refresh))
        })
        .is_some()
    }

    /// Let `decide` pick the next status of `section` from its current one, atomically.
    ///
    /// Returns the status the section had before, or `None` if `decide` declined.
    pub fn try_transition<F>(&self, section: Section, decide: F) -> Option<Status>
    where
        F: FnOnce(Status) -> Option<Status>,
    {
        let state = self.state.write();
        let current = state.statuses.status(section);
        let Some(next) = decide(current) else {
            debug!("Skipping {:?} fetch, status is {:?}", section, current);
            return None;
        };
        self.apply(state, &Mutation::SetStatus { section, status: next });
        Some(current)
    }

    fn apply(&self, mut state: RwLockWriteGuard<'_, AppState>, mutation: &Mutation) -> bool {
        if !mutation.apply(&mut state) {
            return false;
        }
        let state = RwLockWriteGuard::downgrade(state);
        for observer in self.observers.read().iter() {
            observer.on_commit(mutation, &state);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HistoricData;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<&'static str>>,
    }

    impl StoreObserver for Recorder {
        fn on_commit(&self, mutation: &Mutation, _state: &AppState) {
            self.seen.lock().push(mutation.name());
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[test]
    fn unchanged_status_is_not_published() {
        let store = Store::new();
        let recorder = Arc::new(Recorder::default());
        store.register_observer(recorder.clone());

        store.set_status(Section::Trades, Status::Loading);
        store.set_status(Section::Trades, Status::Loading);
        store.commit(Mutation::SetTrades(HistoricData::default()));

        assert_eq!(*recorder.seen.lock(), vec!["SET_STATUS", "SET_TRADES"]);
    }

    #[test]
    fn begin_fetch_claims_section_once() {
        let store = Store::new();

        assert!(store.begin_fetch(Section::Trades, false, FetchGuard::History));
        assert_eq!(store.status(Section::Trades), Status::Loading);
        assert!(!store.begin_fetch(Section::Trades, false, FetchGuard::History));
        assert!(!store.begin_fetch(Section::Trades, true, FetchGuard::History));
    }

    #[test]
    fn begin_fetch_refreshes_loaded_section() {
        let store = Store::new();
        store.set_status(Section::StakingAdex, Status::Loaded);

        assert!(!store.begin_fetch(Section::StakingAdex, false, FetchGuard::Staking));
        assert!(store.begin_fetch(Section::StakingAdex, true, FetchGuard::Staking));
        assert_eq!(store.status(Section::StakingAdex), Status::Refreshing);
        assert!(!store.begin_fetch(Section::StakingAdex, true, FetchGuard::Staking));
    }

    #[test]
    fn commit_with_sees_current_state() {
        let store = Store::new();
        store.commit(Mutation::SetPremium(true));

        store.commit_with(|state| {
            Mutation::SetEthAddresses(vec![format!("premium={}", state.session.premium)])
        });

        assert_eq!(
            store.read().session.eth_addresses,
            vec!["premium=true".to_string()]
        );
    }
}
