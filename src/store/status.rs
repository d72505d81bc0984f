//! Per-section loading status.
//!
//! Every data category the orchestrators fetch has a [`Section`] whose [`Status`] tells
//! the UI (and the orchestrators themselves) whether data is absent, on its way, or in.
//! The status is the guard that keeps a second fetch of a category from starting while
//! one is in flight.

use std::collections::HashMap;

/// Logical data categories tracked by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Trades,
    AssetMovement,
    LedgerActions,
    Tx,
    StakingEth2,
    StakingEth2Deposits,
    StakingAdex,
    StakingAdexHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    None,
    Loading,
    PartiallyLoaded,
    Refreshing,
    Loaded,
}

impl Status {
    /// Any state in which a fetch is under way.
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Status::Loading | Status::PartiallyLoaded | Status::Refreshing
        )
    }

    /// Status a fetch starts with.
    pub fn starting(refresh: bool) -> Status {
        if refresh {
            Status::Refreshing
        } else {
            Status::Loading
        }
    }
}

/// Which skip rule applies before a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchGuard {
    /// Skip while loading or partially loaded; a refresh may overlap a running refresh.
    History,
    /// Skip in any loading state.
    Staking,
}

impl FetchGuard {
    /// Whether a fetch must be skipped given the section's current status.
    pub fn blocks(self, current: Status, refresh: bool) -> bool {
        let busy = match self {
            FetchGuard::History => {
                matches!(current, Status::Loading | Status::PartiallyLoaded)
            }
            FetchGuard::Staking => current.is_loading(),
        };
        busy || (current == Status::Loaded && !refresh)
    }
}

/// Status of every section. Sections are independent of each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusTracker {
    statuses: HashMap<Section, Status>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, section: Section) -> Status {
        self.statuses.get(&section).copied().unwrap_or_default()
    }

    /// Set a section's status. Returns false, changing nothing, if it already had it.
    pub fn set(&mut self, section: Section, status: Status) -> bool {
        if self.status(section) == status {
            return false;
        }
        self.statuses.insert(section, status);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_start_unfetched() {
        let tracker = StatusTracker::new();
        assert_eq!(tracker.status(Section::Trades), Status::None);
        assert_eq!(tracker.status(Section::Tx), Status::None);
    }

    #[test]
    fn set_reports_only_real_changes() {
        let mut tracker = StatusTracker::new();
        assert!(tracker.set(Section::Trades, Status::Loading));
        assert!(!tracker.set(Section::Trades, Status::Loading));
        assert!(!tracker.set(Section::AssetMovement, Status::None));
        assert_eq!(tracker.status(Section::Trades), Status::Loading);
        assert_eq!(tracker.status(Section::AssetMovement), Status::None);
    }

    #[test]
    fn history_guard() {
        let guard = FetchGuard::History;
        assert!(!guard.blocks(Status::None, false));
        assert!(guard.blocks(Status::Loading, true));
        assert!(guard.blocks(Status::PartiallyLoaded, true));
        assert!(!guard.blocks(Status::Refreshing, false));
        assert!(guard.blocks(Status::Loaded, false));
        assert!(!guard.blocks(Status::Loaded, true));
    }

    #[test]
    fn staking_guard_also_blocks_refreshing() {
        let guard = FetchGuard::Staking;
        assert!(guard.blocks(Status::Refreshing, true));
        assert!(guard.blocks(Status::Loaded, false));
        assert!(!guard.blocks(Status::Loaded, true));
        assert!(!guard.blocks(Status::None, false));
    }
}
