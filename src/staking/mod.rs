//! Premium staking data: ETH2 validators and AdEx pools.

mod orchestrator;

pub use orchestrator::{PurgeModule, StakingOrchestrator};
