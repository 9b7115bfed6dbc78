//! Reactive rules.
//!
//! Long-running consumers of the store's change stream plus two scheduled
//! jobs. Each is an async function intended to be spawned via
//! `tokio::spawn`; the change consumers exit when the bus closes, the
//! interval jobs accept a `CancellationToken` for graceful shutdown.
//!
//! The consumers react solely to their own trigger condition and make no
//! assumption about the relative order of ticket and barrier writes.

pub mod barrier_closer;
pub mod consistency;
pub mod lighting;
pub mod retry;
pub mod sweeper;

pub use barrier_closer::BarrierCloser;
pub use consistency::ConsistencyTrigger;
pub use lighting::LightingSchedule;
pub use sweeper::MarkerSweeper;
