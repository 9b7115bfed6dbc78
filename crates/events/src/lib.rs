//! Parkgate change-notification infrastructure.
//!
//! The reactive half of the coordination protocol is driven entirely by
//! document writes. This crate provides:
//!
//! - [`ChangeEvent`] -- the canonical before/after envelope published for
//!   every committed store mutation.
//! - [`ChangeBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.

pub mod bus;
pub mod change;

pub use bus::ChangeBus;
pub use change::ChangeEvent;
