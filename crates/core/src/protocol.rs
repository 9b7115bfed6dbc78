//! Protocol timing constants and the runtime-tunable [`ProtocolConfig`].
//!
//! The constants are the contractual values; the config exists so tests and
//! deployments can tighten or relax them via environment variables.

use std::time::Duration;

/// How long a physical trigger has to confirm a pending request.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(60);

/// How long a barrier stays open before the safety closer forces it shut.
pub const BARRIER_CLOSE_DELAY: Duration = Duration::from_secs(5);

/// How long a paid ticket remains claimable at the exit gate.
pub const EXIT_CLAIM_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Collection holding tickets.
pub const TICKETS: &str = "tickets";
/// Collection holding parking spots.
pub const SPOTS: &str = "spots";
/// Collection holding the two barriers.
pub const BARRIERS: &str = "barriers";
/// Collection holding the single-slot pending markers.
pub const PENDING: &str = "pending";
/// Collection holding the lighting state document.
pub const LIGHTING: &str = "lighting";

/// Timing knobs for the coordination protocol.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Confirmation window for pending entry/exit requests.
    pub confirmation_window: Duration,
    /// Delay before the safety closer shuts an open barrier.
    pub barrier_close_delay: Duration,
    /// Validity window for claiming a paid ticket at the exit gate.
    pub exit_claim_window: Duration,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            confirmation_window: CONFIRMATION_WINDOW,
            barrier_close_delay: BARRIER_CLOSE_DELAY,
            exit_claim_window: EXIT_CLAIM_WINDOW,
        }
    }
}

impl ProtocolConfig {
    /// Load timing overrides from environment variables.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `CONFIRMATION_WINDOW_SECS` | `60`    |
    /// | `BARRIER_CLOSE_DELAY_SECS` | `5`     |
    /// | `EXIT_CLAIM_WINDOW_SECS`   | `900`   |
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            confirmation_window: env_secs("CONFIRMATION_WINDOW_SECS")
                .unwrap_or(defaults.confirmation_window),
            barrier_close_delay: env_secs("BARRIER_CLOSE_DELAY_SECS")
                .unwrap_or(defaults.barrier_close_delay),
            exit_claim_window: env_secs("EXIT_CLAIM_WINDOW_SECS")
                .unwrap_or(defaults.exit_claim_window),
        }
    }
}

fn env_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
}
