//! Draw lifecycle state machine.
//!
//! Pure phase logic, separate from the engine's state and storage.
//!
//! ## Phases
//!
//! 1. **Idle** - waiting for a draw request
//! 2. **Spinning** - winner selected and committed, wheel turning
//! 3. **Settling** - wheel slowing onto the winning segment
//! 4. **Idle** again once the winner is revealed, or **Exhausted** when
//!    nothing is left to draw
//!
//! Only Idle accepts a draw. Requests during Spinning or Settling are
//! dropped, so at most one draw is in flight.
//!
//! ## Clock
//!
//! Time is a caller-supplied millisecond counter (`now_ms`). The scheduler
//! never reads the wall clock.
//!
//! ```rust,ignore
//! use luckywheel_execution::scheduler::{DrawScheduler, PhaseConfig};
//!
//! let scheduler = DrawScheduler::new(PhaseConfig::default());
//! let phase = scheduler.start(1_000);
//! assert_eq!(phase, DrawPhase::Spinning { ends_at_ms: 5_000 });
//! ```

use luckywheel_types::DrawPhase;

/// Spin duration of the original wheel animation.
pub const DEFAULT_SPIN_MS: u64 = 4_000;

/// Ease-out after the spin.
pub const DEFAULT_SETTLE_MS: u64 = 800;

/// Phase durations in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseConfig {
    pub spin_ms: u64,
    pub settle_ms: u64,
}

impl PhaseConfig {
    pub fn new(spin_ms: u64, settle_ms: u64) -> Self {
        Self { spin_ms, settle_ms }
    }

    /// Validate the configuration (all durations must be > 0).
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.spin_ms == 0 {
            return Err("spin_ms must be greater than zero");
        }
        if self.settle_ms == 0 {
            return Err("settle_ms must be greater than zero");
        }
        Ok(())
    }

    /// Time from request to reveal.
    pub fn total_draw_duration_ms(&self) -> u64 {
        self.spin_ms.saturating_add(self.settle_ms)
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SPIN_MS, DEFAULT_SETTLE_MS)
    }
}

/// Result of a phase transition check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    /// No transition needed, remain in current phase.
    NoTransition,
    /// Spin finished; wheel is settling.
    Settle { ends_at_ms: u64 },
    /// Wheel at rest; the pending winner should be revealed.
    Reveal,
}

/// Pure state machine for the draw lifecycle.
#[derive(Clone, Debug)]
pub struct DrawScheduler {
    config: PhaseConfig,
}

impl DrawScheduler {
    pub fn new(config: PhaseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    /// Check if a draw request would be accepted.
    pub fn can_start(&self, phase: DrawPhase) -> bool {
        matches!(phase, DrawPhase::Idle)
    }

    /// Phase entered when a draw is accepted at `now_ms`.
    pub fn start(&self, now_ms: u64) -> DrawPhase {
        DrawPhase::Spinning {
            ends_at_ms: now_ms.saturating_add(self.config.spin_ms),
        }
    }

    /// Check if a timed transition is due.
    pub fn check_transition(&self, phase: DrawPhase, now_ms: u64) -> TransitionResult {
        match phase {
            DrawPhase::Spinning { ends_at_ms } if now_ms >= ends_at_ms => {
                TransitionResult::Settle {
                    ends_at_ms: now_ms.saturating_add(self.config.settle_ms),
                }
            }
            DrawPhase::Settling { ends_at_ms } if now_ms >= ends_at_ms => TransitionResult::Reveal,
            _ => TransitionResult::NoTransition,
        }
    }

    /// Deadline of the current timed phase, if any.
    pub fn deadline(&self, phase: DrawPhase) -> Option<u64> {
        match phase {
            DrawPhase::Spinning { ends_at_ms } | DrawPhase::Settling { ends_at_ms } => {
                Some(ends_at_ms)
            }
            DrawPhase::Idle | DrawPhase::Exhausted => None,
        }
    }

    /// Resting phase after a reveal.
    pub fn after_reveal(&self, exhausted: bool) -> DrawPhase {
        if exhausted {
            DrawPhase::Exhausted
        } else {
            DrawPhase::Idle
        }
    }
}
