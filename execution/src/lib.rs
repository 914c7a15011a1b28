//! Luckywheel draw engine.
//!
//! This crate contains the draw logic (`Engine`) and the pure pieces it is
//! built from: mapping generation, winner selection, inventory bookkeeping,
//! wheel geometry and the phase scheduler.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside the engine; callers pass `now_ms`.
//! - All randomness comes from the RNG handed to [`Engine::open`], so a
//!   seeded engine replays the same epoch.
//!
//! ## Storage invariants
//! Inventory, drawn set and mapping are written together after every state
//! change. A mapping is generated once per epoch and only replaced by a reset
//! or when the stored one no longer fits the catalog.
//!
//! ## Draw cycle (example)
//! ```rust,ignore
//! use luckywheel_execution::{Engine, EngineConfig, Memory, rng_from_seed};
//! use luckywheel_types::Catalog;
//!
//! let mut engine = Engine::open(
//!     Catalog::default(),
//!     EngineConfig::default(),
//!     Memory::default(),
//!     rng_from_seed(Some(7)),
//! )?;
//! engine.request_draw(0)?;
//! engine.tick(4_000)?; // settling
//! let reveal = engine.tick(4_800)?.expect("winner");
//! ```

pub mod assignment;
pub mod engine;
pub mod inventory;
pub mod media;
pub mod persistence;
pub mod rotation;
pub mod scheduler;
pub mod selector;


pub use engine::{rng_from_seed, DrawOutcome, Engine, EngineConfig, EngineError};
pub use media::Media;
#[cfg(any(test, feature = "mocks"))]
pub use persistence::Memory;
pub use persistence::{EngineState, Restored, Status, Store};
pub use rotation::{RotationError, SpinGeometry};
pub use scheduler::{DrawScheduler, PhaseConfig, TransitionResult};
