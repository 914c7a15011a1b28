//! Common types used throughout luckywheel.
//!
//! The prize catalog, the per-epoch ticket mapping, the drawn set, and the
//! snapshot handed to the presentation layer. Everything persisted is
//! serialized as JSON under the keys in [`storage::Key`].

pub mod catalog;
pub mod draw;
pub mod storage;

pub use catalog::{Catalog, ConfigError, PrizeTier, TierId, TierSpec, DEFAULT_TICKET_COUNT};
pub use draw::{
    Assignment, AssignmentError, Celebration, ConsistencyFault, DrawError, DrawPhase, DrawResult,
    DrawnSet, Reveal, Snapshot, TicketAssignment,
};
pub use storage::{validate_media, Key, MediaError, MediaSlot};
