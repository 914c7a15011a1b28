//! The draw engine.
//!
//! [`Engine`] owns the catalog, the persisted draw state and the lifecycle
//! phase. The presentation layer holds the engine, forwards user intents
//! (draw, reset, media upload), advances time with [`Engine::tick`] and
//! renders [`Engine::snapshot`]. It never touches inventory or the drawn set
//! directly.
//!
//! Selection and the inventory update happen as soon as a draw is accepted;
//! the winner is only revealed once the spin and settle phases elapse.

use luckywheel_types::{
    validate_media, Catalog, Celebration, ConfigError, DrawError, DrawPhase, DrawResult,
    MediaError, MediaSlot, Reveal, Snapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error as ThisError;
use tracing::{debug, info};

use crate::{
    inventory,
    media::Media,
    persistence::{self, EngineState, Store},
    rotation::{RotationError, SpinGeometry, DEFAULT_POINTER_ANGLE, DEFAULT_REVOLUTIONS},
    scheduler::{DrawScheduler, PhaseConfig, TransitionResult},
    selector,
};

#[derive(Debug, ThisError)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Draw(#[from] DrawError),
    #[error(transparent)]
    Rotation(#[from] RotationError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error("invalid phase config: {0}")]
    Phases(&'static str),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Tunables that do not belong to the catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub phases: PhaseConfig,
    pub revolutions: u32,
    pub pointer_angle: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            phases: PhaseConfig::default(),
            revolutions: DEFAULT_REVOLUTIONS,
            pointer_angle: DEFAULT_POINTER_ANGLE,
        }
    }
}

/// Response to a draw request.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOutcome {
    /// Winner selected and committed; the wheel is spinning toward `rotation`.
    Started { result: DrawResult, rotation: f64 },
    /// A draw is already in flight.
    Ignored,
}

/// Build the engine RNG: seeded for reproducible runs, from entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

pub struct Engine<S: Store, R: Rng = ChaCha20Rng> {
    catalog: Catalog,
    scheduler: DrawScheduler,
    geometry: SpinGeometry,
    store: S,
    rng: R,

    state: EngineState,
    media: Media,
    phase: DrawPhase,
    rotation: f64,
    pending: Option<DrawResult>,
    last_reveal: Option<Reveal>,
}

impl<S: Store, R: Rng> Engine<S, R> {
    /// Restore from `store` (or start a new epoch) and commit.
    pub fn open(
        catalog: Catalog,
        config: EngineConfig,
        store: S,
        mut rng: R,
    ) -> Result<Self, EngineError> {
        config.phases.validate().map_err(EngineError::Phases)?;
        let geometry = SpinGeometry::new(catalog.segments())?
            .with_revolutions(config.revolutions)
            .with_pointer_angle(config.pointer_angle);

        let restored = persistence::restore(&store, &catalog, &mut rng)?;
        let media = Media::load(&store)?;

        let mut engine = Self {
            catalog,
            scheduler: DrawScheduler::new(config.phases),
            geometry,
            store,
            rng,
            state: restored.state,
            media,
            phase: DrawPhase::Idle,
            rotation: 0.0,
            pending: None,
            last_reveal: None,
        };
        engine.phase = engine.scheduler.after_reveal(engine.exhausted());
        engine.commit()?;

        info!(
            tickets = engine.catalog.ticket_count(),
            drawn = engine.state.drawn.len(),
            remaining = selector::remaining(&engine.state.inventory),
            new_epoch = restored.new_epoch,
            "engine ready"
        );
        Ok(engine)
    }

    /// Start a draw at `now_ms`.
    ///
    /// Requests while a draw is in flight are ignored. When nothing is left
    /// the request fails with [`DrawError::Exhausted`] and nothing changes.
    pub fn request_draw(&mut self, now_ms: u64) -> Result<DrawOutcome, EngineError> {
        if !self.scheduler.can_start(self.phase) {
            if self.phase.is_busy() {
                debug!(phase = ?self.phase, "draw in flight; ignoring request");
                return Ok(DrawOutcome::Ignored);
            }
            // Exhausted: selection below fails with the current counts.
        }

        let result = match selector::select(
            &self.catalog,
            &self.state.assignment,
            &self.state.drawn,
            &self.state.inventory,
            &mut self.rng,
        ) {
            Ok(result) => result,
            Err(err) => {
                info!(%err, "draw refused");
                self.phase = DrawPhase::Exhausted;
                return Err(err.into());
            }
        };
        let rotation = self.geometry.target(result.segment, self.rotation)?;

        let applied = inventory::apply(&result, &mut self.state.drawn, &mut self.state.inventory);
        // Selection only offers undrawn tickets.
        debug_assert!(applied, "selected ticket {} was already drawn", result.ticket);
        self.rotation = rotation;
        self.phase = self.scheduler.start(now_ms);
        self.pending = Some(result.clone());
        self.last_reveal = None;
        self.commit()?;

        debug!(
            ticket = result.ticket,
            tier = %result.tier,
            rotation,
            phase = ?self.phase,
            "draw started"
        );
        Ok(DrawOutcome::Started { result, rotation })
    }

    /// Advance timed phases. Returns the winner when the wheel comes to rest.
    pub fn tick(&mut self, now_ms: u64) -> Result<Option<Reveal>, EngineError> {
        match self.scheduler.check_transition(self.phase, now_ms) {
            TransitionResult::NoTransition => Ok(None),
            TransitionResult::Settle { ends_at_ms } => {
                self.phase = DrawPhase::Settling { ends_at_ms };
                debug!(ends_at_ms, "wheel settling");
                Ok(None)
            }
            TransitionResult::Reveal => {
                let reveal = self.pending.take().map(|result| self.reveal(&result));
                self.phase = self.scheduler.after_reveal(self.exhausted());
                self.last_reveal = reveal.clone();
                self.commit()?;
                if let Some(reveal) = &reveal {
                    info!(
                        ticket = reveal.ticket,
                        tier = %reveal.tier,
                        celebration = ?reveal.celebration,
                        phase = ?self.phase,
                        "winner revealed"
                    );
                }
                Ok(reveal)
            }
        }
    }

    /// Start a new epoch: fresh mapping, full inventory, empty drawn set.
    ///
    /// Drops any pending reveal and returns the wheel to rest at 0 degrees.
    pub fn request_reset(&mut self) -> Result<(), EngineError> {
        persistence::clear(&mut self.store)?;
        self.state = EngineState::fresh(&self.catalog, &mut self.rng)?;
        self.pending = None;
        self.last_reveal = None;
        self.rotation = 0.0;
        self.phase = self.scheduler.after_reveal(self.exhausted());
        self.commit()?;
        info!(tickets = self.catalog.ticket_count(), "draw state reset");
        Ok(())
    }

    /// Store a data URI in a media slot.
    pub fn set_media(&mut self, slot: MediaSlot, value: String) -> Result<(), EngineError> {
        validate_media(slot, &value)?;
        self.store.insert(slot.key(), value.clone())?;
        self.media.set(slot, value);
        info!(?slot, "media updated");
        Ok(())
    }

    /// Empty a media slot.
    pub fn clear_media(&mut self, slot: MediaSlot) -> Result<(), EngineError> {
        self.store.delete(&slot.key())?;
        self.media.unset(slot);
        info!(?slot, "media cleared");
        Ok(())
    }

    /// Wipe everything stored, media included, and start a new epoch.
    pub fn restore_defaults(&mut self) -> Result<(), EngineError> {
        Media::clear(&mut self.store)?;
        self.media = Media::default();
        self.request_reset()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tiers: self.state.inventory.clone(),
            drawn: self.state.drawn.clone(),
            assignment: self.state.assignment.clone(),
            phase: self.phase,
            rotation: self.rotation,
            last_reveal: self.last_reveal.clone(),
        }
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// When the current timed phase ends, if one is running.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.deadline(self.phase)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn media(&self) -> &Media {
        &self.media
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn exhausted(&self) -> bool {
        selector::ensure_available(
            &self.state.assignment,
            &self.state.drawn,
            &self.state.inventory,
        )
        .is_err()
    }

    fn reveal(&self, result: &DrawResult) -> Reveal {
        let name = self
            .catalog
            .get(result.tier)
            .map(|spec| spec.name.clone())
            .unwrap_or_else(|| result.tier.to_string());
        Reveal {
            ticket: result.ticket,
            tier: result.tier,
            name,
            celebration: Celebration::for_tier(result.tier),
            sound: self.media.sound_for(result.tier).map(str::to_string),
        }
    }

    fn commit(&mut self) -> Result<(), EngineError> {
        persistence::commit(&mut self.store, &self.state)?;
        Ok(())
    }
}
