//! Drives an [`Engine`] in real time.
//!
//! The engine itself never reads a clock; the session owns a monotonic
//! origin, feeds `now_ms` into the engine and sleeps until each phase
//! deadline.

use luckywheel_execution::{DrawOutcome, Engine, EngineError, Store};
use luckywheel_types::Reveal;
use tokio::time::{sleep_until, Duration, Instant};
use tracing::debug;

pub struct Session<S: Store> {
    engine: Engine<S>,
    origin: Instant,
}

impl<S: Store> Session<S> {
    pub fn new(engine: Engine<S>) -> Self {
        Self {
            engine,
            origin: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Run one draw through spin and settle.
    ///
    /// Returns `None` if the engine was already busy.
    pub async fn draw(&mut self) -> Result<Option<Reveal>, EngineError> {
        if let DrawOutcome::Ignored = self.engine.request_draw(self.now_ms())? {
            return Ok(None);
        }
        while let Some(deadline) = self.engine.next_deadline() {
            sleep_until(self.origin + Duration::from_millis(deadline)).await;
            if let Some(reveal) = self.engine.tick(self.now_ms())? {
                return Ok(Some(reveal));
            }
            debug!(phase = ?self.engine.phase(), "phase deadline reached");
        }
        Ok(None)
    }

    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<S> {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine<S> {
        self.engine
    }
}
