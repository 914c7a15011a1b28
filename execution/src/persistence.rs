//! Persistence adapter.
//!
//! Engine state is stored as JSON strings under the well-known [`Key`]s. All
//! writes go through [`commit`], which writes inventory, drawn set and
//! mapping in a single [`Store::apply`] batch.

use anyhow::{Context as _, Result};
use luckywheel_types::{Catalog, DrawnSet, Key, PrizeTier, TicketAssignment};
use rand::Rng;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

#[cfg(any(test, feature = "mocks"))]
use std::collections::HashMap;

use crate::{assignment, inventory};

/// Durable key-value storage.
pub trait Store {
    fn get(&self, key: &Key) -> Result<Option<String>>;
    fn insert(&mut self, key: Key, value: String) -> Result<()>;
    fn delete(&mut self, key: &Key) -> Result<()>;

    /// Apply a batch of changes. Implementations backed by real storage
    /// should make the batch atomic.
    fn apply(&mut self, changes: Vec<(Key, Status)>) -> Result<()> {
        for (key, status) in changes {
            match status {
                Status::Update(value) => self.insert(key, value)?,
                Status::Delete => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

#[cfg(any(test, feature = "mocks"))]
#[derive(Clone, Debug, Default)]
pub struct Memory {
    state: HashMap<Key, String>,
}

#[cfg(any(test, feature = "mocks"))]
impl Store for Memory {
    fn get(&self, key: &Key) -> Result<Option<String>> {
        Ok(self.state.get(key).cloned())
    }

    fn insert(&mut self, key: Key, value: String) -> Result<()> {
        self.state.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &Key) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Update(String),
    Delete,
}

/// Everything the engine persists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineState {
    pub inventory: Vec<PrizeTier>,
    pub drawn: DrawnSet,
    pub assignment: TicketAssignment,
}

impl EngineState {
    /// Start a new epoch: fresh mapping, full inventory, nothing drawn.
    pub fn fresh<R: Rng + ?Sized>(catalog: &Catalog, rng: &mut R) -> Result<Self> {
        let assignment = assignment::generate(catalog, rng).context("generate ticket mapping")?;
        Ok(Self {
            inventory: catalog.initial_inventory(),
            drawn: DrawnSet::new(),
            assignment,
        })
    }
}

/// Outcome of [`restore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restored {
    pub state: EngineState,
    /// No usable mapping was stored, so a new epoch began.
    pub new_epoch: bool,
}

/// Load engine state, regenerating the mapping only if none usable is stored.
pub fn restore<S, R>(store: &S, catalog: &Catalog, rng: &mut R) -> Result<Restored>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    let assignment = read::<TicketAssignment, _>(store, Key::AssignedNumbers)?.filter(|stored| {
        match stored.validate(catalog) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "stored ticket mapping does not fit the catalog");
                false
            }
        }
    });
    let Some(assignment) = assignment else {
        info!(
            tickets = catalog.ticket_count(),
            "no ticket mapping stored; starting new epoch"
        );
        return Ok(Restored {
            state: EngineState::fresh(catalog, rng)?,
            new_epoch: true,
        });
    };

    let stored_drawn = read::<DrawnSet, _>(store, Key::DrawnNumbers)?;
    let has_drawn = stored_drawn.is_some();
    let mut drawn = stored_drawn.unwrap_or_default();
    if !drawn.within(catalog.ticket_count()) {
        warn!(
            tickets = catalog.ticket_count(),
            "stored drawn numbers fall outside the ticket range; dropping them"
        );
        drawn = drawn
            .iter()
            .filter(|number| (1..=catalog.ticket_count()).contains(number))
            .collect::<Vec<_>>()
            .into();
    }

    // The mapping plus the drawn set determine the inventory. A stored
    // inventory is kept only when it fits the catalog and was written
    // alongside the drawn set.
    let rebuilt = inventory::rebuild(catalog, &assignment, &drawn);
    let inventory = match read::<Vec<PrizeTier>, _>(store, Key::Prizes)? {
        Some(stored) if has_drawn && catalog.matches_inventory(&stored) => {
            if stored != rebuilt {
                warn!("stored inventory disagrees with the drawn tickets; keeping it");
            }
            stored
        }
        Some(_) if has_drawn => {
            warn!("stored inventory does not match the catalog; rebuilding it");
            rebuilt
        }
        Some(_) => {
            warn!("inventory stored without drawn numbers; rebuilding it");
            rebuilt
        }
        None => {
            if has_drawn {
                warn!("drawn numbers stored without inventory; rebuilding it");
            }
            rebuilt
        }
    };

    Ok(Restored {
        state: EngineState {
            inventory,
            drawn,
            assignment,
        },
        new_epoch: false,
    })
}

/// Write the full engine state in one batch.
pub fn commit<S: Store + ?Sized>(store: &mut S, state: &EngineState) -> Result<()> {
    let prizes = serde_json::to_string(&state.inventory).context("encode prizes")?;
    let drawn = serde_json::to_string(&state.drawn).context("encode drawn numbers")?;
    let assigned = serde_json::to_string(&state.assignment).context("encode ticket mapping")?;
    store
        .apply(vec![
            (Key::Prizes, Status::Update(prizes)),
            (Key::DrawnNumbers, Status::Update(drawn)),
            (Key::AssignedNumbers, Status::Update(assigned)),
        ])
        .context("commit engine state")
}

/// Remove all engine state (media is kept).
pub fn clear<S: Store + ?Sized>(store: &mut S) -> Result<()> {
    store
        .apply(Key::ENGINE.into_iter().map(|key| (key, Status::Delete)).collect())
        .context("clear engine state")
}

/// Read and decode a JSON value. Unreadable values count as absent.
pub(crate) fn read<T, S>(store: &S, key: Key) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    let Some(raw) = store.get(&key).with_context(|| format!("read {key}"))? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(%key, %err, "discarding unreadable stored value");
            Ok(None)
        }
    }
}
