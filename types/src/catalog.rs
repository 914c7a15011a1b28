//! Prize catalog: the tiers on the wheel and the ticket range they cover.
//!
//! The catalog order is the wheel's segment layout. Segment `i` is the
//! `i`-th tier, starting at 0 degrees and proceeding clockwise.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

/// Number of tickets in the default raffle.
pub const DEFAULT_TICKET_COUNT: u32 = 80;

/// Identifier of a prize tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TierId {
    First,
    Second,
    Third,
    Surprise,
}

impl TierId {
    pub const ALL: [TierId; 4] = [
        TierId::First,
        TierId::Second,
        TierId::Third,
        TierId::Surprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierId::First => "FIRST",
            TierId::Second => "SECOND",
            TierId::Third => "THIRD",
            TierId::Surprise => "SURPRISE",
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TierId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TierId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownTier {
                value: s.to_string(),
            })
    }
}

/// Catalog construction failures. Fatal at startup.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tier totals sum to {got} but the ticket range holds {expected}")]
    TicketCountMismatch { expected: u32, got: u32 },
    #[error("tier {0} appears more than once")]
    DuplicateTier(TierId),
    #[error("catalog has no tiers")]
    EmptyCatalog,
    #[error("ticket range must be > 0")]
    EmptyRange,
    #[error("unknown tier: {value}")]
    UnknownTier { value: String },
}

/// Static definition of one tier, as configured.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierSpec {
    pub id: TierId,
    pub name: String,
    pub total: u32,
    pub color: String,
}

impl TierSpec {
    pub fn new(id: TierId, name: impl Into<String>, total: u32, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            total,
            color: color.into(),
        }
    }
}

/// A tier with its live inventory.
///
/// Serialized exactly as stored under `draw_prizes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub id: TierId,
    pub name: String,
    pub total: u32,
    pub remaining: u32,
    pub color: String,
}

impl PrizeTier {
    /// A depleted tier is rendered greyed-out on the wheel.
    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }
}

impl From<&TierSpec> for PrizeTier {
    fn from(spec: &TierSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name.clone(),
            total: spec.total,
            remaining: spec.total,
            color: spec.color.clone(),
        }
    }
}

/// Ordered tier definitions plus the ticket range `1..=ticket_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Catalog {
    tiers: Vec<TierSpec>,
    ticket_count: u32,
}

impl Catalog {
    /// Validate and build a catalog.
    pub fn new(tiers: Vec<TierSpec>, ticket_count: u32) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if ticket_count == 0 {
            return Err(ConfigError::EmptyRange);
        }
        for (i, tier) in tiers.iter().enumerate() {
            if tiers[..i].iter().any(|other| other.id == tier.id) {
                return Err(ConfigError::DuplicateTier(tier.id));
            }
        }
        let got = tiers
            .iter()
            .fold(0u32, |sum, tier| sum.saturating_add(tier.total));
        if got != ticket_count {
            return Err(ConfigError::TicketCountMismatch {
                expected: ticket_count,
                got,
            });
        }
        Ok(Self {
            tiers,
            ticket_count,
        })
    }

    pub fn tiers(&self) -> &[TierSpec] {
        &self.tiers
    }

    pub fn ticket_count(&self) -> u32 {
        self.ticket_count
    }

    /// Number of wheel segments (one per tier).
    pub fn segments(&self) -> usize {
        self.tiers.len()
    }

    /// Segment index of a tier on the wheel.
    pub fn segment_of(&self, id: TierId) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.id == id)
    }

    pub fn get(&self, id: TierId) -> Option<&TierSpec> {
        self.tiers.iter().find(|tier| tier.id == id)
    }

    /// Fresh inventory with every tier at its total.
    pub fn initial_inventory(&self) -> Vec<PrizeTier> {
        self.tiers.iter().map(PrizeTier::from).collect()
    }

    /// Whether a restored inventory lines up with this catalog: same tiers in
    /// the same order, same totals, and no tier above its total.
    pub fn matches_inventory(&self, inventory: &[PrizeTier]) -> bool {
        inventory.len() == self.tiers.len()
            && inventory.iter().zip(&self.tiers).all(|(tier, spec)| {
                tier.id == spec.id && tier.total == spec.total && tier.remaining <= spec.total
            })
    }
}

impl Default for Catalog {
    /// The festive raffle: 80 tickets over four tiers.
    fn default() -> Self {
        Self {
            tiers: vec![
                TierSpec::new(TierId::First, "新年至尊礼盒", 2, "#FFD700"),
                TierSpec::new(TierId::Second, "新年高级礼盒", 6, "#FF8C00"),
                TierSpec::new(TierId::Third, "新年祝福礼盒", 12, "#FF4500"),
                TierSpec::new(TierId::Surprise, "新年礼品", 60, "#CD5C5C"),
            ],
            ticket_count: DEFAULT_TICKET_COUNT,
        }
    }
}
