//! Draw state: the ticket mapping, the drawn set and what a draw produces.

use crate::catalog::{Catalog, PrizeTier, TierId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

/// One ticket and the tier it wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub number: u32,
    #[serde(rename = "prizeId")]
    pub prize_id: TierId,
}

/// Reasons a persisted mapping cannot be used with the current catalog.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum AssignmentError {
    #[error("mapping covers {got} tickets, expected {expected}")]
    WrongLength { expected: u32, got: u32 },
    #[error("ticket at position {position} is numbered {number}")]
    OutOfOrder { position: u32, number: u32 },
    #[error("ticket {number} maps to {tier}, which is not in the catalog")]
    UnknownTier { number: u32, tier: TierId },
    #[error("tier {tier} holds {got} tickets, expected {expected}")]
    TierCount {
        tier: TierId,
        expected: u32,
        got: u32,
    },
}

/// Ticket-to-tier mapping for one epoch, sorted by ticket number.
///
/// Covers `1..=N` exactly once, and each tier owns exactly `total` tickets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketAssignment(Vec<Assignment>);

impl TicketAssignment {
    /// Wrap a mapping, sorting it by ticket number.
    pub fn new(mut entries: Vec<Assignment>) -> Self {
        entries.sort_by_key(|entry| entry.number);
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.0.iter()
    }

    /// Tier a ticket was assigned to.
    pub fn tier_of(&self, number: u32) -> Option<TierId> {
        // Sorted and contiguous from 1, so the entry sits at `number - 1`.
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        self.0
            .get(index)
            .filter(|entry| entry.number == number)
            .map(|entry| entry.prize_id)
    }

    /// Ticket count per tier.
    pub fn counts(&self) -> BTreeMap<TierId, u32> {
        let mut counts = BTreeMap::new();
        for entry in &self.0 {
            *counts.entry(entry.prize_id).or_insert(0) += 1;
        }
        counts
    }

    /// Check the mapping is a bijection over the catalog's range with the
    /// catalog's per-tier counts.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), AssignmentError> {
        let got = u32::try_from(self.0.len()).unwrap_or(u32::MAX);
        if got != catalog.ticket_count() {
            return Err(AssignmentError::WrongLength {
                expected: catalog.ticket_count(),
                got,
            });
        }
        for (position, entry) in (0u32..).zip(&self.0) {
            if entry.number != position + 1 {
                return Err(AssignmentError::OutOfOrder {
                    position,
                    number: entry.number,
                });
            }
            if catalog.get(entry.prize_id).is_none() {
                return Err(AssignmentError::UnknownTier {
                    number: entry.number,
                    tier: entry.prize_id,
                });
            }
        }
        let counts = self.counts();
        for spec in catalog.tiers() {
            let got = counts.get(&spec.id).copied().unwrap_or(0);
            if got != spec.total {
                return Err(AssignmentError::TierCount {
                    tier: spec.id,
                    expected: spec.total,
                    got,
                });
            }
        }
        Ok(())
    }
}

/// Append-only set of drawn tickets, kept in draw order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct DrawnSet {
    order: Vec<u32>,
    members: BTreeSet<u32>,
}

impl DrawnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a ticket. Returns `false` if it was already drawn.
    pub fn insert(&mut self, number: u32) -> bool {
        if !self.members.insert(number) {
            return false;
        }
        self.order.push(number);
        true
    }

    pub fn contains(&self, number: u32) -> bool {
        self.members.contains(&number)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Tickets in the order they were drawn.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.order.iter().copied()
    }

    /// Whether every entry lies inside `1..=ticket_count`.
    pub fn within(&self, ticket_count: u32) -> bool {
        self.members
            .iter()
            .all(|number| (1..=ticket_count).contains(number))
    }
}

impl From<Vec<u32>> for DrawnSet {
    fn from(numbers: Vec<u32>) -> Self {
        let mut set = DrawnSet::new();
        for number in numbers {
            set.insert(number);
        }
        set
    }
}

impl From<DrawnSet> for Vec<u32> {
    fn from(set: DrawnSet) -> Self {
        set.order
    }
}

/// Inventory disagreed with the mapping for a still-undrawn ticket.
///
/// Reported, never thrown: the mapping wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsistencyFault {
    Depleted { ticket: u32, tier: TierId },
}

/// One winning ticket, before it is committed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    pub ticket: u32,
    pub tier: TierId,
    /// Wheel segment of `tier`.
    pub segment: usize,
    pub fault: Option<ConsistencyFault>,
}

#[derive(Debug, ThisError, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("no more prizes or tickets (tickets={tickets}, drawn={drawn}, remaining={remaining})")]
    Exhausted {
        tickets: u32,
        drawn: u32,
        remaining: u32,
    },
}

/// Draw lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DrawPhase {
    Idle,
    Spinning { ends_at_ms: u64 },
    Settling { ends_at_ms: u64 },
    Exhausted,
}

impl DrawPhase {
    /// A draw is in flight and not yet revealed.
    pub fn is_busy(&self) -> bool {
        matches!(self, DrawPhase::Spinning { .. } | DrawPhase::Settling { .. })
    }
}

/// How loudly the presentation celebrates a win.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Celebration {
    /// Wheel flash, win sound and full-screen confetti.
    Spectacular,
    /// A single confetti burst.
    Mild,
}

impl Celebration {
    pub fn for_tier(tier: TierId) -> Self {
        match tier {
            TierId::First | TierId::Second | TierId::Third => Celebration::Spectacular,
            TierId::Surprise => Celebration::Mild,
        }
    }
}

/// The winner shown once the wheel settles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub ticket: u32,
    pub tier: TierId,
    pub name: String,
    pub celebration: Celebration,
    /// Custom win sound for the tier, as a data URI.
    pub sound: Option<String>,
}

/// Read-only view of the engine for rendering.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tiers: Vec<PrizeTier>,
    pub drawn: DrawnSet,
    pub assignment: TicketAssignment,
    pub phase: DrawPhase,
    /// Cumulative wheel rotation in degrees.
    pub rotation: f64,
    pub last_reveal: Option<Reveal>,
}

impl Snapshot {
    pub fn remaining(&self) -> u32 {
        self.tiers
            .iter()
            .fold(0u32, |sum, tier| sum.saturating_add(tier.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sequential(catalog: &Catalog) -> TicketAssignment {
        let mut number = 0;
        let mut entries = Vec::new();
        for spec in catalog.tiers() {
            for _ in 0..spec.total {
                number += 1;
                entries.push(Assignment {
                    number,
                    prize_id: spec.id,
                });
            }
        }
        TicketAssignment::new(entries)
    }

    #[test]
    fn test_assignment_lookup() {
        let catalog = Catalog::default();
        let assignment = sequential(&catalog);
        assert_eq!(assignment.tier_of(1), Some(TierId::First));
        assert_eq!(assignment.tier_of(3), Some(TierId::Second));
        assert_eq!(assignment.tier_of(80), Some(TierId::Surprise));
        assert_eq!(assignment.tier_of(0), None);
        assert_eq!(assignment.tier_of(81), None);
    }

    #[test]
    fn test_assignment_sorted_on_construction() {
        let assignment = TicketAssignment::new(vec![
            Assignment {
                number: 2,
                prize_id: TierId::Second,
            },
            Assignment {
                number: 1,
                prize_id: TierId::First,
            },
        ]);
        let numbers: Vec<u32> = assignment.iter().map(|entry| entry.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_assignment_validate() {
        let catalog = Catalog::default();
        let assignment = sequential(&catalog);
        assert_eq!(assignment.validate(&catalog), Ok(()));

        let mut entries: Vec<Assignment> = assignment.iter().copied().collect();
        entries.pop();
        assert_eq!(
            TicketAssignment::new(entries.clone()).validate(&catalog),
            Err(AssignmentError::WrongLength {
                expected: 80,
                got: 79
            })
        );

        entries.push(Assignment {
            number: 81,
            prize_id: TierId::Surprise,
        });
        assert_eq!(
            TicketAssignment::new(entries).validate(&catalog),
            Err(AssignmentError::OutOfOrder {
                position: 79,
                number: 81
            })
        );

        let mut entries: Vec<Assignment> = assignment.iter().copied().collect();
        entries[0].prize_id = TierId::Surprise;
        assert_eq!(
            TicketAssignment::new(entries).validate(&catalog),
            Err(AssignmentError::TierCount {
                tier: TierId::First,
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn test_assignment_json_shape() {
        let assignment = TicketAssignment::new(vec![Assignment {
            number: 1,
            prize_id: TierId::Third,
        }]);
        let json = serde_json::to_string(&assignment).unwrap();
        assert_eq!(json, r#"[{"number":1,"prizeId":"THIRD"}]"#);
    }

    #[test]
    fn test_drawn_set_rejects_duplicates() {
        let mut drawn = DrawnSet::new();
        assert!(drawn.insert(5));
        assert!(drawn.insert(2));
        assert!(!drawn.insert(5));
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn.iter().collect::<Vec<_>>(), vec![5, 2]);
        assert!(drawn.within(5));
        assert!(!drawn.within(4));
    }

    #[test]
    fn test_drawn_set_serde_keeps_order() {
        let drawn: DrawnSet = serde_json::from_str("[7,3,7,9]").unwrap();
        assert_eq!(drawn.len(), 3);
        assert_eq!(serde_json::to_string(&drawn).unwrap(), "[7,3,9]");
    }

    #[test]
    fn test_celebration_for_tier() {
        assert_eq!(Celebration::for_tier(TierId::First), Celebration::Spectacular);
        assert_eq!(Celebration::for_tier(TierId::Third), Celebration::Spectacular);
        assert_eq!(Celebration::for_tier(TierId::Surprise), Celebration::Mild);
    }

    #[test]
    fn test_phase_busy() {
        assert!(!DrawPhase::Idle.is_busy());
        assert!(DrawPhase::Spinning { ends_at_ms: 1 }.is_busy());
        assert!(DrawPhase::Settling { ends_at_ms: 1 }.is_busy());
        assert!(!DrawPhase::Exhausted.is_busy());
    }

    #[test]
    fn test_snapshot_remaining_saturates() {
        let mut tiers = Catalog::default().initial_inventory();
        tiers[0].remaining = u32::MAX;
        tiers[1].remaining = u32::MAX;
        let snapshot = Snapshot {
            tiers,
            drawn: DrawnSet::new(),
            assignment: TicketAssignment::default(),
            phase: DrawPhase::Idle,
            rotation: 0.0,
            last_reveal: None,
        };
        assert_eq!(snapshot.remaining(), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_drawn_set_matches_first_occurrences(numbers in prop::collection::vec(1u32..=20, 0..60)) {
            let mut drawn = DrawnSet::new();
            let mut expected: Vec<u32> = Vec::new();
            for number in numbers {
                let fresh = !expected.contains(&number);
                prop_assert_eq!(drawn.insert(number), fresh);
                if fresh {
                    expected.push(number);
                }
            }
            prop_assert_eq!(drawn.len(), expected.len());
            prop_assert_eq!(drawn.iter().collect::<Vec<_>>(), expected);
            prop_assert!(drawn.within(20));
        }
    }
}
