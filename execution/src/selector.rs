//! Draw selector.
//!
//! Picks one undrawn ticket uniformly at random. The ticket mapping is the
//! source of truth; tier inventory is a cache of it. If the two disagree the
//! draw still follows the mapping and the fault is reported on the result.

use luckywheel_types::{
    Catalog, ConsistencyFault, DrawError, DrawResult, DrawnSet, PrizeTier, TicketAssignment,
};
use rand::Rng;
use tracing::warn;

/// Total prizes left across all tiers.
pub fn remaining(inventory: &[PrizeTier]) -> u32 {
    inventory
        .iter()
        .fold(0u32, |sum, tier| sum.saturating_add(tier.remaining))
}

/// Fail with [`DrawError::Exhausted`] when no draw is possible.
pub fn ensure_available(
    assignment: &TicketAssignment,
    drawn: &DrawnSet,
    inventory: &[PrizeTier],
) -> Result<(), DrawError> {
    let left = remaining(inventory);
    if left == 0 || drawn.len() >= assignment.len() {
        return Err(DrawError::Exhausted {
            tickets: u32::try_from(assignment.len()).unwrap_or(u32::MAX),
            drawn: u32::try_from(drawn.len()).unwrap_or(u32::MAX),
            remaining: left,
        });
    }
    Ok(())
}

/// Select a winning ticket among those not yet drawn.
pub fn select<R: Rng + ?Sized>(
    catalog: &Catalog,
    assignment: &TicketAssignment,
    drawn: &DrawnSet,
    inventory: &[PrizeTier],
    rng: &mut R,
) -> Result<DrawResult, DrawError> {
    ensure_available(assignment, drawn, inventory)?;

    let available: Vec<_> = assignment
        .iter()
        .filter(|entry| !drawn.contains(entry.number))
        .collect();
    // Drawn numbers outside the mapping can make the length check pass while
    // nothing is actually left.
    if available.is_empty() {
        return Err(DrawError::Exhausted {
            tickets: u32::try_from(assignment.len()).unwrap_or(u32::MAX),
            drawn: u32::try_from(drawn.len()).unwrap_or(u32::MAX),
            remaining: remaining(inventory),
        });
    }
    let chosen = available[rng.gen_range(0..available.len())];

    let depleted = inventory
        .iter()
        .find(|tier| tier.id == chosen.prize_id)
        .map_or(true, |tier| tier.remaining == 0);
    let fault = depleted.then(|| {
        warn!(
            ticket = chosen.number,
            tier = %chosen.prize_id,
            "prize mismatch: mapped tier has no remaining inventory"
        );
        ConsistencyFault::Depleted {
            ticket: chosen.number,
            tier: chosen.prize_id,
        }
    });

    Ok(DrawResult {
        ticket: chosen.number,
        tier: chosen.prize_id,
        segment: catalog.segment_of(chosen.prize_id).unwrap_or_default(),
        fault,
    })
}
