//! Inventory updater.

use luckywheel_types::{Catalog, DrawResult, DrawnSet, PrizeTier, TicketAssignment};
use tracing::warn;

/// Commit a finalized draw: record the ticket and take one prize from its
/// tier.
///
/// Each result must be applied exactly once. Returns `false` (and changes
/// nothing) if the ticket was already drawn.
pub fn apply(result: &DrawResult, drawn: &mut DrawnSet, inventory: &mut [PrizeTier]) -> bool {
    if !drawn.insert(result.ticket) {
        warn!(ticket = result.ticket, "ticket already drawn; ignoring commit");
        return false;
    }
    if let Some(tier) = inventory.iter_mut().find(|tier| tier.id == result.tier) {
        // A faulted draw finds the tier at zero already.
        tier.remaining = tier.remaining.saturating_sub(1);
    }
    true
}

/// Recompute inventory from the mapping: each tier loses one prize per drawn
/// ticket mapped to it.
pub fn rebuild(
    catalog: &Catalog,
    assignment: &TicketAssignment,
    drawn: &DrawnSet,
) -> Vec<PrizeTier> {
    let mut inventory = catalog.initial_inventory();
    for number in drawn.iter() {
        let Some(tier_id) = assignment.tier_of(number) else {
            continue;
        };
        if let Some(tier) = inventory.iter_mut().find(|tier| tier.id == tier_id) {
            tier.remaining = tier.remaining.saturating_sub(1);
        }
    }
    inventory
}

#[cfg(test)]
mod tests {
    use super::*;
    use luckywheel_types::{Assignment, ConsistencyFault, TierId, TierSpec};

    fn result(ticket: u32, tier: TierId, segment: usize) -> DrawResult {
        DrawResult {
            ticket,
            tier,
            segment,
            fault: None,
        }
    }

    #[test]
    fn test_apply_decrements_tier_and_records_ticket() {
        let catalog = Catalog::default();
        let mut inventory = catalog.initial_inventory();
        let mut drawn = DrawnSet::new();

        assert!(apply(&result(17, TierId::Second, 1), &mut drawn, &mut inventory));
        assert!(drawn.contains(17));
        assert_eq!(drawn.len(), 1);
        assert_eq!(inventory[1].remaining, 5);
        assert_eq!(inventory[0].remaining, 2);
        assert_eq!(inventory[2].remaining, 12);
        assert_eq!(inventory[3].remaining, 60);
    }

    #[test]
    fn test_apply_twice_is_refused() {
        let catalog = Catalog::default();
        let mut inventory = catalog.initial_inventory();
        let mut drawn = DrawnSet::new();
        let draw = result(3, TierId::First, 0);

        assert!(apply(&draw, &mut drawn, &mut inventory));
        assert!(!apply(&draw, &mut drawn, &mut inventory));
        assert_eq!(drawn.len(), 1);
        assert_eq!(inventory[0].remaining, 1);
    }

    #[test]
    fn test_apply_faulted_draw_does_not_underflow() {
        let catalog = Catalog::default();
        let mut inventory = catalog.initial_inventory();
        inventory[0].remaining = 0;
        let mut drawn = DrawnSet::new();
        let draw = DrawResult {
            fault: Some(ConsistencyFault::Depleted {
                ticket: 9,
                tier: TierId::First,
            }),
            ..result(9, TierId::First, 0)
        };

        assert!(apply(&draw, &mut drawn, &mut inventory));
        assert_eq!(inventory[0].remaining, 0);
        assert!(drawn.contains(9));
    }

    #[test]
    fn test_rebuild_counts_drawn_tickets_per_tier() {
        let catalog = Catalog::new(
            vec![
                TierSpec::new(TierId::First, "gold", 1, "#FFD700"),
                TierSpec::new(TierId::Surprise, "gift", 3, "#CD5C5C"),
            ],
            4,
        )
        .unwrap();
        let mapping = TicketAssignment::new(vec![
            Assignment {
                number: 1,
                prize_id: TierId::Surprise,
            },
            Assignment {
                number: 2,
                prize_id: TierId::First,
            },
            Assignment {
                number: 3,
                prize_id: TierId::Surprise,
            },
            Assignment {
                number: 4,
                prize_id: TierId::Surprise,
            },
        ]);

        let inventory = rebuild(&catalog, &mapping, &DrawnSet::from(vec![3, 2, 1]));
        assert_eq!(inventory[0].remaining, 0);
        assert_eq!(inventory[1].remaining, 1);

        assert_eq!(
            rebuild(&catalog, &mapping, &DrawnSet::new()),
            catalog.initial_inventory()
        );
    }
}
