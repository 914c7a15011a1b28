//! Number-assignment generator.
//!
//! Builds the one-time mapping from tickets `1..=N` to prize tiers at the
//! start of an epoch. The pool holds `total` copies of each tier id and is
//! permuted with a Fisher-Yates shuffle, so every arrangement respecting the
//! per-tier counts is equally likely.

use luckywheel_types::{Assignment, Catalog, ConfigError, TicketAssignment, TierId};
use rand::{seq::SliceRandom, Rng};

/// Generate a fresh ticket mapping for `catalog`.
pub fn generate<R: Rng + ?Sized>(
    catalog: &Catalog,
    rng: &mut R,
) -> Result<TicketAssignment, ConfigError> {
    let mut pool: Vec<TierId> = catalog
        .tiers()
        .iter()
        .flat_map(|tier| std::iter::repeat(tier.id).take(tier.total as usize))
        .collect();
    let got = u32::try_from(pool.len()).unwrap_or(u32::MAX);
    if got != catalog.ticket_count() {
        return Err(ConfigError::TicketCountMismatch {
            expected: catalog.ticket_count(),
            got,
        });
    }

    pool.shuffle(rng);

    let entries = (1u32..)
        .zip(pool)
        .map(|(number, prize_id)| Assignment { number, prize_id })
        .collect();
    Ok(TicketAssignment::new(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use luckywheel_types::TierSpec;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_generate_default_catalog() {
        let catalog = Catalog::default();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let assignment = generate(&catalog, &mut rng).expect("valid catalog");

        assert_eq!(assignment.len(), 80);
        assert_eq!(assignment.validate(&catalog), Ok(()));
        let counts = assignment.counts();
        assert_eq!(counts[&TierId::First], 2);
        assert_eq!(counts[&TierId::Second], 6);
        assert_eq!(counts[&TierId::Third], 12);
        assert_eq!(counts[&TierId::Surprise], 60);
    }

    #[test]
    fn test_generate_is_seed_deterministic() {
        let catalog = Catalog::default();
        let a = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        let b = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        let c = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generate_shuffles_positions() {
        // Each FIRST ticket should land on many different numbers across seeds.
        let catalog = Catalog::default();
        let mut seen = std::collections::BTreeSet::new();
        for seed in 0..200 {
            let assignment = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
            for entry in assignment.iter().filter(|e| e.prize_id == TierId::First) {
                seen.insert(entry.number);
            }
        }
        assert!(seen.len() > 40, "FIRST landed on only {} numbers", seen.len());
    }

    #[test]
    fn test_generate_tier_with_zero_total() {
        let catalog = Catalog::new(
            vec![
                TierSpec::new(TierId::First, "a", 0, "#000"),
                TierSpec::new(TierId::Surprise, "b", 3, "#000"),
            ],
            3,
        )
        .unwrap();
        let assignment = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(0)).unwrap();
        assert!(assignment.iter().all(|e| e.prize_id == TierId::Surprise));
        assert_eq!(assignment.validate(&catalog), Ok(()));
    }

    fn catalog_strategy() -> impl Strategy<Value = Catalog> {
        prop::collection::vec(0u32..40, 1..=4).prop_filter_map("empty range", |totals| {
            let tiers: Vec<TierSpec> = TierId::ALL
                .iter()
                .zip(&totals)
                .map(|(id, total)| TierSpec::new(*id, id.as_str(), *total, "#000"))
                .collect();
            let count = totals.iter().sum();
            Catalog::new(tiers, count).ok()
        })
    }

    proptest! {
        #[test]
        fn prop_generate_is_bijection(catalog in catalog_strategy(), seed in any::<u64>()) {
            let assignment = generate(&catalog, &mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
            prop_assert_eq!(assignment.validate(&catalog), Ok(()));
            for number in 1..=catalog.ticket_count() {
                prop_assert!(assignment.tier_of(number).is_some());
            }
        }
    }
}
