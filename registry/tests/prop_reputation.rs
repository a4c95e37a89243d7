use proptest::prelude::*;

use aegis_nullables::{NullClock, NullRandom};
use aegis_registry::{NodeRegistry, RegistryLayout};
use aegis_types::NodeId;

proptest! {
    /// Scores stay in [0, 100] through any mix of ticks and rewards.
    #[test]
    fn scores_stay_bounded(
        draws in prop::collection::vec(0.0f64..1.0, 1..64),
        rewards in prop::collection::vec(-5.0f64..5.0, 0..32),
        ticks in 1usize..20,
    ) {
        let rng = NullRandom::new(draws);
        let clock = NullClock::new(0);
        let mut reg = NodeRegistry::initialize(12, &RegistryLayout::default(), &rng, &clock).unwrap();
        let ids: Vec<NodeId> = reg.all().iter().map(|n| n.id.clone()).collect();

        for round in 0..ticks {
            reg.tick(&rng, &clock);
            if let Some(&reward) = rewards.get(round) {
                reg.record_validation(&ids, reward * 30.0, reward > 0.0);
            }
            for node in reg.all() {
                prop_assert!((0.0..=100.0).contains(&node.reputation()));
                prop_assert!((0.0..=100.0).contains(&node.security_score()));
            }
        }
    }

    /// Telemetry walks never leave their hard floors and ceilings.
    #[test]
    fn telemetry_stays_within_walk_bounds(
        draws in prop::collection::vec(0.0f64..1.0, 1..64),
        ticks in 1usize..50,
    ) {
        let rng = NullRandom::new(draws);
        let clock = NullClock::new(0);
        let mut reg = NodeRegistry::initialize(6, &RegistryLayout::default(), &rng, &clock).unwrap();
        for _ in 0..ticks {
            reg.tick(&rng, &clock);
        }
        for node in reg.all() {
            prop_assert!((10.0..=90.0).contains(&node.cpu_usage));
            prop_assert!((20.0..=95.0).contains(&node.memory_usage));
            prop_assert!((5.0..=500.0).contains(&node.network_latency));
            prop_assert!((95.0..=105.0).contains(&node.uptime));
        }
    }
}
