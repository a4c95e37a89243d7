use proptest::prelude::*;

use aegis_consensus::{quorum_reached, required_votes, ConsensusResult, Vote};
use aegis_types::{NodeId, Priority};

proptest! {
    /// Quorum matches `positive >= ceil(0.67 * total)` computed in exact
    /// rational arithmetic.
    #[test]
    fn quorum_is_exact_ceiling(total in 1usize..500, positive_seed in 0usize..500) {
        let positive = positive_seed % (total + 1);
        let required = (total * 67 + 99) / 100;
        prop_assert_eq!(required_votes(total), required);
        prop_assert_eq!(quorum_reached(positive, total), positive >= required);
    }

    /// A tally's verdict, confidence and count agree with its votes.
    #[test]
    fn result_agrees_with_votes(approvals in prop::collection::vec(any::<bool>(), 1..8)) {
        let votes: Vec<Vote> = approvals
            .iter()
            .enumerate()
            .map(|(i, &approve)| Vote { node_id: NodeId::from_index(i), approve, confidence: 0.5 })
            .collect();
        let positive = approvals.iter().filter(|a| **a).count();
        let result = ConsensusResult::from_votes(&votes, Priority::Medium);

        prop_assert_eq!(result.validator_count, approvals.len());
        prop_assert_eq!(result.consensus_reached, quorum_reached(positive, approvals.len()));
        prop_assert_eq!(result.is_valid, result.consensus_reached);
        prop_assert!((result.confidence - positive as f64 / approvals.len() as f64).abs() < 1e-12);
    }

    /// Vote confidence always lies in [0, 1].
    #[test]
    fn confidence_is_bounded(rep in 0.0f64..=100.0, sec in 0.0f64..=100.0, jitter in 0.0f64..1.0) {
        let node = aegis_registry::ValidatorNode::new(
            NodeId::new("n"),
            aegis_types::ValidatorType::Security,
            "r",
            "p",
        )
        .with_scores(rep, sec);
        let c = aegis_consensus::vote_confidence(&node, aegis_types::TransactionType::ThreatDetection, jitter);
        prop_assert!((0.0..=1.0).contains(&c));
    }
}
