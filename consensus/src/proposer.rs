//! Block proposer selection.

use aegis_registry::ValidatorNode;

/// Proposer recorded when no node is active.
pub const SYSTEM_PROPOSER: &str = "system";

/// Picks the node credited with proposing the next block.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProposerSelector;

impl ProposerSelector {
    /// The active node with the highest `reputation * security_score`.
    /// The first node wins a tie.
    pub fn select<'a>(&self, nodes: &'a [ValidatorNode]) -> Option<&'a ValidatorNode> {
        let mut best: Option<&ValidatorNode> = None;
        for node in nodes.iter().filter(|n| n.is_active()) {
            match best {
                Some(b) if node.proposer_weight() <= b.proposer_weight() => {}
                _ => best = Some(node),
            }
        }
        best
    }

    /// Id of the selected proposer, or [`SYSTEM_PROPOSER`].
    pub fn proposer_id(&self, nodes: &[ValidatorNode]) -> String {
        self.select(nodes)
            .map(|n| n.id.to_string())
            .unwrap_or_else(|| SYSTEM_PROPOSER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_types::{NodeId, NodeStatus, ValidatorType};

    fn node(i: usize, rep: f64, sec: f64) -> ValidatorNode {
        ValidatorNode::new(NodeId::from_index(i), ValidatorType::Consensus, "r", "p").with_scores(rep, sec)
    }

    #[test]
    fn highest_weight_wins() {
        let nodes = vec![node(0, 90.0, 80.0), node(1, 80.0, 95.0), node(2, 99.0, 70.0)];
        assert_eq!(ProposerSelector.proposer_id(&nodes), "node-001");
    }

    #[test]
    fn tie_goes_to_first() {
        let nodes = vec![node(0, 80.0, 90.0), node(1, 90.0, 80.0)];
        assert_eq!(ProposerSelector.proposer_id(&nodes), "node-000");
    }

    #[test]
    fn inactive_nodes_are_skipped() {
        let nodes = vec![node(0, 100.0, 100.0).with_status(NodeStatus::Maintenance), node(1, 71.0, 80.0)];
        assert_eq!(ProposerSelector.proposer_id(&nodes), "node-001");
    }

    #[test]
    fn no_active_nodes_falls_back_to_system() {
        let nodes = vec![node(0, 100.0, 100.0).with_status(NodeStatus::Syncing)];
        assert_eq!(ProposerSelector.proposer_id(&nodes), SYSTEM_PROPOSER);
        assert_eq!(ProposerSelector.proposer_id(&[]), SYSTEM_PROPOSER);
    }
}
