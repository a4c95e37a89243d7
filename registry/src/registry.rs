//! The fixed pool of validator nodes and its health simulation.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use aegis_random::RandomSource;
use aegis_types::{Clock, NodeId, NodeStatus};

use crate::layout::RegistryLayout;
use crate::node::ValidatorNode;
use crate::RegistryError;

/// Chance per tick that a node's status is redrawn.
const STATUS_FLIP_PROBABILITY: f64 = 0.02;

/// Statuses a flip can land on. A flip never marks a node `inactive`.
const FLIP_STATUSES: [NodeStatus; 3] = [NodeStatus::Active, NodeStatus::Syncing, NodeStatus::Maintenance];

/// Share of nodes that start `syncing` instead of `active`.
const INITIAL_SYNCING_SHARE: f64 = 0.05;

/// Telemetry random walk: (max step, floor, ceiling).
const CPU_WALK: (f64, f64, f64) = (5.0, 10.0, 90.0);
const MEMORY_WALK: (f64, f64, f64) = (4.0, 20.0, 95.0);
const LATENCY_WALK: (f64, f64, f64) = (10.0, 5.0, 500.0);
const UPTIME_WALK: (f64, f64, f64) = (0.05, 95.0, 105.0);

/// Reputation drift applied each tick.
const ACTIVE_DRIFT: f64 = 0.1;
const ACTIVE_DRIFT_MIN_UPTIME: f64 = 99.0;
const INACTIVE_DRIFT: f64 = -1.0;

/// Aggregates over the whole pool.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySummary {
    pub total_nodes: usize,
    pub active_nodes: usize,
    /// Active share of the pool, in percent.
    pub network_health: f64,
    pub avg_reputation: f64,
    pub avg_security_score: f64,
    pub threat_detections: u64,
    pub total_validations: u64,
}

/// Owns every [`ValidatorNode`], in creation order.
///
/// The pool is fixed after construction: nodes are mutated in place and
/// never added or removed.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<ValidatorNode>,
    index: HashMap<NodeId, usize>,
}

impl NodeRegistry {
    /// Create `count` nodes spread round-robin over `layout`, with bounded
    /// random starting telemetry.
    pub fn initialize(
        count: usize,
        layout: &RegistryLayout,
        rng: &dyn RandomSource,
        clock: &dyn Clock,
    ) -> Result<Self, RegistryError> {
        layout.validate()?;
        let now = clock.now();

        let nodes = (0..count)
            .map(|i| {
                let (region, provider, validator_type, location) = layout.placement(i);
                let mut node = ValidatorNode::new(NodeId::from_index(i), validator_type, &region, &provider);
                node.location = location;
                node.address = random_address(rng);
                node.status = if rng.next_f64() > INITIAL_SYNCING_SHARE {
                    NodeStatus::Active
                } else {
                    NodeStatus::Syncing
                };
                node.last_heartbeat = now;
                node.block_height = rng.below(1000) + 1000;
                node.set_reputation(rng.below(30) as f64 + 70.0);
                node.set_security_score(rng.below(20) as f64 + 80.0);
                node.cpu_usage = rng.below(40) as f64 + 20.0;
                node.memory_usage = rng.below(50) as f64 + 30.0;
                node.network_latency = rng.below(100) as f64 + 10.0;
                node.uptime = rng.range_f64(95.0, 105.0);
                node.validated_transactions = rng.below(10_000) + 1000;
                node.detected_threats = rng.below(50);
                node
            })
            .collect();

        let registry = Self::from_nodes(nodes)?;
        tracing::info!(
            nodes = registry.len(),
            active = registry.active_count(),
            "validator registry initialized"
        );
        Ok(registry)
    }

    /// Build a registry from prepared records. Ids must be unique.
    pub fn from_nodes(nodes: Vec<ValidatorNode>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateNode(node.id.to_string()));
            }
        }
        Ok(Self { nodes, index })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&ValidatorNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Every node, in creation order.
    pub fn all(&self) -> &[ValidatorNode] {
        &self.nodes
    }

    /// Snapshot of the nodes currently `active`, in creation order.
    pub fn list_active(&self) -> Vec<ValidatorNode> {
        self.nodes.iter().filter(|n| n.is_active()).cloned().collect()
    }

    pub fn active_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_active()).count()
    }

    /// Nodes grouped by region; regions are ordered by name.
    pub fn group_by_region(&self) -> BTreeMap<String, Vec<ValidatorNode>> {
        let mut groups: BTreeMap<String, Vec<ValidatorNode>> = BTreeMap::new();
        for node in &self.nodes {
            groups.entry(node.region.clone()).or_default().push(node.clone());
        }
        groups
    }

    /// One round of simulated health fluctuation over every node.
    pub fn tick(&mut self, rng: &dyn RandomSource, clock: &dyn Clock) {
        let now = clock.now();
        let mut flips = 0usize;

        for node in &mut self.nodes {
            if rng.next_f64() > 1.0 - STATUS_FLIP_PROBABILITY {
                let pick = rng.below(FLIP_STATUSES.len() as u64) as usize;
                node.status = FLIP_STATUSES[pick];
                flips += 1;
            }

            node.cpu_usage = walk(node.cpu_usage, CPU_WALK, rng);
            node.memory_usage = walk(node.memory_usage, MEMORY_WALK, rng);
            node.network_latency = walk(node.network_latency, LATENCY_WALK, rng);
            node.uptime = walk(node.uptime, UPTIME_WALK, rng);
            node.last_heartbeat = now;

            match node.status {
                NodeStatus::Active if node.uptime > ACTIVE_DRIFT_MIN_UPTIME => {
                    node.adjust_reputation(ACTIVE_DRIFT)
                }
                NodeStatus::Inactive => node.adjust_reputation(INACTIVE_DRIFT),
                _ => {}
            }
        }

        tracing::debug!(flips, active = self.active_count(), "registry tick");
    }

    /// Reward the validators of a decided-valid transaction.
    ///
    /// Updates are additive and clamped; unknown ids are skipped.
    pub fn record_validation(&mut self, validators: &[NodeId], reputation_reward: f64, threat_detected: bool) {
        for id in validators {
            let Some(&i) = self.index.get(id) else {
                tracing::warn!(node = %id, "validation reward for unknown node");
                continue;
            };
            let node = &mut self.nodes[i];
            node.validated_transactions += 1;
            node.adjust_reputation(reputation_reward);
            if threat_detected {
                node.detected_threats += 1;
            }
        }
    }

    /// Change a node's status. Returns `false` for an unknown id.
    pub fn set_status(&mut self, id: &NodeId, status: NodeStatus) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.nodes[i].status = status;
                true
            }
            None => false,
        }
    }

    /// Overwrite a node's reputation and security score (clamped).
    /// Returns `false` for an unknown id.
    pub fn set_scores(&mut self, id: &NodeId, reputation: f64, security_score: f64) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.nodes[i].set_reputation(reputation);
                self.nodes[i].set_security_score(security_score);
                true
            }
            None => false,
        }
    }

    pub fn summary(&self) -> RegistrySummary {
        let total = self.nodes.len();
        if total == 0 {
            return RegistrySummary::default();
        }
        let active = self.active_count();
        let count = total as f64;
        RegistrySummary {
            total_nodes: total,
            active_nodes: active,
            network_health: active as f64 / count * 100.0,
            avg_reputation: self.nodes.iter().map(|n| n.reputation()).sum::<f64>() / count,
            avg_security_score: self.nodes.iter().map(|n| n.security_score()).sum::<f64>() / count,
            threat_detections: self.nodes.iter().map(|n| n.detected_threats).sum(),
            total_validations: self.nodes.iter().map(|n| n.validated_transactions).sum(),
        }
    }
}

fn walk(value: f64, (step, floor, ceiling): (f64, f64, f64), rng: &dyn RandomSource) -> f64 {
    (value + rng.jitter(step)).clamp(floor, ceiling)
}

fn random_address(rng: &dyn RandomSource) -> String {
    let mut bytes = [0u8; 20];
    rng.fill_bytes(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_nullables::{NullClock, NullRandom};
    use aegis_types::{Timestamp, ValidatorType};

    fn registry(count: usize, rng: &NullRandom) -> NodeRegistry {
        let clock = NullClock::new(1_000);
        NodeRegistry::initialize(count, &RegistryLayout::default(), rng, &clock).unwrap()
    }

    #[test]
    fn initialize_assigns_ids_and_placement() {
        let reg = registry(24, &NullRandom::constant(0.5));
        assert_eq!(reg.len(), 24);
        let n = reg.get(&NodeId::new("node-021")).unwrap();
        assert_eq!(n.region, "us-west-2");
        assert_eq!(n.location, "us-west-2-2");
        assert_eq!(n.validator_type, ValidatorType::Security);
        assert_eq!(n.address.len(), 42);
        assert!(n.address.starts_with("0x"));
        assert_eq!(n.last_heartbeat, Timestamp::new(1_000));
    }

    #[test]
    fn initial_telemetry_is_bounded() {
        for r in [0.0, 0.3, 0.999] {
            let reg = registry(8, &NullRandom::constant(r));
            for n in reg.all() {
                assert!((70.0..100.0).contains(&n.reputation()));
                assert!((80.0..100.0).contains(&n.security_score()));
                assert!((20.0..60.0).contains(&n.cpu_usage));
                assert!((30.0..80.0).contains(&n.memory_usage));
                assert!((10.0..110.0).contains(&n.network_latency));
                assert!((95.0..105.0).contains(&n.uptime));
                assert!((1000..2000).contains(&n.block_height));
            }
        }
    }

    #[test]
    fn low_draw_starts_syncing() {
        let reg = registry(4, &NullRandom::constant(0.01));
        assert_eq!(reg.active_count(), 0);
        assert!(reg.all().iter().all(|n| n.status == NodeStatus::Syncing));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let layout = RegistryLayout {
            regions: Vec::new(),
            ..RegistryLayout::default()
        };
        let err = NodeRegistry::initialize(3, &layout, &NullRandom::constant(0.5), &NullClock::new(0));
        assert!(matches!(err, Err(RegistryError::EmptyLayout("regions"))));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let a = ValidatorNode::new(NodeId::new("x"), ValidatorType::Audit, "r", "p");
        let err = NodeRegistry::from_nodes(vec![a.clone(), a]);
        assert!(matches!(err, Err(RegistryError::DuplicateNode(id)) if id == "x"));
    }

    #[test]
    fn tick_with_neutral_random_keeps_metrics_and_drifts_reputation() {
        let rng = NullRandom::constant(0.5);
        let mut reg = registry(2, &rng);
        reg.set_scores(&NodeId::from_index(0), 80.0, 90.0);
        reg.set_status(&NodeId::from_index(1), NodeStatus::Inactive);
        reg.set_scores(&NodeId::from_index(1), 80.0, 90.0);
        let before = reg.get(&NodeId::from_index(0)).unwrap().cpu_usage;

        let clock = NullClock::new(5_000);
        reg.tick(&rng, &clock);

        let active = reg.get(&NodeId::from_index(0)).unwrap();
        // 0.5 draws give uptime 100, so the active drift applies.
        assert!((active.reputation() - 80.1).abs() < 1e-9);
        assert_eq!(active.cpu_usage, before);
        assert_eq!(active.last_heartbeat, Timestamp::new(5_000));
        assert_eq!(active.status, NodeStatus::Active);

        let inactive = reg.get(&NodeId::from_index(1)).unwrap();
        assert_eq!(inactive.reputation(), 79.0);
    }

    #[test]
    fn tick_clamps_walks_to_bounds() {
        let mut reg = registry(3, &NullRandom::constant(0.5));
        let high = NullRandom::constant(0.97);
        for _ in 0..200 {
            reg.tick(&high, &NullClock::new(0));
        }
        for n in reg.all() {
            assert_eq!(n.cpu_usage, 90.0);
            assert_eq!(n.memory_usage, 95.0);
            assert_eq!(n.network_latency, 500.0);
            assert_eq!(n.uptime, 105.0);
            assert_eq!(n.reputation(), 100.0);
        }
    }

    #[test]
    fn status_flip_fires_above_threshold() {
        let mut reg = registry(1, &NullRandom::constant(0.5));
        // First draw triggers the flip, second picks index 2 (maintenance).
        let rng = NullRandom::new(vec![0.99, 0.9, 0.5]);
        reg.tick(&rng, &NullClock::new(0));
        assert_eq!(reg.all()[0].status, NodeStatus::Maintenance);
    }

    #[test]
    fn record_validation_is_additive_and_capped() {
        let mut reg = registry(3, &NullRandom::constant(0.5));
        let ids = [NodeId::from_index(0), NodeId::from_index(1), NodeId::new("ghost")];
        reg.set_scores(&ids[0], 99.8, 90.0);
        let before = reg.get(&ids[1]).unwrap().clone();

        reg.record_validation(&ids, 0.5, true);

        assert_eq!(reg.get(&ids[0]).unwrap().reputation(), 100.0);
        let after = reg.get(&ids[1]).unwrap();
        assert_eq!(after.validated_transactions, before.validated_transactions + 1);
        assert_eq!(after.detected_threats, before.detected_threats + 1);
        assert!((after.reputation() - (before.reputation() + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut reg = registry(1, &NullRandom::constant(0.5));
        assert!(reg.get(&NodeId::new("node-999")).is_none());
        assert!(!reg.set_status(&NodeId::new("node-999"), NodeStatus::Active));
    }

    #[test]
    fn group_by_region_covers_every_node() {
        let reg = registry(45, &NullRandom::constant(0.5));
        let groups = reg.group_by_region();
        assert_eq!(groups.len(), 20);
        assert_eq!(groups["us-east-1"].len(), 3);
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 45);
    }

    #[test]
    fn summary_aggregates() {
        let mut reg = registry(4, &NullRandom::constant(0.5));
        reg.set_status(&NodeId::from_index(3), NodeStatus::Syncing);
        let s = reg.summary();
        assert_eq!(s.total_nodes, 4);
        assert_eq!(s.active_nodes, 3);
        assert_eq!(s.network_health, 75.0);
        assert_eq!(s.avg_reputation, 85.0);
        assert_eq!(s.avg_security_score, 90.0);
        assert_eq!(s.threat_detections, 4 * 25);
        assert_eq!(s.total_validations, 4 * 6000);
    }
}
