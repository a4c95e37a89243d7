//! Simulated voting rounds.
//!
//! Every selected validator votes concurrently after an artificial delay
//! standing in for a network round trip. The tally waits for all votes;
//! there is no early exit once quorum is reached.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use aegis_random::RandomSource;
use aegis_registry::ValidatorNode;
use aegis_transactions::SecurityTransaction;
use aegis_types::NodeId;

use crate::result::ConsensusResult;
use crate::vote::Vote;
use crate::ConsensusError;

/// Reputation added to each validator of a validated transaction.
pub const REPUTATION_REWARD: f64 = 0.5;

/// Outcome of one round with the individual votes behind it.
#[derive(Clone, Debug)]
pub struct Decision {
    pub result: ConsensusResult,
    pub votes: Vec<Vote>,
}

impl Decision {
    /// Ids of every validator that voted, in selection order.
    pub fn validators(&self) -> Vec<NodeId> {
        self.votes.iter().map(|v| v.node_id.clone()).collect()
    }
}

pub struct ConsensusEngine {
    rng: Arc<dyn RandomSource>,
    delay_min_ms: u64,
    delay_max_ms: u64,
}

impl ConsensusEngine {
    pub fn new(rng: Arc<dyn RandomSource>, delay_min_ms: u64, delay_max_ms: u64) -> Self {
        Self {
            rng,
            delay_min_ms,
            delay_max_ms: delay_max_ms.max(delay_min_ms),
        }
    }

    /// Collect one vote from every validator in `validators` and tally them.
    ///
    /// Random draws happen up front in validator order, so a scripted random
    /// source yields the same votes regardless of task scheduling.
    pub async fn run_round(
        &self,
        tx: &SecurityTransaction,
        validators: &[ValidatorNode],
    ) -> Result<Decision, ConsensusError> {
        if validators.is_empty() {
            return Err(ConsensusError::NoValidators(tx.id.to_string()));
        }

        let tx_type = tx.tx_type;
        let ballots = validators.iter().map(|validator| {
            let delay = self.vote_delay();
            let jitter = self.rng.next_f64();
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Vote::cast(validator, tx_type, jitter)
            }
        });
        // Collect eagerly so every draw happens before the first poll.
        let ballots: Vec<_> = ballots.collect();
        let votes = join_all(ballots).await;

        let result = ConsensusResult::from_votes(&votes, tx.priority);
        tracing::debug!(
            tx = %tx.id,
            validators = votes.len(),
            positive = votes.iter().filter(|v| v.approve).count(),
            reached = result.consensus_reached,
            "voting round finished"
        );
        Ok(Decision { result, votes })
    }

    fn vote_delay(&self) -> Duration {
        if self.delay_max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = self.rng.range_f64(self.delay_min_ms as f64, self.delay_max_ms as f64);
        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aegis_nullables::NullRandom;
    use aegis_transactions::TransactionDraft;
    use aegis_types::{Priority, ThreatLevel, Timestamp, TransactionId, TransactionType, ValidatorType};

    fn tx(tx_type: TransactionType, priority: Priority) -> SecurityTransaction {
        let draft = TransactionDraft::new(tx_type, serde_json::json!({}), "test", priority);
        SecurityTransaction::from_draft(draft, TransactionId::new("tx"), Timestamp::EPOCH).unwrap()
    }

    fn validators(n: usize, rep: f64, sec: f64) -> Vec<ValidatorNode> {
        (0..n)
            .map(|i| {
                ValidatorNode::new(NodeId::from_index(i), ValidatorType::Security, "r", "p").with_scores(rep, sec)
            })
            .collect()
    }

    fn engine(values: Vec<f64>) -> ConsensusEngine {
        ConsensusEngine::new(Arc::new(NullRandom::new(values)), 0, 0)
    }

    #[tokio::test]
    async fn strong_validators_reach_consensus() {
        let decision = engine(vec![0.5])
            .run_round(&tx(TransactionType::ThreatDetection, Priority::Critical), &validators(7, 95.0, 95.0))
            .await
            .unwrap();
        assert!(decision.result.consensus_reached);
        assert_eq!(decision.result.confidence, 1.0);
        assert_eq!(decision.result.threat_level, ThreatLevel::Minimal);
        assert_eq!(decision.validators().len(), 7);
    }

    #[tokio::test]
    async fn weak_validators_are_rejected() {
        let decision = engine(vec![0.5])
            .run_round(&tx(TransactionType::AuditLog, Priority::High), &validators(5, 60.0, 40.0))
            .await
            .unwrap();
        assert!(!decision.result.consensus_reached);
        assert_eq!(decision.result.confidence, 0.0);
        assert_eq!(decision.result.threat_level, ThreatLevel::Medium);
    }

    #[tokio::test]
    async fn votes_follow_draw_order() {
        // Base confidence 0.6 for these validators; draws push votes above or below.
        let decision = engine(vec![0.9, 0.1, 0.9, 0.1, 0.9])
            .run_round(&tx(TransactionType::AuditLog, Priority::Low), &validators(5, 70.0, 60.0))
            .await
            .unwrap();
        let approvals: Vec<bool> = decision.votes.iter().map(|v| v.approve).collect();
        assert_eq!(approvals, vec![true, false, true, false, true]);
        // 3 of 5 is below ceil(3.35) = 4.
        assert!(!decision.result.consensus_reached);
    }

    #[tokio::test]
    async fn empty_validator_set_is_an_error() {
        let err = engine(vec![0.5])
            .run_round(&tx(TransactionType::AuditLog, Priority::Low), &[])
            .await;
        assert!(matches!(err, Err(ConsensusError::NoValidators(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn votes_wait_for_simulated_delay() {
        let engine = ConsensusEngine::new(Arc::new(NullRandom::constant(0.5)), 50, 150);
        let started = tokio::time::Instant::now();
        engine
            .run_round(&tx(TransactionType::ThreatDetection, Priority::High), &validators(3, 90.0, 90.0))
            .await
            .unwrap();
        // Votes run in parallel, so the round takes one delay, not three.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(300));
    }
}
