//! Events emitted while transactions move through the network.

use tokio::sync::broadcast;

use aegis_consensus::ConsensusResult;
use aegis_types::{BlockHash, TransactionId};

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Network-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq)]
pub enum NetworkEvent {
    /// A transaction entered the pool.
    TransactionSubmitted { id: TransactionId },
    /// A voting round decided a transaction (validated or rejected).
    TransactionDecided {
        id: TransactionId,
        result: ConsensusResult,
    },
    /// Too few eligible validators; the transaction went back to the pool.
    TransactionDeferred { id: TransactionId, eligible: usize },
    /// A block was mined and appended.
    BlockMined {
        index: u64,
        hash: BlockHash,
        transactions: usize,
        validator: String,
    },
}

impl NetworkEvent {
    /// The transaction this event concerns, if any.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        match self {
            Self::TransactionSubmitted { id }
            | Self::TransactionDecided { id, .. }
            | Self::TransactionDeferred { id, .. } => Some(id),
            Self::BlockMined { .. } => None,
        }
    }
}

/// Asynchronous fan-out of [`NetworkEvent`]s.
///
/// Publishing never blocks; a subscriber that falls more than
/// `EVENT_CAPACITY` events behind observes a lag and skips ahead.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<NetworkEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NetworkEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers. Events with no subscriber are dropped.
    pub fn emit(&self, event: NetworkEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
