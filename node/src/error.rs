use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("registry error: {0}")]
    Registry(#[from] aegis_registry::RegistryError),

    #[error("transaction error: {0}")]
    Transaction(#[from] aegis_transactions::TransactionError),

    #[error("consensus error: {0}")]
    Consensus(#[from] aegis_consensus::ConsensusError),

    #[error("ledger error: {0}")]
    Ledger(#[from] aegis_ledger::LedgerError),

    #[error("mining failed: {0}")]
    Mining(#[from] aegis_work::WorkError),

    #[error("invalid parameters: {0}")]
    Params(#[from] aegis_types::AegisError),

    #[error("config error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("node already running")]
    AlreadyRunning,

    #[error("shutdown timeout")]
    ShutdownTimeout,
}
