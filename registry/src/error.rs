use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry layout has no {0}")]
    EmptyLayout(&'static str),

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),
}
