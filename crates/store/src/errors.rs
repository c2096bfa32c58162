use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

impl StoreError {
    pub fn invalid_config(msg: &str) -> Self { Self::InvalidConfig(msg.to_string()) }
}
