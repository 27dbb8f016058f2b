#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create snapshot directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read snapshot `{key}` from {path}: {source}")]
    Read {
        key: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse snapshot `{key}`: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write snapshot `{key}` to {path}: {source}")]
    Write {
        key: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("worker `{worker_id}` does not exist in the current state")]
    UnknownWorker { worker_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("worker `{worker_id}` is on the engine roster but missing from the store")]
    UnknownWorker { worker_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("tick panicked: {0}")]
    Panicked(String),
    #[error("failed to spawn ticker thread: {0}")]
    Spawn(#[source] std::io::Error),
}
