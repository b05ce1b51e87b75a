use scylla::errors::{ExecutionError, NewSessionError, PrepareError, UseKeyspaceError};

use crate::ident::CqlIdent;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("build runtime")]
    Runtime(#[source] std::io::Error),
    #[error("connect to cluster")]
    Connect(#[from] NewSessionError),
    #[error("{what}")]
    Schema {
        what: &'static str,
        #[source]
        source: ExecutionError,
    },
    #[error("use keyspace {0}")]
    UseKeyspace(CqlIdent, #[source] UseKeyspaceError),
    #[error("prepare statement")]
    Prepare(#[from] PrepareError),
    #[error("execute statement")]
    Query(#[from] ExecutionError),
    #[error("decode rows")]
    Decode(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("serialize reports")]
    Json(#[from] serde_json::Error),
    #[error("cannot sample {wanted} ids out of {available}")]
    NotEnoughRows { wanted: usize, available: usize },
}

impl Error {
    pub(crate) fn decode(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Decode(Box::new(e))
    }
}
