use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("executor period must be greater than zero")]
    ZeroPeriod,

    #[error("failed to read executor config from {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse executor config from {path}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type ExecutorResult<T> = Result<T, ExecutorError>;
