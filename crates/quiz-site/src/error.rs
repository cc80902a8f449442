use std::path::PathBuf;

use quiz_common::error::CommonError;
use quiz_common::notion::NotionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<NotionError> for AppError {
    fn from(err: NotionError) -> Self {
        AppError::Common(CommonError::Notion(err))
    }
}
