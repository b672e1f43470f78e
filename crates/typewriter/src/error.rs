use std::io;

/// Host errors. Parsing never fails; these come from the edges.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("argument error: {0}")]
    Args(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Generation(String),
}
