use narwhal::Error as TreeError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] kindred_core::Error),
    #[error("tree layout failed: {0}")]
    Layout(#[from] TreeError),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid hierarchy: {message}")]
    InvalidHierarchy { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
