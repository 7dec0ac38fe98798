pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid family tree JSON: {0}")]
    TreeJson(#[source] serde_json::Error),

    #[error("invalid chart options: {0}")]
    OptionsJson(#[source] serde_json::Error),

    #[error("generations must be between {min} and {max}, got {value}")]
    GenerationsOutOfRange { value: u32, min: u32, max: u32 },

    #[error("unknown chart layout: {value} (expected top-bottom, bottom-top, left-right or right-left)")]
    UnknownLayout { value: String },

    #[error("invalid individual URL template {template:?}: {message}")]
    InvalidUrlTemplate { template: String, message: String },
}
