use layers::OpacityError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoryError>;

/// Structural errors: each one means the narrative data, the page or the map
/// style disagree, so none of them is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("invalid chapter config: {0}")]
    InvalidChapterConfig(String),

    #[error("no chapter with id `{0}`")]
    UnknownChapter(String),

    #[error(transparent)]
    Opacity(#[from] OpacityError),
}

impl StoryError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        StoryError::InvalidChapterConfig(msg.into())
    }
}
