use thiserror::Error;

/// Configuration errors. All of them surface while an effect is being built,
/// never from the render path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("delay lines need {required} samples but the arena only holds {available}")]
    ArenaTooSmall { required: usize, available: usize },

    #[error("delay line `{name}` has capacity {capacity}; at least 2 samples are required")]
    LineTooShort { name: &'static str, capacity: usize },

    #[error("line index {index} is outside the layout ({lines} lines)")]
    UnknownLine { index: usize, lines: usize },

    #[error("no delay line named `{0}`")]
    UnknownLineName(String),
}

pub type Result<T> = std::result::Result<T, FxError>;
