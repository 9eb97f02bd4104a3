use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PlayerError {
    #[error("track list is empty")]
    EmptyTrackList,

    #[error("track index {index} out of range (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid playback rate: {0}")]
    InvalidRate(f32),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
