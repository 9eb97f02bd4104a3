use thiserror::Error;

use crate::resource::ResourceError;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),

    #[error(transparent)]
    Fetch(#[from] ResourceError),

    #[error("failed to decode audio: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}
