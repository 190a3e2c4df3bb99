//! Audio file I/O for the invader noise gate.
//!
//! - WAV file reading and writing via `hound`
//! - [`ProcessingEngine`] for running a gate over whole buffers in host-sized blocks

mod engine;
mod wav;

pub use engine::{DEFAULT_BLOCK_SIZE, ProcessingEngine, ReductionStats};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav};

/// Errors that can occur during audio I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error reading or writing a WAV file.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Sample format or layout the reader or writer can't handle.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
