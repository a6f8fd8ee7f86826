//! Error types for maze generation and output.
//!
//! This module defines all possible errors that can occur while building a
//! maze, rasterizing it, or writing the encoded bitmap to a stream.

use thiserror::Error;

/// Main error type for maze operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Stream write failure.
    ///
    /// Wraps the underlying I/O error raised while the encoded image was
    /// being written. The export is aborted but the stream is still released.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A raw direction code did not name one of the four directions.
    #[error("Invalid direction code: {0}")]
    InvalidDirection(u8),

    /// Maze dimensions can not host the starting cell at (1, 1).
    ///
    /// Both width and height must be at least 2 and fit in a signed
    /// 32-bit coordinate.
    #[error("Invalid maze size {width}x{height}, both sides must be at least 2")]
    InvalidSize { width: u32, height: u32 },

    #[error("Invalid pixel scale: {0}")]
    InvalidScale(u32),

    /// The bitmap does not fit the 16-bit size header of the raster command.
    #[error("Image {width}x{height} is too large for the raster header")]
    ImageTooLarge { width: usize, height: usize },
}
