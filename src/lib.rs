//! Printable Maze Generator
//!
//! This crate carves perfect mazes on a rectangular grid and rasterizes them
//! into 1-bit bitmaps, ready to be written as a binary PBM image or sent to an
//! ESC/POS thermal receipt printer.
//!
//! # Example
//!
//! ```rust
//! use maze_print::{encode, Config, Framing, Maze};
//!
//! let mut maze = Maze::new(8, 6, 10, false).unwrap();
//! maze.generate_seeded(389055);
//!
//! let bitmap = maze.export();
//! let bytes = encode(&bitmap, &Config::new(Framing::EscPos)).unwrap();
//! assert_eq!(&bytes[..4], &[0x1D, 0x76, 0x30, 0x00]);
//! ```

mod bitmap;
mod error;
mod maze;
mod preview;
mod printer;
mod vector;

pub use crate::{
    bitmap::Bitmap,
    error::Error,
    maze::{wall_address, Direction, Maze, MIN_SIDE, START_CELL},
    printer::{encode, export, Config, Framing, Printer},
    vector::Vector2,
};

/// Type alias for 1-bit bitmap data.
///
/// Each inner `Vec<u8>` represents a single row of pixels, with 8 pixels
/// packed into each byte, most significant bit first. A row whose width is
/// not a multiple of 8 ends with a zero padded byte.
pub type Matrix = Vec<Vec<u8>>;
