use log::debug;
use std::convert::TryFrom;
use std::io::Write;

use crate::{bitmap::Bitmap, error::Error};

/// Line feeds emitted before the cut by [`Printer::print_preview`].
const PREVIEW_FEED_LINES: usize = 4;

/// Byte layout wrapping the packed pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Binary PBM: `P4\n<width> <height>\n` then the rows.
    Pbm,
    /// ESC/POS raster bit image followed by a feed and a paper cut.
    EscPos,
}

/// Output configuration.
#[derive(Debug, Clone)]
pub struct Config {
    framing: Framing,
    feed_lines: u8,
    cut_at_end: bool,
}

impl Config {
    /// Initialize configuration with default values.
    ///
    /// Five line feeds and a cut follow an ESC/POS image. The PBM framing
    /// ignores both settings.
    ///
    /// # Example
    ///
    /// ```
    /// use maze_print::{Config, Framing};
    ///
    /// let config = Config::new(Framing::EscPos).feed_lines(3).cut_at_end(false);
    /// assert_eq!(config.framing(), Framing::EscPos);
    /// ```
    pub fn new(framing: Framing) -> Config {
        Config {
            framing,
            feed_lines: 5,
            cut_at_end: true,
        }
    }

    pub fn feed_lines(self, feed_lines: u8) -> Self {
        Config { feed_lines, ..self }
    }

    pub fn cut_at_end(self, flag: bool) -> Self {
        Config {
            cut_at_end: flag,
            ..self
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    fn header(&self, bitmap: &Bitmap) -> Result<Vec<u8>, Error> {
        let mut buf: Vec<u8> = Vec::new();

        match self.framing {
            Framing::Pbm => {
                buf.extend_from_slice(
                    format!("P4\n{} {}\n", bitmap.width(), bitmap.height()).as_bytes(),
                );
            }
            Framing::EscPos => {
                let too_large = || Error::ImageTooLarge {
                    width: bitmap.width(),
                    height: bitmap.height(),
                };
                let header_x = u16::try_from((bitmap.width() + 7) / 8).map_err(|_| too_large())?;
                let header_y = u16::try_from(bitmap.height()).map_err(|_| too_large())?;
                debug!("raster header: {} bytes x {} rows", header_x, header_y);

                buf.append(&mut [0x1D, 0x76, 0x30, 0x00].to_vec()); // GS v 0 : Print raster bit image
                buf.append(&mut header_x.to_le_bytes().to_vec());
                buf.append(&mut header_y.to_le_bytes().to_vec());
            }
        }
        Ok(buf)
    }

    fn trailer(&self) -> Vec<u8> {
        let mut buf: Vec<u8> = Vec::new();

        if self.framing == Framing::EscPos {
            buf.append(&mut vec![0x0A; self.feed_lines as usize]); // LF
            if self.cut_at_end {
                buf.append(&mut [0x1D, 0x56, 0x00].to_vec()); // GS V 0 : Full cut
            }
        }
        buf
    }
}

/// Encode `bitmap` with the framing and trailer selected by `config`.
pub fn encode(bitmap: &Bitmap, config: &Config) -> Result<Vec<u8>, Error> {
    let mut buf = config.header(bitmap)?;

    for mut row in bitmap.to_matrix() {
        buf.append(&mut row);
    }

    buf.append(&mut config.trailer());
    Ok(buf)
}

/// Write `bitmap` to `writer` and release the writer.
///
/// The writer is consumed, so it is dropped whether the write succeeds or fails.
pub fn export<W: Write>(bitmap: &Bitmap, config: Config, writer: W) -> Result<usize, Error> {
    let mut printer = Printer::new(writer, config);
    printer.print(bitmap)
}

/// Writes encoded images to an owned output stream.
pub struct Printer<W: Write> {
    writer: W,
    config: Config,
}

impl<W: Write> Printer<W> {
    pub fn new(writer: W, config: Config) -> Self {
        Printer { writer, config }
    }

    fn write(&mut self, buf: Vec<u8>) -> Result<usize, Error> {
        self.writer.write_all(&buf)?;
        self.writer.flush()?;
        debug!("wrote {} bytes", buf.len());
        Ok(buf.len())
    }

    /// Print a bitmap
    ///
    /// Returns the number of bytes written.
    pub fn print(&mut self, bitmap: &Bitmap) -> Result<usize, Error> {
        debug!(
            "printing {}x{} bitmap as {:?}",
            bitmap.width(),
            bitmap.height(),
            self.config.framing
        );
        let buf = encode(bitmap, &self.config)?;
        self.write(buf)
    }

    /// Print a text preview followed by a short feed and a paper cut.
    pub fn print_preview(&mut self, text: &str) -> Result<usize, Error> {
        let mut buf: Vec<u8> = text.as_bytes().to_vec();
        buf.append(&mut vec![b'\n'; PREVIEW_FEED_LINES]);
        buf.append(&mut [0x1D, 0x56, 0x00].to_vec()); // GS V 0 : Full cut
        self.write(buf)
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
