//! Monochrome pixel grid.
//!
//! A `Bitmap` is a `width x height` grid of booleans where `true` is an inked
//! pixel. The maze exporter draws into it with [`Bitmap::draw_line`] and
//! [`Bitmap::checker_board`], then the printer packs it into 1-bit rows.

use crate::{vector::Vector2, Matrix};

/// Radius of the blob stamped at every step of a line.
const LINE_BODY_RADIUS: i32 = 3;
/// Radius of the wider blob stamped on the final point of a line.
const LINE_CAP_RADIUS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    data: Vec<bool>,
}

impl Bitmap {
    /// Create a blank bitmap with every pixel cleared.
    pub fn new(width: usize, height: usize) -> Self {
        Bitmap {
            width,
            height,
            data: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, p: Vector2) -> Option<usize> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let (x, y) = (p.x as usize, p.y as usize);
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// Read a pixel. Coordinates outside the image read as `None`.
    pub fn get(&self, p: Vector2) -> Option<bool> {
        self.index(p).map(|i| self.data[i])
    }

    /// Write a pixel. Writes outside the image are ignored.
    pub fn set(&mut self, p: Vector2, value: bool) {
        if let Some(i) = self.index(p) {
            self.data[i] = value;
        }
    }

    /// Number of inked pixels.
    pub fn count_ink(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Set a square block of pixels around `center`.
    ///
    /// The block reaches `(radius - 1) / 2` pixels to each side. Near an edge
    /// the side that would leave the image is cut back to the center line
    /// instead of the whole block shrinking, so a blob hugging the right or
    /// bottom edge only covers pixels up to and including `center`.
    pub fn stamp_blob(&mut self, center: Vector2, radius: i32, value: bool) {
        let range = (radius - 1) / 2;
        let (w, h) = (self.width as i32, self.height as i32);

        let x_start = if center.x >= range { -range } else { 0 };
        let x_end = if center.x < w - range { range + 1 } else { 1 };
        let y_start = if center.y >= range { -range } else { 0 };
        let y_end = if center.y < h - range { range + 1 } else { 1 };

        for dx in x_start..x_end {
            for dy in y_start..y_end {
                self.set(center + Vector2::new(dx, dy), value);
            }
        }
    }

    /// Draw a thick line from `a` to `b` with Bresenham's algorithm.
    ///
    /// Every visited point except `b` gets a radius 3 blob, then `b` gets a
    /// radius 5 cap so joints between segments come out solid.
    pub fn draw_line(&mut self, a: Vector2, b: Vector2, value: bool) {
        let dx = (b.x - a.x).abs();
        let sx = if a.x < b.x { 1 } else { -1 };
        let dy = -(b.y - a.y).abs();
        let sy = if a.y < b.y { 1 } else { -1 };

        let mut err = dx + dy;
        let mut p = a;

        while p != b {
            self.stamp_blob(p, LINE_BODY_RADIUS, value);

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                p.x += sx;
            }
            if e2 <= dx {
                err += dx;
                p.y += sy;
            }
        }

        self.stamp_blob(p, LINE_CAP_RADIUS, value);
    }

    /// Fill a `size.x x size.y` rectangle at `origin` with alternating pixels.
    ///
    /// The pixel at local offset (x, y) is inked when exactly one of x and y is odd.
    pub fn checker_board(&mut self, origin: Vector2, size: Vector2) {
        for x in 0..size.x {
            for y in 0..size.y {
                let color = (x % 2) ^ (y % 2) == 1;
                self.set(origin + Vector2::new(x, y), color);
            }
        }
    }

    /// Pack the pixels into 1-bit rows, most significant bit first.
    ///
    /// Each row starts on a fresh byte; a trailing partial byte is padded
    /// with zero bits.
    pub fn to_matrix(&self) -> Matrix {
        let row_bytes = (self.width + 7) / 8;
        let mut matrix = Matrix::with_capacity(self.height);

        for y in 0..self.height {
            let row = &self.data[y * self.width..(y + 1) * self.width];
            let mut buf: Vec<u8> = Vec::with_capacity(row_bytes);
            let mut tmp: u8 = 0x00;
            let mut bits = 0;

            for &pixel in row {
                tmp = (tmp << 1) | pixel as u8;
                bits += 1;
                if bits == 8 {
                    buf.push(tmp);
                    tmp = 0x00;
                    bits = 0;
                }
            }
            if bits != 0 {
                buf.push(tmp << (8 - bits));
            }
            matrix.push(buf);
        }

        matrix
    }
}
