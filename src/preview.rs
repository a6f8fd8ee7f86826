//! Text preview of a maze drawn with `_` and `|`.

use crate::{
    maze::{Direction, Maze},
    vector::Vector2,
};

fn mark(present: Option<bool>, c: char) -> char {
    if present == Some(true) {
        c
    } else {
        ' '
    }
}

impl Maze {
    /// Render the maze as lines of `_` and `|`.
    ///
    /// The first line only carries the top walls, so it starts with a space
    /// where the rows below have their left wall.
    pub fn preview(&self) -> String {
        let (width, height) = (self.width() as i32, self.height() as i32);
        let mut out = String::with_capacity((width as usize * 2 + 2) * (height as usize + 1));

        out.push(' ');
        for x in 0..width {
            out.push(mark(self.is_wall(Vector2::new(x, 0), Direction::Up), '_'));
            out.push(' ');
        }
        out.push('\n');

        for y in 0..height {
            out.push(mark(self.is_wall(Vector2::new(0, y), Direction::Left), '|'));
            for x in 0..width {
                let cell = Vector2::new(x, y);
                out.push(mark(self.is_wall(cell, Direction::Down), '_'));
                out.push(mark(self.is_wall(cell, Direction::Right), '|'));
            }
            out.push('\n');
        }

        out
    }
}
