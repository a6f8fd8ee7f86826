use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::convert::TryFrom;

use crate::{bitmap::Bitmap, error::Error, vector::Vector2};

/*
  Walls live in one grid of (width + 1) x (2 * height + 1) cells. Even rows
  hold the horizontal walls, odd rows the vertical ones:

  00112233445
   _ _ _ _ _     0
  |_|_|_|_|_| 1, 2 => 0,0 1,0 2,0 3,0 4,0
  |_|_|_|_|_| 3, 4 => 0,1 1,1 2,1 3,1 4,1

  (x, y) => Up: (x, 2y)  Down: (x, 2y + 2)  Left: (x, 2y + 1)  Right: (x + 1, 2y + 1)
*/

const WALL: bool = true;
const SPACE: bool = false;

/// The carving walk always starts here, so a maze needs at least 2x2 cells.
pub const START_CELL: Vector2 = Vector2::ONE;

/// Smallest width and height accepted by [`Maze::new`].
pub const MIN_SIDE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Enumeration order used when listing possible moves.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step toward the neighbouring cell.
    pub fn delta(self) -> Vector2 {
        match self {
            Self::Up => -Vector2::UNIT_Y,
            Self::Down => Vector2::UNIT_Y,
            Self::Left => -Vector2::UNIT_X,
            Self::Right => Vector2::UNIT_X,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Up),
            1 => Ok(Self::Down),
            2 => Ok(Self::Left),
            3 => Ok(Self::Right),
            _ => Err(Error::InvalidDirection(code)),
        }
    }
}

/// Wall grid coordinate shared by `cell` and its neighbour in direction `d`.
pub fn wall_address(cell: Vector2, d: Direction) -> Vector2 {
    match d {
        Direction::Up => Vector2::new(cell.x, cell.y * 2),
        Direction::Down => Vector2::new(cell.x, cell.y * 2 + 2),
        Direction::Left => Vector2::new(cell.x, cell.y * 2 + 1),
        Direction::Right => Vector2::new(cell.x + 1, cell.y * 2 + 1),
    }
}

/// A rectangular perfect maze carved by randomized depth-first backtracking.
#[derive(Debug, Clone)]
pub struct Maze {
    width: i32,
    height: i32,
    scale: i32,
    revisiting: bool,
    walls: Vec<bool>,
    visited: Vec<bool>,
}

impl Maze {
    /// Create a fully walled, unvisited maze.
    ///
    /// `scale` is the pixel size of one cell in [`Maze::export`]. `revisiting`
    /// is kept for callers of [`Maze::is_path_possible`]; the carving walk
    /// itself never revisits.
    pub fn new(width: u32, height: u32, scale: u32, revisiting: bool) -> Result<Self, Error> {
        let invalid_size = || Error::InvalidSize { width, height };
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(invalid_size());
        }
        // the wall grid and pixel coordinates must stay addressable in i32
        let w = i32::try_from(width).map_err(|_| invalid_size())?;
        let h = i32::try_from(height).map_err(|_| invalid_size())?;
        h.checked_mul(2).ok_or_else(invalid_size)?;

        if scale == 0 {
            return Err(Error::InvalidScale(scale));
        }
        let s = i32::try_from(scale).map_err(|_| Error::InvalidScale(scale))?;
        if w.checked_mul(s).is_none() || h.checked_mul(s).is_none() {
            return Err(Error::InvalidScale(scale));
        }

        let cells = width as usize * height as usize;
        let wall_cells = (width as usize + 1) * (height as usize * 2 + 1);

        Ok(Maze {
            width: w,
            height: h,
            scale: s,
            revisiting,
            walls: vec![WALL; wall_cells],
            visited: vec![false; cells],
        })
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn scale(&self) -> u32 {
        self.scale as u32
    }

    pub fn revisiting(&self) -> bool {
        self.revisiting
    }

    fn contains(&self, cell: Vector2) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn cell_index(&self, cell: Vector2) -> usize {
        cell.y as usize * self.width as usize + cell.x as usize
    }

    fn wall_index(&self, wall: Vector2) -> usize {
        wall.y as usize * (self.width as usize + 1) + wall.x as usize
    }

    /// Whether the wall between `cell` and its neighbour in direction `d` stands.
    ///
    /// Cells outside the maze report `None`.
    pub fn is_wall(&self, cell: Vector2, d: Direction) -> Option<bool> {
        if !self.contains(cell) {
            return None;
        }
        Some(self.walls[self.wall_index(wall_address(cell, d))])
    }

    pub fn is_visited(&self, cell: Vector2) -> Option<bool> {
        if !self.contains(cell) {
            return None;
        }
        Some(self.visited[self.cell_index(cell)])
    }

    /// Number of wall grid cells that have been carved open.
    pub fn cleared_walls(&self) -> usize {
        self.walls.iter().filter(|&&w| w == SPACE).count()
    }

    /// Whether the walk may step from `cell` in direction `d`.
    ///
    /// The destination must be inside the maze and unvisited. Unless
    /// `revisit` is set, the wall between the two cells must also still be
    /// standing; with `revisit` the wall state is not consulted at all.
    pub fn is_path_possible(&self, cell: Vector2, d: Direction, revisit: bool) -> bool {
        let dest = cell + d.delta();

        if !self.contains(dest) {
            return false;
        }

        if !revisit && self.walls[self.wall_index(wall_address(cell, d))] != WALL {
            return false;
        }

        !self.visited[self.cell_index(dest)]
    }

    /// Directions in [`Direction::ALL`] order for which a step is possible.
    pub fn possible_directions(&self, cell: Vector2, revisit: bool) -> Vec<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|&d| self.is_path_possible(cell, d, revisit))
            .collect()
    }

    fn visit(&mut self, cell: Vector2) {
        let i = self.cell_index(cell);
        self.visited[i] = true;
    }

    fn carve(&mut self, cell: Vector2, d: Direction) {
        let i = self.wall_index(wall_address(cell, d));
        self.walls[i] = SPACE;
    }

    /// Carve the maze with a ChaCha8 generator seeded from `seed`.
    pub fn generate_seeded(&mut self, seed: u64) {
        debug!("seeding maze generator with {}", seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(&mut rng);
    }

    /// Carve passages with a randomized depth-first walk from [`START_CELL`].
    ///
    /// Each step draws exactly one index from `rng` to pick among the
    /// possible directions, so the same generator state always yields the
    /// same maze. The walk only enters unvisited cells, which keeps the
    /// carved passages a spanning tree.
    ///
    /// Any earlier run is discarded: the grid is walled up again first.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        info!("generating {}x{} maze", self.width, self.height);

        self.walls.iter_mut().for_each(|w| *w = WALL);
        self.visited.iter_mut().for_each(|v| *v = false);

        let mut pos = START_CELL;
        let mut history: Vec<Vector2> = Vec::new();
        let mut visits: usize = 1;

        self.visit(pos);
        history.push(pos);

        loop {
            let directions = self.possible_directions(pos, false);

            if directions.is_empty() {
                match history.pop() {
                    Some(prev) => pos = prev,
                    None => break,
                }
                continue;
            }

            let chosen = directions[rng.gen_range(0..directions.len())];
            self.carve(pos, chosen);
            pos += chosen.delta();
            self.visit(pos);
            history.push(pos);
            visits += 1;
        }

        debug!(
            "maze complete: {} cells visited, {} walls cleared",
            visits,
            self.cleared_walls()
        );
    }

    fn draw_wall(&self, cell: Vector2, d: Direction, img: &mut Bitmap) {
        let wall = wall_address(cell, d);

        if self.walls[self.wall_index(wall)] != WALL {
            return;
        }

        let is_horizontal = wall.y % 2 == 0;

        let a = Vector2::new(
            (wall.x * self.scale - 1).max(0),
            ((wall.y - wall.y % 2) / 2 * self.scale - 1).max(0),
        );
        let b = if is_horizontal {
            a + Vector2::UNIT_X * (self.scale - 1)
        } else {
            a + Vector2::UNIT_Y * (self.scale - 1)
        };

        img.draw_line(a, b, true);
    }

    /// Rasterize the standing walls into a `width * scale x height * scale` bitmap.
    ///
    /// Shared walls are drawn once: the top row contributes its Up walls, the
    /// left column its Left walls, and every cell its Down and Right walls.
    /// Two checker board patches mark the top left and bottom right corners.
    pub fn export(&self) -> Bitmap {
        let mut img = Bitmap::new(
            (self.width * self.scale) as usize,
            (self.height * self.scale) as usize,
        );
        debug!("exporting maze to {}x{} bitmap", img.width(), img.height());

        img.checker_board(Vector2::ZERO, Vector2::ONE * self.scale);
        img.checker_board(
            Vector2::new(self.width - 1, self.height - 1) * self.scale,
            Vector2::ONE * (self.scale - 1),
        );

        for y in 0..self.height {
            self.draw_wall(Vector2::new(0, y), Direction::Left, &mut img);
            for x in 0..self.width {
                let cell = Vector2::new(x, y);
                if y == 0 {
                    self.draw_wall(cell, Direction::Up, &mut img);
                }
                self.draw_wall(cell, Direction::Down, &mut img);
                self.draw_wall(cell, Direction::Right, &mut img);
            }
        }

        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_addresses_follow_the_doubled_row_layout() {
        let cell = Vector2::new(2, 2);

        assert_eq!(wall_address(cell, Direction::Up), Vector2::new(2, 4));
        assert_eq!(wall_address(cell, Direction::Down), Vector2::new(2, 6));
        assert_eq!(wall_address(cell, Direction::Left), Vector2::new(2, 5));
        assert_eq!(wall_address(cell, Direction::Right), Vector2::new(3, 5));

        let cell = Vector2::new(3, 0);
        assert_eq!(wall_address(cell, Direction::Up), Vector2::new(3, 0));
        assert_eq!(wall_address(cell, Direction::Down), Vector2::new(3, 2));
        assert_eq!(wall_address(cell, Direction::Left), Vector2::new(3, 1));
        assert_eq!(wall_address(cell, Direction::Right), Vector2::new(4, 1));
    }

    #[test]
    fn neighbours_share_walls() {
        for x in 0..5 {
            for y in 0..5 {
                let cell = Vector2::new(x, y);
                for &d in Direction::ALL.iter() {
                    let neighbour = cell + d.delta();
                    assert_eq!(
                        wall_address(cell, d),
                        wall_address(neighbour, d.opposite()),
                        "{:?} {:?}",
                        cell,
                        d
                    );
                }
            }
        }
    }

    #[test]
    fn direction_deltas() {
        assert_eq!(Direction::Up.delta(), Vector2::new(0, -1));
        assert_eq!(Direction::Down.delta(), Vector2::new(0, 1));
        assert_eq!(Direction::Left.delta(), Vector2::new(-1, 0));
        assert_eq!(Direction::Right.delta(), Vector2::new(1, 0));
    }

    #[test]
    fn direction_codes() {
        assert_eq!(Direction::try_from(3).unwrap(), Direction::Right);
        assert!(matches!(
            Direction::try_from(4),
            Err(Error::InvalidDirection(4))
        ));
    }

    #[test]
    fn rejects_mazes_without_a_start_cell() {
        assert!(matches!(
            Maze::new(1, 5, 4, false),
            Err(Error::InvalidSize { width: 1, height: 5 })
        ));
        assert!(matches!(
            Maze::new(5, 0, 4, false),
            Err(Error::InvalidSize { .. })
        ));
        assert!(matches!(
            Maze::new(5, 5, 0, false),
            Err(Error::InvalidScale(0))
        ));
        assert!(Maze::new(2, 2, 1, false).is_ok());
    }

    #[test]
    fn new_maze_is_fully_walled() {
        let maze = Maze::new(3, 4, 5, true).unwrap();

        assert_eq!(maze.cleared_walls(), 0);
        assert!(maze.revisiting());
        for y in 0..4 {
            for x in 0..3 {
                let cell = Vector2::new(x, y);
                assert_eq!(maze.is_visited(cell), Some(false));
                for &d in Direction::ALL.iter() {
                    assert_eq!(maze.is_wall(cell, d), Some(true));
                }
            }
        }
        assert_eq!(maze.is_wall(Vector2::new(3, 0), Direction::Up), None);
    }

    #[test]
    fn moves_are_bounded_by_the_grid() {
        let maze = Maze::new(3, 3, 4, false).unwrap();

        assert_eq!(
            maze.possible_directions(Vector2::ZERO, false),
            vec![Direction::Down, Direction::Right]
        );
        assert_eq!(
            maze.possible_directions(Vector2::ONE, false),
            Direction::ALL.to_vec()
        );
        assert_eq!(
            maze.possible_directions(Vector2::new(2, 2), false),
            vec![Direction::Up, Direction::Left]
        );
    }

    #[test]
    fn open_walls_block_moves_unless_revisiting() {
        let mut maze = Maze::new(3, 3, 4, false).unwrap();
        maze.carve(Vector2::ONE, Direction::Right);

        assert!(!maze.is_path_possible(Vector2::ONE, Direction::Right, false));
        assert!(maze.is_path_possible(Vector2::ONE, Direction::Right, true));

        maze.visit(Vector2::new(2, 1));
        assert!(!maze.is_path_possible(Vector2::ONE, Direction::Right, true));
    }

    #[test]
    fn generation_visits_every_cell() {
        let mut maze = Maze::new(6, 4, 8, false).unwrap();
        maze.generate_seeded(389055);

        for y in 0..4 {
            for x in 0..6 {
                assert_eq!(maze.is_visited(Vector2::new(x, y)), Some(true));
            }
        }
        assert_eq!(maze.cleared_walls(), 6 * 4 - 1);
    }

    #[test]
    fn regenerating_starts_from_a_walled_grid() {
        let mut reused = Maze::new(8, 6, 4, false).unwrap();
        reused.generate_seeded(1);
        reused.generate_seeded(2);

        let mut fresh = Maze::new(8, 6, 4, false).unwrap();
        fresh.generate_seeded(2);
        let mut first = Maze::new(8, 6, 4, false).unwrap();
        first.generate_seeded(1);

        assert_eq!(reused.walls, fresh.walls);
        assert_eq!(reused.visited, fresh.visited);
        assert_ne!(reused.walls, first.walls);
        assert_eq!(reused.cleared_walls(), 8 * 6 - 1);
    }

    #[test]
    fn generation_keeps_the_outer_boundary() {
        let mut maze = Maze::new(5, 5, 8, false).unwrap();
        maze.generate_seeded(7);

        for i in 0..5 {
            assert_eq!(maze.is_wall(Vector2::new(i, 0), Direction::Up), Some(true));
            assert_eq!(maze.is_wall(Vector2::new(i, 4), Direction::Down), Some(true));
            assert_eq!(maze.is_wall(Vector2::new(0, i), Direction::Left), Some(true));
            assert_eq!(maze.is_wall(Vector2::new(4, i), Direction::Right), Some(true));
        }
    }

    #[test]
    fn export_size_and_markers() {
        let maze = Maze::new(4, 3, 10, false).unwrap();
        let img = maze.export();

        assert_eq!(img.width(), 40);
        assert_eq!(img.height(), 30);
        // fully walled grid: every cell corner is inked
        assert_eq!(img.get(Vector2::new(9, 9)), Some(true));
        assert_eq!(img.get(Vector2::new(38, 28)), Some(true));
        // edge clamp: neither the right wall cap nor the bottom wall cap reaches the corner
        assert_eq!(img.get(Vector2::new(39, 29)), Some(false));
        // cell interiors stay blank
        assert_eq!(img.get(Vector2::new(15, 15)), Some(false));
        // the checker board survives in the middle of the top left cell
        assert_eq!(img.get(Vector2::new(4, 5)), Some(true));
        assert_eq!(img.get(Vector2::new(5, 5)), Some(false));
        // and in the bottom right one
        assert_eq!(img.get(Vector2::new(35, 24)), Some(true));
        assert_eq!(img.get(Vector2::new(34, 24)), Some(false));
    }

    #[test]
    fn export_leaves_carved_passages_open() {
        let mut maze = Maze::new(4, 3, 10, false).unwrap();
        let full = maze.export();
        maze.carve(Vector2::new(1, 1), Direction::Right);
        let carved = maze.export();

        // the vertical wall between (1, 1) and (2, 1) runs along x = 19
        assert_eq!(full.get(Vector2::new(19, 15)), Some(true));
        assert_eq!(carved.get(Vector2::new(19, 15)), Some(false));
        assert!(carved.count_ink() < full.count_ink());
    }
}
