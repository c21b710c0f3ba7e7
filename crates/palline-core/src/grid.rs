//! Board representation: ball colors, cells, positions and the square grid.
//!
//! This module contains:
//! - The six ball colors
//! - Cells with an opaque identity tag used by renderers to track balls between snapshots
//! - Positions on the fixed 11x11 board
//! - The `Grid` itself plus the read-only queries the rest of the engine builds on

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Side length of the square board
pub const GRID_SIZE: usize = 11;

/// Smallest connected same-color group that counts as a match
pub const MIN_GROUP_SIZE: usize = 2;

/// Number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Ball colors. Equality is the only meaningful comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl BallColor {
    /// All colors, in enumeration order
    pub const ALL: [BallColor; 6] = [
        BallColor::Red,
        BallColor::Green,
        BallColor::Blue,
        BallColor::Yellow,
        BallColor::Purple,
        BallColor::Orange,
    ];
}

/// Opaque identity of whatever occupies a cell.
///
/// Renderers diff identities between two snapshots to find which balls moved.
/// Gameplay never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub u64);

/// A single board slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Ball color, `None` for an empty slot
    pub color: Option<BallColor>,
    /// Identity of the occupant
    pub id: CellId,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.color.is_none()
    }
}

/// A board coordinate, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The fixed center slot, which starts every game empty
    pub const fn center() -> Self {
        Self::new(GRID_SIZE / 2, GRID_SIZE / 2)
    }

    /// Whether both coordinates lie inside the board
    pub fn is_in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    /// Step by a signed offset, returning `None` if the result leaves the board
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Position> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let pos = Position::new(row, col);
        pos.is_in_bounds().then_some(pos)
    }

    /// The in-bounds 4-neighbors (up, down, left, right)
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }

    fn index(&self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    fn from_index(index: usize) -> Self {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }
}

/// The square game board.
///
/// Cells are stored row-major. The grid also carries the counter it mints fresh
/// cell identities from, so a copy (for example a move preview) mints its own
/// identities without touching the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    cells: Vec<Cell>,
    next_id: u64,
}

/// Unchecked serialized form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    cells: Vec<Cell>,
    next_id: u64,
}

impl TryFrom<GridData> for Grid {
    type Error = String;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        if data.cells.len() != CELL_COUNT {
            return Err(format!(
                "grid must have {} cells, got {}",
                CELL_COUNT,
                data.cells.len()
            ));
        }
        // Fresh ids must not collide with ones already on the board
        let next_id = data
            .cells
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0)
            .max(data.next_id);
        Ok(Self {
            cells: data.cells,
            next_id,
        })
    }
}

impl Grid {
    /// Create a board with every slot empty
    pub fn empty() -> Self {
        Self::from_fn(|_| None)
    }

    /// Build a board by asking for the color of every position
    pub fn from_fn<F>(mut color_at: F) -> Self
    where
        F: FnMut(Position) -> Option<BallColor>,
    {
        let mut grid = Self {
            cells: Vec::with_capacity(CELL_COUNT),
            next_id: 0,
        };
        for index in 0..CELL_COUNT {
            let color = color_at(Position::from_index(index));
            let id = grid.mint_id();
            grid.cells.push(Cell { color, id });
        }
        grid
    }

    /// Get the cell at a position, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        if pos.is_in_bounds() {
            self.cells.get(pos.index())
        } else {
            None
        }
    }

    /// Color of the ball at a position; empty and out-of-bounds both give `None`
    pub fn color_at(&self, pos: Position) -> Option<BallColor> {
        self.get(pos).and_then(|cell| cell.color)
    }

    /// Whether a position is on the board and holds no ball
    pub fn is_vacant(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_empty)
    }

    /// Put a new ball (with a fresh identity) into a slot
    pub fn place(&mut self, pos: Position, color: BallColor) {
        if pos.is_in_bounds() {
            let id = self.mint_id();
            self.cells[pos.index()] = Cell {
                color: Some(color),
                id,
            };
        }
    }

    /// Empty a slot, giving it a fresh identity
    pub fn clear(&mut self, pos: Position) {
        if pos.is_in_bounds() {
            let id = self.mint_id();
            self.cells[pos.index()] = Cell { color: None, id };
        }
    }

    /// Move the occupant of `from` (identity included) into `to`, leaving `from` untouched.
    /// Callers are responsible for clearing `from` afterwards.
    pub(crate) fn copy_cell(&mut self, from: Position, to: Position) {
        self.cells[to.index()] = self.cells[from.index()];
    }

    /// Swap the occupants of two slots
    pub(crate) fn swap(&mut self, a: Position, b: Position) {
        self.cells.swap(a.index(), b.index());
    }

    /// Give every cell a fresh identity
    pub(crate) fn reassign_ids(&mut self) {
        for index in 0..self.cells.len() {
            let id = self.mint_id();
            self.cells[index].id = id;
        }
    }

    fn mint_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Iterate all cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Position::from_index(i), cell))
    }

    /// Row-major view for renderers
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(GRID_SIZE)
    }

    /// Positions currently holding a ball, row-major
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Total number of balls on the board
    pub fn ball_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Whether no ball is left on the board
    pub fn is_cleared(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    /// Number of remaining balls per color (colors with no balls are absent)
    pub fn color_counts(&self) -> HashMap<BallColor, usize> {
        let mut counts = HashMap::new();
        for color in self.cells.iter().filter_map(|c| c.color) {
            *counts.entry(color).or_insert(0) += 1;
        }
        counts
    }

    /// A move exists when some empty slot has a ball as a 4-neighbor
    pub fn has_legal_move(&self) -> bool {
        self.iter().any(|(pos, cell)| {
            cell.is_empty() && pos.neighbors().any(|n| self.color_at(n).is_some())
        })
    }

    /// Cells whose right or bottom neighbor has the same color.
    ///
    /// A cell appears once per offending neighbor, so the length of the list is
    /// the number of same-color adjacent pairs on the board.
    pub fn adjacency_violations(&self) -> Vec<Position> {
        let mut violations = Vec::new();
        for (pos, cell) in self.iter() {
            let Some(color) = cell.color else { continue };
            for neighbor in [pos.offset(0, 1), pos.offset(1, 0)].into_iter().flatten() {
                if self.color_at(neighbor) == Some(color) {
                    violations.push(pos);
                }
            }
        }
        violations
    }

    /// Positions whose occupant identity differs from `before` and that now hold a ball.
    ///
    /// After a committed move these are exactly the slots a ball moved into.
    pub fn changed_positions(&self, before: &Grid) -> Vec<Position> {
        self.iter()
            .zip(before.cells.iter())
            .filter(|((_, now), then)| now.id != then.id && !now.is_empty())
            .map(|((pos, _), _)| pos)
            .collect()
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}
