//! Train-push movement.
//!
//! Dragging a ball pushes the whole run of balls behind it ("train") one cell at a
//! time along an axis. Each push needs an empty, in-bounds cell right in front of the
//! dragged ball; the first push that cannot happen ends the move.

use crate::actions::MoveRequest;
use crate::grid::{Grid, Position};
use serde::{Deserialize, Serialize};

/// Axis a move travels along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Along a row; positive steps go right
    Horizontal,
    /// Along a column; positive steps go down
    Vertical,
}

impl Axis {
    /// Row/column delta of one step in the given direction (`sign` is +1 or -1)
    pub fn delta(&self, sign: isize) -> (isize, isize) {
        match self {
            Axis::Horizontal => (0, sign),
            Axis::Vertical => (sign, 0),
        }
    }
}

/// Outcome of simulating a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    /// The board after all successful pushes (the input board if nothing moved)
    pub grid: Grid,
    /// Whether at least one push succeeded
    pub moved: bool,
    /// Number of successful single-cell pushes
    pub shifts: u32,
}

impl MoveResult {
    fn unchanged(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            moved: false,
            shifts: 0,
        }
    }
}

/// Simulate pushing the ball at `from` by `steps` cells along `axis`.
///
/// The input board is never modified, so this doubles as a preview.
pub fn simulate(grid: &Grid, from: Position, axis: Axis, steps: i32) -> MoveResult {
    if steps == 0 {
        return MoveResult::unchanged(grid);
    }

    let (d_row, d_col) = axis.delta(if steps > 0 { 1 } else { -1 });
    let mut next = grid.clone();
    let mut anchor = from;
    let mut shifts = 0;

    for _ in 0..steps.unsigned_abs() {
        match push_train(&mut next, anchor, d_row, d_col) {
            Some(new_anchor) => {
                anchor = new_anchor;
                shifts += 1;
            }
            None => break,
        }
    }

    if shifts == 0 {
        return MoveResult::unchanged(grid);
    }

    MoveResult {
        grid: next,
        moved: true,
        shifts,
    }
}

/// Simulate a move request
pub fn simulate_request(grid: &Grid, request: &MoveRequest) -> MoveResult {
    simulate(grid, request.from, request.axis, request.steps)
}

/// Push the train whose leading ball sits at `anchor` by one cell.
///
/// Returns the new position of the leading ball, or `None` (leaving the board
/// untouched) if the anchor is empty or off the board, or the cell ahead is
/// blocked or off the board.
fn push_train(grid: &mut Grid, anchor: Position, d_row: isize, d_col: isize) -> Option<Position> {
    grid.color_at(anchor)?;
    let target = anchor.offset(d_row, d_col)?;
    if !grid.is_vacant(target) {
        return None;
    }

    let mut train = vec![anchor];
    let mut cursor = anchor;
    while let Some(behind) = cursor.offset(-d_row, -d_col) {
        if grid.color_at(behind).is_none() {
            break;
        }
        train.push(behind);
        cursor = behind;
    }

    // Leading ball first, so nothing is overwritten before it has been moved
    let mut dest = target;
    for &pos in &train {
        grid.copy_cell(pos, dest);
        dest = pos;
    }
    grid.clear(dest);

    Some(target)
}

/// Number of empty cells directly in front of `from` in the given direction
fn free_run(grid: &Grid, from: Position, d_row: isize, d_col: isize) -> usize {
    let mut run = 0;
    let mut cursor = from;
    while let Some(next) = cursor.offset(d_row, d_col) {
        if !grid.is_vacant(next) {
            break;
        }
        run += 1;
        cursor = next;
    }
    run
}

/// Every move that would shift at least one ball.
///
/// Pushing further than the free run ahead of a ball gives the same board as
/// pushing exactly that far, so only distinct step counts are listed.
pub fn legal_moves(grid: &Grid) -> Vec<MoveRequest> {
    let mut moves = Vec::new();
    for from in grid.occupied_positions() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            for sign in [1i32, -1] {
                let (d_row, d_col) = axis.delta(sign as isize);
                let run = free_run(grid, from, d_row, d_col);
                for distance in 1..=run as i32 {
                    moves.push(MoveRequest::new(from, axis, sign * distance));
                }
            }
        }
    }
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BallColor, GRID_SIZE};
    use pretty_assertions::assert_eq;

    fn board_with(balls: &[(usize, usize, BallColor)]) -> Grid {
        let mut grid = Grid::empty();
        for &(row, col, color) in balls {
            grid.place(Position::new(row, col), color);
        }
        grid
    }

    fn occupied(grid: &Grid) -> Vec<(Position, BallColor)> {
        grid.iter()
            .filter_map(|(pos, cell)| cell.color.map(|c| (pos, c)))
            .collect()
    }

    #[test]
    fn test_zero_steps_is_a_no_op() {
        let grid = board_with(&[(5, 5, BallColor::Red)]);
        let result = simulate(&grid, Position::new(5, 5), Axis::Horizontal, 0);
        assert!(!result.moved);
        assert_eq!(result.shifts, 0);
        assert_eq!(result.grid, grid);
    }

    #[test]
    fn test_single_ball_slides_full_distance() {
        let grid = board_with(&[(5, 5, BallColor::Red)]);
        let result = simulate(&grid, Position::new(5, 5), Axis::Horizontal, 3);

        assert!(result.moved);
        assert_eq!(result.shifts, 3);
        assert_eq!(
            occupied(&result.grid),
            vec![(Position::new(5, 8), BallColor::Red)]
        );
    }

    #[test]
    fn test_train_stops_at_blocker() {
        let grid = board_with(&[
            (5, 5, BallColor::Red),
            (5, 6, BallColor::Blue),
            (5, 8, BallColor::Green),
        ]);
        let result = simulate(&grid, Position::new(5, 6), Axis::Horizontal, 2);

        assert!(result.moved);
        assert_eq!(result.shifts, 1);
        assert_eq!(
            occupied(&result.grid),
            vec![
                (Position::new(5, 6), BallColor::Red),
                (Position::new(5, 7), BallColor::Blue),
                (Position::new(5, 8), BallColor::Green),
            ]
        );
    }

    #[test]
    fn test_blocked_first_push_returns_input() {
        let grid = board_with(&[(5, 5, BallColor::Red), (5, 6, BallColor::Blue)]);
        let result = simulate(&grid, Position::new(5, 5), Axis::Horizontal, 1);
        assert!(!result.moved);
        assert_eq!(result.grid, grid);
    }

    #[test]
    fn test_board_edge_blocks() {
        let grid = board_with(&[(0, GRID_SIZE - 1, BallColor::Red)]);
        let right = simulate(&grid, Position::new(0, GRID_SIZE - 1), Axis::Horizontal, 2);
        assert!(!right.moved);
        let up = simulate(&grid, Position::new(0, GRID_SIZE - 1), Axis::Vertical, -1);
        assert!(!up.moved);
    }

    #[test]
    fn test_empty_or_out_of_bounds_origin_does_not_move() {
        let grid = board_with(&[(10, 5, BallColor::Red)]);
        assert!(!simulate(&grid, Position::new(3, 3), Axis::Vertical, 1).moved);
        assert!(!simulate(&grid, Position::new(GRID_SIZE, 5), Axis::Vertical, -1).moved);
        assert!(!simulate(&grid, Position::new(99, 99), Axis::Horizontal, 4).moved);
    }

    #[test]
    fn test_negative_vertical_push_drags_train_behind() {
        let grid = board_with(&[
            (6, 2, BallColor::Yellow),
            (7, 2, BallColor::Purple),
            (8, 2, BallColor::Orange),
        ]);
        let result = simulate(&grid, Position::new(6, 2), Axis::Vertical, -2);

        assert!(result.moved);
        assert_eq!(result.shifts, 2);
        assert_eq!(
            occupied(&result.grid),
            vec![
                (Position::new(4, 2), BallColor::Yellow),
                (Position::new(5, 2), BallColor::Purple),
                (Position::new(6, 2), BallColor::Orange),
            ]
        );
    }

    #[test]
    fn test_train_ends_at_first_gap() {
        let grid = board_with(&[
            (5, 3, BallColor::Red),
            (5, 4, BallColor::Blue),
            (5, 5, BallColor::Green),
            (5, 7, BallColor::Yellow),
        ]);
        let result = simulate(&grid, Position::new(5, 3), Axis::Horizontal, -1);
        assert!(result.moved);
        assert_eq!(
            occupied(&result.grid),
            vec![
                (Position::new(5, 2), BallColor::Red),
                (Position::new(5, 3), BallColor::Blue),
                (Position::new(5, 4), BallColor::Green),
                (Position::new(5, 7), BallColor::Yellow),
            ]
        );
    }

    #[test]
    fn test_identities_travel_with_balls() {
        let grid = board_with(&[(2, 2, BallColor::Red), (2, 1, BallColor::Blue)]);
        let red_id = grid.get(Position::new(2, 2)).unwrap().id;
        let blue_id = grid.get(Position::new(2, 1)).unwrap().id;
        let trailing_id = grid.get(Position::new(2, 1)).unwrap().id;

        let result = simulate(&grid, Position::new(2, 2), Axis::Horizontal, 1);
        assert_eq!(result.grid.get(Position::new(2, 3)).unwrap().id, red_id);
        assert_eq!(result.grid.get(Position::new(2, 2)).unwrap().id, blue_id);

        let vacated = result.grid.get(Position::new(2, 1)).unwrap();
        assert!(vacated.is_empty());
        assert_ne!(vacated.id, trailing_id);

        let changed = result.grid.changed_positions(&grid);
        assert_eq!(changed, vec![Position::new(2, 2), Position::new(2, 3)]);
    }

    #[test]
    fn test_simulate_does_not_touch_input() {
        let grid = board_with(&[(4, 4, BallColor::Green)]);
        let snapshot = grid.clone();
        let first = simulate(&grid, Position::new(4, 4), Axis::Vertical, 3);
        let second = simulate(&grid, Position::new(4, 4), Axis::Vertical, 3);
        assert_eq!(grid, snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_legal_moves_on_single_ball() {
        let grid = board_with(&[(0, 0, BallColor::Red)]);
        let moves = legal_moves(&grid);
        // Right and down, each up to the far edge
        assert_eq!(moves.len(), 2 * (GRID_SIZE - 1));
        assert!(moves.iter().all(|m| m.steps > 0));
        for m in &moves {
            assert!(simulate_request(&grid, m).moved);
        }
    }

    #[test]
    fn test_legal_moves_empty_when_board_is_full() {
        let full = Grid::from_fn(|_| Some(BallColor::Red));
        assert!(legal_moves(&full).is_empty());
        assert!(legal_moves(&Grid::empty()).is_empty());
    }
}
