//! Match detection: connected groups of same-colored balls.

use crate::grid::{Grid, Position, MIN_GROUP_SIZE};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// The 4-connected group of balls sharing the color of the ball at `seed`.
///
/// Empty or off-board seeds give an empty group. Order is breadth-first from the seed.
pub fn connected_group(grid: &Grid, seed: Position) -> Vec<Position> {
    let Some(color) = grid.color_at(seed) else {
        return Vec::new();
    };

    let mut group = Vec::new();
    let mut visited = HashSet::from([seed]);
    let mut queue = VecDeque::from([seed]);

    while let Some(pos) = queue.pop_front() {
        group.push(pos);
        for neighbor in pos.neighbors() {
            if grid.color_at(neighbor) == Some(color) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    group
}

/// All positions belonging to a group of at least [`MIN_GROUP_SIZE`] balls that
/// contains one of the seeds.
///
/// The result has no duplicates and is sorted row-major.
pub fn find_matches<I>(grid: &Grid, seeds: I) -> Vec<Position>
where
    I: IntoIterator<Item = Position>,
{
    let mut checked: HashSet<Position> = HashSet::new();
    let mut matches: BTreeSet<Position> = BTreeSet::new();

    for seed in seeds {
        if checked.contains(&seed) {
            continue;
        }

        let group = connected_group(grid, seed);
        checked.extend(group.iter().copied());
        if group.len() >= MIN_GROUP_SIZE {
            matches.extend(group);
        }
    }

    matches.into_iter().collect()
}
