//! Property tests for the movement, matching and generation kernels.
//!
//! Invariants covered:
//! - A push never creates, destroys or recolors a ball.
//! - `moved` is set exactly when the board changed, and shifts never exceed the request.
//! - Matches are sorted, unique, occupied, and each belongs to a large enough group.
//! - Generated boards are balanced, leave the center empty, and repair never gets worse.
//! - Over a rollout, balls on the board plus points scored stay constant.

use palline_core::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;

fn board_strategy() -> impl Strategy<Value = Grid> {
    prop::collection::vec(prop::option::weighted(0.6, 0usize..6), GRID_SIZE * GRID_SIZE).prop_map(
        |slots| {
            let mut slots = slots.into_iter();
            Grid::from_fn(|_| slots.next().flatten().map(|i| BallColor::ALL[i]))
        },
    )
}

fn position_strategy() -> impl Strategy<Value = Position> {
    (0..GRID_SIZE, 0..GRID_SIZE).prop_map(|(row, col)| Position::new(row, col))
}

fn axis_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn colors(grid: &Grid) -> HashMap<BallColor, usize> {
    grid.color_counts()
}

proptest! {
    #[test]
    fn push_conserves_balls(
        grid in board_strategy(),
        from in position_strategy(),
        axis in axis_strategy(),
        steps in -12i32..=12,
    ) {
        let result = simulate(&grid, from, axis, steps);

        prop_assert_eq!(colors(&result.grid), colors(&grid));
        prop_assert!(result.shifts <= steps.unsigned_abs());
        prop_assert_eq!(result.moved, result.shifts > 0);
        if result.moved {
            prop_assert_ne!(&result.grid, &grid);
        } else {
            prop_assert_eq!(&result.grid, &grid);
        }
    }

    #[test]
    fn every_listed_move_is_accepted(grid in board_strategy()) {
        for request in legal_moves(&grid).into_iter().take(40) {
            let resolved = resolve_move(&grid, &request);
            prop_assert!(resolved.is_ok());
            let resolved = resolved.unwrap();
            prop_assert!(!resolved.moved.is_empty());
            prop_assert_eq!(
                resolved.grid.ball_count() + resolved.matches.len(),
                grid.ball_count()
            );
        }
    }

    #[test]
    fn matches_are_well_formed(
        grid in board_strategy(),
        seeds in prop::collection::vec(position_strategy(), 0..20),
    ) {
        let found = find_matches(&grid, seeds.iter().copied());

        prop_assert!(found.windows(2).all(|w| w[0] < w[1]));
        for pos in &found {
            prop_assert!(grid.color_at(*pos).is_some());
            prop_assert!(connected_group(&grid, *pos).len() >= MIN_GROUP_SIZE);
        }
        for seed in &seeds {
            let group = connected_group(&grid, *seed);
            if group.len() >= MIN_GROUP_SIZE {
                prop_assert!(group.iter().all(|p| found.contains(p)));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn generated_boards_are_balanced(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (grid, report) = generate_with_report(&mut rng);

        prop_assert!(grid.is_vacant(Position::center()));
        prop_assert_eq!(grid.ball_count(), GRID_SIZE * GRID_SIZE - 1);
        for color in BallColor::ALL {
            prop_assert_eq!(colors(&grid).get(&color).copied(), Some(20));
        }
        prop_assert!(report.violation_history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert_eq!(
            report.violation_history.last().copied(),
            Some(grid.adjacency_violations().len())
        );
    }

    #[test]
    fn rollout_keeps_every_ball_accounted_for(seed in any::<u64>(), turns in 1usize..60) {
        let mut engine = TurnEngine::with_seed(3, seed).unwrap();
        engine.start().unwrap();
        let mut bot = Bot::with_seed(1, BotDifficulty::Easy, seed);
        let total = engine.grid().ball_count() as u32;

        for _ in 0..turns {
            if engine.state().is_finished() {
                break;
            }
            bot.player_id = engine.current_player();
            let request = bot.choose_move(engine.state()).unwrap();
            engine.attempt_move(request);

            let scored: u32 = engine.players().iter().map(|p| p.score).sum();
            prop_assert_eq!(engine.grid().ball_count() as u32 + scored, total);
        }
    }
}
