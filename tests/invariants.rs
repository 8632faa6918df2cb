//! Property tests for the simulation's invariants over random games.

use std::collections::HashSet;

use arcade_snake::game::{
    Cell, GameConfig, GameState, GridSimulation, Heading, Phase, TickEvent,
};
use arcade_snake::store::MemoryScoreStore;
use proptest::prelude::*;

/// Small board with frequent special food so every rule gets exercised
fn busy_config() -> GameConfig {
    let mut config = GameConfig::new(8, 8);
    config.bonus.spawn_chance = 0.3;
    config.bonus.cooldown_ticks = 3;
    config.bonus.lifetime_ticks = 12;
    config.hazard.spawn_chance = 0.3;
    config.hazard.cooldown_ticks = 4;
    config.hazard.lifetime_ticks = 12;
    config.points_per_level = 2;
    config
}

fn heading() -> impl Strategy<Value = Heading> {
    prop_oneof![
        Just(Heading::Up),
        Just(Heading::Down),
        Just(Heading::Left),
        Just(Heading::Right),
    ]
}

fn check_layout(state: &GameState) -> Result<(), TestCaseError> {
    let cells: Vec<Cell> = state.snake.cells().collect();
    let unique: HashSet<Cell> = cells.iter().copied().collect();
    prop_assert_eq!(unique.len(), cells.len(), "snake overlaps itself");
    prop_assert!(cells.iter().all(|c| state.is_in_bounds(*c)));
    prop_assert!(cells.iter().all(|c| !state.is_wall(*c)));

    let mut item_cells = HashSet::new();
    for item in state.food_items() {
        prop_assert!(state.is_in_bounds(item.cell));
        prop_assert!(!state.snake.contains(item.cell));
        prop_assert!(!state.is_wall(item.cell));
        prop_assert!(item_cells.insert(item.cell), "two items share a cell");
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_games_keep_invariants(
        seed in any::<u64>(),
        moves in prop::collection::vec(prop::option::of(heading()), 1..300),
    ) {
        let config = busy_config();
        let min_len = config.min_snake_length;
        let mut sim = GridSimulation::seeded(config, MemoryScoreStore::new(), seed);
        sim.start();

        for next in moves {
            if let Some(h) = next {
                sim.set_direction(h);
            }

            let before: Vec<Cell> = sim.state().snake.cells().collect();
            let level_before = sim.state().level;
            let state = sim.state();
            let target = state.snake.head().moved_in(state.pending_heading);
            let legal = state.is_in_bounds(target)
                && !state.snake.contains(target)
                && !state.is_wall(target);

            let outcome = sim.step();

            if legal {
                prop_assert_eq!(outcome.phase, Phase::Running);
                prop_assert!(sim.state().snake.len() >= min_len);
                prop_assert!(sim.state().level >= level_before);
                check_layout(sim.state())?;
            } else {
                prop_assert_eq!(outcome.phase, Phase::Over);
                let after: Vec<Cell> = sim.state().snake.cells().collect();
                prop_assert_eq!(after, before);
                let game_overs = outcome
                    .events
                    .iter()
                    .filter(|e| matches!(e, TickEvent::GameOver { .. }))
                    .count();
                prop_assert_eq!(game_overs, 1);
                // Play on with a fresh game
                sim.start();
                prop_assert_eq!(sim.phase(), Phase::Running);
            }

            let state = sim.state();
            prop_assert!(state.tick_interval_ms >= sim.config().min_tick_ms);
            prop_assert!(state.walls.len() <= sim.config().max_walls);
        }
    }

    #[test]
    fn reverse_heading_never_buffers(
        seed in any::<u64>(),
        turns in prop::collection::vec(heading(), 1..50),
    ) {
        let mut sim =
            GridSimulation::seeded(GameConfig::quiet(12, 12), MemoryScoreStore::new(), seed);
        for turn in turns {
            let current = sim.state().snake.heading();
            let pending = sim.state().pending_heading;
            let accepted = sim.set_direction(turn);
            if current.is_opposite(turn) {
                prop_assert!(!accepted);
                prop_assert_eq!(sim.state().pending_heading, pending);
            } else {
                prop_assert!(accepted);
                prop_assert_eq!(sim.state().pending_heading, turn);
            }
        }
    }

    #[test]
    fn best_score_is_written_once_per_new_record(seed in any::<u64>(), stored in 0u32..4) {
        let mut sim = GridSimulation::seeded(
            busy_config(),
            MemoryScoreStore::with_best(stored),
            seed,
        );
        sim.start();
        // Run straight until the wall ends the game
        while sim.phase() == Phase::Running {
            sim.step();
        }

        let score = sim.state().score;
        let writes = &sim.store().writes;
        if score > stored {
            prop_assert_eq!(writes.as_slice(), &[score]);
            prop_assert_eq!(sim.best_score(), score);
        } else {
            prop_assert!(writes.is_empty());
            prop_assert_eq!(sim.best_score(), stored);
        }
    }
}
