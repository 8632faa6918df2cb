use std::collections::BTreeSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use super::{
    action::{Heading, Signal},
    config::{GameConfig, SpecialFoodConfig},
    placement::{grow_walls, random_free_cell},
    state::{Cell, Collision, FoodItem, FoodKind, GameState, Phase, Snake},
};
use crate::store::ScoreStore;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    FoodConsumed { kind: FoodKind },
    LevelUp { level: u32 },
    GameOver { collision: Collision, new_best: bool },
}

/// Result of a call to [`GridSimulation::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Phase after the tick
    pub phase: Phase,
    /// Events in the order they fired
    pub events: Vec<TickEvent>,
}

/// Read-only view of the game handed to renderers
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: Vec<FoodItem>,
    pub walls: &'a BTreeSet<Cell>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    pub tick_interval_ms: u64,
    pub phase: Phase,
    pub new_best: bool,
}

/// Owns the game state and advances it one tick at a time.
///
/// The random source is injected so that placement is reproducible; the
/// score store is read once here and written on new-best game overs.
pub struct GridSimulation<S, R = StdRng> {
    config: GameConfig,
    state: GameState,
    best_score: u32,
    store: S,
    rng: R,
}

impl<S: ScoreStore> GridSimulation<S, StdRng> {
    /// Simulation with a reproducible random source
    pub fn seeded(config: GameConfig, store: S, seed: u64) -> Self {
        Self::new(config, store, StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy(config: GameConfig, store: S) -> Self {
        Self::new(config, store, StdRng::from_entropy())
    }
}

impl<S: ScoreStore, R: Rng> GridSimulation<S, R> {
    pub fn new(config: GameConfig, mut store: S, mut rng: R) -> Self {
        let best_score = match store.load_best() {
            Ok(best) => best.unwrap_or(0),
            Err(err) => {
                warn!(error = %err, "could not read best score, starting from 0");
                0
            }
        };
        let state = fresh_state(&config, &mut rng);

        Self {
            config,
            state,
            best_score,
            store,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Interval the scheduler should wait between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.state.tick_interval_ms)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.state.snake,
            food: self.state.food_items().copied().collect(),
            walls: &self.state.walls,
            grid_width: self.state.grid_width,
            grid_height: self.state.grid_height,
            score: self.state.score,
            best_score: self.best_score,
            level: self.state.level,
            tick_interval_ms: self.state.tick_interval_ms,
            phase: self.state.phase,
            new_best: self.state.new_best,
        }
    }

    /// Dispatch an input signal
    pub fn apply(&mut self, signal: Signal) {
        match signal {
            Signal::Start => self.start(),
            Signal::TogglePause => self.toggle_pause(),
            Signal::Reset => self.reset(),
            Signal::SetDirection(heading) => {
                self.set_direction(heading);
            }
        }
    }

    /// Idle -> Running. From Over a fresh game is generated first.
    pub fn start(&mut self) {
        match self.state.phase {
            Phase::Idle => {}
            Phase::Over => self.state = fresh_state(&self.config, &mut self.rng),
            Phase::Running | Phase::Paused => return,
        }
        self.state.phase = Phase::Running;
        info!(best = self.best_score, "game started");
    }

    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            other => other,
        };
    }

    pub fn reset(&mut self) {
        self.state = fresh_state(&self.config, &mut self.rng);
        info!("game reset");
    }

    /// Buffer a heading for the next tick. A 180-degree turn against the
    /// current heading is ignored. Returns whether the heading was buffered.
    pub fn set_direction(&mut self, heading: Heading) -> bool {
        if self.state.snake.heading().is_opposite(heading) {
            return false;
        }
        self.state.pending_heading = heading;
        true
    }

    /// Advance one tick. Outside of Running this does nothing.
    pub fn step(&mut self) -> StepOutcome {
        if self.state.phase != Phase::Running {
            return StepOutcome {
                phase: self.state.phase,
                events: Vec::new(),
            };
        }

        let mut events = Vec::new();
        self.state.ticks += 1;

        let heading = self.state.pending_heading;
        self.state.snake.set_heading(heading);
        let candidate = self.state.snake.head().moved_in(heading);

        if let Some(collision) = self.check_collision(candidate) {
            let new_best = self.finish(collision);
            events.push(TickEvent::GameOver {
                collision,
                new_best,
            });
            return StepOutcome {
                phase: self.state.phase,
                events,
            };
        }

        self.state.snake.push_head(candidate);

        let mut consumed = Vec::new();
        let mut grew = false;

        if self.state.normal.is_some_and(|food| food.cell == candidate) {
            self.state.score += 1;
            self.state.normal = None;
            self.state.normal = random_free_cell(&self.state, &mut self.rng).map(FoodItem::normal);
            grew = true;
            consumed.push(FoodKind::Normal);

            if self.state.score % self.config.points_per_level == 0 {
                self.level_up(&mut events);
            }
        }

        debug_assert!(
            self.state.bonus.is_none()
                || self.state.hazard.is_none()
                || self.state.bonus.map(|f| f.cell) != self.state.hazard.map(|f| f.cell),
            "bonus and hazard share a cell"
        );

        if self.state.bonus.is_some_and(|food| food.cell == candidate) {
            self.state.score += self.config.bonus_points;
            self.state.bonus = None;
            grew = true;
            consumed.push(FoodKind::Bonus);
        }

        if self.state.hazard.is_some_and(|food| food.cell == candidate) {
            self.state.score = self.state.score.saturating_sub(self.config.hazard_penalty);
            self.state.hazard = None;

            // Length once this tick's translation is applied
            let settled = self.state.snake.len() - usize::from(!grew);
            let cut = self
                .config
                .hazard_tail_cut
                .min(settled.saturating_sub(self.config.min_snake_length));
            for _ in 0..cut {
                self.state.snake.drop_tail();
            }
            consumed.push(FoodKind::Hazard);
        }

        if !grew {
            self.state.snake.drop_tail();
        }

        self.tick_special_food();

        events.extend(
            consumed
                .into_iter()
                .map(|kind| TickEvent::FoodConsumed { kind }),
        );

        StepOutcome {
            phase: self.state.phase,
            events,
        }
    }

    /// Check if the candidate head cell ends the game
    fn check_collision(&self, cell: Cell) -> Option<Collision> {
        if !self.state.is_in_bounds(cell) {
            return Some(Collision::Boundary);
        }

        if self.state.snake.contains(cell) {
            return Some(Collision::SelfCollision);
        }

        if self.state.is_wall(cell) {
            return Some(Collision::Wall);
        }

        None
    }

    /// Move to Over and persist a new best score. Returns true on a new best.
    fn finish(&mut self, collision: Collision) -> bool {
        self.state.phase = Phase::Over;
        let score = self.state.score;
        info!(score, level = self.state.level, ?collision, "game over");

        if score <= self.best_score {
            return false;
        }

        self.best_score = score;
        self.state.new_best = true;
        if let Err(err) = self.store.save_best(score) {
            warn!(error = %err, score, "could not persist best score");
        }
        true
    }

    fn level_up(&mut self, events: &mut Vec<TickEvent>) {
        self.state.level += 1;
        self.state.tick_interval_ms = self
            .state
            .tick_interval_ms
            .saturating_sub(self.config.tick_step_ms)
            .max(self.config.min_tick_ms);

        let target = self.config.wall_target(self.state.level);
        let added = grow_walls(&mut self.state, target, &mut self.rng);
        debug!(
            level = self.state.level,
            tick_interval_ms = self.state.tick_interval_ms,
            walls = self.state.walls.len(),
            added,
            "level up"
        );

        events.push(TickEvent::LevelUp {
            level: self.state.level,
        });
    }

    /// Roll for new Bonus/Hazard items, count down cooldowns, then age live items.
    fn tick_special_food(&mut self) {
        if self.state.bonus.is_none()
            && self.state.bonus_cooldown == 0
            && roll(&mut self.rng, self.config.bonus.spawn_chance)
        {
            if let Some(cell) = random_free_cell(&self.state, &mut self.rng) {
                debug!(x = cell.x, y = cell.y, "bonus spawned");
                self.state.bonus = Some(FoodItem::special(
                    cell,
                    FoodKind::Bonus,
                    self.config.bonus.lifetime_ticks,
                ));
                self.state.bonus_cooldown = self.config.bonus.cooldown_ticks;
            }
        }

        if self.state.hazard.is_none()
            && self.state.hazard_cooldown == 0
            && roll(&mut self.rng, self.config.hazard.spawn_chance)
        {
            if let Some(cell) = random_free_cell(&self.state, &mut self.rng) {
                debug!(x = cell.x, y = cell.y, "hazard spawned");
                self.state.hazard = Some(FoodItem::special(
                    cell,
                    FoodKind::Hazard,
                    self.config.hazard.lifetime_ticks,
                ));
                self.state.hazard_cooldown = self.config.hazard.cooldown_ticks;
            }
        }

        self.state.bonus_cooldown = self.state.bonus_cooldown.saturating_sub(1);
        self.state.hazard_cooldown = self.state.hazard_cooldown.saturating_sub(1);

        self.state.bonus = age(self.state.bonus, &self.config.bonus, &mut self.rng);
        self.state.hazard = age(self.state.hazard, &self.config.hazard, &mut self.rng);
    }
}

/// Idle state: centered snake heading right, one Normal food, no walls
fn fresh_state<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> GameState {
    let head = Cell::new(
        (config.grid_width / 2) as i32,
        (config.grid_height / 2) as i32,
    );
    let snake = Snake::new(head, Heading::Right, config.initial_snake_length);

    let mut state = GameState::new(
        snake,
        config.grid_width,
        config.grid_height,
        config.base_tick_ms,
    );
    state.normal = random_free_cell(&state, rng).map(FoodItem::normal);
    state
}

/// Roll a special item's expiry chance and tick down its lifetime.
/// An item whose lifetime already reached zero is removed.
fn age<R: Rng + ?Sized>(
    item: Option<FoodItem>,
    rules: &SpecialFoodConfig,
    rng: &mut R,
) -> Option<FoodItem> {
    let mut item = item?;
    let remaining = item.remaining.unwrap_or(0);
    if remaining == 0 || roll(rng, rules.expire_chance) {
        return None;
    }
    item.remaining = Some(remaining - 1);
    Some(item)
}

/// Bernoulli trial that never touches the rng for p <= 0
fn roll<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    p > 0.0 && rng.gen::<f64>() < p
}
