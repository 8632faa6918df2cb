use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::{Interval, MissedTickBehavior, interval, interval_at};
use tracing::info;

use crate::game::{GameConfig, GridSimulation, Phase, Signal, TickEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;
use crate::store::ScoreStore;

/// How long a banner such as "LEVEL UP!" stays on screen
const BANNER_TIME: Duration = Duration::from_millis(1500);

pub type BoxedStore = Box<dyn ScoreStore + Send>;

pub struct HumanMode {
    sim: GridSimulation<BoxedStore>,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    banner: Option<(&'static str, Instant)>,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, store: BoxedStore, seed: Option<u64>) -> Self {
        let sim = match seed {
            Some(seed) => GridSimulation::seeded(config, store, seed),
            None => GridSimulation::from_entropy(config, store),
        };

        Self {
            sim,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            banner: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // The tick timer follows the simulation's interval, which shrinks on level-up
        let mut tick_every = self.sim.tick_interval();
        let mut tick_timer = scheduler_interval(tick_every);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick; nothing is delivered unless Running
                _ = tick_timer.tick() => {
                    if self.sim.phase() == Phase::Running {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update(self.sim.phase() == Phase::Running);
                    let banner = self.current_banner();
                    let snapshot = self.sim.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &snapshot, &self.metrics, banner);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if self.sim.tick_interval() != tick_every {
                tick_every = self.sim.tick_interval();
                tick_timer = scheduler_interval(tick_every);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Game(signal) => self.apply_signal(signal),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn apply_signal(&mut self, signal: Signal) {
        let before = self.sim.phase();
        self.sim.apply(signal);

        let fresh_game = match signal {
            Signal::Reset => true,
            Signal::Start => before == Phase::Over,
            _ => false,
        };
        if fresh_game {
            self.metrics.on_game_start();
            self.banner = None;
        }
    }

    fn update_game(&mut self) {
        let outcome = self.sim.step();

        for event in outcome.events {
            match event {
                TickEvent::LevelUp { level } => {
                    info!(level, "level up");
                    self.banner = Some(("LEVEL UP!", Instant::now()));
                }
                TickEvent::GameOver { new_best, .. } => {
                    self.metrics.on_game_over(self.sim.state().level);
                    if new_best {
                        self.banner = Some(("NEW HIGH SCORE!", Instant::now()));
                    }
                }
                TickEvent::FoodConsumed { .. } => {}
            }
        }
    }

    fn current_banner(&self) -> Option<&'static str> {
        self.banner
            .filter(|(_, shown_at)| shown_at.elapsed() < BANNER_TIME)
            .map(|(text, _)| text)
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Tick timer whose first tick lands one full period from now
fn scheduler_interval(period: Duration) -> Interval {
    let mut timer = interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
