use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, FoodKind, Phase, Snapshot};
use crate::metrics::SessionMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw one frame. `banner` is a short transient message such as "LEVEL UP!".
    pub fn render(
        &self,
        frame: &mut Frame,
        snapshot: &Snapshot<'_>,
        metrics: &SessionMetrics,
        banner: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(snapshot, metrics, banner), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match snapshot.phase {
            Phase::Over => frame.render_widget(self.render_game_over(snapshot), game_area),
            _ => frame.render_widget(self.render_grid(snapshot), game_area),
        }

        frame.render_widget(self.render_controls(snapshot.phase), chunks[2]);
    }

    fn render_grid(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let head = snapshot.snake.head();
        let mut lines = Vec::with_capacity(snapshot.grid_height);

        for y in 0..snapshot.grid_height {
            let spans: Vec<Span> = (0..snapshot.grid_width)
                .map(|x| self.cell_span(snapshot, head, Cell::new(x as i32, y as i32)))
                .collect();
            lines.push(Line::from(spans));
        }

        let title = match snapshot.phase {
            Phase::Idle => " Snake - press SPACE to start ",
            Phase::Paused => " Snake - PAUSED ",
            _ => " Snake ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn cell_span(&self, snapshot: &Snapshot<'_>, head: Cell, cell: Cell) -> Span<'static> {
        if cell == head {
            return Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        }
        if snapshot.snake.contains(cell) {
            return Span::styled("□ ", Style::default().fg(Color::Green));
        }
        if snapshot.walls.contains(&cell) {
            return Span::styled("▓ ", Style::default().fg(Color::Gray));
        }
        if let Some(item) = snapshot.food.iter().find(|item| item.cell == cell) {
            let (symbol, color) = match item.kind {
                FoodKind::Normal => ("O ", Color::Red),
                FoodKind::Bonus => ("* ", Color::Yellow),
                FoodKind::Hazard => ("X ", Color::Magenta),
            };
            return Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD));
        }
        Span::styled(". ", Style::default().fg(Color::DarkGray))
    }

    fn render_stats(
        &self,
        snapshot: &Snapshot<'_>,
        metrics: &SessionMetrics,
        banner: Option<&str>,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(snapshot.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(snapshot.best_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Level: ", label),
            Span::styled(snapshot.level.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        if let Some(banner) = banner {
            spans.push(Span::raw("    "));
            spans.push(Span::styled(
                banner.to_string(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, snapshot: &Snapshot<'_>) -> Paragraph<'_> {
        let mut text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(snapshot.level.to_string(), Style::default().fg(Color::White)),
            ]),
        ];

        if snapshot.new_best {
            text.push(Line::from(vec![Span::styled(
                "NEW HIGH SCORE!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "SPACE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]));

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'_> {
        let pause_label = if phase == Phase::Paused { " resume | " } else { " pause | " };
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("SPACE", Style::default().fg(Color::Cyan)),
            Span::raw(" start | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(pause_label),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" reset | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, GridSimulation};
    use crate::store::MemoryScoreStore;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_renders_idle_grid_and_hud() {
        let sim = GridSimulation::seeded(GameConfig::small(), MemoryScoreStore::with_best(12), 1);
        let metrics = SessionMetrics::new();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();

        terminal
            .draw(|frame| {
                Renderer::new().render(frame, &sim.snapshot(), &metrics, Some("LEVEL UP!"));
            })
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Score:"));
        assert!(text.contains("Best:"));
        assert!(text.contains("12"));
        assert!(text.contains("LEVEL UP!"));
        assert!(text.contains("press SPACE to start"));
        assert!(text.contains('■'));
    }
}
