use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameConfig, LevelTable, Phase, Position, Session};
use crate::persistence::SessionSnapshot;

/// Draws every screen of the game. Owns no game state; callers pass in what
/// should be shown.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_welcome(&self, frame: &mut Frame, username: &str, level: u32) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Welcome, {username}!"),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Current Level: ", Style::default().fg(Color::Yellow)),
                Span::styled(level.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::styled(" to start, ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red)),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        self.render_panel(frame, text, Color::White);
    }

    pub fn render_resume_prompt(&self, frame: &mut Frame, snapshot: &SessionSnapshot) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Saved game found!",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!(
                "Score {}  Level {}  Length {}",
                snapshot.score,
                snapshot.level,
                snapshot.snake_body.len()
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Enter", Style::default().fg(Color::Green)),
                Span::styled(" to load saved game, ", Style::default().fg(Color::Gray)),
                Span::styled("N", Style::default().fg(Color::Yellow)),
                Span::styled(" for new game", Style::default().fg(Color::Gray)),
            ]),
        ];

        self.render_panel(frame, text, Color::White);
    }

    pub fn render_game(
        &self,
        frame: &mut Frame,
        session: &Session,
        levels: &LevelTable,
        config: &GameConfig,
        now: f64,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(session, levels, now);
        frame.render_widget(stats, chunks[0]);

        let game_area = centered(chunks[1]);
        match session.phase {
            Phase::Playing => {
                let grid = self.render_grid(session, levels, config);
                frame.render_widget(grid, game_area);
            }
            Phase::Paused => {
                let paused = self.render_paused();
                frame.render_widget(paused, game_area);
            }
            Phase::GameOver => {
                let game_over = self.render_game_over(session);
                frame.render_widget(game_over, game_area);
            }
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_panel(&self, frame: &mut Frame, text: Vec<Line<'static>>, border: Color) {
        let area = centered(frame.area());
        let panel = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Snake "),
        );
        frame.render_widget(panel, area);
    }

    fn render_grid(
        &self,
        session: &Session,
        levels: &LevelTable,
        config: &GameConfig,
    ) -> Paragraph<'_> {
        let walls = &levels.get(session.level).walls;
        let mut lines = Vec::new();

        for row in 0..config.rows() {
            let mut spans = Vec::new();

            for column in 0..config.columns() {
                let pos = Position::new(column * config.cell_size, row * config.cell_size);

                let cell = if pos == session.snake.head() {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if session.snake.body.contains(&pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == session.food.position {
                    // Weight is always a single digit
                    Span::styled(
                        format!("{} ", session.food.weight),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if walls.contains(&pos) {
                    Span::styled("█ ", Style::default().fg(Color::Blue))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, session: &Session, levels: &LevelTable, now: f64) -> Paragraph<'_> {
        let timeout = levels.get(session.level).food_timeout.as_secs_f64();
        let food_left = (timeout - session.food.age(now)).max(0.0);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                session.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Level: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.level.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(session.speed.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Food: ", Style::default().fg(Color::Yellow)),
            Span::styled(format!("{food_left:.1}s"), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_paused(&self) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Paused",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Game saved. Press P to resume",
                Style::default().fg(Color::Gray),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
    }

    fn render_game_over(&self, session: &Session) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    session.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Yellow)),
            Span::raw(" to pause | "),
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

/// Middle 80% of an area, horizontally
fn centered(area: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(area)[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEngine;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_game_over_screen_shows_score() {
        let config = GameConfig::default();
        let mut engine = GameEngine::with_seed(config.clone(), 1);
        let mut session = engine.new_session(1, 0.0);
        session.score = 42;
        session.phase = Phase::GameOver;

        let mut terminal = Terminal::new(TestBackend::new(100, 50)).unwrap();
        terminal
            .draw(|frame| {
                Renderer::new().render_game(frame, &session, engine.levels(), &config, 0.0)
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("42"));
    }

    #[test]
    fn test_welcome_screen_greets_user() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| Renderer::new().render_welcome(frame, "rosa", 2))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Welcome, rosa!"));
        assert!(text.contains("Current Level: 2"));
    }
}
