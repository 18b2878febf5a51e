use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Board, BoardStatus, Cell, Grid};

const SNAKE_GLYPH: &str = "■ ";
const FOOD_GLYPH: &str = "O ";
const FREE_GLYPH: &str = ". ";

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the last grid the board emitted, with a status header and a controls footer.
    ///
    /// `frame_grid` is `None` until the board has rendered once.
    pub fn render(&self, frame: &mut Frame, board: &Board, frame_grid: Option<&Grid>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_status(board), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        match (board.status(), frame_grid) {
            (BoardStatus::Crashed(cause), _) => {
                frame.render_widget(self.render_game_over(&cause.to_string()), game_area);
            }
            (_, Some(grid)) => frame.render_widget(self.render_grid(grid), game_area),
            (_, None) => {}
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, grid: &Grid) -> Paragraph<'static> {
        let lines: Vec<Line> = grid_rows(grid)
            .into_iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .into_iter()
                    .map(|cell| match cell {
                        Cell::Snake => Span::styled(
                            SNAKE_GLYPH,
                            Style::default()
                                .fg(Color::Green)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Cell::Food => Span::styled(
                            FOOD_GLYPH,
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Cell::Free => Span::styled(FREE_GLYPH, Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

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

    fn render_status(&self, board: &Board) -> Paragraph<'static> {
        let (label, color) = match board.status() {
            BoardStatus::Idle => ("Ready".to_string(), Color::Gray),
            BoardStatus::Playing => ("Playing".to_string(), Color::Green),
            BoardStatus::Paused => ("Paused".to_string(), Color::Yellow),
            BoardStatus::Crashed(cause) => (format!("Crashed: {cause}"), Color::Red),
        };

        let text = vec![Line::from(vec![
            Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Heading: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{:?}", board.direction()),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Queued: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                board.pending_turns().to_string(),
                Style::default().fg(Color::White),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, cause: &str) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("The snake {cause}"),
                Style::default().fg(Color::White),
            )]),
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

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to steer | "),
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
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

/// Rows of the grid as drawn on screen: the highest `y` comes first
fn grid_rows(grid: &Grid) -> Vec<Vec<Cell>> {
    (0..grid.height())
        .rev()
        .map(|y| (0..grid.width()).map(|x| grid.column(x)[y]).collect())
        .collect()
}
