use std::cell::RefCell;
use std::io::{Stderr, stderr};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::game::{Board, BoardStatus, GameConfig, Grid};
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;

/// Render at 30 FPS (33ms per frame)
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// Play on the terminal with the keyboard.
///
/// The board's render observer stores each emitted grid in `frame`; the draw
/// loop only ever shows that stored grid.
pub struct HumanMode {
    config: GameConfig,
    board: Board,
    frame: Rc<RefCell<Option<Grid>>>,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let frame = Rc::new(RefCell::new(None));
        let board = Self::new_board(&config, &frame);

        Self {
            config,
            board,
            frame,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    fn new_board(config: &GameConfig, frame: &Rc<RefCell<Option<Grid>>>) -> Board {
        let mut board = Board::new(config.clone());

        let slot = Rc::clone(frame);
        board.on_render(move |grid| {
            *slot.borrow_mut() = Some(grid.clone());
        });
        board.on_crash(|cause| info!(%cause, "game over"));

        board
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

        let mut tick_timer = interval(self.board.tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut render_timer = interval(RENDER_INTERVAL);

        self.board.play()?;
        tick_timer.reset();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            if self.handle_event(event)? {
                                tick_timer.reset();
                            }
                        }
                        Some(Err(err)) => warn!(error = %err, "failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.board.tick();
                }

                // Render frame
                _ = render_timer.tick() => {
                    let grid = self.frame.borrow();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.board, grid.as_ref());
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
        }

        Ok(())
    }

    /// Returns true when the board (re)started playing and the tick timer should restart
    fn handle_event(&mut self, event: Event) -> Result<bool> {
        let Event::Key(key) = event else {
            return Ok(false);
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => {
                self.board.turn(direction);
            }
            KeyAction::TogglePause => match self.board.status() {
                BoardStatus::Playing => self.board.pause(),
                BoardStatus::Idle | BoardStatus::Paused => {
                    self.board.play()?;
                    return Ok(true);
                }
                BoardStatus::Crashed(_) => {}
            },
            KeyAction::Restart => {
                self.reset_game()?;
                return Ok(true);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }

        Ok(false)
    }

    /// Replace the board with a fresh session and start it
    fn reset_game(&mut self) -> Result<()> {
        self.frame.borrow_mut().take();
        self.board = Self::new_board(&self.config, &self.frame);
        self.board.play()?;
        Ok(())
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
