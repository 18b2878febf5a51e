use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use super::{
    config::GameConfig,
    direction::Direction,
    error::BoardError,
    grid::{Cell, Grid, Position, within_bounds},
    snake::Snake,
};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrashCause {
    /// The head left the grid
    Side,
    /// The snake ran into itself
    Collision,
}

impl fmt::Display for CrashCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrashCause::Side => f.write_str("hit the side"),
            CrashCause::Collision => f.write_str("collided with itself"),
        }
    }
}

/// Lifecycle of a board session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    Idle,
    Playing,
    Paused,
    /// Terminal: a crashed board never ticks again
    Crashed(CrashCause),
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved one cell and a new grid was rendered
    Moved { ate_food: bool },
    /// The tick ended the game
    Crashed(CrashCause),
    /// The board was not playing, nothing happened
    Skipped,
}

type RenderObserver = Box<dyn FnMut(&Grid)>;
type CrashObserver = Box<dyn FnMut(CrashCause)>;

/// A game session: the snake anchored on a grid, its food and pending turns.
///
/// The board does not own a timer. Something external calls [`Board::tick`]
/// once per tick interval, or feeds elapsed time to [`Board::advance`].
pub struct Board {
    config: GameConfig,
    snake: Snake,
    head: Position,
    direction: Direction,
    food: Position,
    turn_queue: VecDeque<Direction>,
    status: BoardStatus,
    rng: StdRng,
    since_last_tick: Duration,
    render_observers: Vec<RenderObserver>,
    crash_observers: Vec<CrashObserver>,
}

impl Board {
    /// Create a new board. Out-of-range settings are clamped, see [`GameConfig::normalized`].
    pub fn new(config: GameConfig) -> Self {
        let config = config.normalized();
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut board = Self {
            snake: Snake::new(config.snake_length),
            head: Position::new(config.start_x as i32, config.start_y as i32),
            direction: config.start_direction,
            food: Position::default(),
            turn_queue: VecDeque::new(),
            status: BoardStatus::Idle,
            rng,
            since_last_tick: Duration::ZERO,
            render_observers: Vec::new(),
            crash_observers: Vec::new(),
            config,
        };
        board.food = board.random_position();
        board
    }

    /// Register a callback receiving every rendered grid
    pub fn on_render(&mut self, observer: impl FnMut(&Grid) + 'static) {
        self.render_observers.push(Box::new(observer));
    }

    /// Register a callback receiving the crash cause when the game ends
    pub fn on_crash(&mut self, observer: impl FnMut(CrashCause) + 'static) {
        self.crash_observers.push(Box::new(observer));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == BoardStatus::Playing
    }

    /// Direction the snake moves in on the next tick, before queued turns
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn pending_turns(&self) -> usize {
        self.turn_queue.len()
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    /// Start or resume the game, rendering the current state once
    pub fn play(&mut self) -> Result<(), BoardError> {
        match self.status {
            BoardStatus::Crashed(cause) => return Err(BoardError::GameOver(cause)),
            BoardStatus::Playing => return Ok(()),
            BoardStatus::Idle | BoardStatus::Paused => {}
        }

        info!(head = ?self.head, direction = ?self.direction, "board playing");
        self.status = BoardStatus::Playing;
        self.since_last_tick = Duration::ZERO;
        self.render();
        Ok(())
    }

    /// Stop ticking without touching the game state
    pub fn pause(&mut self) {
        if self.status == BoardStatus::Playing {
            info!("board paused");
            self.status = BoardStatus::Paused;
        }
    }

    /// Queue a direction change for an upcoming tick.
    ///
    /// The request is compared with the last queued direction, or the live
    /// one when nothing is queued. Repeating that direction or reversing it
    /// is dropped and `false` is returned.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if matches!(self.status, BoardStatus::Crashed(_)) {
            return false;
        }

        let reference = self.turn_queue.back().copied().unwrap_or(self.direction);
        if reference.turn_towards(direction).is_none() {
            trace!(?reference, requested = ?direction, "turn dropped");
            return false;
        }

        self.turn_queue.push_back(direction);
        true
    }

    /// Put the food on a given cell. Returns `false` for cells outside the grid.
    pub fn place_food(&mut self, position: Position) -> bool {
        if !self.in_bounds(position) {
            return false;
        }
        self.food = position;
        true
    }

    /// Let simulated time pass, running one tick per full tick interval.
    ///
    /// Time only accumulates while playing. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.is_playing() {
            return 0;
        }

        self.since_last_tick += elapsed;
        let interval = self.tick_interval();
        let mut ticks = 0;

        while self.is_playing() && self.since_last_tick >= interval {
            self.since_last_tick -= interval;
            self.tick();
            ticks += 1;
        }

        ticks
    }

    /// Run one tick: apply a queued turn, move the snake and render
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Skipped;
        }

        if let Some(next) = self.turn_queue.pop_front() {
            let turn = self.direction.turn_towards(next);
            self.direction = next;
            if let Some(turn) = turn {
                self.snake.turn(turn);
            }
        }

        let new_head = self.head.moved_in_direction(self.direction);
        if !self.in_bounds(new_head) {
            return self.crash(CrashCause::Side);
        }

        let ate_food = new_head == self.food;
        if let Err(err) = self.snake.move_snake(usize::from(ate_food)) {
            debug!(index = err.collision_index(), "snake body overlaps");
            return self.crash(CrashCause::Collision);
        }

        self.head = new_head;
        if ate_food {
            self.food = self.random_position();
            debug!(length = self.snake.len(), food = ?self.food, "snake fed");
        }
        debug!(head = ?self.head, direction = ?self.direction, "tick");

        self.render();
        TickOutcome::Moved { ate_food }
    }

    /// Project the snake and the food onto a fresh grid.
    ///
    /// The body is walked from the head backwards, so the walk starts facing
    /// away from the direction of travel.
    pub fn snapshot(&self) -> Grid {
        let mut grid = Grid::new(self.config.grid_width, self.config.grid_height);
        grid.set(self.food, Cell::Food);

        let mut position = self.head;
        let mut direction = self.direction.opposite();

        for segment in self.snake.body() {
            grid.set(position, Cell::Snake);
            if let Some(turn) = segment.traversal_turn() {
                direction = direction.turned(turn);
            }
            position = position.moved_in_direction(direction);
        }

        grid
    }

    fn render(&mut self) {
        let grid = self.snapshot();
        for observer in &mut self.render_observers {
            observer(&grid);
        }
    }

    fn crash(&mut self, cause: CrashCause) -> TickOutcome {
        info!(%cause, head = ?self.head, length = self.snake.len(), "board crashed");
        self.status = BoardStatus::Crashed(cause);
        self.since_last_tick = Duration::ZERO;
        self.turn_queue.clear();

        for observer in &mut self.crash_observers {
            observer(cause);
        }
        TickOutcome::Crashed(cause)
    }

    fn in_bounds(&self, pos: Position) -> bool {
        within_bounds(self.config.grid_width, self.config.grid_height, pos)
    }

    // Cells under the snake are not excluded, food may land on its body.
    fn random_position(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Renders = Rc<RefCell<Vec<Grid>>>;
    type Crashes = Rc<RefCell<Vec<CrashCause>>>;

    const TICK: Duration = Duration::from_millis(500);

    /// Board with recording observers and the food parked in the far corner
    fn setup(config: GameConfig) -> (Board, Renders, Crashes) {
        let config = GameConfig {
            seed: Some(7),
            ..config
        };
        let corner = Position::new(config.grid_width as i32 - 1, config.grid_height as i32 - 1);

        let mut board = Board::new(config);
        assert!(board.place_food(corner));

        let renders: Renders = Rc::default();
        let crashes: Crashes = Rc::default();

        let sink = Rc::clone(&renders);
        board.on_render(move |grid| sink.borrow_mut().push(grid.clone()));
        let sink = Rc::clone(&crashes);
        board.on_crash(move |cause| sink.borrow_mut().push(cause));

        (board, renders, crashes)
    }

    fn snake_cells(grid: &Grid) -> Vec<(i32, i32)> {
        let mut cells = Vec::new();
        for (x, column) in grid.columns().enumerate() {
            for (y, cell) in column.iter().enumerate() {
                if *cell == Cell::Snake {
                    cells.push((x as i32, y as i32));
                }
            }
        }
        cells
    }

    #[test]
    fn test_render_only_while_playing() {
        let (mut board, renders, _) = setup(GameConfig::default());
        assert_eq!(board.status(), BoardStatus::Idle);

        board.advance(TICK);
        assert!(renders.borrow().is_empty());

        board.play().unwrap();
        assert_eq!(renders.borrow().len(), 1);

        board.advance(TICK);
        assert_eq!(renders.borrow().len(), 2);

        board.pause();
        board.pause();
        assert_eq!(board.status(), BoardStatus::Paused);

        board.advance(TICK);
        assert_eq!(renders.borrow().len(), 2);
        assert_eq!(board.tick(), TickOutcome::Skipped);

        board.play().unwrap();
        assert_eq!(renders.borrow().len(), 3);
    }

    #[test]
    fn test_board_size() {
        let (mut board, renders, _) = setup(GameConfig::new(20, 30));
        board.play().unwrap();

        let renders = renders.borrow();
        assert_eq!(renders.len(), 1);
        assert_eq!(renders[0].width(), 20);
        assert_eq!(renders[0].columns().count(), 20);
        assert!(renders[0].columns().all(|column| column.len() == 30));
    }

    #[test]
    fn test_tick_interval() {
        let config = GameConfig {
            tick_interval_ms: 100,
            ..Default::default()
        };
        let (mut board, renders, _) = setup(config);
        board.play().unwrap();

        assert_eq!(board.advance(Duration::from_millis(99)), 0);
        assert_eq!(renders.borrow().len(), 1);

        assert_eq!(board.advance(Duration::from_millis(1)), 1);
        assert_eq!(renders.borrow().len(), 2);

        assert_eq!(board.advance(Duration::from_millis(100)), 1);
        assert_eq!(renders.borrow().len(), 3);
    }

    #[test]
    fn test_start_position_and_length() {
        let config = GameConfig {
            start_x: 3,
            start_y: 4,
            snake_length: 5,
            ..Default::default()
        };
        let (mut board, renders, _) = setup(config);
        board.play().unwrap();

        let render = &renders.borrow()[0];
        assert_eq!(render.get(Position::new(3, 4)), Some(Cell::Snake));
        assert_eq!(render.count(Cell::Snake), 5);
    }

    #[test]
    fn test_moves_in_start_direction() {
        let config = GameConfig {
            start_direction: Direction::Right,
            ..Default::default()
        };
        let (mut board, renders, crashes) = setup(config);
        board.play().unwrap();
        assert_eq!(board.advance(Duration::from_millis(2000)), 4);

        let expected = [
            [1, 0, 0, 0, 0],
            [1, 1, 0, 0, 0],
            [1, 1, 1, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 1, 1, 1],
        ];

        let renders = renders.borrow();
        assert_eq!(renders.len(), 5);
        for (render, row) in renders.iter().zip(expected) {
            for (x, occupied) in row.into_iter().enumerate() {
                let expected_cell = if occupied == 1 { Cell::Snake } else { Cell::Free };
                assert_eq!(render.column(x)[0], expected_cell);
            }
        }
        assert!(crashes.borrow().is_empty());
    }

    #[test]
    fn test_runs_until_side() {
        let config = GameConfig {
            start_direction: Direction::Right,
            ..Default::default()
        };
        let (mut board, _, crashes) = setup(config);
        board.play().unwrap();

        for _ in 0..9 {
            assert_eq!(board.tick(), TickOutcome::Moved { ate_food: false });
        }
        assert_eq!(board.head(), Position::new(9, 0));
        assert!(crashes.borrow().is_empty());

        assert_eq!(board.tick(), TickOutcome::Crashed(CrashCause::Side));
        assert_eq!(board.head(), Position::new(9, 0));
    }

    #[test]
    fn test_turns_apply_one_per_tick() {
        let (mut board, renders, _) = setup(GameConfig::default());
        board.play().unwrap();

        assert!(board.turn(Direction::Right));
        assert!(board.turn(Direction::Up));
        assert!(board.turn(Direction::Right));
        assert_eq!(board.pending_turns(), 3);

        board.advance(Duration::from_millis(2000));

        let renders = renders.borrow();
        assert_eq!(snake_cells(&renders[2]), vec![(0, 0), (1, 0), (1, 1)]);
        assert_eq!(snake_cells(&renders[3]), vec![(1, 0), (1, 1), (2, 1)]);
        assert_eq!(snake_cells(&renders[4]), vec![(1, 1), (2, 1), (3, 1)]);
        assert_eq!(board.pending_turns(), 0);
        assert_eq!(board.direction(), Direction::Right);
    }

    #[test]
    fn test_reverse_turn_is_dropped() {
        let (mut board, renders, _) = setup(GameConfig::default());
        board.play().unwrap();

        assert!(!board.turn(Direction::Down));
        assert_eq!(board.pending_turns(), 0);

        board.advance(Duration::from_millis(1500));
        assert_eq!(board.direction(), Direction::Up);

        let renders = renders.borrow();
        assert_eq!(
            &renders[3].column(0)[..4],
            &[Cell::Free, Cell::Snake, Cell::Snake, Cell::Snake]
        );
    }

    #[test]
    fn test_turn_is_checked_against_queue() {
        let (mut board, _, _) = setup(GameConfig::default());

        assert!(!board.turn(Direction::Up));
        assert!(board.turn(Direction::Right));
        assert!(!board.turn(Direction::Right));
        assert!(!board.turn(Direction::Left));
        assert!(board.turn(Direction::Down));
        assert_eq!(board.pending_turns(), 2);
    }

    #[test]
    fn test_feeding_grows_snake() {
        let config = GameConfig {
            start_y: 5,
            ..Default::default()
        };
        let (mut board, renders, _) = setup(config);
        assert!(board.place_food(Position::new(0, 7)));
        board.play().unwrap();

        assert_eq!(board.tick(), TickOutcome::Moved { ate_food: false });
        assert_eq!(board.tick(), TickOutcome::Moved { ate_food: true });

        assert_eq!(board.snake().len(), 4);
        assert!(board.in_bounds(board.food()));

        {
            let renders = renders.borrow();
            assert_eq!(renders[1].count(Cell::Snake), 3);
            assert_eq!(renders[2].count(Cell::Snake), 4);
        }

        assert!(board.place_food(Position::new(9, 19)));
        assert_eq!(board.tick(), TickOutcome::Moved { ate_food: false });
        assert_eq!(board.snake().len(), 4);
        assert_eq!(renders.borrow().len(), 4);
        assert_eq!(renders.borrow()[3].count(Cell::Snake), 4);
    }

    #[test]
    fn test_side_crash() {
        let (mut board, renders, crashes) = setup(GameConfig::default());
        board.play().unwrap();

        board.advance(Duration::from_millis(1000));
        assert!(crashes.borrow().is_empty());

        board.turn(Direction::Left);
        board.advance(TICK);

        assert_eq!(*crashes.borrow(), vec![CrashCause::Side]);
        assert_eq!(board.status(), BoardStatus::Crashed(CrashCause::Side));
        assert_eq!(board.head(), Position::new(0, 2));

        let rendered = renders.borrow().len();
        board.advance(Duration::from_millis(5000));
        assert_eq!(renders.borrow().len(), rendered);
        assert_eq!(crashes.borrow().len(), 1);
    }

    #[test]
    fn test_collision_crash() {
        let config = GameConfig {
            snake_length: 10,
            start_direction: Direction::Right,
            ..Default::default()
        };
        let (mut board, _, crashes) = setup(config);
        board.play().unwrap();
        board.advance(Duration::from_millis(1000));

        board.turn(Direction::Up);
        board.advance(Duration::from_millis(1000));

        board.turn(Direction::Left);
        board.advance(Duration::from_millis(1000));
        assert!(crashes.borrow().is_empty());

        board.turn(Direction::Down);
        board.advance(Duration::from_millis(1000));

        assert_eq!(*crashes.borrow(), vec![CrashCause::Collision]);
        assert_eq!(board.head(), Position::new(0, 1));
        assert_eq!(board.snake().len(), 10);
    }

    #[test]
    fn test_no_resume_after_crash() {
        let (mut board, _, _) = setup(GameConfig::default());
        board.play().unwrap();
        board.turn(Direction::Left);
        assert_eq!(board.tick(), TickOutcome::Crashed(CrashCause::Side));

        assert_eq!(
            board.play(),
            Err(BoardError::GameOver(CrashCause::Side))
        );
        assert!(!board.turn(Direction::Up));
        assert_eq!(board.tick(), TickOutcome::Skipped);
    }

    #[test]
    fn test_place_food_rejects_outside() {
        let (mut board, _, _) = setup(GameConfig::small());
        assert!(!board.place_food(Position::new(10, 0)));
        assert!(!board.place_food(Position::new(0, -1)));
        assert!(board.place_food(Position::new(4, 4)));
        assert_eq!(board.snapshot().find(Cell::Food), Some(Position::new(4, 4)));
    }

    #[test]
    fn test_seeded_food_is_reproducible() {
        let config = GameConfig {
            seed: Some(1234),
            ..GameConfig::large()
        };
        let a = Board::new(config.clone());
        let b = Board::new(config);
        assert_eq!(a.food(), b.food());
        assert!(a.in_bounds(a.food()));
    }

    #[test]
    fn test_huge_grid_stays_addressable() {
        let config = GameConfig {
            grid_width: 3_000_000_000,
            grid_height: 3,
            start_x: 3_000_000_000,
            seed: Some(3),
            ..Default::default()
        };
        let board = Board::new(config);

        assert_eq!(board.config().grid_width, i32::MAX as usize);
        assert_eq!(board.head(), Position::new(i32::MAX - 1, 0));
        assert!(board.food().x >= 0);
        assert!(board.in_bounds(board.food()));
        assert!(board.in_bounds(board.head()));
    }

    #[test]
    fn test_clamped_construction() {
        let config = GameConfig {
            snake_length: 1,
            start_x: 50,
            ..Default::default()
        };
        let board = Board::new(config);
        assert_eq!(board.snake().len(), 3);
        assert_eq!(board.head(), Position::new(9, 0));
    }
}
