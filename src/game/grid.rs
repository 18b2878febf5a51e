use super::direction::Direction;

/// A position on the game grid, y growing upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Check if a position lies on a `width` x `height` grid
pub fn within_bounds(width: usize, height: usize, pos: Position) -> bool {
    pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < width && (pos.y as usize) < height
}

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Free,
    Snake,
    Food,
}

/// Column-major snapshot of the board: `width` columns of `height` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Free; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        within_bounds(self.width, self.height, pos)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.x as usize * self.height + pos.y as usize)
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Set a cell, ignoring positions outside the grid
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// Cells of column `x`, from `y = 0` upwards
    pub fn column(&self, x: usize) -> &[Cell] {
        &self.cells[x * self.height..(x + 1) * self.height]
    }

    pub fn columns(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.height.max(1)).take(self.width)
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    pub fn find(&self, cell: Cell) -> Option<Position> {
        self.cells
            .iter()
            .position(|&c| c == cell)
            .map(|i| Position::new((i / self.height) as i32, (i % self.height) as i32))
    }
}
