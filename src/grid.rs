use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// A single cell of the arena grid.
///
/// Coordinates are signed so that a head which just stepped off the edge can
/// still be represented; `Grid::in_bounds` decides whether a cell is inside
/// the arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }

    /// The neighboring cell one step away in the given direction.
    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The manhattan distance to another cell.
    pub fn manhattan(&self, other: Cell) -> usize {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as usize
    }
}

/// Represents the direction a snake can move.
///
/// The y axis grows downward, so `Up` is a step toward row 0.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the fixed enumeration order used for neighbor
    /// expansion and for breaking ties between equally good moves.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The 180° reverse of this direction. A live snake is never allowed to
    /// take it.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The two perpendicular turns, relative left first, relative right
    /// second.
    pub fn turns(&self) -> [Direction; 2] {
        match self {
            Direction::Up => [Direction::Left, Direction::Right],
            Direction::Down => [Direction::Right, Direction::Left],
            Direction::Left => [Direction::Down, Direction::Up],
            Direction::Right => [Direction::Up, Direction::Down],
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The direction of the unit step from `from` to `to`, if the two cells
    /// are 4-connected neighbors.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        match (to.x - from.x, to.y - from.y) {
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            _ => None,
        }
    }
}

/// The arena: a fixed rectangular grid with a set of permanently blocked
/// cells. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    obstacles: HashSet<Cell>,
}

impl Grid {
    /// Creates a grid from explicit dimensions and wall cells.
    ///
    /// # Arguments
    /// * `width` - The number of columns.
    /// * `height` - The number of rows.
    /// * `obstacles` - The permanently blocked cells. Must all be in bounds.
    pub fn new(width: usize, height: usize, obstacles: Vec<Cell>) -> Grid {
        let grid = Grid {
            width,
            height,
            obstacles: obstacles.into_iter().collect(),
        };

        for cell in &grid.obstacles {
            if !grid.in_bounds(*cell) {
                panic!("Obstacle at ({}, {}) is outside the grid", cell.x, cell.y);
            }
        }

        grid
    }

    /// Parses a grid from its string representation.
    ///
    /// The format is a `rows`/`cols` header followed by one `m` line per row,
    /// where `%` is a wall and `.` is open land:
    ///
    /// ```text
    /// rows 2
    /// cols 3
    /// m .%.
    /// m ...
    /// ```
    pub fn parse(contents: &str) -> Grid {
        let metadata = Regex::new(r"rows (\d+)\s+cols (\d+)")
            .unwrap()
            .captures(contents)
            .unwrap();

        let height = metadata.get(1).unwrap().as_str().parse().unwrap();
        let width = metadata.get(2).unwrap().as_str().parse().unwrap();

        let mut obstacles = Vec::new();

        Regex::new(r"m (.*)")
            .unwrap()
            .captures_iter(contents)
            .map(|captures| captures.get(1).unwrap().as_str().trim())
            .enumerate()
            .for_each(|(row, line)| {
                line.chars().enumerate().for_each(|(col, value)| match value {
                    '%' => obstacles.push(Cell::new(col as i32, row as i32)),
                    '.' => {}
                    _ => panic!("Invalid character value: {}", value),
                });
            });

        Grid::new(width, height, obstacles)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && (cell.x as usize) < self.width && cell.y >= 0 && (cell.y as usize) < self.height
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn obstacles(&self) -> &HashSet<Cell> {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_parsing_a_grid_it_is_created_with_the_correct_width_and_height() {
        let grid = "\
            rows 2
            cols 3
            m ...
            m ...";
        let grid = Grid::parse(grid);

        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn when_parsing_a_grid_walls_become_obstacles() {
        let grid = "\
            rows 3
            cols 3
            m .%.
            m ...
            m %%.";
        let grid = Grid::parse(grid);

        assert!(grid.is_obstacle(Cell::new(1, 0)));
        assert!(grid.is_obstacle(Cell::new(0, 2)));
        assert!(grid.is_obstacle(Cell::new(1, 2)));
        assert!(!grid.is_obstacle(Cell::new(0, 0)));
        assert_eq!(grid.obstacles().len(), 3);
    }

    #[test]
    #[should_panic(expected = "Invalid character value: x")]
    fn when_parsing_a_grid_with_an_invalid_character_a_panic_occurs() {
        let grid = "\
            rows 1
            cols 3
            m .x.";
        Grid::parse(grid);
    }

    #[test]
    #[should_panic(expected = "Obstacle at (3, 0) is outside the grid")]
    fn when_creating_a_grid_with_an_out_of_bounds_obstacle_a_panic_occurs() {
        Grid::new(3, 3, vec![Cell::new(3, 0)]);
    }

    #[test]
    fn when_checking_bounds_cells_outside_the_grid_are_rejected() {
        let grid = Grid::new(3, 2, vec![]);

        assert!(grid.in_bounds(Cell::new(0, 0)));
        assert!(grid.in_bounds(Cell::new(2, 1)));
        assert!(!grid.in_bounds(Cell::new(-1, 0)));
        assert!(!grid.in_bounds(Cell::new(0, -1)));
        assert!(!grid.in_bounds(Cell::new(3, 0)));
        assert!(!grid.in_bounds(Cell::new(0, 2)));
    }

    #[test]
    fn when_stepping_a_cell_the_direction_delta_is_applied() {
        let cell = Cell::new(5, 5);

        assert_eq!(cell.step(Direction::Up), Cell::new(5, 4));
        assert_eq!(cell.step(Direction::Down), Cell::new(5, 6));
        assert_eq!(cell.step(Direction::Left), Cell::new(4, 5));
        assert_eq!(cell.step(Direction::Right), Cell::new(6, 5));
    }

    #[test]
    fn when_computing_the_manhattan_distance_the_axis_distances_are_summed() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(3, 4)), 7);
        assert_eq!(Cell::new(3, 4).manhattan(Cell::new(0, 0)), 7);
        assert_eq!(Cell::new(2, 2).manhattan(Cell::new(2, 2)), 0);
    }

    #[test]
    fn when_reversing_a_direction_the_opposite_is_returned() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn when_turning_the_relative_left_turn_comes_before_the_relative_right_turn() {
        assert_eq!(Direction::Up.turns(), [Direction::Left, Direction::Right]);
        assert_eq!(Direction::Down.turns(), [Direction::Right, Direction::Left]);
        assert_eq!(Direction::Left.turns(), [Direction::Down, Direction::Up]);
        assert_eq!(Direction::Right.turns(), [Direction::Up, Direction::Down]);
    }

    #[test]
    fn when_deriving_the_direction_between_neighbors_the_unit_step_is_mapped() {
        let cell = Cell::new(5, 5);

        assert_eq!(Direction::between(cell, Cell::new(5, 4)), Some(Direction::Up));
        assert_eq!(Direction::between(cell, Cell::new(5, 6)), Some(Direction::Down));
        assert_eq!(Direction::between(cell, Cell::new(4, 5)), Some(Direction::Left));
        assert_eq!(Direction::between(cell, Cell::new(6, 5)), Some(Direction::Right));
        assert_eq!(Direction::between(cell, Cell::new(7, 5)), None);
        assert_eq!(Direction::between(cell, cell), None);
    }
}
