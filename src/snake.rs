use crate::grid::{Cell, Direction, Grid};
use crate::search::{self, Strategy};
use std::collections::HashSet;
use uuid::Uuid;

/// An autonomous snake: an ordered body of cells from head to tail, a
/// heading, and the search strategy it steers with.
#[derive(Clone, Debug)]
pub struct Snake {
    id: String,
    player: usize,
    body: Vec<Cell>,
    direction: Direction,
    alive: bool,
    score: usize,
    strategy: Strategy,
}

impl Snake {
    /// Creates a new snake of length one.
    ///
    /// # Arguments
    /// * `player` - The player number, used for scoreboard and colors.
    /// * `start` - The starting cell, which becomes the head.
    /// * `direction` - The starting heading.
    /// * `strategy` - The search strategy the snake steers with.
    pub fn new(player: usize, start: Cell, direction: Direction, strategy: Strategy) -> Snake {
        Snake {
            id: Uuid::new_v4().to_string(),
            player,
            body: vec![start],
            direction,
            alive: true,
            score: 0,
            strategy,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player(&self) -> usize {
        self.player
    }

    /// The head cell, always the most recently inserted one.
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    pub fn set_alive(&mut self, value: bool) {
        self.alive = value;
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Turns onto `direction` and inserts the new head. The tail is left
    /// alone; callers trim it separately once food consumption is resolved.
    pub fn advance(&mut self, direction: Direction) {
        self.direction = direction;
        let head = self.head().step(direction);
        self.body.insert(0, head);
    }

    /// Removes the tail cell, unless food was just consumed.
    pub fn trim_tail(&mut self, ate_food: bool) {
        if !ate_food {
            self.body.pop();
        }
    }

    /// Decides the direction to take this tick, in strict priority order:
    /// the assigned path search first, and only when it fails or returns a
    /// degenerate path, the fallback heuristics.
    ///
    /// # Arguments
    /// * `grid` - The arena.
    /// * `food` - The food cell to steer toward.
    /// * `occupied` - Snapshot of every snake's body cells from the previous
    ///   tick, including this snake's own.
    pub fn next_direction(&self, grid: &Grid, food: Cell, occupied: &HashSet<Cell>) -> Direction {
        if let Some(path) = search::find_path(grid, self.head(), food, occupied, self.strategy) {
            if path.len() >= 2 {
                if let Some(direction) = Direction::between(path[0], path[1]) {
                    return direction;
                }
            }
        }

        let head = self.head();

        // Alignment turn: only fires when the food lies on the axis
        // perpendicular to travel. A snake moving vertically toward food in
        // its own column does not turn here and falls through to the later
        // heuristics; the gate on the movement axis is deliberate.
        if self.direction.is_horizontal() && head.x == food.x {
            let candidate = if head.y < food.y {
                Direction::Down
            } else {
                Direction::Up
            };
            if self.permitted(candidate, grid, occupied) {
                return candidate;
            }
        }
        if !self.direction.is_horizontal() && head.y == food.y {
            let candidate = if head.x < food.x {
                Direction::Right
            } else {
                Direction::Left
            };
            if self.permitted(candidate, grid, occupied) {
                return candidate;
            }
        }

        // Keep going straight when the cell ahead is safe
        if self.permitted(self.direction, grid, occupied) {
            return self.direction;
        }

        // Perpendicular turn, relative left before relative right
        for candidate in self.direction.turns() {
            if self.permitted(candidate, grid, occupied) {
                return candidate;
            }
        }

        // Last resort: the safe non-reversing move that ends closest to the
        // food, ties broken by the fixed enumeration order
        let best = Direction::ALL
            .into_iter()
            .filter(|candidate| self.permitted(*candidate, grid, occupied))
            .min_by_key(|candidate| head.step(*candidate).manhattan(food));
        if let Some(direction) = best {
            return direction;
        }

        // Nothing is safe; keep the heading and let the collision check
        // settle it next tick
        self.direction
    }

    fn permitted(&self, candidate: Direction, grid: &Grid, occupied: &HashSet<Cell>) -> bool {
        candidate != self.direction.opposite()
            && is_safe(self.head().step(candidate), grid, occupied)
    }
}

fn is_safe(cell: Cell, grid: &Grid, occupied: &HashSet<Cell>) -> bool {
    grid.in_bounds(cell) && !grid.is_obstacle(cell) && !occupied.contains(&cell)
}
