use crate::grid::{Cell, Direction, Grid};
use crate::replay::{create_replay_logger, ReplayLogger};
use crate::search::Strategy;
use crate::snake::Snake;
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io::{stdout, Write};

/// The snake arena match.
/// Main entry point for running the simulation.
pub struct Game {
    grid: Grid,
    spawns: Vec<SnakeSpawn>,
    snakes: Vec<Snake>,
    food: Option<Cell>,
    turn: usize,
    max_turns: usize,
    started: bool,
    finished: bool,
    finished_reason: Option<FinishedReason>,
    replay_logger: Box<dyn ReplayLogger>,
    rng: StdRng,
}

/// Where and how a snake enters the arena.
#[derive(Clone, Copy, Debug)]
pub struct SnakeSpawn {
    /// The starting cell.
    pub cell: Cell,
    /// The starting heading.
    pub direction: Direction,
    /// The search strategy the snake steers with.
    pub strategy: Strategy,
}

/// Represents the reason the match finished.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FinishedReason {
    /// The match ended because at most one snake was left alive.
    LoneSurvivor,
    /// The match ended because the maximum number of turns was reached.
    TurnLimitReached,
}

/// Represents the externally observable state of the match.
#[derive(Clone, Debug)]
pub struct GameState {
    /// The current turn.
    pub turn: usize,
    /// The scores for each snake where the index is the player number.
    pub scores: Vec<usize>,
    /// The snakes, where the index is the player number.
    pub snakes: Vec<SnakeState>,
    /// The cell the food currently occupies.
    pub food: Cell,
    /// Whether the match has finished.
    pub finished: bool,
    /// The reason the match finished. `None` if the match has not finished.
    pub finished_reason: Option<FinishedReason>,
}

/// Represents a snake in the game state.
#[derive(Clone, Debug)]
pub struct SnakeState {
    /// The unique identifier for the snake.
    pub id: String,
    /// The player number.
    pub player: usize,
    /// The body cells, head first.
    pub body: Vec<Cell>,
    /// The current heading.
    pub direction: Direction,
    /// Whether the snake is alive.
    pub alive: bool,
    /// The accumulated score.
    pub score: usize,
    /// The search strategy the snake steers with.
    pub strategy: Strategy,
}

impl Game {
    /// Creates a new match.
    ///
    /// # Arguments
    /// * `grid` - The arena.
    /// * `spawns` - One entry per snake; the entry index becomes the player
    ///   number. Spawn cells must be open land and must not overlap.
    /// * `max_turns` - The maximum number of turns before the match ends.
    /// * `seed` - The seed for the random number generator.
    /// * `replay_filename` - The filename to save the replay of the match
    ///   to. If `None`, no replay will be saved.
    pub fn new(
        grid: Grid,
        spawns: Vec<SnakeSpawn>,
        max_turns: usize,
        seed: u64,
        replay_filename: Option<String>,
    ) -> Game {
        let mut taken = HashSet::new();
        for spawn in &spawns {
            if !grid.in_bounds(spawn.cell) || grid.is_obstacle(spawn.cell) {
                panic!(
                    "Snake spawn at ({}, {}) is not on open land",
                    spawn.cell.x, spawn.cell.y
                );
            }
            if !taken.insert(spawn.cell) {
                panic!(
                    "Snake spawns overlap at ({}, {})",
                    spawn.cell.x, spawn.cell.y
                );
            }
        }

        let mut obstacles: Vec<Cell> = grid.obstacles().iter().copied().collect();
        obstacles.sort();

        Game {
            replay_logger: create_replay_logger(
                replay_filename,
                grid.width(),
                grid.height(),
                obstacles,
            ),
            grid,
            spawns,
            snakes: Vec::new(),
            food: None,
            turn: 0,
            max_turns,
            started: false,
            finished: false,
            finished_reason: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Starts the match.
    ///
    /// Must be called once before updating the game state. Calling it again
    /// resets the match to its initial spawns.
    pub fn start(&mut self) -> GameState {
        self.turn = 0;
        self.started = true;
        self.finished = false;
        self.finished_reason = None;
        self.replay_logger.clear();

        self.snakes = self
            .spawns
            .iter()
            .enumerate()
            .map(|(player, spawn)| Snake::new(player, spawn.cell, spawn.direction, spawn.strategy))
            .collect();

        for snake in &self.snakes {
            self.replay_logger.log_spawn_snake(
                0,
                snake.id().to_string(),
                snake.player(),
                snake.head(),
            );
        }

        let food = self.random_free_cell();
        self.food = Some(food);
        self.replay_logger.log_spawn_food(0, food);

        self.replay_logger.log_turn(0, self.scores(), self.lengths());

        self.game_state()
    }

    /// Advances the match by one tick.
    ///
    /// All live snakes decide from the same snapshot of the previous tick,
    /// then move, then food and collisions are resolved.
    pub fn update(&mut self) -> GameState {
        if !self.started {
            panic!("Game has not started! Call `start` to start the game.");
        }

        if self.finished {
            panic!("Game is finished! Call `start` to start a new game.");
        }

        self.turn += 1;

        self.move_snakes();
        self.feed_snakes();
        self.check_collisions();
        self.check_for_endgame();

        let state = self.game_state();

        self.replay_logger
            .log_turn(self.turn, self.scores(), self.lengths());

        // If the match finished, log the end game and save the replay
        if self.finished {
            self.replay_logger
                .log_end_game(format!("{:?}", self.finished_reason.as_ref().unwrap()));
            self.replay_logger.save();
        }

        state
    }

    /// Draws the match to the console.
    pub fn draw(&self) {
        let mut stdout = stdout();

        execute!(
            stdout,
            Clear(ClearType::All),
            Hide,
            Print("Turn: "),
            Print(self.turn.to_string())
        )
        .unwrap();

        for snake in &self.snakes {
            execute!(
                stdout,
                SetForegroundColor(player_to_color(snake.player())),
                Print("\nSnake "),
                Print(snake.player().to_string()),
                Print(" ("),
                Print(format!("{:?}", snake.strategy())),
                Print("): Score = "),
                Print(snake.score().to_string()),
                Print(", Length = "),
                Print(snake.body().len().to_string()),
                Print(if snake.alive() { "" } else { ", dead" }),
                SetForegroundColor(Color::Reset)
            )
            .unwrap();
        }
        execute!(stdout, Print("\n\n")).unwrap();

        for y in 0..self.grid.height() as i32 {
            for x in 0..self.grid.width() as i32 {
                let (value, color) = self.cell_appearance(Cell::new(x, y));
                execute!(
                    stdout,
                    SetForegroundColor(color),
                    Print(value),
                    SetForegroundColor(Color::Reset)
                )
                .unwrap();
            }
            execute!(stdout, Print("\n")).unwrap();
        }

        stdout.flush().unwrap();
    }
}

impl Game {
    fn move_snakes(&mut self) {
        // Every decision is made against the same snapshot of the previous
        // tick; no head moves until all live snakes have decided
        let occupied = self.occupied_cells();
        let food = self.food.unwrap();

        let decisions: Vec<(usize, Direction)> = self
            .snakes
            .iter()
            .enumerate()
            .filter(|(_, snake)| snake.alive())
            .map(|(index, snake)| (index, snake.next_direction(&self.grid, food, &occupied)))
            .collect();

        for (index, direction) in decisions {
            let snake = &mut self.snakes[index];
            let from = snake.head();
            snake.advance(direction);

            let id = snake.id().to_string();
            let to = snake.head();
            self.replay_logger.log_move_snake(self.turn, id, from, to);
        }
    }

    fn feed_snakes(&mut self) {
        for index in 0..self.snakes.len() {
            if !self.snakes[index].alive() {
                continue;
            }

            let ate_food = self.snakes[index].head() == self.food.unwrap();
            if ate_food {
                self.snakes[index].increment_score();

                let id = self.snakes[index].id().to_string();
                let eaten = self.food.unwrap();
                self.replay_logger.log_eat_food(self.turn, id, eaten);

                let food = self.random_free_cell();
                self.food = Some(food);
                self.replay_logger.log_spawn_food(self.turn, food);
            }

            self.snakes[index].trim_tail(ate_food);
        }
    }

    fn check_collisions(&mut self) {
        // Collisions are resolved against the post-move positions before any
        // alive flag flips, so two snakes entering the same cell both die
        let mut casualties = Vec::new();

        for snake in self.snakes.iter().filter(|snake| snake.alive()) {
            let head = snake.head();

            let hits_own_body = snake.body()[1..].contains(&head);
            let hits_other_snake = self
                .snakes
                .iter()
                .filter(|other| other.player() != snake.player())
                .any(|other| other.body().contains(&head));

            if !self.grid.in_bounds(head)
                || self.grid.is_obstacle(head)
                || hits_own_body
                || hits_other_snake
            {
                casualties.push(snake.player());
            }
        }

        for player in casualties {
            self.snakes[player].set_alive(false);

            let id = self.snakes[player].id().to_string();
            let head = self.snakes[player].head();
            self.replay_logger.log_death(self.turn, id, head);
        }
    }

    fn check_for_endgame(&mut self) {
        let alive = self.snakes.iter().filter(|snake| snake.alive()).count();

        if alive <= 1 {
            self.finished = true;
            self.finished_reason = Some(FinishedReason::LoneSurvivor);

            return;
        }

        if self.turn >= self.max_turns {
            self.finished = true;
            self.finished_reason = Some(FinishedReason::TurnLimitReached);
        }
    }

    /// Picks a uniformly random cell that is neither a wall nor covered by
    /// any snake's body. Panics when no such cell exists; a saturated grid
    /// is a configuration error, not a recoverable state.
    fn random_free_cell(&mut self) -> Cell {
        let occupied = self.occupied_cells();
        let free: Vec<Cell> = (0..self.grid.height() as i32)
            .flat_map(|y| (0..self.grid.width() as i32).map(move |x| Cell::new(x, y)))
            .filter(|cell| !self.grid.is_obstacle(*cell) && !occupied.contains(cell))
            .collect();

        match free.choose(&mut self.rng) {
            Some(cell) => *cell,
            None => panic!("No free cell left to place food on! The grid is saturated."),
        }
    }

    /// The occupied-cell snapshot: every snake's full body, dead snakes
    /// included, since their bodies stay on the grid.
    fn occupied_cells(&self) -> HashSet<Cell> {
        self.snakes
            .iter()
            .flat_map(|snake| snake.body().iter().copied())
            .collect()
    }

    fn scores(&self) -> Vec<usize> {
        self.snakes.iter().map(|snake| snake.score()).collect()
    }

    fn lengths(&self) -> Vec<usize> {
        self.snakes.iter().map(|snake| snake.body().len()).collect()
    }

    fn game_state(&self) -> GameState {
        GameState {
            turn: self.turn,
            scores: self.scores(),
            snakes: self
                .snakes
                .iter()
                .map(|snake| SnakeState {
                    id: snake.id().to_string(),
                    player: snake.player(),
                    body: snake.body().to_vec(),
                    direction: snake.direction(),
                    alive: snake.alive(),
                    score: snake.score(),
                    strategy: snake.strategy(),
                })
                .collect(),
            food: self.food.unwrap(),
            finished: self.finished,
            finished_reason: self.finished_reason.clone(),
        }
    }

    fn cell_appearance(&self, cell: Cell) -> (char, Color) {
        for snake in &self.snakes {
            // Dead snakes are not drawn
            if !snake.alive() {
                continue;
            }

            if let Some(index) = snake.body().iter().position(|&body_cell| body_cell == cell) {
                let value = if index == 0 {
                    (snake.player() + 'A' as usize) as u8 as char
                } else {
                    (snake.player() + 'a' as usize) as u8 as char
                };
                return (value, player_to_color(snake.player()));
            }
        }

        if self.food == Some(cell) {
            return ('*', Color::Grey);
        }

        if self.grid.is_obstacle(cell) {
            return ('%', Color::DarkBlue);
        }

        ('.', Color::Reset)
    }
}

fn player_to_color(player: usize) -> Color {
    match player {
        0 => Color::Green,
        1 => Color::Blue,
        2 => Color::Red,
        3 => Color::Yellow,
        4 => Color::Magenta,
        5 => Color::Cyan,
        6 => Color::DarkRed,
        7 => Color::DarkGreen,
        8 => Color::DarkMagenta,
        9 => Color::DarkYellow,
        _ => panic!("Invalid player number"),
    }
}
