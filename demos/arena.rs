use snakes_engine::{Cell, Direction, Game, Grid, SnakeSpawn, Strategy};
use std::thread;
use std::time::Duration;

fn main() {
    // The classic arena: a horizontal wall across the middle and a vertical
    // wall on the left side
    let mut obstacles = Vec::new();
    for x in 10..=30 {
        obstacles.push(Cell::new(x, 12));
    }
    for y in 5..=14 {
        obstacles.push(Cell::new(5, y));
    }
    let grid = Grid::new(40, 25, obstacles);

    let spawns = vec![
        SnakeSpawn {
            cell: Cell::new(3, 5),
            direction: Direction::Right,
            strategy: Strategy::AStar,
        },
        SnakeSpawn {
            cell: Cell::new(34, 19),
            direction: Direction::Left,
            strategy: Strategy::Dijkstra,
        },
    ];

    let replay_filename = "/tmp/arena_replay.json".to_string();
    let mut game = Game::new(grid, spawns, 1500, 0, Some(replay_filename));

    let mut state = game.start();
    game.draw();

    while !state.finished {
        thread::sleep(Duration::from_millis(100));
        state = game.update();
        game.draw();
    }

    println!(
        "\nMatch finished due to: {:?}",
        state.finished_reason.unwrap()
    );
    for snake in &state.snakes {
        println!(
            "Snake {} ({:?}): score {}{}",
            snake.player,
            snake.strategy,
            snake.score,
            if snake.alive { "" } else { " (died)" }
        );
    }
}
