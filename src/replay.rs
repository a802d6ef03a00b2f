use crate::grid::Cell;
use serde_json::json;
use std::{collections::HashMap, fs::File, io::BufWriter};

pub fn create_replay_logger(
    filename: Option<String>,
    grid_width: usize,
    grid_height: usize,
    obstacles: Vec<Cell>,
) -> Box<dyn ReplayLogger> {
    match filename {
        None => Box::new(NoOpReplayLogger {}),
        Some(filename) => Box::new(JsonReplayLogger::new(
            filename,
            grid_width,
            grid_height,
            obstacles,
        )),
    }
}

pub trait ReplayLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_turn(&mut self, turn: usize, scores: Vec<usize>, lengths: Vec<usize>) {}

    #[allow(unused_variables)]
    fn log_end_game(&mut self, reason: String) {}

    #[allow(unused_variables)]
    fn log_event(&mut self, turn: usize, event: Event) {}

    fn clear(&mut self) {}

    fn save(&self) {}

    fn log_spawn_snake(&mut self, turn: usize, id: String, player: usize, location: Cell) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Spawn,
                snake_id: Some(id),
                player: Some(player),
                location: Some(location),
                destination: None,
            },
        );
    }

    fn log_move_snake(&mut self, turn: usize, id: String, location: Cell, destination: Cell) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Move,
                snake_id: Some(id),
                player: None,
                location: Some(location),
                destination: Some(destination),
            },
        );
    }

    fn log_spawn_food(&mut self, turn: usize, location: Cell) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::SpawnFood,
                snake_id: None,
                player: None,
                location: Some(location),
                destination: None,
            },
        );
    }

    fn log_eat_food(&mut self, turn: usize, id: String, location: Cell) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::EatFood,
                snake_id: Some(id),
                player: None,
                location: Some(location),
                destination: None,
            },
        );
    }

    fn log_death(&mut self, turn: usize, id: String, location: Cell) {
        self.log_event(
            turn,
            Event {
                event_type: EventType::Death,
                snake_id: Some(id),
                player: None,
                location: Some(location),
                destination: None,
            },
        );
    }
}

#[derive(serde::Serialize)]
enum EventType {
    Spawn,
    Move,
    SpawnFood,
    EatFood,
    Death,
}

#[derive(serde::Serialize)]
pub struct Event {
    event_type: EventType,
    snake_id: Option<String>,
    player: Option<usize>,
    location: Option<Cell>,
    destination: Option<Cell>,
}

struct Turn {
    turn: usize,
    scores: Vec<usize>,
    lengths: Vec<usize>,
}

struct NoOpReplayLogger;
impl ReplayLogger for NoOpReplayLogger {}

struct JsonReplayLogger {
    filename: String,
    grid_width: usize,
    grid_height: usize,
    obstacles: Vec<Cell>,
    turns: Vec<Turn>,
    events: HashMap<usize, Vec<Event>>,
    finished_reason: Option<String>,
}

impl JsonReplayLogger {
    pub fn new(
        filename: String,
        grid_width: usize,
        grid_height: usize,
        obstacles: Vec<Cell>,
    ) -> JsonReplayLogger {
        JsonReplayLogger {
            filename,
            grid_width,
            grid_height,
            obstacles,
            turns: Vec::new(),
            events: HashMap::new(),
            finished_reason: None,
        }
    }
}

impl ReplayLogger for JsonReplayLogger {
    fn log_turn(&mut self, turn: usize, scores: Vec<usize>, lengths: Vec<usize>) {
        self.turns.push(Turn {
            turn,
            scores,
            lengths,
        });
    }

    fn log_end_game(&mut self, reason: String) {
        self.finished_reason = Some(reason);
    }

    fn log_event(&mut self, turn: usize, event: Event) {
        self.events.entry(turn).or_default().push(event);
    }

    fn clear(&mut self) {
        self.turns.clear();
        self.events.clear();
        self.finished_reason = None;
    }

    fn save(&self) {
        let file = File::create(&self.filename).unwrap();
        let turns: Vec<_> = self
            .turns
            .iter()
            .map(|turn| {
                json!({
                    "turn": turn.turn,
                    "scores": turn.scores,
                    "lengths": turn.lengths,
                    "events": self.events.get(&turn.turn).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let data = json!({
            "grid": {
                "width": self.grid_width,
                "height": self.grid_height,
                "obstacles": self.obstacles,
            },
            "turns": turns,
            "finished_reason": self.finished_reason,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data).unwrap();
    }
}
