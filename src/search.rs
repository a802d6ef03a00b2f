use crate::grid::{Cell, Direction, Grid};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// The shortest-path strategy assigned to a snake.
///
/// Both strategies run through the same search core and always return a
/// shortest path; they only differ in how the frontier is ordered.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Strategy {
    /// Expands nodes by `cost so far + manhattan distance to the goal`.
    AStar,
    /// Expands nodes by cost alone, exploring more of the grid.
    Dijkstra,
}

impl Strategy {
    fn heuristic(&self, from: Cell, goal: Cell) -> usize {
        match self {
            Strategy::AStar => from.manhattan(goal),
            Strategy::Dijkstra => 0,
        }
    }
}

/// Finds a shortest path from `start` to `goal` on the 4-connected grid.
///
/// `blocked` cells are impassable, except for `start` and `goal` themselves
/// which are always exempt: the searching snake's own head sits in the
/// occupied snapshot, and the food cell must stay reachable even when a
/// body cell next to it is about to vacate.
///
/// The returned path has `path[0] == start` and ends at `goal`. Returns
/// `None` when the frontier is exhausted without reaching the goal. Ties in
/// the frontier are broken by insertion order, so identical inputs always
/// produce the identical path.
pub fn find_path(
    grid: &Grid,
    start: Cell,
    goal: Cell,
    blocked: &HashSet<Cell>,
    strategy: Strategy,
) -> Option<Vec<Cell>> {
    let mut frontier: BinaryHeap<Reverse<(usize, u64, Cell)>> = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut cost: HashMap<Cell, usize> = HashMap::new();
    let mut seq: u64 = 0;

    cost.insert(start, 0);
    frontier.push(Reverse((strategy.heuristic(start, goal), seq, start)));

    while let Some(Reverse((_, _, current))) = frontier.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, goal));
        }

        for direction in Direction::ALL {
            let neighbor = current.step(direction);

            if !grid.in_bounds(neighbor) {
                continue;
            }

            let exempt = neighbor == start || neighbor == goal;
            if !exempt && (grid.is_obstacle(neighbor) || blocked.contains(&neighbor)) {
                continue;
            }

            let tentative = cost[&current] + 1;
            if tentative < cost.get(&neighbor).copied().unwrap_or(usize::MAX) {
                came_from.insert(neighbor, current);
                cost.insert(neighbor, tentative);
                seq += 1;
                frontier.push(Reverse((
                    tentative + strategy.heuristic(neighbor, goal),
                    seq,
                    neighbor,
                )));
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Cell, Cell>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&previous) = came_from.get(&current) {
        current = previous;
        path.push(current);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRATEGIES: [Strategy; 2] = [Strategy::AStar, Strategy::Dijkstra];

    #[test]
    fn when_searching_an_open_grid_the_path_length_is_the_manhattan_distance_plus_one() {
        let grid = Grid::new(10, 10, vec![]);
        let pairs = [
            (Cell::new(0, 0), Cell::new(3, 0)),
            (Cell::new(0, 0), Cell::new(9, 9)),
            (Cell::new(4, 7), Cell::new(2, 1)),
            (Cell::new(5, 5), Cell::new(5, 6)),
        ];

        for strategy in STRATEGIES {
            for (start, goal) in pairs {
                let path = find_path(&grid, start, goal, &HashSet::new(), strategy).unwrap();

                assert_eq!(path.len(), start.manhattan(goal) + 1);
                assert_eq!(path[0], start);
                assert_eq!(*path.last().unwrap(), goal);
            }
        }
    }

    #[test]
    fn when_searching_around_a_wall_both_strategies_return_paths_of_equal_length() {
        // A vertical wall at x = 2 with a single gap at y = 4
        let grid = Grid::new(6, 6, vec![
            Cell::new(2, 0),
            Cell::new(2, 1),
            Cell::new(2, 2),
            Cell::new(2, 3),
            Cell::new(2, 5),
        ]);
        let start = Cell::new(0, 0);
        let goal = Cell::new(5, 0);

        let astar = find_path(&grid, start, goal, &HashSet::new(), Strategy::AStar).unwrap();
        let dijkstra = find_path(&grid, start, goal, &HashSet::new(), Strategy::Dijkstra).unwrap();

        assert_eq!(astar.len(), dijkstra.len());
        // The only way through is the gap at (2, 4)
        assert!(astar.contains(&Cell::new(2, 4)));
        assert!(dijkstra.contains(&Cell::new(2, 4)));
    }

    #[test]
    fn when_searching_twice_with_identical_inputs_the_identical_path_is_returned() {
        let grid = Grid::new(8, 8, vec![Cell::new(3, 3), Cell::new(4, 3)]);
        let blocked: HashSet<Cell> = [Cell::new(2, 2), Cell::new(5, 5)].into_iter().collect();

        for strategy in STRATEGIES {
            let first = find_path(&grid, Cell::new(0, 0), Cell::new(7, 7), &blocked, strategy);
            let second = find_path(&grid, Cell::new(0, 0), Cell::new(7, 7), &blocked, strategy);

            assert!(first.is_some());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn when_the_goal_is_walled_off_no_path_is_returned() {
        // The goal at (4, 4) is fully enclosed
        let grid = Grid::new(6, 6, vec![
            Cell::new(3, 3),
            Cell::new(4, 3),
            Cell::new(5, 3),
            Cell::new(3, 4),
            Cell::new(3, 5),
        ]);

        for strategy in STRATEGIES {
            let path = find_path(&grid, Cell::new(0, 0), Cell::new(4, 4), &HashSet::new(), strategy);
            assert!(path.is_none());
        }
    }

    #[test]
    fn when_the_goal_is_in_the_blocked_set_it_is_still_reachable() {
        let grid = Grid::new(5, 5, vec![]);
        let goal = Cell::new(3, 0);
        let blocked: HashSet<Cell> = [goal].into_iter().collect();

        for strategy in STRATEGIES {
            let path = find_path(&grid, Cell::new(0, 0), goal, &blocked, strategy).unwrap();
            assert_eq!(*path.last().unwrap(), goal);
        }
    }

    #[test]
    fn when_the_start_is_in_the_blocked_set_the_search_still_leaves_it() {
        // The snake's own head is always part of the occupied snapshot
        let grid = Grid::new(5, 5, vec![]);
        let start = Cell::new(2, 2);
        let blocked: HashSet<Cell> = [start].into_iter().collect();

        for strategy in STRATEGIES {
            let path = find_path(&grid, start, Cell::new(4, 2), &blocked, strategy).unwrap();
            assert_eq!(path[0], start);
            assert_eq!(path.len(), 3);
        }
    }

    #[test]
    fn when_blocked_cells_are_in_the_way_the_path_routes_around_them() {
        let grid = Grid::new(5, 5, vec![]);
        let blocked: HashSet<Cell> = [Cell::new(1, 0), Cell::new(1, 1)].into_iter().collect();

        for strategy in STRATEGIES {
            let path = find_path(&grid, Cell::new(0, 0), Cell::new(2, 0), &blocked, strategy).unwrap();

            assert!(!path.contains(&Cell::new(1, 0)));
            assert!(!path.contains(&Cell::new(1, 1)));
            // Detour below the blocked column: 2 extra steps each way
            assert_eq!(path.len(), 7);
        }
    }
}
