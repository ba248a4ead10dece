//! Maze generation using the Recursive Backtracker algorithm
//!
//! Algorithm (iterative, with an explicit stack):
//! 1. Pick one of the four edges, open an entrance and an exit on it
//! 2. Start at the entrance, mark it visited
//! 3. Loop:
//!    - Draw one of the 24 direction orderings
//!    - Take the first direction whose wall is closed and whose neighbour
//!      is unvisited: open the wall, push the current cell, move there
//!    - Otherwise backtrack by popping the stack; stop when it is empty
//!
//! The carved passages form a spanning tree: every cell is reachable and
//! there is exactly one path between any two cells.

use tracing::{debug, trace, warn};

use crate::architect::{Architect, FloorPlan};
use crate::error::Result;
use crate::rng::RandomSource;
use crate::wall::{Direction, Position, Wall};

use crate::wall::Direction::{East as E, North as N, South as S, West as W};

/// All 24 orderings of the four directions.
///
/// Reproducing legacy saved mazes from the same random sequence depends on
/// this exact table order.
#[rustfmt::skip]
pub const DIRECTION_ORDERINGS: [[Direction; 4]; 24] = [
    [N, E, S, W], [N, E, W, S], [N, S, E, W], [N, S, W, E], [N, W, E, S], [N, W, S, E],
    [E, N, S, W], [E, N, W, S], [E, S, N, W], [E, S, W, N], [E, W, N, S], [E, W, S, N],
    [S, E, N, W], [S, E, W, N], [S, N, E, W], [S, N, W, E], [S, W, E, N], [S, W, N, E],
    [W, E, S, N], [W, E, N, S], [W, S, E, N], [W, S, N, E], [W, N, E, S], [W, N, S, E],
];

/// Where the exit goes relative to the entrance edge
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExitPlacement {
    /// Exit on the same edge as the entrance (may be the same cell)
    #[default]
    SameEdge,
    /// Exit on the edge across the maze from the entrance
    OppositeEdge,
}

/// Randomized depth-first carving architect
#[derive(Clone, Debug, Default)]
pub struct RecursiveBacktracker {
    exit_placement: ExitPlacement,
}

impl RecursiveBacktracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_placement(exit_placement: ExitPlacement) -> Self {
        Self { exit_placement }
    }

    pub fn exit_placement(&self) -> ExitPlacement {
        self.exit_placement
    }

    /// Cell on `edge` at offset `index` along it
    fn edge_cell(edge: Direction, index: usize, width: usize, height: usize) -> Position {
        match edge {
            Direction::North => Position::new(index, 0),
            Direction::South => Position::new(index, height - 1),
            Direction::East => Position::new(width - 1, index),
            Direction::West => Position::new(0, index),
        }
    }

    /// Open a random boundary cell on `edge` and return it
    fn open_on_edge(
        plan: &mut FloorPlan<'_>,
        rng: &mut dyn RandomSource,
        edge: Direction,
    ) -> Result<Position> {
        let (width, height) = (plan.width(), plan.height());
        let span = match edge {
            Direction::North | Direction::South => width,
            Direction::East | Direction::West => height,
        };
        let pos = Self::edge_cell(edge, rng.uniform_index(span), width, height);
        plan.open_boundary(pos, edge)?;
        Ok(pos)
    }
}

impl Architect for RecursiveBacktracker {
    fn create_floor_plan(
        &mut self,
        plan: &mut FloorPlan<'_>,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        let width = plan.width();
        let height = plan.height();

        let edge_index = rng.uniform_range(Direction::North.index(), Direction::West.index());
        if edge_index > Direction::West.index() {
            warn!("Random source returned edge {} outside [0, 3]; reducing modulo 4", edge_index);
        }
        let edge = Direction::ALL[edge_index % Direction::ALL.len()];

        let entrance = Self::open_on_edge(plan, rng, edge)?;
        let exit_edge = match self.exit_placement {
            ExitPlacement::SameEdge => edge,
            ExitPlacement::OppositeEdge => edge.opposite(),
        };
        let exit = Self::open_on_edge(plan, rng, exit_edge)?;

        plan.set_entrance(entrance);
        plan.set_exit(exit);
        debug!(
            "Carving {}x{} maze from {:?} edge: entrance {}, exit {}",
            width, height, edge, entrance, exit
        );

        let mut visited = vec![false; width * height];
        let mut stack: Vec<Position> = Vec::with_capacity(width * height);
        let mut current = entrance;
        let mut carved = 0usize;

        visited[current.col * height + current.row] = true;

        loop {
            let ordering = &DIRECTION_ORDERINGS[rng.uniform_index(DIRECTION_ORDERINGS.len())];

            let mut next = None;
            for &dir in ordering {
                if plan.wall(current, dir)? != Wall::Closed {
                    continue;
                }
                // A closed wall always has a cell behind it
                let Some(neighbor) = plan.neighbor(current, dir) else {
                    continue;
                };
                if !visited[neighbor.col * height + neighbor.row] {
                    plan.carve(current, dir)?;
                    next = Some(neighbor);
                    break;
                }
            }

            match next {
                Some(neighbor) => {
                    stack.push(current);
                    current = neighbor;
                    visited[current.col * height + current.row] = true;
                    carved += 1;
                }
                None => match stack.pop() {
                    Some(previous) => {
                        trace!("Backtracking from {} to {}", current, previous);
                        current = previous;
                    }
                    None => break,
                },
            }
        }

        debug!("Carved {} passages", carved);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Maze;
    use crate::rng::SimpleLCG;
    use std::collections::VecDeque;

    /// Replays a fixed list of draws, then returns the lowest legal value
    struct ScriptedSource {
        values: VecDeque<usize>,
    }

    impl ScriptedSource {
        fn new(values: &[usize]) -> Self {
            Self {
                values: values.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn uniform_range(&mut self, low: usize, high: usize) -> usize {
            let value = self.values.pop_front().unwrap_or(low);
            assert!(
                (low..=high).contains(&value),
                "scripted {} outside [{}, {}]",
                value,
                low,
                high
            );
            value
        }

        fn uniform_index(&mut self, n: usize) -> usize {
            let value = self.values.pop_front().unwrap_or(0);
            assert!(value < n, "scripted {} outside [0, {})", value, n);
            value
        }
    }

    /// Count reachable cells through open interior walls
    fn reachable(maze: &Maze, start: Position) -> usize {
        let (w, h) = (maze.width(), maze.height());
        let mut seen = vec![false; w * h];
        let mut queue = VecDeque::from([start]);
        seen[start.col * h + start.row] = true;
        let mut count = 0;

        while let Some(pos) = queue.pop_front() {
            count += 1;
            for dir in Direction::ALL {
                if !maze.wall(pos, dir).unwrap().is_open() {
                    continue;
                }
                if let Some(next) = pos.step(dir, w, h) {
                    if !seen[next.col * h + next.row] {
                        seen[next.col * h + next.row] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        count
    }

    fn boundary_openings(maze: &Maze) -> Vec<(Position, Direction)> {
        let mut openings = Vec::new();
        for col in 0..maze.width() {
            for row in 0..maze.height() {
                let pos = Position::new(col, row);
                for dir in Direction::ALL {
                    if !maze.is_boundary(pos, dir) {
                        continue;
                    }
                    match maze.wall(pos, dir).unwrap() {
                        Wall::Open => openings.push((pos, dir)),
                        Wall::Solid => {}
                        Wall::Closed => panic!("boundary wall at {} {:?} is closed", pos, dir),
                    }
                }
            }
        }
        openings
    }

    #[test]
    fn test_orderings_are_permutations() {
        for (i, ordering) in DIRECTION_ORDERINGS.iter().enumerate() {
            let mut indices: Vec<usize> = ordering.iter().map(|d| d.index()).collect();
            indices.sort_unstable();
            assert_eq!(indices, vec![0, 1, 2, 3], "ordering {} is not a permutation", i);
        }
        for i in 0..24 {
            for j in (i + 1)..24 {
                assert_ne!(DIRECTION_ORDERINGS[i], DIRECTION_ORDERINGS[j]);
            }
        }
    }

    #[test]
    fn test_spanning_tree() {
        let cases = [(2, 2, 1), (3, 7, 42), (10, 10, 99999), (20, 20, 2918957128), (31, 5, 7)];
        for (w, h, seed) in cases {
            let mut rng = SimpleLCG::new(seed);
            let maze = Maze::generate(w, h, &mut RecursiveBacktracker::new(), &mut rng).unwrap();

            assert_eq!(maze.open_interior_walls(), w * h - 1, "{}x{} seed {}", w, h, seed);
            let entrance = maze.entrance().unwrap();
            assert_eq!(reachable(&maze, entrance), w * h, "{}x{} seed {}", w, h, seed);
        }
    }

    #[test]
    fn test_boundary_invariant() {
        let mut rng = SimpleLCG::new(12345);
        for _ in 0..20 {
            let maze = Maze::generate(6, 4, &mut RecursiveBacktracker::new(), &mut rng).unwrap();
            let openings = boundary_openings(&maze);

            // Entrance and exit may share a cell, but always share an edge
            assert!(!openings.is_empty() && openings.len() <= 2);
            let edge = openings[0].1;
            assert!(openings.iter().all(|(_, dir)| *dir == edge));

            let entrance = maze.entrance().unwrap();
            let exit = maze.exit().unwrap();
            assert!(openings.contains(&(entrance, edge)));
            assert!(openings.contains(&(exit, edge)));
        }
    }

    #[test]
    fn test_opposite_edge_exit() {
        let mut rng = SimpleLCG::new(777);
        let mut architect = RecursiveBacktracker::with_exit_placement(ExitPlacement::OppositeEdge);
        for _ in 0..20 {
            let maze = Maze::generate(5, 5, &mut architect, &mut rng).unwrap();
            let openings = boundary_openings(&maze);
            assert_eq!(openings.len(), 2);
            assert_eq!(openings[0].1.opposite(), openings[1].1);
            assert_eq!(maze.open_interior_walls(), 24);
        }
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = SimpleLCG::new(99999);
        let mut rng2 = SimpleLCG::new(99999);
        let maze1 = Maze::generate(10, 10, &mut RecursiveBacktracker::new(), &mut rng1).unwrap();
        let maze2 = Maze::generate(10, 10, &mut RecursiveBacktracker::new(), &mut rng2).unwrap();
        assert_eq!(maze1, maze2);
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = SimpleLCG::new(11111);
        let mut rng2 = SimpleLCG::new(22222);
        let maze1 = Maze::generate(10, 10, &mut RecursiveBacktracker::new(), &mut rng1).unwrap();
        let maze2 = Maze::generate(10, 10, &mut RecursiveBacktracker::new(), &mut rng2).unwrap();

        // Different seeds should (almost certainly) produce different mazes
        assert_ne!(maze1, maze2);
    }

    #[test]
    fn test_scripted_trace_3x3() {
        // North edge, entrance column 1, exit column 2, then orderings:
        // 6 = [E, N, S, W], 12 = [S, E, N, W], then 0 = [N, E, S, W] until done
        let mut rng = ScriptedSource::new(&[0, 1, 2, 6, 12, 12, 12, 12, 12]);
        let maze = Maze::generate(3, 3, &mut RecursiveBacktracker::new(), &mut rng).unwrap();

        assert_eq!(maze.entrance(), Some(Position::new(1, 0)));
        assert_eq!(maze.exit(), Some(Position::new(2, 0)));
        assert_eq!(maze.get_cell(1, 0).unwrap().north(), Wall::Open);
        assert_eq!(maze.get_cell(2, 0).unwrap().north(), Wall::Open);
        assert_eq!(maze.get_cell(0, 0).unwrap().north(), Wall::Solid);

        // Path carved: (1,0) E (2,0) S (2,1) S (2,2) W (1,2) N (1,1) W (0,1) N (0,0),
        // backtrack to (0,1), then S to (0,2)
        let open = [
            (Position::new(1, 0), Direction::East),
            (Position::new(2, 0), Direction::South),
            (Position::new(2, 1), Direction::South),
            (Position::new(2, 2), Direction::West),
            (Position::new(1, 2), Direction::North),
            (Position::new(1, 1), Direction::West),
            (Position::new(0, 1), Direction::North),
            (Position::new(0, 1), Direction::South),
        ];
        let closed = [
            (Position::new(0, 0), Direction::East),
            (Position::new(1, 0), Direction::South),
            (Position::new(1, 1), Direction::East),
            (Position::new(0, 2), Direction::East),
        ];

        for (pos, dir) in open {
            assert_eq!(maze.wall(pos, dir).unwrap(), Wall::Open, "{} {:?}", pos, dir);
        }
        for (pos, dir) in closed {
            assert_eq!(maze.wall(pos, dir).unwrap(), Wall::Closed, "{} {:?}", pos, dir);
        }
        assert_eq!(maze.open_interior_walls(), 8);

        let bitmap = crate::render::render(&maze, 4).unwrap();
        assert_eq!(bitmap.width(), 20);
        assert_eq!(bitmap.height(), 20);
    }

    #[test]
    fn test_entrance_may_equal_exit() {
        // West edge, both draws pick row 1
        let mut rng = ScriptedSource::new(&[3, 1, 1]);
        let maze = Maze::generate(2, 3, &mut RecursiveBacktracker::new(), &mut rng).unwrap();

        assert_eq!(maze.entrance(), Some(Position::new(0, 1)));
        assert_eq!(maze.exit(), Some(Position::new(0, 1)));
        assert_eq!(maze.get_cell(0, 1).unwrap().west(), Wall::Open);
        assert_eq!(maze.open_interior_walls(), 5);
    }

    /// Returns values above `high` for edge draws
    struct OverflowingSource;

    impl RandomSource for OverflowingSource {
        fn uniform_range(&mut self, _low: usize, high: usize) -> usize {
            high + 2
        }

        fn uniform_index(&mut self, _n: usize) -> usize {
            0
        }
    }

    #[test]
    fn test_out_of_range_edge_wraps() {
        // 3 + 2 = 5 wraps to East rather than falling back to North
        let mut architect = RecursiveBacktracker::new();
        let maze = Maze::generate(3, 3, &mut architect, &mut OverflowingSource).unwrap();

        assert_eq!(maze.entrance(), Some(Position::new(2, 0)));
        assert_eq!(maze.get_cell(2, 0).unwrap().east(), Wall::Open);
        assert_eq!(maze.get_cell(1, 0).unwrap().north(), Wall::Solid);
        assert_eq!(maze.open_interior_walls(), 8);
    }
}
