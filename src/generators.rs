use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{CellCoordinate, CoordinateSmallVec, DirectionSmallVec, DIRECTIONS};
use crate::grid::{BoundarySide, Grid};
use crate::units::ColumnIndex;
use crate::utils::fnv_hashset;

/// Diagnostic sink invoked once per significant generation state transition.
/// All hooks default to doing nothing, so implementors observe only what they
/// care about.
pub trait GenerationTracer {
    fn cell_visited(&mut self, _cell: CellCoordinate) {}
    fn passage_carved(&mut self, _from: CellCoordinate, _to: CellCoordinate) {}
    fn boundary_opened(&mut self, _side: BoundarySide, _column: ColumnIndex) {}
}

/// Apply Prim's maze generation algorithm to a grid.
/// Grows the maze from a random start cell by repeatedly picking a uniformly
/// random member of the frontier (the cells discovered next to the maze but not
/// yet in it) and carving a passage back to a random already-visited neighbour.
/// Picking uniformly over the whole frontier - rather than the newest or oldest
/// member - is what gives Prim's mazes their short, frequently branching
/// passages.
pub fn prims(grid: &mut Grid, rng: &mut SmallRng, mut tracer: Option<&mut dyn GenerationTracer>) {
    let start_cell = grid.random_cell(rng);
    grid.mark_visited(start_cell);
    if let Some(t) = tracer.as_deref_mut() {
        t.cell_visited(start_cell);
    }

    let mut frontier: Vec<CellCoordinate> = Vec::with_capacity(grid.size());
    let mut frontier_members = fnv_hashset(grid.size());
    frontier.push(start_cell);
    frontier_members.insert(start_cell);

    while !frontier.is_empty() {
        let frontier_index = rng.gen_range(0..frontier.len());
        let frontier_cell = frontier[frontier_index];

        for &neighbour in &grid.unvisited_neighbours(frontier_cell) {
            if frontier_members.insert(neighbour) {
                frontier.push(neighbour);
            }
        }

        // The start cell has no visited neighbours yet, so there is nothing to
        // carve on the very first pass.
        let into_maze = visited_neighbours(grid, frontier_cell);
        if let Some(&maze_cell) = into_maze.choose(rng) {
            grid.carve_passage(frontier_cell, maze_cell)
                .expect("frontier cell and neighbour are adjacent grid cells");
            if let Some(t) = tracer.as_deref_mut() {
                t.passage_carved(frontier_cell, maze_cell);
            }
        }

        grid.mark_visited(frontier_cell);
        if let Some(t) = tracer.as_deref_mut() {
            t.cell_visited(frontier_cell);
        }

        // Remove by identity: the frontier grew above, so the picked index may
        // no longer be trusted.
        let position = frontier
            .iter()
            .position(|&coord| coord == frontier_cell)
            .expect("the picked cell is still in the frontier");
        frontier.swap_remove(position);
        frontier_members.remove(&frontier_cell);
    }

    cut_boundary_openings(grid, rng, &mut tracer);
}

/// Apply the recursive backtracker maze generation algorithm to a grid.
/// Depth first: from each cell, try the four directions in a fresh random
/// order, carving into and descending through any unvisited neighbour, and
/// backtrack once every direction is exhausted. The depth bias produces long
/// winding corridors with few but long dead ends.
///
/// The recursion is realized as an explicit stack of
/// (cell, shuffled directions, next direction) frames, so a worst case single
/// corridor maze costs heap proportional to the cell count instead of program
/// stack.
pub fn recursive_backtracker(grid: &mut Grid,
                             rng: &mut SmallRng,
                             mut tracer: Option<&mut dyn GenerationTracer>) {
    let start_cell = grid.random_cell(rng);
    grid.mark_visited(start_cell);
    if let Some(t) = tracer.as_deref_mut() {
        t.cell_visited(start_cell);
    }

    let mut stack: Vec<(CellCoordinate, DirectionSmallVec, usize)> =
        Vec::with_capacity(grid.size());
    stack.push((start_cell, shuffled_directions(rng), 0));

    while !stack.is_empty() {
        let frame_index = stack.len() - 1;
        let (cell, direction) = {
            let frame = &mut stack[frame_index];
            if frame.2 < frame.1.len() {
                let direction = frame.1[frame.2];
                frame.2 += 1;
                (frame.0, Some(direction))
            } else {
                (frame.0, None)
            }
        };

        let direction = match direction {
            Some(direction) => direction,
            None => {
                // Dead end - every direction tried, unwind to the previous cell.
                stack.pop();
                continue;
            }
        };

        if let Some(neighbour) = grid.neighbour_at_direction(cell, direction) {
            if !grid.is_visited(neighbour) {
                grid.carve_passage(neighbour, cell)
                    .expect("cell and neighbour are adjacent grid cells");
                grid.mark_visited(neighbour);
                if let Some(t) = tracer.as_deref_mut() {
                    t.passage_carved(neighbour, cell);
                    t.cell_visited(neighbour);
                }
                stack.push((neighbour, shuffled_directions(rng), 0));
            }
        }
    }

    cut_boundary_openings(grid, rng, &mut tracer);
}

/// Visited neighbours of a cell in the fixed enumeration order. Lives here
/// rather than on the grid because Prim's is its only consumer.
fn visited_neighbours(grid: &Grid, coord: CellCoordinate) -> CoordinateSmallVec {
    grid.neighbours(coord)
        .iter()
        .cloned()
        .filter(|&neighbour| grid.is_visited(neighbour))
        .collect()
}

fn shuffled_directions(rng: &mut SmallRng) -> DirectionSmallVec {
    let mut directions: DirectionSmallVec = SmallVec::from_slice(&DIRECTIONS);
    directions.shuffle(rng);
    directions
}

/// Cut one entrance on the top row and one exit on the bottom row, each at an
/// independently chosen uniformly random column.
fn cut_boundary_openings(grid: &mut Grid,
                         rng: &mut SmallRng,
                         tracer: &mut Option<&mut dyn GenerationTracer>) {
    let columns = grid.columns().0;

    let entrance = ColumnIndex(rng.gen_range(0..columns));
    grid.open_boundary(BoundarySide::Top, entrance)
        .expect("entrance column is within the grid");
    if let Some(t) = tracer.as_deref_mut() {
        t.boundary_opened(BoundarySide::Top, entrance);
    }

    let exit = ColumnIndex(rng.gen_range(0..columns));
    grid.open_boundary(BoundarySide::Bottom, exit)
        .expect("exit column is within the grid");
    if let Some(t) = tracer.as_deref_mut() {
        t.boundary_opened(BoundarySide::Bottom, exit);
    }
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cells::{Direction, Wall};
    use crate::units::{ColumnsCount, RowsCount};

    type GenerateFn = fn(&mut Grid, &mut SmallRng, Option<&mut dyn GenerationTracer>);

    fn generated_grid<F>(rows: usize, columns: usize, seed: u64, generate: F) -> Grid
        where F: Fn(&mut Grid, &mut SmallRng, Option<&mut dyn GenerationTracer>)
    {
        let mut grid = Grid::new(RowsCount(rows), ColumnsCount(columns))
            .expect("valid test grid dimensions");
        let mut rng = SmallRng::seed_from_u64(seed);
        generate(&mut grid, &mut rng, None);
        grid
    }

    /// Count the cells reachable from the first cell through open passages.
    fn reachable_cells_count(grid: &Grid) -> usize {
        let mut seen = fnv_hashset(grid.size());
        let mut pending = vec![CellCoordinate::new(0, 0)];
        seen.insert(CellCoordinate::new(0, 0));
        while let Some(coord) = pending.pop() {
            for &neighbour in &grid.neighbours(coord) {
                if grid.is_linked(coord, neighbour) && seen.insert(neighbour) {
                    pending.push(neighbour);
                }
            }
        }
        seen.len()
    }

    fn walls_are_symmetric(grid: &Grid) -> bool {
        grid.iter().all(|coord| {
            let cell = grid.cell(coord).expect("iterated coordinates are valid");
            let right_ok = match grid.neighbour_at_direction(coord, Direction::Right) {
                Some(r) => {
                    cell.has_right_wall() ==
                    grid.cell(r).expect("neighbour is valid").has_left_wall()
                }
                None => true,
            };
            let down_ok = match grid.neighbour_at_direction(coord, Direction::Down) {
                Some(d) => {
                    cell.has_bottom_wall() ==
                    grid.cell(d).expect("neighbour is valid").has_top_wall()
                }
                None => true,
            };
            right_ok && down_ok
        })
    }

    fn openings_count(grid: &Grid, side: BoundarySide) -> usize {
        let (row, wall) = match side {
            BoundarySide::Top => (0, Wall::Top),
            BoundarySide::Bottom => (grid.rows().0 as isize - 1, Wall::Bottom),
        };
        (0..grid.columns().0 as isize)
            .filter(|&column| !grid.cell_at(row, column).unwrap().has_wall(wall))
            .count()
    }

    #[test]
    fn prims_three_by_three_is_a_spanning_tree() {
        let grid = generated_grid(3, 3, 42, prims);
        assert_eq!(grid.passages_count(), 8);
        assert_eq!(reachable_cells_count(&grid), 9);
        assert!(grid.iter().all(|coord| grid.is_visited(coord)));
        assert_eq!(openings_count(&grid, BoundarySide::Top), 1);
        assert_eq!(openings_count(&grid, BoundarySide::Bottom), 1);
    }

    #[test]
    fn backtracker_three_by_three_is_a_spanning_tree() {
        let grid = generated_grid(3, 3, 42, recursive_backtracker);
        assert_eq!(grid.passages_count(), 8);
        assert_eq!(reachable_cells_count(&grid), 9);
        assert!(grid.iter().all(|coord| grid.is_visited(coord)));
        assert_eq!(openings_count(&grid, BoundarySide::Top), 1);
        assert_eq!(openings_count(&grid, BoundarySide::Bottom), 1);
    }

    #[test]
    fn single_cell_grid_generates() {
        for generate in &[prims as GenerateFn, recursive_backtracker] {
            let grid = generated_grid(1, 1, 3, generate);
            assert_eq!(grid.passages_count(), 0);
            assert!(grid.is_visited(CellCoordinate::new(0, 0)));
            // The lone cell is both the entrance and the exit.
            assert!(!grid.cell_at(0, 0).unwrap().has_top_wall());
            assert!(!grid.cell_at(0, 0).unwrap().has_bottom_wall());
        }
    }

    #[test]
    fn single_row_and_single_column_grids_generate() {
        for generate in &[prims as GenerateFn, recursive_backtracker] {
            let wide = generated_grid(1, 6, 11, generate);
            assert_eq!(wide.passages_count(), 5);
            assert_eq!(reachable_cells_count(&wide), 6);

            let tall = generated_grid(6, 1, 11, generate);
            assert_eq!(tall.passages_count(), 5);
            assert_eq!(reachable_cells_count(&tall), 6);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_maze() {
        for generate in &[prims as GenerateFn, recursive_backtracker] {
            let first = generated_grid(8, 8, 99, generate);
            let second = generated_grid(8, 8, 99, generate);
            assert_eq!(format!("{}", first), format!("{}", second));

            let other_seed = generated_grid(8, 8, 100, generate);
            assert_ne!(format!("{}", first), format!("{}", other_seed));
        }
    }

    #[derive(Default)]
    struct CountingTracer {
        cells_visited: usize,
        passages_carved: usize,
        boundaries_opened: usize,
    }
    impl GenerationTracer for CountingTracer {
        fn cell_visited(&mut self, _cell: CellCoordinate) {
            self.cells_visited += 1;
        }
        fn passage_carved(&mut self, _from: CellCoordinate, _to: CellCoordinate) {
            self.passages_carved += 1;
        }
        fn boundary_opened(&mut self, _side: BoundarySide, _column: ColumnIndex) {
            self.boundaries_opened += 1;
        }
    }

    #[test]
    fn tracer_sees_every_state_transition() {
        for generate in &[prims as GenerateFn, recursive_backtracker] {
            let mut grid =
                Grid::new(RowsCount(5), ColumnsCount(4)).expect("valid test grid dimensions");
            let mut rng = SmallRng::seed_from_u64(17);
            let mut tracer = CountingTracer::default();
            generate(&mut grid, &mut rng, Some(&mut tracer));

            // Prim's revisits the start cell when it leaves the frontier.
            assert!(tracer.cells_visited >= 20 && tracer.cells_visited <= 21);
            assert_eq!(tracer.passages_carved, 19);
            assert_eq!(tracer.boundaries_opened, 2);
        }
    }

    quickcheck! {
        fn prims_mazes_are_perfect(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (usize::from(rows % 8) + 1, usize::from(columns % 8) + 1);
            let grid = generated_grid(rows, columns, seed, prims);
            TestResult::from_bool(grid.passages_count() == rows * columns - 1 &&
                                  reachable_cells_count(&grid) == rows * columns &&
                                  walls_are_symmetric(&grid) &&
                                  openings_count(&grid, BoundarySide::Top) == 1 &&
                                  openings_count(&grid, BoundarySide::Bottom) == 1)
        }

        fn backtracker_mazes_are_perfect(rows: u8, columns: u8, seed: u64) -> TestResult {
            let (rows, columns) = (usize::from(rows % 8) + 1, usize::from(columns % 8) + 1);
            let grid = generated_grid(rows, columns, seed, recursive_backtracker);
            TestResult::from_bool(grid.passages_count() == rows * columns - 1 &&
                                  reachable_cells_count(&grid) == rows * columns &&
                                  walls_are_symmetric(&grid) &&
                                  openings_count(&grid, BoundarySide::Top) == 1 &&
                                  openings_count(&grid, BoundarySide::Bottom) == 1)
        }
    }
}
