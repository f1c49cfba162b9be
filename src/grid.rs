use rand::rngs::SmallRng;
use rand::Rng;
use std::error;
use std::fmt;

use crate::cells::{Cell, CellCoordinate, CoordinateSmallVec, Direction, Wall, DIRECTIONS};
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// An owning rectangular grid of cells. The dimensions are fixed at construction
/// and every cell is addressed by its `(row, column)` coordinate - cells never
/// reference the grid or each other.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: RowsCount,
    columns: ColumnsCount,
}

/// Rejected grid dimensions: both row and column counts must be at least one
/// (and their product must be addressable).
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct InvalidDimensionsError {
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for InvalidDimensionsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "invalid grid dimensions {}x{}: a grid needs at least 1 row and 1 column",
               self.rows,
               self.columns)
    }
}
impl error::Error for InvalidDimensionsError {}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CarveError {
    InvalidGridCoordinate,
    CellsNotAdjacent,
}

impl fmt::Display for CarveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CarveError::InvalidGridCoordinate => write!(f, "coordinate outside the grid"),
            CarveError::CellsNotAdjacent => write!(f, "cells are not grid-adjacent"),
        }
    }
}
impl error::Error for CarveError {}

/// The two grid edges that can be opened to make an entrance or exit.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum BoundarySide {
    Top,
    Bottom,
}

impl Grid {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> Result<Grid, InvalidDimensionsError> {
        let invalid = InvalidDimensionsError {
            rows: rows.0,
            columns: columns.0,
        };
        if rows.0 < 1 || columns.0 < 1 {
            return Err(invalid);
        }
        let cells_count = rows.0.checked_mul(columns.0).ok_or(invalid)?;

        let mut cells = Vec::with_capacity(cells_count);
        for index in 0..cells_count {
            cells.push(Cell::new(CellCoordinate::from_row_major_index(index, columns)));
        }

        Ok(Grid { cells, rows, columns })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.rows.0 * self.columns.0
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Bounds checked cell lookup. Coordinates outside
    /// `[0, rows) x [0, columns)` (negatives included) are absent, not an error.
    #[inline]
    pub fn cell_at(&self, row: isize, column: isize) -> Option<&Cell> {
        self.cell(CellCoordinate::new(row, column))
    }

    #[inline]
    pub fn cell(&self, coord: CellCoordinate) -> Option<&Cell> {
        self.coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        coord.row >= 0 && coord.column >= 0 && (coord.row as usize) < self.rows.0 &&
        (coord.column as usize) < self.columns.0
    }

    /// The adjacent coordinate one step in `direction`, or absent at the grid boundary.
    pub fn neighbour_at_direction(&self,
                                  coord: CellCoordinate,
                                  direction: Direction)
                                  -> Option<CellCoordinate> {
        let neighbour_coord = coord.offset(direction);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    /// All in-grid neighbours of a cell, in the fixed Up, Right, Down, Left order.
    pub fn neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        DIRECTIONS
            .iter()
            .filter_map(|&direction| self.neighbour_at_direction(coord, direction))
            .collect()
    }

    /// The in-grid neighbours not yet incorporated into the maze, in the same
    /// fixed order as `neighbours`. The order only matters for reproducibility
    /// under a fixed random seed.
    pub fn unvisited_neighbours(&self, coord: CellCoordinate) -> CoordinateSmallVec {
        self.neighbours(coord)
            .iter()
            .cloned()
            .filter(|&neighbour| !self.is_visited(neighbour))
            .collect()
    }

    /// Uniformly random cell over the full coordinate range.
    pub fn random_cell(&self, rng: &mut SmallRng) -> CellCoordinate {
        let index = rng.gen::<usize>() % self.size();
        CellCoordinate::from_row_major_index(index, self.columns)
    }

    /// Open the mutual wall pair between two grid-adjacent cells as one update.
    /// Which wall faces which is derived purely from the relative coordinates
    /// (lower row is above, lower column is to the left).
    pub fn carve_passage(&mut self,
                         a: CellCoordinate,
                         b: CellCoordinate)
                         -> Result<(), CarveError> {
        let a_index = self.coordinate_to_index(a).ok_or(CarveError::InvalidGridCoordinate)?;
        let b_index = self.coordinate_to_index(b).ok_or(CarveError::InvalidGridCoordinate)?;
        let (a_wall, b_wall) = facing_walls(a, b).ok_or(CarveError::CellsNotAdjacent)?;

        self.cells[a_index].clear_wall(a_wall);
        self.cells[b_index].clear_wall(b_wall);
        Ok(())
    }

    /// Open the outward facing wall of the top or bottom row cell in the given
    /// column, cutting an entrance or exit. Interior walls are never touched.
    pub fn open_boundary(&mut self,
                         side: BoundarySide,
                         column: ColumnIndex)
                         -> Result<(), CarveError> {
        let (row, wall) = match side {
            BoundarySide::Top => (0, Wall::Top),
            BoundarySide::Bottom => (self.rows.0 - 1, Wall::Bottom),
        };
        let coord = CellCoordinate::new(row as isize, column.0 as isize);
        let index = self.coordinate_to_index(coord).ok_or(CarveError::InvalidGridCoordinate)?;
        self.cells[index].clear_wall(wall);
        Ok(())
    }

    /// Mark a cell as incorporated into the maze. Returns false when the
    /// coordinate is outside the grid.
    pub fn mark_visited(&mut self, coord: CellCoordinate) -> bool {
        if let Some(index) = self.coordinate_to_index(coord) {
            self.cells[index].visit();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn is_visited(&self, coord: CellCoordinate) -> bool {
        self.cell(coord).map_or(false, Cell::is_visited)
    }

    /// Are two adjacent cells joined by an open passage? The wall pair must be
    /// mutually open - a half-open pair is data corruption, not a passage.
    pub fn is_linked(&self, a: CellCoordinate, b: CellCoordinate) -> bool {
        match (self.cell(a), self.cell(b), facing_walls(a, b)) {
            (Some(cell_a), Some(cell_b), Some((a_wall, b_wall))) => {
                !cell_a.has_wall(a_wall) && !cell_b.has_wall(b_wall)
            }
            _ => false,
        }
    }

    /// The number of carved interior passages. A perfect maze over N cells has
    /// exactly N - 1.
    pub fn passages_count(&self) -> usize {
        self.iter()
            .map(|coord| {
                [Direction::Right, Direction::Down]
                    .iter()
                    .filter_map(|&direction| self.neighbour_at_direction(coord, direction))
                    .filter(|&neighbour| self.is_linked(coord, neighbour))
                    .count()
            })
            .sum()
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            columns: self.columns,
            cells_count: self.size(),
        }
    }

    pub fn iter_row(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Row,
            current_index: 0,
            rows: self.rows,
            columns: self.columns,
        }
    }

    pub fn iter_column(&self) -> BatchIter {
        BatchIter {
            iter_type: BatchIterType::Column,
            current_index: 0,
            rows: self.rows,
            columns: self.columns,
        }
    }

    #[inline]
    fn coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some((coord.row as usize * self.columns.0) + coord.column as usize)
        } else {
            None
        }
    }
}

/// The wall on `a` facing `b` and the wall on `b` facing `a`, or None when the
/// coordinates do not differ by exactly one step on exactly one axis.
fn facing_walls(a: CellCoordinate, b: CellCoordinate) -> Option<(Wall, Wall)> {
    match (b.row - a.row, b.column - a.column) {
        (-1, 0) => Some((Wall::Top, Wall::Bottom)),
        (1, 0) => Some((Wall::Bottom, Wall::Top)),
        (0, -1) => Some((Wall::Left, Wall::Right)),
        (0, 1) => Some((Wall::Right, Wall::Left)),
        _ => None,
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    columns: ColumnsCount,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = CellCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = CellCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.columns);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a Grid {
    type Item = CellCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}
#[derive(Debug, Copy, Clone)]
pub struct BatchIter {
    iter_type: BatchIterType,
    current_index: usize,
    rows: RowsCount,
    columns: ColumnsCount,
}
impl Iterator for BatchIter {
    type Item = Vec<CellCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let (batches_count, batch_length) = match self.iter_type {
            BatchIterType::Row => (self.rows.0, self.columns.0),
            BatchIterType::Column => (self.columns.0, self.rows.0),
        };
        if self.current_index < batches_count {
            let coords = (0..batch_length)
                .map(|i| {
                    if let BatchIterType::Row = self.iter_type {
                        CellCoordinate::from_row_column_indices(RowIndex(self.current_index),
                                                                ColumnIndex(i))
                    } else {
                        CellCoordinate::from_row_column_indices(RowIndex(i),
                                                                ColumnIndex(self.current_index))
                    }
                })
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches_count = match self.iter_type {
            BatchIterType::Row => self.rows.0,
            BatchIterType::Column => self.columns.0,
        };
        let lower_bound = batches_count - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for BatchIter {} // default impl using size_hint()
