use smallvec::SmallVec;
use std::convert::From;

use crate::units::{ColumnIndex, ColumnsCount, RowIndex};

#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct CellCoordinate {
    pub row: isize,
    pub column: isize,
}

pub type CoordinateSmallVec = SmallVec<[CellCoordinate; 4]>;
pub type DirectionSmallVec = SmallVec<[Direction; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The enumeration order used everywhere neighbours are listed.
pub const DIRECTIONS: [Direction; 4] =
    [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

/// One side of a cell. The discriminants index the cell's wall flag array.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Wall {
    Top = 0,
    Right = 1,
    Bottom = 2,
    Left = 3,
}

impl CellCoordinate {
    pub fn new(row: isize, column: isize) -> CellCoordinate {
        CellCoordinate { row, column }
    }

    /// The coordinate at `index` of a row-major cell layout with the given row width.
    #[inline]
    pub fn from_row_major_index(index: usize, columns: ColumnsCount) -> CellCoordinate {
        let ColumnsCount(width) = columns;
        CellCoordinate::new((index / width) as isize, (index % width) as isize)
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> CellCoordinate {
        let (RowIndex(row), ColumnIndex(column)) = (row_index, col_index);
        CellCoordinate::new(row as isize, column as isize)
    }

    /// The coordinate one step away in the given direction. May leave the grid -
    /// validity is the grid's concern, not the coordinate's.
    #[inline]
    pub fn offset(self, direction: Direction) -> CellCoordinate {
        let CellCoordinate { row, column } = self;
        match direction {
            Direction::Up => CellCoordinate { row: row - 1, column },
            Direction::Down => CellCoordinate { row: row + 1, column },
            Direction::Left => CellCoordinate { column: column - 1, row },
            Direction::Right => CellCoordinate { column: column + 1, row },
        }
    }
}

impl From<(isize, isize)> for CellCoordinate {
    fn from(row_column_pair: (isize, isize)) -> CellCoordinate {
        CellCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

/// One grid position: a one-way visited flag and four independent wall flags,
/// all closed until a passage is carved.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    coordinate: CellCoordinate,
    visited: bool,
    walls: [bool; 4],
}

impl Cell {
    pub fn new(coordinate: CellCoordinate) -> Cell {
        Cell {
            coordinate,
            visited: false,
            walls: [true; 4],
        }
    }

    #[inline]
    pub fn coordinate(&self) -> CellCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Mark the cell as incorporated into the maze. Never undone.
    #[inline]
    pub fn visit(&mut self) {
        self.visited = true;
    }

    #[inline]
    pub fn has_wall(&self, wall: Wall) -> bool {
        self.walls[wall as usize]
    }

    #[inline]
    pub fn has_top_wall(&self) -> bool {
        self.has_wall(Wall::Top)
    }

    #[inline]
    pub fn has_right_wall(&self) -> bool {
        self.has_wall(Wall::Right)
    }

    #[inline]
    pub fn has_bottom_wall(&self) -> bool {
        self.has_wall(Wall::Bottom)
    }

    #[inline]
    pub fn has_left_wall(&self) -> bool {
        self.has_wall(Wall::Left)
    }

    /// Open one side of the cell. Walls only ever open, they are never rebuilt.
    #[inline]
    pub fn clear_wall(&mut self, wall: Wall) {
        self.walls[wall as usize] = false;
    }
}
