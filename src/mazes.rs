use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::{self, Write};

use crate::generators::{self, GenerationTracer};
use crate::grid::{Grid, InvalidDimensionsError};
use crate::renderers::{self, RenderOptions};
use crate::units::{ColumnsCount, RowsCount};

/// The maze generation algorithms on offer.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeType {
    Prims,
    RecursiveBacktracker,
}

/// One maze generation run: the algorithm choice, the grid it owns and the
/// random generator driving it.
#[derive(Debug)]
pub struct MazeGenerator {
    maze_type: MazeType,
    grid: Grid,
    rng: SmallRng,
}

/// Create a generator with a fresh entropy seeded random source.
pub fn maze_generator(maze_type: MazeType,
                      rows: RowsCount,
                      columns: ColumnsCount)
                      -> Result<MazeGenerator, InvalidDimensionsError> {
    Ok(MazeGenerator {
        maze_type,
        grid: Grid::new(rows, columns)?,
        rng: SmallRng::from_entropy(),
    })
}

/// Create a generator that will reproduce the same maze for the same seed.
pub fn seeded_maze_generator(maze_type: MazeType,
                             rows: RowsCount,
                             columns: ColumnsCount,
                             seed: u64)
                             -> Result<MazeGenerator, InvalidDimensionsError> {
    Ok(MazeGenerator {
        maze_type,
        grid: Grid::new(rows, columns)?,
        rng: SmallRng::seed_from_u64(seed),
    })
}

impl MazeGenerator {
    #[inline]
    pub fn maze_type(&self) -> MazeType {
        self.maze_type
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Run the generation algorithm over the owned grid, carving the maze and
    /// cutting the entrance and exit. One shot: walls only ever open, so
    /// running a generator a second time is not supported.
    pub fn generate(&mut self) {
        match self.maze_type {
            MazeType::Prims => generators::prims(&mut self.grid, &mut self.rng, None),
            MazeType::RecursiveBacktracker => {
                generators::recursive_backtracker(&mut self.grid, &mut self.rng, None)
            }
        }
    }

    /// As `generate`, reporting each state transition to the given tracer.
    pub fn generate_traced(&mut self, tracer: &mut dyn GenerationTracer) {
        match self.maze_type {
            MazeType::Prims => generators::prims(&mut self.grid, &mut self.rng, Some(tracer)),
            MazeType::RecursiveBacktracker => {
                generators::recursive_backtracker(&mut self.grid, &mut self.rng, Some(tracer))
            }
        }
    }

    /// Write the maze as text art to the sink using the default render options.
    pub fn render<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        self.render_with_options(&RenderOptions::default(), sink)
    }

    pub fn render_with_options<W: Write>(&self,
                                         options: &RenderOptions,
                                         sink: &mut W)
                                         -> io::Result<()> {
        renderers::render_plain_text(&self.grid, options, sink)
    }
}
