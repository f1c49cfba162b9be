use docopt::Docopt;
use serde_derive::Deserialize;
use textmazes::{
    cells::CellCoordinate,
    generators::GenerationTracer,
    grid::BoundarySide,
    mazes::{maze_generator, seeded_maze_generator, MazeGenerator, MazeType},
    renderers::{RenderOptions, RenderOptionsBuilder},
    units::{ColumnIndex, ColumnsCount, Height, RowsCount, Width},
};
use std::{
    fs::File,
    io::{self, Write},
};

const USAGE: &str = "Textmazes

Usage:
    textmazes_driver -h | --help
    textmazes_driver (prims|backtracker) [--rows=<r>] [--columns=<c>] [--seed=<n>] [--text-out=<path>] [--cell-width=<w>] [--cell-height=<h>] [--wall-char=<wc>] [--side-char=<sc>] [--corner-char=<cc>] [--trace]

Options:
    -h --help           Show this screen.
    --rows=<r>          Number of rows in the maze [default: 10].
    --columns=<c>       Number of columns in the maze [default: 10].
    --seed=<n>          Seed the random generator to reproduce a maze exactly.
    --text-out=<path>   Write the maze text to a file instead of stdout.
    --cell-width=<w>    Rendered interior width of one cell [default: 4].
    --cell-height=<h>   Rendered cell height counting its top and bottom wall rows [default: 3].
    --wall-char=<wc>    Glyph for top and bottom walls [default: -].
    --side-char=<sc>    Glyph for left and right walls [default: |].
    --corner-char=<cc>  Glyph separating cells [default: +].
    --trace             Report generation state transitions on stderr.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_prims: bool,
    cmd_backtracker: bool,
    flag_rows: usize,
    flag_columns: usize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_cell_width: usize,
    flag_cell_height: usize,
    flag_wall_char: String,
    flag_side_char: String,
    flag_corner_char: String,
    flag_trace: bool,
}

// We'll put our errors in an `errors` module; `error_chain!` creates the
// Error, ErrorKind, ResultExt and Result types.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let maze_type = if args.cmd_backtracker {
        MazeType::RecursiveBacktracker
    } else {
        MazeType::Prims
    };
    debug_assert!(args.cmd_prims || args.cmd_backtracker);

    let rows = RowsCount(args.flag_rows);
    let columns = ColumnsCount(args.flag_columns);
    let mut generator = match args.flag_seed {
        Some(seed) => seeded_maze_generator(maze_type, rows, columns, seed),
        None => maze_generator(maze_type, rows, columns),
    }
    .chain_err(|| "failed to create the maze generator")?;

    if args.flag_trace {
        let mut tracer = StderrTracer;
        generator.generate_traced(&mut tracer);
    } else {
        generator.generate();
    }

    let render_options = RenderOptionsBuilder::new()
        .cell_width(Width(args.flag_cell_width))
        .cell_height(Height(args.flag_cell_height))
        .wall_char(glyph(&args.flag_wall_char, "--wall-char")?)
        .side_char(glyph(&args.flag_side_char, "--side-char")?)
        .corner_char(glyph(&args.flag_corner_char, "--corner-char")?)
        .build();

    write_maze(&generator, &render_options, &args.flag_text_out)?;

    Ok(())
}

fn write_maze(generator: &MazeGenerator,
              render_options: &RenderOptions,
              text_out: &str)
              -> Result<()> {
    if text_out.is_empty() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        generator.render_with_options(render_options, &mut out)?;
        out.flush()?;
    } else {
        let mut out = File::create(text_out)
            .chain_err(|| format!("failed to create maze text file {}", text_out))?;
        generator.render_with_options(render_options, &mut out)
            .chain_err(|| format!("failed to write maze to text file {}", text_out))?;
    }
    Ok(())
}

fn glyph(flag_value: &str, flag_name: &str) -> Result<char> {
    let mut chars = flag_value.chars();
    match (chars.next(), chars.next()) {
        (Some(first), None) => Ok(first),
        _ => Err(format!("{} needs exactly one character, got {:?}", flag_name, flag_value)
            .into()),
    }
}

struct StderrTracer;

impl GenerationTracer for StderrTracer {
    fn cell_visited(&mut self, cell: CellCoordinate) {
        eprintln!("visited {}:{}", cell.row, cell.column);
    }

    fn passage_carved(&mut self, from: CellCoordinate, to: CellCoordinate) {
        eprintln!("carved {}:{} <-> {}:{}", from.row, from.column, to.row, to.column);
    }

    fn boundary_opened(&mut self, side: BoundarySide, column: ColumnIndex) {
        let side_name = match side {
            BoundarySide::Top => "entrance",
            BoundarySide::Bottom => "exit",
        };
        eprintln!("opened {} at column {}", side_name, column.0);
    }
}
