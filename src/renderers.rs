use itertools::repeat_n;
use std::fmt;
use std::io::{self, Write};

use crate::cells::Direction;
use crate::grid::Grid;
use crate::units::{Height, Width};

/// Text rendering configuration.
///
/// `cell_height` counts a cell's top and bottom wall rows, so a height of 3
/// leaves one interior row per grid row. The defaults draw with `-`, `|` and
/// `+` at a cell width of 4.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RenderOptions {
    cell_width: Width,
    cell_height: Height,
    wall_char: char,
    side_char: char,
    corner_char: char,
    blank_char: char,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            cell_width: Width(4),
            cell_height: Height(3),
            wall_char: '-',
            side_char: '|',
            corner_char: '+',
            blank_char: ' ',
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderOptionsBuilder {
    options: RenderOptions,
}

impl RenderOptionsBuilder {
    pub fn new() -> RenderOptionsBuilder {
        RenderOptionsBuilder { options: RenderOptions::default() }
    }

    pub fn cell_width(mut self, cell_width: Width) -> Self {
        self.options.cell_width = cell_width;
        self
    }

    pub fn cell_height(mut self, cell_height: Height) -> Self {
        self.options.cell_height = cell_height;
        self
    }

    pub fn wall_char(mut self, wall_char: char) -> Self {
        self.options.wall_char = wall_char;
        self
    }

    pub fn side_char(mut self, side_char: char) -> Self {
        self.options.side_char = side_char;
        self
    }

    pub fn corner_char(mut self, corner_char: char) -> Self {
        self.options.corner_char = corner_char;
        self
    }

    pub fn blank_char(mut self, blank_char: char) -> Self {
        self.options.blank_char = blank_char;
        self
    }

    pub fn build(self) -> RenderOptions {
        self.options
    }
}

/// Render the grid's wall state as fixed width text art.
///
/// Produces one top border line, then per grid row `cell_height - 2` interior
/// lines and one bottom/separator line. A pure function of the grid: rendering
/// the same unmodified grid twice gives byte identical output.
pub fn render_to_string(grid: &Grid, options: &RenderOptions) -> String {
    let Width(cell_width) = options.cell_width;
    let Height(cell_height) = options.cell_height;
    let interior_rows_count = cell_height.saturating_sub(2);

    let wall_run: String = repeat_n(options.wall_char, cell_width).collect();
    let blank_run: String = repeat_n(options.blank_char, cell_width).collect();

    let mut output = String::new();

    // North most boundary: the only place top walls are drawn from their own
    // cell. The entrance shows up here as a gap.
    let first_grid_row = grid.iter_row().next().expect("grids have at least one row");
    for coord in &first_grid_row {
        let cell = grid.cell(*coord).expect("row iterator yields valid coordinates");
        output.push(options.corner_char);
        output.push_str(if cell.has_top_wall() { &wall_run } else { &blank_run });
    }
    output.push(options.corner_char);
    output.push('\n');

    for row in grid.iter_row() {
        // Each cell draws its own east boundary; the west most wall is drawn
        // once for the first column.
        let mut interior_line = String::new();
        for (column_index, coord) in row.iter().enumerate() {
            let cell = grid.cell(*coord).expect("row iterator yields valid coordinates");
            if column_index == 0 {
                interior_line.push(if cell.has_left_wall() {
                    options.side_char
                } else {
                    options.blank_char
                });
            }
            interior_line.push_str(&blank_run);

            // Tolerate an asymmetric wall pair by drawing the wall if either
            // side still has it.
            let right_is_wall = match grid.neighbour_at_direction(*coord, Direction::Right) {
                Some(right_coord) => {
                    let right = grid.cell(right_coord).expect("neighbour is valid");
                    cell.has_right_wall() || right.has_left_wall()
                }
                None => cell.has_right_wall(),
            };
            interior_line.push(if right_is_wall {
                options.side_char
            } else {
                options.blank_char
            });
        }
        interior_line.push('\n');
        for _ in 0..interior_rows_count {
            output.push_str(&interior_line);
        }

        // Bottom/separator line with the same either-side wall check. On the
        // last row only the cell's own bottom wall counts, so the exit shows
        // up as a gap.
        for coord in &row {
            let cell = grid.cell(*coord).expect("row iterator yields valid coordinates");
            let bottom_is_wall = match grid.neighbour_at_direction(*coord, Direction::Down) {
                Some(below_coord) => {
                    let below = grid.cell(below_coord).expect("neighbour is valid");
                    cell.has_bottom_wall() || below.has_top_wall()
                }
                None => cell.has_bottom_wall(),
            };
            output.push(options.corner_char);
            output.push_str(if bottom_is_wall { &wall_run } else { &blank_run });
        }
        output.push(options.corner_char);
        output.push('\n');
    }

    output
}

/// Write the rendered maze text to a caller provided sink.
pub fn render_plain_text<W: Write>(grid: &Grid,
                                   options: &RenderOptions,
                                   sink: &mut W)
                                   -> io::Result<()> {
    sink.write_all(render_to_string(grid, options).as_bytes())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_to_string(self, &RenderOptions::default()))
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::CellCoordinate;
    use crate::grid::{BoundarySide, Grid};
    use crate::units::{ColumnIndex, ColumnsCount, RowsCount};

    fn small_grid(rows: usize, columns: usize) -> Grid {
        Grid::new(RowsCount(rows), ColumnsCount(columns)).expect("valid test grid dimensions")
    }

    #[test]
    fn fully_walled_grid_default_render() {
        let g = small_grid(2, 2);
        let expected = "+----+----+\n\
                        |    |    |\n\
                        +----+----+\n\
                        |    |    |\n\
                        +----+----+\n";
        assert_eq!(render_to_string(&g, &RenderOptions::default()), expected);
    }

    #[test]
    fn carved_passage_renders_as_a_gap() {
        let mut g = small_grid(1, 2);
        g.carve_passage(CellCoordinate::new(0, 0), CellCoordinate::new(0, 1))
            .expect("carve failed");
        let expected = "+----+----+\n\
                        |         |\n\
                        +----+----+\n";
        assert_eq!(render_to_string(&g, &RenderOptions::default()), expected);
    }

    #[test]
    fn boundary_openings_render_as_gaps() {
        let mut g = small_grid(2, 2);
        g.open_boundary(BoundarySide::Top, ColumnIndex(0)).expect("open failed");
        g.open_boundary(BoundarySide::Bottom, ColumnIndex(1)).expect("open failed");
        let expected = "+    +----+\n\
                        |    |    |\n\
                        +----+----+\n\
                        |    |    |\n\
                        +----+    +\n";
        assert_eq!(render_to_string(&g, &RenderOptions::default()), expected);
    }

    #[test]
    fn default_line_count_is_one_plus_two_per_row() {
        let g = small_grid(3, 3);
        let rendered = render_to_string(&g, &RenderOptions::default());
        assert_eq!(rendered.lines().count(), 7); // 1 + 3 + 3*1
    }

    #[test]
    fn taller_cells_add_interior_lines() {
        let g = small_grid(3, 2);
        let options = RenderOptionsBuilder::new()
            .cell_height(Height(4))
            .build();
        let rendered = render_to_string(&g, &options);
        assert_eq!(rendered.lines().count(), 1 + 3 + 3 * 2);
    }

    #[test]
    fn all_lines_share_one_width() {
        let g = small_grid(4, 5);
        let rendered = render_to_string(&g, &RenderOptions::default());
        let expected_width = 5 * (4 + 1) + 1;
        assert!(rendered.lines().all(|line| line.chars().count() == expected_width));
    }

    #[test]
    fn custom_glyphs_and_width() {
        let g = small_grid(1, 2);
        let options = RenderOptionsBuilder::new()
            .cell_width(Width(2))
            .wall_char('=')
            .side_char('!')
            .corner_char('o')
            .build();
        let expected = "o==o==o\n\
                        !  !  !\n\
                        o==o==o\n";
        assert_eq!(render_to_string(&g, &options), expected);
    }

    #[test]
    fn rendering_twice_is_byte_identical() {
        let g = small_grid(3, 4);
        let options = RenderOptions::default();
        assert_eq!(render_to_string(&g, &options), render_to_string(&g, &options));
    }

    #[test]
    fn display_uses_the_default_options() {
        let g = small_grid(2, 3);
        assert_eq!(format!("{}", g),
                   render_to_string(&g, &RenderOptions::default()));
    }

    #[test]
    fn render_into_a_sink() {
        let g = small_grid(2, 2);
        let mut sink: Vec<u8> = Vec::new();
        render_plain_text(&g, &RenderOptions::default(), &mut sink).expect("write failed");
        assert_eq!(String::from_utf8(sink).expect("render is utf-8"),
                   render_to_string(&g, &RenderOptions::default()));
    }
}
