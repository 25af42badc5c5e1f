use serde::{Serialize, Serializer, ser::SerializeSeq as _};

use super::{coord::Coord, piece::PieceGroup};

/// Result of committing a piece group into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LockOutcome {
    /// Every cell was written into the grid.
    Locked,
    /// At least one cell was still above the visible grid; nothing was written.
    ToppedOut,
}

/// Occupancy matrix of locked cells.
///
/// Cells are stored in one row-major buffer allocated at construction; the dimensions never
/// change afterwards. Row 0 is the top of the visible grid.
///
/// # Example
///
/// ```
/// use blockfall_engine::Grid;
///
/// let mut grid = Grid::from_ascii(
///     4,
///     "
///     ....
///     #####
///     #.##
///     ",
/// );
/// assert_eq!(grid.clear_full_rows(), 1);
/// assert!(grid.is_occupied(0, 3));
/// assert!(!grid.is_occupied(0, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // One string per row, top to bottom: "..##......"
        let mut seq = serializer.serialize_seq(Some(self.height))?;
        for row in self.rows() {
            let line: String = row.iter().map(|&c| if c { '#' } else { '.' }).collect();
            seq.serialize_element(&line)?;
        }
        seq.end()
    }
}

impl Grid {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether `col` lies between the side walls.
    #[must_use]
    pub fn contains_col(&self, col: i32) -> bool {
        usize::try_from(col).is_ok_and(|col| col < self.width)
    }

    /// Returns whether `row` is above the floor. Rows above the grid (negative) count.
    #[must_use]
    pub fn is_above_floor(&self, row: i32) -> bool {
        usize::try_from(row).map_or(true, |row| row < self.height)
    }

    /// Returns whether `row` is the last row of the grid.
    #[must_use]
    pub fn is_bottom_row(&self, row: i32) -> bool {
        usize::try_from(row).is_ok_and(|row| row + 1 == self.height)
    }

    /// Returns whether the cell is locked.
    ///
    /// Cells above the grid (`row < 0`) are never occupied. The column and the lower row bound
    /// are the caller's responsibility.
    ///
    /// # Panics
    ///
    /// Panics if `col` is outside the grid or `row >= height`.
    #[must_use]
    pub fn is_occupied(&self, col: i32, row: i32) -> bool {
        if row < 0 {
            return false;
        }
        self.cells[self.cell_index(Coord::new(col, row))]
    }

    /// Returns whether every cell of `row` is locked.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(|&cell| cell)
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[bool] {
        &self.cells[row * self.width..][..self.width]
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Iterates over locked cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(move |(i, _)| to_coord(i % width, i / width))
    }

    /// Writes every cell of `group` into the grid.
    ///
    /// If any cell is above the grid the stack has overflowed: nothing is written and
    /// [`LockOutcome::ToppedOut`] is returned. Cells must otherwise be inside the grid.
    pub fn lock(&mut self, group: &PieceGroup) -> LockOutcome {
        if group.cells().iter().any(|cell| cell.row < 0) {
            return LockOutcome::ToppedOut;
        }
        for &cell in group.cells() {
            let index = self.cell_index(cell);
            self.cells[index] = true;
        }
        LockOutcome::Locked
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are compacted bottom-up in a single pass: each surviving row moves down by the
    /// number of full rows found beneath it, and the vacated rows at the top are emptied.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;

        for y in (0..self.height).rev() {
            if self.is_row_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let src = y * width;
                self.cells.copy_within(src..src + width, src + count * width);
            }
        }

        self.cells[..count * width].fill(false);
        count
    }

    /// Empties every cell.
    pub fn reset(&mut self) {
        self.cells.fill(false);
    }

    /// Creates a grid from ASCII art for testing.
    ///
    /// `'#'` is a locked cell and `'.'` an empty one; other characters and blank lines are
    /// ignored. The art's rows fill the bottom of a grid `height` rows tall, so shorter art
    /// leaves empty rows on top.
    ///
    /// # Panics
    ///
    /// Panics if rows differ in width or there are more rows than `height`.
    #[must_use]
    pub fn from_ascii(height: usize, art: &str) -> Self {
        let lines: Vec<Vec<bool>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| *c == '#' || *c == '.')
                    .map(|c| c == '#')
                    .collect::<Vec<_>>()
            })
            .filter(|row| !row.is_empty())
            .collect();
        assert!(!lines.is_empty(), "art must contain at least one row");
        assert!(
            lines.len() <= height,
            "art has {} rows, grid only {height}",
            lines.len(),
        );

        let width = lines[0].len();
        let mut grid = Self::new(width, height);
        let top = height - lines.len();
        for (y, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                width,
                "Each row must have exactly {width} cells, got {} at row {y}",
                line.len(),
            );
            let start = grid.index(0, top + y);
            grid.cells[start..start + width].copy_from_slice(line);
        }
        grid
    }

    fn cell_index(&self, cell: Coord) -> usize {
        let col = usize::try_from(cell.col).expect("column must not be negative");
        let row = usize::try_from(cell.row).expect("row must not be negative");
        self.index(col, row)
    }

    fn index(&self, col: usize, row: usize) -> usize {
        assert!(
            col < self.width && row < self.height,
            "cell ({col}, {row}) is outside a {}x{} grid",
            self.width,
            self.height,
        );
        row * self.width + col
    }
}

#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn to_coord(col: usize, row: usize) -> Coord {
    Coord::new(col as i32, row as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceKind;

    fn vertical_i(col: i32, bottom: i32) -> PieceGroup {
        PieceGroup::from_cells(
            PieceKind::I,
            [
                Coord::new(col, bottom - 3),
                Coord::new(col, bottom - 2),
                Coord::new(col, bottom - 1),
                Coord::new(col, bottom),
            ],
        )
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(10, 15);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 15);
        assert_eq!(grid.occupied_cells().count(), 0);
        assert!(grid.rows().all(|row| row.iter().all(|c| !c)));
    }

    #[test]
    fn test_is_occupied_above_grid_is_false() {
        let grid = Grid::from_ascii(2, "##\n##");
        assert!(grid.is_occupied(0, 0));
        assert!(!grid.is_occupied(0, -1));
        assert!(!grid.is_occupied(1, -5));
    }

    #[test]
    fn test_bounds_helpers() {
        let grid = Grid::new(4, 3);
        assert!(grid.contains_col(0));
        assert!(grid.contains_col(3));
        assert!(!grid.contains_col(-1));
        assert!(!grid.contains_col(4));
        assert!(grid.is_above_floor(-3));
        assert!(grid.is_above_floor(2));
        assert!(!grid.is_above_floor(3));
        assert!(grid.is_bottom_row(2));
        assert!(!grid.is_bottom_row(1));
        assert!(!grid.is_bottom_row(-1));
    }

    #[test]
    fn test_lock_in_bounds_sets_cells() {
        let mut grid = Grid::new(10, 15);
        let outcome = grid.lock(&vertical_i(2, 14));
        assert!(outcome.is_locked());
        let cells: Vec<_> = grid.occupied_cells().collect();
        assert_eq!(
            cells,
            vec![
                Coord::new(2, 11),
                Coord::new(2, 12),
                Coord::new(2, 13),
                Coord::new(2, 14),
            ]
        );
    }

    #[test]
    fn test_lock_above_grid_tops_out_without_mutation() {
        let mut grid = Grid::from_ascii(4, "....\n.#..\n####\n.###");
        let before = grid.clone();
        let outcome = grid.lock(&vertical_i(0, 1));
        assert!(outcome.is_topped_out());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_single_row_shifts_rows_above() {
        // 10x15 grid: bottom row full except column 5, a marker on row 13.
        let mut grid = Grid::new(10, 15);
        for col in (0..10).filter(|&c| c != 5) {
            grid.lock(&PieceGroup::from_cells(PieceKind::O, [Coord::new(col, 14); 4]));
        }
        grid.lock(&PieceGroup::from_cells(PieceKind::O, [Coord::new(0, 13); 4]));
        grid.lock(&vertical_i(5, 14));

        assert!(grid.is_row_full(14));
        let above: Vec<bool> = grid.row(13).to_vec();

        assert_eq!(grid.clear_full_rows(), 1);
        assert_eq!(grid.row(14), above.as_slice());
        assert!(grid.is_occupied(0, 14));
        assert!(grid.is_occupied(5, 14));
        assert!(grid.row(0).iter().all(|c| !c));
    }

    #[test]
    fn test_clear_non_adjacent_rows() {
        let mut grid = Grid::from_ascii(
            6,
            "
            #...
            ####
            .#..
            ####
            ..#.
            ",
        );
        assert_eq!(grid.clear_full_rows(), 2);
        assert_eq!(
            grid,
            Grid::from_ascii(
                6,
                "
                ....
                ....
                ....
                #...
                .#..
                ..#.
                ",
            )
        );
    }

    #[test]
    fn test_clear_multiple_consecutive_rows() {
        let mut grid = Grid::from_ascii(
            5,
            "
            ..#.
            ####
            ####
            ####
            #...
            ",
        );
        assert_eq!(grid.clear_full_rows(), 3);
        assert_eq!(
            grid,
            Grid::from_ascii(5, "....\n....\n....\n..#.\n#...")
        );
    }

    #[test]
    fn test_clear_all_rows() {
        let mut grid = Grid::from_ascii(3, "###\n###\n###");
        assert_eq!(grid.clear_full_rows(), 3);
        assert_eq!(grid, Grid::new(3, 3));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut grid = Grid::from_ascii(
            6,
            "
            ####
            #.##
            ####
            ####
            .###
            ####
            ",
        );
        assert_eq!(grid.clear_full_rows(), 4);
        let after_first = grid.clone();
        assert_eq!(grid.clear_full_rows(), 0);
        assert_eq!(grid, after_first);
    }

    #[test]
    fn test_clear_with_partial_rows_only() {
        let mut grid = Grid::from_ascii(3, "##.\n.##\n#.#");
        let before = grid.clone();
        assert_eq!(grid.clear_full_rows(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_reset_empties_grid() {
        let mut grid = Grid::from_ascii(2, "#.\n.#");
        grid.reset();
        assert_eq!(grid, Grid::new(2, 2));
    }

    #[test]
    fn test_from_ascii_pads_top() {
        let grid = Grid::from_ascii(4, "#..\n..#");
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 3);
        assert!(grid.is_occupied(0, 2));
        assert!(grid.is_occupied(2, 3));
        assert_eq!(grid.occupied_cells().count(), 2);
    }

    #[test]
    fn test_grid_serialization() {
        let grid = Grid::from_ascii(3, "#..\n.#.");
        let serialized = serde_json::to_string(&grid).unwrap();
        assert_eq!(serialized, r##"["...","#..",".#."]"##);
    }
}
