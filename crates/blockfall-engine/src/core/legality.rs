//! Placement rules shared by every transform.

use super::{coord::Coord, grid::Grid, piece::PieceGroup};

/// Returns whether every cell of `group` may sit at its position on `grid`.
///
/// A cell is rejected when it is left of column 0, right of the last column, or below the
/// last row. Cells above the grid are always free; any other cell is free unless locked.
#[must_use]
pub fn can_place(group: &PieceGroup, grid: &Grid) -> bool {
    group.cells().iter().all(|&cell| is_free(cell, grid))
}

/// Returns whether `group` rests on something: the floor or a locked cell directly beneath
/// one of its cells.
///
/// `group` must already be a legal placement.
#[must_use]
pub fn is_supported(group: &PieceGroup, grid: &Grid) -> bool {
    group.cells().iter().any(|&cell| {
        let below = cell.below();
        grid.is_bottom_row(cell.row) || grid.is_occupied(below.col, below.row)
    })
}

fn is_free(cell: Coord, grid: &Grid) -> bool {
    if !grid.contains_col(cell.col) || !grid.is_above_floor(cell.row) {
        return false;
    }
    !grid.is_occupied(cell.col, cell.row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceKind;

    fn group(kind: PieceKind, cells: [(i32, i32); 4]) -> PieceGroup {
        PieceGroup::from_cells(kind, cells.map(|(col, row)| Coord::new(col, row)))
    }

    #[test]
    fn test_spawned_pieces_are_placeable_on_full_grid() {
        let grid = Grid::from_ascii(3, "####\n####\n####");
        for kind in PieceKind::ALL {
            assert!(can_place(&PieceGroup::spawn(kind, 4), &grid));
        }
    }

    #[test]
    fn test_side_walls_and_floor_reject() {
        let grid = Grid::new(4, 4);
        assert!(can_place(&group(PieceKind::O, [(0, 2), (1, 2), (0, 3), (1, 3)]), &grid));
        assert!(!can_place(&group(PieceKind::O, [(-1, 2), (0, 2), (-1, 3), (0, 3)]), &grid));
        assert!(!can_place(&group(PieceKind::O, [(3, 2), (4, 2), (3, 3), (4, 3)]), &grid));
        assert!(!can_place(&group(PieceKind::O, [(0, 3), (1, 3), (0, 4), (1, 4)]), &grid));
    }

    #[test]
    fn test_side_walls_apply_above_grid() {
        let grid = Grid::new(4, 4);
        assert!(!can_place(&group(PieceKind::O, [(-1, -2), (0, -2), (-1, -1), (0, -1)]), &grid));
    }

    #[test]
    fn test_collision_with_locked_cell() {
        let grid = Grid::from_ascii(4, "....\n....\n.#..\n....");
        assert!(!can_place(&group(PieceKind::O, [(1, 1), (2, 1), (1, 2), (2, 2)]), &grid));
        assert!(can_place(&group(PieceKind::O, [(2, 1), (3, 1), (2, 2), (3, 2)]), &grid));
    }

    #[test]
    fn test_partially_above_grid() {
        let grid = Grid::from_ascii(2, "#...\n....");
        // The cell at row -1 passes; the one at (0, 0) is locked.
        assert!(!can_place(&group(PieceKind::O, [(0, -1), (1, -1), (0, 0), (1, 0)]), &grid));
        assert!(can_place(&group(PieceKind::O, [(1, -1), (2, -1), (1, 0), (2, 0)]), &grid));
    }

    #[test]
    fn test_noop_transforms_keep_legality() {
        let grid = Grid::from_ascii(6, "......\n......\n..#...\n......\n#....#\n######");
        for kind in PieceKind::ALL {
            for (dx, dy) in [(0, 0), (1, 2), (2, 3), (-3, 4), (0, 5)] {
                let mut piece = PieceGroup::spawn(kind, 6);
                piece.translate(dx, dy);
                let expected = can_place(&piece, &grid);

                let mut moved = piece;
                moved.translate(0, 0);
                assert_eq!(can_place(&moved, &grid), expected);

                let mut rotated = piece;
                for _ in 0..4 {
                    rotated.rotate();
                }
                assert_eq!(can_place(&rotated, &grid), expected);
            }
        }
    }

    #[test]
    fn test_supported_by_floor() {
        let grid = Grid::new(4, 4);
        assert!(is_supported(&group(PieceKind::O, [(0, 2), (1, 2), (0, 3), (1, 3)]), &grid));
        assert!(!is_supported(&group(PieceKind::O, [(0, 1), (1, 1), (0, 2), (1, 2)]), &grid));
    }

    #[test]
    fn test_supported_by_locked_cell() {
        let grid = Grid::from_ascii(4, "....\n....\n....\n.#..");
        assert!(is_supported(&group(PieceKind::O, [(1, 1), (2, 1), (1, 2), (2, 2)]), &grid));
        assert!(!is_supported(&group(PieceKind::O, [(2, 1), (3, 1), (2, 2), (3, 2)]), &grid));
    }

    #[test]
    fn test_supported_from_above_grid() {
        let grid = Grid::from_ascii(2, "#...\n#...");
        assert!(is_supported(&group(PieceKind::I, [(0, -4), (0, -3), (0, -2), (0, -1)]), &grid));
        assert!(!is_supported(&group(PieceKind::I, [(1, -4), (1, -3), (1, -2), (1, -1)]), &grid));
    }
}
