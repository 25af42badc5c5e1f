use blockfall_engine::{PIECE_SIZE, PieceGroup, PieceKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::{BlockDisplay, BoardCell};

const PREVIEW_WIDTH: usize = PIECE_SIZE;
const PREVIEW_HEIGHT: usize = 2;

/// Preview of a piece kind in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: PieceKind,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new(piece: PieceKind) -> Self {
        Self { piece, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(PREVIEW_WIDTH) * BlockDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(PREVIEW_HEIGHT) * BlockDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Cells of `kind` in spawn orientation, shifted so the top-left of its bounding box is (0, 0).
fn preview_mask(kind: PieceKind) -> [[bool; PREVIEW_WIDTH]; PREVIEW_HEIGHT] {
    let group = PieceGroup::spawn(kind, PIECE_SIZE);
    let min_col = group.cells().iter().map(|c| c.col).min().unwrap_or(0);
    let min_row = group.cells().iter().map(|c| c.row).min().unwrap_or(0);

    let mut mask = [[false; PREVIEW_WIDTH]; PREVIEW_HEIGHT];
    for cell in group.cells() {
        if let (Ok(x), Ok(y)) = (
            usize::try_from(cell.col - min_col),
            usize::try_from(cell.row - min_row),
        ) && let Some(slot) = mask.get_mut(y).and_then(|row| row.get_mut(x))
        {
            *slot = true;
        }
    }
    mask
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mask = preview_mask(self.piece);
        let used_cols = (0..PREVIEW_WIDTH)
            .filter(|&x| mask.iter().any(|row| row[x]))
            .count();
        let piece_area = area.centered(
            Constraint::Length(super::cells_to_u16(used_cols) * BlockDisplay::width()),
            Constraint::Length(super::cells_to_u16(PREVIEW_HEIGHT) * BlockDisplay::height()),
        );

        let col_constraints = (0..used_cols).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..PREVIEW_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let occupied = BlockDisplay::from_cell(BoardCell::Piece(self.piece), false);
        let empty = BlockDisplay::from_cell(BoardCell::Empty, false);
        for (mask_row, grid_row) in mask.iter().zip(piece_area.layout_vec(&vertical)) {
            for (&filled, grid_cell) in mask_row.iter().zip(grid_row.layout_vec(&horizontal)) {
                let display = if filled { &occupied } else { &empty };
                display.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_mask(kind: PieceKind) -> [String; PREVIEW_HEIGHT] {
        preview_mask(kind).map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
    }

    #[test]
    fn test_preview_masks() {
        assert_eq!(render_mask(PieceKind::I), ["####", "...."]);
        assert_eq!(render_mask(PieceKind::O), ["##..", "##.."]);
        assert_eq!(render_mask(PieceKind::T), [".#..", "###."]);
        assert_eq!(render_mask(PieceKind::S), [".##.", "##.."]);
    }

    #[test]
    fn test_every_preview_has_four_cells() {
        for kind in PieceKind::ALL {
            let count = preview_mask(kind).iter().flatten().filter(|c| **c).count();
            assert_eq!(count, PIECE_SIZE, "{kind:?}");
        }
    }
}
