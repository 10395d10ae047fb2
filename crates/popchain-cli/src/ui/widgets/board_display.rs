use std::iter;

use popchain_engine::{Board, Pair, PoppedCell};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::CellDisplay;

/// The visible part of the board, with the falling pair, its ghost and the
/// cells popped by the latest chain step drawn on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    hidden_rows: usize,
    falling_pair: Option<Pair>,
    ghost: Option<Pair>,
    popped: &'a [PoppedCell],
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board, hidden_rows: usize) -> Self {
        Self {
            board,
            hidden_rows,
            falling_pair: None,
            ghost: None,
            popped: &[],
            block: None,
        }
    }

    pub fn falling_pair(self, pair: Option<Pair>) -> Self {
        Self {
            falling_pair: pair,
            ..self
        }
    }

    pub fn ghost(self, pair: Option<Pair>) -> Self {
        Self {
            ghost: pair,
            ..self
        }
    }

    pub fn popped(self, popped: &'a [PoppedCell]) -> Self {
        Self { popped, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn visible_rows(&self) -> usize {
        self.board.height().saturating_sub(self.hidden_rows)
    }

    pub fn width(&self) -> u16 {
        super::cells_to_u16(self.board.width()) * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        super::cells_to_u16(self.visible_rows()) * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_grid(&self) -> Vec<Vec<CellDisplay>> {
        let mut grid = self
            .board
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| CellDisplay::from_cell(*cell, true))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        for cell in self.popped {
            if self.board.is_empty(cell.x, cell.y) {
                grid[cell.y][cell.x] = CellDisplay::popped(cell.color);
            }
        }
        if let Some(ghost) = self.ghost {
            for (x, y, color) in ghost.cells() {
                if let Some((x, y)) = self.board.checked_position(x, y) {
                    grid[y][x] = CellDisplay::ghost(color);
                }
            }
        }
        if let Some(pair) = self.falling_pair {
            for (x, y, color) in pair.cells() {
                if let Some((x, y)) = self.board.checked_position(x, y) {
                    grid[y][x] = CellDisplay::puyo(color);
                }
            }
        }
        grid
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints =
            (0..self.visible_rows()).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));
        let grid = self.cell_grid();

        for (grid_row, row) in iter::zip(grid_cells, &grid[self.hidden_rows..]) {
            for (grid_cell, cell) in iter::zip(grid_row, row) {
                cell.render(grid_cell, buf);
            }
        }
    }
}
