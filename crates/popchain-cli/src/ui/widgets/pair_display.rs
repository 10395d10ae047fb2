use popchain_engine::PairColors;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::CellDisplay;

/// Preview of an upcoming pair in spawn orientation (satellite on top).
#[derive(Debug)]
pub struct PairDisplay<'a> {
    pair: Option<PairColors>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PairDisplay<'a> {
    pub fn new(pair: Option<PairColors>) -> Self {
        Self { pair, block: None }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * CellDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * CellDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PairDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PairDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(pair) = self.pair else {
            return;
        };
        let pair_area = area.centered(
            Constraint::Length(CellDisplay::width()),
            Constraint::Length(2 * CellDisplay::height()),
        );
        let [satellite_area, pivot_area] = pair_area.layout(&Layout::vertical([
            Constraint::Length(CellDisplay::height()),
            Constraint::Length(CellDisplay::height()),
        ]));
        CellDisplay::puyo(pair.satellite).render(satellite_area, buf);
        CellDisplay::puyo(pair.pivot).render(pivot_area, buf);
    }
}
