use popchain_engine::PuyoColor;
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

use crate::ui::widgets::{color, style};

/// One board cell drawn two terminal columns wide.
#[derive(Debug, Clone, Copy)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

const fn puyo_color(puyo: PuyoColor) -> Color {
    match puyo {
        PuyoColor::Red => color::RED,
        PuyoColor::Green => color::GREEN,
        PuyoColor::Blue => color::BLUE,
        PuyoColor::Yellow => color::YELLOW,
        PuyoColor::Purple => color::PURPLE,
    }
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub const fn empty(show_dots: bool) -> Self {
        if show_dots {
            Self::new(style::EMPTY_DOT, ".")
        } else {
            Self::new(style::EMPTY, "")
        }
    }

    pub fn from_cell(cell: Option<PuyoColor>, show_dots: bool) -> Self {
        cell.map_or(Self::empty(show_dots), Self::puyo)
    }

    pub fn puyo(puyo: PuyoColor) -> Self {
        let color = puyo_color(puyo);
        Self::new(Style::new().fg(color).bg(color), "")
    }

    /// Outline of where the falling pair would land.
    pub fn ghost(puyo: PuyoColor) -> Self {
        Self::new(Style::new().fg(puyo_color(puyo)).bg(color::BLACK), "[]")
    }

    /// A cell cleared by the latest chain step.
    pub fn popped(puyo: PuyoColor) -> Self {
        let style = Style::new()
            .fg(puyo_color(puyo))
            .bg(color::BLACK)
            .add_modifier(Modifier::BOLD);
        Self::new(style, "**")
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
