use popchain_engine::{GameSession, PoppedCell, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Modifier,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PairDisplay, SessionStatsDisplay, color, style};

#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
    popped: &'a [PoppedCell],
    announcement: Option<&'a str>,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            popped: &[],
            announcement: None,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Cells to highlight as just popped.
    pub fn popped(self, popped: &'a [PoppedCell]) -> Self {
        Self { popped, ..self }
    }

    /// Transient text shown over the top of the board, such as "2 CHAIN +60".
    pub fn announcement(self, announcement: Option<&'a str>) -> Self {
        Self {
            announcement,
            ..self
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.session.session_state() {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let hidden_rows = self.session.config().hidden_rows;
        let game_board = BoardDisplay::new(self.session.board(), hidden_rows)
            .falling_pair(self.session.active_pair().copied())
            .ghost(self.session.ghost().filter(|_| self.show_ghost))
            .popped(self.popped)
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let mut next_pairs = self.session.next_pairs();
        let next = PairDisplay::new(next_pairs.next()).block(panel("NEXT"));
        let next_next = PairDisplay::new(next_pairs.next()).block(panel("NEXT-NEXT"));
        let session_stats = SessionStatsDisplay::new(self.session).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area, next_next_area] = Layout::vertical([
            Constraint::Length(next.height()),
            Constraint::Length(next_next.height()),
        ])
        .spacing(1)
        .areas(right_column);

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next.render(next_area, buf);
        next_next.render(next_next_area, buf);

        if let Some(text) = self.announcement {
            // First row inside the board border.
            let line_area = Rect {
                y: board_area.y + 1,
                height: 1,
                ..board_area
            };
            Line::styled(text, style::ANNOUNCEMENT.add_modifier(Modifier::BOLD))
                .centered()
                .render(line_area, buf);
        }

        let popup = match self.session.session_state() {
            SessionState::Playing => None,
            SessionState::Paused => Some(("PAUSED", style::PAUSED)),
            SessionState::GameOver => Some(("GAME OVER", style::GAME_OVER)),
        };

        if let Some((text, popup_style)) = popup {
            let block = Block::new().style(popup_style);
            let text = Text::styled(text, popup_style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
