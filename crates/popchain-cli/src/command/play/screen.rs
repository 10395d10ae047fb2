use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use popchain_engine::{
    Command, GameSession, PoppedCell, SessionEvent, SessionState, TurnSummary,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::ui::widgets::{SessionDisplay, style};

const POP_HIGHLIGHT: Duration = Duration::from_millis(300);
const ANNOUNCEMENT: Duration = Duration::from_millis(900);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Session(Command),
    ToggleGhost,
    Quit,
}

fn key_action(code: KeyCode) -> Option<KeyAction> {
    let action = match code {
        KeyCode::Left => KeyAction::Session(Command::MoveLeft),
        KeyCode::Right => KeyAction::Session(Command::MoveRight),
        KeyCode::Down => KeyAction::Session(Command::SoftDrop),
        KeyCode::Up => KeyAction::Session(Command::RotateCounterClockwise),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            ' ' | 'c' => KeyAction::Session(Command::HardDrop),
            'z' => KeyAction::Session(Command::RotateCounterClockwise),
            'x' => KeyAction::Session(Command::RotateClockwise),
            'p' => KeyAction::Session(Command::TogglePause),
            'r' => KeyAction::Session(Command::Reset),
            'g' => KeyAction::ToggleGhost,
            'q' => KeyAction::Quit,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

#[derive(Debug)]
struct Announcement {
    text: String,
    remaining: Duration,
}

#[derive(Debug)]
pub struct PlayScreen {
    session: GameSession,
    show_ghost: bool,
    is_exiting: bool,
    popped: Vec<PoppedCell>,
    pop_remaining: Duration,
    announcement: Option<Announcement>,
    last_turn: Option<TurnSummary>,
}

impl PlayScreen {
    pub fn new(session: GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            is_exiting: false,
            popped: vec![],
            pop_remaining: Duration::ZERO,
            announcement: None,
            last_turn: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Totals of the most recently completed turn since the last reset.
    pub fn last_turn(&self) -> Option<TurnSummary> {
        self.last_turn
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let session_display = SessionDisplay::new(&self.session, self.show_ghost)
            .popped(&self.popped)
            .announcement(self.announcement.as_ref().map(|a| a.text.as_str()));
        let help_text = match self.session.session_state() {
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Space C (Hard Drop) | Z ↑ X (Rotate) | G (Ghost) | P (Pause) | R (Reset) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | R (Reset) | Q (Quit)",
            SessionState::GameOver => "Controls: R (Reset) | Q (Quit)",
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(key) = event.as_key_press_event() else {
            return;
        };
        match key_action(key.code) {
            Some(KeyAction::Session(command)) => {
                if command == Command::Reset {
                    self.clear_effects();
                    self.last_turn = None;
                }
                _ = self.session.apply(command);
                self.collect_events();
            }
            Some(KeyAction::ToggleGhost) => self.show_ghost = !self.show_ghost,
            Some(KeyAction::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.pop_remaining = self.pop_remaining.saturating_sub(elapsed);
        if self.pop_remaining.is_zero() {
            self.popped.clear();
        }
        if let Some(announcement) = &mut self.announcement {
            announcement.remaining = announcement.remaining.saturating_sub(elapsed);
        }
        if self
            .announcement
            .as_ref()
            .is_some_and(|a| a.remaining.is_zero())
        {
            self.announcement = None;
        }

        self.session.tick(elapsed);
        self.collect_events();
    }

    fn clear_effects(&mut self) {
        self.popped.clear();
        self.pop_remaining = Duration::ZERO;
        self.announcement = None;
    }

    fn collect_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                SessionEvent::ChainStep(step) => {
                    self.popped = step.popped().to_vec();
                    self.pop_remaining = POP_HIGHLIGHT;
                    self.announcement = Some(Announcement {
                        text: format!("{} CHAIN +{}", step.depth(), step.score_delta()),
                        remaining: ANNOUNCEMENT,
                    });
                }
                SessionEvent::TurnCompleted(summary) => self.last_turn = Some(summary),
                SessionEvent::Spawned(_) | SessionEvent::GameOver => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEvent, KeyModifiers};
    use popchain_engine::{GameConfig, PairSeed};

    use super::*;

    fn screen() -> PlayScreen {
        let session =
            GameSession::with_seed(GameConfig::default(), PairSeed::from_bytes([3; 16])).unwrap();
        PlayScreen::new(session, true)
    }

    fn press(screen: &mut PlayScreen, code: KeyCode) {
        screen.handle_event(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_key_bindings() {
        let session = |command| Some(KeyAction::Session(command));
        assert_eq!(key_action(KeyCode::Left), session(Command::MoveLeft));
        assert_eq!(key_action(KeyCode::Right), session(Command::MoveRight));
        assert_eq!(key_action(KeyCode::Down), session(Command::SoftDrop));
        assert_eq!(key_action(KeyCode::Char(' ')), session(Command::HardDrop));
        assert_eq!(key_action(KeyCode::Char('c')), session(Command::HardDrop));
        assert_eq!(
            key_action(KeyCode::Up),
            session(Command::RotateCounterClockwise)
        );
        assert_eq!(
            key_action(KeyCode::Char('Z')),
            session(Command::RotateCounterClockwise)
        );
        assert_eq!(
            key_action(KeyCode::Char('x')),
            session(Command::RotateClockwise)
        );
        assert_eq!(key_action(KeyCode::Char('p')), session(Command::TogglePause));
        assert_eq!(key_action(KeyCode::Char('r')), session(Command::Reset));
        assert_eq!(key_action(KeyCode::Char('g')), Some(KeyAction::ToggleGhost));
        assert_eq!(key_action(KeyCode::Char('q')), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::Char('a')), None);
        assert_eq!(key_action(KeyCode::Enter), None);
    }

    #[test]
    fn test_keys_drive_session() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Left);
        assert_eq!(screen.session().active_pair().unwrap().x(), 1);

        assert_eq!(screen.last_turn(), None);
        press(&mut screen, KeyCode::Char(' '));
        assert_eq!(screen.session().stats().placed_pairs(), 1);
        assert_eq!(screen.last_turn(), Some(TurnSummary::default()));

        press(&mut screen, KeyCode::Char('g'));
        assert!(!screen.show_ghost);

        press(&mut screen, KeyCode::Char('q'));
        assert!(screen.is_exiting());
    }

    #[test]
    fn test_pause_freezes_updates() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Char('p'));
        screen.update(Duration::from_secs(5));
        assert_eq!(screen.session().active_pair().unwrap().y(), 1);

        press(&mut screen, KeyCode::Char('p'));
        screen.update(Duration::from_secs(5));
        assert_eq!(screen.session().active_pair().unwrap().y(), 1);
        screen.update(Duration::from_secs(1));
        assert_eq!(screen.session().active_pair().unwrap().y(), 2);
    }

    #[test]
    fn test_effects_expire() {
        let mut screen = screen();
        screen.announcement = Some(Announcement {
            text: "1 CHAIN +40".to_owned(),
            remaining: ANNOUNCEMENT,
        });
        screen.update(Duration::from_millis(500));
        assert!(screen.announcement.is_some());
        screen.update(Duration::from_millis(500));
        assert!(screen.announcement.is_none());
    }
}
