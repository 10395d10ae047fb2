use std::fmt;

use serde::Serialize;

use super::{board::Board, color::PuyoColor};

/// Positional offsets tried, in order, when a rotation is blocked.
///
/// No displacement first, then one column left/right, then one row up, then
/// two columns left/right. The first offset at which the rotated pair fits wins.
pub const DEFAULT_KICKS: [(i32, i32); 6] = [(0, 0), (-1, 0), (1, 0), (0, -1), (-2, 0), (2, 0)];

/// Where the satellite cell sits relative to the pivot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Satellite above the pivot (spawn orientation).
    #[default]
    Up,
    /// Satellite right of the pivot.
    Right,
    /// Satellite below the pivot.
    Down,
    /// Satellite left of the pivot.
    Left,
}

impl Orientation {
    const ALL: [Self; 4] = [Self::Up, Self::Right, Self::Down, Self::Left];

    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Offset of the satellite cell from the pivot cell.
    #[must_use]
    pub const fn satellite_offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Orientation after a quarter turn: `(current + direction + 4) mod 4`.
    #[must_use]
    pub fn rotated(self, direction: RotationDirection) -> Self {
        let index = (i32::from(self.index()) + direction.delta()).rem_euclid(4);
        Self::ALL[usize::try_from(index).unwrap_or_default()]
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub const fn delta(self) -> i32 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => -1,
        }
    }
}

/// Colors of a two-cell pair: the pivot (anchor) and the satellite.
///
/// Serialized as a two-letter string, pivot first (e.g. `"RG"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairColors {
    pub pivot: PuyoColor,
    pub satellite: PuyoColor,
}

impl PairColors {
    #[must_use]
    pub const fn new(pivot: PuyoColor, satellite: PuyoColor) -> Self {
        Self { pivot, satellite }
    }
}

impl fmt::Display for PairColors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pivot.as_char(), self.satellite.as_char())
    }
}

impl Serialize for PairColors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The falling two-cell pair.
///
/// A pair is a value: movement and rotation return new pairs and never touch
/// the board, so they double as read-only legality checks and as the ghost
/// projection.
///
/// # Example
///
/// ```
/// use popchain_engine::{Board, DEFAULT_KICKS, Pair, PairColors, PuyoColor, RotationDirection};
///
/// let board = Board::new(6, 13);
/// let pair = Pair::new(PairColors::new(PuyoColor::Red, PuyoColor::Blue), 2, 1);
///
/// let moved = pair.moved(&board, -1, 0).unwrap();
/// let rotated = moved
///     .rotated(&board, RotationDirection::Clockwise, &DEFAULT_KICKS)
///     .unwrap();
/// let landed = rotated.drop_position(&board);
/// assert_eq!(landed.y(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    x: i32,
    y: i32,
    orientation: Orientation,
    colors: PairColors,
}

impl Pair {
    /// Creates a pair in the spawn orientation with its pivot at `(x, y)`.
    #[must_use]
    pub const fn new(colors: PairColors, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            orientation: Orientation::Up,
            colors,
        }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn colors(&self) -> PairColors {
        self.colors
    }

    /// The two absolute cells occupied by the pair: pivot first, then satellite.
    #[must_use]
    pub fn cells(&self) -> [(i32, i32, PuyoColor); 2] {
        let (dx, dy) = self.orientation.satellite_offset();
        [
            (self.x, self.y, self.colors.pivot),
            (self.x + dx, self.y + dy, self.colors.satellite),
        ]
    }

    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    #[must_use]
    pub fn with_orientation(&self, orientation: Orientation) -> Self {
        Self {
            orientation,
            ..*self
        }
    }

    /// Returns whether both cells are on the board and empty.
    #[must_use]
    pub fn fits(&self, board: &Board) -> bool {
        self.cells()
            .iter()
            .all(|&(x, y, _)| board.is_vacant(x, y))
    }

    /// Returns whether the pair, translated by `(dx, dy)` and optionally turned
    /// to `orientation`, would fit on the board.
    #[must_use]
    pub fn can_move(
        &self,
        board: &Board,
        dx: i32,
        dy: i32,
        orientation: Option<Orientation>,
    ) -> bool {
        let orientation = orientation.unwrap_or(self.orientation);
        self.shifted(dx, dy).with_orientation(orientation).fits(board)
    }

    /// The translated pair, if it fits.
    #[must_use]
    pub fn moved(&self, board: &Board, dx: i32, dy: i32) -> Option<Self> {
        self.can_move(board, dx, dy, None)
            .then(|| self.shifted(dx, dy))
    }

    /// Rotates a quarter turn, trying `kicks` in order.
    ///
    /// Returns the pair at the first kick offset where the rotated pair fits,
    /// or `None` if every kick is blocked.
    #[must_use]
    pub fn rotated(
        &self,
        board: &Board,
        direction: RotationDirection,
        kicks: &[(i32, i32)],
    ) -> Option<Self> {
        let orientation = self.orientation.rotated(direction);
        kicks
            .iter()
            .find(|&&(dx, dy)| self.can_move(board, dx, dy, Some(orientation)))
            .map(|&(dx, dy)| self.shifted(dx, dy).with_orientation(orientation))
    }

    /// Where the pair would land if hard-dropped now.
    #[must_use]
    pub fn drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while let Some(pair) = dropped.moved(board, 0, 1) {
            dropped = pair;
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RB: PairColors = PairColors::new(PuyoColor::Red, PuyoColor::Blue);

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    #[test]
    fn test_cells_follow_orientation() {
        let pair = Pair::new(RB, 2, 5);
        let satellites = [
            (Orientation::Up, (2, 4)),
            (Orientation::Right, (3, 5)),
            (Orientation::Down, (2, 6)),
            (Orientation::Left, (1, 5)),
        ];
        for (orientation, (sx, sy)) in satellites {
            let cells = pair.with_orientation(orientation).cells();
            assert_eq!(cells[0], (2, 5, PuyoColor::Red));
            assert_eq!(cells[1], (sx, sy, PuyoColor::Blue));
        }
    }

    #[test]
    fn test_orientation_rotation_wraps() {
        use RotationDirection::{Clockwise, CounterClockwise};
        assert_eq!(Orientation::Up.rotated(Clockwise), Orientation::Right);
        assert_eq!(Orientation::Left.rotated(Clockwise), Orientation::Up);
        assert_eq!(Orientation::Up.rotated(CounterClockwise), Orientation::Left);
        assert_eq!(Orientation::Right.rotated(CounterClockwise), Orientation::Up);
    }

    #[test]
    fn test_can_move_checks_bounds_and_cells() {
        let board = board(
            "
            ...
            ...
            .G.
            ",
        );
        let pair = Pair::new(RB, 1, 1);
        assert!(pair.can_move(&board, 0, 0, None));
        assert!(!pair.can_move(&board, 0, 1, None));
        assert!(!pair.can_move(&board, -2, 0, None));
        assert!(!pair.can_move(&board, 0, -1, None));
        assert!(pair.can_move(&board, 1, 0, Some(Orientation::Down)));
        assert!(!pair.can_move(&board, 0, 0, Some(Orientation::Down)));
    }

    #[test]
    fn test_rotation_without_obstacles_does_not_kick() {
        let board = Board::new(6, 13);
        let pair = Pair::new(RB, 2, 6);
        let rotated = pair
            .rotated(&board, RotationDirection::Clockwise, &DEFAULT_KICKS)
            .unwrap();
        assert_eq!((rotated.x(), rotated.y()), (2, 6));
        assert_eq!(rotated.orientation(), Orientation::Right);
    }

    #[test]
    fn test_rotation_against_right_wall_kicks_left() {
        let board = Board::new(6, 13);
        let pair = Pair::new(RB, 5, 6);
        let rotated = pair
            .rotated(&board, RotationDirection::Clockwise, &DEFAULT_KICKS)
            .unwrap();
        assert_eq!((rotated.x(), rotated.y()), (4, 6));
        assert_eq!(rotated.cells()[1].0, 5);
    }

    #[test]
    fn test_rotation_against_left_wall_kicks_right() {
        let board = Board::new(6, 13);
        let pair = Pair::new(RB, 0, 6);
        let rotated = pair
            .rotated(&board, RotationDirection::CounterClockwise, &DEFAULT_KICKS)
            .unwrap();
        assert_eq!(rotated.orientation(), Orientation::Left);
        assert_eq!((rotated.x(), rotated.y()), (1, 6));
    }

    #[test]
    fn test_rotation_on_floor_kicks_up() {
        // Turning the satellite below a pivot that rests on the bottom row
        // only succeeds with the upward kick.
        let board = Board::new(6, 13);
        let pair = Pair::new(RB, 2, 12).with_orientation(Orientation::Right);
        let rotated = pair
            .rotated(&board, RotationDirection::Clockwise, &DEFAULT_KICKS)
            .unwrap();
        assert_eq!(rotated.orientation(), Orientation::Down);
        assert_eq!((rotated.x(), rotated.y()), (2, 11));
        assert_eq!(
            pair.rotated(&board, RotationDirection::Clockwise, &[(0, 0), (-1, 0), (1, 0)]),
            None
        );
    }

    #[test]
    fn test_rotation_prefers_earlier_kicks() {
        // Both the left and the right kick would work; left comes first.
        let board = board(
            "
            .....
            ..G..
            ",
        );
        let pair = Pair::new(RB, 2, 0).with_orientation(Orientation::Left);
        let rotated = pair
            .rotated(&board, RotationDirection::CounterClockwise, &DEFAULT_KICKS)
            .unwrap();
        assert_eq!(rotated.orientation(), Orientation::Down);
        assert_eq!((rotated.x(), rotated.y()), (1, 0));

        for _ in 0..3 {
            let again = pair
                .rotated(&board, RotationDirection::CounterClockwise, &DEFAULT_KICKS)
                .unwrap();
            assert_eq!(again, rotated);
        }
    }

    #[test]
    fn test_rotation_rejected_when_all_kicks_blocked() {
        let board = board(
            "
            GGGGGG
            GGG.GG
            GGG.GG
            ",
        );
        let pair = Pair::new(RB, 3, 2);
        assert!(pair.fits(&board));
        assert_eq!(
            pair.rotated(&board, RotationDirection::Clockwise, &DEFAULT_KICKS),
            None
        );
    }

    #[test]
    fn test_drop_position() {
        let board = board(
            "
            ...
            ...
            ...
            ...
            .Y.
            ",
        );
        let pair = Pair::new(RB, 1, 1);
        assert_eq!(pair.drop_position(&board), pair.shifted(0, 2));
        let pair = Pair::new(RB, 0, 1).with_orientation(Orientation::Right);
        let landed = pair.drop_position(&board);
        assert_eq!((landed.x(), landed.y()), (0, 3));
    }

    #[test]
    fn test_pair_colors_serialization() {
        let serialized = serde_json::to_string(&RB).unwrap();
        assert_eq!(serialized, "\"RB\"");
        let upcoming = [RB, PairColors::new(PuyoColor::Yellow, PuyoColor::Purple)];
        assert_eq!(serde_json::to_string(&upcoming).unwrap(), r#"["RB","YP"]"#);
    }
}
