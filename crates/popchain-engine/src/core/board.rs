use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;

use super::color::PuyoColor;

/// Content of a single board cell: empty, or a resting puyo of some color.
pub type Cell = Option<PuyoColor>;

/// Grid of resting puyos.
///
/// The grid is `width × height` cells, where the height includes the hidden
/// buffer rows above the visible play area. Row `0` is the top row and
/// `height - 1` is the bottom row.
///
/// Indexed accessors ([`get`](Self::get), [`set`](Self::set),
/// [`clear`](Self::clear), [`is_empty`](Self::is_empty)) take unsigned
/// coordinates and panic when they are out of bounds; callers check with
/// [`in_bounds`](Self::in_bounds) first. The signed helpers
/// ([`cell_at`](Self::cell_at), [`is_vacant`](Self::is_vacant)) treat
/// out-of-bounds coordinates as absent.
///
/// # Example
///
/// ```
/// use popchain_engine::{Board, PuyoColor};
///
/// let mut board = Board::new(6, 13);
/// board.set(0, 12, PuyoColor::Red);
///
/// assert_eq!(board.get(0, 12), Some(PuyoColor::Red));
/// assert!(board.in_bounds(5, 12));
/// assert!(!board.in_bounds(6, 12));
/// assert!(!board.is_vacant(0, 12));
/// assert!(!board.is_vacant(-1, 12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "board must not be empty");
        Self {
            width,
            height,
            cells: vec![None; width * height],
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

    /// Returns whether `(x, y)` lies on the board (hidden rows included).
    #[must_use]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.checked_position(x, y).is_some()
    }

    /// Converts signed coordinates into board coordinates if they are in bounds.
    #[must_use]
    pub fn checked_position(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.width)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.height)?;
        Some((x, y))
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        y * self.width + x
    }

    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, color: PuyoColor) {
        let i = self.index(x, y);
        self.cells[i] = Some(color);
    }

    pub fn clear(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.cells[i] = None;
    }

    #[must_use]
    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_none()
    }

    /// Returns the cell at signed coordinates, or `None` when out of bounds.
    #[must_use]
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        self.checked_position(x, y).map(|(x, y)| self.get(x, y))
    }

    /// Returns whether `(x, y)` is in bounds and empty.
    #[must_use]
    pub fn is_vacant(&self, x: i32, y: i32) -> bool {
        self.cell_at(x, y).is_some_and(|cell| cell.is_none())
    }

    /// Moves the content of `from` into `to`, leaving `from` empty.
    pub(crate) fn move_cell(&mut self, from: (usize, usize), to: (usize, usize)) {
        let from = self.index(from.0, from.1);
        let to = self.index(to.0, to.1);
        self.cells[to] = self.cells[from].take();
    }

    /// Returns the in-bounds 4-neighbors (right, left, down, up) of a cell.
    #[must_use]
    pub fn neighbors(&self, x: usize, y: usize) -> ArrayVec<(usize, usize), 4> {
        let mut neighbors = ArrayVec::new();
        if x + 1 < self.width {
            neighbors.push((x + 1, y));
        }
        if x > 0 {
            neighbors.push((x - 1, y));
        }
        if y + 1 < self.height {
            neighbors.push((x, y + 1));
        }
        if y > 0 {
            neighbors.push((x, y - 1));
        }
        neighbors
    }

    /// Iterates over rows from top (hidden rows first) to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(self.width)
    }

    /// Iterates over the positions and colors of all occupied cells in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize, PuyoColor)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|color| (i % self.width, i / self.width, color)))
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }
}

/// One row per line, `.` for empty cells and the color letter otherwise.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                let c = cell.map_or('.', PuyoColor::as_char);
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    #[display("board text has no rows")]
    Empty,
    #[display("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[display("invalid cell {found:?} at ({x}, {y})")]
    InvalidCell { x: usize, y: usize, found: char },
}

/// Parses the [`Display`](fmt::Display) form. Blank lines and surrounding
/// whitespace are ignored.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let width = lines.first().ok_or(ParseBoardError::Empty)?.chars().count();
        let mut board = Board::new(width, lines.len());
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseBoardError::RaggedRow {
                    row: y,
                    found,
                    expected: width,
                });
            }
            for (x, c) in line.chars().enumerate() {
                if c == '.' {
                    continue;
                }
                let color =
                    PuyoColor::from_char(c).ok_or(ParseBoardError::InvalidCell { x, y, found: c })?;
                board.set(x, y, color);
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(6, 13);
        assert_eq!(board.width(), 6);
        assert_eq!(board.height(), 13);
        assert_eq!(board.occupied_count(), 0);
        assert!(board.rows().flatten().all(Option::is_none));
    }

    #[test]
    fn test_bounds_checks() {
        let board = Board::new(6, 13);
        assert!(board.in_bounds(0, 0));
        assert!(board.in_bounds(5, 12));
        assert!(!board.in_bounds(-1, 0));
        assert!(!board.in_bounds(0, -1));
        assert!(!board.in_bounds(6, 0));
        assert!(!board.in_bounds(0, 13));
        assert_eq!(board.cell_at(6, 0), None);
        assert_eq!(board.cell_at(5, 0), Some(None));
    }

    #[test]
    fn test_set_get_clear_only_touch_target_cell() {
        let mut board = Board::new(6, 13);
        board.set(2, 7, PuyoColor::Green);
        assert_eq!(board.get(2, 7), Some(PuyoColor::Green));
        assert!(!board.is_empty(2, 7));
        assert_eq!(board.occupied_count(), 1);

        board.clear(2, 7);
        assert!(board.is_empty(2, 7));
        assert_eq!(board, Board::new(6, 13));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_out_of_bounds_access_panics() {
        let board = Board::new(6, 13);
        let _ = board.get(6, 0);
    }

    #[test]
    fn test_is_vacant() {
        let mut board = Board::new(3, 3);
        board.set(1, 1, PuyoColor::Blue);
        assert!(board.is_vacant(0, 0));
        assert!(!board.is_vacant(1, 1));
        assert!(!board.is_vacant(3, 1));
        assert!(!board.is_vacant(1, -1));
    }

    #[test]
    fn test_neighbors_at_corner_and_center() {
        let board = Board::new(3, 3);
        assert_eq!(board.neighbors(0, 0).as_slice(), &[(1, 0), (0, 1)]);
        assert_eq!(
            board.neighbors(1, 1).as_slice(),
            &[(2, 1), (0, 1), (1, 2), (1, 0)]
        );
        assert_eq!(board.neighbors(2, 2).as_slice(), &[(1, 2), (2, 1)]);
    }

    #[test]
    fn test_occupied_cells_row_major() {
        let board: Board = "
            .R.
            G..
            ..B
        "
        .parse()
        .unwrap();
        let cells = board.occupied_cells().collect::<Vec<_>>();
        assert_eq!(
            cells,
            [
                (1, 0, PuyoColor::Red),
                (0, 1, PuyoColor::Green),
                (2, 2, PuyoColor::Blue)
            ]
        );
    }

    #[test]
    fn test_text_form() {
        let text = "..Y\nRG.\nPPB";
        let board: Board = text.parse().unwrap();
        assert_eq!(board.width(), 3);
        assert_eq!(board.height(), 3);
        assert_eq!(board.get(2, 0), Some(PuyoColor::Yellow));
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "RG\nR".parse::<Board>(),
            Err(ParseBoardError::RaggedRow {
                row: 1,
                found: 1,
                expected: 2
            })
        );
        assert_eq!(
            "R?".parse::<Board>(),
            Err(ParseBoardError::InvalidCell {
                x: 1,
                y: 0,
                found: '?'
            })
        );
    }
}
