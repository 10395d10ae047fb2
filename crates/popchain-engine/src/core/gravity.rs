use super::board::Board;

impl Board {
    /// Drops every resting puyo as far down its column as it can go.
    ///
    /// Each column is scanned from the bottom; an empty slot takes the nearest
    /// occupied cell above it. One pass leaves every column contiguous from the
    /// bottom with the relative vertical order of its puyos preserved.
    ///
    /// Returns `true` if any cell moved.
    ///
    /// # Example
    ///
    /// ```
    /// use popchain_engine::Board;
    ///
    /// let mut board: Board = "R.\n..\nG.\n.B".parse().unwrap();
    /// assert!(board.apply_gravity());
    /// assert_eq!(board.to_string(), "..\n..\nR.\nGB");
    /// assert!(!board.apply_gravity());
    /// ```
    pub fn apply_gravity(&mut self) -> bool {
        let mut moved = false;
        for x in 0..self.width() {
            for y in (0..self.height()).rev() {
                if !self.is_empty(x, y) {
                    continue;
                }
                let Some(src_y) = (0..y).rev().find(|&yy| !self.is_empty(x, yy)) else {
                    // Nothing left above this slot.
                    break;
                };
                self.move_cell((x, src_y), (x, y));
                moved = true;
            }
        }
        moved
    }

    /// Returns whether every column is contiguous from the bottom.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        (0..self.width()).all(|x| {
            (1..self.height()).all(|y| self.is_empty(x, y - 1) || !self.is_empty(x, y))
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use crate::PuyoColor;

    use super::*;

    fn random_board(rng: &mut Pcg32) -> Board {
        let mut board = Board::new(6, 13);
        for y in 0..board.height() {
            for x in 0..board.width() {
                if rng.random_bool(0.4) {
                    board.set(x, y, rng.random::<PuyoColor>());
                }
            }
        }
        board
    }

    fn column(board: &Board, x: usize) -> Vec<PuyoColor> {
        (0..board.height()).filter_map(|y| board.get(x, y)).collect()
    }

    #[test]
    fn test_gravity_on_settled_board_is_noop() {
        let mut board: Board = "...\nR..\nRGB".parse().unwrap();
        let before = board.clone();
        assert!(!board.apply_gravity());
        assert_eq!(board, before);
    }

    #[test]
    fn test_gravity_preserves_vertical_order() {
        let mut board: Board = "
            Y.
            ..
            G.
            ..
            R.
            ..
        "
        .parse()
        .unwrap();
        assert!(board.apply_gravity());
        assert_eq!(board.to_string(), "..\n..\n..\nY.\nG.\nR.");
    }

    #[test]
    fn test_gravity_moves_hidden_row_cells() {
        let mut board = Board::new(2, 4);
        board.set(1, 0, PuyoColor::Purple);
        board.apply_gravity();
        assert_eq!(board.get(1, 3), Some(PuyoColor::Purple));
        assert!(board.is_empty(1, 0));
    }

    #[test]
    fn test_gravity_settles_random_boards() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let mut board = random_board(&mut rng);
            let columns = (0..board.width())
                .map(|x| column(&board, x))
                .collect::<Vec<_>>();
            let count = board.occupied_count();

            board.apply_gravity();
            assert!(board.is_settled(), "not settled:\n{board}");
            assert_eq!(board.occupied_count(), count);
            for (x, col) in columns.iter().enumerate() {
                assert_eq!(&column(&board, x), col);
            }

            let once = board.clone();
            assert!(!board.apply_gravity());
            assert_eq!(board, once, "gravity is not idempotent");
        }
    }

    #[test]
    fn test_is_settled() {
        assert!(Board::new(3, 3).is_settled());
        assert!("...\n.R.\nGRB".parse::<Board>().unwrap().is_settled());
        assert!(!".R.\n...\n...".parse::<Board>().unwrap().is_settled());
    }
}
