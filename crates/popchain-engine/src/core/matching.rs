use std::collections::VecDeque;

use super::{board::Board, color::PuyoColor};

/// A maximal 4-connected set of same-colored cells that is large enough to clear.
///
/// Groups are computed fresh from a board and never stored on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    color: PuyoColor,
    cells: Vec<(usize, usize)>,
}

impl MatchGroup {
    #[must_use]
    pub fn color(&self) -> PuyoColor {
        self.color
    }

    /// Cell positions in flood-fill (breadth-first) order, starting at the
    /// first cell of the group in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Board {
    /// Finds every group of at least `min_size` connected same-colored cells.
    ///
    /// Cells are scanned in row-major order; each unvisited occupied cell seeds
    /// a breadth-first flood fill over its up/down/left/right neighbors of the
    /// same color. The returned groups are disjoint and ordered by the position
    /// of their first scanned cell.
    ///
    /// # Example
    ///
    /// ```
    /// use popchain_engine::{Board, PuyoColor};
    ///
    /// let board: Board = "
    ///     ......
    ///     R.....
    ///     RR...B
    ///     RGG.BB
    /// "
    /// .parse()
    /// .unwrap();
    ///
    /// let groups = board.find_groups(4);
    /// assert_eq!(groups.len(), 1);
    /// assert_eq!(groups[0].color(), PuyoColor::Red);
    /// assert_eq!(groups[0].len(), 4);
    /// ```
    #[must_use]
    pub fn find_groups(&self, min_size: usize) -> Vec<MatchGroup> {
        let mut visited = vec![false; self.width() * self.height()];
        let mut groups = vec![];
        for y in 0..self.height() {
            for x in 0..self.width() {
                if visited[y * self.width() + x] {
                    continue;
                }
                let Some(group) = self.flood_fill(x, y, &mut visited) else {
                    continue;
                };
                if group.len() >= min_size {
                    groups.push(group);
                }
            }
        }
        groups
    }

    /// Returns the connected same-colored component containing `(x, y)`,
    /// or `None` if the cell is empty.
    #[must_use]
    pub fn connected_component(&self, x: usize, y: usize) -> Option<MatchGroup> {
        let mut visited = vec![false; self.width() * self.height()];
        self.flood_fill(x, y, &mut visited)
    }

    fn flood_fill(&self, x: usize, y: usize, visited: &mut [bool]) -> Option<MatchGroup> {
        let color = self.get(x, y)?;
        let width = self.width();
        let mut queue = VecDeque::from([(x, y)]);
        let mut cells = vec![];
        visited[y * width + x] = true;
        while let Some((cx, cy)) = queue.pop_front() {
            cells.push((cx, cy));
            for (nx, ny) in self.neighbors(cx, cy) {
                if visited[ny * width + nx] || self.get(nx, ny) != Some(color) {
                    continue;
                }
                visited[ny * width + nx] = true;
                queue.push_back((nx, ny));
            }
        }
        Some(MatchGroup { color, cells })
    }
}
