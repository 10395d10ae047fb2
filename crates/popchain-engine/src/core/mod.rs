//! Board-level data structures and rules.
//!
//! - [`Board`] - grid of resting puyos, including hidden rows
//! - [`Pair`] - the falling two-cell piece and its movement/rotation rules
//! - [`MatchGroup`] - connected same-colored groups found by [`Board::find_groups`]
//! - gravity settling via [`Board::apply_gravity`]

pub use self::{board::*, color::*, matching::*, pair::*};

pub(crate) mod board;
pub(crate) mod color;
mod gravity;
pub(crate) mod matching;
pub(crate) mod pair;
