//! Board positions

use serde::{Deserialize, Serialize};
use crate::BOARD_SIZE;

/// A tile on the 5x5 board, 0-indexed row-major
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct BoardPosition(usize);

impl BoardPosition {
    /// Build a position, `None` if the index is off the board
    pub fn new(index: usize) -> Option<Self> {
        (index < BOARD_SIZE).then_some(Self(index))
    }

    /// 0-based index
    pub fn index(&self) -> usize {
        self.0
    }

    /// 1-based tile number as shown to players
    pub fn number(&self) -> usize {
        self.0 + 1
    }

    /// Every position in index order
    pub fn all() -> impl Iterator<Item = BoardPosition> {
        (0..BOARD_SIZE).map(BoardPosition)
    }
}

impl TryFrom<usize> for BoardPosition {
    type Error = String;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("tile index {} is off the board", index))
    }
}

impl From<BoardPosition> for usize {
    fn from(position: BoardPosition) -> usize {
        position.0
    }
}

impl std::fmt::Display for BoardPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile {}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(BoardPosition::new(0).is_some());
        assert!(BoardPosition::new(24).is_some());
        assert!(BoardPosition::new(25).is_none());
    }

    #[test]
    fn test_all_in_order() {
        let all: Vec<usize> = BoardPosition::all().map(|p| p.index()).collect();
        assert_eq!(all.len(), BOARD_SIZE);
        assert_eq!(all.first(), Some(&0));
        assert_eq!(all.last(), Some(&24));
    }

    #[test]
    fn test_serde_rejects_off_board() {
        assert!(serde_json::from_str::<BoardPosition>("7").is_ok());
        assert!(serde_json::from_str::<BoardPosition>("30").is_err());
    }
}
