//! Star board geometry and move search.
//!
//! Cells are addressed with axial coordinates `(x, y)` in `[0, 4n]²` where
//! `n` is the side of a home triangle. The star is the union of two large
//! triangles:
//!
//! - `x >= n, y >= n, x + y <= 5n`
//! - `x <= 3n, y <= 3n, x + y >= 3n`
//!
//! Player 0 starts in the corner `x + y < 3n` and races to the opposite
//! corner `x + y > 5n`, which is player 1's home.

use rustc_hash::FxHashSet;

use crate::core::coord::Coord;
use crate::core::player::PlayerId;

/// The six hex neighbors.
pub const NEIGHBORS: [(i32, i32); 6] = [(1, 0), (-1, 0), (0, 1), (0, -1), (1, -1), (-1, 1)];

/// Star board of home-triangle side `size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexBoard {
    size: i32,
}

impl HexBoard {
    #[must_use]
    pub const fn new(size: i32) -> Self {
        Self { size }
    }

    #[must_use]
    pub const fn size(&self) -> i32 {
        self.size
    }

    /// Marbles per player.
    #[must_use]
    pub const fn pieces_per_player(&self) -> usize {
        let n = self.size as usize;
        n * (n + 1) / 2
    }

    /// Sums are taken in `i64` so decoded coordinates of any size are safe.
    #[must_use]
    pub fn contains(&self, c: Coord) -> bool {
        let n = i64::from(self.size);
        let (x, y) = (i64::from(c.x), i64::from(c.y));
        (x >= n && y >= n && x + y <= 5 * n) || (x <= 3 * n && y <= 3 * n && x + y >= 3 * n)
    }

    /// Whether `c` lies in `player`'s starting triangle.
    #[must_use]
    pub fn in_home(&self, player: PlayerId, c: Coord) -> bool {
        let n = i64::from(self.size);
        let (x, y) = (i64::from(c.x), i64::from(c.y));
        if player.0 == 0 {
            x >= n && y >= n && x + y < 3 * n
        } else {
            x <= 3 * n && y <= 3 * n && x + y > 5 * n
        }
    }

    /// All cells, sorted by `(x, y)`.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let side = 4 * self.size;
        (0..=side)
            .flat_map(move |x| (0..=side).map(move |y| Coord::new(x, y)))
            .filter(move |&c| self.contains(c))
    }

    /// `player`'s starting triangle, sorted by `(x, y)`.
    #[must_use]
    pub fn home(&self, player: PlayerId) -> Vec<Coord> {
        self.cells().filter(|&c| self.in_home(player, c)).collect()
    }

    /// Every destination of the marble on `source`, sorted by `(x, y)`.
    ///
    /// Destinations are the empty neighbors plus every landing of a jump
    /// chain. A chain never lands on a cell twice and never returns to
    /// `source`.
    #[must_use]
    pub fn targets(&self, occupied: &FxHashSet<Coord>, source: Coord) -> Vec<Coord> {
        let free = |c: Coord| self.contains(c) && !occupied.contains(&c);
        let mut found: FxHashSet<Coord> = FxHashSet::default();

        for (dx, dy) in NEIGHBORS {
            let next = source.offset(dx, dy);
            if free(next) {
                found.insert(next);
            }
        }

        let mut visited: FxHashSet<Coord> = FxHashSet::default();
        visited.insert(source);
        let mut stack = vec![source];
        while let Some(at) = stack.pop() {
            for (dx, dy) in NEIGHBORS {
                let over = at.offset(dx, dy);
                let landing = at.offset(2 * dx, 2 * dy);
                if over != source && occupied.contains(&over) && free(landing) && visited.insert(landing) {
                    found.insert(landing);
                    stack.push(landing);
                }
            }
        }

        let mut targets: Vec<Coord> = found.into_iter().collect();
        targets.sort_unstable();
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(i32, i32)]) -> Vec<Coord> {
        pairs.iter().map(|&p| Coord::from(p)).collect()
    }

    #[test]
    fn test_cell_counts() {
        assert_eq!(HexBoard::new(4).cells().count(), 121);
        assert_eq!(HexBoard::new(1).cells().count(), 13);
        assert_eq!(HexBoard::new(2).cells().count(), 37);
    }

    #[test]
    fn test_homes() {
        let board = HexBoard::new(4);
        let home0 = board.home(PlayerId::new(0));
        let home1 = board.home(PlayerId::new(1));

        assert_eq!(home0.len(), 10);
        assert_eq!(home1.len(), 10);
        assert_eq!(home0[0], Coord::new(4, 4));
        assert_eq!(home0[9], Coord::new(7, 4));
        assert_eq!(home1[0], Coord::new(9, 12));
        assert_eq!(home1[9], Coord::new(12, 12));
        assert_eq!(board.pieces_per_player(), 10);
    }

    #[test]
    fn test_board_edges() {
        let board = HexBoard::new(4);
        assert!(board.contains(Coord::new(4, 4)));
        assert!(board.contains(Coord::new(0, 12)));
        assert!(board.contains(Coord::new(16, 4)));
        assert!(!board.contains(Coord::new(3, 3)));
        assert!(!board.contains(Coord::new(0, 0)));
        assert!(!board.contains(Coord::new(16, 16)));

        let far = Coord::new(i32::MAX, i32::MAX);
        assert!(!board.contains(far));
        assert!(!board.in_home(PlayerId::new(1), far));
        assert!(!board.contains(Coord::new(i32::MIN, i32::MAX)));
    }

    #[test]
    fn test_single_marble_steps() {
        let board = HexBoard::new(1);
        let occupied: FxHashSet<Coord> = [Coord::new(1, 1), Coord::new(3, 3)].into_iter().collect();
        assert_eq!(board.targets(&occupied, Coord::new(1, 1)), coords(&[(1, 2), (2, 1)]));
    }

    #[test]
    fn test_jumps_from_home() {
        let board = HexBoard::new(2);
        let occupied: FxHashSet<Coord> = board
            .home(PlayerId::new(0))
            .into_iter()
            .chain(board.home(PlayerId::new(1)))
            .collect();

        assert_eq!(board.targets(&occupied, Coord::new(2, 2)), coords(&[(2, 4), (4, 2)]));
        assert_eq!(board.targets(&occupied, Coord::new(2, 3)), coords(&[(2, 4), (3, 3)]));
    }

    #[test]
    fn test_jump_chain() {
        let board = HexBoard::new(4);
        let occupied: FxHashSet<Coord> = coords(&[(8, 8), (9, 8), (11, 8)]).into_iter().collect();

        assert_eq!(
            board.targets(&occupied, Coord::new(8, 8)),
            coords(&[(7, 8), (7, 9), (8, 7), (8, 9), (9, 7), (10, 8), (12, 8)])
        );
    }
}
