//! Move search for Bounce.
//!
//! A move is a walk of exactly `value` orthogonal steps. Landing on a piece
//! with the last step restarts the walk with that piece's value. The walk is
//! explored with an explicit stack of `(cell, steps left, visited cells)`
//! nodes; the visited set is a `u128` bit mask over the board, so a node is
//! a small `Copy` value and revisits are rejected in O(1).

use rustc_hash::FxHashSet;

use crate::core::coord::Coord;

const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Read-only view of a board for the search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Board<'a> {
    pub cells: &'a [u8],
    pub width: usize,
    pub height: usize,
}

impl Board<'_> {
    fn index(&self, c: Coord) -> usize {
        c.y as usize * self.width + c.x as usize
    }

    fn bit(&self, c: Coord) -> u128 {
        1u128 << self.index(c)
    }

    /// One step from `from` in direction `(dx, dy)`.
    ///
    /// Leaving the board sideways reflects the step off the wall; leaving it
    /// vertically is impossible.
    fn step(&self, from: Coord, (dx, dy): (i32, i32)) -> Option<Coord> {
        let (width, height) = (self.width as i32, self.height as i32);
        let y = from.y + dy;
        if !(0..height).contains(&y) {
            return None;
        }
        let mut x = from.x + dx;
        if !(0..width).contains(&x) {
            x = from.x - dx;
            if !(0..width).contains(&x) {
                return None;
            }
        }
        Some(Coord::new(x, y))
    }

    /// Every empty cell the piece on `source` can finish on, sorted by row
    /// then column.
    ///
    /// `goal_row` is the only goal row the walk may enter, and only with its
    /// final step.
    pub fn targets(&self, source: Coord, goal_row: i32) -> Vec<Coord> {
        let last_row = self.height as i32 - 1;
        let value = self.cells[self.index(source)];

        let mut found: FxHashSet<Coord> = FxHashSet::default();
        let mut seen: FxHashSet<(Coord, u8, u128)> = FxHashSet::default();
        let mut stack = vec![(source, value, self.bit(source))];

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            let (at, remaining, visited) = node;

            for direction in DIRECTIONS {
                let Some(next) = self.step(at, direction) else {
                    continue;
                };
                if visited & self.bit(next) != 0 {
                    continue;
                }
                if next.y == 0 || next.y == last_row {
                    if next.y == goal_row && remaining == 1 {
                        found.insert(next);
                    }
                    continue;
                }

                let occupant = self.cells[self.index(next)];
                if remaining == 1 {
                    if occupant == 0 {
                        found.insert(next);
                    } else {
                        // Bounce: carry on with the landed-on piece's value.
                        stack.push((next, occupant, visited | self.bit(next)));
                    }
                } else if occupant == 0 {
                    stack.push((next, remaining - 1, visited | self.bit(next)));
                }
            }
        }

        let mut targets: Vec<Coord> = found.into_iter().collect();
        targets.sort_unstable_by_key(|c| (c.y, c.x));
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u8]]) -> (Vec<u8>, usize, usize) {
        let cells = rows.iter().flat_map(|r| r.iter().copied()).collect();
        (cells, rows[0].len(), rows.len())
    }

    fn coords(pairs: &[(i32, i32)]) -> Vec<Coord> {
        pairs.iter().map(|&p| Coord::from(p)).collect()
    }

    #[test]
    fn test_exact_step_count() {
        let (cells, width, height) = board(&[&[0, 0, 0], &[1, 2, 3], &[0, 0, 0], &[0, 0, 0], &[1, 2, 3], &[0, 0, 0]]);
        let board = Board { cells: &cells, width, height };

        assert_eq!(board.targets(Coord::new(1, 1), 5), coords(&[(0, 2), (2, 2), (1, 3)]));
        assert_eq!(board.targets(Coord::new(2, 1), 5), coords(&[(0, 2), (1, 3)]));
    }

    #[test]
    fn test_goal_row_only_on_last_step() {
        let (cells, width, height) = board(&[&[0], &[1], &[0]]);
        let one = Board { cells: &cells, width, height };
        assert_eq!(one.targets(Coord::new(0, 1), 2), coords(&[(0, 2)]));

        let (cells, width, height) = board(&[&[0], &[2], &[0]]);
        let two = Board { cells: &cells, width, height };
        assert!(two.targets(Coord::new(0, 1), 2).is_empty());
    }

    #[test]
    fn test_wall_reflection_stays_on_board() {
        let (cells, width, height) = board(&[&[0, 0], &[2, 0], &[0, 0], &[0, 0], &[0, 0]]);
        let board = Board { cells: &cells, width, height };

        assert_eq!(board.targets(Coord::new(0, 1), 4), coords(&[(1, 2), (0, 3)]));
    }

    #[test]
    fn test_bounce_continues_with_landed_value() {
        // The 1 lands on the 1 above it and continues one more step.
        let (cells, width, height) = board(&[&[0, 0, 0], &[0, 1, 0], &[0, 1, 0], &[0, 0, 0], &[0, 0, 0]]);
        let board = Board { cells: &cells, width, height };

        assert_eq!(
            board.targets(Coord::new(1, 1), 4),
            coords(&[(0, 1), (2, 1), (0, 2), (2, 2), (1, 3)])
        );
    }
}
