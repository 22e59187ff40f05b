//! Player identification and per-player values.
//!
//! ## PlayerId
//!
//! 0-based player index. Boards store occupants as small signed integers
//! where a negative value means "empty", so `PlayerId` converts to and from
//! those cell codes.
//!
//! ## PlayerMap
//!
//! One value per player, backed by a `SmallVec` so two-player maps never
//! allocate. Used for reward vectors and per-player piece lists.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player moving after this one in a round-robin of `player_count`.
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// The other player of a two-player game.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use board_sim::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Decode a cell or JSON player code; negative means "nobody".
    ///
    /// Returns `Err(())` when the code is out of range for `player_count`.
    pub fn from_code(code: i64, player_count: usize) -> Result<Option<Self>, ()> {
        match code {
            c if c < 0 => {
                if c == -1 {
                    Ok(None)
                } else {
                    Err(())
                }
            }
            c if (c as usize) < player_count => Ok(Some(Self(c as u8))),
            _ => Err(()),
        }
    }

    /// Encode an optional player as a code, `-1` meaning "nobody".
    #[must_use]
    pub fn to_code(player: Option<Self>) -> i64 {
        player.map_or(-1, |p| i64::from(p.0))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player values with O(1) access.
///
/// ```
/// use board_sim::core::{PlayerId, PlayerMap};
///
/// let mut reward: PlayerMap<i32> = PlayerMap::with_value(2, 0);
/// reward[PlayerId::new(1)] = 1;
/// assert_eq!(reward.as_slice(), &[0, 1]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: SmallVec<[T; 2]>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build from one value per player, in player order.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self {
            data: SmallVec::from_vec(values),
        }
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Values in player order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Apply `f` to every entry.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> PlayerMap<U> {
        PlayerMap {
            data: self.data.iter().map(f).collect(),
        }
    }
}

impl PlayerMap<i32> {
    /// Win/loss reward: +1 for `winner`, -1 for everyone else.
    #[must_use]
    pub fn win_for(player_count: usize, winner: PlayerId) -> Self {
        Self::new(player_count, |p| if p == winner { 1 } else { -1 })
    }

    /// Sum of all entries.
    #[must_use]
    pub fn total(&self) -> i32 {
        self.data.iter().sum()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
