//! Chinese Checkers game implementation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::{json, Value};
use smallvec::SmallVec;

use super::board::HexBoard;
use crate::codec;
use crate::core::coord::Coord;
use crate::core::error::{GameError, Result};
use crate::core::player::{PlayerId, PlayerMap};
use crate::rules::{GameAction, GameConfig, GameState};

const NUM_PLAYERS: usize = 2;
const MAX_SIZE: usize = 6;

/// One player's marbles, sorted by `(x, y)`.
type Pieces = SmallVec<[Coord; 10]>;

/// Chinese Checkers parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChineseCheckersConfig {
    board: HexBoard,
}

#[derive(Deserialize)]
struct ConfigRepr {
    size: usize,
}

impl Default for ChineseCheckersConfig {
    /// The standard 121-hole board with 10 marbles per player.
    fn default() -> Self {
        Self {
            board: HexBoard::new(4),
        }
    }
}

impl ChineseCheckersConfig {
    /// A board whose home triangles have side `size` (1-6).
    pub fn new(size: usize) -> Result<Self> {
        if !(1..=MAX_SIZE).contains(&size) {
            return Err(GameError::validation(format!(
                "board size must be 1-{MAX_SIZE}, got {size}"
            )));
        }
        Ok(Self {
            board: HexBoard::new(size as i32),
        })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.board.size() as usize
    }

    #[must_use]
    pub fn board(&self) -> &HexBoard {
        &self.board
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "size": self.size() })
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let repr: ConfigRepr = codec::decode(value, "chinese checkers config")?;
        Self::new(repr.size)
    }

    /// Whether every marble in `pieces` sits in `player`'s target triangle.
    fn has_arrived(&self, player: PlayerId, pieces: &[Coord]) -> bool {
        let target = player.opponent();
        pieces.iter().all(|&c| self.board.in_home(target, c))
    }
}

impl GameConfig for ChineseCheckersConfig {
    type State = ChineseCheckersState;

    fn num_players(&self) -> usize {
        NUM_PLAYERS
    }

    fn sample_initial_state(self: &Arc<Self>) -> ChineseCheckersState {
        let pieces = PlayerMap::new(NUM_PLAYERS, |p| Pieces::from_vec(self.board.home(p)));
        ChineseCheckersState::new(Arc::clone(self), pieces, PlayerId::new(0), None)
    }
}

/// Chinese Checkers position.
#[derive(Clone)]
pub struct ChineseCheckersState {
    config: Arc<ChineseCheckersConfig>,
    pieces: PlayerMap<Pieces>,
    player: PlayerId,
    winner: Option<PlayerId>,
    reward: PlayerMap<i32>,
    /// `(piece index, destination)` pairs, filled on first access.
    moves: OnceLock<Vec<(usize, Coord)>>,
}

#[derive(Deserialize)]
struct StateRepr {
    pieces: Vec<Vec<Coord>>,
    player: i64,
    winner: i64,
}

impl ChineseCheckersState {
    fn new(
        config: Arc<ChineseCheckersConfig>,
        pieces: PlayerMap<Pieces>,
        player: PlayerId,
        winner: Option<PlayerId>,
    ) -> Self {
        let reward = match winner {
            Some(w) => PlayerMap::win_for(NUM_PLAYERS, w),
            None => PlayerMap::with_value(NUM_PLAYERS, 0),
        };
        Self {
            config,
            pieces,
            player,
            winner,
            reward,
            moves: OnceLock::new(),
        }
    }

    /// `player`'s marbles, sorted by `(x, y)`.
    #[must_use]
    pub fn pieces(&self, player: PlayerId) -> &[Coord] {
        &self.pieces[player]
    }

    /// Who owns the marble on `c`, if any.
    #[must_use]
    pub fn owner(&self, c: Coord) -> Option<PlayerId> {
        self.pieces
            .iter()
            .find(|(_, pieces)| pieces.binary_search(&c).is_ok())
            .map(|(p, _)| p)
    }

    /// All actions moving the mover's `index`-th marble.
    pub fn actions_for(&self, index: usize) -> Result<Vec<ChineseCheckersAction<'_>>> {
        if self.has_ended() {
            return Err(GameError::invalid_action("game has ended"));
        }
        let count = self.pieces[self.player].len();
        if index >= count {
            return Err(GameError::invalid_action(format!(
                "piece index {index} is out of range 0..{count}"
            )));
        }
        Ok(self
            .moves()
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|&(index, destination)| ChineseCheckersAction {
                state: self,
                index,
                destination,
            })
            .collect())
    }

    /// All actions moving the mover's marble on `source`.
    pub fn actions_at(&self, source: Coord) -> Result<Vec<ChineseCheckersAction<'_>>> {
        match self.pieces[self.player].binary_search(&source) {
            Ok(index) => self.actions_for(index),
            Err(_) if self.owner(source).is_some() => Err(GameError::invalid_action(format!(
                "marble at {} does not belong to {}",
                source, self.player
            ))),
            Err(_) => Err(GameError::invalid_action(format!("no marble at {source}"))),
        }
    }

    /// The action moving the mover's `index`-th marble to `destination`.
    pub fn action_at(&self, index: usize, destination: Coord) -> Result<ChineseCheckersAction<'_>> {
        self.actions_for(index)?
            .into_iter()
            .find(|action| action.destination == destination)
            .ok_or_else(|| {
                GameError::invalid_action(format!("{destination} is not reachable by piece {index}"))
            })
    }

    fn moves(&self) -> &[(usize, Coord)] {
        self.moves.get_or_init(|| {
            if self.winner.is_some() {
                return Vec::new();
            }
            let occupied: FxHashSet<Coord> = self
                .pieces
                .iter()
                .flat_map(|(_, pieces)| pieces.iter().copied())
                .collect();
            let board = self.config.board();

            let mut moves = Vec::new();
            for (index, &source) in self.pieces[self.player].iter().enumerate() {
                moves.extend(board.targets(&occupied, source).into_iter().map(|t| (index, t)));
            }
            trace!("chinese checkers: {} moves for {}", moves.len(), self.player);
            moves
        })
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let pieces: Vec<Vec<[i32; 2]>> = self
            .pieces
            .iter()
            .map(|(_, pieces)| pieces.iter().map(|&c| c.into()).collect())
            .collect();
        json!({
            "pieces": pieces,
            "player": self.player.0,
            "winner": PlayerId::to_code(self.winner),
        })
    }

    /// Decode a position.
    ///
    /// Piece lists must already be sorted; their order defines action
    /// indices.
    pub fn from_json(config: &Arc<ChineseCheckersConfig>, value: &Value) -> Result<Self> {
        let repr: StateRepr = codec::decode(value, "chinese checkers state")?;
        let board = config.board();

        if repr.pieces.len() != NUM_PLAYERS {
            return Err(GameError::validation(format!(
                "expected {NUM_PLAYERS} piece lists, got {}",
                repr.pieces.len()
            )));
        }
        let expected = board.pieces_per_player();
        let mut seen: FxHashSet<Coord> = FxHashSet::default();
        for (p, pieces) in repr.pieces.iter().enumerate() {
            if pieces.len() != expected {
                return Err(GameError::validation(format!(
                    "player {p} has {} marbles, expected {expected}",
                    pieces.len()
                )));
            }
            if let Some(&c) = pieces.iter().find(|&&c| !board.contains(c)) {
                return Err(GameError::validation(format!("marble at {c} is off the board")));
            }
            if let Some(&c) = pieces.iter().find(|&&c| !seen.insert(c)) {
                return Err(GameError::validation(format!("two marbles at {c}")));
            }
            if pieces.windows(2).any(|w| w[0] > w[1]) {
                return Err(GameError::validation(format!("player {p}'s marbles are not sorted")));
            }
        }

        let player = PlayerId::from_code(repr.player, NUM_PLAYERS)
            .ok()
            .flatten()
            .ok_or_else(|| GameError::validation(format!("player {} is out of range", repr.player)))?;
        let winner = PlayerId::from_code(repr.winner, NUM_PLAYERS)
            .map_err(|()| GameError::validation(format!("winner {} is out of range", repr.winner)))?;

        let pieces = PlayerMap::from_vec(repr.pieces.into_iter().map(Pieces::from_vec).collect());
        let arrived: Vec<PlayerId> = PlayerId::all(NUM_PLAYERS)
            .filter(|&p| config.has_arrived(p, &pieces[p]))
            .collect();
        match (winner, arrived.as_slice()) {
            (None, []) => {}
            (Some(w), [a]) if w == *a => {
                if player != w {
                    return Err(GameError::validation("mover must stay on the winner"));
                }
            }
            _ => {
                return Err(GameError::validation(format!(
                    "winner {} disagrees with the board",
                    repr.winner
                )))
            }
        }

        Ok(Self::new(Arc::clone(config), pieces, player, winner))
    }
}

impl PartialEq for ChineseCheckersState {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.pieces == other.pieces
            && self.player == other.player
            && self.winner == other.winner
    }
}

impl Eq for ChineseCheckersState {}

impl Hash for ChineseCheckersState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.config.hash(state);
        self.pieces.hash(state);
        self.player.hash(state);
        self.winner.hash(state);
    }
}

impl fmt::Debug for ChineseCheckersState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChineseCheckersState")
            .field("pieces", &self.pieces.as_slice())
            .field("player", &self.player)
            .field("winner", &self.winner)
            .finish()
    }
}

impl GameState for ChineseCheckersState {
    type Config = ChineseCheckersConfig;
    type Action<'a> = ChineseCheckersAction<'a>;

    fn config(&self) -> &Arc<ChineseCheckersConfig> {
        &self.config
    }

    fn has_ended(&self) -> bool {
        self.moves().is_empty()
    }

    fn player(&self) -> PlayerId {
        self.player
    }

    fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    fn reward(&self) -> &PlayerMap<i32> {
        &self.reward
    }

    fn actions(&self) -> Vec<ChineseCheckersAction<'_>> {
        self.moves()
            .iter()
            .map(|&(index, destination)| ChineseCheckersAction {
                state: self,
                index,
                destination,
            })
            .collect()
    }
}

/// Move the mover's `index`-th marble to `destination`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChineseCheckersAction<'a> {
    state: &'a ChineseCheckersState,
    index: usize,
    destination: Coord,
}

#[derive(Deserialize)]
struct ActionRepr {
    index: i64,
    x: i32,
    y: i32,
}

impl<'a> ChineseCheckersAction<'a> {
    /// Index into the mover's piece list.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Where the marble starts.
    #[must_use]
    pub fn source(&self) -> Coord {
        self.state.pieces[self.state.player][self.index]
    }

    #[must_use]
    pub fn destination(&self) -> Coord {
        self.destination
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "index": self.index,
            "x": self.destination.x,
            "y": self.destination.y,
        })
    }

    pub fn from_json(state: &'a ChineseCheckersState, value: &Value) -> Result<Self> {
        let repr: ActionRepr = codec::decode(value, "chinese checkers action")?;
        let index = usize::try_from(repr.index)
            .map_err(|_| GameError::invalid_action(format!("piece index {} is out of range", repr.index)))?;
        state.action_at(index, Coord::new(repr.x, repr.y))
    }
}

impl fmt::Debug for ChineseCheckersAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChineseCheckersAction")
            .field("player", &self.state.player)
            .field("index", &self.index)
            .field("source", &self.source())
            .field("destination", &self.destination)
            .finish()
    }
}

impl<'a> GameAction<'a> for ChineseCheckersAction<'a> {
    type State = ChineseCheckersState;

    fn state(&self) -> &'a ChineseCheckersState {
        self.state
    }

    fn sample_next_state(&self) -> ChineseCheckersState {
        let state = self.state;
        let config = &state.config;
        let mover = state.player;

        let mut pieces = state.pieces.clone();
        let own = pieces.get_mut(mover);
        own[self.index] = self.destination;
        own.sort_unstable();

        if config.has_arrived(mover, &pieces[mover]) {
            debug!("chinese checkers: {} filled the opposite triangle", mover);
            return ChineseCheckersState::new(Arc::clone(config), pieces, mover, Some(mover));
        }

        let next = ChineseCheckersState::new(Arc::clone(config), pieces, mover.opponent(), None);
        if next.has_ended() {
            debug!("chinese checkers: {} is stuck, draw", next.player);
        }
        next
    }
}
