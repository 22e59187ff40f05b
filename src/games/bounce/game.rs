//! Bounce game implementation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{json, Value};
use smallvec::SmallVec;

use super::search::Board;
use crate::codec;
use crate::core::coord::Coord;
use crate::core::error::{GameError, Result};
use crate::core::player::{PlayerId, PlayerMap};
use crate::rules::{GameAction, GameConfig, GameState};

const NUM_PLAYERS: usize = 2;
const MAX_VALUE: u8 = 9;
/// Visited cells are tracked in a `u128`.
const MAX_CELLS: usize = 128;

type Cells = SmallVec<[u8; 64]>;

/// Bounce parameters: the board size and the starting layout.
///
/// Rows are stored bottom-to-top. Row 0 and the last row are the goal rows
/// and start empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BounceConfig {
    height: usize,
    width: usize,
    cells: Cells,
}

#[derive(Deserialize)]
struct ConfigRepr {
    grid: Vec<Vec<u8>>,
}

impl Default for BounceConfig {
    /// The 9x6 board with `1 2 3 3 2 1` on each side.
    fn default() -> Self {
        let line: [u8; 6] = [1, 2, 3, 3, 2, 1];
        let mut cells: Cells = SmallVec::from_elem(0, 9 * 6);
        cells[6..12].copy_from_slice(&line);
        cells[42..48].copy_from_slice(&line);
        Self {
            height: 9,
            width: 6,
            cells,
        }
    }
}

impl BounceConfig {
    /// Build from rows listed bottom-to-top, goal rows included.
    pub fn new(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        if height < 3 {
            return Err(GameError::validation(format!(
                "board needs at least 3 rows, got {height}"
            )));
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(GameError::validation("board needs at least one column"));
        }
        codec::check_grid_shape(rows, height, width)?;
        if height * width > MAX_CELLS {
            return Err(GameError::validation(format!(
                "board has {} cells, at most {MAX_CELLS} supported",
                height * width
            )));
        }

        let cells = parse_cells(rows)?;
        let config = Self { height, width, cells };
        for y in [0, height - 1] {
            if config.row(&config.cells, y).iter().any(|&v| v != 0) {
                return Err(GameError::validation(format!("goal row {y} must start empty")));
            }
        }
        Ok(config)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Starting rows, bottom-to-top.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.width).map(<[u8]>::to_vec).collect()
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "grid": self.grid() })
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let repr: ConfigRepr = codec::decode(value, "bounce config")?;
        Self::new(&repr.grid)
    }

    fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height
    }

    fn index(&self, c: Coord) -> usize {
        c.y as usize * self.width + c.x as usize
    }

    fn row<'a>(&self, cells: &'a [u8], y: usize) -> &'a [u8] {
        &cells[y * self.width..(y + 1) * self.width]
    }

    /// The goal row `player` races towards.
    fn goal_row(&self, player: PlayerId) -> usize {
        if player.0 == 0 {
            self.height - 1
        } else {
            0
        }
    }

    /// A piece sitting on a goal row means its racer won.
    fn winner_of(&self, cells: &[u8]) -> Option<PlayerId> {
        PlayerId::all(NUM_PLAYERS).find(|&p| self.row(cells, self.goal_row(p)).iter().any(|&v| v != 0))
    }
}

fn parse_cells(rows: &[Vec<u8>]) -> Result<Cells> {
    let mut cells = Cells::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            if value > MAX_VALUE {
                return Err(GameError::validation(format!(
                    "cell ({x}, {y}) holds {value}, expected 0-{MAX_VALUE}"
                )));
            }
            cells.push(value);
        }
    }
    Ok(cells)
}

fn value_counts(cells: &[u8]) -> [usize; MAX_VALUE as usize + 1] {
    let mut counts = [0; MAX_VALUE as usize + 1];
    for &v in cells {
        counts[v as usize] += 1;
    }
    counts
}

impl GameConfig for BounceConfig {
    type State = BounceState;

    fn num_players(&self) -> usize {
        NUM_PLAYERS
    }

    fn sample_initial_state(self: &Arc<Self>) -> BounceState {
        BounceState::new(Arc::clone(self), self.cells.clone(), PlayerId::new(0))
    }
}

/// Bounce position.
#[derive(Clone)]
pub struct BounceState {
    config: Arc<BounceConfig>,
    cells: Cells,
    player: PlayerId,
    winner: Option<PlayerId>,
    reward: PlayerMap<i32>,
    /// `(source, target)` pairs, filled on first access.
    moves: OnceLock<Vec<(Coord, Coord)>>,
}

#[derive(Deserialize)]
struct StateRepr {
    grid: Vec<Vec<u8>>,
    player: i64,
    #[serde(default)]
    winner: Option<i64>,
}

impl BounceState {
    fn new(config: Arc<BounceConfig>, cells: Cells, player: PlayerId) -> Self {
        let winner = config.winner_of(&cells);
        let reward = match winner {
            Some(w) => PlayerMap::win_for(NUM_PLAYERS, w),
            None => PlayerMap::with_value(NUM_PLAYERS, 0),
        };
        Self {
            config,
            cells,
            player,
            winner,
            reward,
            moves: OnceLock::new(),
        }
    }

    /// Piece value at `c`, 0 when empty or off the board.
    #[must_use]
    pub fn cell(&self, c: Coord) -> u8 {
        if self.config.contains(c) {
            self.cells[self.config.index(c)]
        } else {
            0
        }
    }

    /// Rows bottom-to-top.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.config.width).map(<[u8]>::to_vec).collect()
    }

    /// The row whose pieces the mover controls.
    #[must_use]
    pub fn active_row(&self) -> Option<usize> {
        let occupied = |y: &usize| self.config.row(&self.cells, *y).iter().any(|&v| v != 0);
        let mut rows = 1..self.config.height - 1;
        if self.player.0 == 0 {
            rows.find(occupied)
        } else {
            rows.rev().find(occupied)
        }
    }

    /// All actions moving the piece on `source`.
    ///
    /// A controlled piece with nowhere to go yields an empty list.
    pub fn actions_at(&self, source: Coord) -> Result<Vec<BounceAction<'_>>> {
        if self.has_ended() {
            return Err(GameError::invalid_action("game has ended"));
        }
        if !self.config.contains(source) {
            return Err(GameError::invalid_action(format!("{source} is off the board")));
        }
        if self.cell(source) == 0 {
            return Err(GameError::invalid_action(format!("no piece at {source}")));
        }
        if self.active_row() != Some(source.y as usize) {
            return Err(GameError::invalid_action(format!(
                "piece at {} is not controlled by {}",
                source, self.player
            )));
        }
        Ok(self
            .moves()
            .iter()
            .filter(|(from, _)| *from == source)
            .map(|&(source, target)| BounceAction { state: self, source, target })
            .collect())
    }

    /// The action moving the piece on `source` to `target`.
    pub fn action_at(&self, source: Coord, target: Coord) -> Result<BounceAction<'_>> {
        self.actions_at(source)?
            .into_iter()
            .find(|action| action.target == target)
            .ok_or_else(|| GameError::invalid_action(format!("{target} is not reachable from {source}")))
    }

    fn moves(&self) -> &[(Coord, Coord)] {
        self.moves.get_or_init(|| {
            if self.winner.is_some() {
                return Vec::new();
            }
            let Some(y) = self.active_row() else {
                return Vec::new();
            };
            let board = Board {
                cells: &self.cells,
                width: self.config.width,
                height: self.config.height,
            };
            let goal_row = self.config.goal_row(self.player) as i32;

            let mut moves = Vec::new();
            for x in 0..self.config.width {
                let source = Coord::new(x as i32, y as i32);
                if self.cell(source) != 0 {
                    moves.extend(board.targets(source, goal_row).into_iter().map(|target| (source, target)));
                }
            }
            trace!("bounce: {} moves from row {}", moves.len(), y);
            moves
        })
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "grid": self.grid(),
            "player": self.player.0,
        })
    }

    /// Decode a position, checking it holds the configured pieces.
    ///
    /// An optional `winner` field is accepted and must agree with the board.
    pub fn from_json(config: &Arc<BounceConfig>, value: &Value) -> Result<Self> {
        let repr: StateRepr = codec::decode(value, "bounce state")?;
        codec::check_grid_shape(&repr.grid, config.height, config.width)?;
        let cells = parse_cells(&repr.grid)?;

        let in_goal = [0, config.height - 1]
            .iter()
            .map(|&y| config.row(&cells, y).iter().filter(|&&v| v != 0).count())
            .sum::<usize>();
        if in_goal > 1 {
            return Err(GameError::validation(format!("{in_goal} pieces on goal rows, at most 1 allowed")));
        }
        if value_counts(&cells)[1..] != value_counts(&config.cells)[1..] {
            return Err(GameError::validation("pieces differ from the configured layout"));
        }

        let player = PlayerId::from_code(repr.player, NUM_PLAYERS)
            .ok()
            .flatten()
            .ok_or_else(|| GameError::validation(format!("player {} is out of range", repr.player)))?;

        let state = Self::new(Arc::clone(config), cells, player);
        if let Some(w) = state.winner {
            if player != w.opponent() {
                return Err(GameError::validation(format!("{w} has won, so {} must be to move", w.opponent())));
            }
        }
        if let Some(code) = repr.winner {
            let declared = PlayerId::from_code(code, NUM_PLAYERS)
                .map_err(|()| GameError::validation(format!("winner {code} is out of range")))?;
            if declared != state.winner {
                return Err(GameError::validation("winner disagrees with the board"));
            }
        }
        Ok(state)
    }
}

impl PartialEq for BounceState {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.cells == other.cells && self.player == other.player
    }
}

impl Eq for BounceState {}

impl Hash for BounceState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.config.hash(state);
        self.cells.hash(state);
        self.player.hash(state);
    }
}

impl fmt::Debug for BounceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BounceState")
            .field("grid", &self.grid())
            .field("player", &self.player)
            .field("winner", &self.winner)
            .finish()
    }
}

impl fmt::Display for BounceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.config.width).rev() {
            let row: Vec<String> = row
                .iter()
                .map(|&v| if v == 0 { ".".to_string() } else { v.to_string() })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

impl GameState for BounceState {
    type Config = BounceConfig;
    type Action<'a> = BounceAction<'a>;

    fn config(&self) -> &Arc<BounceConfig> {
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

    fn actions(&self) -> Vec<BounceAction<'_>> {
        self.moves()
            .iter()
            .map(|&(source, target)| BounceAction { state: self, source, target })
            .collect()
    }
}

/// Move the piece on `source` to `target`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BounceAction<'a> {
    state: &'a BounceState,
    source: Coord,
    target: Coord,
}

#[derive(Deserialize)]
struct ActionRepr {
    source: Coord,
    target: Coord,
}

impl<'a> BounceAction<'a> {
    #[must_use]
    pub fn source(&self) -> Coord {
        self.source
    }

    #[must_use]
    pub fn target(&self) -> Coord {
        self.target
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "source": [self.source.x, self.source.y],
            "target": [self.target.x, self.target.y],
        })
    }

    pub fn from_json(state: &'a BounceState, value: &Value) -> Result<Self> {
        let repr: ActionRepr = codec::decode(value, "bounce action")?;
        state.action_at(repr.source, repr.target)
    }
}

impl fmt::Debug for BounceAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BounceAction")
            .field("player", &self.state.player)
            .field("source", &self.source)
            .field("target", &self.target)
            .finish()
    }
}

impl<'a> GameAction<'a> for BounceAction<'a> {
    type State = BounceState;

    fn state(&self) -> &'a BounceState {
        self.state
    }

    fn sample_next_state(&self) -> BounceState {
        let state = self.state;
        let config = &state.config;

        let mut cells = state.cells.clone();
        let (from, to) = (config.index(self.source), config.index(self.target));
        cells[to] = cells[from];
        cells[from] = 0;

        let next = BounceState::new(Arc::clone(config), cells, state.player.opponent());
        if let Some(w) = next.winner {
            debug!("bounce: {} reached the goal at {}", w, self.target);
        } else if next.has_ended() {
            debug!("bounce: {} has no moves, draw", next.player);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Arc<BounceConfig> {
        Arc::new(
            BounceConfig::new(&[
                vec![0, 0, 0],
                vec![1, 2, 3],
                vec![0, 0, 0],
                vec![0, 0, 0],
                vec![1, 2, 3],
                vec![0, 0, 0],
            ])
            .unwrap(),
        )
    }

    fn pairs(state: &BounceState) -> Vec<((i32, i32), (i32, i32))> {
        state
            .actions()
            .iter()
            .map(|a| ((a.source().x, a.source().y), (a.target().x, a.target().y)))
            .collect()
    }

    #[test]
    fn test_default_layout() {
        let config = Arc::new(BounceConfig::default());
        assert_eq!(config.height(), 9);
        assert_eq!(config.width(), 6);
        assert_eq!(config.grid()[1], vec![1, 2, 3, 3, 2, 1]);
        assert_eq!(config.grid()[7], vec![1, 2, 3, 3, 2, 1]);

        let state = config.sample_initial_state();
        assert_eq!(state.active_row(), Some(1));
        assert_eq!(state.actions().len(), 22);
        assert!(state.actions().iter().all(|a| a.source().y == 1));
    }

    #[test]
    fn test_initial_actions_in_order() {
        let state = small().sample_initial_state();
        assert_eq!(
            pairs(&state),
            vec![
                ((0, 1), (0, 2)),
                ((0, 1), (2, 2)),
                ((0, 1), (1, 3)),
                ((1, 1), (0, 2)),
                ((1, 1), (2, 2)),
                ((1, 1), (1, 3)),
                ((2, 1), (0, 2)),
                ((2, 1), (1, 3)),
            ]
        );
    }

    #[test]
    fn test_player_one_moves_from_highest_row() {
        let state = small().sample_initial_state();
        let next = state.action_at(Coord::new(1, 1), Coord::new(1, 3)).unwrap().sample_next_state();

        assert_eq!(next.player(), PlayerId::new(1));
        assert_eq!(next.active_row(), Some(4));
        assert_eq!(
            pairs(&next),
            vec![((0, 4), (0, 3)), ((2, 4), (0, 2)), ((2, 4), (1, 2))]
        );
    }

    #[test]
    fn test_reaching_goal_wins() {
        let config = Arc::new(BounceConfig::new(&[vec![0], vec![1], vec![0]]).unwrap());
        let state = config.sample_initial_state();
        assert_eq!(pairs(&state), vec![((0, 1), (0, 2))]);

        let next = state.actions()[0].sample_next_state();
        assert!(next.has_ended());
        assert_eq!(next.winner(), Some(PlayerId::new(0)));
        assert_eq!(next.player(), PlayerId::new(1));
        assert_eq!(next.reward().as_slice(), &[1, -1]);
        assert!(next.actions().is_empty());
    }

    #[test]
    fn test_stuck_mover_draws() {
        let config = Arc::new(BounceConfig::new(&[vec![0], vec![2], vec![0]]).unwrap());
        let state = config.sample_initial_state();

        assert!(state.has_ended());
        assert_eq!(state.winner(), None);
        assert_eq!(state.reward().as_slice(), &[0, 0]);
        assert_eq!(state.result(), Some(crate::rules::GameResult::Draw));
    }

    #[test]
    fn test_lookup_errors() {
        let state = small().sample_initial_state();

        // Empty cell, foreign piece, off the board.
        assert!(state.actions_at(Coord::new(0, 2)).unwrap_err().is_invalid_action());
        assert!(state.actions_at(Coord::new(0, 4)).unwrap_err().is_invalid_action());
        assert!(state.actions_at(Coord::new(3, 1)).unwrap_err().is_invalid_action());
        assert!(state.actions_at(Coord::new(-1, 1)).unwrap_err().is_invalid_action());

        // (2, 2) is not reachable by the 3.
        assert!(state.action_at(Coord::new(2, 1), Coord::new(2, 2)).unwrap_err().is_invalid_action());
        assert_eq!(state.actions_at(Coord::new(2, 1)).unwrap().len(), 2);
    }

    #[test]
    fn test_config_validation() {
        assert!(BounceConfig::new(&[vec![0], vec![0]]).unwrap_err().is_validation());
        assert!(BounceConfig::new(&[vec![], vec![], vec![]]).is_err());
        assert!(BounceConfig::new(&[vec![1], vec![0], vec![0]]).is_err());
        assert!(BounceConfig::new(&[vec![0], vec![10], vec![0]]).is_err());
        assert!(BounceConfig::new(&[vec![0, 0], vec![1], vec![0, 0]]).is_err());
        assert!(BounceConfig::new(&vec![vec![0; 43]; 3]).is_err());
        assert!(BounceConfig::new(&vec![vec![0; 42]; 3]).is_ok());
    }

    #[test]
    fn test_config_json() {
        let config = BounceConfig::default();
        let json = config.to_json();
        assert_eq!(json["grid"].as_array().map(Vec::len), Some(9));
        assert_eq!(BounceConfig::from_json(&json).unwrap(), config);
        assert!(BounceConfig::from_json(&json!({"grid": [[0], [-1], [0]]})).unwrap_err().is_validation());
    }

    #[test]
    fn test_state_json() {
        let config = small();
        let state = config
            .sample_initial_state()
            .action_at(Coord::new(1, 1), Coord::new(1, 3))
            .unwrap()
            .sample_next_state();

        let json = state.to_json();
        assert_eq!(json["player"], json!(1));
        assert_eq!(json["grid"][3], json!([0, 2, 0]));
        assert_eq!(BounceState::from_json(&config, &json).unwrap(), state);
    }

    #[test]
    fn test_state_decode_validation() {
        let config = small();
        let decode = |grid: Value, player: i64| BounceState::from_json(&config, &json!({"grid": grid, "player": player}));

        // Piece values differ from the layout.
        assert!(decode(json!([[0, 0, 0], [1, 2, 2], [0, 0, 0], [0, 0, 0], [1, 2, 3], [0, 0, 0]]), 0)
            .unwrap_err()
            .is_validation());
        // Two pieces on goal rows.
        assert!(decode(json!([[0, 1, 0], [0, 2, 3], [0, 0, 0], [0, 0, 0], [0, 2, 3], [1, 0, 0]]), 0).is_err());
        // Player out of range.
        assert!(decode(json!([[0, 0, 0], [1, 2, 3], [0, 0, 0], [0, 0, 0], [1, 2, 3], [0, 0, 0]]), 2).is_err());

        // Player 0 has won, so player 1 is to move.
        let won = json!([[0, 0, 0], [0, 2, 3], [0, 0, 0], [0, 0, 0], [1, 2, 3], [1, 0, 0]]);
        assert!(decode(won.clone(), 0).is_err());
        let state = decode(won.clone(), 1).unwrap();
        assert_eq!(state.winner(), Some(PlayerId::new(0)));

        let declared = |winner: i64| {
            BounceState::from_json(&config, &json!({"grid": won, "player": 1, "winner": winner}))
        };
        assert!(declared(0).is_ok());
        assert!(declared(-1).is_err());
        assert!(declared(1).is_err());
    }

    #[test]
    fn test_action_json() {
        let state = small().sample_initial_state();
        let action = state.action_at(Coord::new(0, 1), Coord::new(1, 3)).unwrap();

        let json = action.to_json();
        assert_eq!(json, json!({"source": [0, 1], "target": [1, 3]}));
        assert_eq!(BounceAction::from_json(&state, &json).unwrap(), action);
        assert!(BounceAction::from_json(&state, &json!({"source": [0, 1], "target": [1, 2]}))
            .unwrap_err()
            .is_invalid_action());
        assert!(BounceAction::from_json(&state, &json!({"source": [0, 1]})).unwrap_err().is_validation());
    }

    #[test]
    fn test_display() {
        let state = small().sample_initial_state();
        assert_eq!(state.to_string(), ". . .\n1 2 3\n. . .\n. . .\n1 2 3\n. . .\n");
    }
}
