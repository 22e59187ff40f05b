//! Connect game implementation.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{json, Value};
use smallvec::SmallVec;

use crate::codec;
use crate::core::error::{GameError, Result};
use crate::core::player::{PlayerId, PlayerMap};
use crate::rules::{GameAction, GameConfig, GameState};

const EMPTY: i8 = -1;
const MAX_PLAYERS: usize = 8;
const MAX_CELLS: usize = 4096;
const SYMBOLS: &[u8; MAX_PLAYERS] = b"OXABCDEF";

/// Horizontal, vertical and both diagonals.
const AXES: [(i64, i64); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Connect parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectConfig {
    height: usize,
    width: usize,
    count: usize,
    num_players: usize,
}

#[derive(Deserialize)]
struct ConfigRepr {
    height: usize,
    width: usize,
    count: usize,
    #[serde(default = "default_num_players")]
    num_players: usize,
}

fn default_num_players() -> usize {
    2
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            height: 6,
            width: 7,
            count: 4,
            num_players: 2,
        }
    }
}

impl ConnectConfig {
    /// A two-player board of `height` rows and `width` columns where lines of
    /// `count` win.
    pub fn new(height: usize, width: usize, count: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(GameError::validation(format!(
                "board must have at least one row and column, got {height}x{width}"
            )));
        }
        match height.checked_mul(width) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(GameError::validation(format!(
                    "a {height}x{width} board exceeds {MAX_CELLS} cells"
                )))
            }
        }
        if count == 0 {
            return Err(GameError::validation("line length must be at least 1"));
        }
        Ok(Self {
            height,
            width,
            count,
            num_players: 2,
        })
    }

    /// Set the number of players (2-8).
    pub fn with_num_players(mut self, num_players: usize) -> Result<Self> {
        if !(2..=MAX_PLAYERS).contains(&num_players) {
            return Err(GameError::validation(format!(
                "player count must be 2-{MAX_PLAYERS}, got {num_players}"
            )));
        }
        self.num_players = num_players;
        Ok(self)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Line length needed to win.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "height": self.height,
            "width": self.width,
            "count": self.count,
            "num_players": self.num_players,
        })
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let repr: ConfigRepr = codec::decode(value, "connect config")?;
        Self::new(repr.height, repr.width, repr.count)?.with_num_players(repr.num_players)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cells of the same occupant beyond `(x, y)` in direction `(dx, dy)`.
    fn extent(&self, grid: &[i8], x: usize, y: usize, (dx, dy): (i64, i64)) -> usize {
        let code = grid[self.index(x, y)];
        let (mut cx, mut cy) = (x as i64 + dx, y as i64 + dy);
        let mut run = 0;
        while self.contains(cx, cy) && grid[self.index(cx as usize, cy as usize)] == code {
            run += 1;
            cx += dx;
            cy += dy;
        }
        run
    }

    /// Longest line through the occupied cell `(x, y)`.
    fn line_through(&self, grid: &[i8], x: usize, y: usize) -> usize {
        AXES.iter()
            .map(|&(dx, dy)| 1 + self.extent(grid, x, y, (dx, dy)) + self.extent(grid, x, y, (-dx, -dy)))
            .max()
            .unwrap_or(1)
    }
}

impl GameConfig for ConnectConfig {
    type State = ConnectState;

    fn num_players(&self) -> usize {
        self.num_players
    }

    fn sample_initial_state(self: &Arc<Self>) -> ConnectState {
        ConnectState {
            config: Arc::clone(self),
            grid: SmallVec::from_elem(EMPTY, self.height * self.width),
            heights: SmallVec::from_elem(0, self.width),
            player: PlayerId::new(0),
            winner: None,
            ended: false,
            reward: PlayerMap::with_value(self.num_players, 0),
            columns: OnceLock::new(),
        }
    }
}

/// Connect position.
///
/// The grid is row-major with row 0 at the bottom; each cell holds a player
/// index or `-1`.
#[derive(Clone)]
pub struct ConnectState {
    config: Arc<ConnectConfig>,
    grid: SmallVec<[i8; 64]>,
    heights: SmallVec<[usize; 8]>,
    player: PlayerId,
    winner: Option<PlayerId>,
    ended: bool,
    reward: PlayerMap<i32>,
    /// Legal columns, filled on first access.
    columns: OnceLock<Vec<usize>>,
}

#[derive(Deserialize)]
struct StateRepr {
    grid: Vec<Vec<i64>>,
    player: i64,
    winner: i64,
}

impl ConnectState {
    /// Occupant of column `x`, row `y` (row 0 is the bottom).
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<PlayerId> {
        if x >= self.config.width || y >= self.config.height {
            return None;
        }
        let code = self.grid[self.config.index(x, y)];
        (code != EMPTY).then(|| PlayerId::new(code as u8))
    }

    /// Grid rows bottom-to-top, `-1` for empty cells.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<i64>> {
        self.grid
            .chunks(self.config.width)
            .map(|row| row.iter().map(|&c| i64::from(c)).collect())
            .collect()
    }

    /// The action dropping into `column`.
    pub fn action_at(&self, column: usize) -> Result<ConnectAction<'_>> {
        if self.ended {
            return Err(GameError::invalid_action("game has ended"));
        }
        if column >= self.config.width {
            return Err(GameError::invalid_action(format!(
                "column {} is out of range 0..{}",
                column, self.config.width
            )));
        }
        if self.heights[column] >= self.config.height {
            return Err(GameError::invalid_action(format!("column {column} is full")));
        }
        Ok(ConnectAction { state: self, column })
    }

    fn columns(&self) -> &[usize] {
        self.columns.get_or_init(|| {
            if self.ended {
                return Vec::new();
            }
            let columns: Vec<usize> = (0..self.config.width)
                .filter(|&x| self.heights[x] < self.config.height)
                .collect();
            trace!("connect: {} legal columns", columns.len());
            columns
        })
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "grid": self.grid(),
            "player": self.player.0,
            "winner": PlayerId::to_code(self.winner),
        })
    }

    /// Decode a position, checking it could arise from legal play.
    pub fn from_json(config: &Arc<ConnectConfig>, value: &Value) -> Result<Self> {
        let repr: StateRepr = codec::decode(value, "connect state")?;
        let (height, width, n) = (config.height, config.width, config.num_players);
        codec::check_grid_shape(&repr.grid, height, width)?;

        let mut grid: SmallVec<[i8; 64]> = SmallVec::with_capacity(height * width);
        let mut counts = vec![0usize; n];
        for (y, row) in repr.grid.iter().enumerate() {
            for (x, &code) in row.iter().enumerate() {
                let occupant = PlayerId::from_code(code, n).map_err(|()| {
                    GameError::validation(format!("cell ({x}, {y}) holds {code}"))
                })?;
                if let Some(p) = occupant {
                    counts[p.index()] += 1;
                }
                grid.push(PlayerId::to_code(occupant) as i8);
            }
        }

        let mut heights: SmallVec<[usize; 8]> = SmallVec::with_capacity(width);
        for x in 0..width {
            let filled = (0..height)
                .take_while(|&y| grid[config.index(x, y)] != EMPTY)
                .count();
            if let Some(y) = (filled..height).find(|&y| grid[config.index(x, y)] != EMPTY) {
                return Err(GameError::validation(format!("floating piece at ({x}, {y})")));
            }
            heights.push(filled);
        }

        let total: usize = counts.iter().sum();
        for (p, &count) in counts.iter().enumerate() {
            let expected = total / n + usize::from(p < total % n);
            if count != expected {
                return Err(GameError::validation(format!(
                    "player {p} has {count} pieces, expected {expected}"
                )));
            }
        }

        let player = PlayerId::from_code(repr.player, n)
            .ok()
            .flatten()
            .ok_or_else(|| GameError::validation(format!("player {} is out of range", repr.player)))?;
        let winner = PlayerId::from_code(repr.winner, n)
            .map_err(|()| GameError::validation(format!("winner {} is out of range", repr.winner)))?;

        let mut has_line = vec![false; n];
        for y in 0..height {
            for x in 0..width {
                let code = grid[config.index(x, y)];
                if code != EMPTY && config.line_through(&grid, x, y) >= config.count {
                    has_line[code as usize] = true;
                }
            }
        }

        match winner {
            Some(w) => {
                if total == 0 || w.index() != (total - 1) % n {
                    return Err(GameError::validation(format!("{w} did not make the last move")));
                }
                if player != w {
                    return Err(GameError::validation("mover must stay on the winner"));
                }
                if let Some(p) = (0..n).find(|&p| has_line[p] != (p == w.index())) {
                    return Err(GameError::validation(format!(
                        "winner {w} disagrees with the line held by player {p}"
                    )));
                }
            }
            None => {
                if let Some(p) = has_line.iter().position(|&line| line) {
                    return Err(GameError::validation(format!("player {p} has a line but no winner is set")));
                }
                if player.index() != total % n {
                    return Err(GameError::validation(format!(
                        "player {} cannot move after {} pieces",
                        player.0, total
                    )));
                }
            }
        }

        let ended = winner.is_some() || total == height * width;
        let reward = match winner {
            Some(w) => PlayerMap::win_for(n, w),
            None => PlayerMap::with_value(n, 0),
        };

        Ok(Self {
            config: Arc::clone(config),
            grid,
            heights,
            player,
            winner,
            ended,
            reward,
            columns: OnceLock::new(),
        })
    }
}

impl PartialEq for ConnectState {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.grid == other.grid
            && self.player == other.player
            && self.winner == other.winner
    }
}

impl Eq for ConnectState {}

impl Hash for ConnectState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.config.hash(state);
        self.grid.hash(state);
        self.player.hash(state);
        self.winner.hash(state);
    }
}

impl fmt::Debug for ConnectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectState")
            .field("grid", &self.grid())
            .field("player", &self.player)
            .field("winner", &self.winner)
            .finish()
    }
}

impl fmt::Display for ConnectState {
    /// Top row first, `.` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.config.height).rev() {
            let row: Vec<String> = (0..self.config.width)
                .map(|x| match self.cell(x, y) {
                    Some(p) => char::from(SYMBOLS[p.index()]).to_string(),
                    None => ".".to_string(),
                })
                .collect();
            writeln!(f, "{}", row.join(" "))?;
        }
        Ok(())
    }
}

impl GameState for ConnectState {
    type Config = ConnectConfig;
    type Action<'a> = ConnectAction<'a>;

    fn config(&self) -> &Arc<ConnectConfig> {
        &self.config
    }

    fn has_ended(&self) -> bool {
        self.ended
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

    fn actions(&self) -> Vec<ConnectAction<'_>> {
        self.columns()
            .iter()
            .map(|&column| ConnectAction { state: self, column })
            .collect()
    }
}

/// Drop a piece into a column.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectAction<'a> {
    state: &'a ConnectState,
    column: usize,
}

#[derive(Deserialize)]
struct ActionRepr {
    column: i64,
}

impl<'a> ConnectAction<'a> {
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "column": self.column })
    }

    /// Decode an action of `state`; legal-but-absent moves are `InvalidAction`.
    pub fn from_json(state: &'a ConnectState, value: &Value) -> Result<Self> {
        let repr: ActionRepr = codec::decode(value, "connect action")?;
        let column = usize::try_from(repr.column)
            .map_err(|_| GameError::invalid_action(format!("column {} is out of range", repr.column)))?;
        state.action_at(column)
    }
}

impl fmt::Debug for ConnectAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectAction")
            .field("player", &self.state.player)
            .field("column", &self.column)
            .finish()
    }
}

impl<'a> GameAction<'a> for ConnectAction<'a> {
    type State = ConnectState;

    fn state(&self) -> &'a ConnectState {
        self.state
    }

    fn sample_next_state(&self) -> ConnectState {
        let state = self.state;
        let config = &state.config;
        let (x, y) = (self.column, state.heights[self.column]);

        let mut grid = state.grid.clone();
        grid[config.index(x, y)] = state.player.0 as i8;
        let mut heights = state.heights.clone();
        heights[x] += 1;

        let mut next = ConnectState {
            config: Arc::clone(config),
            grid,
            heights,
            player: state.player,
            winner: None,
            ended: false,
            reward: PlayerMap::with_value(config.num_players, 0),
            columns: OnceLock::new(),
        };

        if config.line_through(&next.grid, x, y) >= config.count {
            debug!("connect: {} wins with a drop in column {}", state.player, x);
            next.winner = Some(state.player);
            next.ended = true;
            next.reward = PlayerMap::win_for(config.num_players, state.player);
        } else {
            if next.heights.iter().all(|&h| h == config.height) {
                debug!("connect: board full, draw");
                next.ended = true;
            }
            next.player = state.player.next(config.num_players);
        }

        next
    }
}
