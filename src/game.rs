//! Game board: occupancy, legal moves, win detection and move history.

use core::fmt;

use thiserror::Error;

use crate::config::Geometry;
use crate::threat::Direction;

#[derive(Debug, PartialOrd, PartialEq, Clone, Copy, Eq, Error)]
pub enum GameboardError {
    /// Column is full.
    #[error("column {0} is full")]
    ColumnFull(usize),
    #[error("column {0} does not exist")]
    InvalidColumn(usize),
    /// Nothing to undo.
    #[error("no move to undo")]
    NoHistory,
}

#[derive(Copy, Clone, PartialOrd, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    Player1,
    Player2,
}

impl Player {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player1 => Self::Player2,
            Self::Player2 => Self::Player1,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Player1 => 'X',
            Self::Player2 => 'O',
        }
    }

    const fn index(self) -> u64 {
        match self {
            Self::Player1 => 0,
            Self::Player2 => 1,
        }
    }
}

/// Pseudo-random key of a disc of `player` on cell `cell` (splitmix64).
const fn zobrist(cell: usize, player: Player) -> u64 {
    let mut z = (((cell as u64) << 1) | player.index()).wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Gameboard.
///
/// Cells are stored row by row. Technical indices correspond to the logical
/// indices: (row=0,col=0) <==> bottom left of game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gameboard {
    geometry: Geometry,
    cells: Vec<Option<Player>>,
    /// Discs per column.
    fill: Vec<usize>,
    /// Played columns, oldest first.
    history: Vec<usize>,
    key: u64,
}

impl Gameboard {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            cells: vec![None; geometry.cells()],
            fill: vec![0; geometry.width()],
            history: Vec::with_capacity(geometry.cells()),
            key: 0,
        }
    }

    /// Replays `columns` on an empty board, alternating players.
    pub fn from_moves(geometry: Geometry, columns: &[usize]) -> Result<Self, GameboardError> {
        let mut board = Self::new(geometry);
        for &col in columns {
            board.apply(col)?;
        }
        Ok(board)
    }

    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.geometry.width()
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.geometry.height()
    }

    #[inline]
    const fn index(&self, row: usize, col: usize) -> usize {
        row * self.geometry.width() + col
    }

    /// Disc at the given position, `None` if empty.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.cells[self.index(row, col)]
    }

    /// Number of discs in `col`, which is also the row of its next free slot.
    #[must_use]
    pub fn fill(&self, col: usize) -> usize {
        self.fill[col]
    }

    /// Returns the index to the next free slot in the selected column.
    ///
    /// Returns `None` if there are no more free slots.
    fn next_slot_in_column(&self, column_index: usize) -> Option<usize> {
        let row = self.fill[column_index];
        (row < self.height()).then_some(row)
    }

    /// Emits the column indices where moves are legal, in ascending order.
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.width()).filter(|&col| self.next_slot_in_column(col).is_some())
    }

    /// Returns the number of free slots in the given column.
    #[must_use]
    pub fn free_slots_in_column(&self, column: usize) -> usize {
        self.height() - self.fill[column]
    }

    /// Returns the number of free slots in total.
    #[must_use]
    pub fn empty_cells(&self) -> usize {
        self.geometry.cells() - self.history.len()
    }

    #[must_use]
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Player 1 moves whenever an even number of discs has been played.
    #[must_use]
    pub fn player_to_move(&self) -> Player {
        if self.history.len() % 2 == 0 {
            Player::Player1
        } else {
            Player::Player2
        }
    }

    /// Returns whether the board is full, i.e., there are no legal moves.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.empty_cells() == 0
    }

    /// Drops a disc of the player to move into `column_index`. Returns the row
    /// the disc landed on.
    pub fn apply(&mut self, column_index: usize) -> Result<usize, GameboardError> {
        if column_index >= self.width() {
            return Err(GameboardError::InvalidColumn(column_index));
        }

        let row_index = self
            .next_slot_in_column(column_index)
            .ok_or(GameboardError::ColumnFull(column_index))?;
        let player = self.player_to_move();
        let index = self.index(row_index, column_index);
        self.cells[index] = Some(player);
        self.key ^= zobrist(index, player);
        self.fill[column_index] += 1;
        self.history.push(column_index);
        Ok(row_index)
    }

    /// Takes back the most recent move. Returns its column.
    pub fn undo(&mut self) -> Result<usize, GameboardError> {
        let column_index = self.history.pop().ok_or(GameboardError::NoHistory)?;
        self.fill[column_index] -= 1;
        let index = self.index(self.fill[column_index], column_index);
        if let Some(player) = self.cells[index].take() {
            self.key ^= zobrist(index, player);
        }
        Ok(column_index)
    }

    /// Key identical for identical occupancy. Incrementally maintained.
    #[must_use]
    pub const fn canonical_key(&self) -> u64 {
        self.key
    }

    /// Position of the most recently placed disc.
    #[must_use]
    pub fn last_move(&self) -> Option<(usize, usize)> {
        let &col = self.history.last()?;
        Some((self.fill[col] - 1, col))
    }

    /// Number of consecutive discs of `player` starting next to (row, col)
    /// and walking by (dr, dc). The start cell itself is not counted.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let mut len = 0;
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);
        while r >= 0
            && c >= 0
            && (r as usize) < self.height()
            && (c as usize) < self.width()
            && self.cell(r as usize, c as usize) == Some(player)
        {
            len += 1;
            r += dr;
            c += dc;
        }
        len
    }

    /// Whether the last placed disc completed a line. Only looks at lines
    /// through that disc.
    #[must_use]
    pub fn last_move_wins(&self) -> bool {
        let Some((row, col)) = self.last_move() else {
            return false;
        };
        let Some(player) = self.cell(row, col) else {
            return false;
        };
        Direction::ALL.iter().any(|direction| {
            let (dr, dc) = direction.delta();
            let forward = self.run_length(row, col, dr, dc, player);
            let backward = self.run_length(row, col, -dr, -dc, player);
            1 + forward + backward >= self.geometry.line_len()
        })
    }

    /// Cells of the first complete line of `player`, bottom-most start first.
    #[must_use]
    pub fn winning_line_of(&self, player: Player) -> Option<Vec<(usize, usize)>> {
        let len = self.geometry.line_len();
        for row in 0..self.height() {
            for col in 0..self.width() {
                for direction in Direction::ALL {
                    let Some(cells) = direction.cells_from(self.geometry, row, col) else {
                        continue;
                    };
                    debug_assert_eq!(cells.len(), len);
                    if cells.iter().all(|&(r, c)| self.cell(r, c) == Some(player)) {
                        return Some(cells);
                    }
                }
            }
        }
        None
    }

    /// Cells of a complete line of either player.
    #[must_use]
    pub fn winning_line(&self) -> Option<Vec<(usize, usize)>> {
        self.winning_line_of(Player::Player1)
            .or_else(|| self.winning_line_of(Player::Player2))
    }

    /// Check if `player` has a complete line.
    #[must_use]
    pub fn is_win(&self, player: Player) -> bool {
        self.winning_line_of(player).is_some()
    }

    /// The board is full and nobody won.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.is_full() && !self.is_win(Player::Player1) && !self.is_win(Player::Player2)
    }

    /// Returns whether the game is over: someone won or the board is full.
    #[must_use]
    pub fn gameover(&self) -> bool {
        self.is_full() || self.is_win(Player::Player1) || self.is_win(Player::Player2)
    }
}

impl fmt::Display for Gameboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let highlight = self.winning_line().unwrap_or_default();
        // Print rows reverted so that it appears naturally.
        for row in (0..self.height()).rev() {
            for col in 0..self.width() {
                match self.cell(row, col) {
                    None => write!(f, "[ ]")?,
                    Some(player) if highlight.contains(&(row, col)) => {
                        write!(f, "<{}>", player.symbol())?;
                    }
                    Some(player) => write!(f, "[{}]", player.symbol())?,
                }
            }
            writeln!(f)?;
        }
        for col in 0..self.width() {
            write!(f, "{:^3}", col + 1)?;
        }
        Ok(())
    }
}
