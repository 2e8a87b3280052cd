use log::debug;
use thiserror::Error;

use crate::bfs::ThreatCountEngine;
use crate::config::Config;
use crate::game::Gameboard;
use crate::minmax::MinimaxEngine;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Error)]
pub enum SearchError {
    /// The board is full. Callers treat this as a draw.
    #[error("no legal move left")]
    NoLegalMove,
}

/// Search algorithm, fixed by the parity of the board height.
#[derive(Debug, Clone)]
pub enum Strategy {
    /// Even number of rows.
    Minimax(MinimaxEngine),
    /// Odd number of rows.
    ThreatCount(ThreatCountEngine),
}

impl Strategy {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Minimax(_) => "minmax",
            Self::ThreatCount(_) => "threat-count",
        }
    }
}

/// Entry point of the computer player. Picks the engine once and forwards
/// every turn to it.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    strategy: Strategy,
}

impl MoveSelector {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let geometry = config.geometry();
        let strategy = if geometry.even_height() {
            Strategy::Minimax(MinimaxEngine::new(geometry, config.params()))
        } else {
            Strategy::ThreatCount(ThreatCountEngine::new(geometry))
        };
        Self { strategy }
    }

    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Column to play for the player to move. Deterministic for a given
    /// board and depth, works on copies of `board`.
    pub fn choose_move(&self, board: &Gameboard, depth: usize) -> Result<usize, SearchError> {
        let column = match &self.strategy {
            Strategy::Minimax(engine) => engine.search(board, depth).map(|report| report.column),
            Strategy::ThreatCount(engine) => {
                engine.search(board, depth).map(|report| report.column)
            }
        };
        let column = column.ok_or(SearchError::NoLegalMove)?;
        debug!(
            "{} chose column {column} at depth {depth} for {:?}",
            self.strategy.name(),
            board.player_to_move()
        );
        Ok(column)
    }
}
