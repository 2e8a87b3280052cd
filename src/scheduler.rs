//! Search depth over the course of a game.
//!
//! The depth grows by one after every computer turn whose search finished
//! below the time threshold. It never shrinks, and a slow search is never
//! repeated: it only keeps the depth where it is.

use core::time::Duration;
use std::time::Instant;

use log::info;

use crate::ai_player::{MoveSelector, SearchError};
use crate::config::Config;
use crate::game::Gameboard;

/// Depth state of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSession {
    depth: usize,
}

impl SearchSession {
    #[must_use]
    pub const fn new(initial_depth: usize) -> Self {
        Self {
            depth: if initial_depth == 0 { 1 } else { initial_depth },
        }
    }

    /// Depth for the next turn, before clamping.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Depth to actually search on `board`: never more than the number of
    /// empty cells, never less than one.
    #[must_use]
    pub fn requested_depth(&self, board: &Gameboard) -> usize {
        self.depth.min(board.empty_cells()).max(1)
    }

    /// Accounts for a finished search. Returns whether the depth grew.
    pub fn record(&mut self, elapsed: Duration, threshold: Duration) -> bool {
        if elapsed < threshold {
            self.depth += 1;
            true
        } else {
            false
        }
    }
}

/// What happened during one computer turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub column: usize,
    /// Depth the search ran with.
    pub depth: usize,
    pub elapsed: Duration,
    /// Depth of the following turn.
    pub next_depth: usize,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    selector: MoveSelector,
    session: SearchSession,
    threshold: Duration,
    adaptive: bool,
}

impl Scheduler {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            selector: MoveSelector::new(config),
            session: SearchSession::new(config.initial_depth()),
            threshold: config.params().time_threshold,
            adaptive: config.adaptive_depth(),
        }
    }

    #[must_use]
    pub const fn session(&self) -> &SearchSession {
        &self.session
    }

    #[must_use]
    pub const fn selector(&self) -> &MoveSelector {
        &self.selector
    }

    /// Runs one computer turn on `board` and adapts the depth for the next one.
    pub fn choose(&mut self, board: &Gameboard) -> Result<TurnReport, SearchError> {
        let depth = self.session.requested_depth(board);
        let now = Instant::now();
        let column = self.selector.choose_move(board, depth)?;
        let elapsed = now.elapsed();

        if self.adaptive {
            self.session.record(elapsed, self.threshold);
        }
        info!(
            "{} searched depth {depth} in {:.3}s, next depth {}",
            self.selector.strategy().name(),
            elapsed.as_secs_f32(),
            self.session.depth()
        );

        Ok(TurnReport {
            column,
            depth,
            elapsed,
            next_depth: self.session.depth(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineParams, Geometry, configure};

    fn config(height: usize, threshold: Duration) -> Config {
        let params = EngineParams {
            time_threshold: threshold,
            ..EngineParams::default()
        };
        configure(7, height, 4, 2).unwrap().with_params(params).unwrap()
    }

    #[test]
    fn test_session_record() {
        let threshold = Duration::from_secs(1);
        let mut session = SearchSession::new(3);
        assert!(session.record(Duration::from_millis(10), threshold));
        assert_eq!(session.depth(), 4);
        assert!(!session.record(Duration::from_millis(1500), threshold));
        assert_eq!(session.depth(), 4);
        assert!(!session.record(threshold, threshold));
        assert_eq!(session.depth(), 4);
        assert!(session.record(Duration::from_millis(999), threshold));
        assert_eq!(session.depth(), 5);

        assert_eq!(SearchSession::new(0).depth(), 1);
    }

    #[test]
    fn test_requested_depth_is_clamped() {
        let geometry = Geometry::new(4, 4, 4).unwrap();
        let board = Gameboard::from_moves(geometry, &[0, 1, 0, 1, 2, 3, 2, 3, 1, 0, 1, 0, 3])
            .unwrap();
        assert_eq!(board.empty_cells(), 3);
        assert_eq!(SearchSession::new(10).requested_depth(&board), 3);
        assert_eq!(SearchSession::new(2).requested_depth(&board), 2);
    }

    #[test]
    fn test_depth_grows_on_fast_turns() {
        for height in [6, 5] {
            let config = config(height, Duration::MAX);
            let mut scheduler = Scheduler::new(&config);
            let mut board = Gameboard::new(config.geometry());
            for turn in 0..3 {
                let report = scheduler.choose(&board).unwrap();
                assert_eq!(report.depth, 2 + turn);
                assert_eq!(report.next_depth, 3 + turn);
                board.apply(report.column).unwrap();
                // opponent
                let reply = board.legal_columns().next().unwrap();
                board.apply(reply).unwrap();
            }
        }
    }

    #[test]
    fn test_depth_constant_on_slow_turns() {
        let config = config(6, Duration::ZERO);
        let mut scheduler = Scheduler::new(&config);
        let board = Gameboard::new(config.geometry());
        for _ in 0..3 {
            let report = scheduler.choose(&board).unwrap();
            assert_eq!((report.depth, report.next_depth), (2, 2));
        }
    }

    #[test]
    fn test_fixed_depth() {
        let config = config(6, Duration::MAX).with_adaptive_depth(false);
        let mut scheduler = Scheduler::new(&config);
        let board = Gameboard::new(config.geometry());
        for _ in 0..3 {
            assert_eq!(scheduler.choose(&board).unwrap().next_depth, 2);
        }
    }
}
