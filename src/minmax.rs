//! Depth-limited alpha-beta minmax search with a transposition table. Used on
//! boards with an even number of rows.

use log::debug;

use crate::config::{EngineParams, Geometry, ParityWeights};
use crate::game::{Gameboard, Player};
use crate::threat::{LineClass, LineSet, Parity};
use crate::tt::{Bound, TranspositionTable};

/// Score of a won position before the remaining-depth bonus.
pub const WIN_SCORE: i32 = 1_000_000;

/// Outside of every reachable score.
const INFINITY: i32 = i32::MAX / 2;

/// Result of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub column: usize,
    /// Positive: good for the side to move at the root.
    pub score: i32,
    pub nodes: u64,
    pub tt_hits: u64,
}

#[derive(Debug, Clone)]
pub struct MinimaxEngine {
    lines: LineSet,
    weights: ParityWeights,
    tt_capacity: usize,
    /// Center columns first, improves pruning.
    move_order: Vec<usize>,
}

impl MinimaxEngine {
    #[must_use]
    pub fn new(geometry: Geometry, params: &EngineParams) -> Self {
        Self {
            lines: LineSet::enumerate(geometry),
            weights: params.weights,
            tt_capacity: params.tt_capacity,
            move_order: geometry.center_first_columns(),
        }
    }

    fn preferred_parity(&self, player: Player) -> Parity {
        match player {
            Player::Player1 => self.weights.preferred_parity,
            Player::Player2 => self.weights.preferred_parity.opposite(),
        }
    }

    fn threat_weight(&self, owner: Player, parity: Option<Parity>) -> i32 {
        if parity == Some(self.preferred_parity(owner)) {
            self.weights.preferred
        } else {
            self.weights.other
        }
    }

    /// Sum of open threats: positive for the ones of `player`, negative for
    /// the opponent's. Threats on the owner's preferred parity weigh more.
    #[must_use]
    pub fn heuristic(&self, board: &Gameboard, player: Player) -> i32 {
        self.lines
            .classify_all(board)
            .map(|class| match class {
                LineClass::Threat {
                    player: owner,
                    parity,
                    ..
                } => {
                    let weight = self.threat_weight(owner, parity);
                    if owner == player { weight } else { -weight }
                }
                _ => 0,
            })
            .sum()
    }

    /// Best column for the player to move, looking `depth` plies ahead
    /// (at least one). `None` if the board is full.
    #[must_use]
    pub fn search(&self, board: &Gameboard, depth: usize) -> Option<SearchReport> {
        let depth = depth.max(1);
        let mut board = board.clone();
        let mut search = Search::new(self, board.player_to_move());

        let mut best: Option<(usize, i32)> = None;
        let mut alpha = -INFINITY;
        for &col in &self.move_order {
            let Ok(_) = board.apply(col) else {
                continue;
            };
            let score = search.minmax(&mut board, depth - 1, alpha, INFINITY);
            undo(&mut board, col);

            // strictly better: ties keep the more central column
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((col, score));
                alpha = alpha.max(score);
            }
        }

        let (column, score) = best?;
        let report = SearchReport {
            column,
            score,
            nodes: search.nodes,
            tt_hits: search.tt_hits,
        };
        debug!(
            "minmax depth={depth}: column={column} score={score} nodes={} tt_hits={} tt_len={}",
            report.nodes,
            report.tt_hits,
            search.tt.len()
        );
        Some(report)
    }

    /// Exact score of every legal column (full window, no root pruning), in
    /// ascending column order.
    #[must_use]
    pub fn evaluate_columns(&self, board: &Gameboard, depth: usize) -> Vec<(usize, i32)> {
        let depth = depth.max(1);
        let mut board = board.clone();
        let mut search = Search::new(self, board.player_to_move());
        let columns = board.legal_columns().collect::<Vec<_>>();
        columns
            .into_iter()
            .filter_map(|col| {
                board.apply(col).ok()?;
                let score = search.minmax(&mut board, depth - 1, -INFINITY, INFINITY);
                undo(&mut board, col);
                Some((col, score))
            })
            .collect()
    }
}

fn undo(board: &mut Gameboard, col: usize) {
    let undone = board.undo();
    debug_assert_eq!(undone, Ok(col));
}

/// State of one search invocation. The table lives and dies with it.
struct Search<'a> {
    engine: &'a MinimaxEngine,
    target_player: Player,
    tt: TranspositionTable,
    nodes: u64,
    tt_hits: u64,
}

impl<'a> Search<'a> {
    fn new(engine: &'a MinimaxEngine, target_player: Player) -> Self {
        Self {
            engine,
            target_player,
            tt: TranspositionTable::new(engine.tt_capacity),
            nodes: 0,
            tt_hits: 0,
        }
    }

    /// Recursive minmax logic including the recursion end conditions and
    /// evaluation of winning/losing moves. `board` is the position after the
    /// last move, `depth` the remaining plies.
    fn minmax(&mut self, board: &mut Gameboard, depth: usize, alpha: i32, beta: i32) -> i32 {
        self.nodes += 1;

        // We start with the recursion tail: Can we stop the recursion?
        if board.last_move_wins() {
            let winner = board.player_to_move().opponent();
            // faster win better, later loss "less bad"
            let score = WIN_SCORE + depth as i32;
            return if winner == self.target_player { score } else { -score };
        }
        if board.is_full() {
            return 0;
        }
        if depth == 0 {
            return self.engine.heuristic(board, self.target_player);
        }

        let key = board.canonical_key();
        if let Some(score) = self.tt.probe(key, depth, alpha, beta) {
            self.tt_hits += 1;
            return score;
        }

        let score = if board.player_to_move() == self.target_player {
            self.minmax_step(board, depth, alpha, beta, -INFINITY, |new, best| new > best)
        } else {
            self.minmax_step(board, depth, alpha, beta, INFINITY, |new, best| new < best)
        };

        let bound = if score <= alpha {
            Bound::Upper
        } else if score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, score, depth, bound);
        score
    }

    /// Tries every column, keeps the score preferred by `better_score` and
    /// narrows the window accordingly. Fail-soft: the returned score may lie
    /// outside (`alpha`, `beta`).
    fn minmax_step(
        &mut self,
        board: &mut Gameboard,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        initial_score: i32,
        better_score: impl Fn(i32, i32) -> bool,
    ) -> i32 {
        let maximizing = board.player_to_move() == self.target_player;
        let mut best_score = initial_score;
        let engine = self.engine;

        for &col in &engine.move_order {
            let Ok(_) = board.apply(col) else {
                continue;
            };
            let score = self.minmax(board, depth - 1, alpha, beta);
            undo(board, col);

            if better_score(score, best_score) {
                best_score = score;
            }
            if maximizing {
                alpha = alpha.max(best_score);
            } else {
                beta = beta.min(best_score);
            }
            if alpha >= beta {
                break;
            }
        }

        best_score
    }
}
