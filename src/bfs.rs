//! Threat-counting breadth-first search. Used on boards with an odd number of
//! rows.
//!
//! Every legal column is explored by its own rayon task on a private copy of
//! the board. At each position reached within the search depth, the lines the
//! side to move could complete right away are counted: as winning
//! continuations if that side is the searching player, as losing ones
//! otherwise. Columns are ranked by `winning / (losing + 1)`.

use std::collections::VecDeque;

use log::debug;
use rayon::prelude::*;

use crate::config::Geometry;
use crate::game::{Gameboard, Player};
use crate::threat::LineSet;

/// Outcome of exploring one starting column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnReport {
    pub column: usize,
    pub winning: u64,
    pub losing: u64,
    /// Positions visited, the one right after the starting move included.
    pub nodes: u64,
    /// Largest number of positions waiting in the queue at once.
    pub frontier: usize,
    /// `winning / (losing + 1)`, infinite if the starting move wins.
    pub ratio: f64,
}

impl ColumnReport {
    fn winning_move(column: usize) -> Self {
        Self {
            column,
            winning: 0,
            losing: 0,
            nodes: 1,
            frontier: 0,
            ratio: f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThreatCountEngine {
    lines: LineSet,
}

impl ThreatCountEngine {
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            lines: LineSet::enumerate(geometry),
        }
    }

    /// Explores every legal column in parallel and returns their reports in
    /// ascending column order. Returns once all tasks have finished.
    #[must_use]
    pub fn analyze(&self, board: &Gameboard, depth: usize) -> Vec<ColumnReport> {
        let depth = depth.max(1);
        let protagonist = board.player_to_move();
        let columns = board.legal_columns().collect::<Vec<_>>();

        let reports = columns
            .into_par_iter()
            .map(|column| self.explore(board.clone(), column, protagonist, depth))
            .collect::<Vec<_>>();

        for report in &reports {
            debug!(
                "bfs depth={depth}: column={} winning={} losing={} nodes={} queue={} ratio={:.4}",
                report.column,
                report.winning,
                report.losing,
                report.nodes,
                report.frontier,
                report.ratio
            );
        }
        reports
    }

    /// Column with the best ratio. Ties go to the column closest to the
    /// center, then to the lower index. `None` if the board is full.
    #[must_use]
    pub fn search(&self, board: &Gameboard, depth: usize) -> Option<ColumnReport> {
        let geometry = self.lines.geometry();
        self.analyze(board, depth).into_iter().max_by(|a, b| {
            a.ratio
                .total_cmp(&b.ratio)
                .then_with(|| {
                    geometry
                        .center_distance(b.column)
                        .cmp(&geometry.center_distance(a.column))
                })
                .then_with(|| b.column.cmp(&a.column))
        })
    }

    /// Breadth-first exploration of one starting column. `board` is owned by
    /// the task.
    ///
    /// Queued positions are move paths relative to the position after the
    /// starting move and are replayed on `board`. The last level is counted
    /// while expanding its parent instead of being queued, so the queue never
    /// holds more than `W^(depth - 2)` paths.
    fn explore(
        &self,
        mut board: Gameboard,
        column: usize,
        protagonist: Player,
        depth: usize,
    ) -> ColumnReport {
        if board.apply(column).is_err() {
            return ColumnReport {
                column,
                winning: 0,
                losing: 0,
                nodes: 0,
                frontier: 0,
                ratio: 0.0,
            };
        }
        if board.last_move_wins() {
            return ColumnReport::winning_move(column);
        }

        let mut tally = Tally::new(protagonist);
        let mut frontier = 1;
        let mut queue = VecDeque::from([Vec::new()]);

        while let Some(path) = queue.pop_front() {
            let replayed = replay(&mut board, &path);
            if replayed == path.len() {
                tally.count(&self.lines, &board);
                let level = path.len();
                if level + 1 < depth {
                    let leaf_children = level + 2 >= depth;
                    for col in 0..board.width() {
                        if board.apply(col).is_err() {
                            continue;
                        }
                        // already counted as an immediate win of the parent
                        if !board.last_move_wins() {
                            if leaf_children {
                                tally.count(&self.lines, &board);
                            } else {
                                let mut child = Vec::with_capacity(level + 1);
                                child.extend_from_slice(&path);
                                child.push(col);
                                queue.push_back(child);
                            }
                        }
                        rewind(&mut board, 1);
                    }
                    frontier = frontier.max(queue.len());
                }
            }
            rewind(&mut board, replayed);
        }

        ColumnReport {
            column,
            winning: tally.winning,
            losing: tally.losing,
            nodes: tally.nodes,
            frontier,
            ratio: tally.winning as f64 / (tally.losing as f64 + 1.0),
        }
    }
}

/// Running counts of one task.
struct Tally {
    protagonist: Player,
    winning: u64,
    losing: u64,
    nodes: u64,
}

impl Tally {
    const fn new(protagonist: Player) -> Self {
        Self {
            protagonist,
            winning: 0,
            losing: 0,
            nodes: 0,
        }
    }

    /// Credits the immediate wins of the side to move on `board`.
    fn count(&mut self, lines: &LineSet, board: &Gameboard) {
        self.nodes += 1;
        let mover = board.player_to_move();
        let wins = lines.immediate_wins(board, mover) as u64;
        if mover == self.protagonist {
            self.winning += wins;
        } else {
            self.losing += wins;
        }
    }
}

/// Applies `path` to `board`. Returns how many moves were applied.
fn replay(board: &mut Gameboard, path: &[usize]) -> usize {
    path.iter()
        .take_while(|&&col| board.apply(col).is_ok())
        .count()
}

/// Takes back the last `moves` moves.
fn rewind(board: &mut Gameboard, moves: usize) {
    for _ in 0..moves {
        let undone = board.undo();
        debug_assert!(undone.is_ok());
    }
}
