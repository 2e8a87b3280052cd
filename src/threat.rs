//! Lines of `L` cells and their classification into threats.
//!
//! The set of lines only depends on the board geometry, so it is computed once
//! per configuration and shared by every search. Classification then looks at
//! a concrete board.

use crate::config::Geometry;
use crate::game::{Gameboard, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `-`
    Horizontal,
    /// `|`
    Vertical,
    /// `/`
    DiagonalUp,
    /// `\`
    DiagonalDown,
}

impl Direction {
    pub const ALL: [Self; 4] = [
        Self::Horizontal,
        Self::Vertical,
        Self::DiagonalUp,
        Self::DiagonalDown,
    ];

    /// Step as (row delta, column delta).
    #[must_use]
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::DiagonalUp => (1, 1),
            Self::DiagonalDown => (-1, 1),
        }
    }

    /// The `line_len` cells starting at (row, col) in this direction, or `None`
    /// if the line leaves the board.
    #[must_use]
    pub fn cells_from(
        self,
        geometry: Geometry,
        row: usize,
        col: usize,
    ) -> Option<Vec<(usize, usize)>> {
        let (dr, dc) = self.delta();
        let last = geometry.line_len() as isize - 1;
        let end_row = row as isize + dr * last;
        let end_col = col as isize + dc * last;
        if end_row < 0
            || end_row >= geometry.height() as isize
            || end_col >= geometry.width() as isize
        {
            return None;
        }
        Some(
            (0..geometry.line_len() as isize)
                .map(|k| ((row as isize + dr * k) as usize, (col as isize + dc * k) as usize))
                .collect(),
        )
    }
}

/// Whether a cell is reached by an even or odd number of further discs when
/// its column fills up from the bottom of an empty board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    /// Discs still to drop into an empty column before `row` is reached.
    #[must_use]
    pub const fn of_row(row: usize) -> Self {
        if row % 2 == 0 { Self::Even } else { Self::Odd }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

/// A run of `L` contiguous cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    direction: Direction,
    cells: Vec<(usize, usize)>,
    /// Parity of every cell, `None` for vertical lines.
    parities: Vec<Option<Parity>>,
}

impl Line {
    fn new(direction: Direction, cells: Vec<(usize, usize)>) -> Self {
        let parities = cells
            .iter()
            .map(|&(row, _)| (direction != Direction::Vertical).then(|| Parity::of_row(row)))
            .collect();
        Self {
            direction,
            cells,
            parities,
        }
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Cells as (row, col) in walking order.
    #[must_use]
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }
}

/// What a line means for the players on a given board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// No discs at all.
    Empty,
    /// Discs of both players, nobody can complete it anymore.
    Blocked,
    /// Only discs of `player`, at least two cells missing.
    Open { player: Player, discs: usize },
    /// All cells but `cell` belong to `player`.
    Threat {
        player: Player,
        cell: (usize, usize),
        parity: Option<Parity>,
    },
    /// The line is complete.
    Complete(Player),
}

/// Classifies `line` on `board`.
#[must_use]
pub fn classify(board: &Gameboard, line: &Line) -> LineClass {
    let mut discs = [0_usize; 2];
    let mut empty = None;
    for (i, &(row, col)) in line.cells.iter().enumerate() {
        match board.cell(row, col) {
            Some(Player::Player1) => discs[0] += 1,
            Some(Player::Player2) => discs[1] += 1,
            None => empty = Some(i),
        }
    }

    let (player, count) = match discs {
        [0, 0] => return LineClass::Empty,
        [n, 0] => (Player::Player1, n),
        [0, n] => (Player::Player2, n),
        _ => return LineClass::Blocked,
    };

    let len = line.cells.len();
    if count == len {
        return LineClass::Complete(player);
    }
    match empty {
        Some(i) if count + 1 == len => {
            let (row, col) = line.cells[i];
            debug_assert!(board.fill(col) <= row);
            LineClass::Threat {
                player,
                cell: (row, col),
                parity: line.parities[i],
            }
        }
        _ => LineClass::Open {
            player,
            discs: count,
        },
    }
}

/// All lines of a geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSet {
    geometry: Geometry,
    lines: Vec<Line>,
}

impl LineSet {
    #[must_use]
    pub fn enumerate(geometry: Geometry) -> Self {
        let mut lines = Vec::new();
        for direction in Direction::ALL {
            for row in 0..geometry.height() {
                for col in 0..geometry.width() {
                    if let Some(cells) = direction.cells_from(geometry, row, col) {
                        lines.push(Line::new(direction, cells));
                    }
                }
            }
        }
        Self { geometry, lines }
    }

    #[must_use]
    pub const fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn classify_all<'a>(
        &'a self,
        board: &'a Gameboard,
    ) -> impl Iterator<Item = LineClass> + 'a {
        debug_assert_eq!(board.geometry(), self.geometry);
        self.lines.iter().map(move |line| classify(board, line))
    }

    /// Number of distinct lines `player` could complete with the next disc.
    #[must_use]
    pub fn immediate_wins(&self, board: &Gameboard, player: Player) -> usize {
        self.classify_all(board)
            .filter(|class| match *class {
                LineClass::Threat {
                    player: owner,
                    cell: (row, col),
                    ..
                } => owner == player && board.fill(col) == row,
                _ => false,
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> Geometry {
        Geometry::new(7, 6, 4).unwrap()
    }

    #[test]
    fn test_enumerate_counts() {
        let lines = LineSet::enumerate(geometry());
        let count = |direction| {
            lines
                .lines()
                .iter()
                .filter(|line| line.direction() == direction)
                .count()
        };
        assert_eq!(count(Direction::Horizontal), 24);
        assert_eq!(count(Direction::Vertical), 21);
        assert_eq!(count(Direction::DiagonalUp), 12);
        assert_eq!(count(Direction::DiagonalDown), 12);
        assert_eq!(lines.lines().len(), 69);

        // vertical lines do not fit, horizontal ones do
        let lines = LineSet::enumerate(Geometry::new(5, 3, 4).unwrap());
        assert_eq!(lines.lines().len(), 2 * 3);
    }

    #[test]
    fn test_parity_is_geometric() {
        let lines = LineSet::enumerate(geometry());
        for line in lines.lines() {
            for (&(row, _), parity) in line.cells.iter().zip(&line.parities) {
                if line.direction() == Direction::Vertical {
                    assert_eq!(*parity, None);
                } else {
                    assert_eq!(*parity, Some(Parity::of_row(row)));
                }
            }
        }
        assert_eq!(Parity::of_row(0), Parity::Even);
        assert_eq!(Parity::of_row(3), Parity::Odd);
        assert_eq!(Parity::Odd.opposite(), Parity::Even);
    }

    #[test]
    fn test_classify() {
        let line = Line::new(
            Direction::Horizontal,
            Direction::Horizontal.cells_from(geometry(), 0, 0).unwrap(),
        );
        let mut board = Gameboard::new(geometry());
        assert_eq!(classify(&board, &line), LineClass::Empty);

        // X: 0, O: 6, X: 1
        for col in [0, 6, 1] {
            board.apply(col).unwrap();
        }
        assert_eq!(
            classify(&board, &line),
            LineClass::Open {
                player: Player::Player1,
                discs: 2
            }
        );

        // O: 6, X: 2
        for col in [6, 2] {
            board.apply(col).unwrap();
        }
        assert_eq!(
            classify(&board, &line),
            LineClass::Threat {
                player: Player::Player1,
                cell: (0, 3),
                parity: Some(Parity::Even)
            }
        );

        // O blocks
        board.apply(3).unwrap();
        assert_eq!(classify(&board, &line), LineClass::Blocked);
    }

    #[test]
    fn test_complete_line() {
        let board = Gameboard::from_moves(geometry(), &[0, 0, 1, 1, 2, 2, 3]).unwrap();
        let lines = LineSet::enumerate(geometry());
        assert!(
            lines
                .classify_all(&board)
                .any(|class| class == LineClass::Complete(Player::Player1))
        );
    }

    #[test]
    fn test_immediate_wins() {
        let lines = LineSet::enumerate(geometry());
        // X on (0,1),(0,2),(0,3); O on (1,1),(1,2). Both (0,0) and (0,4) win.
        let board = Gameboard::from_moves(geometry(), &[1, 1, 2, 2, 3]).unwrap();
        assert_eq!(lines.immediate_wins(&board, Player::Player1), 2);
        assert_eq!(lines.immediate_wins(&board, Player::Player2), 0);

        // O: (1,1),(1,2),(1,3). Both completing cells (1,0) and (1,4) float
        // above empty columns: threats, but no immediate win.
        let board = Gameboard::from_moves(geometry(), &[1, 1, 2, 2, 6, 3, 6, 3]).unwrap();
        let o_threats = lines
            .classify_all(&board)
            .filter(|class| {
                matches!(
                    class,
                    LineClass::Threat {
                        player: Player::Player2,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(o_threats, 2);
        assert_eq!(lines.immediate_wins(&board, Player::Player2), 0);
    }
}
