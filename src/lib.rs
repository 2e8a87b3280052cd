//! Computer opponent for _connect-L_ games: `L` discs in a row on a board
//! with `W` columns and `H` rows win.
//!
//! The board height decides the search algorithm. Even heights get an
//! alpha-beta [`minmax`] search with a transposition table and a heuristic
//! that values threats by their row parity. Odd heights get a parallel
//! threat-counting breadth-first search ([`bfs`]), one task per column.
//! The [`Scheduler`] raises the depth after every turn that was searched
//! quickly.
//!
//! ```
//! use connect_l_rs::{Gameboard, Scheduler, configure};
//!
//! let config = configure(7, 6, 4, 2).unwrap();
//! let mut board = Gameboard::new(config.geometry());
//! let mut scheduler = Scheduler::new(&config);
//!
//! board.apply(3).unwrap();
//! let turn = scheduler.choose(&board).unwrap();
//! board.apply(turn.column).unwrap();
//! ```

#![deny(missing_debug_implementations)]

pub mod ai_player;
pub mod bfs;
pub mod config;
pub mod game;
pub mod minmax;
pub mod scheduler;
pub mod threat;
pub mod tt;

pub use ai_player::{MoveSelector, SearchError, Strategy};
pub use config::{Config, ConfigError, EngineParams, Geometry, ParityWeights, configure};
pub use game::{Gameboard, GameboardError, Player};
pub use scheduler::{Scheduler, SearchSession, TurnReport};
pub use threat::Parity;
