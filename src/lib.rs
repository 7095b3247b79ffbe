pub mod action_log;
pub mod block;
pub mod config;
pub mod error;
pub mod grid;
pub mod level;
pub mod search;
pub mod session;
pub mod tile;
pub mod transition;

pub use block::{BlockState, BridgeSnapshot, Orientation};
pub use error::{BloxorzError, Rejected};
pub use grid::{Board, Position};
pub use level::Level;
pub use search::{bfs, dfs, SearchMethod, SearchOutcome, Solver};
pub use session::Session;
pub use transition::{step, Action};
