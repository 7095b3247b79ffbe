#![allow(dead_code)]

use bloxorz::{step, Action, BlockState, Board, Level, Position};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

/// Build a board from inline level text
pub fn board(text: &str) -> Board {
    let level = Level::parse("test", text).expect("level text should tokenize");
    Board::build(&level).expect("level should build")
}

pub fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

/// Apply actions from the initial state, panicking on the first rejected move
pub fn replay(board: &Board, path: &[Action]) -> BlockState {
    let mut state = board.initial_state().clone();
    for (i, &action) in path.iter().enumerate() {
        state = step(board, &state, action)
            .unwrap_or_else(|e| panic!("move #{} ({}) rejected: {}", i + 1, action, e));
    }
    state
}

/// Parse a path like "RRDL" into actions
pub fn actions(letters: &str) -> Vec<Action> {
    bloxorz::search::parse_path(letters).expect("path letters should be U/D/L/R/S")
}

/// Every state reachable from the initial state, found without the solver
pub fn reachable_states(board: &Board) -> HashSet<BlockState> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(board.initial_state().clone());
    queue.push_back(board.initial_state().clone());

    while let Some(state) = queue.pop_front() {
        for action in Action::ALL {
            if let Ok(next) = step(board, &state, action) {
                if seen.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
    }

    seen
}

/// Stage files shipped in ./stages, sorted by name
pub fn stage_files() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(Path::new("./stages"))
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("txt"))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

pub fn load_stage(number: u32) -> Board {
    let path = Level::stage_path(Path::new("./stages"), number);
    let level = Level::load_from_file(&path).expect("stage file should load");
    Board::build(&level).expect("stage should build")
}
