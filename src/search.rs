use crate::block::{BlockState, Orientation};
use crate::grid::Board;
use crate::transition::{self, Action};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Worklist discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMethod {
    /// FIFO worklist; the first path found is a shortest one
    #[serde(rename = "bfs")]
    BreadthFirst,
    /// LIFO worklist; no guarantee on path length
    #[serde(rename = "dfs")]
    DepthFirst,
}

impl FromStr for SearchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(SearchMethod::BreadthFirst),
            "dfs" | "depth-first" => Ok(SearchMethod::DepthFirst),
            other => Err(format!("unknown search method '{}' (expected bfs or dfs)", other)),
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMethod::BreadthFirst => write!(f, "bfs"),
            SearchMethod::DepthFirst => write!(f, "dfs"),
        }
    }
}

/// A node in the search worklist
#[derive(Debug, Clone)]
struct SearchNode {
    state: BlockState,
    /// Actions from the initial state; only kept when paths are tracked
    path: Option<Vec<Action>>,
}

/// Result of a finished search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// A goal state was reached. `path` is present when paths were tracked;
    /// an empty path means the initial state already stands on the goal.
    Found {
        goal: BlockState,
        path: Option<Vec<Action>>,
    },
    /// The worklist ran dry without reaching a goal
    NoSolution,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&[Action]> {
        match self {
            SearchOutcome::Found { path: Some(path), .. } => Some(path.as_slice()),
            _ => None,
        }
    }
}

/// What one call to `Solver::expand_next` did
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStep {
    /// A node was expanded and this many new states were queued
    Expanded { generated: usize },
    Finished(SearchOutcome),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub expanded: usize,
    pub visited: usize,
    pub peak_frontier: usize,
    pub elapsed_ms: f64,
}

/// Incremental breadth-first / depth-first search over block states.
///
/// States are marked visited when generated, so no configuration is queued twice.
/// The visited set is never pruned.
pub struct Solver<'a> {
    board: &'a Board,
    method: SearchMethod,
    track_paths: bool,
    trace: bool,
    frontier: VecDeque<SearchNode>,
    visited: HashSet<BlockState>,
    stats: SearchStats,
    outcome: Option<SearchOutcome>,
}

impl<'a> Solver<'a> {
    /// Search from the board's initial state
    pub fn new(board: &'a Board, method: SearchMethod) -> Self {
        Self::from_state(board, board.initial_state().clone(), method)
    }

    /// Search from an arbitrary state, e.g. the middle of a game
    pub fn from_state(board: &'a Board, start: BlockState, method: SearchMethod) -> Self {
        let mut solver = Solver {
            board,
            method,
            track_paths: true,
            trace: false,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            stats: SearchStats::default(),
            outcome: None,
        };

        if start.is_goal(board) {
            solver.outcome = Some(SearchOutcome::Found {
                goal: start.clone(),
                path: Some(Vec::new()),
            });
        }

        solver.visited.insert(start.clone());
        solver.frontier.push_back(SearchNode {
            state: start,
            path: Some(Vec::new()),
        });
        solver.stats.visited = 1;
        solver.stats.peak_frontier = 1;
        solver
    }

    /// Keep per-node action paths (default). Turning this off makes a
    /// statistics-only run that reports whether a goal is reachable.
    pub fn with_paths(mut self, track_paths: bool) -> Self {
        self.track_paths = track_paths;
        if !track_paths {
            for node in self.frontier.iter_mut() {
                node.path = None;
            }
            if let Some(SearchOutcome::Found { path, .. }) = &mut self.outcome {
                *path = None;
            }
        }
        self
    }

    /// Print expansion details to the console
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn method(&self) -> SearchMethod {
        self.method
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn has_visited(&self, state: &BlockState) -> bool {
        self.visited.contains(state)
    }

    pub fn outcome(&self) -> Option<&SearchOutcome> {
        self.outcome.as_ref()
    }

    fn next_node(&mut self) -> Option<SearchNode> {
        match self.method {
            SearchMethod::BreadthFirst => self.frontier.pop_front(),
            SearchMethod::DepthFirst => self.frontier.pop_back(),
        }
    }

    fn finish(&mut self, outcome: SearchOutcome) -> SearchStep {
        if self.trace {
            match &outcome {
                SearchOutcome::Found { goal, path } => println!(
                    "[search] {} FOUND goal at ({},{}) after {} expansions, {} states, path: {}",
                    self.method,
                    goal.cells[0].x,
                    goal.cells[0].y,
                    self.stats.expanded,
                    self.stats.visited,
                    path.as_deref().map(format_path).unwrap_or_else(|| "not tracked".to_string())
                ),
                SearchOutcome::NoSolution => println!(
                    "[search] {} NO SOLUTION after {} expansions, {} states",
                    self.method, self.stats.expanded, self.stats.visited
                ),
            }
        }
        self.outcome = Some(outcome.clone());
        SearchStep::Finished(outcome)
    }

    /// Expand one worklist node
    pub fn expand_next(&mut self) -> SearchStep {
        if let Some(outcome) = &self.outcome {
            return SearchStep::Finished(outcome.clone());
        }

        let node = match self.next_node() {
            Some(node) => node,
            None => return self.finish(SearchOutcome::NoSolution),
        };
        self.stats.expanded += 1;

        let detached = node.state.orientation() == Orientation::Detached;
        if self.trace && self.stats.expanded <= 10 {
            println!(
                "[search] Expansion {}: cells ({},{}) ({},{}), frontier={}",
                self.stats.expanded,
                node.state.cells[0].x,
                node.state.cells[0].y,
                node.state.cells[1].x,
                node.state.cells[1].y,
                self.frontier.len()
            );
        }

        let mut generated = 0;
        for action in Action::ALL {
            if action == Action::Swap && !detached {
                continue;
            }

            let next = match transition::step(self.board, &node.state, action) {
                Ok(next) => next,
                Err(_) => continue,
            };

            if !self.visited.insert(next.clone()) {
                continue;
            }
            self.stats.visited += 1;

            let path = if self.track_paths {
                node.path.as_ref().map(|path| {
                    let mut path = path.clone();
                    path.push(action);
                    path
                })
            } else {
                None
            };

            if next.is_goal(self.board) {
                self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
                return self.finish(SearchOutcome::Found { goal: next, path });
            }

            self.frontier.push_back(SearchNode { state: next, path });
            generated += 1;
        }

        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
        SearchStep::Expanded { generated }
    }

    /// Expand until a goal is found or the worklist is empty
    pub fn run(&mut self) -> SearchOutcome {
        let start = Instant::now();
        let outcome = loop {
            if let SearchStep::Finished(outcome) = self.expand_next() {
                break outcome;
            }
        };
        self.stats.elapsed_ms += start.elapsed().as_secs_f64() * 1000.0;
        outcome
    }
}

/// Shortest action sequence from the board's initial state
pub fn bfs(board: &Board) -> SearchOutcome {
    Solver::new(board, SearchMethod::BreadthFirst).run()
}

/// First action sequence found depth-first from the board's initial state
pub fn dfs(board: &Board) -> SearchOutcome {
    Solver::new(board, SearchMethod::DepthFirst).run()
}

/// Summary of one solver run, printable as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub level: String,
    pub method: SearchMethod,
    pub solved: bool,
    pub moves: Option<usize>,
    pub path: Option<String>,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn new(board: &Board, method: SearchMethod, outcome: &SearchOutcome, stats: &SearchStats) -> Self {
        let path = outcome.path();
        SearchReport {
            level: board.name.clone(),
            method,
            solved: outcome.is_found(),
            moves: path.map(|p| p.len()),
            path: path.map(format_path),
            stats: stats.clone(),
        }
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Level: {}  Method: {}", self.level, self.method)?;
        match (self.solved, &self.path) {
            (true, Some(path)) => writeln!(f, "Solved in {} moves: {}", self.moves.unwrap_or(0), path)?,
            (true, None) => writeln!(f, "Solvable (path not tracked)")?,
            (false, _) => writeln!(f, "No solution")?,
        }
        writeln!(f, "Expanded: {}  Visited: {}  Peak frontier: {}", self.stats.expanded, self.stats.visited, self.stats.peak_frontier)?;
        write!(f, "Time to complete: {:.3} ms", self.stats.elapsed_ms)
    }
}

/// Solve with path tracking
pub fn solve(board: &Board, method: SearchMethod, trace: bool) -> (SearchOutcome, SearchReport) {
    let mut solver = Solver::new(board, method).with_trace(trace);
    let outcome = solver.run();
    let report = SearchReport::new(board, method, &outcome, solver.stats());
    (outcome, report)
}

/// Statistics-only run: paths are not kept
pub fn measure(board: &Board, method: SearchMethod, trace: bool) -> SearchReport {
    let mut solver = Solver::new(board, method).with_paths(false).with_trace(trace);
    let outcome = solver.run();
    SearchReport::new(board, method, &outcome, solver.stats())
}

/// Format path for display, one letter per action
pub fn format_path(path: &[Action]) -> String {
    if path.is_empty() {
        return "Already at goal".to_string();
    }
    path.iter().map(|a| a.letter()).collect()
}

/// Parse a path written by `format_path`
pub fn parse_path(text: &str) -> Option<Vec<Action>> {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(Action::from_letter)
        .collect()
}
