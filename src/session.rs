use crate::action_log::{ActionLog, SessionEvent};
use crate::block::BlockState;
use crate::error::Rejected;
use crate::grid::Board;
use crate::transition::{self, Action};

/// One player's game on one board. `step` and `restart` are the only mutators.
pub struct Session {
    board: Board,
    state: BlockState,
    moves: u32,
    /// Set by a swap until the renderer picks it up
    pending_rotation: bool,
    log: ActionLog,
}

impl Session {
    pub fn new(board: Board) -> Self {
        let mut log = ActionLog::new();
        log.log(SessionEvent::LevelLoaded { name: board.name.clone() });
        Session {
            state: board.initial_state().clone(),
            board,
            moves: 0,
            pending_rotation: false,
            log,
        }
    }

    /// Replace the board (e.g. a level pasted from the clipboard), keeping the log
    pub fn load(&mut self, board: Board) {
        self.log.log(SessionEvent::LevelLoaded { name: board.name.clone() });
        self.state = board.initial_state().clone();
        self.board = board;
        self.moves = 0;
        self.pending_rotation = false;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn is_won(&self) -> bool {
        self.state.is_goal(&self.board)
    }

    /// Apply a move. On rejection the current state is kept.
    /// Once the block stands on the goal further moves are ignored.
    pub fn step(&mut self, action: Action) -> Result<&BlockState, Rejected> {
        if self.is_won() {
            return Ok(&self.state);
        }

        match transition::step(&self.board, &self.state, action) {
            Ok(next) => {
                self.log.log(SessionEvent::Moved { action, from: self.state.cells, to: next.cells });
                self.state = next;
                self.moves += 1;
                if action == Action::Swap {
                    self.pending_rotation = true;
                }
                if self.is_won() {
                    self.log.log(SessionEvent::GoalReached { moves: self.moves });
                }
                Ok(&self.state)
            }
            Err(reason) => {
                self.log.log(SessionEvent::Rejected { action, reason: reason.to_string() });
                Err(reason)
            }
        }
    }

    /// Back to the state recorded when the board was built
    pub fn restart(&mut self) {
        self.log.log(SessionEvent::Restart);
        self.state = self.board.initial_state().clone();
        self.moves = 0;
        self.pending_rotation = false;
    }

    /// Note that a solver path is about to be replayed
    pub fn begin_playback(&mut self, moves: usize) {
        self.log.log(SessionEvent::PlaybackStarted { moves });
    }

    /// Whether a swap happened since the last call
    pub fn take_pending_rotation(&mut self) -> bool {
        std::mem::take(&mut self.pending_rotation)
    }
}
