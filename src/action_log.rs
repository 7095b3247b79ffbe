use crate::grid::Position;
use crate::transition::Action;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Things that happen during a play session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A level was loaded (from file or clipboard)
    LevelLoaded { name: String },
    /// A move was accepted
    Moved { action: Action, from: [Position; 2], to: [Position; 2] },
    /// A move was refused; the block did not move
    Rejected { action: Action, reason: String },
    /// Block returned to the start
    Restart,
    /// Block is standing on the goal
    GoalReached { moves: u32 },
    /// A solver path was queued for playback
    PlaybackStarted { moves: usize },
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub event: SessionEvent,
}

/// Session event logger
pub struct ActionLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Log an event with current timestamp
    pub fn log(&mut self, event: SessionEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent { timestamp_ms, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Action Log ({} events) ===", self.events.len());
        for (i, logged) in self.events.iter().enumerate() {
            println!("[{:6}ms] #{:3} {:?}", logged.timestamp_ms, i + 1, logged.event);
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut moves = 0;
        let mut swaps = 0;
        let mut rejected = 0;
        let mut restarts = 0;
        let mut wins = 0;

        for logged in &self.events {
            match &logged.event {
                SessionEvent::Moved { action: Action::Swap, .. } => swaps += 1,
                SessionEvent::Moved { .. } => moves += 1,
                SessionEvent::Rejected { .. } => rejected += 1,
                SessionEvent::Restart => restarts += 1,
                SessionEvent::GoalReached { .. } => wins += 1,
                _ => {}
            }
        }

        let duration = self.events.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Moves: {} accepted, {} rejected, {} swaps\n\
             Restarts: {}, Goals reached: {}",
            duration,
            self.events.len(),
            moves,
            rejected,
            swaps,
            restarts,
            wins
        )
    }
}
