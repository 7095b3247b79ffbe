use crate::grid::{Board, Position};
use crate::tile::{BridgeId, SwitchMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the two block cells relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Both cells coincide
    Standing,
    /// Cells are neighbours along x
    LayingX,
    /// Cells are neighbours along y
    LayingY,
    /// Cells are not adjacent (the block was split by a teleporter);
    /// only the first cell moves, one step at a time
    Detached,
}

impl Orientation {
    pub fn of(cells: &[Position; 2]) -> Orientation {
        let dx = cells[1].x - cells[0].x;
        let dy = cells[1].y - cells[0].y;
        match (dx, dy) {
            (0, 0) => Orientation::Standing,
            (1, 0) | (-1, 0) => Orientation::LayingX,
            (0, 1) | (0, -1) => Orientation::LayingY,
            _ => Orientation::Detached,
        }
    }

    pub fn is_laying(self) -> bool {
        matches!(self, Orientation::LayingX | Orientation::LayingY)
    }
}

/// On/off state of every bridge cell, keyed by bridge id.
/// Cells are listed in the same order as `Board::bridge_cells`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BridgeSnapshot {
    states: BTreeMap<BridgeId, Vec<bool>>,
}

impl BridgeSnapshot {
    pub fn new() -> Self {
        BridgeSnapshot { states: BTreeMap::new() }
    }

    /// Append the next cell of a bridge
    pub(crate) fn push_cell(&mut self, id: BridgeId, on: bool) {
        self.states.entry(id).or_default().push(on);
    }

    /// State of one bridge cell; unknown bridges read as off
    pub fn is_on(&self, id: BridgeId, slot: usize) -> bool {
        self.states
            .get(&id)
            .and_then(|cells| cells.get(slot))
            .copied()
            .unwrap_or(false)
    }

    /// All cell states of a bridge
    pub fn bridge(&self, id: BridgeId) -> &[bool] {
        self.states.get(&id).map(|cells| cells.as_slice()).unwrap_or(&[])
    }

    pub fn ids(&self) -> impl Iterator<Item = BridgeId> + '_ {
        self.states.keys().copied()
    }

    /// Apply a switch effect to one bridge in place
    pub fn apply(&mut self, id: BridgeId, mode: SwitchMode) {
        if let Some(cells) = self.states.get_mut(&id) {
            for on in cells.iter_mut() {
                *on = match mode {
                    SwitchMode::TurnOn => true,
                    SwitchMode::Toggle => !*on,
                    SwitchMode::TurnOff => false,
                };
            }
        }
    }
}

/// One reachable configuration: where the block is and how the bridges are set.
///
/// Equality and hashing cover the cell order exactly as the transition produced it,
/// so `[a, b]` and `[b, a]` are different states.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub cells: [Position; 2],
    pub bridges: BridgeSnapshot,
}

impl BlockState {
    pub fn new(cells: [Position; 2], bridges: BridgeSnapshot) -> Self {
        BlockState { cells, bridges }
    }

    pub fn standing(at: Position, bridges: BridgeSnapshot) -> Self {
        BlockState { cells: [at, at], bridges }
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::of(&self.cells)
    }

    /// Standing on a goal cell
    pub fn is_goal(&self, board: &Board) -> bool {
        let [a, b] = self.cells;
        a == b && board.is_goal(a.x, a.y)
    }
}
