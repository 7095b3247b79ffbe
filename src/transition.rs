use crate::block::{BlockState, BridgeSnapshot, Orientation};
use crate::error::Rejected;
use crate::grid::{Board, Position, SwitchDescriptor};
use crate::tile::SwitchTrigger;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A committed player move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Hand control to the other half of a detached block
    Swap,
}

impl Action {
    /// Expansion order used by the solver
    pub const ALL: [Action; 5] = [Action::Up, Action::Down, Action::Left, Action::Right, Action::Swap];

    pub fn letter(self) -> char {
        match self {
            Action::Up => 'U',
            Action::Down => 'D',
            Action::Left => 'L',
            Action::Right => 'R',
            Action::Swap => 'S',
        }
    }

    pub fn from_letter(c: char) -> Option<Action> {
        match c.to_ascii_uppercase() {
            'U' => Some(Action::Up),
            'D' => Some(Action::Down),
            'L' => Some(Action::Left),
            'R' => Some(Action::Right),
            'S' => Some(Action::Swap),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Swap => "swap",
        };
        write!(f, "{}", name)
    }
}

/// Per-cell (dx, dy) of one tilt, indexed by orientation and direction
fn displacement(orientation: Orientation, action: Action) -> [(i32, i32); 2] {
    use Action::*;
    use Orientation::*;

    match (orientation, action) {
        (Standing, Up) => [(0, -2), (0, -1)],
        (Standing, Down) => [(0, 1), (0, 2)],
        (Standing, Left) => [(-2, 0), (-1, 0)],
        (Standing, Right) => [(1, 0), (2, 0)],

        (LayingX, Up) => [(0, -1), (0, -1)],
        (LayingX, Down) => [(0, 1), (0, 1)],
        (LayingX, Left) => [(-1, 0), (-2, 0)],
        (LayingX, Right) => [(2, 0), (1, 0)],

        (LayingY, Up) => [(0, -1), (0, -2)],
        (LayingY, Down) => [(0, 2), (0, 1)],
        (LayingY, Left) => [(-1, 0), (-1, 0)],
        (LayingY, Right) => [(1, 0), (1, 0)],

        // Only the controlled half steps
        (Detached, Up) => [(0, -1), (0, 0)],
        (Detached, Down) => [(0, 1), (0, 0)],
        (Detached, Left) => [(-1, 0), (0, 0)],
        (Detached, Right) => [(1, 0), (0, 0)],

        (_, Swap) => [(0, 0), (0, 0)],
    }
}

/// Where the block cells land for an action, before any rule is checked
pub fn compute_raw_displacement(cells: [Position; 2], action: Action) -> Result<[Position; 2], Rejected> {
    let orientation = Orientation::of(&cells);

    if action == Action::Swap {
        if orientation != Orientation::Detached {
            return Err(Rejected::SwapNotDetached);
        }
        return Ok([cells[1], cells[0]]);
    }

    let [(dx0, dy0), (dx1, dy1)] = displacement(orientation, action);
    Ok([cells[0].offset(dx0, dy0), cells[1].offset(dx1, dy1)])
}

/// Check that the block may rest on `cells`
pub fn validate(board: &Board, cells: &[Position; 2], bridges: &BridgeSnapshot) -> Result<(), Rejected> {
    let [a, b] = *cells;

    if !board.is_in_bounds(a.x, a.y) || !board.is_in_bounds(b.x, b.y) {
        return Err(Rejected::OutOfBounds);
    }

    if !board.is_traversable_floor(a.x, a.y, bridges) || !board.is_traversable_floor(b.x, b.y, bridges) {
        return Err(Rejected::NoFloor);
    }

    if a == b && board.is_soft_floor(a.x, a.y) {
        return Err(Rejected::SoftFloorBroke);
    }

    Ok(())
}

fn press_soft_switches(board: &Board, at: Position, bridges: &mut BridgeSnapshot) {
    for descriptor in board.switches_at(at.x, at.y) {
        if let SwitchDescriptor::Bridge { bridge, mode, trigger: SwitchTrigger::AnyOccupancy } = *descriptor {
            bridges.apply(bridge, mode);
        }
    }
}

/// Fire switches and teleporters under the block.
///
/// A standing block fires everything on its cell, in level order. A laying block
/// presses only soft switches, under either cell. A detached block presses soft
/// switches under its controlled half only.
pub fn apply_triggers(
    board: &Board,
    cells: [Position; 2],
    mut bridges: BridgeSnapshot,
) -> ([Position; 2], BridgeSnapshot) {
    let mut result = cells;

    match Orientation::of(&cells) {
        Orientation::Standing => {
            let at = cells[0];
            for descriptor in board.switches_at(at.x, at.y) {
                match *descriptor {
                    SwitchDescriptor::Teleport(group) => {
                        if let Some(destinations) = board.teleporter_destinations(group) {
                            result = destinations;
                        }
                    }
                    SwitchDescriptor::Bridge { bridge, mode, .. } => bridges.apply(bridge, mode),
                }
            }
        }
        Orientation::LayingX | Orientation::LayingY => {
            press_soft_switches(board, cells[0], &mut bridges);
            press_soft_switches(board, cells[1], &mut bridges);
        }
        Orientation::Detached => {
            press_soft_switches(board, cells[0], &mut bridges);
        }
    }

    (result, bridges)
}

/// Put a laying block's cells in increasing order along its axis.
/// Rolling left or up leaves the second cell behind the first; this swaps them back.
pub fn check_auto_merge(cells: [Position; 2]) -> [Position; 2] {
    let dx = cells[1].x - cells[0].x;
    let dy = cells[1].y - cells[0].y;

    match Orientation::of(&cells) {
        Orientation::LayingX if dx == -1 => [cells[1], cells[0]],
        Orientation::LayingY if dy == -1 => [cells[1], cells[0]],
        _ => cells,
    }
}

/// Apply one action to a block state
pub fn step(board: &Board, state: &BlockState, action: Action) -> Result<BlockState, Rejected> {
    let moved = compute_raw_displacement(state.cells, action)?;
    validate(board, &moved, &state.bridges)?;

    let (cells, bridges) = if action == Action::Swap {
        (moved, state.bridges.clone())
    } else {
        apply_triggers(board, moved, state.bridges.clone())
    };

    // A teleport lands on cells that were never checked
    if cells != moved {
        validate(board, &cells, &bridges)?;
    }

    Ok(BlockState::new(check_auto_merge(cells), bridges))
}
