use crate::block::{BlockState, BridgeSnapshot, Orientation};
use crate::error::BloxorzError;
use crate::level::Level;
use crate::tile::{BridgeId, Feature, SwitchMode, SwitchTrigger, TeleportRole, TeleporterId};
use crate::transition;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Something that fires when the block rests on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchDescriptor {
    Bridge {
        bridge: BridgeId,
        mode: SwitchMode,
        trigger: SwitchTrigger,
    },
    Teleport(TeleporterId),
}

#[derive(Default)]
struct TeleporterParts {
    triggers: usize,
    first: Vec<Position>,
    second: Vec<Position>,
}

/// Board of typed cells plus the indices the transition engine needs.
/// Cell ids run row by row: id = x + y * cols.
#[derive(Debug, Clone)]
pub struct Board {
    pub name: String,
    pub rows: i32,
    pub cols: i32,
    cells: Vec<Vec<Feature>>,
    /// Bridge id -> cells of that bridge, in level order
    bridges: BTreeMap<BridgeId, Vec<Position>>,
    /// Base bridge cell -> (bridge id, index into that bridge's cell list)
    bridge_slots: HashMap<Position, (BridgeId, usize)>,
    switches: HashMap<Position, Vec<SwitchDescriptor>>,
    /// Teleporter group -> (first, second) destination
    teleporters: BTreeMap<TeleporterId, [Position; 2]>,
    initial: BlockState,
}

impl Board {
    /// Build a board from tokenized level data
    pub fn build(level: &Level) -> Result<Board, BloxorzError> {
        let rows = level.height() as i32;
        let cols = level.width() as i32;

        let mut cells = Vec::with_capacity((rows * cols) as usize);
        let mut bridges: BTreeMap<BridgeId, Vec<Position>> = BTreeMap::new();
        let mut bridge_slots = HashMap::new();
        let mut snapshot = BridgeSnapshot::new();
        let mut switches: HashMap<Position, Vec<SwitchDescriptor>> = HashMap::new();
        let mut teleporter_parts: BTreeMap<TeleporterId, TeleporterParts> = BTreeMap::new();
        let mut start: Option<Position> = None;
        let mut start_second: Option<Position> = None;

        for (y, row) in level.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                let features = Feature::parse_cell(cell)?;

                for (i, feature) in features.iter().enumerate() {
                    match *feature {
                        Feature::Empty
                        | Feature::Floor
                        | Feature::SoftFloor
                        | Feature::Goal => {}
                        Feature::Start => {
                            if start.replace(pos).is_some() {
                                return Err(BloxorzError::malformed("more than one start cell"));
                            }
                        }
                        Feature::StartSecond => {
                            if start_second.replace(pos).is_some() {
                                return Err(BloxorzError::malformed("more than one second start cell"));
                            }
                        }
                        Feature::Bridge { id, initially_on, .. } => {
                            let cells_of_bridge = bridges.entry(id).or_default();
                            if i == 0 {
                                bridge_slots.insert(pos, (id, cells_of_bridge.len()));
                            }
                            cells_of_bridge.push(pos);
                            snapshot.push_cell(id, initially_on);
                        }
                        Feature::Switch { bridge, mode, trigger } => {
                            switches
                                .entry(pos)
                                .or_default()
                                .push(SwitchDescriptor::Bridge { bridge, mode, trigger });
                        }
                        Feature::Teleporter { group, role } => {
                            let parts = teleporter_parts.entry(group).or_default();
                            match role {
                                TeleportRole::Trigger => {
                                    parts.triggers += 1;
                                    switches.entry(pos).or_default().push(SwitchDescriptor::Teleport(group));
                                }
                                TeleportRole::First => parts.first.push(pos),
                                TeleportRole::Second => parts.second.push(pos),
                            }
                        }
                    }
                }

                cells.push(features);
            }
        }

        // Every switch must drive an existing bridge
        for (pos, descriptors) in &switches {
            for descriptor in descriptors {
                if let SwitchDescriptor::Bridge { bridge, .. } = descriptor {
                    if !bridges.contains_key(bridge) {
                        return Err(BloxorzError::malformed(format!(
                            "switch at ({},{}) targets missing bridge {}",
                            pos.x, pos.y, bridge
                        )));
                    }
                }
            }
        }

        let mut teleporters = BTreeMap::new();
        for (group, parts) in teleporter_parts {
            if parts.triggers != 1 || parts.first.len() != 1 || parts.second.len() != 1 {
                return Err(BloxorzError::malformed(format!(
                    "teleporter {} needs one trigger and two destinations (found {} trigger, {} first, {} second)",
                    group,
                    parts.triggers,
                    parts.first.len(),
                    parts.second.len()
                )));
            }
            teleporters.insert(group, [parts.first[0], parts.second[0]]);
        }

        let start = start.ok_or_else(|| BloxorzError::malformed("no start cell"))?;
        let second = start_second.unwrap_or(start);
        let start_cells = transition::check_auto_merge([start, second]);

        let board = Board {
            name: level.name.clone(),
            rows,
            cols,
            cells,
            bridges,
            bridge_slots,
            switches,
            teleporters,
            initial: BlockState::new(start_cells, snapshot),
        };

        if board.initial.orientation() == Orientation::Detached && start_second.is_some() {
            return Err(BloxorzError::malformed("start cells are not adjacent"));
        }
        if let Err(reason) = transition::validate(&board, &board.initial.cells, &board.initial.bridges) {
            return Err(BloxorzError::malformed(format!("invalid starting position: {}", reason)));
        }

        Ok(board)
    }

    /// Convert (x, y) coordinates to cell ID
    pub fn get_id(&self, x: i32, y: i32) -> i32 {
        x + y * self.cols
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Stacked features of a cell; empty outside the board
    pub fn features(&self, x: i32, y: i32) -> &[Feature] {
        if !self.is_in_bounds(x, y) {
            return &[];
        }
        &self.cells[self.get_id(x, y) as usize]
    }

    /// First feature of a cell, which decides whether it can carry the block
    pub fn base(&self, x: i32, y: i32) -> Feature {
        self.features(x, y).first().copied().unwrap_or(Feature::Empty)
    }

    /// Whether a block cell can rest here given the bridge states.
    /// Soft floor counts as floor; `is_soft_floor` decides whether it holds a standing block.
    pub fn is_traversable_floor(&self, x: i32, y: i32, bridges: &BridgeSnapshot) -> bool {
        match self.base(x, y) {
            Feature::Empty => false,
            Feature::Bridge { .. } => self.bridge_on_at(x, y, bridges).unwrap_or(false),
            Feature::Floor
            | Feature::SoftFloor
            | Feature::Goal
            | Feature::Start
            | Feature::StartSecond
            | Feature::Switch { .. }
            | Feature::Teleporter { .. } => true,
        }
    }

    pub fn is_soft_floor(&self, x: i32, y: i32) -> bool {
        self.base(x, y) == Feature::SoftFloor
    }

    pub fn is_goal(&self, x: i32, y: i32) -> bool {
        self.base(x, y) == Feature::Goal
    }

    /// On/off state of the bridge at a cell, if the cell is a bridge
    pub fn bridge_on_at(&self, x: i32, y: i32, bridges: &BridgeSnapshot) -> Option<bool> {
        self.bridge_slots
            .get(&Position::new(x, y))
            .map(|&(id, slot)| bridges.is_on(id, slot))
    }

    /// Pure form of a switch effect: returns the changed snapshot
    pub fn apply_bridge_effect(&self, bridges: &BridgeSnapshot, id: BridgeId, mode: SwitchMode) -> BridgeSnapshot {
        let mut next = bridges.clone();
        next.apply(id, mode);
        next
    }

    pub fn switches_at(&self, x: i32, y: i32) -> &[SwitchDescriptor] {
        self.switches
            .get(&Position::new(x, y))
            .map(|descriptors| descriptors.as_slice())
            .unwrap_or(&[])
    }

    /// Ordered (first, second) destination of a teleporter group
    pub fn teleporter_destinations(&self, group: TeleporterId) -> Option<[Position; 2]> {
        self.teleporters.get(&group).copied()
    }

    pub fn bridge_ids(&self) -> impl Iterator<Item = BridgeId> + '_ {
        self.bridges.keys().copied()
    }

    pub fn bridge_cells(&self, id: BridgeId) -> &[Position] {
        self.bridges.get(&id).map(|cells| cells.as_slice()).unwrap_or(&[])
    }

    /// Block state recorded at load time; restarts return here
    pub fn initial_state(&self) -> &BlockState {
        &self.initial
    }

    /// Level text for this board with bridges drawn in the given state
    pub fn to_level_text(&self, bridges: &BridgeSnapshot) -> String {
        let mut result = String::new();
        for y in 0..self.rows {
            let mut row = Vec::with_capacity(self.cols as usize);
            for x in 0..self.cols {
                let on = self.bridge_on_at(x, y, bridges);
                let cell: String = self
                    .features(x, y)
                    .iter()
                    .map(|f| match (f, on) {
                        (Feature::Bridge { .. }, Some(on)) => f.code_with_state(on),
                        _ => f.to_string(),
                    })
                    .collect();
                row.push(cell);
            }
            result.push_str(&row.join(" "));
            result.push('\n');
        }
        result
    }
}
