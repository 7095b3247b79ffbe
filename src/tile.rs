use crate::error::BloxorzError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type BridgeId = u8;
pub type TeleporterId = u8;

/// Width of one feature code in level text
pub const CODE_LEN: usize = 3;

/// What a switch does to its bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchMode {
    TurnOn,
    Toggle,
    TurnOff,
}

/// Occupancy needed to press a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwitchTrigger {
    /// Heavy switch: only a standing block presses it
    Standing,
    /// Soft switch: any part of the block presses it
    AnyOccupancy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeleportRole {
    /// Standing here sends the block to the group's destinations
    Trigger,
    First,
    Second,
}

/// One feature of a board cell. A cell holds an ordered list of these;
/// the first one is the cell's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Empty,
    Floor,
    SoftFloor,
    Goal,
    /// Start marker for the block's first cell (plain floor otherwise)
    Start,
    /// Start marker for the block's second cell, for levels that begin laying
    StartSecond,
    Bridge {
        id: BridgeId,
        /// Which edge the bridge folds from; only renderers care
        hinge: u8,
        initially_on: bool,
    },
    Switch {
        bridge: BridgeId,
        mode: SwitchMode,
        trigger: SwitchTrigger,
    },
    Teleporter {
        group: TeleporterId,
        role: TeleportRole,
    },
}

fn digit(c: char, code: &str) -> Result<u8, BloxorzError> {
    c.to_digit(10)
        .map(|d| d as u8)
        .ok_or_else(|| BloxorzError::malformed(format!("expected a digit in feature code '{}'", code)))
}

impl Feature {
    /// Decode a single 3-character feature code
    pub fn parse(code: &str) -> Result<Feature, BloxorzError> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != CODE_LEN {
            return Err(BloxorzError::malformed(format!("feature code '{}' is not {} characters", code, CODE_LEN)));
        }

        let feature = match code {
            "---" => Feature::Empty,
            "ooo" => Feature::Floor,
            "iii" => Feature::SoftFloor,
            "ggg" => Feature::Goal,
            "PPP" => Feature::Start,
            "ppp" => Feature::StartSecond,
            _ => match chars[0] {
                'B' | 'b' => Feature::Bridge {
                    id: digit(chars[2], code)?,
                    hinge: digit(chars[1], code)?,
                    initially_on: chars[0] == 'B',
                },
                'S' | 's' => {
                    let mode = match chars[1] {
                        '0' => SwitchMode::TurnOn,
                        '1' => SwitchMode::Toggle,
                        '2' => SwitchMode::TurnOff,
                        _ => return Err(BloxorzError::malformed(format!("unknown switch mode in '{}'", code))),
                    };
                    let trigger = if chars[0] == 'S' {
                        SwitchTrigger::Standing
                    } else {
                        SwitchTrigger::AnyOccupancy
                    };
                    Feature::Switch { bridge: digit(chars[2], code)?, mode, trigger }
                }
                't' => {
                    let role = match chars[2] {
                        't' => TeleportRole::Trigger,
                        '0' => TeleportRole::First,
                        '1' => TeleportRole::Second,
                        _ => return Err(BloxorzError::malformed(format!("unknown teleporter role in '{}'", code))),
                    };
                    Feature::Teleporter { group: digit(chars[1], code)?, role }
                }
                _ => return Err(BloxorzError::malformed(format!("unknown feature code '{}'", code))),
            },
        };

        Ok(feature)
    }

    /// Split a level cell into its stacked features
    pub fn parse_cell(cell: &str) -> Result<Vec<Feature>, BloxorzError> {
        let chars: Vec<char> = cell.chars().collect();
        if chars.is_empty() || chars.len() % CODE_LEN != 0 {
            return Err(BloxorzError::malformed(format!(
                "cell '{}' is not a sequence of {}-character codes",
                cell, CODE_LEN
            )));
        }

        chars
            .chunks(CODE_LEN)
            .map(|chunk| Feature::parse(&chunk.iter().collect::<String>()))
            .collect()
    }

    /// Level-text code for this feature, with the bridge drawn in the given state
    pub fn code_with_state(&self, bridge_on: bool) -> String {
        match *self {
            Feature::Bridge { id, hinge, .. } => {
                format!("{}{}{}", if bridge_on { 'B' } else { 'b' }, hinge, id)
            }
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Feature::Empty => write!(f, "---"),
            Feature::Floor => write!(f, "ooo"),
            Feature::SoftFloor => write!(f, "iii"),
            Feature::Goal => write!(f, "ggg"),
            Feature::Start => write!(f, "PPP"),
            Feature::StartSecond => write!(f, "ppp"),
            Feature::Bridge { id, hinge, initially_on } => {
                write!(f, "{}{}{}", if initially_on { 'B' } else { 'b' }, hinge, id)
            }
            Feature::Switch { bridge, mode, trigger } => {
                let kind = match trigger {
                    SwitchTrigger::Standing => 'S',
                    SwitchTrigger::AnyOccupancy => 's',
                };
                let mode = match mode {
                    SwitchMode::TurnOn => '0',
                    SwitchMode::Toggle => '1',
                    SwitchMode::TurnOff => '2',
                };
                write!(f, "{}{}{}", kind, mode, bridge)
            }
            Feature::Teleporter { group, role } => {
                let role = match role {
                    TeleportRole::Trigger => 't',
                    TeleportRole::First => '0',
                    TeleportRole::Second => '1',
                };
                write!(f, "t{}{}", group, role)
            }
        }
    }
}
