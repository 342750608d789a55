use crate::data::types::Type;
use crate::sim::state::{Boost, SideCondition, SideRef, Status, Terrain, VolatileStatus, Weather};

/// Branches whose probability falls below this are dropped outright.
pub const BRANCH_EPSILON: f64 = 1e-6;

/// One atomic, reversible state mutation. Every operand a reversal needs is
/// carried on the instruction itself (`previous` fields), so `apply` followed
/// by `reverse` restores the state bit-exactly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Instruction {
    Damage {
        side_ref: SideRef,
        amount: i16,
    },
    Heal {
        side_ref: SideRef,
        amount: i16,
    },
    Boost {
        side_ref: SideRef,
        stat: Boost,
        amount: i8,
    },
    ApplyStatus {
        side_ref: SideRef,
        status: Status,
    },
    RemoveStatus {
        side_ref: SideRef,
        status: Status,
    },
    ApplyVolatileStatus {
        side_ref: SideRef,
        volatile_status: VolatileStatus,
    },
    RemoveVolatileStatus {
        side_ref: SideRef,
        volatile_status: VolatileStatus,
    },
    Switch {
        side_ref: SideRef,
        previous: String,
        next: String,
    },
    SideStart {
        side_ref: SideRef,
        condition: SideCondition,
        amount: i8,
    },
    SideEnd {
        side_ref: SideRef,
        condition: SideCondition,
        amount: i8,
    },
    WeatherStart {
        weather: Weather,
        previous: Option<Weather>,
    },
    WeatherEnd {
        previous: Weather,
    },
    TerrainStart {
        terrain: Terrain,
        previous: Option<Terrain>,
    },
    TerrainEnd {
        previous: Terrain,
    },
    ToggleTrickRoom,
    WishStart {
        side_ref: SideRef,
        amount: i16,
        previous_amount: i16,
    },
    WishDecrement {
        side_ref: SideRef,
    },
    ChangeItem {
        side_ref: SideRef,
        new_item: Option<String>,
        previous_item: Option<String>,
    },
    ChangeTypes {
        side_ref: SideRef,
        new_types: [Type; 2],
        previous_types: [Type; 2],
    },
    EnableMove {
        side_ref: SideRef,
        move_id: String,
    },
    DisableMove {
        side_ref: SideRef,
        move_id: String,
    },
}

/// One enumerated outcome of a turn: the probability of reaching it, the
/// ordered instructions that realize it, and whether resolution stopped early
/// (`frozen` branches must not be extended further).
#[derive(Clone, Debug, PartialEq)]
pub struct StateInstructions {
    pub percentage: f64,
    pub instructions: Vec<Instruction>,
    pub frozen: bool,
}

impl Default for StateInstructions {
    fn default() -> StateInstructions {
        StateInstructions::new()
    }
}

impl StateInstructions {
    pub fn new() -> StateInstructions {
        StateInstructions {
            percentage: 1.0,
            instructions: Vec::new(),
            frozen: false,
        }
    }

    pub fn update_percentage(&mut self, modifier: f64) {
        self.percentage *= modifier;
    }

    pub fn add(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }
}

/// Merge branches with identical instruction sequences and frozen flags,
/// summing their probabilities, and drop vanishing branches. First-occurrence
/// order is preserved and the pass is idempotent.
pub fn canonicalize(branches: Vec<StateInstructions>) -> Vec<StateInstructions> {
    let mut merged: Vec<StateInstructions> = Vec::with_capacity(branches.len());
    for branch in branches {
        if branch.percentage < BRANCH_EPSILON {
            continue;
        }
        match merged
            .iter_mut()
            .find(|m| m.frozen == branch.frozen && m.instructions == branch.instructions)
        {
            Some(existing) => existing.percentage += branch.percentage,
            None => merged.push(branch),
        }
    }
    merged
}
