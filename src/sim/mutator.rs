use crate::sim::instructions::{Instruction, StateInstructions};
use crate::sim::state::{Side, SideCondition, State};

/// Applies and reverses instruction lists against a borrowed [`State`].
///
/// Amounts are pre-clamped by the generator (damage never exceeds remaining
/// HP, heals never exceed missing HP, boosts never push a stage past +-6),
/// so apply and reverse are exact inverses with no saturation logic here.
pub struct StateMutator<'a> {
    pub state: &'a mut State,
}

impl<'a> StateMutator<'a> {
    pub fn new(state: &'a mut State) -> StateMutator<'a> {
        StateMutator { state }
    }

    pub fn apply(&mut self, instructions: &[Instruction]) {
        for i in instructions {
            self.apply_one(i);
        }
    }

    /// Undo a full instruction list. Instructions are reversed back-to-front
    /// so switch and item bookkeeping unwind in the right order.
    pub fn reverse(&mut self, instructions: &[Instruction]) {
        for i in instructions.iter().rev() {
            self.reverse_one(i);
        }
    }

    /// Apply an instruction and append it to the branch being built. The
    /// generator works apply-as-you-go so later steps see the updated state.
    pub fn record(&mut self, instruction: Instruction, branch: &mut StateInstructions) {
        self.apply_one(&instruction);
        branch.add(instruction);
    }

    pub fn apply_one(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Damage { side_ref, amount } => {
                self.state.side_mut(*side_ref).active.hp -= amount;
            }
            Instruction::Heal { side_ref, amount } => {
                self.state.side_mut(*side_ref).active.hp += amount;
            }
            Instruction::Boost {
                side_ref,
                stat,
                amount,
            } => {
                self.state.side_mut(*side_ref).active.boosts[stat.index()] += amount;
            }
            Instruction::ApplyStatus { side_ref, status } => {
                self.state.side_mut(*side_ref).active.status = Some(*status);
            }
            Instruction::RemoveStatus { side_ref, .. } => {
                self.state.side_mut(*side_ref).active.status = None;
            }
            Instruction::ApplyVolatileStatus {
                side_ref,
                volatile_status,
            } => {
                self.state
                    .side_mut(*side_ref)
                    .active
                    .volatile_statuses
                    .insert(*volatile_status);
            }
            Instruction::RemoveVolatileStatus {
                side_ref,
                volatile_status,
            } => {
                self.state
                    .side_mut(*side_ref)
                    .active
                    .volatile_statuses
                    .remove(volatile_status);
            }
            Instruction::Switch { side_ref, next, .. } => {
                swap_active(self.state.side_mut(*side_ref), next);
            }
            Instruction::SideStart {
                side_ref,
                condition,
                amount,
            } => {
                adjust_side_condition(self.state.side_mut(*side_ref), *condition, *amount);
            }
            Instruction::SideEnd {
                side_ref,
                condition,
                amount,
            } => {
                adjust_side_condition(self.state.side_mut(*side_ref), *condition, -amount);
            }
            Instruction::WeatherStart { weather, .. } => {
                self.state.weather = Some(*weather);
            }
            Instruction::WeatherEnd { .. } => {
                self.state.weather = None;
            }
            Instruction::TerrainStart { terrain, .. } => {
                self.state.terrain = Some(*terrain);
            }
            Instruction::TerrainEnd { .. } => {
                self.state.terrain = None;
            }
            Instruction::ToggleTrickRoom => {
                self.state.trick_room = !self.state.trick_room;
            }
            Instruction::WishStart {
                side_ref, amount, ..
            } => {
                self.state.side_mut(*side_ref).wish = (2, *amount);
            }
            Instruction::WishDecrement { side_ref } => {
                self.state.side_mut(*side_ref).wish.0 -= 1;
            }
            Instruction::ChangeItem {
                side_ref, new_item, ..
            } => {
                self.state.side_mut(*side_ref).active.item = new_item.clone();
            }
            Instruction::ChangeTypes {
                side_ref,
                new_types,
                ..
            } => {
                self.state.side_mut(*side_ref).active.types = *new_types;
            }
            Instruction::EnableMove { side_ref, move_id } => {
                set_move_disabled(self.state.side_mut(*side_ref), move_id, false);
            }
            Instruction::DisableMove { side_ref, move_id } => {
                set_move_disabled(self.state.side_mut(*side_ref), move_id, true);
            }
        }
    }

    pub fn reverse_one(&mut self, instruction: &Instruction) {
        match instruction {
            Instruction::Damage { side_ref, amount } => {
                self.state.side_mut(*side_ref).active.hp += amount;
            }
            Instruction::Heal { side_ref, amount } => {
                self.state.side_mut(*side_ref).active.hp -= amount;
            }
            Instruction::Boost {
                side_ref,
                stat,
                amount,
            } => {
                self.state.side_mut(*side_ref).active.boosts[stat.index()] -= amount;
            }
            Instruction::ApplyStatus { side_ref, .. } => {
                self.state.side_mut(*side_ref).active.status = None;
            }
            Instruction::RemoveStatus { side_ref, status } => {
                self.state.side_mut(*side_ref).active.status = Some(*status);
            }
            Instruction::ApplyVolatileStatus {
                side_ref,
                volatile_status,
            } => {
                self.state
                    .side_mut(*side_ref)
                    .active
                    .volatile_statuses
                    .remove(volatile_status);
            }
            Instruction::RemoveVolatileStatus {
                side_ref,
                volatile_status,
            } => {
                self.state
                    .side_mut(*side_ref)
                    .active
                    .volatile_statuses
                    .insert(*volatile_status);
            }
            Instruction::Switch {
                side_ref, previous, ..
            } => {
                swap_active(self.state.side_mut(*side_ref), previous);
            }
            Instruction::SideStart {
                side_ref,
                condition,
                amount,
            } => {
                adjust_side_condition(self.state.side_mut(*side_ref), *condition, -amount);
            }
            Instruction::SideEnd {
                side_ref,
                condition,
                amount,
            } => {
                adjust_side_condition(self.state.side_mut(*side_ref), *condition, *amount);
            }
            Instruction::WeatherStart { previous, .. } => {
                self.state.weather = *previous;
            }
            Instruction::WeatherEnd { previous } => {
                self.state.weather = Some(*previous);
            }
            Instruction::TerrainStart { previous, .. } => {
                self.state.terrain = *previous;
            }
            Instruction::TerrainEnd { previous } => {
                self.state.terrain = Some(*previous);
            }
            Instruction::ToggleTrickRoom => {
                self.state.trick_room = !self.state.trick_room;
            }
            Instruction::WishStart {
                side_ref,
                previous_amount,
                ..
            } => {
                self.state.side_mut(*side_ref).wish = (0, *previous_amount);
            }
            Instruction::WishDecrement { side_ref } => {
                self.state.side_mut(*side_ref).wish.0 += 1;
            }
            Instruction::ChangeItem {
                side_ref,
                previous_item,
                ..
            } => {
                self.state.side_mut(*side_ref).active.item = previous_item.clone();
            }
            Instruction::ChangeTypes {
                side_ref,
                previous_types,
                ..
            } => {
                self.state.side_mut(*side_ref).active.types = *previous_types;
            }
            Instruction::EnableMove { side_ref, move_id } => {
                set_move_disabled(self.state.side_mut(*side_ref), move_id, true);
            }
            Instruction::DisableMove { side_ref, move_id } => {
                set_move_disabled(self.state.side_mut(*side_ref), move_id, false);
            }
        }
    }
}

fn swap_active(side: &mut Side, incoming_id: &str) {
    let incoming = match side.reserve.remove(incoming_id) {
        Some(p) => p,
        None => panic!("switch target {incoming_id} is not in the reserve"),
    };
    let outgoing = std::mem::replace(&mut side.active, incoming);
    side.reserve.insert(outgoing.id.clone(), outgoing);
}

/// Entries are removed when they reach zero so that apply/reverse round-trips
/// compare equal to a state that never had the condition.
fn adjust_side_condition(side: &mut Side, condition: SideCondition, delta: i8) {
    let count = side.side_conditions.entry(condition).or_insert(0);
    *count += delta;
    if *count == 0 {
        side.side_conditions.remove(&condition);
    }
}

fn set_move_disabled(side: &mut Side, move_id: &str, disabled: bool) {
    if let Some(slot) = side.active.moves.iter_mut().find(|m| m.id == move_id) {
        slot.disabled = disabled;
    }
}
