//! Item hooks, keyed by normalized item id. Unknown ids are inert.

use crate::data::moves::{MoveCategory, MoveData};
use crate::data::types::Type;
use crate::sim::instructions::Instruction;
use crate::sim::state::{Pokemon, SideRef, State, Status};

pub fn is_choice_item(item: &str) -> bool {
    matches!(item, "choiceband" | "choicespecs" | "choicescarf")
}

/// Whether the defender's held item makes it immune to this damaging move.
pub fn blocks_move(defender: &Pokemon, m: &MoveData) -> bool {
    match defender.item.as_deref() {
        Some("airballoon") => m.move_type == Type::Ground,
        _ => false,
    }
}

/// Damage multiplier from the attacker's held item. `type_eff` is the
/// combined type effectiveness, needed by Expert Belt.
pub fn attack_modifier(attacker: &Pokemon, m: &MoveData, type_eff: f32) -> f32 {
    let item = match attacker.item.as_deref() {
        Some(item) => item,
        None => return 1.0,
    };
    match item {
        "choiceband" if m.category == MoveCategory::Physical => 1.5,
        "choicespecs" if m.category == MoveCategory::Special => 1.5,
        "lifeorb" => 1.3,
        "expertbelt" if type_eff > 1.0 => 1.2,
        "muscleband" if m.category == MoveCategory::Physical => 1.1,
        "wiseglasses" if m.category == MoveCategory::Special => 1.1,
        "charcoal" if m.move_type == Type::Fire => 1.2,
        "mysticwater" if m.move_type == Type::Water => 1.2,
        "magnet" if m.move_type == Type::Electric => 1.2,
        "miracleseed" if m.move_type == Type::Grass => 1.2,
        "nevermeltice" if m.move_type == Type::Ice => 1.2,
        "blackbelt" if m.move_type == Type::Fighting => 1.2,
        "poisonbarb" if m.move_type == Type::Poison => 1.2,
        "softsand" if m.move_type == Type::Ground => 1.2,
        "sharpbeak" if m.move_type == Type::Flying => 1.2,
        "twistedspoon" if m.move_type == Type::Psychic => 1.2,
        "silverpowder" if m.move_type == Type::Bug => 1.2,
        "hardstone" if m.move_type == Type::Rock => 1.2,
        "spelltag" if m.move_type == Type::Ghost => 1.2,
        "dragonfang" if m.move_type == Type::Dragon => 1.2,
        "blackglasses" if m.move_type == Type::Dark => 1.2,
        "metalcoat" if m.move_type == Type::Steel => 1.2,
        "silkscarf" if m.move_type == Type::Normal => 1.2,
        _ => 1.0,
    }
}

pub fn defense_modifier(defender: &Pokemon, m: &MoveData) -> f32 {
    match defender.item.as_deref() {
        Some("assaultvest") if m.category == MoveCategory::Special => 2.0 / 3.0,
        Some("eviolite") => 2.0 / 3.0,
        _ => 1.0,
    }
}

pub fn speed_modifier(pokemon: &Pokemon) -> f32 {
    match pokemon.item.as_deref() {
        Some("choicescarf") => 1.5,
        Some("ironball") => 0.5,
        _ => 1.0,
    }
}

/// Chip damage dealt back to an attacker that made contact.
pub fn contact_recoil(defender: &Pokemon) -> Option<i16> {
    match defender.item.as_deref() {
        Some("rockyhelmet") => Some(defender.max_hp / 6),
        _ => None,
    }
}

fn orb_blocked(pokemon: &Pokemon, status: Status) -> bool {
    if super::abilities::blocks_status(pokemon, status) {
        return true;
    }
    match status {
        Status::Burn => pokemon.has_type(Type::Fire),
        Status::Toxic | Status::Poison => {
            pokemon.has_type(Type::Poison) || pokemon.has_type(Type::Steel)
        }
        _ => false,
    }
}

/// Residual item effect, resolved during the end-of-turn phase.
pub fn end_of_turn_instruction(state: &State, side_ref: SideRef) -> Option<Instruction> {
    let pokemon = &state.side(side_ref).active;
    if !pokemon.is_alive() {
        return None;
    }
    let missing = pokemon.max_hp - pokemon.hp;
    match pokemon.item.as_deref() {
        Some("leftovers") if missing > 0 => Some(Instruction::Heal {
            side_ref,
            amount: missing.min(pokemon.max_hp / 16),
        }),
        Some("blacksludge") => {
            if pokemon.has_type(Type::Poison) {
                if missing > 0 {
                    Some(Instruction::Heal {
                        side_ref,
                        amount: missing.min(pokemon.max_hp / 16),
                    })
                } else {
                    None
                }
            } else {
                Some(Instruction::Damage {
                    side_ref,
                    amount: pokemon.hp.min(pokemon.max_hp / 16),
                })
            }
        }
        Some("flameorb") if pokemon.status.is_none() && !orb_blocked(pokemon, Status::Burn) => {
            Some(Instruction::ApplyStatus {
                side_ref,
                status: Status::Burn,
            })
        }
        Some("toxicorb") if pokemon.status.is_none() && !orb_blocked(pokemon, Status::Toxic) => {
            Some(Instruction::ApplyStatus {
                side_ref,
                status: Status::Toxic,
            })
        }
        _ => None,
    }
}
