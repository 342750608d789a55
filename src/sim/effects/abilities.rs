//! Ability hooks, keyed by normalized ability id. Unknown ids fall through
//! every match arm and behave as a blank ability.

use crate::data::moves::{MoveCategory, MoveData, FLAG_BITE, FLAG_CONTACT, FLAG_PUNCH, FLAG_SOUND};
use crate::data::types::{effectiveness_against, Type};
use crate::sim::instructions::Instruction;
use crate::sim::state::{
    Boost, Pokemon, SideRef, State, Status, Terrain, VolatileStatus, Weather,
};

/// Mold Breaker class: the attacker ignores the defender's ability.
pub fn ignores_defender_ability(attacker: &Pokemon) -> bool {
    matches!(
        attacker.ability.as_str(),
        "moldbreaker" | "teravolt" | "turboblaze"
    )
}

/// Whether the defender's ability makes it immune to this damaging move.
pub fn blocks_move(defender: &Pokemon, m: &MoveData) -> bool {
    match defender.ability.as_str() {
        "levitate" => m.move_type == Type::Ground,
        "waterabsorb" | "stormdrain" | "dryskin" if m.move_type == Type::Water => true,
        "flashfire" => m.move_type == Type::Fire,
        "voltabsorb" | "lightningrod" | "motordrive" => m.move_type == Type::Electric,
        "sapsipper" => m.move_type == Type::Grass,
        "soundproof" => m.flags & FLAG_SOUND != 0,
        "wonderguard" => effectiveness_against(m.move_type, defender.types) <= 1.0,
        _ => false,
    }
}

/// Damage multiplier from the attacker's own ability.
pub fn attack_modifier(attacker: &Pokemon, m: &MoveData, weather: Option<Weather>) -> f32 {
    match attacker.ability.as_str() {
        "hugepower" | "purepower" if m.category == MoveCategory::Physical => 2.0,
        "guts" if attacker.status.is_some() && m.category == MoveCategory::Physical => 1.5,
        "technician" if m.power <= 60.0 => 1.5,
        "ironfist" if m.flags & FLAG_PUNCH != 0 => 1.2,
        "strongjaw" if m.flags & FLAG_BITE != 0 => 1.5,
        "toughclaws" if m.flags & FLAG_CONTACT != 0 => 1.3,
        "waterbubble" if m.move_type == Type::Water => 2.0,
        "transistor" if m.move_type == Type::Electric => 1.5,
        "dragonsmaw" if m.move_type == Type::Dragon => 1.5,
        "steelworker" if m.move_type == Type::Steel => 1.5,
        "blaze" if m.move_type == Type::Fire && attacker.hp_fraction() < 1.0 / 3.0 => 1.5,
        "torrent" if m.move_type == Type::Water && attacker.hp_fraction() < 1.0 / 3.0 => 1.5,
        "overgrow" if m.move_type == Type::Grass && attacker.hp_fraction() < 1.0 / 3.0 => 1.5,
        "swarm" if m.move_type == Type::Bug && attacker.hp_fraction() < 1.0 / 3.0 => 1.5,
        "solarpower" if weather == Some(Weather::Sun) && m.category == MoveCategory::Special => 1.5,
        "sheerforce" if m.secondary.is_some() => 1.3,
        _ => 1.0,
    }
}

/// Damage multiplier from the defender's ability. `type_eff` is the combined
/// type effectiveness of the incoming move, needed by the Filter class.
pub fn defense_modifier(defender: &Pokemon, m: &MoveData, type_eff: f32) -> f32 {
    match defender.ability.as_str() {
        "filter" | "solidrock" | "prismarmor" if type_eff > 1.0 => 0.75,
        "thickfat" if matches!(m.move_type, Type::Fire | Type::Ice) => 0.5,
        "waterbubble" if m.move_type == Type::Fire => 0.5,
        "furcoat" if m.category == MoveCategory::Physical => 0.5,
        "icescales" if m.category == MoveCategory::Special => 0.5,
        "multiscale" | "shadowshield" if defender.at_full_health() => 0.5,
        "fluffy" => {
            let mut modifier = 1.0;
            if m.flags & FLAG_CONTACT != 0 {
                modifier *= 0.5;
            }
            if m.move_type == Type::Fire {
                modifier *= 2.0;
            }
            modifier
        }
        _ => 1.0,
    }
}

/// Instructions produced by the incoming Pokemon's ability when it enters
/// the field. Weather and terrain setters respect what is already up.
pub fn switch_in_instructions(state: &State, side_ref: SideRef) -> Vec<Instruction> {
    let incoming = &state.side(side_ref).active;
    let opponent = &state.side(side_ref.other()).active;
    let mut instructions = Vec::new();
    match incoming.ability.as_str() {
        "drought" => push_weather(&mut instructions, state, Weather::Sun),
        "drizzle" => push_weather(&mut instructions, state, Weather::Rain),
        "sandstream" => push_weather(&mut instructions, state, Weather::Sand),
        "snowwarning" => push_weather(&mut instructions, state, Weather::Hail),
        "electricsurge" => push_terrain(&mut instructions, state, Terrain::Electric),
        "psychicsurge" => push_terrain(&mut instructions, state, Terrain::Psychic),
        "mistysurge" => push_terrain(&mut instructions, state, Terrain::Misty),
        "grassysurge" => push_terrain(&mut instructions, state, Terrain::Grassy),
        "intimidate" => {
            let blocked = opponent.has_volatile(VolatileStatus::Substitute)
                || matches!(
                    opponent.ability.as_str(),
                    "clearbody" | "fullmetalbody" | "hypercutter" | "innerfocus" | "whitesmoke"
                );
            if !blocked && opponent.is_alive() {
                let amount = opponent.boost_headroom(Boost::Attack, -1);
                if amount != 0 {
                    instructions.push(Instruction::Boost {
                        side_ref: side_ref.other(),
                        stat: Boost::Attack,
                        amount,
                    });
                }
            }
        }
        _ => {}
    }
    instructions
}

fn push_weather(instructions: &mut Vec<Instruction>, state: &State, weather: Weather) {
    let replaceable = match state.weather {
        Some(current) => current != weather && !current.is_irreversible(),
        None => true,
    };
    if replaceable {
        instructions.push(Instruction::WeatherStart {
            weather,
            previous: state.weather,
        });
    }
}

fn push_terrain(instructions: &mut Vec<Instruction>, state: &State, terrain: Terrain) {
    if state.terrain != Some(terrain) {
        instructions.push(Instruction::TerrainStart {
            terrain,
            previous: state.terrain,
        });
    }
}

/// Residual ability effect, resolved during the end-of-turn phase.
pub fn end_of_turn_instruction(state: &State, side_ref: SideRef) -> Option<Instruction> {
    let pokemon = &state.side(side_ref).active;
    if !pokemon.is_alive() {
        return None;
    }
    let missing = pokemon.max_hp - pokemon.hp;
    match pokemon.ability.as_str() {
        "speedboost" if pokemon.boost(Boost::Speed) < crate::sim::state::MAX_BOOST => {
            Some(Instruction::Boost {
                side_ref,
                stat: Boost::Speed,
                amount: 1,
            })
        }
        "poisonheal"
            if missing > 0
                && matches!(pokemon.status, Some(Status::Poison) | Some(Status::Toxic)) =>
        {
            Some(Instruction::Heal {
                side_ref,
                amount: missing.min(pokemon.max_hp / 8),
            })
        }
        "solarpower" if state.weather == Some(Weather::Sun) => Some(Instruction::Damage {
            side_ref,
            amount: pokemon.hp.min(pokemon.max_hp / 8),
        }),
        "raindish" if state.weather == Some(Weather::Rain) && missing > 0 => {
            Some(Instruction::Heal {
                side_ref,
                amount: missing.min(pokemon.max_hp / 16),
            })
        }
        "icebody" if state.weather == Some(Weather::Hail) && missing > 0 => {
            Some(Instruction::Heal {
                side_ref,
                amount: missing.min(pokemon.max_hp / 16),
            })
        }
        "dryskin" if state.weather == Some(Weather::Rain) && missing > 0 => {
            Some(Instruction::Heal {
                side_ref,
                amount: missing.min(pokemon.max_hp / 8),
            })
        }
        "dryskin" if state.weather == Some(Weather::Sun) => Some(Instruction::Damage {
            side_ref,
            amount: pokemon.hp.min(pokemon.max_hp / 8),
        }),
        _ => None,
    }
}

pub fn speed_modifier(pokemon: &Pokemon, weather: Option<Weather>, terrain: Option<Terrain>) -> f32 {
    match pokemon.ability.as_str() {
        "swiftswim" if weather == Some(Weather::Rain) => 2.0,
        "chlorophyll" if weather == Some(Weather::Sun) => 2.0,
        "sandrush" if weather == Some(Weather::Sand) => 2.0,
        "slushrush" if weather == Some(Weather::Hail) => 2.0,
        "surgesurfer" if terrain == Some(Terrain::Electric) => 2.0,
        "quickfeet" if pokemon.status.is_some() => 1.5,
        _ => 1.0,
    }
}

pub fn priority_bonus(attacker: &Pokemon, m: &MoveData) -> i8 {
    match attacker.ability.as_str() {
        "prankster" if m.category == MoveCategory::Status => 1,
        "galewings" if m.move_type == Type::Flying && attacker.at_full_health() => 1,
        "triage" if m.heal.is_some() || m.drain.is_some() => 3,
        _ => 0,
    }
}

/// Ability-based immunity to a major status.
pub fn blocks_status(pokemon: &Pokemon, status: Status) -> bool {
    match pokemon.ability.as_str() {
        "comatose" | "purifyingsalt" => true,
        "shieldsdown" => pokemon.hp * 2 > pokemon.max_hp,
        "limber" => status == Status::Paralysis,
        "insomnia" | "vitalspirit" | "sweetveil" => status == Status::Sleep,
        "immunity" | "pastelveil" => matches!(status, Status::Poison | Status::Toxic),
        "waterveil" | "waterbubble" => status == Status::Burn,
        "magmaarmor" => status == Status::Freeze,
        _ => false,
    }
}

/// Chip damage dealt back to an attacker that made contact.
pub fn contact_recoil(defender: &Pokemon) -> Option<i16> {
    match defender.ability.as_str() {
        "roughskin" | "ironbarbs" => Some(defender.max_hp / 8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::moves::get_move;
    use crate::sim::state::test_util::{dummy, dummy_state};

    #[test]
    fn levitate_blocks_ground_moves() {
        let mut p = dummy("p");
        p.ability = "levitate".to_string();
        let earthquake = get_move("earthquake").unwrap();
        let tackle = get_move("tackle").unwrap();
        assert!(blocks_move(&p, earthquake));
        assert!(!blocks_move(&p, tackle));
    }

    #[test]
    fn drought_respects_existing_sun() {
        let mut state = dummy_state();
        state.bot.active.ability = "drought".to_string();
        let instructions = switch_in_instructions(&state, SideRef::Bot);
        assert_eq!(
            instructions,
            vec![Instruction::WeatherStart {
                weather: Weather::Sun,
                previous: None,
            }]
        );

        state.weather = Some(Weather::Sun);
        assert!(switch_in_instructions(&state, SideRef::Bot).is_empty());

        state.weather = Some(Weather::HeavyRain);
        assert!(switch_in_instructions(&state, SideRef::Bot).is_empty());
    }

    #[test]
    fn intimidate_clamps_at_minus_six() {
        let mut state = dummy_state();
        state.bot.active.ability = "intimidate".to_string();
        state.opponent.active.boosts[Boost::Attack.index()] = -6;
        assert!(switch_in_instructions(&state, SideRef::Bot).is_empty());
    }

    #[test]
    fn guts_boosts_physical_when_statused() {
        let mut p = dummy("p");
        p.ability = "guts".to_string();
        let tackle = get_move("tackle").unwrap();
        assert_eq!(attack_modifier(&p, tackle, None), 1.0);
        p.status = Some(Status::Burn);
        assert_eq!(attack_modifier(&p, tackle, None), 1.5);
    }
}
