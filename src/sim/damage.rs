use crate::data::moves::{MoveCategory, MoveData};
use crate::data::types::{effectiveness_against, Type};
use crate::sim::effects::{abilities, items};
use crate::sim::state::{Boost, Pokemon, SideCondition, SideRef, State, Status, Terrain, Weather};

/// How the 85-100% damage roll is represented in the branch tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DamageRolls {
    /// One branch at 92.5% of max damage.
    Average,
    /// Three equal-probability branches: min, average, max.
    MinMaxAverage,
}

/// Damage dealt by `attacker_ref`'s active using `m` (already transformed),
/// one entry per roll branch. `None` means the move deals no damage at all:
/// a status move, zeroed power, or an immune defender.
pub fn calculate_damage(
    state: &State,
    attacker_ref: SideRef,
    move_id: &str,
    m: &MoveData,
    rolls: DamageRolls,
) -> Option<Vec<i16>> {
    if m.category == MoveCategory::Status || m.power <= 0.0 {
        return None;
    }
    let attacker = &state.side(attacker_ref).active;
    let defender = &state.side(attacker_ref.other()).active;

    let type_eff = effectiveness_against(m.move_type, defender.types);
    if type_eff == 0.0 {
        return None;
    }
    let defender_ability_active = !abilities::ignores_defender_ability(attacker);
    if defender_ability_active && abilities::blocks_move(defender, m) {
        return None;
    }
    if items::blocks_move(defender, m) {
        return None;
    }

    let (attacking_stat, defending_stat) = stats_for_move(move_id, m, attacker, defender);
    let level = (2.0 * attacker.level as f32 / 5.0 + 2.0).floor();
    let base = ((level * m.power * attacking_stat / defending_stat).floor() / 50.0).floor() + 2.0;

    let mut damage = base;
    damage *= weather_modifier(m.move_type, state.weather)?;
    damage *= terrain_modifier(m, state, attacker_ref);
    damage *= burn_modifier(m, attacker);
    if !attacker.ability_is("infiltrator") {
        damage *= screen_modifier(m, state, attacker_ref.other());
    }
    if attacker.has_type(m.move_type) {
        damage *= if attacker.ability_is("adaptability") {
            2.0
        } else {
            1.5
        };
    }
    damage *= type_eff;
    if state.weather == Some(Weather::Sand)
        && defender.has_type(Type::Rock)
        && m.category == MoveCategory::Special
    {
        damage /= 1.5;
    }
    damage *= abilities::attack_modifier(attacker, m, state.weather);
    if defender_ability_active {
        damage *= abilities::defense_modifier(defender, m, type_eff);
    }
    damage *= items::attack_modifier(attacker, m, type_eff);
    damage *= items::defense_modifier(defender, m);

    Some(match rolls {
        DamageRolls::Average => vec![(damage * 0.925) as i16],
        DamageRolls::MinMaxAverage => vec![
            (damage * 0.85) as i16,
            (damage * 0.925) as i16,
            damage as i16,
        ],
    })
}

/// Attacking and defending stats after boosts, including the moves that use
/// somebody else's stat sheet.
fn stats_for_move(
    move_id: &str,
    m: &MoveData,
    attacker: &Pokemon,
    defender: &Pokemon,
) -> (f32, f32) {
    let (attacking, defending) = match m.category {
        MoveCategory::Physical => (Boost::Attack, Boost::Defense),
        MoveCategory::Special => (Boost::SpecialAttack, Boost::SpecialDefense),
        MoveCategory::Status => (Boost::Attack, Boost::Defense),
    };
    let attacking_stat = match move_id {
        // Foul Play attacks with the defender's own attack stat.
        "foulplay" => defender.boosted_stat(Boost::Attack),
        // Body Press attacks with the user's defense.
        "bodypress" => attacker.boosted_stat(Boost::Defense),
        _ => attacker.boosted_stat(attacking),
    };
    let defending_stat = match move_id {
        // Psyshock class hits the physical defense with a special attack.
        "psyshock" | "psystrike" | "secretsword" => defender.boosted_stat(Boost::Defense),
        _ => defender.boosted_stat(defending),
    };
    (attacking_stat as f32, (defending_stat.max(1)) as f32)
}

/// `None` when the extreme weathers nullify the move outright.
fn weather_modifier(move_type: Type, weather: Option<Weather>) -> Option<f32> {
    let modifier = match weather {
        Some(Weather::Sun) => match move_type {
            Type::Fire => 1.5,
            Type::Water => 0.5,
            _ => 1.0,
        },
        Some(Weather::Rain) => match move_type {
            Type::Water => 1.5,
            Type::Fire => 0.5,
            _ => 1.0,
        },
        Some(Weather::HarshSun) => match move_type {
            Type::Fire => 1.5,
            Type::Water => return None,
            _ => 1.0,
        },
        Some(Weather::HeavyRain) => match move_type {
            Type::Water => 1.5,
            Type::Fire => return None,
            _ => 1.0,
        },
        _ => 1.0,
    };
    Some(modifier)
}

fn terrain_modifier(m: &MoveData, state: &State, attacker_ref: SideRef) -> f32 {
    let attacker = &state.side(attacker_ref).active;
    let defender = &state.side(attacker_ref.other()).active;
    match state.terrain {
        Some(Terrain::Electric) if m.move_type == Type::Electric && attacker.is_grounded() => 1.3,
        Some(Terrain::Grassy) if m.move_type == Type::Grass && attacker.is_grounded() => 1.3,
        Some(Terrain::Psychic) if m.move_type == Type::Psychic && attacker.is_grounded() => 1.3,
        Some(Terrain::Misty) if m.move_type == Type::Dragon && defender.is_grounded() => 0.5,
        _ => 1.0,
    }
}

fn burn_modifier(m: &MoveData, attacker: &Pokemon) -> f32 {
    if m.category == MoveCategory::Physical
        && attacker.status == Some(Status::Burn)
        && !attacker.ability_is("guts")
    {
        0.5
    } else {
        1.0
    }
}

fn screen_modifier(m: &MoveData, state: &State, defender_ref: SideRef) -> f32 {
    let side = state.side(defender_ref);
    if side.condition_count(SideCondition::AuroraVeil) > 0 {
        return 0.5;
    }
    match m.category {
        MoveCategory::Physical if side.condition_count(SideCondition::Reflect) > 0 => 0.5,
        MoveCategory::Special if side.condition_count(SideCondition::LightScreen) > 0 => 0.5,
        _ => 1.0,
    }
}
