//! Fixed heuristic evaluation of a battle state, from the bot's point of
//! view. Higher is better for the bot.

use crate::sim::state::{Boost, Pokemon, Side, SideCondition, State, Status, VolatileStatus};

const POKEMON_ALIVE: f32 = 30.0;
const POKEMON_HP: f32 = 100.0;

const BURN: f32 = -25.0;
const FROZEN: f32 = -40.0;
const SLEEP: f32 = -25.0;
const PARALYZED: f32 = -25.0;
const POISON: f32 = -10.0;
const TOXIC: f32 = -30.0;

const LEECH_SEED: f32 = -30.0;
const SUBSTITUTE: f32 = 40.0;
const CONFUSION: f32 = -20.0;

const REFLECT: f32 = 20.0;
const LIGHT_SCREEN: f32 = 20.0;
const AURORA_VEIL: f32 = 40.0;
const TAILWIND: f32 = 7.0;
const STEALTH_ROCK: f32 = -10.0;
const SPIKES: f32 = -7.0;
const TOXIC_SPIKES: f32 = -7.0;
const STICKY_WEB: f32 = -25.0;

pub fn evaluate(state: &State) -> f32 {
    evaluate_side(&state.bot) - evaluate_side(&state.opponent)
}

fn evaluate_side(side: &Side) -> f32 {
    let mut score = evaluate_pokemon(&side.active);
    for pokemon in side.reserve.values() {
        score += evaluate_pokemon(pokemon);
    }

    // Hazards hurt proportionally to how many Pokemon still have to come in.
    let incoming = side.reserve.values().filter(|p| p.is_alive()).count() as f32;
    for (condition, count) in &side.side_conditions {
        let count = *count as f32;
        score += match condition {
            SideCondition::Reflect => REFLECT * count,
            SideCondition::LightScreen => LIGHT_SCREEN * count,
            SideCondition::AuroraVeil => AURORA_VEIL * count,
            SideCondition::Tailwind => TAILWIND * count,
            SideCondition::StealthRock => STEALTH_ROCK * count * incoming,
            SideCondition::Spikes => SPIKES * count * incoming,
            SideCondition::ToxicSpikes => TOXIC_SPIKES * count * incoming,
            SideCondition::StickyWeb => STICKY_WEB * count * incoming,
            SideCondition::ToxicCount | SideCondition::Protect => 0.0,
        };
    }
    score
}

fn evaluate_pokemon(pokemon: &Pokemon) -> f32 {
    if !pokemon.is_alive() {
        return 0.0;
    }
    let mut score = POKEMON_ALIVE + POKEMON_HP * pokemon.hp_fraction();
    score += match pokemon.status {
        Some(Status::Burn) => BURN,
        Some(Status::Freeze) => FROZEN,
        Some(Status::Sleep) => SLEEP,
        Some(Status::Paralysis) => PARALYZED,
        Some(Status::Poison) => POISON,
        Some(Status::Toxic) => TOXIC,
        None => 0.0,
    };
    for volatile in &pokemon.volatile_statuses {
        score += match volatile {
            VolatileStatus::LeechSeed => LEECH_SEED,
            VolatileStatus::Substitute => SUBSTITUTE,
            VolatileStatus::Confusion => CONFUSION,
            _ => 0.0,
        };
    }
    for stat in Boost::ALL {
        let weight = match stat {
            Boost::Speed => 25.0,
            Boost::Accuracy | Boost::Evasion => 3.0,
            _ => 15.0,
        };
        score += weight * pokemon.boost(stat) as f32;
    }
    score
}
