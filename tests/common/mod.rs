#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use pokemon_battle_search::prelude::*;

/// A level 100 normal type with flat 100 stats and tackle.
pub fn make_pokemon(id: &str) -> Pokemon {
    Pokemon {
        id: id.to_string(),
        level: 100,
        types: [Type::Normal, Type::Normal],
        hp: 100,
        max_hp: 100,
        stats: PokemonStats {
            attack: 100,
            defense: 100,
            special_attack: 100,
            special_defense: 100,
            speed: 100,
        },
        boosts: [0; 7],
        status: None,
        volatile_statuses: HashSet::new(),
        ability: String::new(),
        item: None,
        moves: vec![MoveSlot::new("tackle")],
        weight_kg: 50.0,
    }
}

pub fn make_state() -> State {
    State {
        bot: Side {
            active: make_pokemon("bot"),
            reserve: HashMap::new(),
            side_conditions: HashMap::new(),
            wish: (0, 0),
        },
        opponent: Side {
            active: make_pokemon("opponent"),
            reserve: HashMap::new(),
            side_conditions: HashMap::new(),
            wish: (0, 0),
        },
        weather: None,
        terrain: None,
        trick_room: false,
    }
}

pub fn choice(s: &str) -> MoveChoice {
    s.parse().unwrap()
}

pub fn total_probability(branches: &[StateInstructions]) -> f64 {
    branches.iter().map(|b| b.percentage).sum()
}
