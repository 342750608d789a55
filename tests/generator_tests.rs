use pokemon_battle_search::prelude::*;

mod common;
use common::{choice, make_pokemon, make_state, total_probability};

// 40 power, 110 attack into 100 defense at level 100, no STAB: 38.96 max,
// 35 on the average roll.
fn tackle_state() -> State {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("splash")];
    state.opponent.active.moves = vec![MoveSlot::new("tackle")];
    state.opponent.active.stats.attack = 110;
    state.opponent.active.types = [Type::Water, Type::Water];
    state
}

#[test]
fn tackle_into_splash_is_one_damage_branch() {
    let mut state = tackle_state();

    let branches = generate_instructions(
        &mut state,
        &choice("splash"),
        &choice("tackle"),
        &GenerateConfig::default(),
    );

    assert_eq!(branches.len(), 1);
    assert!((branches[0].percentage - 1.0).abs() < 1e-9);
    assert_eq!(
        branches[0].instructions,
        vec![Instruction::Damage {
            side_ref: SideRef::Bot,
            amount: 35,
        }]
    );
}

#[test]
fn min_max_average_rolls_split_into_three_branches() {
    let mut state = tackle_state();
    let config = GenerateConfig {
        damage_rolls: DamageRolls::MinMaxAverage,
    };

    let branches = generate_instructions(&mut state, &choice("splash"), &choice("tackle"), &config);

    let amounts: Vec<i16> = branches
        .iter()
        .map(|b| match b.instructions[0] {
            Instruction::Damage { amount, .. } => amount,
            _ => panic!("expected a damage instruction"),
        })
        .collect();
    assert_eq!(amounts, vec![32, 35, 38]);
    assert!((total_probability(&branches) - 1.0).abs() < 1e-6);
    for branch in &branches {
        assert!((branch.percentage - 1.0 / 3.0).abs() < 1e-9);
    }
}

#[test]
fn imperfect_accuracy_splits_hit_and_miss() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("thunderwave")];
    // The opponent acts first so its action is not gated on the paralysis
    // this turn inflicts.
    state.opponent.active.stats.speed = 300;

    let branches = generate_instructions(
        &mut state,
        &choice("thunderwave"),
        &choice("splash"),
        &GenerateConfig::default(),
    );

    assert_eq!(branches.len(), 2);
    assert!((total_probability(&branches) - 1.0).abs() < 1e-6);
    let hit = branches
        .iter()
        .find(|b| !b.instructions.is_empty())
        .unwrap();
    assert!((hit.percentage - 0.9).abs() < 1e-9);
    assert_eq!(
        hit.instructions,
        vec![Instruction::ApplyStatus {
            side_ref: SideRef::Opponent,
            status: Status::Paralysis,
        }]
    );
    let miss = branches.iter().find(|b| b.instructions.is_empty()).unwrap();
    assert!((miss.percentage - 0.1).abs() < 1e-9);
}

#[test]
fn a_sleeping_teammate_blocks_a_second_sleep() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("spore")];
    let mut drowsy = make_pokemon("drowsy");
    drowsy.status = Some(Status::Sleep);
    state.opponent.reserve.insert("drowsy".to_string(), drowsy);

    let branches = generate_instructions(
        &mut state,
        &choice("spore"),
        &choice("splash"),
        &GenerateConfig::default(),
    );

    assert_eq!(branches.len(), 1);
    assert!(branches[0].instructions.is_empty());
}

#[test]
fn drought_fires_after_the_switch_lands() {
    let mut state = make_state();
    let mut torkoal = make_pokemon("torkoal");
    torkoal.ability = "drought".to_string();
    state.bot.reserve.insert("torkoal".to_string(), torkoal);

    let branches = generate_instructions(
        &mut state,
        &choice("switch torkoal"),
        &choice("splash"),
        &GenerateConfig::default(),
    );

    assert_eq!(branches.len(), 1);
    assert_eq!(
        branches[0].instructions,
        vec![
            Instruction::Switch {
                side_ref: SideRef::Bot,
                previous: "bot".to_string(),
                next: "torkoal".to_string(),
            },
            Instruction::WeatherStart {
                weather: Weather::Sun,
                previous: None,
            },
        ]
    );
}

#[test]
fn pivot_moves_freeze_their_branch() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("uturn")];
    state
        .bot
        .reserve
        .insert("backup".to_string(), make_pokemon("backup"));

    let branches = generate_instructions(
        &mut state,
        &choice("uturn"),
        &choice("splash"),
        &GenerateConfig::default(),
    );

    assert_eq!(branches.len(), 1);
    assert!(branches[0].frozen);
    assert_eq!(
        branches[0].instructions,
        vec![Instruction::Damage {
            side_ref: SideRef::Opponent,
            amount: 55,
        }]
    );
}

#[test]
fn generation_restores_the_state_across_hazards_and_switches() {
    let mut state = make_state();
    state
        .bot
        .reserve
        .insert("backup".to_string(), make_pokemon("backup"));
    state
        .bot
        .side_conditions
        .insert(SideCondition::StealthRock, 1);
    state.opponent.active.status = Some(Status::Paralysis);
    let before = state.clone();

    let _ = generate_instructions(
        &mut state,
        &choice("switch backup"),
        &choice("tackle"),
        &GenerateConfig::default(),
    );

    assert_eq!(state, before);
}

#[test]
fn a_json_snapshot_drives_the_generator() {
    let snapshot = r#"{
        "bot": {
            "active": {
                "id": "starmie",
                "level": 100,
                "types": ["water", "psychic"],
                "hp": 261,
                "max_hp": 261,
                "stats": {
                    "attack": 139,
                    "defense": 207,
                    "special_attack": 263,
                    "special_defense": 207,
                    "speed": 361
                },
                "ability": "naturalcure",
                "item": "leftovers",
                "moves": [{"id": "surf", "pp": 24}, {"id": "thunderwave", "pp": 32}]
            }
        },
        "opponent": {
            "active": {
                "id": "tyranitar",
                "level": 100,
                "types": ["rock", "dark"],
                "hp": 404,
                "max_hp": 404,
                "stats": {
                    "attack": 367,
                    "defense": 256,
                    "special_attack": 203,
                    "special_defense": 237,
                    "speed": 243
                },
                "ability": "sandstream",
                "moves": [{"id": "crunch", "pp": 24}]
            },
            "side_conditions": {"stealth_rock": 1}
        }
    }"#;
    let mut state: State = serde_json::from_str(snapshot).unwrap();
    assert_eq!(state.opponent.side_conditions[&SideCondition::StealthRock], 1);

    let branches = generate_instructions(
        &mut state,
        &choice("surf"),
        &choice("crunch"),
        &GenerateConfig::default(),
    );

    assert!(!branches.is_empty());
    assert!((total_probability(&branches) - 1.0).abs() < 1e-6);
    assert!(branches[0].instructions.iter().any(|i| matches!(
        i,
        Instruction::Damage {
            side_ref: SideRef::Opponent,
            ..
        }
    )));
}

#[test]
fn probability_mass_is_conserved_under_stacked_chances() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("icebeam")];
    state.bot.active.status = Some(Status::Paralysis);
    state.opponent.active.moves = vec![MoveSlot::new("stoneedge")];

    let branches = generate_instructions(
        &mut state,
        &choice("icebeam"),
        &choice("stoneedge"),
        &GenerateConfig::default(),
    );

    assert!(branches.len() > 2);
    assert!((total_probability(&branches) - 1.0).abs() < 1e-6);
}
