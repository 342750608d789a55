use pokemon_battle_search::prelude::*;

mod common;
use common::{make_pokemon, make_state};

#[test]
fn safest_search_takes_the_knockout() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("splash"), MoveSlot::new("tackle")];
    state.opponent.active.hp = 40;

    let result = select_best_move(
        &mut state,
        MoveSelectionPolicy::Safest,
        &SearchConfig::default(),
        0,
    )
    .unwrap();

    assert_eq!(result.choice, MoveChoice::Move("tackle".to_string()));
}

#[test]
fn pruning_does_not_change_the_safest_value() {
    let mut state = make_state();
    state.bot.active.moves = vec![
        MoveSlot::new("tackle"),
        MoveSlot::new("icebeam"),
        MoveSlot::new("recover"),
    ];
    state.opponent.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("thunderwave")];
    state.bot.active.hp = 70;
    let bot_options = legal_options(&state, SideRef::Bot);
    let opponent_options = legal_options(&state, SideRef::Opponent);

    let pruned = build_payoff_matrix(
        &mut state,
        &bot_options,
        &opponent_options,
        &SearchConfig {
            depth: 0,
            prune: true,
            damage_rolls: DamageRolls::Average,
        },
    );
    let full = build_payoff_matrix(
        &mut state,
        &bot_options,
        &opponent_options,
        &SearchConfig {
            depth: 0,
            prune: false,
            damage_rolls: DamageRolls::Average,
        },
    );

    assert_eq!(pruned.safest_value(), full.safest_value());
}

#[test]
fn average_policy_evaluates_the_whole_matrix() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("splash")];
    state.opponent.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("recover")];

    let result = select_best_move(
        &mut state,
        MoveSelectionPolicy::Average,
        &SearchConfig {
            depth: 0,
            ..SearchConfig::default()
        },
        0,
    )
    .unwrap();

    assert!(result
        .matrix
        .payoffs
        .iter()
        .all(|row| row.iter().all(Option::is_some)));
    assert_eq!(result.choice, MoveChoice::Move("tackle".to_string()));
}

#[test]
fn same_seed_picks_the_same_move() {
    let mut state = make_state();
    state.bot.active.moves = vec![
        MoveSlot::new("splash"),
        MoveSlot::new("recover"),
        MoveSlot::new("protect"),
    ];
    let config = SearchConfig {
        depth: 0,
        ..SearchConfig::default()
    };

    let first = select_best_move(&mut state, MoveSelectionPolicy::Safest, &config, 42)
        .unwrap()
        .choice;
    let second = select_best_move(&mut state, MoveSelectionPolicy::Safest, &config, 42)
        .unwrap()
        .choice;

    assert_eq!(first, second);
}

#[test]
fn a_fainted_active_searches_over_switches() {
    let mut state = make_state();
    state.bot.active.hp = 0;
    state
        .bot
        .reserve
        .insert("backup".to_string(), make_pokemon("backup"));

    let result = select_best_move(
        &mut state,
        MoveSelectionPolicy::Safest,
        &SearchConfig::default(),
        0,
    )
    .unwrap();

    assert_eq!(result.choice, MoveChoice::Switch("backup".to_string()));
}

#[test]
fn deeper_search_still_restores_the_state() {
    let mut state = make_state();
    state.bot.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("thunderwave")];
    state.opponent.active.moves = vec![MoveSlot::new("tackle")];
    state
        .opponent
        .reserve
        .insert("backup".to_string(), make_pokemon("backup"));
    let before = state.clone();

    let _ = select_best_move(
        &mut state,
        MoveSelectionPolicy::Safest,
        &SearchConfig {
            depth: 2,
            ..SearchConfig::default()
        },
        0,
    )
    .unwrap();

    assert_eq!(state, before);
}
