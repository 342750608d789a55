//! Turn resolution: expands one (bot action, opponent action) pair into the
//! full set of probability-weighted outcome branches.
//!
//! Every step takes branches whose instructions are NOT applied to the state,
//! applies them, does its work through [`StateMutator::record`] so later
//! reads see fresh values, and reverses everything before returning. The
//! caller's state is therefore untouched once generation finishes.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};

use crate::data::moves::{
    get_move, Accuracy, MoveCategory, MoveData, MoveTarget, SecondaryKind, StatBoosts,
    FLAG_CONTACT, FLAG_POWDER, FLAG_PROTECT, FLAG_SOUND,
};
use crate::data::types::Type;
use crate::sim::damage::{calculate_damage, DamageRolls};
use crate::sim::effects::moves::{apply_move_transform, AttackContext};
use crate::sim::effects::{abilities, items};
use crate::sim::end_of_turn::add_end_of_turn_instructions;
use crate::sim::instructions::{canonicalize, Instruction, StateInstructions};
use crate::sim::mutator::StateMutator;
use crate::sim::state::{
    normalize_id, Boost, SideCondition, SideRef, State, Status, Terrain, VolatileStatus, Weather,
};
use crate::sim::switching::{clear_active_instructions, generate_switch};

const FULLY_PARALYZED_CHANCE: f64 = 0.25;
const WAKE_UP_CHANCE: f64 = 0.33;
const THAW_CHANCE: f64 = 0.20;

/// One side's action for the turn.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum MoveChoice {
    Move(String),
    Switch(String),
}

impl MoveChoice {
    pub fn is_switch(&self) -> bool {
        matches!(self, MoveChoice::Switch(_))
    }
}

impl fmt::Display for MoveChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveChoice::Move(id) => write!(f, "{id}"),
            MoveChoice::Switch(id) => write!(f, "switch {id}"),
        }
    }
}

impl FromStr for MoveChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<MoveChoice, Error> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix("switch") {
            // Only a bare "switch" keyword counts; "switcheroo" is a move.
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                let id = normalize_id(rest);
                if id.is_empty() {
                    bail!("empty switch target in {s:?}");
                }
                return Ok(MoveChoice::Switch(id));
            }
        }
        let id = normalize_id(s);
        if id.is_empty() {
            bail!("empty move choice");
        }
        Ok(MoveChoice::Move(id))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GenerateConfig {
    pub damage_rolls: DamageRolls,
}

impl Default for GenerateConfig {
    fn default() -> GenerateConfig {
        GenerateConfig {
            damage_rolls: DamageRolls::Average,
        }
    }
}

/// Expand a simultaneous action pair into canonicalized outcome branches.
/// The state is borrowed mutably as scratch space and is restored before
/// this returns.
pub fn generate_instructions(
    state: &mut State,
    bot_choice: &MoveChoice,
    opponent_choice: &MoveChoice,
    config: &GenerateConfig,
) -> Vec<StateInstructions> {
    let bot_first = bot_moves_first(state, bot_choice, opponent_choice);
    let order = if bot_first {
        [
            (SideRef::Bot, bot_choice, opponent_choice),
            (SideRef::Opponent, opponent_choice, bot_choice),
        ]
    } else {
        [
            (SideRef::Opponent, opponent_choice, bot_choice),
            (SideRef::Bot, bot_choice, opponent_choice),
        ]
    };

    let mut branches = vec![StateInstructions::new()];
    for (index, (side_ref, choice, other_choice)) in order.into_iter().enumerate() {
        let first_move = index == 0;
        let mut next = Vec::new();
        for branch in branches {
            let mut mutator = StateMutator::new(state);
            next.extend(generate_move(
                &mut mutator,
                side_ref,
                choice,
                other_choice,
                first_move,
                branch,
                config,
            ));
        }
        branches = next;
    }

    let first_ref = if bot_first {
        SideRef::Bot
    } else {
        SideRef::Opponent
    };
    for branch in branches.iter_mut() {
        let mut mutator = StateMutator::new(state);
        mutator.apply(&branch.instructions);
        add_end_of_turn_instructions(&mut mutator, branch, bot_choice, opponent_choice, first_ref);
        mutator.reverse(&branch.instructions);
    }

    canonicalize(branches)
}

/// All actions a side may legally take from this state: enabled moves with
/// PP plus switches to healthy reserves. A side with nothing else to do
/// falls back to an inert move rather than an empty list.
pub fn legal_options(state: &State, side_ref: SideRef) -> Vec<MoveChoice> {
    let side = state.side(side_ref);
    let mut options = Vec::new();
    if side.active.is_alive() {
        for slot in &side.active.moves {
            if !slot.disabled && slot.pp > 0 {
                options.push(MoveChoice::Move(slot.id.clone()));
            }
        }
    }
    for id in side.alive_reserve_ids() {
        options.push(MoveChoice::Switch(id.to_string()));
    }
    if options.is_empty() {
        options.push(MoveChoice::Move("splash".to_string()));
    }
    options
}

/// Speed after boosts, paralysis, Tailwind and speed-modifying abilities and
/// items. Trick Room is handled at the comparison site.
pub fn effective_speed(state: &State, side_ref: SideRef) -> f32 {
    let side = state.side(side_ref);
    let active = &side.active;
    let mut speed = active.boosted_stat(Boost::Speed) as f32;
    speed *= abilities::speed_modifier(active, state.weather, state.terrain);
    speed *= items::speed_modifier(active);
    if side.condition_count(SideCondition::Tailwind) > 0 {
        speed *= 2.0;
    }
    if active.status == Some(Status::Paralysis) && !active.ability_is("quickfeet") {
        speed *= 0.5;
    }
    speed
}

/// Whether the bot acts before the opponent. Switches precede moves and
/// order among themselves by speed, then priority, then effective speed;
/// exact ties go to the bot.
pub fn bot_moves_first(
    state: &State,
    bot_choice: &MoveChoice,
    opponent_choice: &MoveChoice,
) -> bool {
    match (bot_choice, opponent_choice) {
        (MoveChoice::Switch(_), MoveChoice::Move(_)) => return true,
        (MoveChoice::Move(_), MoveChoice::Switch(_)) => return false,
        (MoveChoice::Switch(_), MoveChoice::Switch(_)) => {}
        (MoveChoice::Move(bot_id), MoveChoice::Move(opponent_id)) => {
            let bot_priority = move_priority(state, SideRef::Bot, bot_id);
            let opponent_priority = move_priority(state, SideRef::Opponent, opponent_id);
            if bot_priority != opponent_priority {
                return bot_priority > opponent_priority;
            }
        }
    }
    let bot_speed = effective_speed(state, SideRef::Bot);
    let opponent_speed = effective_speed(state, SideRef::Opponent);
    if bot_speed == opponent_speed {
        return true;
    }
    (bot_speed > opponent_speed) != state.trick_room
}

fn move_priority(state: &State, side_ref: SideRef, move_id: &str) -> i8 {
    let m = get_move(move_id).copied().unwrap_or_else(MoveData::inert);
    let attacker = &state.side(side_ref).active;
    m.priority + abilities::priority_bonus(attacker, &m)
}

/// Accuracy multiplier from the attacker's accuracy stage against the
/// defender's evasion stage.
fn accuracy_stage_multiplier(stage: i8) -> f32 {
    let stage = stage.clamp(-6, 6);
    if stage >= 0 {
        (3 + stage) as f32 / 3.0
    } else {
        3.0 / (3 - stage) as f32
    }
}

/// Whether `status` can be applied to the target's active Pokemon right now.
/// Covers existing status, substitutes, type and ability immunities, terrain
/// protection and the sleep clause.
pub(crate) fn immune_to_status(state: &State, target_ref: SideRef, status: Status) -> bool {
    let side = state.side(target_ref);
    let target = &side.active;
    if target.status.is_some() || !target.is_alive() {
        return true;
    }
    if target.has_volatile(VolatileStatus::Substitute) {
        return true;
    }
    if status == Status::Sleep && side.has_sleeping_pokemon() {
        return true;
    }
    let type_immune = match status {
        Status::Poison | Status::Toxic => {
            target.has_type(Type::Poison) || target.has_type(Type::Steel)
        }
        Status::Burn => target.has_type(Type::Fire),
        Status::Paralysis => target.has_type(Type::Electric),
        Status::Freeze => target.has_type(Type::Ice),
        Status::Sleep => false,
    };
    if type_immune {
        return true;
    }
    if target.is_grounded() {
        match state.terrain {
            Some(Terrain::Misty) => return true,
            Some(Terrain::Electric) if status == Status::Sleep => return true,
            _ => {}
        }
    }
    abilities::blocks_status(target, status)
}

fn generate_move(
    mutator: &mut StateMutator,
    attacker_ref: SideRef,
    choice: &MoveChoice,
    defender_choice: &MoveChoice,
    first_move: bool,
    branch: StateInstructions,
    config: &GenerateConfig,
) -> Vec<StateInstructions> {
    if branch.frozen {
        return vec![branch];
    }

    let move_id = match choice {
        MoveChoice::Switch(next_id) => {
            let mut branch = branch;
            let prefix = branch.instructions.clone();
            mutator.apply(&prefix);
            generate_switch(mutator, &mut branch, attacker_ref, next_id);
            mutator.reverse(&branch.instructions);
            return vec![branch];
        }
        MoveChoice::Move(id) => id.as_str(),
    };

    // The move copy is transformed against the pre-turn state, before any
    // branch instructions are considered.
    let mut m = get_move(move_id).copied().unwrap_or_else(MoveData::inert);
    {
        let state = &*mutator.state;
        let attacker = &state.side(attacker_ref).active;
        let defender = &state.side(attacker_ref.other()).active;
        let defender_move = match defender_choice {
            MoveChoice::Move(id) => get_move(id),
            MoveChoice::Switch(_) => None,
        };
        let ctx = AttackContext {
            attacker,
            defender,
            defender_switching: defender_choice.is_switch(),
            defender_move,
            moving_first: first_move,
            weather: state.weather,
            terrain: state.terrain,
        };
        apply_move_transform(move_id, &mut m, &ctx);
    }
    let damage_rolls = if m.category != MoveCategory::Status {
        calculate_damage(mutator.state, attacker_ref, move_id, &m, config.damage_rolls)
    } else {
        None
    };

    // Gating: can the attacker act at all on this branch?
    let mut branch = branch;
    mutator.apply(&branch.instructions);
    let attacker = &mutator.state.side(attacker_ref).active;
    let cannot_act = !attacker.is_alive()
        || attacker
            .move_slot(move_id)
            .map(|slot| slot.disabled)
            .unwrap_or(false)
        || (m.category == MoveCategory::Status
            && attacker.has_volatile(VolatileStatus::Taunt));
    if cannot_act {
        mutator.reverse(&branch.instructions);
        return vec![branch];
    }

    if attacker.has_volatile(VolatileStatus::Flinch) {
        mutator.record(
            Instruction::RemoveVolatileStatus {
                side_ref: attacker_ref,
                volatile_status: VolatileStatus::Flinch,
            },
            &mut branch,
        );
        branch.frozen = true;
        mutator.reverse(&branch.instructions);
        return vec![branch];
    }

    // Major statuses that can stop the move outright split the branch here.
    let mut finished: Vec<StateInstructions> = Vec::new();
    let mut active: Vec<StateInstructions> = Vec::new();
    match mutator.state.side(attacker_ref).active.status {
        Some(Status::Paralysis) => {
            let mut stopped = branch.clone();
            stopped.update_percentage(FULLY_PARALYZED_CHANCE);
            stopped.frozen = true;
            finished.push(stopped);
            branch.update_percentage(1.0 - FULLY_PARALYZED_CHANCE);
            active.push(branch.clone());
        }
        Some(Status::Sleep) => {
            let mut asleep = branch.clone();
            asleep.update_percentage(1.0 - WAKE_UP_CHANCE);
            asleep.frozen = true;
            finished.push(asleep);
            branch.update_percentage(WAKE_UP_CHANCE);
            let wake = Instruction::RemoveStatus {
                side_ref: attacker_ref,
                status: Status::Sleep,
            };
            mutator.apply_one(&wake);
            branch.add(wake);
            active.push(branch.clone());
        }
        Some(Status::Freeze) => {
            // A damaging Fire move thaws its user with certainty.
            let fire_thaw = m.move_type == Type::Fire && m.category != MoveCategory::Status;
            if !fire_thaw {
                let mut still_frozen = branch.clone();
                still_frozen.update_percentage(1.0 - THAW_CHANCE);
                still_frozen.frozen = true;
                finished.push(still_frozen);
                branch.update_percentage(THAW_CHANCE);
            }
            let thaw = Instruction::RemoveStatus {
                side_ref: attacker_ref,
                status: Status::Freeze,
            };
            mutator.apply_one(&thaw);
            branch.add(thaw);
            active.push(branch.clone());
        }
        _ => active.push(branch.clone()),
    }
    mutator.reverse(&branch.instructions);

    // From here on each step applies a branch, mutates through record(), and
    // reverses before handing the branch to the next step.
    let mut branches = active;
    branches = run_step(mutator, branches, |mutator, branch| {
        protect_step(mutator, branch, attacker_ref, &m)
    });
    if m.category != MoveCategory::Status {
        match &damage_rolls {
            None => {
                // Immune defender or zeroed power: the move fails outright.
                finished.extend(branches);
                return finished;
            }
            Some(rolls) => {
                branches = run_step(mutator, branches, |mutator, branch| {
                    damage_step(mutator, branch, attacker_ref, &m, rolls)
                });
            }
        }
    } else if matches!(m.accuracy, Accuracy::Percent(_)) {
        branches = run_step(mutator, branches, |mutator, branch| {
            accuracy_step(mutator, branch, attacker_ref, &m)
        });
    }
    branches = run_step(mutator, branches, |mutator, branch| {
        field_step(mutator, branch, attacker_ref, move_id, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        side_condition_step(mutator, branch, attacker_ref, move_id, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        heal_step(mutator, branch, attacker_ref, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        boost_step(mutator, branch, attacker_ref, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        status_step(mutator, branch, attacker_ref, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        volatile_step(mutator, branch, attacker_ref, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        secondary_step(mutator, branch, attacker_ref, &m, first_move)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        drag_step(mutator, branch, attacker_ref, &m)
    });
    branches = run_step(mutator, branches, |mutator, branch| {
        pivot_step(mutator, branch, attacker_ref, &m)
    });

    finished.extend(branches);
    finished
}

/// Run one resolution step over every non-frozen branch. The step callback
/// receives the branch with its instructions applied and must leave all the
/// instructions it returns applied; reversal happens here.
fn run_step<F>(
    mutator: &mut StateMutator,
    branches: Vec<StateInstructions>,
    mut step: F,
) -> Vec<StateInstructions>
where
    F: FnMut(&mut StateMutator, StateInstructions) -> Vec<StateInstructions>,
{
    let mut out = Vec::with_capacity(branches.len());
    for branch in branches {
        if branch.frozen {
            out.push(branch);
            continue;
        }
        mutator.apply(&branch.instructions);
        let produced = step(mutator, branch);
        // Sub-branches share a common applied prefix; the step leaves the
        // state at the LAST produced branch.
        if let Some(last) = produced.last() {
            mutator.reverse(&last.instructions);
        }
        out.extend(produced);
    }
    out
}

fn protect_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    let defender_ref = attacker_ref.other();
    let defender = &mutator.state.side(defender_ref).active;
    let protected = m.flags & FLAG_PROTECT != 0
        && defender
            .volatile_statuses
            .iter()
            .any(|v| v.is_protect_effect());
    if !protected {
        return vec![branch];
    }
    if m.flags & FLAG_CONTACT != 0 {
        if defender.has_volatile(VolatileStatus::SpikyShield) {
            let attacker = &mutator.state.side(attacker_ref).active;
            let amount = (attacker.max_hp / 8).min(attacker.hp);
            if amount > 0 {
                mutator.record(
                    Instruction::Damage {
                        side_ref: attacker_ref,
                        amount,
                    },
                    &mut branch,
                );
            }
        } else if defender.has_volatile(VolatileStatus::BanefulBunker)
            && !immune_to_status(mutator.state, attacker_ref, Status::Poison)
        {
            mutator.record(
                Instruction::ApplyStatus {
                    side_ref: attacker_ref,
                    status: Status::Poison,
                },
                &mut branch,
            );
        }
    }
    branch.frozen = true;
    vec![branch]
}

fn hit_chance(mutator: &StateMutator, attacker_ref: SideRef, m: &MoveData) -> f64 {
    match m.accuracy {
        Accuracy::Always => 1.0,
        Accuracy::Percent(pct) => {
            let attacker = &mutator.state.side(attacker_ref).active;
            let defender = &mutator.state.side(attacker_ref.other()).active;
            let stage = attacker.boost(Boost::Accuracy) - defender.boost(Boost::Evasion);
            let chance = pct as f64 / 100.0 * accuracy_stage_multiplier(stage) as f64;
            chance.min(1.0)
        }
    }
}

/// Miss-side bookkeeping: crash damage and the Blunder Policy proc.
fn miss_effects(mutator: &mut StateMutator, branch: &mut StateInstructions, attacker_ref: SideRef, m: &MoveData) {
    if let Some(crash) = m.crash {
        let attacker = &mutator.state.side(attacker_ref).active;
        let amount = ((attacker.max_hp as f32 * crash) as i16).min(attacker.hp);
        if amount > 0 {
            mutator.record(
                Instruction::Damage {
                    side_ref: attacker_ref,
                    amount,
                },
                branch,
            );
        }
    }
    let attacker = &mutator.state.side(attacker_ref).active;
    if attacker.item_is("blunderpolicy") && attacker.is_alive() {
        let boost = attacker.boost_headroom(Boost::Speed, 2);
        let item = attacker.item.clone();
        mutator.record(
            Instruction::ChangeItem {
                side_ref: attacker_ref,
                new_item: None,
                previous_item: item,
            },
            branch,
        );
        if boost != 0 {
            mutator.record(
                Instruction::Boost {
                    side_ref: attacker_ref,
                    stat: Boost::Speed,
                    amount: boost,
                },
                branch,
            );
        }
    }
    branch.frozen = true;
}

fn damage_step(
    mutator: &mut StateMutator,
    branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
    rolls: &[i16],
) -> Vec<StateInstructions> {
    let defender_ref = attacker_ref.other();
    let chance = hit_chance(mutator, attacker_ref, m);
    let roll_weight = 1.0 / rolls.len() as f64;
    // Sound moves and infiltrator attackers hit the Pokemon behind a sub.
    let bypasses_substitute = m.flags & FLAG_SOUND != 0
        || mutator
            .state
            .side(attacker_ref)
            .active
            .ability_is("infiltrator");
    let mut out = Vec::new();

    // The incoming branch's instructions are applied exactly once; sub
    // branches therefore build on a shared prefix. Between sub-branches only
    // the instructions added locally are unwound.
    for (index, roll) in rolls.iter().enumerate() {
        let mut hit = branch.clone();
        hit.update_percentage(roll_weight * chance);
        let added_from = hit.instructions.len();

        let defender = &mutator.state.side(defender_ref).active;
        if defender.has_volatile(VolatileStatus::Substitute) && !bypasses_substitute {
            let sub_hp = defender.max_hp / 4;
            let dealt = (*roll).min(sub_hp);
            if *roll >= sub_hp {
                mutator.record(
                    Instruction::RemoveVolatileStatus {
                        side_ref: defender_ref,
                        volatile_status: VolatileStatus::Substitute,
                    },
                    &mut hit,
                );
            }
            post_hit_effects(mutator, &mut hit, attacker_ref, m, dealt);
        } else {
            let mut amount = (*roll).min(defender.hp);
            let sturdy = defender.at_full_health()
                && amount >= defender.hp
                && (defender.ability_is("sturdy")
                    && !abilities::ignores_defender_ability(
                        &mutator.state.side(attacker_ref).active,
                    )
                    || defender.item_is("focussash"));
            if sturdy {
                amount = defender.hp - 1;
                if defender.item_is("focussash") {
                    mutator.record(
                        Instruction::ChangeItem {
                            side_ref: defender_ref,
                            new_item: None,
                            previous_item: Some("focussash".to_string()),
                        },
                        &mut hit,
                    );
                }
            }
            if amount > 0 {
                mutator.record(
                    Instruction::Damage {
                        side_ref: defender_ref,
                        amount,
                    },
                    &mut hit,
                );
            }
            post_hit_effects(mutator, &mut hit, attacker_ref, m, amount);
            if !mutator.state.side(defender_ref).active.is_alive()
                || !mutator.state.side(attacker_ref).active.is_alive()
            {
                hit.frozen = true;
            }
        }

        // Unwind only this sub-branch's additions, keeping the prefix.
        let added: Vec<Instruction> = hit.instructions[added_from..].to_vec();
        let last_roll = index == rolls.len() - 1;
        if !(last_roll && chance >= 1.0) {
            mutator.reverse(&added);
        }
        out.push(hit);
    }

    if chance < 1.0 {
        let mut miss = branch;
        miss.update_percentage(1.0 - chance);
        miss_effects(mutator, &mut miss, attacker_ref, m);
        out.push(miss);
    }
    out
}

/// Drain, recoil and contact punishment, in that order, after damage lands.
fn post_hit_effects(
    mutator: &mut StateMutator,
    branch: &mut StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
    damage_dealt: i16,
) {
    if damage_dealt <= 0 {
        return;
    }
    let defender_ref = attacker_ref.other();
    if let Some(drain) = m.drain {
        let attacker = &mutator.state.side(attacker_ref).active;
        let amount = ((damage_dealt as f32 * drain) as i16).min(attacker.max_hp - attacker.hp);
        if amount > 0 {
            mutator.record(
                Instruction::Heal {
                    side_ref: attacker_ref,
                    amount,
                },
                branch,
            );
        }
    }
    if let Some(recoil) = m.recoil {
        let attacker = &mutator.state.side(attacker_ref).active;
        let amount = ((damage_dealt as f32 * recoil) as i16).min(attacker.hp);
        if amount > 0 {
            mutator.record(
                Instruction::Damage {
                    side_ref: attacker_ref,
                    amount,
                },
                branch,
            );
        }
    }
    if m.flags & FLAG_CONTACT != 0 {
        let defender = &mutator.state.side(defender_ref).active;
        let punish = items::contact_recoil(defender)
            .or_else(|| abilities::contact_recoil(defender));
        if let Some(amount) = punish {
            let attacker = &mutator.state.side(attacker_ref).active;
            let amount = amount.min(attacker.hp);
            if attacker.is_alive() && amount > 0 {
                mutator.record(
                    Instruction::Damage {
                        side_ref: attacker_ref,
                        amount,
                    },
                    branch,
                );
            }
        }
    }
}

/// Accuracy split for status moves; damaging moves fold accuracy into the
/// damage step instead.
fn accuracy_step(
    mutator: &mut StateMutator,
    branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    let chance = hit_chance(mutator, attacker_ref, m);
    if chance >= 1.0 {
        return vec![branch];
    }
    let mut miss = branch.clone();
    miss.update_percentage(1.0 - chance);
    miss.frozen = true;
    let mut hit = branch;
    hit.update_percentage(chance);
    vec![miss, hit]
}

/// Weather, terrain, Trick Room, item removal and item swapping.
fn field_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    move_id: &str,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some(weather) = m.weather {
        let replaceable = match mutator.state.weather {
            Some(current) => current != weather && !current.is_irreversible(),
            None => true,
        };
        if replaceable {
            let previous = mutator.state.weather;
            mutator.record(Instruction::WeatherStart { weather, previous }, &mut branch);
        }
    }
    if let Some(terrain) = m.terrain {
        if mutator.state.terrain != Some(terrain) {
            let previous = mutator.state.terrain;
            mutator.record(Instruction::TerrainStart { terrain, previous }, &mut branch);
        }
    }
    if m.trick_room {
        mutator.record(Instruction::ToggleTrickRoom, &mut branch);
    }
    if move_id == "knockoff" {
        let defender_ref = attacker_ref.other();
        let defender = &mutator.state.side(defender_ref).active;
        if defender.is_alive()
            && defender.item.is_some()
            && !defender.has_volatile(VolatileStatus::Substitute)
        {
            let previous_item = defender.item.clone();
            mutator.record(
                Instruction::ChangeItem {
                    side_ref: defender_ref,
                    new_item: None,
                    previous_item,
                },
                &mut branch,
            );
        }
    }
    if matches!(move_id, "trick" | "switcheroo") {
        let defender_ref = attacker_ref.other();
        let attacker_item = mutator.state.side(attacker_ref).active.item.clone();
        let defender_item = mutator.state.side(defender_ref).active.item.clone();
        if attacker_item != defender_item {
            mutator.record(
                Instruction::ChangeItem {
                    side_ref: attacker_ref,
                    new_item: defender_item.clone(),
                    previous_item: attacker_item.clone(),
                },
                &mut branch,
            );
            mutator.record(
                Instruction::ChangeItem {
                    side_ref: defender_ref,
                    new_item: attacker_item,
                    previous_item: defender_item,
                },
                &mut branch,
            );
        }
    }
    vec![branch]
}

fn side_condition_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    move_id: &str,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some((target, condition)) = m.side_condition {
        let target_ref = match target {
            MoveTarget::User => attacker_ref,
            MoveTarget::Opponent => attacker_ref.other(),
        };
        let current = mutator.state.side(target_ref).condition_count(condition);
        let allowed = if condition == SideCondition::AuroraVeil {
            mutator.state.weather == Some(Weather::Hail) && current == 0
        } else {
            current < condition.max_layers()
        };
        if allowed {
            mutator.record(
                Instruction::SideStart {
                    side_ref: target_ref,
                    condition,
                    amount: 1,
                },
                &mut branch,
            );
        }
    }

    if move_id == "wish" {
        let side = mutator.state.side(attacker_ref);
        if side.wish.0 == 0 {
            let amount = side.active.max_hp / 2;
            let previous_amount = side.wish.1;
            mutator.record(
                Instruction::WishStart {
                    side_ref: attacker_ref,
                    amount,
                    previous_amount,
                },
                &mut branch,
            );
        }
    }

    match move_id {
        "rapidspin" => clear_conditions(mutator, &mut branch, attacker_ref, HAZARDS),
        "defog" => {
            clear_conditions(mutator, &mut branch, attacker_ref, DEFOG_CLEARS);
            clear_conditions(mutator, &mut branch, attacker_ref.other(), DEFOG_CLEARS);
            if let Some(previous) = mutator.state.terrain {
                mutator.record(Instruction::TerrainEnd { previous }, &mut branch);
            }
        }
        _ => {}
    }
    vec![branch]
}

const HAZARDS: &[SideCondition] = &[
    SideCondition::Spikes,
    SideCondition::StealthRock,
    SideCondition::StickyWeb,
    SideCondition::ToxicSpikes,
];

const DEFOG_CLEARS: &[SideCondition] = &[
    SideCondition::Spikes,
    SideCondition::StealthRock,
    SideCondition::StickyWeb,
    SideCondition::ToxicSpikes,
    SideCondition::Reflect,
    SideCondition::LightScreen,
    SideCondition::AuroraVeil,
];

fn clear_conditions(
    mutator: &mut StateMutator,
    branch: &mut StateInstructions,
    side_ref: SideRef,
    conditions: &[SideCondition],
) {
    for condition in conditions {
        let amount = mutator.state.side(side_ref).condition_count(*condition);
        if amount > 0 {
            mutator.record(
                Instruction::SideEnd {
                    side_ref,
                    condition: *condition,
                    amount,
                },
                branch,
            );
        }
    }
}

fn heal_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some(heal) = m.heal {
        let target_ref = match heal.target {
            MoveTarget::User => attacker_ref,
            MoveTarget::Opponent => attacker_ref.other(),
        };
        let target = &mutator.state.side(target_ref).active;
        if target.is_alive() {
            let amount =
                ((target.max_hp as f32 * heal.fraction) as i16).min(target.max_hp - target.hp);
            if amount > 0 {
                mutator.record(
                    Instruction::Heal {
                        side_ref: target_ref,
                        amount,
                    },
                    &mut branch,
                );
            }
        }
    }
    vec![branch]
}

fn boost_instructions(
    mutator: &StateMutator,
    attacker_ref: SideRef,
    target: MoveTarget,
    boosts: &StatBoosts,
) -> Vec<Instruction> {
    let target_ref = match target {
        MoveTarget::User => attacker_ref,
        MoveTarget::Opponent => attacker_ref.other(),
    };
    let pokemon = &mutator.state.side(target_ref).active;
    if !pokemon.is_alive() {
        return Vec::new();
    }
    // Substitutes block stat drops from the other side.
    if target_ref != attacker_ref && pokemon.has_volatile(VolatileStatus::Substitute) {
        return Vec::new();
    }
    let mut out = Vec::new();
    for (stat, delta) in boosts.entries() {
        if delta == 0 {
            continue;
        }
        let amount = pokemon.boost_headroom(stat, delta);
        if amount != 0 {
            out.push(Instruction::Boost {
                side_ref: target_ref,
                stat,
                amount,
            });
        }
    }
    out
}

fn boost_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some((target, boosts)) = m.boosts {
        for instruction in boost_instructions(mutator, attacker_ref, target, &boosts) {
            mutator.record(instruction, &mut branch);
        }
    }
    if let Some(self_boosts) = m.self_boosts {
        for instruction in boost_instructions(mutator, attacker_ref, MoveTarget::User, &self_boosts)
        {
            mutator.record(instruction, &mut branch);
        }
    }
    vec![branch]
}

fn status_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some((target, status)) = m.status {
        let target_ref = match target {
            MoveTarget::User => attacker_ref,
            MoveTarget::Opponent => attacker_ref.other(),
        };
        let powder_blocked = m.flags & FLAG_POWDER != 0
            && (mutator.state.side(target_ref).active.has_type(Type::Grass)
                || mutator.state.side(target_ref).active.ability_is("overcoat"));
        if !powder_blocked && !immune_to_status(mutator.state, target_ref, status) {
            mutator.record(
                Instruction::ApplyStatus {
                    side_ref: target_ref,
                    status,
                },
                &mut branch,
            );
        }
    }
    vec![branch]
}

fn volatile_applicable(
    mutator: &StateMutator,
    attacker_ref: SideRef,
    target_ref: SideRef,
    volatile: VolatileStatus,
) -> bool {
    let target = &mutator.state.side(target_ref).active;
    if !target.is_alive() || target.has_volatile(volatile) {
        return false;
    }
    if target_ref != attacker_ref && target.has_volatile(VolatileStatus::Substitute) {
        return false;
    }
    match volatile {
        VolatileStatus::Substitute => target.hp > target.max_hp / 4,
        VolatileStatus::LeechSeed => !target.has_type(Type::Grass),
        // Protect-class moves fail on consecutive use.
        v if v.is_protect_effect() => {
            mutator
                .state
                .side(target_ref)
                .condition_count(SideCondition::Protect)
                == 0
        }
        _ => true,
    }
}

fn volatile_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if let Some((target, volatile_status)) = m.volatile_status {
        let target_ref = match target {
            MoveTarget::User => attacker_ref,
            MoveTarget::Opponent => attacker_ref.other(),
        };
        if volatile_applicable(mutator, attacker_ref, target_ref, volatile_status) {
            if volatile_status == VolatileStatus::Substitute {
                let cost = mutator.state.side(attacker_ref).active.max_hp / 4;
                mutator.record(
                    Instruction::Damage {
                        side_ref: attacker_ref,
                        amount: cost,
                    },
                    &mut branch,
                );
            }
            mutator.record(
                Instruction::ApplyVolatileStatus {
                    side_ref: target_ref,
                    volatile_status,
                },
                &mut branch,
            );
        }
    }
    vec![branch]
}

fn secondary_step(
    mutator: &mut StateMutator,
    branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
    first_move: bool,
) -> Vec<StateInstructions> {
    let secondary = match m.secondary {
        Some(secondary) => secondary,
        None => return vec![branch],
    };
    let target_ref = match secondary.target {
        MoveTarget::User => attacker_ref,
        MoveTarget::Opponent => attacker_ref.other(),
    };

    let instructions: Vec<Instruction> = match secondary.effect {
        SecondaryKind::Status(status) => {
            if immune_to_status(mutator.state, target_ref, status) {
                Vec::new()
            } else {
                vec![Instruction::ApplyStatus {
                    side_ref: target_ref,
                    status,
                }]
            }
        }
        SecondaryKind::VolatileStatus(volatile_status) => {
            let flinch_blocked = volatile_status == VolatileStatus::Flinch
                && (!first_move
                    || mutator.state.side(target_ref).active.ability_is("innerfocus"));
            if flinch_blocked
                || !volatile_applicable(mutator, attacker_ref, target_ref, volatile_status)
            {
                Vec::new()
            } else {
                vec![Instruction::ApplyVolatileStatus {
                    side_ref: target_ref,
                    volatile_status,
                }]
            }
        }
        SecondaryKind::Boosts(boosts) => {
            boost_instructions(mutator, attacker_ref, secondary.target, &boosts)
        }
    };
    if instructions.is_empty() {
        return vec![branch];
    }

    let chance = secondary.chance as f64;
    let mut skipped = branch.clone();
    skipped.update_percentage(1.0 - chance);
    let mut proc = branch;
    proc.update_percentage(chance);
    for instruction in instructions {
        mutator.record(instruction, &mut proc);
    }
    if chance >= 1.0 {
        return vec![proc];
    }
    vec![skipped, proc]
}

fn drag_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if !m.drag {
        return vec![branch];
    }
    let defender_ref = attacker_ref.other();
    let defender = &mutator.state.side(defender_ref).active;
    if !defender.is_alive() || defender.ability_is("suctioncups") {
        return vec![branch];
    }
    for instruction in clear_active_instructions(mutator.state.side(defender_ref), defender_ref) {
        mutator.record(instruction, &mut branch);
    }
    vec![branch]
}

/// U-turn class: the user leaves the field, but picking its replacement is a
/// fresh decision, so the branch ends here.
fn pivot_step(
    mutator: &mut StateMutator,
    mut branch: StateInstructions,
    attacker_ref: SideRef,
    m: &MoveData,
) -> Vec<StateInstructions> {
    if m.switch_after
        && mutator.state.side(attacker_ref).active.is_alive()
        && !mutator.state.side(attacker_ref).alive_reserve_ids().is_empty()
    {
        branch.frozen = true;
    }
    vec![branch]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_util::dummy_state;
    use crate::sim::state::MoveSlot;

    fn choice(s: &str) -> MoveChoice {
        s.parse().unwrap()
    }

    #[test]
    fn move_choice_tokens_round_trip() {
        assert_eq!(
            choice("switch Great Tusk"),
            MoveChoice::Switch("greattusk".to_string())
        );
        assert_eq!(choice("Ice Beam"), MoveChoice::Move("icebeam".to_string()));
        assert_eq!(choice("switch zapdos").to_string(), "switch zapdos");
        assert_eq!(
            choice("switcheroo"),
            MoveChoice::Move("switcheroo".to_string())
        );
        assert!("".parse::<MoveChoice>().is_err());
        assert!("switch".parse::<MoveChoice>().is_err());
        assert!("switch  ".parse::<MoveChoice>().is_err());
    }

    #[test]
    fn priority_beats_speed() {
        let mut state = dummy_state();
        state.opponent.active.stats.speed = 300;
        assert!(!bot_moves_first(
            &state,
            &choice("tackle"),
            &choice("tackle")
        ));
        assert!(bot_moves_first(
            &state,
            &choice("quickattack"),
            &choice("tackle")
        ));
    }

    #[test]
    fn switches_resolve_before_moves() {
        let mut state = dummy_state();
        state.opponent.active.stats.speed = 300;
        assert!(bot_moves_first(
            &state,
            &choice("switch backup"),
            &choice("tackle")
        ));
    }

    #[test]
    fn trick_room_inverts_speed_order() {
        let mut state = dummy_state();
        state.opponent.active.stats.speed = 300;
        state.trick_room = true;
        assert!(bot_moves_first(&state, &choice("tackle"), &choice("tackle")));
    }

    #[test]
    fn speed_ties_go_to_the_bot() {
        let state = dummy_state();
        assert!(bot_moves_first(&state, &choice("tackle"), &choice("tackle")));
    }

    #[test]
    fn paralysis_splits_the_branch() {
        let mut state = dummy_state();
        state.bot.active.status = Some(Status::Paralysis);
        let branches = generate_instructions(
            &mut state,
            &choice("splash"),
            &choice("splash"),
            &GenerateConfig::default(),
        );
        assert_eq!(branches.len(), 2);
        let total: f64 = branches.iter().map(|b| b.percentage).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(branches.iter().any(|b| b.frozen && (b.percentage - 0.25).abs() < 1e-9));
    }

    #[test]
    fn generation_restores_the_state() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("thunderbolt")];
        state.bot.active.status = Some(Status::Paralysis);
        let before = state.clone();
        let _ = generate_instructions(
            &mut state,
            &choice("thunderbolt"),
            &choice("tackle"),
            &GenerateConfig::default(),
        );
        assert_eq!(state, before);
    }

    #[test]
    fn sound_moves_hit_through_a_substitute() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("boomburst")];
        state
            .opponent
            .active
            .volatile_statuses
            .insert(VolatileStatus::Substitute);
        let branches = generate_instructions(
            &mut state,
            &choice("boomburst"),
            &choice("splash"),
            &GenerateConfig::default(),
        );
        // The substitute is untouched; the damage lands behind it.
        assert_eq!(branches.len(), 1);
        assert_eq!(
            branches[0].instructions,
            vec![Instruction::Damage {
                side_ref: SideRef::Opponent,
                amount: 100,
            }]
        );
    }

    #[test]
    fn a_substitute_absorbs_non_sound_attacks() {
        let mut state = dummy_state();
        state
            .opponent
            .active
            .volatile_statuses
            .insert(VolatileStatus::Substitute);
        let branches = generate_instructions(
            &mut state,
            &choice("tackle"),
            &choice("splash"),
            &GenerateConfig::default(),
        );
        assert_eq!(branches.len(), 1);
        assert!(!branches[0]
            .instructions
            .iter()
            .any(|i| matches!(i, Instruction::Damage { side_ref: SideRef::Opponent, .. })));
    }

    #[test]
    fn protect_fails_on_consecutive_use() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("protect")];
        state.bot.side_conditions.insert(SideCondition::Protect, 1);
        let branches = generate_instructions(
            &mut state,
            &choice("protect"),
            &choice("splash"),
            &GenerateConfig::default(),
        );
        // The failed protect applies no volatile; the counter still resets.
        assert_eq!(branches.len(), 1);
        assert_eq!(
            branches[0].instructions,
            vec![Instruction::SideEnd {
                side_ref: SideRef::Bot,
                condition: SideCondition::Protect,
                amount: 1,
            }]
        );
    }

    #[test]
    fn protect_blocks_the_incoming_move_and_arms_the_counter() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("protect")];
        let branches = generate_instructions(
            &mut state,
            &choice("protect"),
            &choice("tackle"),
            &GenerateConfig::default(),
        );
        // The blocked tackle deals no damage; the volatile wears off at the
        // end of the turn and arms the consecutive-use counter.
        assert_eq!(branches.len(), 1);
        assert_eq!(
            branches[0].instructions,
            vec![
                Instruction::ApplyVolatileStatus {
                    side_ref: SideRef::Bot,
                    volatile_status: VolatileStatus::Protect,
                },
                Instruction::RemoveVolatileStatus {
                    side_ref: SideRef::Bot,
                    volatile_status: VolatileStatus::Protect,
                },
                Instruction::SideStart {
                    side_ref: SideRef::Bot,
                    condition: SideCondition::Protect,
                    amount: 1,
                },
            ]
        );
    }

    #[test]
    fn accuracy_stage_table_extremes() {
        assert_eq!(accuracy_stage_multiplier(6), 3.0);
        assert_eq!(accuracy_stage_multiplier(-6), 1.0 / 3.0);
        assert_eq!(accuracy_stage_multiplier(0), 1.0);
    }
}
