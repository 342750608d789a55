use crate::data::types::Type;
use crate::sim::effects::{abilities, items};
use crate::sim::generator::MoveChoice;
use crate::sim::instructions::{Instruction, StateInstructions};
use crate::sim::mutator::StateMutator;
use crate::sim::state::{SideCondition, SideRef, State, Status, VolatileStatus, Weather};

/// The residual phase, run once per turn after both actions resolve. Each
/// step handles both sides (faster side first) before the next step starts,
/// matching in-game resolution order.
pub fn add_end_of_turn_instructions(
    mutator: &mut StateMutator,
    branch: &mut StateInstructions,
    bot_choice: &MoveChoice,
    opponent_choice: &MoveChoice,
    first: SideRef,
) {
    let order = [first, first.other()];

    for side_ref in order {
        weather_damage(mutator, branch, side_ref);
    }
    for side_ref in order {
        wish(mutator, branch, side_ref);
    }
    for side_ref in order {
        if let Some(instruction) = items::end_of_turn_instruction(mutator.state, side_ref) {
            mutator.record(instruction, branch);
        }
    }
    for side_ref in order {
        if let Some(instruction) = abilities::end_of_turn_instruction(mutator.state, side_ref) {
            mutator.record(instruction, branch);
        }
    }
    for side_ref in order {
        status_damage(mutator, branch, side_ref);
    }
    for side_ref in order {
        leech_seed(mutator, branch, side_ref);
    }
    for side_ref in order {
        volatile_expiry(mutator, branch, side_ref);
    }
    for (side_ref, choice) in [
        (SideRef::Bot, bot_choice),
        (SideRef::Opponent, opponent_choice),
    ] {
        choice_lock(mutator, branch, side_ref, choice);
    }
}

fn takes_residual_damage(state: &State, side_ref: SideRef) -> bool {
    let active = &state.side(side_ref).active;
    active.is_alive() && !active.ability_is("magicguard")
}

fn weather_damage(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    if !takes_residual_damage(mutator.state, side_ref) {
        return;
    }
    let active = &mutator.state.side(side_ref).active;
    let chip = (active.max_hp / 16).min(active.hp);
    let immune = match mutator.state.weather {
        Some(Weather::Sand) => {
            active.has_type(Type::Rock)
                || active.has_type(Type::Ground)
                || active.has_type(Type::Steel)
                || matches!(
                    active.ability.as_str(),
                    "overcoat" | "sandforce" | "sandrush" | "sandveil"
                )
        }
        Some(Weather::Hail) => {
            active.has_type(Type::Ice)
                || matches!(
                    active.ability.as_str(),
                    "overcoat" | "icebody" | "slushrush" | "snowcloak"
                )
        }
        _ => return,
    };
    if !immune && chip > 0 {
        mutator.record(
            Instruction::Damage {
                side_ref,
                amount: chip,
            },
            branch,
        );
    }
}

fn wish(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    let side = mutator.state.side(side_ref);
    let (turns, amount) = side.wish;
    if turns == 0 {
        return;
    }
    if turns == 1 {
        let active = &side.active;
        if active.is_alive() && active.hp < active.max_hp {
            let amount = amount.min(active.max_hp - active.hp);
            mutator.record(Instruction::Heal { side_ref, amount }, branch);
        }
    }
    mutator.record(Instruction::WishDecrement { side_ref }, branch);
}

fn status_damage(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    if !takes_residual_damage(mutator.state, side_ref) {
        return;
    }
    let active = &mutator.state.side(side_ref).active;
    match active.status {
        Some(Status::Burn) => {
            let amount = (active.max_hp / 16).min(active.hp);
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
        }
        Some(Status::Poison) if !active.ability_is("poisonheal") => {
            let amount = (active.max_hp / 8).min(active.hp);
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
        }
        Some(Status::Toxic) if !active.ability_is("poisonheal") => {
            let count = mutator.state.side(side_ref).condition_count(SideCondition::ToxicCount);
            let amount = (active.max_hp / 16 * (count as i16 + 1)).min(active.hp);
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
            mutator.record(
                Instruction::SideStart {
                    side_ref,
                    condition: SideCondition::ToxicCount,
                    amount: 1,
                },
                branch,
            );
        }
        _ => {}
    }
}

fn leech_seed(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    if !takes_residual_damage(mutator.state, side_ref) {
        return;
    }
    let active = &mutator.state.side(side_ref).active;
    if !active.has_volatile(VolatileStatus::LeechSeed) {
        return;
    }
    let amount = (active.max_hp / 8).min(active.hp);
    if amount == 0 {
        return;
    }
    mutator.record(Instruction::Damage { side_ref, amount }, branch);
    let other = &mutator.state.side(side_ref.other()).active;
    if other.is_alive() && other.hp < other.max_hp {
        let heal = amount.min(other.max_hp - other.hp);
        mutator.record(
            Instruction::Heal {
                side_ref: side_ref.other(),
                amount: heal,
            },
            branch,
        );
    }
}

/// Single-turn volatiles wear off and partial traps deal their chip damage.
/// An expiring Protect-class volatile arms the consecutive-use counter; a
/// turn without one disarms it.
fn volatile_expiry(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    let side = mutator.state.side(side_ref);
    let protect_count = side.condition_count(SideCondition::Protect);
    let active = &side.active;
    let mut expiring: Vec<VolatileStatus> = active
        .volatile_statuses
        .iter()
        .copied()
        .filter(|v| v.is_protect_effect() || *v == VolatileStatus::Roost)
        .collect();
    expiring.sort_unstable();
    let mut protected_this_turn = false;
    for volatile_status in expiring {
        protected_this_turn |= volatile_status.is_protect_effect();
        mutator.record(
            Instruction::RemoveVolatileStatus {
                side_ref,
                volatile_status,
            },
            branch,
        );
    }
    if protected_this_turn {
        mutator.record(
            Instruction::SideStart {
                side_ref,
                condition: SideCondition::Protect,
                amount: 1,
            },
            branch,
        );
    } else if protect_count > 0 {
        mutator.record(
            Instruction::SideEnd {
                side_ref,
                condition: SideCondition::Protect,
                amount: protect_count,
            },
            branch,
        );
    }

    let active = &mutator.state.side(side_ref).active;
    if active.has_volatile(VolatileStatus::PartiallyTrapped)
        && takes_residual_damage(mutator.state, side_ref)
    {
        let amount = (active.max_hp / 8).min(active.hp);
        if amount > 0 {
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
        }
    }
}

/// A choice item or Gorilla Tactics locks the user into the move it just
/// used.
fn choice_lock(
    mutator: &mut StateMutator,
    branch: &mut StateInstructions,
    side_ref: SideRef,
    choice: &MoveChoice,
) {
    let used = match choice {
        MoveChoice::Move(id) => id.clone(),
        MoveChoice::Switch(_) => return,
    };
    let active = &mutator.state.side(side_ref).active;
    if !active.is_alive() {
        return;
    }
    let locks = active
        .item
        .as_deref()
        .map(items::is_choice_item)
        .unwrap_or(false)
        || active.ability_is("gorillatactics");
    if !locks || active.move_slot(&used).is_none() {
        return;
    }
    let to_disable: Vec<String> = active
        .moves
        .iter()
        .filter(|slot| slot.id != used && !slot.disabled)
        .map(|slot| slot.id.clone())
        .collect();
    for move_id in to_disable {
        mutator.record(Instruction::DisableMove { side_ref, move_id }, branch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_util::dummy_state;
    use crate::sim::state::MoveSlot;

    fn run_end_of_turn(state: &mut State) -> StateInstructions {
        run_with_choices(
            state,
            &MoveChoice::Move("splash".to_string()),
            &MoveChoice::Move("splash".to_string()),
        )
    }

    fn run_with_choices(
        state: &mut State,
        bot: &MoveChoice,
        opponent: &MoveChoice,
    ) -> StateInstructions {
        let mut branch = StateInstructions::new();
        let mut mutator = StateMutator::new(state);
        add_end_of_turn_instructions(&mut mutator, &mut branch, bot, opponent, SideRef::Bot);
        mutator.reverse(&branch.instructions);
        branch
    }

    #[test]
    fn toxic_damage_escalates() {
        let mut state = dummy_state();
        state.bot.active.status = Some(Status::Toxic);
        state.bot.active.max_hp = 160;
        state.bot.active.hp = 160;
        state
            .bot
            .side_conditions
            .insert(SideCondition::ToxicCount, 2);
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::Damage {
                    side_ref: SideRef::Bot,
                    amount: 30,
                },
                Instruction::SideStart {
                    side_ref: SideRef::Bot,
                    condition: SideCondition::ToxicCount,
                    amount: 1,
                },
            ]
        );
    }

    #[test]
    fn leech_seed_drains_into_the_other_side() {
        let mut state = dummy_state();
        state
            .bot
            .active
            .volatile_statuses
            .insert(VolatileStatus::LeechSeed);
        state.bot.active.max_hp = 80;
        state.bot.active.hp = 80;
        state.opponent.active.hp = 95;
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::Damage {
                    side_ref: SideRef::Bot,
                    amount: 10,
                },
                Instruction::Heal {
                    side_ref: SideRef::Opponent,
                    amount: 5,
                },
            ]
        );
    }

    #[test]
    fn wish_heals_on_its_second_turn() {
        let mut state = dummy_state();
        state.bot.wish = (1, 50);
        state.bot.active.hp = 60;
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::Heal {
                    side_ref: SideRef::Bot,
                    amount: 40,
                },
                Instruction::WishDecrement {
                    side_ref: SideRef::Bot,
                },
            ]
        );
    }

    #[test]
    fn choice_item_locks_into_the_used_move() {
        let mut state = dummy_state();
        state.bot.active.item = Some("choicescarf".to_string());
        state.bot.active.moves = vec![
            MoveSlot::new("tackle"),
            MoveSlot::new("surf"),
            MoveSlot::new("thunderbolt"),
        ];
        let branch = run_with_choices(
            &mut state,
            &MoveChoice::Move("surf".to_string()),
            &MoveChoice::Move("splash".to_string()),
        );
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::DisableMove {
                    side_ref: SideRef::Bot,
                    move_id: "tackle".to_string(),
                },
                Instruction::DisableMove {
                    side_ref: SideRef::Bot,
                    move_id: "thunderbolt".to_string(),
                },
            ]
        );
    }

    #[test]
    fn an_expiring_protect_arms_the_counter() {
        let mut state = dummy_state();
        state
            .bot
            .active
            .volatile_statuses
            .insert(VolatileStatus::Protect);
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
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
    fn a_turn_without_protecting_disarms_the_counter() {
        let mut state = dummy_state();
        state.bot.side_conditions.insert(SideCondition::Protect, 1);
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![Instruction::SideEnd {
                side_ref: SideRef::Bot,
                condition: SideCondition::Protect,
                amount: 1,
            }]
        );
    }

    #[test]
    fn sand_chips_non_immune_actives() {
        let mut state = dummy_state();
        state.weather = Some(Weather::Sand);
        state.opponent.active.types = [Type::Rock, Type::Rock];
        let branch = run_end_of_turn(&mut state);
        assert_eq!(
            branch.instructions,
            vec![Instruction::Damage {
                side_ref: SideRef::Bot,
                amount: 6,
            }]
        );
    }
}
