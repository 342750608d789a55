use crate::data::types::{effectiveness_against, Type};
use crate::sim::effects::abilities;
use crate::sim::generator::immune_to_status;
use crate::sim::instructions::{Instruction, StateInstructions};
use crate::sim::mutator::StateMutator;
use crate::sim::state::{Boost, Side, SideCondition, SideRef, Status};

/// Instructions that wipe the active Pokemon's per-stay state: volatile
/// statuses, stat boosts, the toxic counter and the protect counter. Shared
/// by switching and phazing. Volatiles are emitted in sorted order so equal
/// outcomes produce identical instruction sequences.
pub fn clear_active_instructions(side: &Side, side_ref: SideRef) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut volatiles: Vec<_> = side.active.volatile_statuses.iter().copied().collect();
    volatiles.sort_unstable();
    for volatile_status in volatiles {
        instructions.push(Instruction::RemoveVolatileStatus {
            side_ref,
            volatile_status,
        });
    }
    for stat in Boost::ALL {
        let current = side.active.boost(stat);
        if current != 0 {
            instructions.push(Instruction::Boost {
                side_ref,
                stat,
                amount: -current,
            });
        }
    }
    for condition in [SideCondition::ToxicCount, SideCondition::Protect] {
        let count = side.condition_count(condition);
        if count > 0 {
            instructions.push(Instruction::SideEnd {
                side_ref,
                condition,
                amount: count,
            });
        }
    }
    instructions
}

/// Resolve a switch action: clear the outgoing Pokemon, bring in `next_id`,
/// run entry hazards and the incoming ability. Instructions are applied as
/// they are recorded so each step sees the state the previous one produced.
pub fn generate_switch(
    mutator: &mut StateMutator,
    branch: &mut StateInstructions,
    side_ref: SideRef,
    next_id: &str,
) {
    for instruction in clear_active_instructions(mutator.state.side(side_ref), side_ref) {
        mutator.record(instruction, branch);
    }

    // Choice locks do not persist across switches.
    let locked: Vec<String> = mutator
        .state
        .side(side_ref)
        .active
        .moves
        .iter()
        .filter(|slot| slot.disabled)
        .map(|slot| slot.id.clone())
        .collect();
    for move_id in locked {
        mutator.record(Instruction::EnableMove { side_ref, move_id }, branch);
    }

    let outgoing = &mutator.state.side(side_ref).active;
    let mut regenerator_heal = 0;
    let mut cured_status = None;
    if outgoing.is_alive() {
        if outgoing.ability_is("regenerator") && outgoing.hp < outgoing.max_hp {
            regenerator_heal = (outgoing.max_hp / 3).min(outgoing.max_hp - outgoing.hp);
        }
        if outgoing.ability_is("naturalcure") {
            cured_status = outgoing.status;
        }
    }
    if regenerator_heal > 0 {
        mutator.record(
            Instruction::Heal {
                side_ref,
                amount: regenerator_heal,
            },
            branch,
        );
    }
    if let Some(status) = cured_status {
        mutator.record(Instruction::RemoveStatus { side_ref, status }, branch);
    }

    let previous = mutator.state.side(side_ref).active.id.clone();
    mutator.record(
        Instruction::Switch {
            side_ref,
            previous,
            next: next_id.to_string(),
        },
        branch,
    );

    if !mutator.state.side(side_ref).active.item_is("heavydutyboots") {
        apply_entry_hazards(mutator, branch, side_ref);
    }

    if mutator.state.side(side_ref).active.is_alive() {
        for instruction in abilities::switch_in_instructions(mutator.state, side_ref) {
            mutator.record(instruction, branch);
        }
    }
}

fn apply_entry_hazards(mutator: &mut StateMutator, branch: &mut StateInstructions, side_ref: SideRef) {
    let rock_layers = mutator.state.side(side_ref).condition_count(SideCondition::StealthRock);
    if rock_layers > 0 {
        let incoming = &mutator.state.side(side_ref).active;
        let multiplier = effectiveness_against(Type::Rock, incoming.types);
        let amount = ((incoming.max_hp as f32 * multiplier / 8.0) as i16).min(incoming.hp);
        if amount > 0 {
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
        }
    }

    let incoming = &mutator.state.side(side_ref).active;
    if !incoming.is_alive() || !incoming.is_grounded() {
        return;
    }

    let spike_layers = mutator.state.side(side_ref).condition_count(SideCondition::Spikes);
    if spike_layers > 0 {
        let incoming = &mutator.state.side(side_ref).active;
        let fraction = match spike_layers {
            1 => 8,
            2 => 6,
            _ => 4,
        };
        let amount = (incoming.max_hp / fraction).min(incoming.hp);
        if amount > 0 {
            mutator.record(Instruction::Damage { side_ref, amount }, branch);
        }
        if !mutator.state.side(side_ref).active.is_alive() {
            return;
        }
    }

    if mutator.state.side(side_ref).condition_count(SideCondition::StickyWeb) > 0 {
        let amount = mutator
            .state
            .side(side_ref)
            .active
            .boost_headroom(Boost::Speed, -1);
        if amount != 0 {
            mutator.record(
                Instruction::Boost {
                    side_ref,
                    stat: Boost::Speed,
                    amount,
                },
                branch,
            );
        }
    }

    let tspike_layers = mutator.state.side(side_ref).condition_count(SideCondition::ToxicSpikes);
    if tspike_layers > 0 {
        let incoming = &mutator.state.side(side_ref).active;
        if incoming.has_type(Type::Poison) {
            mutator.record(
                Instruction::SideEnd {
                    side_ref,
                    condition: SideCondition::ToxicSpikes,
                    amount: tspike_layers,
                },
                branch,
            );
        } else {
            let status = if tspike_layers >= 2 {
                Status::Toxic
            } else {
                Status::Poison
            };
            if !immune_to_status(mutator.state, side_ref, status) {
                mutator.record(Instruction::ApplyStatus { side_ref, status }, branch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_util::{dummy, dummy_state};
    use crate::sim::state::{State, VolatileStatus, Weather};

    fn switch_instructions(state: &mut State) -> StateInstructions {
        let mut branch = StateInstructions::new();
        let mut mutator = StateMutator::new(state);
        generate_switch(&mut mutator, &mut branch, SideRef::Bot, "backup");
        mutator.reverse(&branch.instructions);
        branch
    }

    fn state_with_backup() -> State {
        let mut state = dummy_state();
        state
            .bot
            .reserve
            .insert("backup".to_string(), dummy("backup"));
        state
    }

    #[test]
    fn switch_clears_boosts_and_volatiles() {
        let mut state = state_with_backup();
        state.bot.active.boosts[Boost::Attack.index()] = 2;
        state
            .bot
            .active
            .volatile_statuses
            .insert(VolatileStatus::LeechSeed);
        let branch = switch_instructions(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::RemoveVolatileStatus {
                    side_ref: SideRef::Bot,
                    volatile_status: VolatileStatus::LeechSeed,
                },
                Instruction::Boost {
                    side_ref: SideRef::Bot,
                    stat: Boost::Attack,
                    amount: -2,
                },
                Instruction::Switch {
                    side_ref: SideRef::Bot,
                    previous: "bot".to_string(),
                    next: "backup".to_string(),
                },
            ]
        );
    }

    #[test]
    fn stealth_rock_damage_scales_with_type() {
        let mut state = state_with_backup();
        state
            .bot
            .side_conditions
            .insert(SideCondition::StealthRock, 1);
        if let Some(backup) = state.bot.reserve.get_mut("backup") {
            backup.types = [Type::Fire, Type::Flying];
            backup.max_hp = 160;
            backup.hp = 160;
        }
        let branch = switch_instructions(&mut state);
        assert!(branch.instructions.contains(&Instruction::Damage {
            side_ref: SideRef::Bot,
            amount: 80,
        }));
    }

    #[test]
    fn grounded_hazards_skip_flying_switchins() {
        let mut state = state_with_backup();
        state.bot.side_conditions.insert(SideCondition::Spikes, 2);
        if let Some(backup) = state.bot.reserve.get_mut("backup") {
            backup.types = [Type::Flying, Type::Normal];
        }
        let branch = switch_instructions(&mut state);
        assert_eq!(branch.instructions.len(), 1);
    }

    #[test]
    fn regenerator_heals_on_the_way_out() {
        let mut state = state_with_backup();
        state.bot.active.ability = "regenerator".to_string();
        state.bot.active.max_hp = 90;
        state.bot.active.hp = 50;
        let branch = switch_instructions(&mut state);
        assert_eq!(
            branch.instructions[0],
            Instruction::Heal {
                side_ref: SideRef::Bot,
                amount: 30,
            }
        );
    }

    #[test]
    fn natural_cure_drops_status_on_the_way_out() {
        let mut state = state_with_backup();
        state.bot.active.ability = "naturalcure".to_string();
        state.bot.active.status = Some(Status::Burn);
        let branch = switch_instructions(&mut state);
        assert_eq!(
            branch.instructions[0],
            Instruction::RemoveStatus {
                side_ref: SideRef::Bot,
                status: Status::Burn,
            }
        );
    }

    #[test]
    fn switch_in_weather_ability_fires_after_the_switch() {
        let mut state = state_with_backup();
        if let Some(backup) = state.bot.reserve.get_mut("backup") {
            backup.ability = "drought".to_string();
        }
        let branch = switch_instructions(&mut state);
        assert_eq!(
            branch.instructions,
            vec![
                Instruction::Switch {
                    side_ref: SideRef::Bot,
                    previous: "bot".to_string(),
                    next: "backup".to_string(),
                },
                Instruction::WeatherStart {
                    weather: Weather::Sun,
                    previous: None,
                },
            ]
        );
    }

    #[test]
    fn poison_switchin_absorbs_toxic_spikes() {
        let mut state = state_with_backup();
        state
            .bot
            .side_conditions
            .insert(SideCondition::ToxicSpikes, 2);
        if let Some(backup) = state.bot.reserve.get_mut("backup") {
            backup.types = [Type::Poison, Type::Normal];
        }
        let branch = switch_instructions(&mut state);
        assert!(branch.instructions.contains(&Instruction::SideEnd {
            side_ref: SideRef::Bot,
            condition: SideCondition::ToxicSpikes,
            amount: 2,
        }));
    }
}
