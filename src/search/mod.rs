//! Depth-limited search over simultaneous action pairs. Each matrix cell is
//! the expected evaluation over every outcome branch of that pair; inner
//! plies are folded with the maximin (safest) rule.

pub mod eval;
pub mod policy;

use crate::sim::damage::DamageRolls;
use crate::sim::generator::{generate_instructions, legal_options, GenerateConfig, MoveChoice};
use crate::sim::mutator::StateMutator;
use crate::sim::state::{SideRef, State};

#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Extra plies searched beyond the immediate turn.
    pub depth: u8,
    /// Skip the rest of a bot option's row once it is provably worse than an
    /// already-evaluated option under the maximin rule.
    pub prune: bool,
    pub damage_rolls: DamageRolls,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            depth: 1,
            prune: true,
            damage_rolls: DamageRolls::Average,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PayoffMatrix {
    pub bot_options: Vec<MoveChoice>,
    pub opponent_options: Vec<MoveChoice>,
    /// Row per bot option, column per opponent option. `None` marks cells
    /// skipped by pruning.
    pub payoffs: Vec<Vec<Option<f32>>>,
}

impl PayoffMatrix {
    /// Worst evaluated payoff in a row. For pruned rows this is a partial
    /// minimum, which is an upper bound that pruning already proved
    /// insufficient, so maximin selection stays correct.
    pub fn row_worst_case(&self, row: usize) -> f32 {
        self.payoffs[row]
            .iter()
            .flatten()
            .fold(f32::INFINITY, |acc, v| acc.min(*v))
    }

    pub fn row_average(&self, row: usize) -> f32 {
        let evaluated: Vec<f32> = self.payoffs[row].iter().flatten().copied().collect();
        if evaluated.is_empty() {
            return f32::NEG_INFINITY;
        }
        evaluated.iter().sum::<f32>() / evaluated.len() as f32
    }

    /// The maximin value of the whole matrix.
    pub fn safest_value(&self) -> f32 {
        (0..self.bot_options.len())
            .map(|row| self.row_worst_case(row))
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Evaluate every (bot option, opponent option) pair from this state. The
/// state is scratch space for the search and is left exactly as it came in.
pub fn build_payoff_matrix(
    state: &mut State,
    bot_options: &[MoveChoice],
    opponent_options: &[MoveChoice],
    config: &SearchConfig,
) -> PayoffMatrix {
    let mut payoffs = vec![vec![None; opponent_options.len()]; bot_options.len()];
    let mut best_worst_case = f32::NEG_INFINITY;
    for (row, bot_choice) in bot_options.iter().enumerate() {
        let mut row_min = f32::INFINITY;
        for (col, opponent_choice) in opponent_options.iter().enumerate() {
            let payoff = pair_payoff(state, bot_choice, opponent_choice, config.depth, config);
            payoffs[row][col] = Some(payoff);
            row_min = row_min.min(payoff);
            if config.prune && row_min < best_worst_case {
                break;
            }
        }
        best_worst_case = best_worst_case.max(row_min);
    }
    PayoffMatrix {
        bot_options: bot_options.to_vec(),
        opponent_options: opponent_options.to_vec(),
        payoffs,
    }
}

fn pair_payoff(
    state: &mut State,
    bot_choice: &MoveChoice,
    opponent_choice: &MoveChoice,
    depth: u8,
    config: &SearchConfig,
) -> f32 {
    let generate_config = GenerateConfig {
        damage_rolls: config.damage_rolls,
    };
    let branches = generate_instructions(state, bot_choice, opponent_choice, &generate_config);
    let mut expected = 0.0_f32;
    for branch in &branches {
        StateMutator::new(state).apply(&branch.instructions);
        let score = if depth == 0 || branch.frozen || state.battle_is_over() {
            eval::evaluate(state)
        } else {
            let bot_options = legal_options(state, SideRef::Bot);
            let opponent_options = legal_options(state, SideRef::Opponent);
            let inner = SearchConfig {
                depth: depth - 1,
                ..*config
            };
            build_payoff_matrix(state, &bot_options, &opponent_options, &inner).safest_value()
        };
        StateMutator::new(state).reverse(&branch.instructions);
        expected += branch.percentage as f32 * score;
    }
    expected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_util::{dummy, dummy_state};
    use crate::sim::state::MoveSlot;

    #[test]
    fn matrix_has_a_cell_per_pair_without_pruning() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("splash")];
        state.opponent.active.moves = vec![MoveSlot::new("tackle")];
        let bot_options = legal_options(&state, SideRef::Bot);
        let opponent_options = legal_options(&state, SideRef::Opponent);
        let config = SearchConfig {
            depth: 0,
            prune: false,
            ..SearchConfig::default()
        };
        let matrix = build_payoff_matrix(&mut state, &bot_options, &opponent_options, &config);
        assert_eq!(matrix.payoffs.len(), 2);
        assert!(matrix.payoffs.iter().all(|row| row.iter().all(Option::is_some)));
    }

    #[test]
    fn attacking_beats_idling_in_the_matrix() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("tackle"), MoveSlot::new("splash")];
        state.opponent.active.moves = vec![MoveSlot::new("splash")];
        let bot_options = legal_options(&state, SideRef::Bot);
        let opponent_options = legal_options(&state, SideRef::Opponent);
        let config = SearchConfig {
            depth: 0,
            prune: false,
            ..SearchConfig::default()
        };
        let matrix = build_payoff_matrix(&mut state, &bot_options, &opponent_options, &config);
        assert!(matrix.row_worst_case(0) > matrix.row_worst_case(1));
    }

    #[test]
    fn search_leaves_the_state_untouched() {
        let mut state = dummy_state();
        state.bot.active.moves = vec![MoveSlot::new("tackle")];
        state
            .bot
            .reserve
            .insert("backup".to_string(), dummy("backup"));
        let before = state.clone();
        let bot_options = legal_options(&state, SideRef::Bot);
        let opponent_options = legal_options(&state, SideRef::Opponent);
        let config = SearchConfig {
            depth: 1,
            prune: true,
            ..SearchConfig::default()
        };
        let _ = build_payoff_matrix(&mut state, &bot_options, &opponent_options, &config);
        assert_eq!(state, before);
    }
}
