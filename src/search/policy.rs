//! Turning a payoff matrix into a single decision.

use anyhow::{bail, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::search::{build_payoff_matrix, PayoffMatrix, SearchConfig};
use crate::sim::generator::{legal_options, MoveChoice};
use crate::sim::state::{SideRef, State};

/// How a row of the payoff matrix is scored before picking the best one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveSelectionPolicy {
    /// Maximize the worst case over the opponent's options.
    Safest,
    /// Maximize the mean over the opponent's options. Assumes the opponent
    /// picks uniformly at random, so row pruning is disabled.
    Average,
}

#[derive(Clone, Debug)]
pub struct MoveSearchResult {
    pub choice: MoveChoice,
    pub payoff: f32,
    pub matrix: PayoffMatrix,
}

/// Search from `state` and pick the bot's best option under `policy`. Ties
/// are broken uniformly at random with a caller-supplied seed so repeated
/// runs are reproducible.
pub fn select_best_move(
    state: &mut State,
    policy: MoveSelectionPolicy,
    config: &SearchConfig,
    seed: u64,
) -> Result<MoveSearchResult> {
    if state.battle_is_over() {
        bail!("battle is already over");
    }
    let bot_options = legal_options(state, SideRef::Bot);
    let opponent_options = legal_options(state, SideRef::Opponent);

    let config = match policy {
        MoveSelectionPolicy::Safest => *config,
        MoveSelectionPolicy::Average => SearchConfig {
            prune: false,
            ..*config
        },
    };
    let matrix = build_payoff_matrix(state, &bot_options, &opponent_options, &config);

    let mut best_payoff = f32::NEG_INFINITY;
    let mut best_rows: Vec<usize> = Vec::new();
    for row in 0..matrix.bot_options.len() {
        let score = match policy {
            MoveSelectionPolicy::Safest => matrix.row_worst_case(row),
            MoveSelectionPolicy::Average => matrix.row_average(row),
        };
        if score > best_payoff {
            best_payoff = score;
            best_rows.clear();
            best_rows.push(row);
        } else if score == best_payoff {
            best_rows.push(row);
        }
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let row = best_rows[rng.gen_range(0..best_rows.len())];
    Ok(MoveSearchResult {
        choice: matrix.bot_options[row].clone(),
        payoff: best_payoff,
        matrix,
    })
}
