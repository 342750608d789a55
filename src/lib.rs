//! A two-player simultaneous-turn battle engine built around a reversible
//! instruction log, plus a depth-limited payoff-matrix search on top of it.
//!
//! The main entry points are [`sim::generator::generate_instructions`] for
//! expanding one turn into weighted outcome branches and
//! [`search::policy::select_best_move`] for picking an action.

pub mod data;
pub mod search;
pub mod sim;

pub use search::policy::select_best_move;
pub use sim::generator::generate_instructions;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::data::moves::{get_move, MoveCategory, MoveData};
    pub use crate::data::types::Type;
    pub use crate::search::eval::evaluate;
    pub use crate::search::policy::{select_best_move, MoveSearchResult, MoveSelectionPolicy};
    pub use crate::search::{build_payoff_matrix, PayoffMatrix, SearchConfig};
    pub use crate::sim::damage::DamageRolls;
    pub use crate::sim::generator::{
        generate_instructions, legal_options, GenerateConfig, MoveChoice,
    };
    pub use crate::sim::instructions::{Instruction, StateInstructions};
    pub use crate::sim::mutator::StateMutator;
    pub use crate::sim::state::{
        Boost, MoveSlot, Pokemon, PokemonStats, Side, SideCondition, SideRef, State, Status,
        Terrain, VolatileStatus, Weather,
    };
}
