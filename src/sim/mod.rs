pub mod damage;
pub mod effects;
pub mod end_of_turn;
pub mod generator;
pub mod instructions;
pub mod mutator;
pub mod state;
pub mod switching;
