pub mod moves;
pub mod types;
