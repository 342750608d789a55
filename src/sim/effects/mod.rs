pub mod abilities;
pub mod items;
pub mod moves;
