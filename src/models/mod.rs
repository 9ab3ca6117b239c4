//! Core data models for league scouting.

mod comparison;
mod confidence;
mod facts;
mod game;
mod ids;
mod league;
mod stats;

pub use comparison::*;
pub use confidence::*;
pub use facts::*;
pub use game::*;
pub use ids::*;
pub use league::*;
pub use stats::*;
