pub mod reference;
pub mod strategy;
