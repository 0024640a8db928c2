pub mod group;
pub mod resilience;
