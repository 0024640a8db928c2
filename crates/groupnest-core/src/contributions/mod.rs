pub mod custom;
pub mod engine;
pub mod models;
