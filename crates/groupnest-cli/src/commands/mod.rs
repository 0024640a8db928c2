pub mod contributions;
pub mod evaluate;
pub mod metrics;
