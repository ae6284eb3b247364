//! Post-classification filtering: strategy selection and the direct filter

pub mod direct;
pub mod strategy;

pub use direct::filter_by_value;
pub use strategy::{ArgumentSource, FilterStrategy, NONE_STRATEGY, StrategyBindings, StrategyError};
