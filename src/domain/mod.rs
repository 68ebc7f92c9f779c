//! Domain layer - match and commentary types plus shared primitives.

pub mod commentary;
pub mod foundation;
pub mod matches;
