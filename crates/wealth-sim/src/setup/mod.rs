//! World Setup
//!
//! Grid creation and agent spawning.

pub mod agents;

pub use agents::*;
