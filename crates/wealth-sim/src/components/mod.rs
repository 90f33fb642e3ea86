//! ECS Components
//!
//! Entity components for agents plus the grid resource they live on.

pub mod agent;
pub mod grid;

pub use agent::*;
pub use grid::*;
