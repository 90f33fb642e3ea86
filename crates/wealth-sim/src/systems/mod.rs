//! ECS Systems
//!
//! Activation ordering and agent behaviour for one model step.

pub mod activation;
pub mod exchange;
pub mod movement;
pub mod step;

pub use activation::{shuffle_activation, ActivationOrder, AgentSet};
pub use exchange::{choose_recipient, transfer_one, TransferTally};
pub use movement::choose_destination;
pub use step::step_agents;
