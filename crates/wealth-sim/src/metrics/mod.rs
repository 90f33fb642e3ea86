//! Wealth Metrics
//!
//! Pure functions over wealth snapshots: inequality and distribution shape.

pub mod distribution;
pub mod gini;

pub use distribution::{histogram, summarize, top_share, WealthStats};
pub use gini::gini;
