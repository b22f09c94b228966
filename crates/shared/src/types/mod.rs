//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{round_hours, round_money, round_rate};
