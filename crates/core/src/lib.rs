#![forbid(unsafe_code)]

//! Domain model for the quest learning games: challenges, mazes,
//! progress tracking and session summaries. Pure types only; retrieval
//! and progression live in the `content` and `services` crates.

pub mod error;
pub mod model;
pub mod time;

pub use error::Error;
pub use time::Clock;
