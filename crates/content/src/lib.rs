#![forbid(unsafe_code)]

//! Mock data layer: JSON-seeded in-memory catalog with simulated
//! latency, plus the single-owner progress store. Everything is served
//! as independent copies; there is no persistence.

pub mod catalog;
pub mod progress_store;
pub mod repository;

pub use catalog::{StaticCatalog, DEFAULT_LATENCY, MINI_GAME_REWARD};
pub use progress_store::{InMemoryProgressStore, PROGRESS_LATENCY};
pub use repository::{
    ChallengeSource, ContentError, MiniGameSource, ProgressStore, SeedError,
};
