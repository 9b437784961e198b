//! Headless host for boxfall-engine.
//!
//! [`GameRunner`] drives any [`boxfall_engine::Game`] with a fixed timestep;
//! [`SceneGame`] is a game built entirely from a JSON scene file.

pub mod report;
pub mod runner;
pub mod scene_game;

pub use report::{snapshot, EntityReport};
pub use runner::GameRunner;
pub use scene_game::SceneGame;
