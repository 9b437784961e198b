pub mod instance;

pub use instance::{PositionInstance, PositionBuffer};
