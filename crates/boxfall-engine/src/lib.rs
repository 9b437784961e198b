pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig, EngineContext};
pub use api::types::EntityId;
pub use components::entity::{Entity, EntityKind};
pub use crate::core::body::{BodyDesc, BodyState};
pub use crate::core::collision::Aabb;
pub use crate::core::error::{PhysicsError, PhysicsResult};
pub use crate::core::params::WorldParams;
pub use crate::core::physics::{PhysicsWorld, CollisionPair, REST_EPSILON};
pub use crate::core::scene::Scene;
pub use crate::core::time::{Clock, FixedTimestep, ManualClock, MAX_STEPS_PER_FRAME};
pub use renderer::instance::{PositionInstance, PositionBuffer};
pub use assets::scene_desc::{SceneDesc, EntityDesc};
pub use systems::render::{build_position_buffer, build_moved_buffer};
