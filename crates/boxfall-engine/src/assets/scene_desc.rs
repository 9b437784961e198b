use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::api::game::{EngineContext, GameConfig};
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::body::BodyDesc;
use crate::core::error::PhysicsResult;
use crate::core::params::WorldParams;

/// A scene loaded from JSON: world parameters plus the initial entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDesc {
    /// World parameters; omitted fields take their defaults.
    #[serde(default)]
    pub world: WorldParams,
    /// Fixed timestep in seconds.
    #[serde(default = "default_fixed_dt")]
    pub fixed_dt: f32,
    /// Entities in spawn order.
    #[serde(default)]
    pub entities: Vec<EntityDesc>,
}

/// One entity and its initial body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDesc {
    #[serde(default)]
    pub tag: String,
    /// Top-left corner, `[x, y]`.
    pub pos: Vec2,
    /// `[w, h]` (default: `[1, 1]`).
    #[serde(default = "default_size")]
    pub size: Vec2,
    /// Y-up velocity, `[vx, vy]`.
    #[serde(default)]
    pub velocity: DVec2,
    #[serde(default)]
    pub acceleration: DVec2,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Falls back to the world default when absent.
    #[serde(default)]
    pub friction: Option<f64>,
    /// Falls back to the world default when absent.
    #[serde(default)]
    pub restitution: Option<f64>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

fn default_fixed_dt() -> f32 {
    1.0 / 60.0
}

fn default_size() -> Vec2 {
    Vec2::ONE
}

fn default_mass() -> f64 {
    1.0
}

impl SceneDesc {
    /// Parse a scene from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: self.fixed_dt,
            world: self.world.clone(),
        }
    }

    /// Spawn every entity into `ctx`, in order. Stops at the first rejected
    /// body; entities spawned before it stay in the scene.
    pub fn populate(&self, ctx: &mut EngineContext) -> PhysicsResult<Vec<EntityId>> {
        let mut ids = Vec::with_capacity(self.entities.len());
        for desc in &self.entities {
            let id = ctx.next_id();
            let entity = Entity::new(id)
                .with_tag(desc.tag.clone())
                .with_pos(desc.pos)
                .with_size(desc.size);
            ids.push(ctx.spawn_with_body(entity, desc.body())?);
        }
        log::info!("scene populated with {} entities", ids.len());
        Ok(ids)
    }
}

impl EntityDesc {
    pub fn body(&self) -> BodyDesc {
        BodyDesc {
            is_static: self.is_static,
            velocity: self.velocity,
            acceleration: self.acceleration,
            mass: self.mass,
            friction: self.friction,
            restitution: self.restitution,
        }
    }
}
