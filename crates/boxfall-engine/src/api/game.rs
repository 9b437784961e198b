use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::body::BodyDesc;
use crate::core::error::{positive_timestep, reject, PhysicsError, PhysicsResult};
use crate::core::params::WorldParams;
use crate::core::physics::{CollisionPair, PhysicsWorld};
use crate::core::scene::Scene;
use crate::core::time::Clock;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Gravity, ground line, X bounds and default materials.
    pub world: WorldParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world: WorldParams::default(),
        }
    }
}

impl GameConfig {
    /// Reject a non-positive or non-finite timestep and invalid world parameters.
    pub fn validate(&self) -> PhysicsResult<()> {
        positive_timestep(self.fixed_dt)?;
        self.world.validate()
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure bodies.
    fn init(&mut self, ctx: &mut EngineContext) -> PhysicsResult<()>;

    /// Called once per fixed step, before physics. Apply forces, spawn/despawn entities.
    fn update(&mut self, _ctx: &mut EngineContext, _dt: f32) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub physics: PhysicsWorld,
    next_id: u32,
    moved: Vec<EntityId>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            physics: PhysicsWorld::new(),
            next_id: 1,
            moved: Vec::new(),
        }
    }

    /// Create an EngineContext with custom world parameters.
    pub fn with_params(params: WorldParams) -> PhysicsResult<Self> {
        Ok(Self {
            physics: PhysicsWorld::with_params(params)?,
            ..Self::new()
        })
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity with default physics state. Returns its ID.
    pub fn spawn(&mut self, entity: Entity) -> PhysicsResult<EntityId> {
        let id = self.claim_id(entity.id)?;
        self.scene.spawn(entity);
        Ok(id)
    }

    /// Spawn an entity together with its body. The entity is only added when
    /// its ID is free and every value in `desc` is accepted.
    pub fn spawn_with_body(&mut self, entity: Entity, desc: BodyDesc) -> PhysicsResult<EntityId> {
        let id = self.claim_id(entity.id)?;
        self.physics.create_body(id, &desc)?;
        self.scene.spawn(entity);
        Ok(id)
    }

    /// Refuse IDs already in the scene. IDs not handed out by `next_id` push
    /// the counter past them so later allocations cannot collide.
    fn claim_id(&mut self, id: EntityId) -> PhysicsResult<EntityId> {
        if self.scene.contains(id) {
            return reject(PhysicsError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        Ok(id)
    }

    /// Despawn an entity, cleaning up its physics state if present.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.physics.remove_body(id);
        self.scene.despawn(id)
    }

    /// Entities moved by the most recent physics step.
    pub fn moved(&self) -> &[EntityId] {
        &self.moved
    }

    /// Get collision pairs from the most recent physics step.
    pub fn collisions(&self) -> &[CollisionPair] {
        self.physics.collisions()
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.moved.clear();
    }

    /// Run one physics tick of `dt` seconds over the scene.
    pub fn step_physics(&mut self, dt: f32) {
        self.moved = self.physics.tick(&mut self.scene, dt);
    }

    /// Run one physics tick using the clock's frame time.
    pub fn step_with_clock(&mut self, clock: &impl Clock) {
        self.step_physics(clock.frame_time());
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}
