use boxfall_engine::{EngineContext, EntityId, Game, GameConfig, PhysicsResult, SceneDesc};

/// A game with no logic of its own: it spawns the scene and lets physics run.
pub struct SceneGame {
    desc: SceneDesc,
    ids: Vec<EntityId>,
}

impl SceneGame {
    pub fn new(desc: SceneDesc) -> Self {
        Self { desc, ids: Vec::new() }
    }

    pub fn desc(&self) -> &SceneDesc {
        &self.desc
    }

    /// IDs assigned at init, in the scene file's entity order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }
}

impl Game for SceneGame {
    fn config(&self) -> GameConfig {
        self.desc.config()
    }

    fn init(&mut self, ctx: &mut EngineContext) -> PhysicsResult<()> {
        self.ids = self.desc.populate(ctx)?;
        Ok(())
    }
}
