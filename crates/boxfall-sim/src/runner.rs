use boxfall_engine::{
    build_moved_buffer, EngineContext, EntityId, FixedTimestep, Game, GameConfig, PhysicsResult,
    PositionBuffer,
};

/// Generic game runner that wires up the engine loop.
///
/// Variable frame times go through a [`FixedTimestep`]; each fixed step runs
/// `Game::update` and then one physics tick. After the frame, the position
/// buffer holds every entity that moved during any of its steps.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    timestep: FixedTimestep,
    config: GameConfig,
    positions: PositionBuffer,
    frame_moved: Vec<EntityId>,
    initialized: bool,
    frames: u64,
    steps: u64,
}

impl<G: Game> GameRunner<G> {
    /// Build the runner from the game's config. An invalid timestep or
    /// invalid world parameters are rejected here.
    pub fn new(game: G) -> PhysicsResult<Self> {
        let config = game.config();
        config.validate()?;
        let ctx = EngineContext::with_params(config.world.clone())?;
        let timestep = FixedTimestep::new(config.fixed_dt);

        Ok(Self {
            game,
            ctx,
            timestep,
            config,
            positions: PositionBuffer::new(),
            frame_moved: Vec::new(),
            initialized: false,
            frames: 0,
            steps: 0,
        })
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) -> PhysicsResult<()> {
        self.game.init(&mut self.ctx)?;
        self.initialized = true;
        log::debug!(
            "runner initialized: {} entities, fixed dt {:.4}s",
            self.ctx.scene.len(),
            self.config.fixed_dt
        );
        Ok(())
    }

    /// Run one frame: zero or more fixed steps, then rebuild the position buffer.
    /// Returns the number of fixed steps taken.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }

        self.frame_moved.clear();
        let steps = self.timestep.accumulate(frame_dt);
        if steps == self.timestep.max_steps() {
            log::debug!("frame of {frame_dt:.4}s hit the step cap ({steps} steps)");
        }
        for _ in 0..steps {
            self.ctx.clear_frame_data();
            self.game.update(&mut self.ctx, self.timestep.dt());
            self.ctx.step_with_clock(&self.timestep);
            for id in self.ctx.moved() {
                if !self.frame_moved.contains(id) {
                    self.frame_moved.push(*id);
                }
            }
        }

        build_moved_buffer(&self.ctx.scene, &self.frame_moved, &mut self.positions);

        self.frames += 1;
        self.steps += steps as u64;
        steps
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Positions of the entities moved during the last frame.
    pub fn positions(&self) -> &PositionBuffer {
        &self.positions
    }

    /// Entities moved during the last frame, in first-moved order.
    pub fn moved(&self) -> &[EntityId] {
        &self.frame_moved
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
