use boxfall_engine::EngineContext;
use serde::Serialize;

/// Final state of one entity, as printed by the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub id: u32,
    pub tag: String,
    pub x: f32,
    pub y: f32,
    pub vx: f64,
    pub vy: f64,
}

/// Position and velocity of every entity, in scene order.
pub fn snapshot(ctx: &EngineContext) -> Vec<EntityReport> {
    ctx.scene
        .iter()
        .map(|e| {
            let v = ctx.physics.velocity(e.id);
            EntityReport {
                id: e.id.0,
                tag: e.tag.clone(),
                x: e.pos.x,
                y: e.pos.y,
                vx: v.x,
                vy: v.y,
            }
        })
        .collect()
}

impl std::fmt::Display for EntityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>5} {:<12} x={:>9.3} y={:>9.3} vx={:>8.3} vy={:>8.3}",
            format!("#{}", self.id),
            self.tag,
            self.x,
            self.y,
            self.vx,
            self.vy
        )
    }
}
