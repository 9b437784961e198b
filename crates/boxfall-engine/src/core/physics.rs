use std::collections::{HashMap, HashSet};

use glam::{DVec2, Vec2};

use crate::api::types::EntityId;
use crate::components::entity::{Entity, EntityKind};
use crate::core::body::{BodyDesc, BodyState};
use crate::core::error::{
    finite, non_negative_friction, non_negative_restitution, positive_mass, PhysicsResult,
};
use crate::core::params::WorldParams;
use crate::core::scene::Scene;

/// Velocity and acceleration components smaller than this snap to zero at
/// the end of every tick, so settled bodies stop creeping.
pub const REST_EPSILON: f64 = 0.05;

/// Two entities whose boxes overlapped during the most recent tick.
/// `entity_a` is the one that came first in scene order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Owns the kinematic state of every tracked entity and advances it one tick
/// at a time. Entities themselves stay in the [`Scene`]; state here is keyed
/// by [`EntityId`] and created on first access with default values.
pub struct PhysicsWorld {
    params: WorldParams,
    bodies: HashMap<EntityId, BodyState>,
    collisions: Vec<CollisionPair>,
}

impl PhysicsWorld {
    /// Create a world with default parameters.
    pub fn new() -> Self {
        Self {
            params: WorldParams::default(),
            bodies: HashMap::new(),
            collisions: Vec::new(),
        }
    }

    /// Create a world with the given parameters, rejecting invalid ones.
    pub fn with_params(params: WorldParams) -> PhysicsResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ..Self::new()
        })
    }

    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Mutable access for the validated setters on [`WorldParams`].
    pub fn params_mut(&mut self) -> &mut WorldParams {
        &mut self.params
    }

    /// Attach state described by `desc` to `id`, replacing any existing state.
    /// Nothing is stored when any value is rejected.
    pub fn create_body(&mut self, id: EntityId, desc: &BodyDesc) -> PhysicsResult<()> {
        let body = BodyState {
            velocity: finite_vec("velocity", desc.velocity)?,
            acceleration: finite_vec("acceleration", desc.acceleration)?,
            mass: positive_mass(desc.mass)?,
            is_static: desc.is_static,
            friction: desc.friction.map(non_negative_friction).transpose()?,
            restitution: desc.restitution.map(non_negative_restitution).transpose()?,
        };
        self.bodies.insert(id, body);
        log::debug!("body created for {id} (static: {})", desc.is_static);
        Ok(())
    }

    /// Drop the state kept for `id`. The tick never does this on its own.
    pub fn remove_body(&mut self, id: EntityId) -> Option<BodyState> {
        let removed = self.bodies.remove(&id);
        if removed.is_some() {
            log::debug!("body removed for {id}");
        }
        removed
    }

    pub fn has_body(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id)
    }

    /// Number of entities with stored state.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// State for `id`, or the default state when none is stored yet.
    pub fn body(&self, id: EntityId) -> BodyState {
        self.bodies.get(&id).copied().unwrap_or_default()
    }

    fn body_mut(&mut self, id: EntityId) -> &mut BodyState {
        self.bodies.entry(id).or_insert_with(|| {
            log::debug!("body created lazily for {id}");
            BodyState::default()
        })
    }

    pub fn velocity(&self, id: EntityId) -> DVec2 {
        self.body(id).velocity
    }

    pub fn set_velocity(&mut self, id: EntityId, vel: DVec2) -> PhysicsResult<()> {
        let vel = finite_vec("velocity", vel)?;
        self.body_mut(id).velocity = vel;
        Ok(())
    }

    pub fn acceleration(&self, id: EntityId) -> DVec2 {
        self.body(id).acceleration
    }

    pub fn set_acceleration(&mut self, id: EntityId, accel: DVec2) -> PhysicsResult<()> {
        let accel = finite_vec("acceleration", accel)?;
        self.body_mut(id).acceleration = accel;
        Ok(())
    }

    /// Instantaneous velocity change of `impulse / mass`. Static bodies ignore it.
    pub fn apply_impulse(&mut self, id: EntityId, impulse: DVec2) -> PhysicsResult<()> {
        let impulse = finite_vec("impulse", impulse)?;
        let body = self.body_mut(id);
        if !body.is_static {
            body.velocity += impulse / body.mass;
        }
        Ok(())
    }

    pub fn mass(&self, id: EntityId) -> f64 {
        self.body(id).mass
    }

    pub fn set_mass(&mut self, id: EntityId, mass: f64) -> PhysicsResult<()> {
        let mass = positive_mass(mass)?;
        self.body_mut(id).mass = mass;
        Ok(())
    }

    pub fn is_static(&self, id: EntityId) -> bool {
        self.bodies.get(&id).is_some_and(|b| b.is_static)
    }

    pub fn set_static(&mut self, id: EntityId, is_static: bool) {
        self.body_mut(id).is_static = is_static;
    }

    /// Friction coefficient in effect for `id`, falling back to the world default.
    pub fn friction(&self, id: EntityId) -> f64 {
        self.body(id).friction.unwrap_or(self.params.default_friction())
    }

    pub fn set_friction(&mut self, id: EntityId, friction: f64) -> PhysicsResult<()> {
        let friction = non_negative_friction(friction)?;
        self.body_mut(id).friction = Some(friction);
        Ok(())
    }

    /// Restitution coefficient in effect for `id`, falling back to the world default.
    pub fn restitution(&self, id: EntityId) -> f64 {
        self.body(id)
            .restitution
            .unwrap_or(self.params.default_restitution())
    }

    pub fn set_restitution(&mut self, id: EntityId, restitution: f64) -> PhysicsResult<()> {
        let restitution = non_negative_restitution(restitution)?;
        self.body_mut(id).restitution = Some(restitution);
        Ok(())
    }

    /// Overlapping pairs seen by the most recent tick.
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collisions
    }

    /// Advance every active, planar, non-static entity in `scene` by `dt`
    /// seconds and return the ones whose position changed, in scene order.
    ///
    /// The step runs in three passes over the movers, in scene order:
    ///
    /// 1. Integration: gravity and stored acceleration feed velocity, ground
    ///    friction bleeds horizontal speed (never past zero), and velocity
    ///    moves the entity. Screen Y grows downward while velocity is Y-up.
    /// 2. Contacts: every overlapping pair is resolved once, by the mover
    ///    that comes first. Impulses are computed from post-integration
    ///    velocities into a pending table and applied together afterwards.
    ///    Only the resolving entity's restitution is used for the pair;
    ///    static partners act as infinitely heavy and are never pushed.
    /// 3. Constraints: X bounds and the ground line clamp position and
    ///    reflect velocity scaled by restitution, the ground also clears
    ///    vertical acceleration, and near-zero components snap to zero.
    ///
    /// Spatial entities are skipped. A non-finite or negative `dt` counts as 0.
    pub fn tick(&mut self, scene: &mut Scene, dt: f32) -> Vec<EntityId> {
        self.collisions.clear();
        let dt = if dt.is_finite() && dt > 0.0 { dt as f64 } else { 0.0 };

        let mut movers: Vec<(EntityId, Vec2)> = Vec::new();
        let mut spatial = 0usize;
        for entity in scene.iter_mut() {
            if !entity.active {
                continue;
            }
            match entity.kind {
                EntityKind::Planar => {}
                // No 3D integration exists.
                EntityKind::Spatial { .. } => {
                    spatial += 1;
                    continue;
                }
            }
            if self.bodies.get(&entity.id).is_some_and(|b| b.is_static) {
                continue;
            }
            movers.push((entity.id, entity.pos));
            let body = self.bodies.entry(entity.id).or_default();
            integrate(&self.params, entity, body, dt);
        }

        self.resolve_contacts(scene, &movers);

        let mut moved = Vec::new();
        for &(id, start) in &movers {
            let Some(entity) = scene.get_mut(id) else {
                continue;
            };
            let body = self.bodies.entry(id).or_default();
            constrain(&self.params, entity, body);
            if entity.pos != start {
                moved.push(id);
            }
        }

        log::trace!(
            "tick dt={dt:.4}: {} movers, {} moved, {} contacts, {spatial} spatial skipped",
            movers.len(),
            moved.len(),
            self.collisions.len(),
        );
        moved
    }

    // -- private helpers --

    fn resolve_contacts(&mut self, scene: &Scene, movers: &[(EntityId, Vec2)]) {
        let mut seen: HashSet<(EntityId, EntityId)> = HashSet::new();
        let mut pending: HashMap<EntityId, DVec2> = HashMap::new();

        for &(id, _) in movers {
            let Some(subject) = scene.get(id) else {
                continue;
            };
            let subject_center = subject.bounds().center();

            for other in scene.overlapping(id) {
                let key = if id < other { (id, other) } else { (other, id) };
                if !seen.insert(key) {
                    continue;
                }
                self.collisions.push(CollisionPair {
                    entity_a: id,
                    entity_b: other,
                });

                let Some(partner) = scene.get(other) else {
                    continue;
                };
                let Some((delta_a, delta_b)) =
                    self.contact_impulse(id, subject_center, other, partner.bounds().center())
                else {
                    continue;
                };

                *pending.entry(id).or_insert(DVec2::ZERO) += delta_a;
                if !self.is_static(other) {
                    *pending.entry(other).or_insert(DVec2::ZERO) += delta_b;
                }
            }
        }

        for &(id, _) in movers {
            if let Some(delta) = pending.remove(&id) {
                self.bodies.entry(id).or_default().velocity += delta;
            }
        }
    }

    /// Velocity changes for `a` and `b`, or `None` when the pair needs no
    /// impulse (coincident centres, already separating, or both immovable).
    fn contact_impulse(
        &self,
        a: EntityId,
        a_center: Vec2,
        b: EntityId,
        b_center: Vec2,
    ) -> Option<(DVec2, DVec2)> {
        // Normal from a to b, flipped into the Y-up velocity frame.
        let offset = DVec2::new(
            (b_center.x - a_center.x) as f64,
            (a_center.y - b_center.y) as f64,
        );
        let normal = offset.try_normalize()?;

        let body_a = self.body(a);
        let body_b = self.body(b);
        let velocity_along_normal = (body_b.velocity - body_a.velocity).dot(normal);
        if velocity_along_normal > 0.0 {
            return None;
        }

        let inv_a = body_a.inverse_mass();
        let inv_b = body_b.inverse_mass();
        let inv_sum = inv_a + inv_b;
        if inv_sum == 0.0 {
            return None;
        }

        let restitution = self.restitution(a);
        let j = -(1.0 + restitution) * velocity_along_normal / inv_sum;
        Some((-normal * (j * inv_a), normal * (j * inv_b)))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Per-entity steps
// ---------------------------------------------------------------------------

fn integrate(params: &WorldParams, entity: &mut Entity, body: &mut BodyState, dt: f64) {
    let gravity = params.gravity();
    let mut accel = body.acceleration;
    accel.y -= gravity;

    if entity.bottom() >= params.ground_y() {
        let mu = body.friction.unwrap_or(params.default_friction());
        // mu * m * g / m: the mass cancels.
        let friction_accel = mu * gravity;
        body.velocity.x = toward_zero(body.velocity.x, friction_accel * dt);
    }

    body.velocity += accel * dt;

    entity.pos.x += (body.velocity.x * dt) as f32;
    entity.pos.y -= (body.velocity.y * dt) as f32;
}

fn constrain(params: &WorldParams, entity: &mut Entity, body: &mut BodyState) {
    let restitution = body.restitution.unwrap_or(params.default_restitution());

    if entity.pos.x < params.min_x() {
        entity.pos.x = params.min_x();
        body.velocity.x = -body.velocity.x * restitution;
    } else if entity.pos.x > params.max_x() {
        entity.pos.x = params.max_x();
        body.velocity.x = -body.velocity.x * restitution;
    }

    if entity.bottom() > params.ground_y() {
        entity.pos.y = params.ground_y() - entity.size.y;
        body.velocity.y = -body.velocity.y * restitution;
        // Resting bodies carry no vertical acceleration.
        body.acceleration.y = 0.0;
    }

    snap_to_rest(&mut body.velocity);
    snap_to_rest(&mut body.acceleration);
}

fn toward_zero(value: f64, amount: f64) -> f64 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else if value < 0.0 {
        (value + amount).min(0.0)
    } else {
        value
    }
}

fn snap_to_rest(v: &mut DVec2) {
    if v.x.abs() < REST_EPSILON {
        v.x = 0.0;
    }
    if v.y.abs() < REST_EPSILON {
        v.y = 0.0;
    }
}

fn finite_vec(field: &'static str, v: DVec2) -> PhysicsResult<DVec2> {
    finite(field, v.x)?;
    finite(field, v.y)?;
    Ok(v)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PhysicsError;

    const DT: f32 = 1.0 / 60.0;

    fn boxed(id: u32, x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new(EntityId(id))
            .with_pos(Vec2::new(x, y))
            .with_size(Vec2::new(w, h))
    }

    fn world_with(configure: impl FnOnce(&mut WorldParams)) -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        configure(world.params_mut());
        world
    }

    fn pos(scene: &Scene, id: u32) -> Vec2 {
        scene.get(EntityId(id)).unwrap().pos
    }

    #[test]
    fn resting_entity_stays_put() {
        for restitution in [0.0, 0.3, 0.5, 0.9] {
            let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
            let mut scene = Scene::new();
            scene.spawn(boxed(1, 100.0, 468.0, 32.0, 32.0));
            world.set_restitution(EntityId(1), restitution).unwrap();

            for _ in 0..1000 {
                let moved = world.tick(&mut scene, DT);
                assert!(moved.is_empty(), "resting entity moved (e = {restitution})");
                assert_eq!(pos(&scene, 1), Vec2::new(100.0, 468.0));
            }
            assert_eq!(world.velocity(EntityId(1)).x, 0.0);
        }
    }

    #[test]
    fn free_fall_settles_on_ground() {
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 0.0, 0.0, 32.0, 32.0));
        world
            .create_body(
                EntityId(1),
                &BodyDesc::dynamic()
                    .with_mass(1.0)
                    .with_restitution(0.5)
                    .with_friction(0.5),
            )
            .unwrap();

        for _ in 0..6000 {
            world.tick(&mut scene, DT);
            let y = pos(&scene, 1).y;
            assert!(y + 32.0 <= 500.0, "sank below ground: y = {y}");
        }
        assert_eq!(pos(&scene, 1), Vec2::new(0.0, 468.0));

        for _ in 0..120 {
            assert!(world.tick(&mut scene, DT).is_empty());
        }
        assert_eq!(pos(&scene, 1).y, 468.0);
        assert!(world.velocity(EntityId(1)).y.abs() < 0.1);
    }

    #[test]
    fn bounce_never_gains_speed() {
        let restitution = 0.5;
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let gravity = world.params().gravity();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 50.0, 100.0, 20.0, 20.0));
        world.set_restitution(EntityId(1), restitution).unwrap();

        let mut bounces = 0;
        for _ in 0..3000 {
            let before = world.velocity(EntityId(1)).y;
            world.tick(&mut scene, DT);
            let after = world.velocity(EntityId(1)).y;
            if before < 0.0 && after > 0.0 {
                bounces += 1;
                let impact = before.abs() + gravity * DT as f64;
                assert!(after <= restitution * impact + 1e-9, "{after} > {restitution} * {impact}");
                assert!(after < impact);
            }
        }
        assert!(bounces > 1, "expected several bounces, saw {bounces}");
    }

    #[test]
    fn left_bound_reflects_and_scales() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, -10.0, 100.0, 10.0, 10.0));
        world
            .create_body(
                EntityId(1),
                &BodyDesc::dynamic()
                    .with_velocity(DVec2::new(-50.0, 0.0))
                    .with_restitution(0.5),
            )
            .unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(pos(&scene, 1).x, 0.0);
        assert_eq!(world.velocity(EntityId(1)).x, 25.0);
    }

    #[test]
    fn right_bound_reflects_and_scales() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 810.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(60.0, 0.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(pos(&scene, 1).x, 800.0);
        assert!((world.velocity(EntityId(1)).x - (-18.0)).abs() < 1e-9);
    }

    #[test]
    fn x_stays_within_bounds() {
        let mut world = PhysicsWorld::new();
        let (min_x, max_x) = (world.params().min_x(), world.params().max_x());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 400.0, 100.0, 10.0, 10.0));
        scene.spawn(boxed(2, 300.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(1.0e6, 0.0)).unwrap();
        world.set_velocity(EntityId(2), DVec2::new(-3.0e7, 40.0)).unwrap();

        for _ in 0..500 {
            world.tick(&mut scene, DT);
            for id in [1, 2] {
                let x = pos(&scene, id).x;
                assert!(x >= min_x && x <= max_x, "entity {id} escaped: x = {x}");
            }
        }
    }

    #[test]
    fn static_entity_is_never_touched() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 300.0, 200.0, 20.0));
        scene.spawn(boxed(2, 184.0, 200.0, 32.0, 32.0));
        world.create_body(EntityId(1), &BodyDesc::fixed()).unwrap();
        let platform_body = world.body(EntityId(1));

        let mut bounced = false;
        for _ in 0..600 {
            let moved = world.tick(&mut scene, DT);
            assert!(!moved.contains(&EntityId(1)));
            if !world.collisions().is_empty() && world.velocity(EntityId(2)).y > 0.0 {
                bounced = true;
            }
            let platform = pos(&scene, 1);
            assert_eq!(platform.x.to_bits(), 100.0f32.to_bits());
            assert_eq!(platform.y.to_bits(), 300.0f32.to_bits());
            assert_eq!(world.body(EntityId(1)), platform_body);
        }
        assert!(bounced, "falling box never bounced off the platform");
    }

    #[test]
    fn static_partner_is_not_pushed() {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        scene.spawn(boxed(2, 105.0, 100.0, 10.0, 10.0));
        world
            .create_body(
                EntityId(1),
                &BodyDesc::dynamic()
                    .with_velocity(DVec2::new(10.0, 0.0))
                    .with_restitution(1.0),
            )
            .unwrap();
        world.set_static(EntityId(2), true);

        world.tick(&mut scene, DT);

        assert!((world.velocity(EntityId(1)).x - (-10.0)).abs() < 1e-9);
        assert_eq!(world.velocity(EntityId(2)), DVec2::ZERO);
        assert_eq!(pos(&scene, 2), Vec2::new(105.0, 100.0));
    }

    fn head_on(a_first: bool, e_a: f64, e_b: f64) -> (DVec2, DVec2) {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        let a = boxed(1, 100.0, 100.0, 10.0, 10.0);
        let b = boxed(2, 105.0, 100.0, 10.0, 10.0);
        if a_first {
            scene.spawn(a);
            scene.spawn(b);
        } else {
            scene.spawn(b);
            scene.spawn(a);
        }
        world
            .create_body(
                EntityId(1),
                &BodyDesc::dynamic()
                    .with_velocity(DVec2::new(10.0, 0.0))
                    .with_restitution(e_a),
            )
            .unwrap();
        world
            .create_body(EntityId(2), &BodyDesc::dynamic().with_restitution(e_b))
            .unwrap();

        world.tick(&mut scene, DT);
        assert_eq!(world.collisions().len(), 1);
        (world.velocity(EntityId(1)), world.velocity(EntityId(2)))
    }

    #[test]
    fn elastic_head_on_exchanges_velocity() {
        let (va, vb) = head_on(true, 1.0, 1.0);
        assert!(va.x.abs() < 1e-9, "A should stop: {va:?}");
        assert!((vb.x - 10.0).abs() < 1e-9, "B should take A's speed: {vb:?}");
        assert_eq!(va.y, 0.0);
        assert_eq!(vb.y, 0.0);
    }

    #[test]
    fn scene_order_does_not_change_symmetric_result() {
        assert_eq!(head_on(true, 1.0, 1.0), head_on(false, 1.0, 1.0));
    }

    #[test]
    fn first_entity_restitution_governs_pair() {
        // A resolves the pair: its perfectly elastic coefficient applies.
        let (va, vb) = head_on(true, 1.0, 0.0);
        assert!(va.x.abs() < 1e-9);
        assert!((vb.x - 10.0).abs() < 1e-9);

        // B resolves the pair: fully inelastic, both share the momentum.
        let (va, vb) = head_on(false, 1.0, 0.0);
        assert!((va.x - 5.0).abs() < 1e-9);
        assert!((vb.x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn impulse_is_mass_weighted() {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        scene.spawn(boxed(2, 105.0, 100.0, 10.0, 10.0));
        world
            .create_body(
                EntityId(1),
                &BodyDesc::dynamic()
                    .with_velocity(DVec2::new(10.0, 0.0))
                    .with_restitution(1.0),
            )
            .unwrap();
        world
            .create_body(EntityId(2), &BodyDesc::dynamic().with_mass(3.0))
            .unwrap();

        world.tick(&mut scene, DT);

        // 1-D elastic: v_a' = (m_a - m_b) / (m_a + m_b) * v, v_b' = 2 m_a / (m_a + m_b) * v
        assert!((world.velocity(EntityId(1)).x - (-5.0)).abs() < 1e-9);
        assert!((world.velocity(EntityId(2)).x - 5.0).abs() < 1e-9);
    }

    #[test]
    fn separating_pair_gets_no_impulse() {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        scene.spawn(boxed(2, 105.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(-10.0, 0.0)).unwrap();
        world.set_velocity(EntityId(2), DVec2::new(10.0, 0.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(world.collisions().len(), 1);
        assert_eq!(world.velocity(EntityId(1)), DVec2::new(-10.0, 0.0));
        assert_eq!(world.velocity(EntityId(2)), DVec2::new(10.0, 0.0));
    }

    #[test]
    fn coincident_entities_are_skipped() {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        scene.spawn(boxed(2, 100.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(5.0, 0.0)).unwrap();
        world.set_velocity(EntityId(2), DVec2::new(5.0, 0.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(world.collisions().len(), 1);
        assert_eq!(world.velocity(EntityId(1)), DVec2::new(5.0, 0.0));
        assert_eq!(world.velocity(EntityId(2)), DVec2::new(5.0, 0.0));
    }

    #[test]
    fn ground_friction_stops_without_reversing() {
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 480.0, 20.0, 20.0));
        scene.spawn(boxed(2, 400.0, 480.0, 20.0, 20.0));
        world.set_velocity(EntityId(1), DVec2::new(1.0, 0.0)).unwrap();
        world.set_velocity(EntityId(2), DVec2::new(1.0, 0.0)).unwrap();
        world.set_mass(EntityId(2), 10.0).unwrap();

        for _ in 0..30 {
            world.tick(&mut scene, DT);
            let v1 = world.velocity(EntityId(1)).x;
            let v2 = world.velocity(EntityId(2)).x;
            assert!(v1 >= 0.0);
            assert_eq!(v1, v2, "friction deceleration must not depend on mass");
        }
        assert_eq!(world.velocity(EntityId(1)).x, 0.0);
        assert!(pos(&scene, 1).x > 100.0);
    }

    #[test]
    fn no_friction_in_the_air() {
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 20.0, 20.0));
        world.set_velocity(EntityId(1), DVec2::new(3.0, 0.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(world.velocity(EntityId(1)).x, 3.0);
    }

    #[test]
    fn ground_clamp_clears_vertical_acceleration() {
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 480.0, 20.0, 20.0));
        world.set_acceleration(EntityId(1), DVec2::new(0.0, -30.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(world.acceleration(EntityId(1)).y, 0.0);
        assert_eq!(pos(&scene, 1).y, 480.0);
    }

    #[test]
    fn gravity_does_not_accumulate_into_acceleration() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 0.0, 10.0, 10.0));

        for _ in 0..10 {
            world.tick(&mut scene, DT);
        }

        assert_eq!(world.acceleration(EntityId(1)), DVec2::ZERO);
        let expected = -world.params().gravity() * DT as f64 * 10.0;
        assert!((world.velocity(EntityId(1)).y - expected).abs() < 1e-9);
        assert!(pos(&scene, 1).y > 0.0, "entity should fall toward larger screen Y");
    }

    #[test]
    fn small_values_snap_to_zero() {
        let mut world = world_with(|p| p.set_gravity(0.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(0.04, -0.049)).unwrap();
        world.set_acceleration(EntityId(1), DVec2::new(0.01, 0.0)).unwrap();

        world.tick(&mut scene, DT);

        assert_eq!(world.velocity(EntityId(1)), DVec2::ZERO);
        assert_eq!(world.acceleration(EntityId(1)), DVec2::ZERO);
    }

    #[test]
    fn snap_threshold_is_exclusive() {
        let mut v = DVec2::new(REST_EPSILON, -REST_EPSILON);
        snap_to_rest(&mut v);
        assert_eq!(v, DVec2::new(0.05, -0.05));

        let mut v = DVec2::new(0.0499, -0.0499);
        snap_to_rest(&mut v);
        assert_eq!(v, DVec2::ZERO);
    }

    #[test]
    fn moved_lists_only_changed_positions() {
        let mut world = world_with(|p| p.set_ground_y(500.0).unwrap());
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 480.0, 20.0, 20.0));
        scene.spawn(boxed(2, 300.0, 100.0, 20.0, 20.0));
        scene.spawn(boxed(3, 600.0, 100.0, 20.0, 20.0));
        world.set_static(EntityId(3), true);

        world.tick(&mut scene, DT);
        let moved = world.tick(&mut scene, DT);

        assert_eq!(moved, vec![EntityId(2)]);
    }

    #[test]
    fn spatial_and_inactive_entities_are_ignored() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(
            boxed(1, 100.0, 100.0, 10.0, 10.0).with_kind(EntityKind::Spatial { z: 5.0, depth: 2.0 }),
        );
        scene.spawn(boxed(2, 200.0, 100.0, 10.0, 10.0).with_active(false));

        for _ in 0..10 {
            assert!(world.tick(&mut scene, DT).is_empty());
        }
        assert_eq!(pos(&scene, 1), Vec2::new(100.0, 100.0));
        assert_eq!(pos(&scene, 2), Vec2::new(200.0, 100.0));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn invalid_dt_moves_nothing() {
        let mut world = PhysicsWorld::new();
        let mut scene = Scene::new();
        scene.spawn(boxed(1, 100.0, 100.0, 10.0, 10.0));
        world.set_velocity(EntityId(1), DVec2::new(5.0, 5.0)).unwrap();

        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(world.tick(&mut scene, dt).is_empty());
        }
        assert_eq!(pos(&scene, 1), Vec2::new(100.0, 100.0));
        assert_eq!(world.velocity(EntityId(1)), DVec2::new(5.0, 5.0));
    }

    fn busy_scene() -> (PhysicsWorld, Scene) {
        let mut world = world_with(|p| p.set_ground_y(400.0).unwrap());
        let mut scene = Scene::new();
        let layout = [
            (1, 50.0, 10.0, 30.0, -4.0),
            (2, 60.0, 40.0, -20.0, 10.0),
            (3, 400.0, 200.0, 0.0, 0.0),
            (4, 410.0, 150.0, -80.0, 15.0),
            (5, 700.0, 350.0, 120.0, 0.0),
            (6, 20.0, 300.0, 5.0, 60.0),
        ];
        for (id, x, y, vx, vy) in layout {
            scene.spawn(boxed(id, x, y, 24.0, 24.0));
            world
                .create_body(
                    EntityId(id),
                    &BodyDesc::dynamic()
                        .with_velocity(DVec2::new(vx, vy))
                        .with_mass(1.0 + id as f64 * 0.5)
                        .with_restitution(0.2 + id as f64 * 0.1),
                )
                .unwrap();
        }
        scene.spawn(boxed(7, 0.0, 380.0, 800.0, 20.0));
        world.set_static(EntityId(7), true);
        (world, scene)
    }

    #[test]
    fn identical_runs_are_bit_identical() {
        let deltas = [1.0 / 60.0, 1.0 / 30.0, 1.0 / 120.0, 0.02];
        let (mut world_a, mut scene_a) = busy_scene();
        let (mut world_b, mut scene_b) = busy_scene();

        for i in 0..500 {
            let dt = deltas[i % deltas.len()];
            let moved_a = world_a.tick(&mut scene_a, dt);
            let moved_b = world_b.tick(&mut scene_b, dt);
            assert_eq!(moved_a, moved_b);
        }

        for (a, b) in scene_a.iter().zip(scene_b.iter()) {
            assert_eq!(a.pos.x.to_bits(), b.pos.x.to_bits());
            assert_eq!(a.pos.y.to_bits(), b.pos.y.to_bits());
            let (va, vb) = (world_a.velocity(a.id), world_b.velocity(b.id));
            assert_eq!(va.x.to_bits(), vb.x.to_bits());
            assert_eq!(va.y.to_bits(), vb.y.to_bits());
        }
    }

    #[test]
    fn state_is_lazy_and_defaulted() {
        let mut world = PhysicsWorld::new();
        let id = EntityId(9);
        assert_eq!(world.velocity(id), DVec2::ZERO);
        assert_eq!(world.mass(id), 1.0);
        assert!((world.friction(id) - 0.5).abs() < 1e-12);
        assert!((world.restitution(id) - 0.3).abs() < 1e-12);
        assert_eq!(world.body_count(), 0);

        world.set_velocity(id, DVec2::new(1.0, 0.0)).unwrap();
        assert!(world.has_body(id));
        assert_eq!(world.body_count(), 1);

        world.params_mut().set_default_restitution(0.4).unwrap();
        assert!((world.restitution(id) - 0.4).abs() < 1e-12);

        assert!(world.remove_body(id).is_some());
        assert!(!world.has_body(id));
    }

    #[test]
    fn invalid_body_values_are_rejected() {
        let mut world = PhysicsWorld::new();
        let id = EntityId(1);
        world.set_mass(id, 2.0).unwrap();

        assert_eq!(world.set_mass(id, 0.0), Err(PhysicsError::NonPositiveMass(0.0)));
        assert_eq!(world.mass(id), 2.0);
        assert!(world.set_friction(id, -0.5).is_err());
        assert!(world.set_restitution(id, -0.5).is_err());
        assert!(world.set_velocity(id, DVec2::new(f64::NAN, 0.0)).is_err());
        assert_eq!(world.body(id).friction(), None);

        let other = EntityId(2);
        assert!(world
            .create_body(other, &BodyDesc::dynamic().with_mass(-1.0))
            .is_err());
        assert!(!world.has_body(other));
    }

    #[test]
    fn impulse_scales_with_mass_and_skips_statics() {
        let mut world = PhysicsWorld::new();
        world.set_mass(EntityId(1), 4.0).unwrap();
        world.apply_impulse(EntityId(1), DVec2::new(8.0, -4.0)).unwrap();
        assert_eq!(world.velocity(EntityId(1)), DVec2::new(2.0, -1.0));

        world.set_static(EntityId(2), true);
        world.apply_impulse(EntityId(2), DVec2::new(8.0, 0.0)).unwrap();
        assert_eq!(world.velocity(EntityId(2)), DVec2::ZERO);
    }

    #[test]
    fn with_params_validates() {
        let params: WorldParams = serde_json::from_str(r#"{ "gravity": -3.0 }"#).unwrap();
        assert!(PhysicsWorld::with_params(params).is_err());
        assert!(PhysicsWorld::with_params(WorldParams::default()).is_ok());
    }
}
