use glam::DVec2;

/// Kinematic state the physics world keeps for one entity.
///
/// Velocity and acceleration use a Y-up convention: positive `y` moves an
/// entity toward the top of the screen. Fields are only mutated through
/// `PhysicsWorld`, which validates mass and material coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub(crate) velocity: DVec2,
    pub(crate) acceleration: DVec2,
    pub(crate) mass: f64,
    pub(crate) is_static: bool,
    pub(crate) friction: Option<f64>,
    pub(crate) restitution: Option<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            mass: 1.0,
            is_static: false,
            friction: None,
            restitution: None,
        }
    }
}

impl BodyState {
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> DVec2 {
        self.acceleration
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Own friction coefficient, `None` when the world default applies.
    pub fn friction(&self) -> Option<f64> {
        self.friction
    }

    /// Own restitution coefficient, `None` when the world default applies.
    pub fn restitution(&self) -> Option<f64> {
        self.restitution
    }

    /// Zero for static bodies, which behave as infinitely heavy in contacts.
    pub fn inverse_mass(&self) -> f64 {
        if self.is_static {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

/// Builder for describing a body before it is attached to an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub is_static: bool,
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub mass: f64,
    pub friction: Option<f64>,
    pub restitution: Option<f64>,
}

impl BodyDesc {
    /// A movable body at rest with unit mass and world-default materials.
    pub fn dynamic() -> Self {
        Self {
            is_static: false,
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            mass: 1.0,
            friction: None,
            restitution: None,
        }
    }

    /// An immovable obstacle.
    pub fn fixed() -> Self {
        Self {
            is_static: true,
            ..Self::dynamic()
        }
    }

    pub fn with_velocity(mut self, vel: DVec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_acceleration(mut self, accel: DVec2) -> Self {
        self.acceleration = accel;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = Some(friction);
        self
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = Some(restitution);
        self
    }
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self::dynamic()
    }
}
