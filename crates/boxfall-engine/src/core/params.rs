use serde::{Deserialize, Serialize};

use crate::core::error::{
    finite, non_negative_friction, non_negative_restitution, reject, PhysicsError, PhysicsResult,
};

/// World-wide physical constants.
///
/// Every setter validates its input and leaves the previous value in place
/// when it rejects one. Values loaded through serde bypass the setters, so
/// call [`WorldParams::validate`] before using a deserialized instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    gravity: f64,
    ground_y: f32,
    min_x: f32,
    max_x: f32,
    default_friction: f64,
    default_restitution: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ground_y: 600.0,
            min_x: 0.0,
            max_x: 800.0,
            default_friction: 0.5,
            default_restitution: 0.3,
        }
    }
}

impl WorldParams {
    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Screen-space Y of the ground line. Bottom edges rest on it.
    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Friction used by bodies without their own coefficient.
    pub fn default_friction(&self) -> f64 {
        self.default_friction
    }

    /// Restitution used by bodies without their own coefficient.
    pub fn default_restitution(&self) -> f64 {
        self.default_restitution
    }

    pub fn set_gravity(&mut self, gravity: f64) -> PhysicsResult<()> {
        let gravity = finite("gravity", gravity)?;
        if gravity < 0.0 {
            return reject(PhysicsError::NegativeGravity(gravity));
        }
        self.gravity = gravity;
        Ok(())
    }

    pub fn set_ground_y(&mut self, ground_y: f32) -> PhysicsResult<()> {
        finite("ground_y", ground_y as f64)?;
        self.ground_y = ground_y;
        Ok(())
    }

    /// Set both X bounds at once. Needed when the new range does not
    /// intersect the current one.
    pub fn set_bounds(&mut self, min_x: f32, max_x: f32) -> PhysicsResult<()> {
        check_bounds(min_x, max_x)?;
        self.min_x = min_x;
        self.max_x = max_x;
        Ok(())
    }

    pub fn set_min_x(&mut self, min_x: f32) -> PhysicsResult<()> {
        self.set_bounds(min_x, self.max_x)
    }

    pub fn set_max_x(&mut self, max_x: f32) -> PhysicsResult<()> {
        self.set_bounds(self.min_x, max_x)
    }

    pub fn set_default_friction(&mut self, friction: f64) -> PhysicsResult<()> {
        self.default_friction = non_negative_friction(friction)?;
        Ok(())
    }

    pub fn set_default_restitution(&mut self, restitution: f64) -> PhysicsResult<()> {
        self.default_restitution = non_negative_restitution(restitution)?;
        Ok(())
    }

    /// Check every field against the setter rules.
    pub fn validate(&self) -> PhysicsResult<()> {
        let gravity = finite("gravity", self.gravity)?;
        if gravity < 0.0 {
            return reject(PhysicsError::NegativeGravity(gravity));
        }
        finite("ground_y", self.ground_y as f64)?;
        check_bounds(self.min_x, self.max_x)?;
        non_negative_friction(self.default_friction)?;
        non_negative_restitution(self.default_restitution)?;
        Ok(())
    }
}

fn check_bounds(min_x: f32, max_x: f32) -> PhysicsResult<()> {
    finite("min_x", min_x as f64)?;
    finite("max_x", max_x as f64)?;
    if min_x >= max_x {
        return reject(PhysicsError::InvertedBounds { min_x, max_x });
    }
    Ok(())
}
