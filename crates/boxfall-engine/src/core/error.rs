use thiserror::Error;

use crate::api::types::EntityId;

/// Result type for physics configuration.
pub type PhysicsResult<T> = Result<T, PhysicsError>;

/// Rejected configuration values. The tick itself never fails.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PhysicsError {
    #[error("gravity must be >= 0, got {0}")]
    NegativeGravity(f64),
    #[error("friction coefficient must be >= 0, got {0}")]
    NegativeFriction(f64),
    #[error("restitution coefficient must be >= 0, got {0}")]
    NegativeRestitution(f64),
    #[error("mass must be > 0, got {0}")]
    NonPositiveMass(f64),
    #[error("world bounds inverted: min_x {min_x} must be below max_x {max_x}")]
    InvertedBounds { min_x: f32, max_x: f32 },
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
    #[error("fixed timestep must be > 0 seconds, got {0}")]
    NonPositiveTimestep(f32),
    #[error("entity {0} is already in the scene")]
    DuplicateEntity(EntityId),
}

/// Log a rejected value and hand the error back to the caller.
pub(crate) fn reject<T>(err: PhysicsError) -> PhysicsResult<T> {
    log::warn!("rejected configuration: {err}");
    Err(err)
}

pub(crate) fn finite(field: &'static str, value: f64) -> PhysicsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        reject(PhysicsError::NonFinite(field))
    }
}

pub(crate) fn non_negative_friction(value: f64) -> PhysicsResult<f64> {
    let value = finite("friction", value)?;
    if value < 0.0 {
        return reject(PhysicsError::NegativeFriction(value));
    }
    Ok(value)
}

pub(crate) fn non_negative_restitution(value: f64) -> PhysicsResult<f64> {
    let value = finite("restitution", value)?;
    if value < 0.0 {
        return reject(PhysicsError::NegativeRestitution(value));
    }
    Ok(value)
}

pub(crate) fn positive_mass(value: f64) -> PhysicsResult<f64> {
    let value = finite("mass", value)?;
    if value <= 0.0 {
        return reject(PhysicsError::NonPositiveMass(value));
    }
    Ok(value)
}

pub(crate) fn positive_timestep(value: f32) -> PhysicsResult<f32> {
    if !value.is_finite() {
        return reject(PhysicsError::NonFinite("fixed_dt"));
    }
    if value <= 0.0 {
        return reject(PhysicsError::NonPositiveTimestep(value));
    }
    Ok(value)
}
