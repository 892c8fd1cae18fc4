//! Space Trash - a toroidal universe of planets, drifting trash and collector ships
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity store, physics, collisions, ticks)
//! - `config`: Universe construction parameters
//! - `protocol`: Connect/move request and response messages
//! - `snapshot`: Read-only view of a tick for renderers

pub mod config;
pub mod error;
pub mod protocol;
pub mod sim;
pub mod snapshot;

pub use config::{PlanetLayout, UniverseConfig};
pub use error::{ConfigError, EntityKind, SimError};
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Planet defaults
    pub const PLANET_MASS: f32 = 10.0;
    pub const PLANET_RADIUS: f32 = 20.0;
    /// Upper bound on planets (one per letter A-Z)
    pub const MAX_PLANETS: usize = 26;

    /// Trash defaults
    pub const TRASH_MASS: f32 = 1.0;
    pub const TRASH_RADIUS: f32 = 4.0;
    /// Velocity kept per tick (1% decay)
    pub const TRASH_FRICTION: f32 = 0.99;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 10.0;

    /// Gravitational constant
    pub const GRAVITATIONAL_CONSTANT: f32 = 1.0;
    /// Below this distance a planet exerts no pull (avoids the 1/d² singularity)
    pub const MIN_GRAVITY_DISTANCE: f32 = 0.1;

    /// Rejection-sampling attempts before placing unchecked
    pub const PLACEMENT_MAX_ATTEMPTS: u32 = 1000;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Wrap a coordinate onto `[0, size)`.
///
/// Single wrap only: a step is assumed to be shorter than the universe.
#[inline]
pub fn wrap_coordinate(value: f32, size: f32) -> f32 {
    if value < 0.0 {
        value + size
    } else if value >= size {
        value - size
    } else {
        value
    }
}

/// Wrap both axes of a position onto the `width x height` torus
#[inline]
pub fn wrap_position(pos: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(wrap_coordinate(pos.x, width), wrap_coordinate(pos.y, height))
}
