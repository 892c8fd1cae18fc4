//! Polar 2D vectors for trash motion
//!
//! Velocity and acceleration are stored as (amplitude, angle). Addition
//! round-trips through cartesian form.

use std::ops::{Add, AddAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{cartesian_to_polar, polar_to_cartesian};

/// A vector in polar form
///
/// `amplitude` is never negative. `angle` is in radians and is not wrapped to
/// any canonical range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PolarVector {
    pub amplitude: f32,
    pub angle: f32,
}

impl PolarVector {
    pub const ZERO: Self = Self {
        amplitude: 0.0,
        angle: 0.0,
    };

    pub fn new(amplitude: f32, angle: f32) -> Self {
        Self { amplitude, angle }
    }

    /// Build from cartesian components
    pub fn from_cartesian(v: Vec2) -> Self {
        let (amplitude, angle) = cartesian_to_polar(v);
        Self { amplitude, angle }
    }

    /// Cartesian components
    #[inline]
    pub fn to_cartesian(self) -> Vec2 {
        polar_to_cartesian(self.amplitude, self.angle)
    }

    /// Same direction, amplitude multiplied by `factor`
    #[inline]
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            amplitude: self.amplitude * factor,
            angle: self.angle,
        }
    }
}

impl Add for PolarVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_cartesian(self.to_cartesian() + rhs.to_cartesian())
    }
}

impl AddAssign for PolarVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for PolarVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}
