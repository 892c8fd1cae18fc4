//! Placement of new entities
//!
//! Rejection sampling over integer coordinates, plus the fixed planet
//! arrangements used by `PlanetLayout::Pattern`.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};

use super::collision::circles_intersect;
use super::state::Universe;
use crate::consts::{PLACEMENT_MAX_ATTEMPTS, PLANET_RADIUS};

/// True if a circle at `pos` overlaps no planet, active trash or ship
pub fn is_position_clear(universe: &Universe, pos: Vec2, radius: f32) -> bool {
    let planets_clear = universe
        .planets()
        .iter()
        .all(|p| !circles_intersect(pos, radius, p.pos, p.radius));
    let trash_clear = universe
        .active_trash()
        .all(|(_, t)| !circles_intersect(pos, radius, t.pos, t.radius));
    let ships_clear = universe
        .ships()
        .iter()
        .all(|s| !circles_intersect(pos, radius, s.pos, s.radius));

    planets_clear && trash_clear && ships_clear
}

/// Pick a position for a circle of `radius` that overlaps nothing.
///
/// Gives up after `PLACEMENT_MAX_ATTEMPTS` and returns the last candidate
/// without checking it, so a crowded universe still terminates.
pub fn choose_position<R: Rng + ?Sized>(universe: &Universe, radius: f32, rng: &mut R) -> Vec2 {
    let mut candidate = random_point(universe, rng);
    for _ in 1..PLACEMENT_MAX_ATTEMPTS {
        if is_position_clear(universe, candidate, radius) {
            return candidate;
        }
        candidate = random_point(universe, rng);
    }

    if !is_position_clear(universe, candidate, radius) {
        log::warn!(
            "No free position after {} attempts, placing at ({}, {}) anyway",
            PLACEMENT_MAX_ATTEMPTS,
            candidate.x,
            candidate.y
        );
    }
    candidate
}

/// Uniform integer coordinates in `[0, width) x [0, height)`
fn random_point<R: Rng + ?Sized>(universe: &Universe, rng: &mut R) -> Vec2 {
    let x = rng.random_range(0..universe.width());
    let y = rng.random_range(0..universe.height());
    Vec2::new(x as f32, y as f32)
}

/// Fixed planet arrangement for `count` planets in a universe of `size`.
///
/// One planet sits at the centre, two share the horizontal midline, up to
/// five form a ring starting at the top, and larger counts use a grid with
/// a small random jitter.
pub fn pattern_positions<R: Rng + ?Sized>(count: usize, size: Vec2, rng: &mut R) -> Vec<Vec2> {
    let center = size / 2.0;

    match count {
        0 => Vec::new(),
        1 => vec![center],
        2 => vec![
            Vec2::new(size.x * 0.33, center.y),
            Vec2::new(size.x * 0.67, center.y),
        ],
        3..=5 => {
            let radius = size.x.min(size.y) * 0.35;
            (0..count)
                .map(|i| {
                    // Start from the top of the ring
                    let angle = TAU * i as f32 / count as f32 - PI / 2.0;
                    center + Vec2::new(angle.cos(), angle.sin()) * radius
                })
                .collect()
        }
        _ => grid_positions(count, size, rng),
    }
}

fn grid_positions<R: Rng + ?Sized>(count: usize, size: Vec2, rng: &mut R) -> Vec<Vec2> {
    let cols = (count as f32).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);

    let spacing = Vec2::new(size.x / (cols as f32 + 1.0), size.y / (rows as f32 + 1.0));
    let margin = PLANET_RADIUS * 3.0;
    let max = (size - Vec2::splat(margin)).max(Vec2::splat(margin));

    (0..count)
        .map(|i| {
            let row = (i / cols) as f32;
            let col = (i % cols) as f32;
            let base = Vec2::splat(margin) + spacing * Vec2::new(col + 1.0, row + 1.0);
            // Jitter of up to +-10% of the spacing
            let jitter = Vec2::new(rng.random_range(-0.1..0.1), rng.random_range(-0.1..0.1));
            (base + jitter * spacing).clamp(Vec2::splat(margin), max)
        })
        .collect()
}
