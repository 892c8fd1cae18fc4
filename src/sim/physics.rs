//! Trash physics: gravity, friction and toroidal motion
//!
//! Only trash moves here. Planets are fixed and ships move only on command.
//! The three passes must run in order so every acceleration is computed from
//! positions at the start of the tick.

use rand::Rng;

use super::collision::circles_intersect;
use super::placement::choose_position;
use super::state::{Planet, Trash, Universe};
use super::vector::PolarVector;
use crate::consts::{GRAVITATIONAL_CONSTANT, MIN_GRAVITY_DISTANCE, TRASH_FRICTION, TRASH_RADIUS};
use crate::wrap_position;

/// Gravitational pull of one planet on one piece of trash
fn planet_pull(planet: &Planet, trash: &Trash) -> PolarVector {
    let toward = PolarVector::from_cartesian(planet.pos - trash.pos);
    if toward.amplitude <= MIN_GRAVITY_DISTANCE {
        return PolarVector::ZERO;
    }

    let magnitude =
        GRAVITATIONAL_CONSTANT * planet.mass * trash.mass / (toward.amplitude * toward.amplitude);
    PolarVector::new(magnitude, toward.angle)
}

/// Recompute every active trash acceleration from the planets
pub fn update_acceleration(universe: &mut Universe) {
    let (planets, trash) = universe.planets_and_trash_mut();
    for t in trash.iter_mut().filter(|t| t.active) {
        let total: PolarVector = planets.iter().map(|p| planet_pull(p, t)).sum();
        // Replaces, never accumulates onto, last tick's value
        t.acceleration = total;
    }
}

/// Apply friction, then add the acceleration
pub fn update_velocity(universe: &mut Universe) {
    for t in universe.trash_slots_mut().iter_mut().filter(|t| t.active) {
        t.velocity = t.velocity.scaled(TRASH_FRICTION) + t.acceleration;
    }
}

/// Advance positions by velocity and wrap around the edges
pub fn update_position(universe: &mut Universe) {
    let size = universe.size();
    for t in universe.trash_slots_mut().iter_mut().filter(|t| t.active) {
        let moved = t.pos + t.velocity.to_cartesian();
        t.pos = wrap_position(moved, size.x, size.y);
    }
}

/// One integrator step over all active trash
pub fn step(universe: &mut Universe) {
    update_acceleration(universe);
    update_velocity(universe);
    update_position(universe);
}

/// Spawn new trash for every piece that has just hit a planet.
///
/// Trash counts as hitting a planet on the first tick it overlaps one; it
/// must leave contact before it can trigger again. The trash that hit is not
/// destroyed. Returns how many pieces were spawned.
pub fn spawn_from_planet_hits<R: Rng + ?Sized>(universe: &mut Universe, rng: &mut R) -> usize {
    let mut hits = 0;
    let (planets, trash) = universe.planets_and_trash_mut();
    for t in trash.iter_mut().filter(|t| t.active) {
        let touching = planets
            .iter()
            .any(|p| circles_intersect(t.pos, t.radius, p.pos, p.radius));
        if touching && !t.touching_planet {
            hits += 1;
        }
        t.touching_planet = touching;
    }

    let mut spawned = 0;
    for _ in 0..hits {
        let pos = choose_position(universe, TRASH_RADIUS, rng);
        if universe.add_trash(pos.x, pos.y, 0.0, 0.0).is_err() {
            break;
        }
        spawned += 1;
    }
    if spawned > 0 {
        log::debug!("{} trash hit a planet, {} spawned", hits, spawned);
    }
    spawned
}
