//! Collision detection and ship interaction rules
//!
//! A ship move is resolved against other ships, then planets, then trash.
//! Bumping a ship or releasing trash at an ordinary planet both leave the
//! ship where it was.

use glam::Vec2;
use rand::Rng;

use super::placement::choose_position;
use super::state::Universe;
use crate::error::{EntityKind, SimError};

/// Result of resolving one proposed ship move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Position committed
    Moved {
        /// Trash slot picked up during this move
        picked_up: Option<usize>,
        /// Trash handed to the recycling planet during this move
        recycled: usize,
    },
    /// Proposed position overlapped another ship; nothing changed
    Bumped { other: usize },
    /// Hit an ordinary planet; carried trash went back into play and the
    /// ship stayed put
    Released { planet: usize, released: usize },
}

impl MoveOutcome {
    /// Whether the ship ended up at the proposed position
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Two circles overlap. Touching does not count.
#[inline]
pub fn circles_intersect(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let sum = radius_a + radius_b;
    a.distance_squared(b) < sum * sum
}

/// Try to move ship `ship_index` to `proposed`, applying every interaction
/// rule along the way.
pub fn resolve_ship_move<R: Rng + ?Sized>(
    universe: &mut Universe,
    ship_index: usize,
    proposed: Vec2,
    rng: &mut R,
) -> Result<MoveOutcome, SimError> {
    let ship = universe.ship(ship_index).ok_or(SimError::NotFound {
        kind: EntityKind::Ship,
        index: ship_index,
    })?;
    let ship_name = ship.name;
    let ship_radius = ship.radius;

    // --- OTHER SHIPS ---
    let bumped = universe.ships().iter().enumerate().find(|(i, other)| {
        *i != ship_index && circles_intersect(proposed, ship_radius, other.pos, other.radius)
    });
    if let Some((other, other_ship)) = bumped {
        log::info!("Ship {} hit ship {}", ship_name, other_ship.name);
        return Ok(MoveOutcome::Bumped { other });
    }

    // --- PLANETS ---
    let mut recycled = 0;
    let hit_planet = universe
        .planets()
        .iter()
        .position(|p| circles_intersect(proposed, ship_radius, p.pos, p.radius));
    if let Some(planet_index) = hit_planet {
        let carried = take_carried(universe, ship_index);

        if universe.planets()[planet_index].is_recycling {
            recycled = carried.len();
            for &slot in &carried {
                universe.release_hold(slot);
            }
            if let Some(planet) = universe.planet_mut(planet_index) {
                planet.collected_trash += recycled as u32;
                log::info!(
                    "Ship {} delivered {} trash to recycling planet {} ({} collected)",
                    ship_name,
                    recycled,
                    planet.name,
                    planet.collected_trash
                );
            }
        } else {
            for &slot in &carried {
                let radius = universe.trash_slots()[slot].radius;
                let pos = choose_position(universe, radius, rng);
                universe.reactivate_trash(slot, pos.x, pos.y)?;
            }
            log::info!(
                "Ship {} hit planet {}, {} trash released",
                ship_name,
                universe.planets()[planet_index].name,
                carried.len()
            );
            return Ok(MoveOutcome::Released {
                planet: planet_index,
                released: carried.len(),
            });
        }
    }

    // --- TRASH ---
    let touched = universe
        .active_trash()
        .find(|(_, t)| circles_intersect(proposed, ship_radius, t.pos, t.radius))
        .map(|(slot, _)| slot);
    let mut picked_up = None;
    if let Some(slot) = touched {
        let has_room = universe
            .ship(ship_index)
            .is_some_and(|s| !s.carried.is_full());
        if has_room && universe.hold_trash(slot, ship_index) {
            if let Some(ship) = universe.ship_mut(ship_index) {
                ship.carried.push(slot);
            }
            log::debug!("Ship {} picked up trash {}", ship_name, slot);
            picked_up = Some(slot);
        }
    }

    if let Some(ship) = universe.ship_mut(ship_index) {
        ship.pos = proposed;
    }
    Ok(MoveOutcome::Moved {
        picked_up,
        recycled,
    })
}

/// Empty a ship's carried sequence, returning the slot indices
fn take_carried(universe: &mut Universe, ship_index: usize) -> Vec<usize> {
    match universe.ship_mut(ship_index) {
        Some(ship) => {
            let slots = ship.carried.as_slice().to_vec();
            ship.carried.clear();
            slots
        }
        None => Vec::new(),
    }
}
