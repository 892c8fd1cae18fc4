//! Simulation tick
//!
//! One tick applies at most one inbound command, advances trash physics and
//! runs the collapse check.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{MoveOutcome, resolve_ship_move};
use super::physics;
use super::placement::choose_position;
use super::state::{GamePhase, GameState};
use crate::consts::SHIP_RADIUS;
use crate::error::{EntityKind, SimError};
use crate::wrap_position;

/// One-unit movement directions (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit displacement for this direction
    pub fn step(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Inbound command from a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect { ship: char },
    Move { ship: char, direction: Direction },
}

/// Outcome reported back to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandReply {
    Ok,
    /// Connect: name already in use
    AlreadyConnected,
    /// Connect: no room for another ship
    Full,
    /// Move: ship bumped another ship or dropped its trash at a planet
    Rejected,
    /// Move: no ship with that name
    UnknownShip,
}

impl CommandReply {
    pub fn is_ok(&self) -> bool {
        *self == CommandReply::Ok
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Reply to the command, if one was given
    pub reply: Option<CommandReply>,
    /// Trash spawned by planet hits this tick
    pub spawned: usize,
    /// Collapse state after the tick
    pub collapsed: bool,
    /// This tick is the one that collapsed the universe
    pub just_collapsed: bool,
}

/// Connect a ship at a fresh non-overlapping position
pub fn connect_ship(state: &mut GameState, name: char) -> Result<usize, SimError> {
    let (universe, rng) = state.parts_mut();
    if universe.find_ship(name).is_some() {
        return Err(SimError::DuplicateName(name));
    }
    if universe.ship_count() >= universe.max_ships() {
        return Err(SimError::Capacity(EntityKind::Ship));
    }

    let pos = choose_position(universe, SHIP_RADIUS, rng);
    universe.add_ship(pos.x, pos.y, name)
}

/// Move a ship one unit in `direction`, wrapping around the edges
pub fn move_ship(
    state: &mut GameState,
    name: char,
    direction: Direction,
) -> Result<MoveOutcome, SimError> {
    let (universe, rng) = state.parts_mut();
    let index = universe.find_ship(name).ok_or(SimError::UnknownShip(name))?;
    let size = universe.size();
    let current = universe.ships()[index].pos;
    let proposed = wrap_position(current + direction.step(), size.x, size.y);

    resolve_ship_move(universe, index, proposed, rng)
}

/// Apply one command and translate the result into a reply
pub fn apply_command(state: &mut GameState, command: &Command) -> CommandReply {
    match *command {
        Command::Connect { ship } => match connect_ship(state, ship) {
            Ok(_) => CommandReply::Ok,
            Err(SimError::DuplicateName(_)) => CommandReply::AlreadyConnected,
            Err(e) => {
                log::warn!("Connect '{}' refused: {}", ship, e);
                CommandReply::Full
            }
        },
        Command::Move { ship, direction } => match move_ship(state, ship, direction) {
            Ok(outcome) if outcome.moved() => CommandReply::Ok,
            Ok(_) => CommandReply::Rejected,
            Err(e) => {
                log::debug!("Move '{}' ignored: {}", ship, e);
                CommandReply::UnknownShip
            }
        },
    }
}

/// Advance the simulation by one tick
pub fn tick(state: &mut GameState, command: Option<&Command>) -> TickReport {
    let reply = command.map(|c| apply_command(state, c));

    let (universe, rng) = state.parts_mut();
    physics::step(universe);
    let spawned = physics::spawn_from_planet_hits(universe, rng);

    state.time_ticks += 1;

    let mut just_collapsed = false;
    if state.phase == GamePhase::Running && state.universe.has_collapsed() {
        state.phase = GamePhase::Collapsed;
        just_collapsed = true;
        log::warn!(
            "The universe has collapsed at tick {}: {}/{} trash",
            state.time_ticks,
            state.universe.active_trash_count(),
            state.universe.trash_capacity()
        );
    }

    TickReport {
        reply,
        spawned,
        collapsed: state.is_collapsed(),
        just_collapsed,
    }
}
