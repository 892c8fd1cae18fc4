//! Deterministic simulation module
//!
//! All universe logic lives here. This module must be pure and deterministic:
//! - One command and one integrator step per tick
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No I/O or platform dependencies

pub mod collision;
pub mod physics;
pub mod placement;
pub mod state;
pub mod tick;
pub mod vector;

pub use collision::{MoveOutcome, circles_intersect, resolve_ship_move};
pub use placement::{choose_position, is_position_clear, pattern_positions};
pub use state::{CarriedTrash, GamePhase, GameState, Planet, Ship, Trash, Universe};
pub use tick::{Command, CommandReply, Direction, TickReport, apply_command, tick};
pub use vector::PolarVector;
