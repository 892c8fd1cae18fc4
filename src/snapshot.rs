//! Read-only per-tick view of the universe for renderers and clients

use serde::Serialize;

use crate::sim::{GameState, Planet, Ship, Trash};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanetView {
    pub x: f32,
    pub y: f32,
    pub name: char,
    pub is_recycling: bool,
    pub collected_trash: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrashView {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipView {
    pub x: f32,
    pub y: f32,
    pub name: char,
    pub carried: usize,
}

impl From<&Planet> for PlanetView {
    fn from(p: &Planet) -> Self {
        Self {
            x: p.pos.x,
            y: p.pos.y,
            name: p.name,
            is_recycling: p.is_recycling,
            collected_trash: p.collected_trash,
        }
    }
}

impl From<&Trash> for TrashView {
    fn from(t: &Trash) -> Self {
        Self {
            x: t.pos.x,
            y: t.pos.y,
        }
    }
}

impl From<&Ship> for ShipView {
    fn from(s: &Ship) -> Self {
        Self {
            x: s.pos.x,
            y: s.pos.y,
            name: s.name,
            carried: s.carried.len(),
        }
    }
}

/// Everything a renderer needs to draw one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub planets: Vec<PlanetView>,
    /// Active trash only
    pub trash: Vec<TrashView>,
    pub ships: Vec<ShipView>,
    pub active_trash: usize,
    pub max_trash: usize,
    pub collapsed: bool,
}

impl RenderSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let universe = &state.universe;
        Self {
            tick: state.time_ticks,
            width: universe.width(),
            height: universe.height(),
            planets: universe.planets().iter().map(PlanetView::from).collect(),
            trash: universe.active_trash().map(|(_, t)| TrashView::from(t)).collect(),
            ships: universe.ships().iter().map(ShipView::from).collect(),
            active_trash: universe.active_trash_count(),
            max_trash: universe.trash_capacity(),
            collapsed: state.is_collapsed(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
