//! Universe construction parameters
//!
//! Loaded once at startup from a JSON file and treated as immutable afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_PLANETS;
use crate::error::{ConfigError, SimError};

/// How planets are placed when the universe is seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanetLayout {
    /// Rejection-sampled positions that avoid overlap
    #[default]
    Random,
    /// Fixed arrangement derived from the planet count
    Pattern,
}

impl PlanetLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanetLayout::Random => "random",
            PlanetLayout::Pattern => "pattern",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" | "rand" => Some(PlanetLayout::Random),
            "pattern" | "grid" => Some(PlanetLayout::Pattern),
            _ => None,
        }
    }
}

/// Universe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Universe width in world units
    pub universe_width: u32,
    /// Universe height in world units
    pub universe_height: u32,
    /// Planets to create (1-26, named A-Z)
    pub num_planets: usize,
    /// Trash capacity; reaching it collapses the universe
    pub max_trash: usize,
    /// Trash pieces seeded at startup
    pub initial_trash: usize,
    /// Trash a single ship can carry
    pub ship_capacity: usize,
    /// Ships that may be connected at once
    pub max_ships: usize,
    /// Planet placement strategy
    #[serde(default)]
    pub planet_layout: PlanetLayout,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            universe_width: 800,
            universe_height: 600,
            num_planets: 5,
            max_trash: 50,
            initial_trash: 10,
            ship_capacity: 5,
            max_ships: 10,
            planet_layout: PlanetLayout::Random,
        }
    }
}

impl UniverseConfig {
    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |reason: &str| -> Result<(), SimError> {
            Err(SimError::InvalidConfiguration(reason.to_string()))
        };

        if self.universe_width == 0 || self.universe_height == 0 {
            return invalid("universe dimensions must be positive");
        }
        if self.num_planets == 0 || self.num_planets > MAX_PLANETS {
            return invalid("num_planets must be between 1 and 26");
        }
        if self.max_trash == 0 {
            return invalid("max_trash must be positive");
        }
        if self.initial_trash > self.max_trash {
            return invalid("initial_trash must be between 0 and max_trash");
        }
        if self.ship_capacity == 0 {
            return invalid("ship_capacity must be positive");
        }
        if self.max_ships == 0 {
            return invalid("max_ships must be positive");
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Log the effective configuration
    pub fn log_summary(&self) {
        log::info!(
            "Universe {}x{}: {} planets ({} layout), trash {}/{}, {} ships x {} capacity",
            self.universe_width,
            self.universe_height,
            self.num_planets,
            self.planet_layout.as_str(),
            self.initial_trash,
            self.max_trash,
            self.max_ships,
            self.ship_capacity
        );
    }
}
