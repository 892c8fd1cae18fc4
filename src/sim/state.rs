//! Universe state and core simulation types
//!
//! The `Universe` owns every planet, trash slot and ship. Entities refer to
//! each other only by index into these collections.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::placement::{choose_position, pattern_positions};
use super::vector::PolarVector;
use crate::config::{PlanetLayout, UniverseConfig};
use crate::consts::*;
use crate::error::{EntityKind, SimError};

/// A planet. Fixed in place once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
    pub mass: f32,
    /// Single letter identifier (A, B, C, ...)
    pub name: char,
    pub is_recycling: bool,
    /// Trash deposited here by ships
    pub collected_trash: u32,
}

impl Planet {
    pub fn new(pos: Vec2, name: char) -> Self {
        Self {
            pos,
            radius: PLANET_RADIUS,
            mass: PLANET_MASS,
            name,
            is_recycling: false,
            collected_trash: 0,
        }
    }
}

/// A trash slot
///
/// Inactive slots are free for reuse unless a ship is holding them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trash {
    pub pos: Vec2,
    pub mass: f32,
    pub radius: f32,
    pub velocity: PolarVector,
    pub acceleration: PolarVector,
    pub active: bool,
    /// Ship carrying this slot (slot is inactive while held)
    pub held_by: Option<usize>,
    /// Whether the trash overlapped a planet at the end of the last tick
    pub touching_planet: bool,
}

impl Trash {
    fn free() -> Self {
        Self {
            pos: Vec2::ZERO,
            mass: TRASH_MASS,
            radius: TRASH_RADIUS,
            velocity: PolarVector::ZERO,
            acceleration: PolarVector::ZERO,
            active: false,
            held_by: None,
            touching_planet: false,
        }
    }

    /// Slot can be handed out by `add_trash`
    #[inline]
    pub fn is_free(&self) -> bool {
        !self.active && self.held_by.is_none()
    }
}

/// Trash slot indices carried by a ship, bounded by the ship capacity.
///
/// Storage is allocated once when the ship connects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarriedTrash {
    slots: Vec<usize>,
    capacity: usize,
}

impl CarriedTrash {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a slot index; refused when full
    pub fn push(&mut self, slot: usize) -> bool {
        if self.is_full() {
            return false;
        }
        self.slots.push(slot);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    /// Empty the sequence, keeping its storage
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// A player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub radius: f32,
    /// Single character identity, unique among connected ships
    pub name: char,
    pub carried: CarriedTrash,
}

impl Ship {
    pub fn new(pos: Vec2, name: char, capacity: usize) -> Self {
        Self {
            pos,
            radius: SHIP_RADIUS,
            name,
            carried: CarriedTrash::with_capacity(capacity),
        }
    }
}

/// Entity store for one universe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Universe {
    width: u32,
    height: u32,
    planets: Vec<Planet>,
    max_planets: usize,
    /// Fixed-length slot array (`max_trash` entries)
    trash: Vec<Trash>,
    /// Number of slots with `active == true`
    active_trash: usize,
    ships: Vec<Ship>,
    max_ships: usize,
    ship_capacity: usize,
    recycling_planet_index: usize,
}

impl Universe {
    /// Create an empty universe. Fails on an invalid configuration.
    pub fn new(config: &UniverseConfig) -> Result<Self, SimError> {
        config.validate()?;

        let universe = Self {
            width: config.universe_width,
            height: config.universe_height,
            planets: Vec::with_capacity(config.num_planets),
            max_planets: config.num_planets,
            trash: vec![Trash::free(); config.max_trash],
            active_trash: 0,
            ships: Vec::with_capacity(config.max_ships),
            max_ships: config.max_ships,
            ship_capacity: config.ship_capacity,
            recycling_planet_index: 0,
        };

        log::info!(
            "Universe created: {}x{}, max {} planets, max {} trash, max {} ships",
            universe.width,
            universe.height,
            universe.max_planets,
            universe.trash.len(),
            universe.max_ships
        );

        Ok(universe)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions as floats for position math
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    // ===== Planets =====

    /// Add a planet; returns its index
    pub fn add_planet(&mut self, x: f32, y: f32, name: char) -> Result<usize, SimError> {
        if self.planets.len() >= self.max_planets {
            log::warn!("Cannot add planet '{}': maximum reached", name);
            return Err(SimError::Capacity(EntityKind::Planet));
        }

        let index = self.planets.len();
        self.planets.push(Planet::new(Vec2::new(x, y), name));
        log::info!("Added planet '{}' at ({:.1}, {:.1})", name, x, y);
        Ok(index)
    }

    pub fn planet(&self, index: usize) -> Option<&Planet> {
        self.planets.get(index)
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub(crate) fn planet_mut(&mut self, index: usize) -> Option<&mut Planet> {
        self.planets.get_mut(index)
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn max_planets(&self) -> usize {
        self.max_planets
    }

    /// Move the recycling flag to `index`. Invalid indices are ignored.
    pub fn set_recycling_planet(&mut self, index: usize) {
        if index >= self.planets.len() {
            return;
        }

        if let Some(previous) = self.planets.get_mut(self.recycling_planet_index) {
            previous.is_recycling = false;
        }
        self.recycling_planet_index = index;
        self.planets[index].is_recycling = true;

        log::info!("Planet '{}' is now the recycling planet", self.planets[index].name);
    }

    pub fn recycling_planet_index(&self) -> usize {
        self.recycling_planet_index
    }

    pub fn recycling_planet(&self) -> Option<&Planet> {
        self.planets
            .get(self.recycling_planet_index)
            .filter(|p| p.is_recycling)
    }

    // ===== Trash =====

    /// Place trash in the first free slot; returns the slot index
    pub fn add_trash(&mut self, x: f32, y: f32, speed: f32, angle: f32) -> Result<usize, SimError> {
        let Some(index) = self.trash.iter().position(Trash::is_free) else {
            log::warn!("Cannot add trash: maximum reached");
            return Err(SimError::Capacity(EntityKind::Trash));
        };

        let slot = &mut self.trash[index];
        *slot = Trash::free();
        slot.pos = Vec2::new(x, y);
        slot.velocity = PolarVector::new(speed, angle);
        slot.active = true;
        self.active_trash += 1;

        Ok(index)
    }

    /// Deactivate a trash slot. Calling it again is a no-op.
    pub fn remove_trash(&mut self, index: usize) {
        if let Some(slot) = self.trash.get_mut(index) {
            if slot.active {
                slot.active = false;
                self.active_trash -= 1;
            }
        }
    }

    /// Active trash at `index`
    pub fn trash(&self, index: usize) -> Option<&Trash> {
        self.trash.get(index).filter(|t| t.active)
    }

    /// Every slot, active or not
    pub fn trash_slots(&self) -> &[Trash] {
        &self.trash
    }

    pub(crate) fn trash_slots_mut(&mut self) -> &mut [Trash] {
        &mut self.trash
    }

    /// Planets for reading alongside trash slots for writing
    pub(crate) fn planets_and_trash_mut(&mut self) -> (&[Planet], &mut [Trash]) {
        (&self.planets, &mut self.trash)
    }

    /// `(slot index, trash)` for every active slot
    pub fn active_trash(&self) -> impl Iterator<Item = (usize, &Trash)> {
        self.trash.iter().enumerate().filter(|(_, t)| t.active)
    }

    /// O(1) active trash count
    #[inline]
    pub fn active_trash_count(&self) -> usize {
        self.active_trash
    }

    pub fn trash_capacity(&self) -> usize {
        self.trash.len()
    }

    /// Deactivate an active slot on behalf of a ship
    pub(crate) fn hold_trash(&mut self, index: usize, ship: usize) -> bool {
        match self.trash.get_mut(index) {
            Some(slot) if slot.active => {
                slot.active = false;
                slot.held_by = Some(ship);
                self.active_trash -= 1;
                true
            }
            _ => false,
        }
    }

    /// Drop a ship's hold so the slot can be reused
    pub(crate) fn release_hold(&mut self, index: usize) {
        if let Some(slot) = self.trash.get_mut(index) {
            slot.held_by = None;
        }
    }

    /// Bring an inactive slot back into play at a new position
    pub fn reactivate_trash(&mut self, index: usize, x: f32, y: f32) -> Result<(), SimError> {
        let slot = self.trash.get_mut(index).ok_or(SimError::NotFound {
            kind: EntityKind::Trash,
            index,
        })?;

        slot.pos = Vec2::new(x, y);
        slot.held_by = None;
        slot.touching_planet = false;
        if !slot.active {
            slot.active = true;
            self.active_trash += 1;
        }
        Ok(())
    }

    // ===== Ships =====

    /// Connect a ship; names must be unique
    pub fn add_ship(&mut self, x: f32, y: f32, name: char) -> Result<usize, SimError> {
        if self.ships.len() >= self.max_ships {
            log::warn!("Cannot add ship '{}': maximum reached", name);
            return Err(SimError::Capacity(EntityKind::Ship));
        }
        if self.find_ship(name).is_some() {
            return Err(SimError::DuplicateName(name));
        }

        let index = self.ships.len();
        self.ships
            .push(Ship::new(Vec2::new(x, y), name, self.ship_capacity));
        log::info!("Added ship '{}' at ({:.1}, {:.1})", name, x, y);
        Ok(index)
    }

    pub fn ship(&self, index: usize) -> Option<&Ship> {
        self.ships.get(index)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub(crate) fn ship_mut(&mut self, index: usize) -> Option<&mut Ship> {
        self.ships.get_mut(index)
    }

    pub fn find_ship(&self, name: char) -> Option<usize> {
        self.ships.iter().position(|s| s.name == name)
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    pub fn max_ships(&self) -> usize {
        self.max_ships
    }

    pub fn ship_capacity(&self) -> usize {
        self.ship_capacity
    }

    // ===== Termination =====

    /// Trash has saturated its capacity
    #[inline]
    pub fn has_collapsed(&self) -> bool {
        self.active_trash >= self.trash.len()
    }
}

/// Current phase of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Trash below capacity
    Running,
    /// Trash reached capacity at some tick. Never reverts.
    Collapsed,
}

/// Complete simulation context: the universe plus its seeded RNG
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub universe: Universe,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
}

impl GameState {
    /// Create a universe and seed its planets and initial trash
    pub fn new(config: &UniverseConfig, seed: u64) -> Result<Self, SimError> {
        let mut state = Self::empty(config, seed)?;
        state.seed_planets(config.planet_layout);
        state.seed_trash(config.initial_trash);
        Ok(state)
    }

    /// Create an unpopulated universe
    pub fn empty(config: &UniverseConfig, seed: u64) -> Result<Self, SimError> {
        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            universe: Universe::new(config)?,
            time_ticks: 0,
            phase: GamePhase::Running,
        })
    }

    /// Borrow the universe and RNG together
    pub fn parts_mut(&mut self) -> (&mut Universe, &mut Pcg32) {
        (&mut self.universe, &mut self.rng)
    }

    pub fn is_collapsed(&self) -> bool {
        self.phase == GamePhase::Collapsed
    }

    /// Fill every planet slot and make the first planet the recycling planet
    pub fn seed_planets(&mut self, layout: PlanetLayout) {
        let count = self.universe.max_planets() - self.universe.planet_count();
        log::info!("Initializing {} planets ({} layout)", count, layout.as_str());

        let positions: Vec<Vec2> = match layout {
            PlanetLayout::Pattern => {
                pattern_positions(count, self.universe.size(), &mut self.rng)
            }
            // Sampled one at a time so each planet avoids the ones before it
            PlanetLayout::Random => Vec::new(),
        };

        for i in 0..count {
            let pos = match positions.get(i) {
                Some(&p) => p,
                None => choose_position(&self.universe, PLANET_RADIUS, &mut self.rng),
            };
            let name = (b'A' + self.universe.planet_count() as u8) as char;
            if self.universe.add_planet(pos.x, pos.y, name).is_err() {
                break;
            }
        }

        if self.universe.planet_count() > 0 {
            self.universe.set_recycling_planet(0);
        }
    }

    /// Scatter `count` trash pieces at rest
    pub fn seed_trash(&mut self, count: usize) {
        for _ in 0..count {
            let pos = choose_position(&self.universe, TRASH_RADIUS, &mut self.rng);
            if self.universe.add_trash(pos.x, pos.y, 0.0, 0.0).is_err() {
                break;
            }
        }
        log::info!("Seeded {} trash", self.universe.active_trash_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn config() -> UniverseConfig {
        UniverseConfig {
            universe_width: 800,
            universe_height: 600,
            num_planets: 3,
            max_trash: 5,
            initial_trash: 0,
            ship_capacity: 2,
            max_ships: 2,
            planet_layout: PlanetLayout::Random,
        }
    }

    fn counted_active(universe: &Universe) -> usize {
        universe.trash_slots().iter().filter(|t| t.active).count()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let bad = UniverseConfig {
            num_planets: 0,
            ..config()
        };
        assert!(matches!(
            Universe::new(&bad),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_add_planet_capacity() {
        let mut universe = Universe::new(&config()).unwrap();
        assert_eq!(universe.add_planet(100.0, 100.0, 'A'), Ok(0));
        assert_eq!(universe.add_planet(200.0, 100.0, 'B'), Ok(1));
        assert_eq!(universe.add_planet(300.0, 100.0, 'C'), Ok(2));
        assert_eq!(
            universe.add_planet(400.0, 100.0, 'D'),
            Err(SimError::Capacity(EntityKind::Planet))
        );
        assert_eq!(universe.planet_count(), 3);
    }

    #[test]
    fn test_set_recycling_planet_moves_flag() {
        let mut universe = Universe::new(&config()).unwrap();
        for (i, name) in ['A', 'B', 'C'].into_iter().enumerate() {
            universe.add_planet(100.0 * i as f32, 50.0, name).unwrap();
        }

        universe.set_recycling_planet(0);
        universe.set_recycling_planet(2);
        let flagged: Vec<char> = universe
            .planets()
            .iter()
            .filter(|p| p.is_recycling)
            .map(|p| p.name)
            .collect();
        assert_eq!(flagged, vec!['C']);
        assert_eq!(universe.recycling_planet_index(), 2);

        // Out of range leaves everything as it was
        universe.set_recycling_planet(7);
        assert_eq!(universe.recycling_planet_index(), 2);
        assert_eq!(universe.recycling_planet().map(|p| p.name), Some('C'));
    }

    #[test]
    fn test_add_trash_first_fit() {
        let mut universe = Universe::new(&config()).unwrap();
        for i in 0..3 {
            assert_eq!(universe.add_trash(i as f32, 0.0, 0.0, 0.0), Ok(i));
        }
        universe.remove_trash(1);
        assert_eq!(universe.add_trash(9.0, 9.0, 1.0, 0.5), Ok(1));
        let reused = universe.trash(1).unwrap();
        assert_eq!(reused.pos, Vec2::new(9.0, 9.0));
        assert_eq!(reused.velocity, PolarVector::new(1.0, 0.5));
    }

    #[test]
    fn test_add_trash_full() {
        let mut universe = Universe::new(&config()).unwrap();
        for _ in 0..5 {
            universe.add_trash(0.0, 0.0, 0.0, 0.0).unwrap();
        }
        assert_eq!(
            universe.add_trash(0.0, 0.0, 0.0, 0.0),
            Err(SimError::Capacity(EntityKind::Trash))
        );
        assert_eq!(universe.active_trash_count(), 5);
    }

    #[test]
    fn test_remove_trash_is_idempotent() {
        let mut universe = Universe::new(&config()).unwrap();
        universe.add_trash(1.0, 1.0, 0.0, 0.0).unwrap();
        universe.add_trash(2.0, 2.0, 0.0, 0.0).unwrap();

        universe.remove_trash(0);
        universe.remove_trash(0);
        assert_eq!(universe.active_trash_count(), 1);
        assert_eq!(counted_active(&universe), 1);

        // Out of range is ignored
        universe.remove_trash(99);
        assert_eq!(universe.active_trash_count(), 1);
    }

    #[test]
    fn test_held_slot_not_reused() {
        let mut universe = Universe::new(&config()).unwrap();
        universe.add_trash(1.0, 1.0, 0.0, 0.0).unwrap();
        assert!(universe.hold_trash(0, 0));
        assert!(!universe.hold_trash(0, 0));
        assert_eq!(universe.active_trash_count(), 0);

        // Slot 0 is held, so new trash goes to slot 1
        assert_eq!(universe.add_trash(5.0, 5.0, 0.0, 0.0), Ok(1));

        universe.release_hold(0);
        assert_eq!(universe.add_trash(6.0, 6.0, 0.0, 0.0), Ok(0));
    }

    #[test]
    fn test_reactivate_trash() {
        let mut universe = Universe::new(&config()).unwrap();
        universe.add_trash(1.0, 1.0, 0.0, 0.0).unwrap();
        universe.hold_trash(0, 0);

        universe.reactivate_trash(0, 50.0, 60.0).unwrap();
        let slot = universe.trash(0).unwrap();
        assert_eq!(slot.pos, Vec2::new(50.0, 60.0));
        assert_eq!(slot.held_by, None);
        assert_eq!(universe.active_trash_count(), 1);

        // Already active: position moves, tally does not
        universe.reactivate_trash(0, 70.0, 80.0).unwrap();
        assert_eq!(universe.active_trash_count(), 1);

        assert!(matches!(
            universe.reactivate_trash(42, 0.0, 0.0),
            Err(SimError::NotFound { kind: EntityKind::Trash, index: 42 })
        ));
    }

    #[test]
    fn test_add_ship_errors() {
        let mut universe = Universe::new(&config()).unwrap();
        assert_eq!(universe.add_ship(10.0, 10.0, 'a'), Ok(0));
        assert_eq!(
            universe.add_ship(50.0, 50.0, 'a'),
            Err(SimError::DuplicateName('a'))
        );
        assert_eq!(universe.add_ship(90.0, 90.0, 'b'), Ok(1));
        assert_eq!(
            universe.add_ship(130.0, 130.0, 'c'),
            Err(SimError::Capacity(EntityKind::Ship))
        );
        assert_eq!(universe.find_ship('b'), Some(1));
        assert_eq!(universe.find_ship('z'), None);
        assert_eq!(universe.ship(0).unwrap().carried.capacity(), 2);
    }

    #[test]
    fn test_carried_trash_bounded() {
        let mut carried = CarriedTrash::with_capacity(2);
        assert!(carried.push(4));
        assert!(carried.push(7));
        assert!(!carried.push(9));
        assert_eq!(carried.as_slice(), &[4, 7]);
        carried.clear();
        assert!(carried.is_empty());
        assert_eq!(carried.capacity(), 2);
    }

    #[test]
    fn test_has_collapsed_at_capacity() {
        let mut universe = Universe::new(&config()).unwrap();
        for _ in 0..4 {
            universe.add_trash(0.0, 0.0, 0.0, 0.0).unwrap();
        }
        assert!(!universe.has_collapsed());
        universe.add_trash(0.0, 0.0, 0.0, 0.0).unwrap();
        assert!(universe.has_collapsed());
        universe.remove_trash(3);
        assert!(!universe.has_collapsed());
    }

    #[test]
    fn test_game_state_seeds_universe() {
        let config = UniverseConfig {
            initial_trash: 4,
            ..config()
        };
        let state = GameState::new(&config, 7).unwrap();
        let universe = &state.universe;

        assert_eq!(universe.planet_count(), 3);
        let names: Vec<char> = universe.planets().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!['A', 'B', 'C']);
        assert!(universe.planets()[0].is_recycling);
        assert_eq!(universe.active_trash_count(), 4);
        assert_eq!(state.phase, GamePhase::Running);

        for (_, trash) in universe.active_trash() {
            assert!(trash.pos.x >= 0.0 && trash.pos.x < 800.0);
            assert!(trash.pos.y >= 0.0 && trash.pos.y < 600.0);
            assert_eq!(trash.velocity.amplitude, 0.0);
        }
    }

    #[test]
    fn test_game_state_pattern_layout() {
        let config = UniverseConfig {
            num_planets: 1,
            planet_layout: PlanetLayout::Pattern,
            ..config()
        };
        let state = GameState::new(&config, 1).unwrap();
        assert_eq!(state.universe.planets()[0].pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_same_seed_same_universe() {
        let config = UniverseConfig {
            initial_trash: 5,
            ..config()
        };
        let a = GameState::new(&config, 1234).unwrap();
        let b = GameState::new(&config, 1234).unwrap();
        for (pa, pb) in a.universe.planets().iter().zip(b.universe.planets()) {
            assert_eq!(pa.pos, pb.pos);
        }
        for (ta, tb) in a.universe.trash_slots().iter().zip(b.universe.trash_slots()) {
            assert_eq!(ta.pos, tb.pos);
        }
    }

    #[derive(Debug, Clone)]
    enum StoreOp {
        Add(f32, f32),
        Remove(usize),
        Hold(usize),
        Reactivate(usize),
    }

    fn store_op() -> impl Strategy<Value = StoreOp> {
        prop_oneof![
            (0.0f32..800.0, 0.0f32..600.0).prop_map(|(x, y)| StoreOp::Add(x, y)),
            (0usize..7).prop_map(StoreOp::Remove),
            (0usize..7).prop_map(StoreOp::Hold),
            (0usize..7).prop_map(StoreOp::Reactivate),
        ]
    }

    proptest! {
        #[test]
        fn tally_matches_active_slots(ops in proptest::collection::vec(store_op(), 0..64)) {
            let mut universe = Universe::new(&config()).unwrap();
            for op in ops {
                match op {
                    StoreOp::Add(x, y) => {
                        let _ = universe.add_trash(x, y, 0.0, 0.0);
                    }
                    StoreOp::Remove(i) => universe.remove_trash(i),
                    StoreOp::Hold(i) => {
                        universe.hold_trash(i, 0);
                    }
                    StoreOp::Reactivate(i) => {
                        let _ = universe.reactivate_trash(i, 1.0, 1.0);
                    }
                }
                prop_assert_eq!(universe.active_trash_count(), counted_active(&universe));
                prop_assert!(universe.active_trash_count() <= universe.trash_capacity());
            }
        }
    }
}
