//! Wyrmfield - enemy and hazard simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (zones, enemies, hazards, safe zone)
//! - `render`: Drawing-intent adapter consuming simulation state
//! - `tuning`: Data-driven game balance
//!
//! The host game loop owns the player and the frame clock. Each frame it
//! calls [`sim::Simulation::update`] with `(dt, player)` and then renders
//! through any [`render::DrawSurface`] backend.

pub mod render;
pub mod sim;
pub mod tuning;

pub use sim::{Player, SimState, Simulation};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Map dimensions
    pub const MAP_W: f32 = 1600.0;
    pub const MAP_H: f32 = 1600.0;
    /// Zone layout: four 700x700 squares inset from the map corners
    pub const ZONE_SIZE: f32 = 700.0;
    pub const ZONE_MARGIN: f32 = 60.0;

    /// Per-zone alive-enemy hard cap
    pub const ENEMY_CAP: usize = 6;

    /// Per-level enemy speed scaling: `LEVEL_SPEED_BASE^(level-1)`
    pub const LEVEL_SPEED_BASE: f32 = 1.25;

    /// Safe zone defaults
    pub const SAFE_ZONE_RADIUS: f32 = 120.0;
    pub const SAFE_ZONE_MIN_RADIUS: f32 = 18.0;
    pub const SAFE_ZONE_SHRINK: f32 = 0.8;
    pub const SAFE_ZONE_MAX_USES: u32 = 3;

    /// Volcanic zone - magmawyrms
    pub const MAGMA_RADIUS: f32 = 22.0;
    pub const MAGMA_SPEED: f32 = 95.0;
    pub const SPEED_BOOST_INTERVAL: f32 = 5.0;
    pub const SPEED_BOOST_FACTOR: f32 = 1.15;
    pub const TRAIL_INTERVAL: f32 = 0.3;
    pub const TRAIL_LIFE: f32 = 5.0;
    pub const TRAIL_RADIUS_FACTOR: f32 = 0.9;
    pub const GEYSER_RADIUS: f32 = 26.0;
    pub const GEYSER_DORMANT: f32 = 5.0;
    pub const GEYSER_ERUPT: f32 = 1.5;
    pub const SPLIT_RANGE: f32 = 200.0;
    pub const SPLIT_MIN_SIZE: f32 = 0.4;
    pub const SPLIT_CHILD_SIZE: f32 = 0.6;
    pub const SPLIT_CHILD_BOOST: f32 = 1.3;

    /// Glacial zone - frostwyrms
    pub const FROST_RADIUS: f32 = 20.0;
    pub const TILE_INTERVAL: f32 = 1.5;
    pub const TILE_SIZE: f32 = 40.0;
    pub const EXPAND_START: f32 = 50.0;
    pub const EXPAND_STEP: f32 = 6.0;
    pub const EXPAND_CAP: f32 = 220.0;
    pub const FROST_JITTER: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 210.0;
    pub const BULLET_RADIUS: f32 = 8.0;
    pub const BULLET_RANGE: f32 = 300.0;
    pub const SHOT_COOLDOWN_LONG: f32 = 2.0;
    pub const SHOT_COOLDOWN_SHORT: f32 = 0.5;
    pub const THAW_REQUIRED: f32 = 2.0;
    pub const THAW_PROXIMITY: f32 = 30.0;

    /// Canopy zone - thornwyrms
    pub const THORN_RADIUS: f32 = 18.0;
    pub const THORN_SPEED: f32 = 110.0;
    pub const THORN_SPAWN_INTERVAL: f32 = 10.0;
    pub const TELEPORT_RANGE_START: f32 = 150.0;
    pub const TELEPORT_RANGE_STEP: f32 = 50.0;
    pub const TELEPORT_RANGE_INTERVAL: f32 = 5.0;
    pub const REVEAL_RANGE: f32 = 150.0;
    pub const LUNGE_FACTOR: f32 = 2.5;
    pub const LUNGE_END_SLACK: f32 = 8.0;
    pub const FOLIAGE_WAVE_INTERVAL: f32 = 5.0;
    pub const FOLIAGE_WAVE_CAP: u32 = 3;
    pub const JOSTLE_RATE: f32 = 0.8;
    pub const JOSTLE_STEP: f32 = 35.0;
    pub const EGG_REVEAL_RANGE: f32 = 100.0;

    /// Reef zone - tidewyrms
    pub const TIDE_RADIUS: f32 = 16.0;
    pub const TIDE_SPEED: f32 = 130.0;
    pub const TIDE_SPAWN_INTERVAL: f32 = 10.0;
    pub const COMPLEXITY_INTERVAL: f32 = 5.0;
    pub const COMPLEXITY_CAP: u32 = 4;
    pub const ELLIPSE_A: f32 = 240.0;
    pub const ELLIPSE_B: f32 = 150.0;
    pub const SWEEP_RATE: f32 = 0.5;
    pub const HARMONIC_AMPLITUDE: f32 = 40.0;
    pub const BOUNCER_RADIUS: f32 = 18.0;
    pub const BOUNCER_SPEED: f32 = 80.0;
    pub const BOUNCE_KNOCKBACK: f32 = 40.0;
    pub const REEF_EGG_MARGIN: f32 = 20.0;

    /// Eggs
    pub const EGG_RADIUS: f32 = 12.0;
    pub const EGG_CATCH_SLACK: f32 = 18.0;
}

/// Unit vector from `from` toward `to`.
///
/// A zero separation substitutes a distance of 1, yielding a zero vector
/// rather than NaN.
#[inline]
pub fn dir_toward(from: Vec2, to: Vec2) -> Vec2 {
    let d = to - from;
    let len = d.length();
    d / if len > 0.0 { len } else { 1.0 }
}
