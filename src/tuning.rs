//! Data-driven game balance
//!
//! The knobs a designer actually reaches for while balancing levels.
//! Loaded from a JSON file when one is present, otherwise defaults apply;
//! a malformed or missing file is never an error.

use serde::Deserialize;

use crate::consts::*;

/// Balance knobs applied at level construction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Alive-enemy hard cap per zone
    pub enemy_cap: usize,
    /// Base of the per-level speed curve (`base^(level-1)`)
    pub level_speed_base: f32,

    // === Safe zone ===
    pub safe_zone_radius: f32,
    pub safe_zone_uses: u32,

    // === Initial populations ===
    pub volcanic_spawns: usize,
    pub glacial_spawns: usize,
    pub canopy_spawns: usize,
    pub reef_spawns: usize,
    pub canopy_foliage: usize,
    pub reef_bouncers: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_cap: ENEMY_CAP,
            level_speed_base: LEVEL_SPEED_BASE,

            safe_zone_radius: SAFE_ZONE_RADIUS,
            safe_zone_uses: SAFE_ZONE_MAX_USES,

            volcanic_spawns: 3,
            glacial_spawns: 2,
            canopy_spawns: 2,
            reef_spawns: 3,
            canopy_foliage: 4,
            reef_bouncers: 3,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults on any failure.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Malformed tuning file {path}: {e}; using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {path}; using defaults");
                Self::default()
            }
        }
    }
}
