//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, single synchronous pass per frame
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Zones update in a fixed order (Volcanic, Glacial, Canopy, Reef); each may
//! displace the player before the next zone reads its position.

pub mod canopy;
pub mod effects;
pub mod glacial;
pub mod mechanics;
pub mod reef;
pub mod state;
pub mod update;
pub mod volcanic;

pub use effects::{EffectKind, StatusEffect};
pub use state::{
    Bouncer, CanopyZone, EnemyCore, Foliage, Frostwyrm, Geyser, GlacialZone, IceBullet, LavaTrail,
    Magmawyrm, Player, ReefZone, SafeZone, SimState, Thornwyrm, Tidewyrm, VolcanicZone, Wyrm, Zone,
    world,
};
pub use update::Simulation;
