//! Simulation state and core entity types
//!
//! Everything a level instance owns lives here: the static world geometry,
//! the four zone records, the safe zone, enemies, hazards, and eggs. The
//! whole [`SimState`] is discarded and rebuilt per level; nothing survives
//! across levels.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::effects::StatusEffect;
use super::{canopy, glacial, reef, volcanic};
use crate::consts::*;
use crate::dir_toward;
use crate::tuning::Tuning;

/// The player contract consumed by the core.
///
/// The host owns movement and input; the core reads position, radius,
/// facing, and the ability cooldown, pushes the position around (knockback,
/// hazard exclusion), and appends status effects - including the infinite
/// `Dead` sentinel for instant kills. The host's own per-frame tick prunes
/// expired effects.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Facing angle in radians (host-driven, rendering-facing)
    pub facing: f32,
    /// Seconds until the active ability may fire again; the core only
    /// watches the 0 -> positive edge
    pub ability_cooldown: f32,
    pub effects: Vec<StatusEffect>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 14.0,
            facing: 0.0,
            ability_cooldown: 0.0,
            effects: Vec::new(),
        }
    }
}

/// Axis-aligned rectangle; the static shape of a zone. Immutable for the
/// session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub min: Vec2,
    pub size: Vec2,
}

impl Zone {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Clamp a circle center so the circle stays inside the rectangle.
    pub fn clamp_circle(&self, p: Vec2, radius: f32) -> Vec2 {
        let max = self.max();
        Vec2::new(
            p.x.clamp(self.min.x + radius, max.x - radius),
            p.y.clamp(self.min.y + radius, max.y - radius),
        )
    }

    /// Uniform random point inside the rectangle, inset by `margin`.
    pub fn random_point(&self, rng: &mut impl Rng, margin: f32) -> Vec2 {
        let max = self.max();
        Vec2::new(
            rng.random_range(self.min.x + margin..max.x - margin),
            rng.random_range(self.min.y + margin..max.y - margin),
        )
    }
}

/// Static world geometry: map bounds, the four zone rectangles, and the
/// map center the safe zone sits on.
pub mod world {
    use super::Zone;
    use crate::consts::*;
    use glam::Vec2;

    pub const BOUNDS: Zone = Zone::new(0.0, 0.0, MAP_W, MAP_H);
    pub const VOLCANIC: Zone = Zone::new(ZONE_MARGIN, ZONE_MARGIN, ZONE_SIZE, ZONE_SIZE);
    pub const GLACIAL: Zone = Zone::new(
        MAP_W - ZONE_MARGIN - ZONE_SIZE,
        ZONE_MARGIN,
        ZONE_SIZE,
        ZONE_SIZE,
    );
    pub const CANOPY: Zone = Zone::new(
        ZONE_MARGIN,
        MAP_H - ZONE_MARGIN - ZONE_SIZE,
        ZONE_SIZE,
        ZONE_SIZE,
    );
    pub const REEF: Zone = Zone::new(
        MAP_W - ZONE_MARGIN - ZONE_SIZE,
        MAP_H - ZONE_MARGIN - ZONE_SIZE,
        ZONE_SIZE,
        ZONE_SIZE,
    );
    pub const CENTER: Vec2 = Vec2::new(MAP_W / 2.0, MAP_H / 2.0);
}

/// Shrinking, use-limited sanctuary at the map center.
///
/// Invariants: `radius` only ever decreases; once `active` drops it never
/// comes back this level; while active, enemies are repelled to at least
/// `radius + enemy.radius` from the center.
#[derive(Debug, Clone)]
pub struct SafeZone {
    pub center: Vec2,
    pub radius: f32,
    /// Entries consumed so far
    pub uses: u32,
    pub max_uses: u32,
    pub active: bool,
    /// Player was inside last frame; entry shrinking is edge-triggered
    was_inside: bool,
}

impl SafeZone {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            center: world::CENTER,
            radius: tuning.safe_zone_radius,
            uses: 0,
            max_uses: tuning.safe_zone_uses,
            active: true,
            was_inside: false,
        }
    }

    /// Entries the HUD can still promise the player
    pub fn uses_left(&self) -> u32 {
        self.max_uses.saturating_sub(self.uses)
    }

    /// Per-frame entry detection. A *new* entry (outside -> inside this
    /// frame) consumes a use and shrinks the radius by 20%; the zone
    /// deactivates once uses run out or the radius collapses below the
    /// minimum.
    pub fn update(&mut self, player: &Player) {
        if !self.active {
            return;
        }
        let inside = player.pos.distance(self.center) < self.radius;
        if inside && !self.was_inside {
            self.uses += 1;
            self.radius *= SAFE_ZONE_SHRINK;
            log::info!(
                "safe zone entered: radius {:.1}, {} uses left",
                self.radius,
                self.uses_left()
            );
            if self.uses >= self.max_uses || self.radius < SAFE_ZONE_MIN_RADIUS {
                self.active = false;
                log::info!("safe zone exhausted");
            }
        }
        self.was_inside = inside;
    }

    /// Push any enemy overlapping the sanctuary back out to exactly
    /// `radius + enemy.radius` along the center-to-enemy vector. Called
    /// after each zone's own movement step, so an enemy can never end a
    /// frame inside.
    pub fn block_enemies<W: Wyrm>(&self, enemies: &mut [W]) {
        if !self.active {
            return;
        }
        for e in enemies.iter_mut() {
            let core = e.core_mut();
            let keep_out = self.radius + core.radius;
            if core.pos.distance(self.center) < keep_out {
                core.pos = self.center + dir_toward(self.center, core.pos) * keep_out;
            }
        }
    }
}

/// Fields shared by every enemy variant.
#[derive(Debug, Clone)]
pub struct EnemyCore {
    pub pos: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub alive: bool,
    /// Pre-movement suppression: true until the player's first
    /// displacement, then cleared globally and never re-set. Distinct from
    /// the `Freeze` status effect.
    pub frozen: bool,
    pub effects: Vec<StatusEffect>,
}

impl EnemyCore {
    pub fn new(pos: Vec2, radius: f32, base_speed: f32) -> Self {
        Self {
            pos,
            radius,
            base_speed,
            alive: true,
            frozen: true,
            effects: Vec::new(),
        }
    }
}

/// Core accessor used by the shared mechanics (safe-zone exclusion, the
/// global unfreeze, effect passes). Zone behavior stays on the concrete
/// variants; this trait carries no behavior of its own.
pub trait Wyrm {
    fn core(&self) -> &EnemyCore;
    fn core_mut(&mut self) -> &mut EnemyCore;
}

macro_rules! impl_wyrm {
    ($ty:ty) => {
        impl Wyrm for $ty {
            fn core(&self) -> &EnemyCore {
                &self.core
            }
            fn core_mut(&mut self) -> &mut EnemyCore {
                &mut self.core
            }
        }
    };
}

/// Count of alive enemies in a list.
pub fn alive_count<W: Wyrm>(enemies: &[W]) -> usize {
    enemies.iter().filter(|e| e.core().alive).count()
}

/// Volcanic chaser; splits under the player's ability and leaves lava behind.
#[derive(Debug, Clone)]
pub struct Magmawyrm {
    pub core: EnemyCore,
    /// Body scale; children shrink by 0.6 per split generation
    pub size_mult: f32,
    /// Compounding zone-wide escalation multiplier
    pub speed_boost: f32,
    /// Accumulated seconds of active movement since the last lava drop
    pub trail_timer: f32,
}
impl_wyrm!(Magmawyrm);

impl Magmawyrm {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            core: EnemyCore::new(pos, MAGMA_RADIUS, MAGMA_SPEED),
            size_mult: 1.0,
            speed_boost: 1.0,
            trail_timer: 0.0,
        }
    }

    /// A split child: smaller, faster, unfrozen, inheriting the parent's
    /// accumulated boost.
    pub fn child_of(parent: &Magmawyrm, pos: Vec2) -> Self {
        let size_mult = parent.size_mult * SPLIT_CHILD_SIZE;
        let mut core = EnemyCore::new(pos, MAGMA_RADIUS * size_mult, MAGMA_SPEED);
        core.frozen = false;
        Self {
            core,
            size_mult,
            speed_boost: parent.speed_boost * SPLIT_CHILD_BOOST,
            trail_timer: 0.0,
        }
    }
}

/// Glacial emitter; stationary apart from a creeping drift.
#[derive(Debug, Clone)]
pub struct Frostwyrm {
    pub core: EnemyCore,
    pub expand_timer: f32,
    /// Tile-drop ring distance; grows 6 per drop, caps at 220
    pub expand_radius: f32,
    pub shot_timer: f32,
    /// Next reset alternates 2 s / 0.5 s
    pub quick_shot: bool,
}
impl_wyrm!(Frostwyrm);

impl Frostwyrm {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            core: EnemyCore::new(pos, FROST_RADIUS, 0.0),
            expand_timer: 0.0,
            expand_radius: EXPAND_START,
            shot_timer: SHOT_COOLDOWN_LONG,
            quick_shot: false,
        }
    }
}

/// Canopy ambusher; invisible until close, then lunges.
#[derive(Debug, Clone)]
pub struct Thornwyrm {
    pub core: EnemyCore,
    pub visible: bool,
    pub lunging: bool,
    /// Fixed at reveal time; never re-aimed during the lunge
    pub lunge_vel: Vec2,
}
impl_wyrm!(Thornwyrm);

impl Thornwyrm {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            core: EnemyCore::new(pos, THORN_RADIUS, THORN_SPEED),
            visible: false,
            lunging: false,
            lunge_vel: Vec2::ZERO,
        }
    }
}

/// Reef schooler; chases a shared formation target.
#[derive(Debug, Clone)]
pub struct Tidewyrm {
    pub core: EnemyCore,
    /// Phase offset into the school formation
    pub wave_offset: f32,
}
impl_wyrm!(Tidewyrm);

impl Tidewyrm {
    pub fn spawn(pos: Vec2, wave_offset: f32) -> Self {
        Self {
            core: EnemyCore::new(pos, TIDE_RADIUS, TIDE_SPEED),
            wave_offset,
        }
    }
}

// --- Hazards ---

/// Decaying lava circle dropped behind a moving magmawyrm
#[derive(Debug, Clone)]
pub struct LavaTrail {
    pub pos: Vec2,
    pub radius: f32,
    pub life: f32,
    pub max_life: f32,
}

/// Cyclic vent: dormant 5 s, erupting 1.5 s, independent phase per geyser
#[derive(Debug, Clone)]
pub struct Geyser {
    pub pos: Vec2,
    pub radius: f32,
    pub timer: f32,
    pub erupting: bool,
}

/// Permanent static collider; accumulates over the level
#[derive(Debug, Clone, Copy)]
pub struct FrozenTile {
    pub min: Vec2,
    pub size: Vec2,
}

impl FrozenTile {
    pub fn centered_at(center: Vec2) -> Self {
        Self {
            min: center - Vec2::splat(TILE_SIZE / 2.0),
            size: Vec2::splat(TILE_SIZE),
        }
    }
}

/// Projectile; removed on player contact or on leaving the map
#[derive(Debug, Clone)]
pub struct IceBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
}

/// Permanent obstacle ricocheting off the reef walls
#[derive(Debug, Clone)]
pub struct Bouncer {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Permanent canopy obstacle; may host the hidden egg
#[derive(Debug, Clone)]
pub struct Foliage {
    pub pos: Vec2,
    pub radius: f32,
}

// --- Eggs ---
// One per zone, terminal once collected: a collected egg is permanently
// excluded from simulation and rendering for the rest of the level.

/// Collected on plain contact (volcanic)
#[derive(Debug, Clone)]
pub struct ContactEgg {
    pub pos: Vec2,
    pub radius: f32,
    pub collected: bool,
}

/// Collected by proximity dwell (glacial)
#[derive(Debug, Clone)]
pub struct ThawEgg {
    pub pos: Vec2,
    pub radius: f32,
    /// Dwell progress toward the 2 s threshold; decays at half rate when
    /// the player leaves
    pub thaw: f32,
    pub collected: bool,
}

/// Rides a host obstacle, hidden until the player is close (canopy)
#[derive(Debug, Clone)]
pub struct HostedEgg {
    /// Index into the zone's obstacle list; looked up each frame rather
    /// than owned, since obstacles can be regenerated
    pub host: Option<usize>,
    pub pos: Vec2,
    pub radius: f32,
    pub visible: bool,
    pub collected: bool,
}

/// Drifts and bounces inside the zone (reef)
#[derive(Debug, Clone)]
pub struct DriftEgg {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub collected: bool,
}

// --- Zone states ---

#[derive(Debug, Clone)]
pub struct VolcanicZone {
    pub rect: Zone,
    pub enemies: Vec<Magmawyrm>,
    pub trails: Vec<LavaTrail>,
    pub geysers: Vec<Geyser>,
    pub egg: ContactEgg,
    /// Zone-wide compounding speed escalation clock
    pub boost_timer: f32,
}

#[derive(Debug, Clone)]
pub struct GlacialZone {
    pub rect: Zone,
    pub enemies: Vec<Frostwyrm>,
    pub tiles: Vec<FrozenTile>,
    pub bullets: Vec<IceBullet>,
    pub egg: ThawEgg,
}

#[derive(Debug, Clone)]
pub struct CanopyZone {
    pub rect: Zone,
    pub enemies: Vec<Thornwyrm>,
    pub obstacles: Vec<Foliage>,
    pub egg: HostedEgg,
    /// Accumulates only while the player is outside the zone
    pub spawn_timer: f32,
    pub range_timer: f32,
    /// Shared zone-wide teleport range; grows 50 every 5 s
    pub teleport_range: f32,
    pub wave_timer: f32,
    /// Obstacle escalation counter, caps at 3
    pub wave: u32,
}

#[derive(Debug, Clone)]
pub struct ReefZone {
    pub rect: Zone,
    pub enemies: Vec<Tidewyrm>,
    pub bouncers: Vec<Bouncer>,
    pub egg: DriftEgg,
    pub spawn_timer: f32,
    pub complexity_timer: f32,
    /// Harmonic tier of the school formation, caps at 4
    pub complexity: u32,
    /// Shared formation sweep phase
    pub sweep_phase: f32,
}

/// One live simulation instance per level.
#[derive(Debug, Clone)]
pub struct SimState {
    pub level: u32,
    pub seed: u64,
    /// `level_speed_base^(level-1)`
    pub speed_multiplier: f32,
    pub elapsed: f32,
    /// Set on the player's first observed displacement; zone simulators
    /// are gated on it
    pub player_moved: bool,
    pub prev_player_pos: Option<Vec2>,
    pub prev_ability_cooldown: f32,

    pub volcanic: VolcanicZone,
    pub glacial: GlacialZone,
    pub canopy: CanopyZone,
    pub reef: ReefZone,
    pub safe_zone: SafeZone,

    /// Rendering-only phase accumulators; no gameplay effect
    pub volcanic_phase: f32,
    pub canopy_phase: f32,
    pub reef_phase: f32,

    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
}

impl SimState {
    /// Build all zone state for a 1-indexed level. Deterministic for a
    /// given `(level, seed, tuning)`.
    pub fn new(level: u32, seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let speed_multiplier = tuning
            .level_speed_base
            .powi(level.saturating_sub(1) as i32);

        let volcanic = volcanic::generate(&mut rng, &tuning);
        let glacial = glacial::generate(&mut rng, &tuning);
        let canopy = canopy::generate(&mut rng, &tuning);
        let reef = reef::generate(&mut rng, &tuning);
        let safe_zone = SafeZone::new(&tuning);

        log::info!("level {level} initialized (seed {seed}, speed x{speed_multiplier:.2})");

        Self {
            level,
            seed,
            speed_multiplier,
            elapsed: 0.0,
            player_moved: false,
            prev_player_pos: None,
            prev_ability_cooldown: 0.0,
            volcanic,
            glacial,
            canopy,
            reef,
            safe_zone,
            volcanic_phase: 0.0,
            canopy_phase: 0.0,
            reef_phase: 0.0,
            tuning,
            rng,
        }
    }

    /// Clear the pre-movement freeze on every enemy in every zone.
    /// One-way: nothing ever sets `frozen` back.
    pub(crate) fn unfreeze_all(&mut self) {
        fn clear<W: Wyrm>(enemies: &mut [W]) {
            for e in enemies.iter_mut() {
                e.core_mut().frozen = false;
            }
        }
        clear(&mut self.volcanic.enemies);
        clear(&mut self.glacial.enemies);
        clear(&mut self.canopy.enemies);
        clear(&mut self.reef.enemies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_contains_and_clamp() {
        let z = Zone::new(100.0, 100.0, 200.0, 200.0);
        assert!(z.contains(Vec2::new(150.0, 150.0)));
        assert!(!z.contains(Vec2::new(50.0, 150.0)));

        let clamped = z.clamp_circle(Vec2::new(90.0, 400.0), 10.0);
        assert_eq!(clamped, Vec2::new(110.0, 290.0));
    }

    #[test]
    fn test_zone_registry_is_disjoint() {
        for (a, b) in [
            (world::VOLCANIC, world::GLACIAL),
            (world::VOLCANIC, world::CANOPY),
            (world::GLACIAL, world::REEF),
            (world::CANOPY, world::REEF),
        ] {
            assert!(!a.contains(b.center()));
            assert!(!b.contains(a.center()));
        }
        assert!(world::BOUNDS.contains(world::CENTER));
    }

    #[test]
    fn test_safe_zone_shrinks_on_entry_edges() {
        let tuning = Tuning::default();
        let mut sz = SafeZone::new(&tuning);
        let mut player = Player::new(world::CENTER + Vec2::new(500.0, 0.0));

        // Three outside -> inside transitions
        for entry in 0..3 {
            player.pos = world::CENTER;
            sz.update(&player);
            player.pos = world::CENTER + Vec2::new(500.0, 0.0);
            sz.update(&player);
            assert_eq!(sz.uses, entry + 1);
        }
        assert!((sz.radius - 120.0 * 0.8f32.powi(3)).abs() < 1e-3);
        assert!(!sz.active);

        // Never reactivates
        player.pos = world::CENTER;
        sz.update(&player);
        assert!(!sz.active);
        assert_eq!(sz.uses, 3);
    }

    #[test]
    fn test_safe_zone_staying_inside_costs_one_use() {
        let tuning = Tuning::default();
        let mut sz = SafeZone::new(&tuning);
        let mut player = Player::new(world::CENTER + Vec2::new(500.0, 0.0));
        sz.update(&player);

        player.pos = world::CENTER;
        for _ in 0..100 {
            sz.update(&player);
        }
        assert_eq!(sz.uses, 1);
    }

    #[test]
    fn test_safe_zone_blocks_enemies() {
        let tuning = Tuning::default();
        let sz = SafeZone::new(&tuning);
        let mut enemies = vec![
            Magmawyrm::spawn(world::CENTER + Vec2::new(10.0, 0.0)),
            Magmawyrm::spawn(world::CENTER + Vec2::new(0.0, -55.0)),
        ];
        sz.block_enemies(&mut enemies);
        for e in &enemies {
            let d = e.core.pos.distance(sz.center);
            assert!(d >= sz.radius + e.core.radius - 1e-3);
        }
    }

    #[test]
    fn test_split_child_inherits_boost() {
        let mut parent = Magmawyrm::spawn(Vec2::new(100.0, 100.0));
        parent.speed_boost = 2.0;
        let child = Magmawyrm::child_of(&parent, Vec2::new(110.0, 100.0));
        assert!((child.size_mult - 0.6).abs() < 1e-6);
        assert!((child.speed_boost - 2.6).abs() < 1e-6);
        assert!(!child.core.frozen);
        assert!(child.core.radius < parent.core.radius);
    }
}
