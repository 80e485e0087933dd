//! Global frame driver
//!
//! One [`Simulation`] per game session, rebuilt per level. The host calls
//! [`Simulation::update`] once per rendered frame; the call is a single
//! synchronous pass with no suspension points. Zone order is significant:
//! Volcanic, Glacial, Canopy, Reef - each may displace the player before
//! the next zone reads its position.

use glam::Vec2;

use super::state::{Player, SimState};
use super::{canopy, glacial, reef, volcanic};
use crate::render::DrawSurface;
use crate::tuning::Tuning;

/// The simulation context: the one object the host game loop owns.
/// No process-wide state; construct one per session.
pub struct Simulation {
    pub(crate) state: SimState,
}

impl Simulation {
    /// Build all zone state for a 1-indexed level with default tuning.
    pub fn new(level: u32, seed: u64) -> Self {
        Self::with_tuning(level, seed, Tuning::default())
    }

    pub fn with_tuning(level: u32, seed: u64, tuning: Tuning) -> Self {
        Self {
            state: SimState::new(level, seed, tuning),
        }
    }

    /// Discard the current level and rebuild for `level`. Nothing
    /// survives the rebuild.
    pub fn reset(&mut self, level: u32) {
        self.state = SimState::new(level, self.state.seed, self.state.tuning.clone());
    }

    /// Live internal state for host collision checks and HUD queries.
    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Advance the simulation one frame. Mutates `player` in place
    /// (positional pushback, appended status effects) and every internal
    /// zone, hazard, and enemy list.
    pub fn update(&mut self, dt: f32, player: &mut Player) {
        let s = &mut self.state;
        s.elapsed += dt;

        // First-movement edge: the level holds its breath until the
        // player's first displacement, then every enemy unfreezes for good
        match s.prev_player_pos {
            None => s.prev_player_pos = Some(player.pos),
            Some(prev) => {
                if !s.player_moved && prev != player.pos {
                    s.player_moved = true;
                    s.unfreeze_all();
                    log::info!("player moved; the zones wake up");
                }
                s.prev_player_pos = Some(player.pos);
            }
        }

        // Ability-use edge: cooldown leaving zero this frame
        let ability_just_used = s.prev_ability_cooldown == 0.0 && player.ability_cooldown > 0.0;
        s.prev_ability_cooldown = player.ability_cooldown;

        // The sanctuary runs even before the first movement
        s.safe_zone.update(player);

        // Hazard clocks that move no entity tick unconditionally
        volcanic::tick_hazards(&mut s.volcanic, dt);

        if s.player_moved {
            let cap = s.tuning.enemy_cap;
            let mult = s.speed_multiplier;

            volcanic::update(
                &mut s.volcanic,
                dt,
                player,
                &mut s.rng,
                mult,
                cap,
                ability_just_used,
            );
            s.safe_zone.block_enemies(&mut s.volcanic.enemies);

            glacial::update(&mut s.glacial, dt, player, &mut s.rng, mult);
            s.safe_zone.block_enemies(&mut s.glacial.enemies);

            canopy::update(&mut s.canopy, dt, player, &mut s.rng, mult, cap);
            s.safe_zone.block_enemies(&mut s.canopy.enemies);

            reef::update(&mut s.reef, dt, player, &mut s.rng, mult, cap);
            s.safe_zone.block_enemies(&mut s.reef.enemies);
        }

        // Rendering-only phase accumulators
        s.volcanic_phase += dt * 2.0;
        s.canopy_phase += dt * 1.2;
        s.reef_phase += dt * 0.8;
    }

    /// Pure rendering pass over current state, translated by the camera
    /// offset. Mutates nothing in the simulation.
    pub fn draw(&self, surface: &mut impl DrawSurface, cam: Vec2) {
        crate::render::draw(&self.state, surface, cam);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::effects::EffectKind;
    use crate::sim::state::{Wyrm, alive_count, world};
    use glam::Vec2;

    fn enemy_positions(s: &SimState) -> Vec<Vec2> {
        let mut out = Vec::new();
        out.extend(s.volcanic.enemies.iter().map(|e| e.core.pos));
        out.extend(s.glacial.enemies.iter().map(|e| e.core.pos));
        out.extend(s.canopy.enemies.iter().map(|e| e.core.pos));
        out.extend(s.reef.enemies.iter().map(|e| e.core.pos));
        out
    }

    #[test]
    fn test_zero_delta_frame_changes_nothing() {
        let mut sim = Simulation::new(1, 12345);
        let mut player = Player::new(world::CENTER);

        let before = enemy_positions(sim.state());
        let trails = sim.state().volcanic.trails.len();
        sim.update(0.0, &mut player);
        assert_eq!(enemy_positions(sim.state()), before);
        assert_eq!(sim.state().volcanic.trails.len(), trails);
    }

    #[test]
    fn test_freeze_gate_holds_until_first_move() {
        let mut sim = Simulation::new(1, 12345);
        let mut player = Player::new(Vec2::new(400.0, 400.0));

        let before = enemy_positions(sim.state());
        for _ in 0..100 {
            sim.update(0.05, &mut player);
        }
        assert!(!sim.state().player_moved);
        assert_eq!(enemy_positions(sim.state()), before);
        assert!(sim.state().glacial.bullets.is_empty());

        // Hazard clocks ticked regardless
        assert!(sim.state().elapsed > 4.9);

        player.pos += Vec2::new(1.0, 0.0);
        sim.update(0.05, &mut player);
        assert!(sim.state().player_moved);
        for zone_frozen in [
            sim.state().volcanic.enemies.iter().any(|e| e.core.frozen),
            sim.state().glacial.enemies.iter().any(|e| e.core.frozen),
            sim.state().canopy.enemies.iter().any(|e| e.core.frozen),
            sim.state().reef.enemies.iter().any(|e| e.core.frozen),
        ] {
            assert!(!zone_frozen);
        }
    }

    #[test]
    fn test_ability_edge_detection_splits_magmawyrms() {
        let mut sim = Simulation::new(1, 99);
        let target = Vec2::new(150.0, 150.0);
        let mut player = Player::new(target);

        // Wake the zones
        sim.update(0.01, &mut player);
        player.pos += Vec2::new(1.0, 0.0);
        sim.update(0.01, &mut player);
        assert!(sim.state().player_moved);

        // One wyrm on top of the player, the rest out of split range
        sim.state.volcanic.enemies[0].core.pos = player.pos;
        for e in sim.state.volcanic.enemies.iter_mut().skip(1) {
            e.core.pos = Vec2::new(700.0, 700.0);
        }

        let pre = alive_count(&sim.state().volcanic.enemies);
        player.ability_cooldown = 3.0;
        sim.update(0.01, &mut player);

        // Parent died, exactly two children took its place
        assert_eq!(alive_count(&sim.state().volcanic.enemies), pre + 1);
        let children = sim
            .state()
            .volcanic
            .enemies
            .iter()
            .filter(|e| (e.size_mult - SPLIT_CHILD_SIZE).abs() < 1e-6)
            .count();
        assert_eq!(children, 2);

        // Held cooldown is not a new edge
        let count = alive_count(&sim.state().volcanic.enemies);
        sim.update(0.01, &mut player);
        assert_eq!(alive_count(&sim.state().volcanic.enemies), count);
    }

    #[test]
    fn test_dead_effect_removes_enemy() {
        let mut sim = Simulation::new(1, 7);
        let mut player = Player::new(world::CENTER);
        sim.update(0.01, &mut player);
        player.pos += Vec2::new(1.0, 0.0);
        sim.update(0.01, &mut player);

        let n = sim.state().reef.enemies.len();
        assert!(n > 0);
        sim.state.reef.enemies[0]
            .core_mut()
            .effects
            .push(crate::sim::StatusEffect::permanent(EffectKind::Dead));
        sim.update(0.01, &mut player);
        assert_eq!(sim.state().reef.enemies.len(), n - 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = Simulation::new(2, 424242);
        let mut b = Simulation::new(2, 424242);
        let mut pa = Player::new(Vec2::new(300.0, 300.0));
        let mut pb = Player::new(Vec2::new(300.0, 300.0));

        for i in 0..600 {
            let wiggle = Vec2::new((i as f32 * 0.13).sin(), (i as f32 * 0.17).cos()) * 3.0;
            pa.pos += wiggle;
            pb.pos += wiggle;
            a.update(1.0 / 60.0, &mut pa);
            b.update(1.0 / 60.0, &mut pb);
        }

        assert_eq!(pa.pos, pb.pos);
        assert_eq!(enemy_positions(a.state()), enemy_positions(b.state()));
        assert_eq!(
            a.state().volcanic.trails.len(),
            b.state().volcanic.trails.len()
        );
        assert_eq!(a.state().glacial.tiles.len(), b.state().glacial.tiles.len());
    }

    #[test]
    fn test_reset_rebuilds_level() {
        let mut sim = Simulation::new(1, 5);
        let mut player = Player::new(Vec2::new(200.0, 200.0));
        sim.update(0.01, &mut player);
        player.pos += Vec2::new(5.0, 0.0);
        for _ in 0..300 {
            sim.update(0.05, &mut player);
        }

        sim.reset(2);
        let s = sim.state();
        assert_eq!(s.level, 2);
        assert!((s.elapsed - 0.0).abs() < f32::EPSILON);
        assert!(!s.player_moved);
        assert!(s.volcanic.trails.is_empty());
        assert!((s.speed_multiplier - LEVEL_SPEED_BASE).abs() < 1e-6);
        assert!(s.safe_zone.active);
    }

    #[test]
    fn test_trail_clocks_tick_before_first_move() {
        let mut sim = Simulation::new(1, 21);
        // Seed a trail by hand; decay must run even while the level is
        // frozen pre-movement
        sim.state.volcanic.trails.push(crate::sim::LavaTrail {
            pos: world::VOLCANIC.center(),
            radius: 20.0,
            life: 0.2,
            max_life: TRAIL_LIFE,
        });
        let mut player = Player::new(world::CENTER);
        sim.update(0.3, &mut player);
        assert!(sim.state().volcanic.trails.is_empty());
    }
}
