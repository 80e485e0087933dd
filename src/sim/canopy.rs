//! Canopy zone simulator - thornwyrms
//!
//! Ambush predators: invisible until the player closes in, then a fixed
//! lunge at 2.5x speed toward where the player stood at reveal. A lunging
//! wyrm the player outruns is snapped back inside teleport range, which
//! itself grows over time. The zone quietly grows while the player is
//! elsewhere, and escalating waves of foliage give the hidden egg places
//! to hide.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::{effect_pass, movement_blocked, speed_factor};
use super::mechanics::seek;
use super::state::{CanopyZone, Foliage, HostedEgg, Player, Thornwyrm, alive_count, world};
use crate::consts::*;
use crate::dir_toward;
use crate::tuning::Tuning;

fn random_foliage(rect: &super::state::Zone, rng: &mut Pcg32) -> Foliage {
    Foliage {
        pos: rect.random_point(rng, 40.0),
        radius: rng.random_range(18.0..30.0),
    }
}

pub(crate) fn generate(rng: &mut Pcg32, tuning: &Tuning) -> CanopyZone {
    let rect = world::CANOPY;

    let enemies = (0..tuning.canopy_spawns)
        .map(|_| Thornwyrm::spawn(rect.random_point(rng, 40.0)))
        .collect();

    let obstacles: Vec<Foliage> = (0..tuning.canopy_foliage)
        .map(|_| random_foliage(&rect, rng))
        .collect();

    let host = if obstacles.is_empty() {
        None
    } else {
        Some(rng.random_range(0..obstacles.len()))
    };
    let egg_pos = host.map(|h| obstacles[h].pos).unwrap_or_else(|| rect.center());

    CanopyZone {
        rect,
        enemies,
        obstacles,
        egg: HostedEgg {
            host,
            pos: egg_pos,
            radius: EGG_RADIUS,
            visible: false,
            collected: false,
        },
        spawn_timer: 0.0,
        range_timer: 0.0,
        teleport_range: TELEPORT_RANGE_START,
        wave_timer: 0.0,
        wave: 0,
    }
}

pub(crate) fn update(
    zone: &mut CanopyZone,
    dt: f32,
    player: &mut Player,
    rng: &mut Pcg32,
    speed_mult: f32,
    cap: usize,
) {
    effect_pass(&mut zone.enemies, dt);

    // Silent population growth; the clock only runs while the player is
    // outside the zone
    if !zone.rect.contains(player.pos) {
        zone.spawn_timer += dt;
        while zone.spawn_timer >= THORN_SPAWN_INTERVAL {
            zone.spawn_timer -= THORN_SPAWN_INTERVAL;
            if alive_count(&zone.enemies) < cap {
                let mut spawned = Thornwyrm::spawn(zone.rect.random_point(rng, 40.0));
                spawned.core.frozen = false;
                zone.enemies.push(spawned);
                log::debug!("thornwyrm spawned while player away");
            }
        }
    }

    // Teleport range escalation, shared zone-wide
    zone.range_timer += dt;
    while zone.range_timer >= TELEPORT_RANGE_INTERVAL {
        zone.range_timer -= TELEPORT_RANGE_INTERVAL;
        zone.teleport_range += TELEPORT_RANGE_STEP;
    }

    // Obstacle waves: the counter climbs to 3 and that many foliage
    // clumps land each wave; a hostless egg gets re-homed
    zone.wave_timer += dt;
    while zone.wave_timer >= FOLIAGE_WAVE_INTERVAL {
        zone.wave_timer -= FOLIAGE_WAVE_INTERVAL;
        zone.wave = (zone.wave + 1).min(FOLIAGE_WAVE_CAP);
        for _ in 0..zone.wave {
            let f = random_foliage(&zone.rect, rng);
            zone.obstacles.push(f);
        }
        let hostless = zone
            .egg
            .host
            .is_none_or(|h| h >= zone.obstacles.len());
        if hostless && !zone.obstacles.is_empty() {
            zone.egg.host = Some(rng.random_range(0..zone.obstacles.len()));
        }
    }

    // Ambient jostle, independent of any timer
    for o in zone.obstacles.iter_mut() {
        if rng.random::<f32>() < dt * JOSTLE_RATE {
            let shove = Vec2::new(
                rng.random_range(-JOSTLE_STEP..JOSTLE_STEP),
                rng.random_range(-JOSTLE_STEP..JOSTLE_STEP),
            );
            o.pos = zone.rect.clamp_circle(o.pos + shove, o.radius);
        }
    }

    for e in zone.enemies.iter_mut() {
        let dist = e.core.pos.distance(player.pos);

        // Reveal: lock in the lunge vector toward the player's position
        // right now; it is never re-aimed
        if !e.visible && dist < REVEAL_RANGE {
            e.visible = true;
            e.lunging = true;
            e.lunge_vel = dir_toward(e.core.pos, player.pos)
                * e.core.base_speed
                * speed_mult
                * LUNGE_FACTOR;
        }

        if e.core.frozen || movement_blocked(&e.core.effects) {
            e.core.pos = zone.rect.clamp_circle(e.core.pos, e.core.radius);
            continue;
        }
        let factor = speed_factor(&e.core.effects);

        if e.lunging {
            e.core.pos += e.lunge_vel * factor * dt;
            let d = e.core.pos.distance(player.pos);
            if d <= e.core.radius + player.radius + LUNGE_END_SLACK {
                e.lunging = false;
            } else if d > zone.teleport_range {
                // Escape prevention: snap back onto the player-to-enemy
                // bearing at three quarters of the range
                e.core.pos = player.pos
                    + dir_toward(player.pos, e.core.pos) * (zone.teleport_range * 0.75);
            }
        } else if e.visible {
            let speed = e.core.base_speed * speed_mult * factor;
            e.core.pos = seek(e.core.pos, player.pos, speed, dt);
        }

        e.core.pos = zone.rect.clamp_circle(e.core.pos, e.core.radius);
    }

    // The egg rides its host obstacle and only shows itself up close
    if !zone.egg.collected {
        if let Some(o) = zone.egg.host.and_then(|h| zone.obstacles.get(h)) {
            zone.egg.pos = o.pos;
        }
        zone.egg.visible = player.pos.distance(zone.egg.pos) < EGG_REVEAL_RANGE;
        if player.pos.distance(zone.egg.pos) < player.radius + EGG_CATCH_SLACK {
            zone.egg.collected = true;
            log::info!("canopy egg collected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn zone_with(enemies: Vec<Thornwyrm>) -> CanopyZone {
        let mut zone = generate(&mut Pcg32::seed_from_u64(13), &Tuning::default());
        zone.enemies = enemies;
        zone
    }

    fn unfrozen(pos: Vec2) -> Thornwyrm {
        let mut e = Thornwyrm::spawn(pos);
        e.core.frozen = false;
        e
    }

    #[test]
    fn test_reveal_and_lunge_vector_fixed() {
        let mut rng = Pcg32::seed_from_u64(4);
        let start = world::CANOPY.center();
        let mut zone = zone_with(vec![unfrozen(start)]);
        let mut player = Player::new(start + Vec2::new(100.0, 0.0));

        update(&mut zone, 0.01, &mut player, &mut rng, 1.0, ENEMY_CAP);
        assert!(zone.enemies[0].visible);
        assert!(zone.enemies[0].lunging);
        let locked = zone.enemies[0].lunge_vel;
        assert!((locked.length() - THORN_SPEED * LUNGE_FACTOR).abs() < 1e-2);

        // Player sidesteps; the vector does not re-aim
        player.pos = start + Vec2::new(100.0, 80.0);
        update(&mut zone, 0.01, &mut player, &mut rng, 1.0, ENEMY_CAP);
        assert_eq!(zone.enemies[0].lunge_vel, locked);
    }

    #[test]
    fn test_lunge_ends_on_contact_range() {
        let mut rng = Pcg32::seed_from_u64(4);
        let start = world::CANOPY.center();
        let mut zone = zone_with(vec![unfrozen(start)]);
        let mut player = Player::new(start + Vec2::new(100.0, 0.0));

        for _ in 0..200 {
            update(&mut zone, 0.01, &mut player, &mut rng, 1.0, ENEMY_CAP);
            if !zone.enemies[0].lunging {
                break;
            }
        }
        let e = &zone.enemies[0];
        assert!(!e.lunging);
        assert!(e.visible);
        assert!(
            e.core.pos.distance(player.pos)
                <= e.core.radius + player.radius + LUNGE_END_SLACK + 2.0
        );
    }

    #[test]
    fn test_teleport_catches_runaway_player() {
        let mut rng = Pcg32::seed_from_u64(4);
        let start = world::CANOPY.center();
        let mut zone = zone_with(vec![unfrozen(start)]);
        let mut player = Player::new(start + Vec2::new(100.0, 0.0));

        update(&mut zone, 0.01, &mut player, &mut rng, 1.0, ENEMY_CAP);
        assert!(zone.enemies[0].lunging);

        // Player blinks across the zone mid-lunge
        player.pos = start + Vec2::new(-300.0, 150.0);
        update(&mut zone, 0.01, &mut player, &mut rng, 1.0, ENEMY_CAP);
        let d = zone.enemies[0].core.pos.distance(player.pos);
        assert!(d <= zone.teleport_range * 0.75 + 1.0);
    }

    #[test]
    fn test_silent_growth_only_while_player_outside() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut zone = zone_with(Vec::new());

        // Player inside the zone: the clock is paused
        let mut inside = Player::new(world::CANOPY.center());
        for _ in 0..120 {
            update(&mut zone, 0.1, &mut inside, &mut rng, 1.0, ENEMY_CAP);
        }
        assert!(zone.enemies.is_empty());

        // Player away: one spawn per 10 s
        let mut outside = Player::new(Vec2::new(10.0, 10.0));
        for _ in 0..101 {
            update(&mut zone, 0.1, &mut outside, &mut rng, 1.0, ENEMY_CAP);
        }
        assert_eq!(zone.enemies.len(), 1);
        assert!(!zone.enemies[0].core.frozen);
    }

    #[test]
    fn test_growth_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut zone = zone_with(Vec::new());
        let mut outside = Player::new(Vec2::new(10.0, 10.0));

        for _ in 0..1200 {
            update(&mut zone, 0.1, &mut outside, &mut rng, 1.0, ENEMY_CAP);
        }
        assert_eq!(alive_count(&zone.enemies), ENEMY_CAP);
    }

    #[test]
    fn test_teleport_range_grows() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut zone = zone_with(Vec::new());
        let mut player = Player::new(Vec2::new(10.0, 10.0));

        for _ in 0..110 {
            update(&mut zone, 0.1, &mut player, &mut rng, 1.0, ENEMY_CAP);
        }
        // Two 5 s ticks in 11 s
        assert!(
            (zone.teleport_range - (TELEPORT_RANGE_START + 2.0 * TELEPORT_RANGE_STEP)).abs()
                < 1e-3
        );
    }

    #[test]
    fn test_obstacle_waves_cap_at_three() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut zone = zone_with(Vec::new());
        let before = zone.obstacles.len();
        let mut player = Player::new(Vec2::new(10.0, 10.0));

        // 16 s: waves of 1, 2, 3 obstacles
        for _ in 0..160 {
            update(&mut zone, 0.1, &mut player, &mut rng, 1.0, ENEMY_CAP);
        }
        assert_eq!(zone.wave, FOLIAGE_WAVE_CAP);
        assert_eq!(zone.obstacles.len(), before + 6);
    }

    #[test]
    fn test_egg_rides_host_and_hides() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut zone = zone_with(Vec::new());
        let host = zone.egg.host.expect("egg hosted at generation");
        let mut player = Player::new(Vec2::new(10.0, 10.0));

        update(&mut zone, 0.1, &mut player, &mut rng, 1.0, ENEMY_CAP);
        assert_eq!(zone.egg.pos, zone.obstacles[host].pos);
        assert!(!zone.egg.visible);

        player.pos = zone.egg.pos + Vec2::new(50.0, 0.0);
        update(&mut zone, 0.0, &mut player, &mut rng, 1.0, ENEMY_CAP);
        assert!(zone.egg.visible);
    }
}
