//! Reef zone simulator - tidewyrms
//!
//! The school sweeps an ellipse around the zone center as one formation:
//! every wyrm seeks its own slot on the sweep, offset by index, with extra
//! sinusoidal harmonics layered in as the complexity tier climbs. The
//! coordination is entirely target-side; there is no inter-enemy
//! avoidance. Bouncing obstacles ricochet off the walls and shove anything
//! they touch; the egg drifts and bounces until caught.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::{effect_pass, movement_blocked, speed_factor};
use super::mechanics::{knockback, seek};
use super::state::{Bouncer, DriftEgg, Player, ReefZone, Tidewyrm, alive_count, world};
use crate::consts::*;
use crate::tuning::Tuning;

pub(crate) fn generate(rng: &mut Pcg32, tuning: &Tuning) -> ReefZone {
    let rect = world::REEF;

    let enemies = (0..tuning.reef_spawns)
        .map(|i| Tidewyrm::spawn(rect.random_point(rng, 40.0), slot_offset(i)))
        .collect();

    let bouncers = (0..tuning.reef_bouncers)
        .map(|_| {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            Bouncer {
                pos: rect.random_point(rng, 60.0),
                vel: Vec2::from_angle(angle) * BOUNCER_SPEED,
                radius: BOUNCER_RADIUS,
            }
        })
        .collect();

    let drift_angle = rng.random_range(0.0..std::f32::consts::TAU);
    ReefZone {
        rect,
        enemies,
        bouncers,
        egg: DriftEgg {
            pos: rect.random_point(rng, 100.0),
            vel: Vec2::from_angle(drift_angle) * 90.0,
            radius: EGG_RADIUS,
            collected: false,
        },
        spawn_timer: 0.0,
        complexity_timer: 0.0,
        complexity: 0,
        sweep_phase: 0.0,
    }
}

/// Angular slot on the sweep for the n-th schooler
fn slot_offset(index: usize) -> f32 {
    index as f32 * (std::f32::consts::TAU / ENEMY_CAP as f32)
}

/// Formation target for one schooler: the shared elliptical sweep plus the
/// harmonic layers the current tier has unlocked.
pub(crate) fn formation_target(center: Vec2, phase: f32, wave_offset: f32, complexity: u32) -> Vec2 {
    let theta = phase + wave_offset;
    let mut target = center + Vec2::new(ELLIPSE_A * theta.cos(), ELLIPSE_B * theta.sin());
    for k in 1..=complexity {
        let kf = k as f32;
        let h = theta * (kf + 1.0) + kf * 0.9;
        target += Vec2::new(h.cos(), h.sin()) * (HARMONIC_AMPLITUDE / kf);
    }
    target
}

pub(crate) fn update(
    zone: &mut ReefZone,
    dt: f32,
    player: &mut Player,
    rng: &mut Pcg32,
    speed_mult: f32,
    cap: usize,
) {
    effect_pass(&mut zone.enemies, dt);

    // Population growth: one unfrozen schooler per 10 s, cap permitting
    zone.spawn_timer += dt;
    while zone.spawn_timer >= TIDE_SPAWN_INTERVAL {
        zone.spawn_timer -= TIDE_SPAWN_INTERVAL;
        let alive = alive_count(&zone.enemies);
        if alive < cap {
            let mut e = Tidewyrm::spawn(zone.rect.random_point(rng, 40.0), slot_offset(alive));
            e.core.frozen = false;
            zone.enemies.push(e);
            log::debug!("tidewyrm joined the school ({} alive)", alive + 1);
        }
    }

    // Wave complexity escalation
    zone.complexity_timer += dt;
    while zone.complexity_timer >= COMPLEXITY_INTERVAL {
        zone.complexity_timer -= COMPLEXITY_INTERVAL;
        if zone.complexity < COMPLEXITY_CAP {
            zone.complexity += 1;
            log::debug!("reef wave complexity now {}", zone.complexity);
        }
    }

    zone.sweep_phase += dt * SWEEP_RATE;

    // Schoolers chase their formation slots at their own speed
    let center = zone.rect.center();
    for e in zone.enemies.iter_mut() {
        if e.core.frozen || movement_blocked(&e.core.effects) {
            continue;
        }
        let target = formation_target(center, zone.sweep_phase, e.wave_offset, zone.complexity);
        let speed = e.core.base_speed * speed_mult * speed_factor(&e.core.effects);
        e.core.pos = seek(e.core.pos, target, speed, dt);
    }

    // Bouncers ricochet off the zone walls
    for b in zone.bouncers.iter_mut() {
        b.pos += b.vel * dt;
        let max = zone.rect.max();
        if b.pos.x - b.radius < zone.rect.min.x {
            b.vel.x = b.vel.x.abs();
            b.pos.x = zone.rect.min.x + b.radius;
        } else if b.pos.x + b.radius > max.x {
            b.vel.x = -b.vel.x.abs();
            b.pos.x = max.x - b.radius;
        }
        if b.pos.y - b.radius < zone.rect.min.y {
            b.vel.y = b.vel.y.abs();
            b.pos.y = zone.rect.min.y + b.radius;
        } else if b.pos.y + b.radius > max.y {
            b.vel.y = -b.vel.y.abs();
            b.pos.y = max.y - b.radius;
        }
    }

    // Flat shove off anything a bouncer touches this frame
    for b in &zone.bouncers {
        if player.pos.distance(b.pos) < player.radius + b.radius {
            player.pos = knockback(player.pos, b.pos, BOUNCE_KNOCKBACK);
        }
        for e in zone.enemies.iter_mut() {
            if e.core.pos.distance(b.pos) < e.core.radius + b.radius {
                e.core.pos = knockback(e.core.pos, b.pos, BOUNCE_KNOCKBACK);
            }
        }
    }

    // Drifting egg: bounce inside a 20 px margin, caught only on overlap
    if !zone.egg.collected {
        zone.egg.pos += zone.egg.vel * dt;
        let min = zone.rect.min + Vec2::splat(REEF_EGG_MARGIN);
        let max = zone.rect.max() - Vec2::splat(REEF_EGG_MARGIN);
        if zone.egg.pos.x < min.x {
            zone.egg.vel.x = zone.egg.vel.x.abs();
            zone.egg.pos.x = min.x;
        } else if zone.egg.pos.x > max.x {
            zone.egg.vel.x = -zone.egg.vel.x.abs();
            zone.egg.pos.x = max.x;
        }
        if zone.egg.pos.y < min.y {
            zone.egg.vel.y = zone.egg.vel.y.abs();
            zone.egg.pos.y = min.y;
        } else if zone.egg.pos.y > max.y {
            zone.egg.vel.y = -zone.egg.vel.y.abs();
            zone.egg.pos.y = max.y;
        }
        if player.pos.distance(zone.egg.pos) < player.radius + EGG_CATCH_SLACK {
            zone.egg.collected = true;
            log::info!("reef egg caught");
        }
    }
}
