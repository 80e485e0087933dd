//! Glacial zone simulator - frostwyrms
//!
//! Stationary emitters that creep around their own drop rings, paving the
//! zone with permanent frozen tiles, and snipe the player with ice bullets
//! on an alternating long/short cooldown. A bullet hit is an instant-kill
//! signal: the core appends the infinite `Dead` effect and leaves ending
//! the game to the host. The egg thaws under proximity dwell.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::{EffectKind, StatusEffect, effect_pass, movement_blocked};
use super::mechanics::resolve_circle_rect;
use super::state::{FrozenTile, Frostwyrm, GlacialZone, IceBullet, Player, ThawEgg, world};
use crate::consts::*;
use crate::dir_toward;
use crate::tuning::Tuning;

pub(crate) fn generate(rng: &mut Pcg32, tuning: &Tuning) -> GlacialZone {
    let rect = world::GLACIAL;

    let enemies = (0..tuning.glacial_spawns)
        .map(|_| Frostwyrm::spawn(rect.random_point(rng, 120.0)))
        .collect();

    GlacialZone {
        rect,
        enemies,
        tiles: Vec::new(),
        bullets: Vec::new(),
        egg: ThawEgg {
            pos: rect.random_point(rng, 80.0),
            radius: EGG_RADIUS,
            thaw: 0.0,
            collected: false,
        },
    }
}

pub(crate) fn update(
    zone: &mut GlacialZone,
    dt: f32,
    player: &mut Player,
    rng: &mut Pcg32,
    _speed_mult: f32,
) {
    effect_pass(&mut zone.enemies, dt);

    for e in zone.enemies.iter_mut() {
        if e.core.frozen || movement_blocked(&e.core.effects) {
            continue;
        }

        // Tile paving: every 1.5 s a 40x40 tile lands at a random angle on
        // the current drop ring, the ring widens, and the wyrm drifts
        e.expand_timer += dt;
        if e.expand_timer >= TILE_INTERVAL {
            e.expand_timer -= TILE_INTERVAL;

            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let drop = e.core.pos + Vec2::from_angle(angle) * e.expand_radius;
            zone.tiles.push(FrozenTile::centered_at(drop));

            e.expand_radius = (e.expand_radius + EXPAND_STEP).min(EXPAND_CAP);

            let jitter = Vec2::new(
                rng.random_range(-FROST_JITTER..FROST_JITTER),
                rng.random_range(-FROST_JITTER..FROST_JITTER),
            );
            e.core.pos = zone.rect.clamp_circle(e.core.pos + jitter, e.core.radius);
        }

        // Sniping: the cooldown alternates 2 s / 0.5 s; firing itself is
        // gated on the player being within range
        e.shot_timer -= dt;
        if e.shot_timer <= 0.0 && e.core.pos.distance(player.pos) <= BULLET_RANGE {
            zone.bullets.push(IceBullet {
                pos: e.core.pos,
                vel: dir_toward(e.core.pos, player.pos) * BULLET_SPEED,
                radius: BULLET_RADIUS,
                alive: true,
            });
            e.shot_timer = if e.quick_shot {
                SHOT_COOLDOWN_SHORT
            } else {
                SHOT_COOLDOWN_LONG
            };
            e.quick_shot = !e.quick_shot;
        }
    }

    // Bullet flight; removed off-map or on player contact
    for b in zone.bullets.iter_mut() {
        b.pos += b.vel * dt;
        if !world::BOUNDS.contains(b.pos) {
            b.alive = false;
        } else if b.pos.distance(player.pos) < b.radius + player.radius {
            b.alive = false;
            player
                .effects
                .push(StatusEffect::permanent(EffectKind::Dead));
            log::info!("player struck by ice bullet");
        }
    }
    zone.bullets.retain(|b| b.alive);

    // Frozen tiles are static colliders; minimal-penetration axis, one
    // pass per tile
    for t in &zone.tiles {
        player.pos = resolve_circle_rect(player.pos, player.radius, t.min, t.size);
    }

    // Thaw dwell: progress inside the proximity ring, half-rate decay
    // outside it
    if !zone.egg.collected {
        if player.pos.distance(zone.egg.pos) <= zone.egg.radius + THAW_PROXIMITY {
            zone.egg.thaw += dt;
        } else {
            zone.egg.thaw = (zone.egg.thaw - dt * 0.5).max(0.0);
        }
        if zone.egg.thaw >= THAW_REQUIRED {
            zone.egg.collected = true;
            log::info!("glacial egg thawed and collected");
        }
    }
}
