//! Volcanic zone simulator - magmawyrms
//!
//! Straight-line chasers that escalate on a 5 s compounding speed clock,
//! paint decaying lava trails while they move, and split into two smaller,
//! faster children when the player's ability fires nearby. Five geysers on
//! a fixed grid cycle independently and repel the player while erupting.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::{effect_pass, movement_blocked, speed_factor};
use super::mechanics::{push_out_of_circle, seek};
use super::state::{
    ContactEgg, Geyser, LavaTrail, Magmawyrm, Player, VolcanicZone, alive_count, world,
};
use crate::consts::*;
use crate::tuning::Tuning;

/// Geyser positions as fractions of the zone rectangle (quincunx)
const GEYSER_GRID: [(f32, f32); 5] = [
    (0.25, 0.25),
    (0.75, 0.25),
    (0.5, 0.5),
    (0.25, 0.75),
    (0.75, 0.75),
];

pub(crate) fn generate(rng: &mut Pcg32, tuning: &Tuning) -> VolcanicZone {
    let rect = world::VOLCANIC;

    let enemies = (0..tuning.volcanic_spawns)
        .map(|_| Magmawyrm::spawn(rect.random_point(rng, 60.0)))
        .collect();

    // Independent phase per geyser via a randomized initial stagger
    let geysers = GEYSER_GRID
        .iter()
        .map(|&(fx, fy)| Geyser {
            pos: rect.min + rect.size * Vec2::new(fx, fy),
            radius: GEYSER_RADIUS,
            timer: rng.random_range(0.0..GEYSER_DORMANT),
            erupting: false,
        })
        .collect();

    VolcanicZone {
        rect,
        enemies,
        trails: Vec::new(),
        geysers,
        egg: ContactEgg {
            pos: rect.random_point(rng, 80.0),
            radius: EGG_RADIUS,
            collected: false,
        },
        boost_timer: 0.0,
    }
}

/// Hazard clocks that move no entity; these tick even before the player's
/// first movement.
pub(crate) fn tick_hazards(zone: &mut VolcanicZone, dt: f32) {
    for t in zone.trails.iter_mut() {
        t.life -= dt;
    }
    zone.trails.retain(|t| t.life > 0.0);

    for g in zone.geysers.iter_mut() {
        g.timer -= dt;
        while g.timer <= 0.0 {
            g.erupting = !g.erupting;
            g.timer += if g.erupting { GEYSER_ERUPT } else { GEYSER_DORMANT };
        }
    }
}

pub(crate) fn update(
    zone: &mut VolcanicZone,
    dt: f32,
    player: &mut Player,
    rng: &mut Pcg32,
    speed_mult: f32,
    cap: usize,
    ability_just_used: bool,
) {
    effect_pass(&mut zone.enemies, dt);

    // Zone-wide escalation: every 5 s every enemy compounds a x1.15 boost
    zone.boost_timer += dt;
    while zone.boost_timer >= SPEED_BOOST_INTERVAL {
        zone.boost_timer -= SPEED_BOOST_INTERVAL;
        for e in zone.enemies.iter_mut() {
            e.speed_boost *= SPEED_BOOST_FACTOR;
        }
        log::debug!("volcanic speed boost applied to {} enemies", zone.enemies.len());
    }

    if ability_just_used {
        split_near_player(zone, player, rng, cap);
    }

    // Chase + lava trail drops
    for e in zone.enemies.iter_mut() {
        if e.core.frozen || movement_blocked(&e.core.effects) {
            continue;
        }
        let speed = e.core.base_speed * speed_mult * e.speed_boost * speed_factor(&e.core.effects);
        let before = e.core.pos;
        e.core.pos = seek(e.core.pos, player.pos, speed, dt);

        // Trail cadence counts active movement only
        if e.core.pos != before {
            e.trail_timer += dt;
            if e.trail_timer >= TRAIL_INTERVAL {
                e.trail_timer -= TRAIL_INTERVAL;
                zone.trails.push(LavaTrail {
                    pos: e.core.pos,
                    radius: e.core.radius * TRAIL_RADIUS_FACTOR,
                    life: TRAIL_LIFE,
                    max_life: TRAIL_LIFE,
                });
            }
        }
    }

    // Lava and erupting geysers repel the player (push-out, not damage)
    for t in &zone.trails {
        player.pos = push_out_of_circle(player.pos, player.radius, t.pos, t.radius);
    }
    for g in zone.geysers.iter().filter(|g| g.erupting) {
        player.pos = push_out_of_circle(player.pos, player.radius, g.pos, g.radius);
    }

    if !zone.egg.collected
        && player.pos.distance(zone.egg.pos) < player.radius + EGG_CATCH_SLACK
    {
        zone.egg.collected = true;
        log::info!("volcanic egg collected");
    }
}

/// Ability-triggered split: every sufficiently large enemy within range
/// dies and, cap permitting, leaves two smaller, faster children at
/// randomized offsets inside twice the parent's radius. Enemies below the
/// size threshold ignore the ability entirely.
fn split_near_player(zone: &mut VolcanicZone, player: &Player, rng: &mut Pcg32, cap: usize) {
    let mut count = alive_count(&zone.enemies);
    let mut children = Vec::new();

    for e in zone.enemies.iter_mut() {
        if !e.core.alive || e.size_mult <= SPLIT_MIN_SIZE {
            continue;
        }
        if e.core.pos.distance(player.pos) > SPLIT_RANGE {
            continue;
        }
        e.core.alive = false;
        count -= 1;
        if count + 2 <= cap {
            for _ in 0..2 {
                let angle = rng.random_range(0.0..std::f32::consts::TAU);
                let offset = Vec2::from_angle(angle)
                    * rng.random_range(0.0..e.core.radius * 2.0);
                children.push(Magmawyrm::child_of(e, e.core.pos + offset));
            }
            count += 2;
        }
    }

    zone.enemies.retain(|e| e.core.alive);
    if !children.is_empty() {
        log::debug!("magmawyrm split produced {} children", children.len());
        zone.enemies.extend(children);
    }
}
