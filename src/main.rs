//! Wyrmfield headless demo driver
//!
//! Runs the simulation at a fixed timestep with a scripted player sweeping
//! through all four zones, then reports what the level did. Useful for
//! eyeballing escalation pacing and log output without a host game.
//!
//! Usage: `wyrmfield [seed] [level]` (RUST_LOG=debug for zone chatter)

use glam::Vec2;

use wyrmfield::consts::SIM_DT;
use wyrmfield::render::PrimitiveList;
use wyrmfield::sim::{Player, Simulation, world};
use wyrmfield::sim::state::alive_count;

const DEMO_SECONDS: f32 = 60.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let level: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    log::info!("demo run: level {level}, seed {seed}");

    let mut sim = Simulation::new(level, seed);
    let mut player = Player::new(world::CENTER);

    // Scripted walk: a slow loop around the map center wide enough to dip
    // into every zone, with an ability pulse every few seconds
    let frames = (DEMO_SECONDS / SIM_DT) as u32;
    for frame in 0..frames {
        let t = frame as f32 * SIM_DT;
        let angle = t * 0.25;
        let sweep = 420.0 + 160.0 * (t * 0.6).sin();
        player.pos = world::CENTER + Vec2::from_angle(angle) * sweep;
        player.facing = angle + std::f32::consts::FRAC_PI_2;

        if player.ability_cooldown > 0.0 {
            player.ability_cooldown = (player.ability_cooldown - SIM_DT).max(0.0);
        } else if frame % (5 * 120) == 599 {
            player.ability_cooldown = 4.0;
        }

        sim.update(SIM_DT, &mut player);

        if player
            .effects
            .iter()
            .any(|e| matches!(e.kind, wyrmfield::sim::EffectKind::Dead))
        {
            log::warn!("scripted player died at t={t:.1}s");
            break;
        }
    }

    let s = sim.state();
    log::info!(
        "after {:.0}s: volcanic {} alive / {} trails, glacial {} alive / {} tiles, canopy {} alive / {} foliage, reef {} alive, complexity {}",
        s.elapsed,
        alive_count(&s.volcanic.enemies),
        s.volcanic.trails.len(),
        alive_count(&s.glacial.enemies),
        s.glacial.tiles.len(),
        alive_count(&s.canopy.enemies),
        s.canopy.obstacles.len(),
        alive_count(&s.reef.enemies),
        s.reef.complexity,
    );
    log::info!(
        "eggs collected: volcanic {}, glacial {}, canopy {}, reef {}; safe zone uses left {}",
        s.volcanic.egg.collected,
        s.glacial.egg.collected,
        s.canopy.egg.collected,
        s.reef.egg.collected,
        s.safe_zone.uses_left(),
    );

    // One rendered frame, recorded: a quick sanity signal for the adapter
    let mut frame = PrimitiveList::new();
    sim.draw(&mut frame, player.pos - Vec2::new(640.0, 360.0));
    log::info!("one frame draws {} primitives", frame.len());
}
