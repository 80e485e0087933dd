//! Rendering adapter
//!
//! Stateless draw routines over the live simulation state. The core never
//! touches pixels: it issues drawing intents through [`DrawSurface`] and
//! the host's backend rasterizes them however it likes. [`PrimitiveList`]
//! records the intents for headless runs and tests.
//!
//! Everything here is a pure function of `(state, cam)`; nothing in the
//! simulation is mutated.

use glam::Vec2;

use crate::sim::SimState;
use crate::sim::state::{CanopyZone, GlacialZone, ReefZone, VolcanicZone, Zone};

/// RGBA, straight alpha, 0-1 per channel
pub type Color = [f32; 4];

// Palette
const VOLCANIC_FLOOR: Color = [0.18, 0.07, 0.05, 1.0];
const GLACIAL_FLOOR: Color = [0.07, 0.11, 0.18, 1.0];
const CANOPY_FLOOR: Color = [0.06, 0.14, 0.07, 1.0];
const REEF_FLOOR: Color = [0.05, 0.10, 0.16, 1.0];
const LAVA: Color = [1.0, 0.42, 0.12, 0.8];
const GEYSER_DORMANT_RING: Color = [0.45, 0.25, 0.18, 0.6];
const GEYSER_ERUPTING: Color = [1.0, 0.62, 0.2, 0.9];
const FROST_TILE: Color = [0.62, 0.78, 0.92, 0.85];
const ICE_BULLET: Color = [0.78, 0.92, 1.0, 1.0];
const FOLIAGE: Color = [0.12, 0.35, 0.14, 1.0];
const BOUNCER: Color = [0.25, 0.55, 0.7, 1.0];
const EGG: Color = [0.98, 0.93, 0.76, 1.0];
const EGG_RING: Color = [0.98, 0.93, 0.76, 0.45];
const SAFE_RING: Color = [0.85, 0.95, 0.85, 0.7];
const FROSTWYRM_BODY: Color = [0.55, 0.75, 0.95, 1.0];
const THORNWYRM_BODY: Color = [0.35, 0.6, 0.25, 1.0];
const TIDEWYRM_BODY: Color = [0.3, 0.65, 0.8, 1.0];

/// Drawing intents the simulation emits
pub trait DrawSurface {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color);
    fn line(&mut self, a: Vec2, b: Vec2, color: Color);
}

/// One recorded drawing intent
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color },
    FillRect { min: Vec2, size: Vec2, color: Color },
    Line { a: Vec2, b: Vec2, color: Color },
}

/// Recording surface: collects intents instead of rasterizing them
#[derive(Debug, Default)]
pub struct PrimitiveList {
    pub primitives: Vec<Primitive>,
}

impl PrimitiveList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl DrawSurface for PrimitiveList {
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.primitives.push(Primitive::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.primitives.push(Primitive::StrokeCircle { center, radius, color });
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.primitives.push(Primitive::FillRect { min, size, color });
    }

    fn line(&mut self, a: Vec2, b: Vec2, color: Color) {
        self.primitives.push(Primitive::Line { a, b, color });
    }
}

/// Magmawyrm body color as its compounding boost heats up
/// (dull ember at x1, near-white past x2)
fn heat_color(speed_boost: f32) -> Color {
    let t = ((speed_boost - 1.0) / 1.0).clamp(0.0, 1.0);
    [0.85 + 0.15 * t, 0.3 + 0.55 * t, 0.15 + 0.5 * t, 1.0]
}

/// Draw the whole simulation translated by the camera offset.
pub fn draw(state: &SimState, surface: &mut impl DrawSurface, cam: Vec2) {
    draw_volcanic(&state.volcanic, state.volcanic_phase, surface, cam);
    draw_glacial(&state.glacial, surface, cam);
    draw_canopy(&state.canopy, state.canopy_phase, surface, cam);
    draw_reef(&state.reef, state.reef_phase, surface, cam);

    if state.safe_zone.active {
        surface.stroke_circle(state.safe_zone.center - cam, state.safe_zone.radius, SAFE_RING);
    }
}

fn draw_floor(rect: &Zone, color: Color, surface: &mut impl DrawSurface, cam: Vec2) {
    surface.fill_rect(rect.min - cam, rect.size, color);
}

fn draw_volcanic(zone: &VolcanicZone, phase: f32, surface: &mut impl DrawSurface, cam: Vec2) {
    draw_floor(&zone.rect, VOLCANIC_FLOOR, surface, cam);

    for t in &zone.trails {
        let mut c = LAVA;
        c[3] *= t.life / t.max_life;
        surface.fill_circle(t.pos - cam, t.radius, c);
    }

    for g in &zone.geysers {
        if g.erupting {
            // Erupting vents pulse
            let r = g.radius * (1.0 + 0.08 * (phase * 4.0).sin());
            surface.fill_circle(g.pos - cam, r, GEYSER_ERUPTING);
        } else {
            surface.stroke_circle(g.pos - cam, g.radius, GEYSER_DORMANT_RING);
        }
    }

    if !zone.egg.collected {
        surface.fill_circle(zone.egg.pos - cam, zone.egg.radius, EGG);
    }

    for e in &zone.enemies {
        surface.fill_circle(e.core.pos - cam, e.core.radius, heat_color(e.speed_boost));
    }
}

fn draw_glacial(zone: &GlacialZone, surface: &mut impl DrawSurface, cam: Vec2) {
    draw_floor(&zone.rect, GLACIAL_FLOOR, surface, cam);

    for t in &zone.tiles {
        surface.fill_rect(t.min - cam, t.size, FROST_TILE);
    }

    for b in &zone.bullets {
        surface.fill_circle(b.pos - cam, b.radius, ICE_BULLET);
        // Short motion streak behind the bullet
        surface.line(b.pos - cam, b.pos - b.vel * 0.05 - cam, ICE_BULLET);
    }

    if !zone.egg.collected {
        surface.fill_circle(zone.egg.pos - cam, zone.egg.radius, EGG);
        // Thaw progress ring widens as the dwell completes
        let progress = (zone.egg.thaw / crate::consts::THAW_REQUIRED).clamp(0.0, 1.0);
        surface.stroke_circle(
            zone.egg.pos - cam,
            zone.egg.radius + 4.0 + 8.0 * progress,
            EGG_RING,
        );
    }

    for e in &zone.enemies {
        surface.fill_circle(e.core.pos - cam, e.core.radius, FROSTWYRM_BODY);
        surface.stroke_circle(e.core.pos - cam, e.expand_radius, [0.55, 0.75, 0.95, 0.2]);
    }
}

fn draw_canopy(zone: &CanopyZone, phase: f32, surface: &mut impl DrawSurface, cam: Vec2) {
    draw_floor(&zone.rect, CANOPY_FLOOR, surface, cam);

    for (i, o) in zone.obstacles.iter().enumerate() {
        // Gentle idle sway, staggered per clump
        let sway = (phase + i as f32 * 0.7).sin() * 2.0;
        surface.fill_circle(o.pos + Vec2::new(sway, 0.0) - cam, o.radius, FOLIAGE);
    }

    if !zone.egg.collected && zone.egg.visible {
        surface.fill_circle(zone.egg.pos - cam, zone.egg.radius, EGG);
    }

    for e in zone.enemies.iter().filter(|e| e.visible) {
        surface.fill_circle(e.core.pos - cam, e.core.radius, THORNWYRM_BODY);
        if e.lunging {
            surface.line(
                e.core.pos - cam,
                e.core.pos - e.lunge_vel * 0.06 - cam,
                [0.35, 0.6, 0.25, 0.5],
            );
        }
    }
}

fn draw_reef(zone: &ReefZone, phase: f32, surface: &mut impl DrawSurface, cam: Vec2) {
    draw_floor(&zone.rect, REEF_FLOOR, surface, cam);

    for b in &zone.bouncers {
        surface.fill_circle(b.pos - cam, b.radius, BOUNCER);
    }

    if !zone.egg.collected {
        surface.fill_circle(zone.egg.pos - cam, zone.egg.radius, EGG);
    }

    for e in &zone.enemies {
        // Shimmer rides the rendering phase only
        let r = e.core.radius * (1.0 + 0.05 * (phase * 3.0 + e.wave_offset).sin());
        surface.fill_circle(e.core.pos - cam, r, TIDEWYRM_BODY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Simulation;
    use crate::tuning::Tuning;

    #[test]
    fn test_draw_records_primitives() {
        let sim = Simulation::new(1, 42);
        let mut list = PrimitiveList::new();
        sim.draw(&mut list, Vec2::ZERO);
        assert!(!list.is_empty());
        // Four zone floors always present
        let floors = list
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::FillRect { size, .. } if *size == Vec2::splat(crate::consts::ZONE_SIZE)))
            .count();
        assert_eq!(floors, 4);
    }

    #[test]
    fn test_draw_is_camera_translated() {
        let sim = Simulation::new(1, 42);
        let mut at_origin = PrimitiveList::new();
        let mut shifted = PrimitiveList::new();
        sim.draw(&mut at_origin, Vec2::ZERO);
        sim.draw(&mut shifted, Vec2::new(100.0, 50.0));

        let (Primitive::FillRect { min: a, .. }, Primitive::FillRect { min: b, .. }) =
            (&at_origin.primitives[0], &shifted.primitives[0])
        else {
            panic!("expected zone floors first");
        };
        assert_eq!(*a - *b, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_draw_mutates_nothing() {
        let sim = Simulation::new(3, 7);
        let mut first = PrimitiveList::new();
        let mut second = PrimitiveList::new();
        sim.draw(&mut first, Vec2::ZERO);
        sim.draw(&mut second, Vec2::ZERO);
        assert_eq!(first.primitives, second.primitives);
    }

    #[test]
    fn test_hidden_things_are_not_drawn() {
        let mut sim = Simulation::new(1, 42);
        // Thornwyrms start invisible; collected eggs disappear
        sim.state.canopy.egg.collected = true;
        sim.state.reef.egg.collected = true;
        sim.state.volcanic.egg.collected = true;
        sim.state.glacial.egg.collected = true;
        let mut list = PrimitiveList::new();
        sim.draw(&mut list, Vec2::ZERO);

        let egg_draws = list
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::FillCircle { color, .. } if *color == EGG))
            .count();
        assert_eq!(egg_draws, 0);

        let thorn_draws = list
            .primitives
            .iter()
            .filter(|p| matches!(p, Primitive::FillCircle { color, .. } if *color == THORNWYRM_BODY))
            .count();
        assert_eq!(thorn_draws, 0);
    }

    #[test]
    fn test_safe_zone_ring_follows_activity() {
        let mut sim = Simulation::with_tuning(1, 9, Tuning::default());
        let mut list = PrimitiveList::new();
        sim.draw(&mut list, Vec2::ZERO);
        let rings = |l: &PrimitiveList| {
            l.primitives
                .iter()
                .filter(|p| matches!(p, Primitive::StrokeCircle { color, .. } if *color == SAFE_RING))
                .count()
        };
        assert_eq!(rings(&list), 1);

        sim.state.safe_zone.active = false;
        list.clear();
        sim.draw(&mut list, Vec2::ZERO);
        assert_eq!(rings(&list), 0);
    }
}
