//! Status effects shared by enemies and the player
//!
//! Effects are the interop vocabulary between the simulation core and the
//! external ability system: producers append them, the core ticks them once
//! per frame, prunes the expired, and composes the survivors into a speed
//! factor and a movement gate. A `remaining` of `f32::INFINITY` marks a
//! permanent effect; `Dead` is the infinite-duration kill sentinel.

use super::state::Wyrm;

/// Effect variants the core recognizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Movement-blocking cold snap
    Freeze,
    /// Movement-blocking daze
    Stun,
    /// Multiplicative speed modifier, timed
    Slow { factor: f32 },
    /// Multiplicative speed modifier that never expires
    PermanentSlow { factor: f32 },
    /// Kill sentinel; consumers remove the entity rather than the effect
    Dead,
}

/// One attached effect instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    pub kind: EffectKind,
    /// Seconds remaining; `f32::INFINITY` denotes a permanent effect
    pub remaining: f32,
}

impl StatusEffect {
    pub fn timed(kind: EffectKind, secs: f32) -> Self {
        Self {
            kind,
            remaining: secs,
        }
    }

    pub fn permanent(kind: EffectKind) -> Self {
        Self {
            kind,
            remaining: f32::INFINITY,
        }
    }

    pub fn is_permanent(&self) -> bool {
        self.remaining.is_infinite()
    }
}

/// Advance every effect by `dt` and drop the expired ones.
/// Permanent effects are untouched.
pub fn tick_effects(effects: &mut Vec<StatusEffect>, dt: f32) {
    for e in effects.iter_mut() {
        if e.remaining.is_finite() {
            e.remaining -= dt;
        }
    }
    effects.retain(|e| e.remaining > 0.0);
}

/// Composed multiplicative speed factor from all slow effects (stacking).
pub fn speed_factor(effects: &[StatusEffect]) -> f32 {
    effects.iter().fold(1.0, |acc, e| match e.kind {
        EffectKind::Slow { factor } | EffectKind::PermanentSlow { factor } => acc * factor,
        _ => acc,
    })
}

/// Freeze and stun suppress movement outright.
pub fn movement_blocked(effects: &[StatusEffect]) -> bool {
    effects
        .iter()
        .any(|e| matches!(e.kind, EffectKind::Freeze | EffectKind::Stun))
}

/// Whether the kill sentinel is attached.
pub fn is_dead(effects: &[StatusEffect]) -> bool {
    effects.iter().any(|e| e.kind == EffectKind::Dead)
}

/// Per-zone effect pass: tick every enemy's effects, translate the `Dead`
/// sentinel into `alive = false`, and purge the dead from the list.
pub(crate) fn effect_pass<W: Wyrm>(enemies: &mut Vec<W>, dt: f32) {
    for e in enemies.iter_mut() {
        let core = e.core_mut();
        tick_effects(&mut core.effects, dt);
        if is_dead(&core.effects) {
            core.alive = false;
        }
    }
    enemies.retain(|e| e.core().alive);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_effect_expires() {
        let mut effects = vec![StatusEffect::timed(EffectKind::Stun, 1.0)];
        tick_effects(&mut effects, 0.6);
        assert_eq!(effects.len(), 1);
        tick_effects(&mut effects, 0.6);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_permanent_effect_survives() {
        let mut effects = vec![StatusEffect::permanent(EffectKind::Dead)];
        for _ in 0..1000 {
            tick_effects(&mut effects, 10.0);
        }
        assert_eq!(effects.len(), 1);
        assert!(is_dead(&effects));
    }

    #[test]
    fn test_slow_effects_stack_multiplicatively() {
        let effects = vec![
            StatusEffect::timed(EffectKind::Slow { factor: 0.5 }, 2.0),
            StatusEffect::permanent(EffectKind::PermanentSlow { factor: 0.8 }),
        ];
        assert!((speed_factor(&effects) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_movement_gate() {
        let mut effects = vec![StatusEffect::timed(EffectKind::Slow { factor: 0.5 }, 2.0)];
        assert!(!movement_blocked(&effects));
        effects.push(StatusEffect::timed(EffectKind::Freeze, 0.5));
        assert!(movement_blocked(&effects));
    }
}
