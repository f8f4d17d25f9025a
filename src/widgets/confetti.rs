//! Confetti emitter.
//!
//! Particles are immutable once emitted: everything needed to animate them
//! (birth time, delay, fall duration) is fixed at creation, and the frame for
//! any timestamp is computed on demand. The emitter only tracks visibility and
//! drops particles whose fall has finished.

use super::sample_range;
use crate::CONFETTI_COLORS;

pub const PARTICLE_SIZE_MIN: f64 = 8.0;
pub const PARTICLE_SIZE_SPAN: f64 = 8.0;
pub const FALL_SECS_MIN: f64 = 4.0;
pub const FALL_SECS_SPAN: f64 = 2.0;
/// Total spin over one fall.
pub const FALL_ROTATION_DEG: f64 = 720.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfettiColor {
    Pink,
    Violet,
    Lemon,
    Mint,
    Coral,
    Sky,
    Peach,
}

impl ConfettiColor {
    pub const ALL: [ConfettiColor; 7] = [
        ConfettiColor::Pink,
        ConfettiColor::Violet,
        ConfettiColor::Lemon,
        ConfettiColor::Mint,
        ConfettiColor::Coral,
        ConfettiColor::Sky,
        ConfettiColor::Peach,
    ];

    pub fn hex(self) -> &'static str {
        CONFETTI_COLORS[self as usize]
    }

    fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub id: u64,
    /// Horizontal position as a percentage of viewport width, in [0, 100).
    pub x_pct: f64,
    pub color: ConfettiColor,
    pub delay_secs: f64,
    pub size: f64,
    pub fall_secs: f64,
    /// Round dot or square flake.
    pub round: bool,
    pub born_ms: f64,
}

/// Where a particle is drawn at a given instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleFrame {
    pub x_pct: f64,
    /// 0.0 at the top of the viewport, 1.0 at the bottom.
    pub fall: f64,
    pub rotation_deg: f64,
    pub opacity: f64,
}

impl Particle {
    pub fn expires_at_ms(&self) -> f64 {
        self.born_ms + (self.delay_secs + self.fall_secs) * 1000.0
    }

    /// Frame at `now_ms`. Before the delay has elapsed the particle waits at the
    /// top fully opaque; after the fall it is gone.
    pub fn frame_at(&self, now_ms: f64) -> Option<ParticleFrame> {
        if now_ms >= self.expires_at_ms() {
            return None;
        }
        let elapsed = (now_ms - self.born_ms) / 1000.0 - self.delay_secs;
        let t = (elapsed / self.fall_secs).clamp(0.0, 1.0);
        Some(ParticleFrame {
            x_pct: self.x_pct,
            fall: t,
            rotation_deg: FALL_ROTATION_DEG * t,
            opacity: 1.0 - t,
        })
    }
}

#[derive(Debug, Default)]
pub struct ConfettiEmitter {
    particles: Vec<Particle>,
    visible: bool,
    next_id: u64,
    generation: u64,
}

impl ConfettiEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` fresh particles. Existing particles are kept.
    pub fn emit(
        &mut self,
        rng: &mut fastrand::Rng,
        count: usize,
        delay_spread_secs: f64,
        now_ms: f64,
    ) {
        self.particles.reserve(count);
        for _ in 0..count {
            let id = self.next_id;
            self.next_id += 1;
            self.particles.push(Particle {
                id,
                x_pct: rng.f64() * 100.0,
                color: ConfettiColor::random(rng),
                delay_secs: rng.f64() * delay_spread_secs,
                size: sample_range(rng, PARTICLE_SIZE_MIN, PARTICLE_SIZE_SPAN),
                fall_secs: sample_range(rng, FALL_SECS_MIN, FALL_SECS_SPAN),
                round: rng.bool(),
                born_ms: now_ms,
            });
        }
    }

    /// Make confetti visible and open a new visibility generation. The caller
    /// schedules the matching `hide`.
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    /// Close the visibility window opened by `show` for `generation`, discarding
    /// every particle. A stale generation is ignored.
    pub fn hide(&mut self, generation: u64) -> bool {
        if !self.visible || generation != self.generation {
            return false;
        }
        self.visible = false;
        self.particles.clear();
        true
    }

    /// Drop particles whose fall has finished. Returns how many were removed.
    pub fn collect_expired(&mut self, now_ms: f64) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| p.expires_at_ms() > now_ms);
        before - self.particles.len()
    }

    pub fn particles_at(
        &self,
        now_ms: f64,
    ) -> impl Iterator<Item = (&Particle, ParticleFrame)> + '_ {
        self.particles.iter().filter_map(move |p| p.frame_at(now_ms).map(|f| (p, f)))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(7)
    }

    #[test]
    fn emit_appends_within_ranges() {
        let mut rng = rng();
        let mut em = ConfettiEmitter::new();
        em.emit(&mut rng, 50, 2.0, 0.0);
        em.emit(&mut rng, 30, 1.0, 100.0);
        assert_eq!(em.len(), 80);
        for p in em.particles() {
            assert!((0.0..100.0).contains(&p.x_pct));
            assert!((PARTICLE_SIZE_MIN..PARTICLE_SIZE_MIN + PARTICLE_SIZE_SPAN).contains(&p.size));
            assert!((FALL_SECS_MIN..FALL_SECS_MIN + FALL_SECS_SPAN).contains(&p.fall_secs));
        }
        assert!(em.particles()[50..].iter().all(|p| p.delay_secs < 1.0));
    }

    #[test]
    fn ids_are_unique_across_batches() {
        let mut rng = rng();
        let mut em = ConfettiEmitter::new();
        em.emit(&mut rng, 10, 1.0, 0.0);
        em.emit(&mut rng, 10, 1.0, 0.0);
        let ids: std::collections::HashSet<u64> = em.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn frame_fades_out_over_fall() {
        let p = Particle {
            id: 0,
            x_pct: 40.0,
            color: ConfettiColor::Mint,
            delay_secs: 1.0,
            size: 10.0,
            fall_secs: 4.0,
            round: false,
            born_ms: 1_000.0,
        };
        let waiting = p.frame_at(1_500.0).unwrap();
        assert_eq!(waiting.fall, 0.0);
        assert_eq!(waiting.opacity, 1.0);
        let half = p.frame_at(4_000.0).unwrap();
        assert!((half.fall - 0.5).abs() < 1e-9);
        assert!((half.rotation_deg - 360.0).abs() < 1e-9);
        assert!(p.frame_at(6_000.0).is_none());
    }

    #[test]
    fn collect_expired_drops_finished_particles() {
        let mut rng = rng();
        let mut em = ConfettiEmitter::new();
        em.emit(&mut rng, 20, 0.0, 0.0);
        assert_eq!(em.collect_expired(3_999.0), 0);
        assert_eq!(em.collect_expired(6_000.0), 20);
        assert!(em.is_empty());
    }

    #[test]
    fn stale_hide_is_ignored() {
        let mut rng = rng();
        let mut em = ConfettiEmitter::new();
        let first = em.show();
        assert!(em.hide(first));
        let second = em.show();
        em.emit(&mut rng, 5, 1.0, 0.0);
        assert!(!em.hide(first));
        assert!(em.is_visible());
        assert_eq!(em.len(), 5);
        assert!(em.hide(second));
        assert!(em.is_empty());
    }
}
