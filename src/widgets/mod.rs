//! The four interactive widgets. Each owns its own state and reports what
//! changed; the page coordinator decides what follows (timers, confetti).

pub mod balloons;
pub mod cake;
pub mod confetti;
pub mod gifts;

/// Uniform draw in `[min, min + span)`.
pub(crate) fn sample_range(rng: &mut fastrand::Rng, min: f64, span: f64) -> f64 {
    min + rng.f64() * span
}
