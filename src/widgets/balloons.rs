//! Balloon pop game.
//!
//! `start` spawns a batch of balloons that rise through the play area, each on
//! its own delay and speed. Completion is derived from the batch on every
//! query rather than stored.

use super::sample_range;
use crate::BALLOON_COLORS;

pub const X_PCT_MIN: f64 = 5.0;
pub const X_PCT_SPAN: f64 = 85.0;
pub const SIZE_MIN: f64 = 50.0;
pub const SIZE_SPAN: f64 = 30.0;
pub const DELAY_SPAN_SECS: f64 = 3.0;
pub const RISE_SECS_MIN: f64 = 6.0;
pub const RISE_SECS_SPAN: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BalloonColor {
    Pink,
    Violet,
    Lemon,
    Mint,
    Coral,
    Sky,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 6] = [
        BalloonColor::Pink,
        BalloonColor::Violet,
        BalloonColor::Lemon,
        BalloonColor::Mint,
        BalloonColor::Coral,
        BalloonColor::Sky,
    ];

    pub fn hex(self) -> &'static str {
        BALLOON_COLORS[self as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Balloon {
    pub id: u32,
    pub x_pct: f64,
    pub color: BalloonColor,
    pub size: f64,
    pub popped: bool,
    pub delay_secs: f64,
    pub rise_secs: f64,
}

impl Balloon {
    /// 0.0 while waiting below the play area, 1.0 once fully risen out of it.
    pub fn rise_progress(&self, elapsed_secs: f64) -> f64 {
        ((elapsed_secs - self.delay_secs) / self.rise_secs).clamp(0.0, 1.0)
    }

    /// Risen out of view without being popped.
    pub fn escaped(&self, elapsed_secs: f64) -> bool {
        !self.popped && self.rise_progress(elapsed_secs) >= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopOutcome {
    Ignored,
    Popped,
    /// This pop was the last balloon of the batch.
    Completed,
}

impl PopOutcome {
    pub fn changed(self) -> bool {
        !matches!(self, PopOutcome::Ignored)
    }
}

#[derive(Debug, Default)]
pub struct BalloonGame {
    balloons: Vec<Balloon>,
    score: u32,
    started: bool,
    started_ms: f64,
    round: u32,
}

impl BalloonGame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the score and replace the batch with `count` fresh balloons.
    pub fn start(&mut self, rng: &mut fastrand::Rng, count: usize, now_ms: f64) {
        self.balloons = (0..count as u32)
            .map(|id| Balloon {
                id,
                x_pct: sample_range(rng, X_PCT_MIN, X_PCT_SPAN),
                color: BalloonColor::ALL[rng.usize(..BalloonColor::ALL.len())],
                size: sample_range(rng, SIZE_MIN, SIZE_SPAN),
                popped: false,
                delay_secs: rng.f64() * DELAY_SPAN_SECS,
                rise_secs: sample_range(rng, RISE_SECS_MIN, RISE_SECS_SPAN),
            })
            .collect();
        self.score = 0;
        self.started = true;
        self.started_ms = now_ms;
        self.round += 1;
    }

    pub fn pop(&mut self, id: u32) -> PopOutcome {
        let Some(slot) = self.balloons.iter_mut().find(|b| b.id == id) else {
            return PopOutcome::Ignored;
        };
        if slot.popped {
            return PopOutcome::Ignored;
        }
        *slot = Balloon { popped: true, ..*slot };
        self.score += 1;
        if self.is_complete() {
            PopOutcome::Completed
        } else {
            PopOutcome::Popped
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.balloons.is_empty() && self.balloons.iter().all(|b| b.popped)
    }

    /// Every balloon is either popped or has risen away. An empty batch is
    /// over as soon as it starts.
    pub fn is_round_over(&self, now_ms: f64) -> bool {
        let elapsed = self.elapsed_secs(now_ms);
        self.started && self.balloons.iter().all(|b| b.popped || b.escaped(elapsed))
    }

    pub fn escaped_count(&self, now_ms: f64) -> usize {
        let elapsed = self.elapsed_secs(now_ms);
        self.balloons.iter().filter(|b| b.escaped(elapsed)).count()
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        ((now_ms - self.started_ms) / 1000.0).max(0.0)
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn popped_count(&self) -> usize {
        self.balloons.iter().filter(|b| b.popped).count()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Number of times `start` has been called.
    pub fn round(&self) -> u32 {
        self.round
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(count: usize) -> BalloonGame {
        let mut rng = fastrand::Rng::with_seed(42);
        let mut game = BalloonGame::new();
        game.start(&mut rng, count, 0.0);
        game
    }

    #[test]
    fn start_spawns_unpopped_batch_in_range() {
        let game = started(12);
        assert!(game.is_started());
        assert_eq!(game.score(), 0);
        assert_eq!(game.balloons().len(), 12);
        for b in game.balloons() {
            assert!(!b.popped);
            assert!((X_PCT_MIN..X_PCT_MIN + X_PCT_SPAN).contains(&b.x_pct));
            assert!((SIZE_MIN..SIZE_MIN + SIZE_SPAN).contains(&b.size));
            assert!((0.0..DELAY_SPAN_SECS).contains(&b.delay_secs));
            assert!((RISE_SECS_MIN..RISE_SECS_MIN + RISE_SECS_SPAN).contains(&b.rise_secs));
        }
    }

    #[test]
    fn double_pop_scores_once() {
        let mut game = started(12);
        assert_eq!(game.pop(4), PopOutcome::Popped);
        assert_eq!(game.pop(4), PopOutcome::Ignored);
        assert_eq!(game.score(), 1);
        assert_eq!(game.pop(400), PopOutcome::Ignored);
    }

    #[test]
    fn completion_needs_every_balloon() {
        let mut game = started(12);
        for id in 0..11 {
            game.pop(id);
        }
        assert!(!game.is_complete());
        assert_eq!(game.pop(11), PopOutcome::Completed);
        assert!(game.is_complete());
        assert_eq!(game.score(), 12);
    }

    #[test]
    fn unstarted_game_is_not_complete() {
        let game = BalloonGame::new();
        assert!(!game.is_complete());
        assert!(!game.is_round_over(10_000.0));
    }

    #[test]
    fn escaped_balloons_end_the_round_without_completing() {
        let mut game = started(3);
        game.pop(0);
        // Longest possible delay + rise is under 13 s.
        assert!(game.is_round_over(13_000.0));
        assert_eq!(game.escaped_count(13_000.0), 2);
        assert!(!game.is_complete());
        assert!(!game.is_round_over(0.0));
    }

    #[test]
    fn empty_batch_can_be_restarted() {
        let game = started(0);
        assert!(game.is_started());
        assert!(!game.is_complete());
        assert!(game.is_round_over(0.0));
    }

    #[test]
    fn rise_progress_waits_for_delay() {
        let b = Balloon {
            id: 0,
            x_pct: 50.0,
            color: BalloonColor::Sky,
            size: 60.0,
            popped: false,
            delay_secs: 2.0,
            rise_secs: 8.0,
        };
        assert_eq!(b.rise_progress(1.0), 0.0);
        assert!((b.rise_progress(6.0) - 0.5).abs() < 1e-9);
        assert!(b.escaped(10.0));
        assert!(!Balloon { popped: true, ..b }.escaped(10.0));
    }

    #[test]
    fn restart_replaces_batch() {
        let mut rng = fastrand::Rng::with_seed(1);
        let mut game = BalloonGame::new();
        game.start(&mut rng, 12, 0.0);
        for id in 0..12 {
            game.pop(id);
        }
        game.start(&mut rng, 12, 5_000.0);
        assert_eq!(game.round(), 2);
        assert_eq!(game.score(), 0);
        assert_eq!(game.popped_count(), 0);
        assert!(!game.is_complete());
    }
}
