//! Page coordinator.
//!
//! Owns the four widgets, the shared mute / confetti state and the timeline of
//! delayed transitions. Widget completion events (wish, gift open, balloon pop)
//! all funnel into `trigger_confetti`. Everything here is driven by explicit
//! timestamps so the shell decides what "now" is.

pub mod timeline;

use tracing::{debug, info, warn};

use crate::GIFT_MESSAGES;
use crate::config::PageConfig;
use crate::widgets::balloons::{BalloonGame, PopOutcome};
use crate::widgets::cake::{CandleSequencer, LightOutcome};
use crate::widgets::confetti::ConfettiEmitter;
use crate::widgets::gifts::GiftRevealer;

pub use timeline::{PageEvent, Timeline};

/// Something the page did that the shell may want to surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    WishRevealed,
    GiftOpened { gift: u32 },
    BalloonPopped { balloon: u32, score: u32 },
    GameComplete { score: u32 },
    ConfettiHidden,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct PageSnapshot {
    pub muted: bool,
    pub confetti_visible: bool,
    pub confetti_count: usize,
    pub candles_lit: usize,
    pub wish_revealed: bool,
    pub gifts_opened: Vec<u32>,
    pub game_started: bool,
    pub balloons: usize,
    pub balloons_popped: usize,
    pub score: u32,
    pub game_complete: bool,
}

/// Seed a page RNG from the platform entropy source.
pub fn entropy_rng() -> fastrand::Rng {
    let mut seed = [0u8; 8];
    match getrandom::getrandom(&mut seed) {
        Ok(()) => fastrand::Rng::with_seed(u64::from_le_bytes(seed)),
        Err(err) => {
            warn!(%err, "entropy unavailable, falling back to default seed");
            fastrand::Rng::new()
        }
    }
}

pub struct BirthdayPage {
    config: PageConfig,
    rng: fastrand::Rng,
    timeline: Timeline,
    confetti: ConfettiEmitter,
    cake: CandleSequencer,
    gifts: GiftRevealer,
    balloons: BalloonGame,
    muted: bool,
    notices: Vec<Notice>,
    torn_down: bool,
}

impl BirthdayPage {
    /// Mount the page at `now_ms`: fires the initial confetti burst and opens
    /// its visibility window.
    pub fn new(config: PageConfig, rng: fastrand::Rng, now_ms: f64) -> Self {
        let mut page = Self {
            cake: CandleSequencer::new(config.candle_count),
            gifts: GiftRevealer::new(GIFT_MESSAGES),
            balloons: BalloonGame::new(),
            confetti: ConfettiEmitter::new(),
            timeline: Timeline::new(),
            muted: true,
            notices: Vec::new(),
            torn_down: false,
            config,
            rng,
        };
        page.show_confetti(now_ms);
        page.confetti.emit(
            &mut page.rng,
            page.config.initial_burst,
            page.config.initial_delay_spread_secs,
            now_ms,
        );
        info!(particles = page.confetti.len(), "page mounted");
        page
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn light_candle(&mut self, index: usize, now_ms: f64) -> LightOutcome {
        if self.torn_down {
            return LightOutcome::Ignored;
        }
        let outcome = self.cake.light(index);
        match outcome {
            LightOutcome::Ignored => debug!(index, "candle already lit"),
            LightOutcome::Lit => debug!(index, lit = self.cake.lit_count(), "candle lit"),
            LightOutcome::AllLit => {
                self.timeline.schedule(now_ms, self.config.wish_delay_secs, PageEvent::RevealWish);
            }
        }
        outcome
    }

    /// Begin opening a gift. The message and confetti follow after the shake.
    pub fn open_gift(&mut self, id: u32, now_ms: f64) -> bool {
        if self.torn_down || !self.gifts.open(id) {
            debug!(gift = id, "gift open ignored");
            return false;
        }
        let event = PageEvent::FinishGiftOpen { gift: id };
        self.timeline.schedule(now_ms, self.config.gift_open_delay_secs, event);
        true
    }

    pub fn start_balloon_game(&mut self, now_ms: f64) {
        if self.torn_down {
            return;
        }
        self.balloons.start(&mut self.rng, self.config.balloon_count, now_ms);
        info!(
            round = self.balloons.round(),
            balloons = self.balloons.balloons().len(),
            "balloon game started"
        );
    }

    pub fn pop_balloon(&mut self, id: u32, now_ms: f64) -> PopOutcome {
        if self.torn_down {
            return PopOutcome::Ignored;
        }
        let outcome = self.balloons.pop(id);
        if !outcome.changed() {
            debug!(balloon = id, "pop ignored");
            return outcome;
        }
        let score = self.balloons.score();
        self.notices.push(Notice::BalloonPopped { balloon: id, score });
        self.trigger_confetti(now_ms);
        if outcome == PopOutcome::Completed {
            self.notices.push(Notice::GameComplete { score });
        }
        outcome
    }

    /// Append a follow-up burst. An open visibility window is left as is; if
    /// confetti is hidden, it is shown again under a fresh window.
    pub fn trigger_confetti(&mut self, now_ms: f64) {
        if self.torn_down {
            return;
        }
        if !self.confetti.is_visible() {
            self.show_confetti(now_ms);
        }
        self.confetti.emit(
            &mut self.rng,
            self.config.follow_up_burst,
            self.config.follow_up_delay_spread_secs,
            now_ms,
        );
    }

    fn show_confetti(&mut self, now_ms: f64) {
        let generation = self.confetti.show();
        let event = PageEvent::HideConfetti { generation };
        self.timeline.schedule(now_ms, self.config.confetti_window_secs, event);
    }

    /// Advance to `now_ms`: run due transitions, drop finished particles and
    /// hand back everything that happened since the last tick.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Notice> {
        if self.torn_down {
            return Vec::new();
        }
        for event in self.timeline.drain_due(now_ms) {
            self.apply(event, now_ms);
        }
        self.confetti.collect_expired(now_ms);
        std::mem::take(&mut self.notices)
    }

    fn apply(&mut self, event: PageEvent, now_ms: f64) {
        match event {
            PageEvent::RevealWish => {
                if self.cake.reveal_wish() {
                    self.notices.push(Notice::WishRevealed);
                    self.trigger_confetti(now_ms);
                }
            }
            PageEvent::FinishGiftOpen { gift } => {
                if self.gifts.finish_open(gift) {
                    self.notices.push(Notice::GiftOpened { gift });
                    self.trigger_confetti(now_ms);
                }
            }
            PageEvent::HideConfetti { generation } => {
                if self.confetti.hide(generation) {
                    self.notices.push(Notice::ConfettiHidden);
                }
            }
        }
    }

    /// Drop all pending transitions; the page ignores input from here on.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let dropped = self.timeline.len();
        self.timeline.clear();
        self.notices.clear();
        self.torn_down = true;
        info!(dropped, "page torn down");
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            muted: self.muted,
            confetti_visible: self.confetti.is_visible(),
            confetti_count: self.confetti.len(),
            candles_lit: self.cake.lit_count(),
            wish_revealed: self.cake.wish_revealed(),
            gifts_opened: self.gifts.opened_ids(),
            game_started: self.balloons.is_started(),
            balloons: self.balloons.balloons().len(),
            balloons_popped: self.balloons.popped_count(),
            score: self.balloons.score(),
            game_complete: self.balloons.is_complete(),
        }
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn pending_timers(&self) -> usize {
        self.timeline.len()
    }

    pub fn confetti(&self) -> &ConfettiEmitter {
        &self.confetti
    }

    pub fn cake(&self) -> &CandleSequencer {
        &self.cake
    }

    pub fn gifts(&self) -> &GiftRevealer {
        &self.gifts
    }

    pub fn balloons(&self) -> &BalloonGame {
        &self.balloons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> BirthdayPage {
        BirthdayPage::new(PageConfig::default(), fastrand::Rng::with_seed(3), 0.0)
    }

    #[test]
    fn wish_waits_for_delay() {
        let mut p = page();
        for i in 0..5 {
            p.light_candle(i, 1_000.0);
        }
        assert!(p.tick(1_400.0).is_empty());
        assert!(!p.cake().wish_revealed());
        assert_eq!(p.tick(1_500.0), vec![Notice::WishRevealed]);
    }

    #[test]
    fn follow_up_burst_keeps_open_window() {
        let mut p = page();
        p.trigger_confetti(5_000.0);
        assert_eq!(p.confetti().len(), 80);
        // The only window is the one opened at mount.
        assert_eq!(p.pending_timers(), 1);
        assert_eq!(p.tick(6_000.0), vec![Notice::ConfettiHidden]);
        assert!(!p.confetti().is_visible());
        assert!(p.confetti().is_empty());
    }

    #[test]
    fn trigger_after_window_reopens_confetti() {
        let mut p = page();
        p.tick(6_000.0);
        p.trigger_confetti(7_000.0);
        assert!(p.confetti().is_visible());
        assert_eq!(p.confetti().len(), 30);
        assert!(p.tick(12_999.0).is_empty());
        assert_eq!(p.tick(13_000.0), vec![Notice::ConfettiHidden]);
    }

    #[test]
    fn mute_starts_on_and_toggles() {
        let mut p = page();
        assert!(p.is_muted());
        assert!(!p.toggle_mute());
        assert!(p.toggle_mute());
    }

    #[test]
    fn snapshot_tracks_widgets() {
        let mut p = page();
        p.light_candle(0, 0.0);
        p.start_balloon_game(0.0);
        p.pop_balloon(3, 10.0);
        let snap = p.snapshot();
        assert_eq!(snap.candles_lit, 1);
        assert_eq!(snap.balloons, 12);
        assert_eq!(snap.balloons_popped, 1);
        assert_eq!(snap.score, 1);
        assert!(snap.game_started);
        assert!(!snap.game_complete);
        assert!(snap.gifts_opened.is_empty());
    }
}
