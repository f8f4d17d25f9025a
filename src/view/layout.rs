//! Page geometry: section placement, widget rectangles, scroll reveals and
//! click hit testing. Pure arithmetic so it can be tested off-browser.
//!
//! Page coordinates have their origin at the top of the hero section; the
//! viewport is a window of `height` pixels starting at `scroll_y`.

use crate::page::BirthdayPage;
use crate::widgets::balloons::Balloon;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Hero,
    Cake,
    Gifts,
    Balloons,
    Finale,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Hero,
        Section::Cake,
        Section::Gifts,
        Section::Balloons,
        Section::Finale,
    ];
}

/// What a click landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Mute,
    Candle(usize),
    Gift(u32),
    StartGame,
    Balloon(u32),
}

// Base widget sizes at scale 1.0 (640px short side).
const CANDLE_W: f64 = 28.0;
const CANDLE_H: f64 = 80.0;
const CANDLE_PITCH: f64 = 40.0;
const GIFT_W: f64 = 192.0;
const GIFT_GAP: f64 = 32.0;
const BUTTON_W: f64 = 200.0;
const BUTTON_H: f64 = 48.0;
const MUTE_SIZE: f64 = 44.0;
const MUTE_MARGIN: f64 = 16.0;
/// Balloon string length below the body.
pub const BALLOON_STRING: f64 = 48.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
}

impl PageLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: width.max(1.0), height: height.max(1.0) }
    }

    pub fn scale(&self) -> f64 {
        (self.width.min(self.height) / 640.0).clamp(0.6, 1.6)
    }

    pub fn page_height(&self) -> f64 {
        self.height * Section::ALL.len() as f64
    }

    pub fn section_rect(&self, section: Section) -> Rect {
        let idx = section as usize as f64;
        Rect::new(0.0, idx * self.height, self.width, self.height)
    }

    pub fn candle_rect(&self, index: usize, count: usize) -> Rect {
        let s = self.scale();
        let sec = self.section_rect(Section::Cake);
        let (w, h, pitch) = (CANDLE_W * s, CANDLE_H * s, CANDLE_PITCH * s);
        let row_w = count.saturating_sub(1) as f64 * pitch + w;
        let x0 = sec.center_x() - row_w / 2.0;
        Rect::new(x0 + index as f64 * pitch, sec.y + sec.h * 0.24, w, h)
    }

    pub fn gift_rect(&self, slot: usize, slots: usize) -> Rect {
        let s = self.scale();
        let sec = self.section_rect(Section::Gifts);
        let gap = GIFT_GAP * s;
        let n = slots.max(1) as f64;
        let w = (GIFT_W * s).min((self.width - gap * (n + 1.0)) / n).max(40.0);
        let h = w * 7.0 / 6.0;
        let row_w = n * w + (n - 1.0) * gap;
        let x0 = sec.center_x() - row_w / 2.0;
        Rect::new(x0 + slot as f64 * (w + gap), sec.y + sec.h * 0.55 - h / 2.0, w, h)
    }

    pub fn balloon_arena(&self) -> Rect {
        let sec = self.section_rect(Section::Balloons);
        let w = (self.width - 32.0).min(672.0).max(1.0);
        let h = (sec.h * 0.6).max(400.0).min(sec.h * 0.8);
        Rect::new(sec.center_x() - w / 2.0, sec.y + sec.h * 0.18, w, h)
    }

    /// Start / restart button, centred in the arena.
    pub fn game_button(&self) -> Rect {
        let s = self.scale();
        let arena = self.balloon_arena();
        let (w, h) = (BUTTON_W * s, BUTTON_H * s);
        Rect::new(arena.center_x() - w / 2.0, arena.center_y() + 24.0 * s, w, h)
    }

    /// Mute toggle, fixed to the bottom-right of the viewport.
    pub fn mute_button(&self) -> Rect {
        Rect::new(
            self.width - MUTE_MARGIN - MUTE_SIZE,
            self.height - MUTE_MARGIN - MUTE_SIZE,
            MUTE_SIZE,
            MUTE_SIZE,
        )
    }

    /// Balloon body plus string at `elapsed_secs` into the round. Balloons rise
    /// from just below the arena to fully above it.
    pub fn balloon_rect(&self, balloon: &Balloon, elapsed_secs: f64) -> Rect {
        let arena = self.balloon_arena();
        let total_h = balloon.size * 1.2 + BALLOON_STRING;
        let t = balloon.rise_progress(elapsed_secs);
        let start = arena.h;
        let end = -1.2 * total_h;
        let x = arena.x + balloon.x_pct / 100.0 * arena.w;
        Rect::new(x, arena.y + start + (end - start) * t, balloon.size, total_h)
    }

    /// Resolve a click. `page_pt` is in page coordinates, `view_pt` in viewport
    /// coordinates (used for fixed overlays).
    pub fn hit_test(
        &self,
        page: &BirthdayPage,
        page_pt: (f64, f64),
        view_pt: (f64, f64),
        now_ms: f64,
    ) -> Option<Hit> {
        let (px, py) = page_pt;
        if self.mute_button().contains(view_pt.0, view_pt.1) {
            return Some(Hit::Mute);
        }
        let count = page.cake().candles().len();
        if let Some(i) = (0..count).find(|&i| self.candle_rect(i, count).contains(px, py)) {
            return Some(Hit::Candle(i));
        }
        let gifts = page.gifts().gifts();
        if let Some((_, gift)) = gifts
            .iter()
            .enumerate()
            .find(|(slot, _)| self.gift_rect(*slot, gifts.len()).contains(px, py))
        {
            return Some(Hit::Gift(gift.id()));
        }
        let arena = self.balloon_arena();
        if !arena.contains(px, py) {
            return None;
        }
        let game = page.balloons();
        let button_shown = !game.is_started() || game.is_round_over(now_ms);
        if button_shown && self.game_button().contains(px, py) {
            return Some(Hit::StartGame);
        }
        let elapsed = game.elapsed_secs(now_ms);
        // Later balloons draw on top, so test them first.
        game.balloons()
            .iter()
            .rev()
            .filter(|b| !b.popped && !b.escaped(elapsed))
            .find(|b| self.balloon_rect(b, elapsed).contains(px, py))
            .map(|b| Hit::Balloon(b.id))
    }
}

/// Tracks which sections have scrolled into view. A section is revealed the
/// first time any part of it is visible and stays revealed.
#[derive(Clone, Debug)]
pub struct SectionTracker {
    revealed_ms: [Option<f64>; 5],
}

/// Fade-in length after a reveal.
pub const REVEAL_SECS: f64 = 0.6;

impl SectionTracker {
    pub fn new(now_ms: f64) -> Self {
        let mut revealed_ms = [None; 5];
        revealed_ms[Section::Hero as usize] = Some(now_ms);
        Self { revealed_ms }
    }

    /// Reveal every section intersecting the viewport; returns the newly
    /// revealed ones.
    pub fn observe(&mut self, layout: &PageLayout, scroll_y: f64, now_ms: f64) -> Vec<Section> {
        let viewport = Rect::new(0.0, scroll_y, layout.width, layout.height);
        let mut fresh = Vec::new();
        for section in Section::ALL {
            let slot = &mut self.revealed_ms[section as usize];
            if slot.is_none() && layout.section_rect(section).intersects(&viewport) {
                *slot = Some(now_ms);
                fresh.push(section);
            }
        }
        fresh
    }

    pub fn is_revealed(&self, section: Section) -> bool {
        self.revealed_ms[section as usize].is_some()
    }

    /// 0.0 before reveal, rising to 1.0 over `REVEAL_SECS`.
    pub fn reveal_alpha(&self, section: Section, now_ms: f64) -> f64 {
        match self.revealed_ms[section as usize] {
            Some(at) => ((now_ms - at) / 1000.0 / REVEAL_SECS).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// Rebuild the layout for a new viewport size and reveal whatever now sits
/// under `scroll_y`. Sections are one viewport tall, so a resize can move an
/// unrevealed section into view without any scrolling.
pub fn relayout(
    sections: &mut SectionTracker,
    width: f64,
    height: f64,
    scroll_y: f64,
    now_ms: f64,
) -> (PageLayout, Vec<Section>) {
    let layout = PageLayout::new(width, height);
    let fresh = sections.observe(&layout, scroll_y, now_ms);
    (layout, fresh)
}

/// Greedy word wrap by character count.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if !current.is_empty() && current.chars().count() + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageConfig;

    fn layout() -> PageLayout {
        PageLayout::new(1280.0, 800.0)
    }

    fn page() -> BirthdayPage {
        BirthdayPage::new(PageConfig::default(), fastrand::Rng::with_seed(11), 0.0)
    }

    fn center(r: Rect) -> (f64, f64) {
        (r.center_x(), r.center_y())
    }

    #[test]
    fn sections_stack_vertically() {
        let l = layout();
        assert_eq!(l.section_rect(Section::Cake).y, 800.0);
        assert_eq!(l.section_rect(Section::Finale).y, 3_200.0);
        assert_eq!(l.page_height(), 4_000.0);
    }

    #[test]
    fn candles_do_not_overlap() {
        let l = layout();
        for i in 0..4 {
            let a = l.candle_rect(i, 5);
            let b = l.candle_rect(i + 1, 5);
            assert!(a.x + a.w <= b.x);
        }
    }

    #[test]
    fn clicks_resolve_to_widgets() {
        let l = layout();
        let p = page();
        let c = center(l.candle_rect(3, 5));
        assert_eq!(l.hit_test(&p, c, (0.0, 0.0), 0.0), Some(Hit::Candle(3)));
        let g = center(l.gift_rect(1, 3));
        assert_eq!(l.hit_test(&p, g, (0.0, 0.0), 0.0), Some(Hit::Gift(2)));
        let b = center(l.game_button());
        assert_eq!(l.hit_test(&p, b, (0.0, 0.0), 0.0), Some(Hit::StartGame));
        let m = center(l.mute_button());
        assert_eq!(l.hit_test(&p, (0.0, 0.0), m, 0.0), Some(Hit::Mute));
        assert_eq!(l.hit_test(&p, (5.0, 5.0), (5.0, 5.0), 0.0), None);
    }

    #[test]
    fn rising_balloon_is_hittable_until_it_escapes() {
        let l = layout();
        let mut p = page();
        p.start_balloon_game(0.0);
        let balloon = p.balloons().balloons()[0];
        let mid_secs = balloon.delay_secs + balloon.rise_secs * 0.5;
        let r = l.balloon_rect(&balloon, mid_secs);
        let pt = (r.x + r.w / 2.0, r.y + r.h * 0.3);
        let now = mid_secs * 1000.0;
        match l.hit_test(&p, pt, (0.0, 0.0), now) {
            Some(Hit::Balloon(_)) => {}
            other => panic!("expected a balloon hit, got {other:?}"),
        }
        let gone = (balloon.delay_secs + balloon.rise_secs) * 1000.0 + 1.0;
        let r_gone = l.balloon_rect(&balloon, gone / 1000.0);
        assert!(r_gone.bottom() <= l.balloon_arena().y);
    }

    #[test]
    fn start_button_hidden_mid_round() {
        let l = layout();
        let mut p = page();
        p.start_balloon_game(0.0);
        let b = center(l.game_button());
        assert_ne!(l.hit_test(&p, b, (0.0, 0.0), 100.0), Some(Hit::StartGame));
        assert_eq!(l.hit_test(&p, b, (0.0, 0.0), 20_000.0), Some(Hit::StartGame));
    }

    #[test]
    fn reveals_are_monotonic() {
        let l = layout();
        let mut t = SectionTracker::new(0.0);
        assert!(t.is_revealed(Section::Hero));
        assert!(!t.is_revealed(Section::Cake));
        assert_eq!(t.observe(&l, 900.0, 100.0), vec![Section::Cake, Section::Gifts]);
        assert!(t.observe(&l, 0.0, 200.0).is_empty());
        assert!(t.is_revealed(Section::Gifts));
        assert_eq!(t.reveal_alpha(Section::Cake, 100.0), 0.0);
        assert_eq!(t.reveal_alpha(Section::Cake, 1_000.0), 1.0);
        assert_eq!(t.reveal_alpha(Section::Finale, 1_000.0), 0.0);
    }

    #[test]
    fn resize_reveals_section_now_in_view() {
        let mut t = SectionTracker::new(0.0);
        t.observe(&layout(), 800.0, 0.0);
        assert!(t.is_revealed(Section::Cake));
        assert!(!t.is_revealed(Section::Gifts));

        // Half-height viewport: scroll 800 now lands on the gifts.
        let (small, fresh) = relayout(&mut t, 1280.0, 400.0, 800.0, 100.0);
        assert_eq!(fresh, vec![Section::Gifts]);
        assert!(t.reveal_alpha(Section::Gifts, 1_000.0) > 0.0);

        let p = page();
        let g = center(small.gift_rect(1, 3));
        assert_eq!(small.hit_test(&p, g, (0.0, 0.0), 1_000.0), Some(Hit::Gift(2)));
    }

    #[test]
    fn wrap_keeps_words_whole() {
        let lines = wrap_words("Har din tumhari smile se roshni aati hai!", 16);
        assert!(lines.iter().all(|l| l.chars().count() <= 16));
        assert_eq!(lines.join(" "), "Har din tumhari smile se roshni aati hai!");
    }
}
