// Dataset invariants for the static page content.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use birthday_page::widgets::balloons::BalloonColor;
use birthday_page::widgets::confetti::ConfettiColor;
use birthday_page::{BALLOON_COLORS, CONFETTI_COLORS, GIFT_MESSAGES};

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[test]
fn palettes_are_unique_hex_colors() {
    for palette in [&CONFETTI_COLORS[..], &BALLOON_COLORS[..]] {
        let mut seen = HashSet::new();
        for c in palette {
            assert!(is_hex_color(c), "'{}' is not a #RRGGBB color", c);
            assert!(seen.insert(*c), "duplicate color '{}'", c);
        }
    }
}

#[test]
fn color_enums_cover_their_palettes() {
    assert_eq!(ConfettiColor::ALL.len(), CONFETTI_COLORS.len());
    assert_eq!(BalloonColor::ALL.len(), BALLOON_COLORS.len());
    let hexes: HashSet<&str> = ConfettiColor::ALL.iter().map(|c| c.hex()).collect();
    assert_eq!(hexes.len(), 7);
    assert_eq!(BalloonColor::Sky.hex(), "#87CEEB");
}

#[test]
fn gift_messages_are_well_formed() {
    assert_eq!(GIFT_MESSAGES.len(), 3);
    let mut ids = HashSet::new();
    for gift in GIFT_MESSAGES {
        assert!(ids.insert(gift.id), "duplicate gift id {}", gift.id);
        assert!(!gift.message.trim().is_empty(), "empty message for gift {}", gift.id);
        assert!(is_hex_color(gift.color));
        assert!(is_hex_color(gift.ribbon_color));
        assert_ne!(gift.color, gift.ribbon_color, "ribbon must contrast with box {}", gift.id);
    }
}
