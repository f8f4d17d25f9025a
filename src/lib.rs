//! Birthday page core crate.
//!
//! The page model (`page`, `widgets`) is plain Rust with no browser dependency
//! and is exercised natively by `cargo test`. The `view` module is the browser
//! shell: canvas, input listeners and the animation loop. Functions exported
//! with `#[wasm_bindgen]` below are the JS-facing surface.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
mod logging;
pub mod page;
pub mod view;
pub mod widgets;

pub use config::PageConfig;
pub use error::PageError;
pub use page::{BirthdayPage, Notice, PageSnapshot};

use widgets::gifts::{GiftIcon, GiftSpec};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Static page datasets
// Palette order matches the color enums in `widgets::confetti` / `widgets::balloons`.
// -----------------------------------------------------------------------------

pub const CONFETTI_COLORS: [&str; 7] = [
    "#FF6B9D", "#C77DFF", "#FFE66D", "#7DFFBB", "#FF7F7F", "#87CEEB", "#FFDAB9",
];

pub const BALLOON_COLORS: [&str; 6] = [
    "#FF6B9D", "#C77DFF", "#FFE66D", "#7DFFBB", "#FF7F7F", "#87CEEB",
];

pub const GIFT_MESSAGES: &[GiftSpec] = &[
    GiftSpec {
        id: 1,
        color: "#FF6B9D",
        ribbon_color: "#C77DFF",
        message: "Tum bahut special ho! Duniya ki sabse pyari insaan!",
        icon: GiftIcon::Heart,
    },
    GiftSpec {
        id: 2,
        color: "#C77DFF",
        ribbon_color: "#FFE66D",
        message: "Har din tumhari smile se roshni aati hai!",
        icon: GiftIcon::Star,
    },
    GiftSpec {
        id: 3,
        color: "#FFE66D",
        ribbon_color: "#FF6B9D",
        message: "Tumhari khushiyan hamesha bani rahe!",
        icon: GiftIcon::Sparkle,
    },
];

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    view::start(PageConfig::default())?;
    Ok(())
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let config = PageConfig::from_json(json)?;
    view::start(config)?;
    Ok(())
}

/// Tear the page down. Pending timers are dropped and the frame loop stops.
#[wasm_bindgen]
pub fn stop_page() -> bool {
    view::stop()
}

#[wasm_bindgen]
pub fn toggle_mute() -> Result<bool, JsValue> {
    Ok(view::with_page(|page, _| page.toggle_mute())?)
}

/// Returns true if the candle was unlit and is now lit.
#[wasm_bindgen]
pub fn light_candle(index: usize) -> Result<bool, JsValue> {
    Ok(view::with_page(|page, now| page.light_candle(index, now).changed())?)
}

#[wasm_bindgen]
pub fn open_gift(id: u32) -> Result<bool, JsValue> {
    Ok(view::with_page(|page, now| page.open_gift(id, now))?)
}

#[wasm_bindgen]
pub fn start_balloon_game() -> Result<(), JsValue> {
    Ok(view::with_page(|page, now| page.start_balloon_game(now))?)
}

#[wasm_bindgen]
pub fn pop_balloon(id: u32) -> Result<bool, JsValue> {
    Ok(view::with_page(|page, now| page.pop_balloon(id, now).changed())?)
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn page_state_json() -> Result<String, JsValue> {
    let snapshot = view::with_page(|page, _| page.snapshot())?;
    Ok(serde_json::to_string(&snapshot).map_err(PageError::Encode)?)
}
