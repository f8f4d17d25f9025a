// Browser tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn exported_calls_fail_before_start() {
    birthday_page::stop_page();
    assert!(birthday_page::toggle_mute().is_err());
    assert!(birthday_page::light_candle(0).is_err());
}

#[wasm_bindgen_test]
fn start_interact_stop() {
    birthday_page::start_page().unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("bp-canvas").is_some());

    assert_eq!(birthday_page::toggle_mute().unwrap(), false);
    assert!(birthday_page::light_candle(0).unwrap());
    assert!(!birthday_page::light_candle(0).unwrap());
    assert!(birthday_page::open_gift(1).unwrap());
    assert!(!birthday_page::open_gift(1).unwrap());
    birthday_page::start_balloon_game().unwrap();
    assert!(birthday_page::pop_balloon(0).unwrap());
    assert!(!birthday_page::pop_balloon(0).unwrap());

    assert!(birthday_page::stop_page());
    assert!(doc.get_element_by_id("bp-canvas").is_none());
    assert!(!birthday_page::stop_page());
}

#[wasm_bindgen_test]
fn host_canvas_survives_stop() {
    let doc = web_sys::window().unwrap().document().unwrap();
    let host = doc.create_element("canvas").unwrap();
    host.set_id("bp-canvas");
    doc.body().unwrap().append_child(&host).unwrap();

    birthday_page::start_page().unwrap();
    birthday_page::start_page().unwrap();
    assert!(birthday_page::stop_page());
    assert!(doc.get_element_by_id("bp-canvas").is_some());
    assert!(doc.get_element_by_id("bp-spacer").is_none());
    host.remove();
}
