// Browser smoke tests: `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_mounts_a_canvas() {
    rooftop_runner::start_game().expect("start");
    let doc = web_sys::window()
        .and_then(|w| w.document())
        .expect("document");
    assert!(doc.get_element_by_id("rooftop-canvas").is_some());

    // Second start is ignored, controls act on the running session.
    rooftop_runner::start_game().expect("restart is a no-op");
    rooftop_runner::set_speed(12.0);
    rooftop_runner::select_character(4);
    rooftop_runner::set_random_mode(true);
    assert_eq!(rooftop_runner::laps(), 0);
}

#[wasm_bindgen_test]
fn console_logging_accepts_events() {
    rooftop_runner::logging::init(tracing::Level::DEBUG);
    tracing::info!("hello from the test runner");
    tracing::warn!(value = 3, "structured fields reach console.warn");
}
