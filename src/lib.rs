//! Rooftop Runner core crate.
//!
//! A stick-figure runner circles the inside edge of the viewport over a
//! procedurally generated skyline. The pure parts (perimeter projection,
//! skyline generation, jump physics, procedural gait) live in their own
//! modules and run natively under `cargo test`; `canvas` is the browser host
//! that drives them from `requestAnimationFrame`.

use wasm_bindgen::prelude::*;

pub mod character;
pub mod config;
pub mod game;
pub mod logging;
pub mod physics;
pub mod skyline;
pub mod track;

mod canvas;

pub use character::{ARCHETYPES, Archetype, Pose};
pub use config::{ConfigError, GameConfig};
pub use game::{Appearance, GameState, TickReport};
pub use physics::PlayerState;
pub use skyline::{BuildingSegment, Skyline};
pub use track::{Edge, ScreenPoint, Track};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    logging::init(level);
}

// -----------------------------------------------------------------------------
// Palettes
// -----------------------------------------------------------------------------

/// Facade colours a segment draws from.
pub const CITY_COLORS: &[&str] = &[
    "#2C3E50", "#E74C3C", "#ECF0F1", "#3498DB", "#F1C40F", "#8E44AD", "#D35400", "#16A085",
];

/// Lit-window colours. Vertical strips use index 2, horizontal bands index 3.
pub const WINDOW_COLORS: &[&str] = &["#F1C40F", "#F39C12", "#FFFFFF", "#D5DBDB"];

/// Backdrop per background index. 1 and 3 are the dark ones the runner glows on.
pub const BACKGROUND_COLORS: &[&str] = &["#BDC3C7", "#1B2631", "#F5CBA7", "#212F3D", "#AED6F1"];

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    canvas::start(GameConfig::default())
}

/// Start with a JSON tuning document; missing fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    canvas::start(config)
}

/// Replace the tuning of a running game and rebuild the world with it.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| {
        tracing::warn!(%e, "rejected configuration");
        JsValue::from_str(&e.to_string())
    })?;
    canvas::with_game(|game| game.reconfigure(config))
        .ok_or_else(|| JsValue::from_str("game not started"))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn select_character(index: usize) {
    canvas::with_game(|game| game.select_character(index));
}

#[wasm_bindgen]
pub fn select_background(index: usize) {
    canvas::with_game(|game| game.select_background(index));
}

#[wasm_bindgen]
pub fn select_building_style(index: usize) {
    canvas::with_game(|game| game.select_building_style(index));
}

#[wasm_bindgen]
pub fn set_speed(speed: f64) {
    canvas::with_game(|game| game.set_speed(speed));
}

#[wasm_bindgen]
pub fn set_random_mode(on: bool) {
    canvas::with_game(|game| game.set_random_mode(on));
}

/// Completed laps of the running game, 0 before start.
#[wasm_bindgen]
pub fn laps() -> u64 {
    canvas::with_game(|game| game.player().laps(game.skyline().perimeter())).unwrap_or(0)
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
