//! Browser host for the runner.
//!
//! Owns the page canvas and the [`GameState`], keeps both sized to the
//! window and drives `tick` + draw from `requestAnimationFrame`. Everything
//! here only reads the core's outputs; no gameplay decisions are made in this
//! module.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::BACKGROUND_COLORS;
use crate::character::{Limb, Ornament, Pose};
use crate::config::GameConfig;
use crate::game::GameState;
use crate::skyline::{BuildingSegment, RoofOutline, WindowGrid};

const CANVAS_ID: &str = "rooftop-canvas";
// Fill for every building style other than the per-segment colour one.
const NEUTRAL_FILL: &str = "#333";

struct Host {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    game: GameState,
}

thread_local! {
    static HOST: std::cell::RefCell<Option<Host>> = std::cell::RefCell::new(None);
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Run `f` against the live session, if [`start`] has been called.
pub(crate) fn with_game<R>(f: impl FnOnce(&mut GameState) -> R) -> Option<R> {
    HOST.with(|cell| cell.borrow_mut().as_mut().map(|host| f(&mut host.game)))
}

pub(crate) fn start(config: GameConfig) -> Result<(), JsValue> {
    if HOST.with(|cell| cell.borrow().is_some()) {
        tracing::warn!("runner already started");
        return Ok(());
    }

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "position:fixed; left:0; top:0; display:block;")?;
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into()?;

    let game =
        GameState::new(config, session_seed()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let mut host = Host { canvas, ctx, game };
    fit_to_window(&mut host);
    HOST.with(|cell| *cell.borrow_mut() = Some(host));

    listen_for_resize(&win)?;
    start_frame_loop();
    tracing::info!("runner started");
    Ok(())
}

fn session_seed() -> u64 {
    #[cfg(feature = "rng")]
    {
        let mut bytes = [0u8; 8];
        match getrandom::getrandom(&mut bytes) {
            Ok(()) => return u64::from_le_bytes(bytes),
            Err(err) => tracing::warn!(%err, "no entropy source, seeding from the clock"),
        }
    }
    crate::performance_now().to_bits()
}

fn fit_to_window(host: &mut Host) {
    let Some(win) = window() else {
        return;
    };
    let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    host.canvas.set_width(width.max(0.0) as u32);
    host.canvas.set_height(height.max(0.0) as u32);
    host.game.resize(width, height);
}

fn listen_for_resize(win: &web_sys::Window) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
        HOST.with(|cell| {
            if let Some(host) = cell.borrow_mut().as_mut() {
                fit_to_window(host);
            }
        });
    }) as Box<dyn FnMut(web_sys::Event)>);
    win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn start_frame_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        HOST.with(|cell| {
            if let Some(host) = cell.borrow_mut().as_mut() {
                host.game.tick();
                if let Err(err) = render(host) {
                    tracing::error!(?err, "frame render failed");
                }
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(callback: &FrameCallback) {
    if let (Some(w), Some(cb)) = (window(), callback.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// --- Drawing ----------------------------------------------------------------

fn render(host: &Host) -> Result<(), JsValue> {
    let ctx = &host.ctx;
    let game = &host.game;
    let track = game.track();
    if !track.is_ready() {
        return Ok(());
    }

    let background = game.appearance().background % BACKGROUND_COLORS.len();
    ctx.set_fill_style_str(BACKGROUND_COLORS[background]);
    ctx.fill_rect(0.0, 0.0, track.width(), track.height());

    let grid = game.window_grid();
    for segment in game.skyline().segments() {
        draw_building(ctx, game, segment, &grid)?;
    }
    draw_runner(ctx, game)
}

fn draw_building(
    ctx: &CanvasRenderingContext2d,
    game: &GameState,
    segment: &BuildingSegment,
    grid: &WindowGrid,
) -> Result<(), JsValue> {
    let style = game.appearance().building_style;
    let fill = if style == 0 { segment.color } else { NEUTRAL_FILL };
    let base_depth = game.skyline().base_depth();

    let [roof_start, roof_end, base_end, base_start] = segment.facade(game.track(), base_depth);
    ctx.begin_path();
    ctx.move_to(roof_start.x, roof_start.y);
    ctx.line_to(roof_end.x, roof_end.y);
    ctx.line_to(base_end.x, base_end.y);
    ctx.line_to(base_start.x, base_start.y);
    ctx.close_path();
    ctx.set_fill_style_str(fill);
    ctx.fill();
    ctx.set_stroke_style_str("rgba(0,0,0,0.2)");
    ctx.set_line_width(1.0);
    ctx.stroke();

    // Roof and windows are laid out along the segment, y pointing outward.
    ctx.save();
    ctx.translate(roof_start.x, roof_start.y)?;
    ctx.rotate(roof_start.angle)?;

    let width = segment.width();
    ctx.set_filter("brightness(0.8)");
    match segment.roof.outline(width, game.roof_detail()) {
        RoofOutline::None => {}
        RoofOutline::Block(r) => ctx.fill_rect(r.x, r.y, r.w, r.h),
        RoofOutline::Triangle([a, b, c]) => {
            ctx.begin_path();
            ctx.move_to(a.0, a.1);
            ctx.line_to(b.0, b.1);
            ctx.line_to(c.0, c.1);
            ctx.close_path();
            ctx.fill();
        }
        RoofOutline::HalfDisc { cx, radius } => {
            ctx.begin_path();
            ctx.arc(cx, 0.0, radius, PI, TAU)?;
            ctx.fill();
        }
    }
    ctx.set_filter("none");

    if !matches!(style, 2 | 3) {
        let facade = segment.height + base_depth;
        for decoration in &segment.windows {
            let r = decoration.rect(grid, width, facade);
            ctx.set_fill_style_str(decoration.color());
            ctx.fill_rect(r.x, r.y, r.w, r.h);
        }
    }
    ctx.restore();
    Ok(())
}

fn draw_runner(ctx: &CanvasRenderingContext2d, game: &GameState) -> Result<(), JsValue> {
    let at = game.player_position();
    let scale = game.scale().character;
    let glow = game.appearance().dark_background();
    let ink = if glow { "#ffffff" } else { "#000000" };

    ctx.save();
    ctx.translate(at.x, at.y)?;
    ctx.rotate(at.angle)?;
    ctx.scale(scale, scale)?;
    if glow {
        ctx.set_shadow_blur(10.0);
        ctx.set_shadow_color("#ffffff");
    }
    ctx.set_stroke_style_str(ink);
    ctx.set_fill_style_str(ink);
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    let drawn = draw_pose(ctx, &game.pose());
    ctx.restore();
    drawn
}

fn draw_pose(ctx: &CanvasRenderingContext2d, pose: &Pose) -> Result<(), JsValue> {
    // Far side first so the torso covers it.
    ctx.set_line_width(pose.limb_width);
    limb(ctx, &pose.right_leg);
    limb(ctx, &pose.right_arm);

    ctx.set_line_width(pose.torso_width);
    line(ctx, pose.hip.x, pose.hip.y, pose.shoulder.x, pose.shoulder.y);
    ctx.set_line_width(pose.limb_width);

    let head = &pose.head;
    ctx.begin_path();
    ctx.arc(head.center.x, head.center.y, head.radius, 0.0, TAU)?;
    if head.filled {
        ctx.fill();
    } else {
        ctx.stroke();
    }
    if let Some(ornament) = &pose.ornament {
        draw_ornament(ctx, ornament)?;
    }

    limb(ctx, &pose.left_leg);
    if let Some(arm) = &pose.left_arm {
        limb(ctx, arm);
    }
    Ok(())
}

fn draw_ornament(ctx: &CanvasRenderingContext2d, ornament: &Ornament) -> Result<(), JsValue> {
    match *ornament {
        Ornament::Scarf {
            start,
            control,
            end,
        } => {
            ctx.begin_path();
            ctx.move_to(start.x, start.y);
            ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
            ctx.stroke();
        }
        Ornament::Visor { center, half } => {
            ctx.fill_rect(center.x - half, center.y - half, half * 2.0, half * 2.0);
        }
        Ornament::Spike { base, tip } => line(ctx, base.x, base.y, tip.x, tip.y),
        Ornament::Lens {
            center,
            rx,
            ry,
            rotation,
        } => {
            ctx.begin_path();
            ctx.ellipse(center.x, center.y, rx, ry, rotation, 0.0, TAU)?;
            ctx.stroke();
        }
    }
    Ok(())
}

fn limb(ctx: &CanvasRenderingContext2d, limb: &Limb) {
    ctx.begin_path();
    ctx.move_to(limb.root.x, limb.root.y);
    ctx.line_to(limb.joint.x, limb.joint.y);
    ctx.line_to(limb.end.x, limb.end.y);
    ctx.stroke();
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}
