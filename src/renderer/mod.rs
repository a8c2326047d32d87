//! Canvas-2d painter
//!
//! Pure presentation: reads the world through a shared reference each frame
//! and never mutates it. If the drawing context cannot be acquired the shell
//! skips the frame and retries, so a transiently missing surface is not an
//! error here.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::state::palette;
use crate::sim::{Entity, EntityKind, Phase, WorldState};

pub struct Painter {
    ctx: CanvasRenderingContext2d,
    view_w: f64,
    view_h: f64,
}

impl Painter {
    /// Acquire a 2d context, scaled for the device pixel ratio
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let window = web_sys::window()?;
        let dpr = window.device_pixel_ratio().max(1.0);

        let view_w = (canvas.client_width() as f64).max(MIN_VIEW_W as f64);
        let view_h = (canvas.client_height() as f64).max(MIN_VIEW_H as f64);
        canvas.set_width((view_w * dpr) as u32);
        canvas.set_height((view_h * dpr) as u32);

        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.scale(dpr, dpr).ok()?;

        Some(Self { ctx, view_w, view_h })
    }

    /// View dimensions in CSS pixels, as handed to the simulation
    pub fn view_size(&self) -> (f32, f32) {
        (self.view_w as f32, self.view_h as f32)
    }

    /// Paint one frame from the current world state
    pub fn draw(&self, state: &WorldState) {
        let ctx = &self.ctx;

        // Sky
        ctx.set_fill_style_str("#0b1020");
        ctx.fill_rect(0.0, 0.0, self.view_w, self.view_h);

        self.draw_parallax(state.scroll_offset as f64);

        // Ground strip
        ctx.set_fill_style_str("#1c2433");
        ctx.fill_rect(
            0.0,
            self.view_h - GROUND_MARGIN as f64,
            self.view_w,
            GROUND_MARGIN as f64,
        );

        self.draw_trail(state);

        for e in &state.entities {
            self.draw_entity(e);
        }

        self.draw_player(state);
        self.draw_particles(state);

        // Dim the scene on the menu and game-over screens; the DOM HUD
        // carries the text
        if state.phase != Phase::Playing {
            ctx.set_fill_style_str("rgba(4, 6, 12, 0.55)");
            ctx.fill_rect(0.0, 0.0, self.view_w, self.view_h);
        }
    }

    /// Two layers of drifting stripes keyed off the scroll phase
    fn draw_parallax(&self, offset: f64) {
        let ctx = &self.ctx;
        let spacing = SCROLL_WRAP as f64 / 2.0;

        ctx.set_fill_style_str("#121a2c");
        let mut x = -(offset % spacing);
        while x < self.view_w {
            ctx.fill_rect(x, 0.0, 28.0, self.view_h);
            x += spacing;
        }

        ctx.set_fill_style_str("#161f34");
        let mut x = -((offset * 2.0) % spacing) + spacing / 2.0;
        while x < self.view_w {
            ctx.fill_rect(x, 0.0, 12.0, self.view_h);
            x += spacing;
        }
    }

    fn draw_trail(&self, state: &WorldState) {
        let ctx = &self.ctx;
        let len = state.player.trail.len();
        for (i, point) in state.player.trail.iter().enumerate() {
            let fade = 1.0 - i as f64 / len.max(1) as f64;
            ctx.set_global_alpha(fade * 0.35);
            ctx.set_fill_style_str("#7fd4ff");
            ctx.begin_path();
            let r = 3.0 + fade * 3.0;
            ctx.arc(point.pos.x as f64, point.pos.y as f64, r, 0.0, TAU).ok();
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_player(&self, state: &WorldState) {
        let ctx = &self.ctx;
        let x = state.player.pos.x as f64;
        let y = state.player.pos.y as f64;
        let w = PLAYER_W as f64;
        let h = PLAYER_H as f64;

        // Thrust flame under the craft
        if state.thrusting && state.phase == Phase::Playing {
            ctx.set_fill_style_str("#ffae42");
            ctx.begin_path();
            ctx.move_to(x + w * 0.25, y + h);
            ctx.line_to(x + w * 0.5, y + h + 16.0);
            ctx.line_to(x + w * 0.75, y + h);
            ctx.close_path();
            ctx.fill();
        }

        ctx.set_fill_style_str("#e8ecf4");
        ctx.fill_rect(x, y, w, h);
        ctx.set_fill_style_str("#3b82f6");
        ctx.fill_rect(x + w * 0.55, y + h * 0.2, w * 0.3, h * 0.3);

        // Shield bubble while the timer runs
        if state.shield_ticks > 0 {
            ctx.set_stroke_style_str("#5eead4");
            ctx.begin_path();
            let mid = state.player.midpoint();
            ctx.arc(mid.x as f64, mid.y as f64, w * 0.85, 0.0, TAU).ok();
            ctx.stroke();
        }
    }

    fn draw_entity(&self, e: &Entity) {
        let ctx = &self.ctx;
        let size = e.kind.size();
        let (x, y) = (e.pos.x as f64, e.pos.y as f64);
        let (w, h) = (size.x as f64, size.y as f64);

        match e.kind {
            EntityKind::Coin => {
                ctx.set_fill_style_str("#fbbf24");
                ctx.begin_path();
                ctx.arc(x + w / 2.0, y + h / 2.0, w / 2.0, 0.0, TAU).ok();
                ctx.fill();
            }
            EntityKind::Shield => {
                ctx.set_fill_style_str("#2dd4bf");
                ctx.fill_rect(x, y, w, h);
            }
            EntityKind::Magnet => {
                ctx.set_fill_style_str("#c084fc");
                ctx.fill_rect(x, y, w, h);
            }
            EntityKind::SlowMo => {
                ctx.set_fill_style_str("#60a5fa");
                ctx.fill_rect(x, y, w, h);
            }
            EntityKind::Rock => {
                ctx.set_fill_style_str("#6b7280");
                ctx.fill_rect(x, y, w, h);
            }
            EntityKind::Beam => {
                ctx.set_fill_style_str("#f87171");
                ctx.fill_rect(x, y, w, h);
            }
            EntityKind::Bird => {
                ctx.set_fill_style_str("#f472b6");
                ctx.begin_path();
                ctx.move_to(x, y + h / 2.0);
                ctx.line_to(x + w, y);
                ctx.line_to(x + w, y + h);
                ctx.close_path();
                ctx.fill();
            }
        }
    }

    fn draw_particles(&self, state: &WorldState) {
        let ctx = &self.ctx;
        for p in &state.particles {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(particle_color(p.color));
            ctx.begin_path();
            ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU).ok();
            ctx.fill();
        }
        ctx.set_global_alpha(1.0);
    }
}

fn particle_color(color: u32) -> &'static str {
    match color {
        palette::COIN => "#fbbf24",
        palette::SHIELD => "#2dd4bf",
        palette::MAGNET => "#c084fc",
        palette::SLOWMO => "#60a5fa",
        _ => "#f87171",
    }
}
