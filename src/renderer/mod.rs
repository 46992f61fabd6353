//! Canvas2D rendering (wasm only)
//!
//! Pure presentation over `CanvasRenderingContext2d`: themed background
//! ornaments, the wind fan, cups, ball, bomb, aim lever, HUD and banners.
//! Never mutates game state.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::MapTheme;
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState};

/// Theme palette (cosmetic only)
struct Palette {
    background: &'static str,
    ornament: &'static str,
    cup: &'static str,
    accent: &'static str,
    text: &'static str,
}

fn palette(theme: MapTheme, high_contrast: bool) -> Palette {
    if high_contrast {
        return Palette {
            background: "#000000",
            ornament: "#333333",
            cup: "#ff2020",
            accent: "#00ccff",
            text: "#ffffff",
        };
    }
    match theme {
        MapTheme::Hearts => Palette {
            background: "#fff0fa",
            ornament: "#ffb3de",
            cup: "#d32f2f",
            accent: "#e6007a",
            text: "#e6007a",
        },
        MapTheme::Stars => Palette {
            background: "#101030",
            ornament: "#ffe066",
            cup: "#c62868",
            accent: "#66aaff",
            text: "#ffe066",
        },
        MapTheme::Bows => Palette {
            background: "#f2fff0",
            ornament: "#9ad6a0",
            cup: "#b05caa",
            accent: "#3a9e4c",
            text: "#3a9e4c",
        },
    }
}

/// Owns the canvas 2d context and knows how to paint one frame
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;
        Ok(Self { ctx })
    }

    /// Paint one frame
    pub fn render(&self, state: &GameState, settings: &Settings, fps: u32) {
        let pal = palette(state.config.theme, settings.high_contrast);
        let w = CANVAS_W as f64;
        let h = CANVAS_H as f64;

        self.ctx.set_fill_style_str(pal.background);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        self.draw_ornaments(state, settings, &pal);
        self.draw_fan(state, settings, &pal);
        self.draw_cups(state, &pal);
        if let Some(bomb) = &state.bomb {
            self.draw_bomb(bomb.pos.x as f64, bomb.pos.y as f64, bomb.radius as f64);
        }
        self.draw_ball(state, &pal);
        if state.accepting_aim() {
            self.draw_lever(state, &pal);
        }
        self.draw_hud(state, settings, &pal, fps);
        self.draw_banners(state, &pal);
    }

    /// Background ornaments in the theme's motif, drifting slowly
    fn draw_ornaments(&self, state: &GameState, settings: &Settings, pal: &Palette) {
        let t = if settings.reduced_motion {
            0.0
        } else {
            state.time_ticks as f64 * 0.02
        };
        self.ctx.save();
        self.ctx.set_global_alpha(0.35);
        self.ctx.set_fill_style_str(pal.ornament);
        for i in 0..12u32 {
            // Scatter deterministically; no RNG so the sim stays untouched
            let x = ((i * 97) % 560 + 20) as f64;
            let base_y = ((i * 211) % 420 + 30) as f64;
            let y = base_y + (t + i as f64).sin() * 6.0;
            match state.config.theme {
                MapTheme::Hearts => self.draw_heart(x, y, 10.0),
                MapTheme::Stars => self.draw_star(x, y, 8.0),
                MapTheme::Bows => self.draw_bow(x, y, 9.0),
            }
        }
        self.ctx.restore();
    }

    fn draw_heart(&self, x: f64, y: f64, size: f64) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x, y + size * 0.3);
        ctx.bezier_curve_to(x, y, x - size, y, x - size, y + size * 0.3);
        ctx.bezier_curve_to(x - size, y + size * 0.8, x, y + size * 1.1, x, y + size * 1.4);
        ctx.bezier_curve_to(x, y + size * 1.1, x + size, y + size * 0.8, x + size, y + size * 0.3);
        ctx.bezier_curve_to(x + size, y, x, y, x, y + size * 0.3);
        ctx.fill();
    }

    fn draw_star(&self, x: f64, y: f64, size: f64) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        ctx.begin_path();
        for i in 0..10 {
            let r = if i % 2 == 0 { size } else { size * 0.45 };
            let angle = -PI / 2.0 + i as f64 * PI / 5.0;
            let px = x + r * angle.cos();
            let py = y + r * angle.sin();
            if i == 0 {
                ctx.move_to(px, py);
            } else {
                ctx.line_to(px, py);
            }
        }
        ctx.close_path();
        ctx.fill();
    }

    fn draw_bow(&self, x: f64, y: f64, size: f64) {
        let ctx = &self.ctx;
        // Two loops and a knot
        ctx.begin_path();
        ctx.move_to(x, y);
        ctx.line_to(x - size, y - size * 0.7);
        ctx.line_to(x - size, y + size * 0.7);
        ctx.close_path();
        ctx.fill();
        ctx.begin_path();
        ctx.move_to(x, y);
        ctx.line_to(x + size, y - size * 0.7);
        ctx.line_to(x + size, y + size * 0.7);
        ctx.close_path();
        ctx.fill();
        ctx.begin_path();
        ctx.arc(x, y, size * 0.3, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
    }

    /// Fan on the left edge with a wind-direction arrow
    fn draw_fan(&self, state: &GameState, settings: &Settings, pal: &Palette) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        let fan_x = 60.0;
        let fan_y = CANVAS_H as f64 / 2.0;
        let fan_angle = if settings.reduced_motion {
            0.0
        } else {
            state.time_ticks as f64 * 0.1
        };

        ctx.save();
        ctx.translate(fan_x, fan_y).ok();
        // Body
        ctx.begin_path();
        ctx.arc(0.0, 0.0, 30.0, 0.0, PI * 2.0).ok();
        ctx.set_fill_style_str(pal.background);
        ctx.set_stroke_style_str(pal.accent);
        ctx.set_line_width(4.0);
        ctx.fill();
        ctx.stroke();
        // Blades
        ctx.set_fill_style_str(pal.accent);
        for i in 0..3 {
            ctx.save();
            ctx.rotate(fan_angle + i as f64 * (PI * 2.0 / 3.0)).ok();
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);
            ctx.arc(0.0, 0.0, 24.0, -0.3, 0.3).ok();
            ctx.line_to(0.0, 0.0);
            ctx.fill();
            ctx.restore();
        }
        // Wind direction arrow (points the way the wind pushes)
        if state.wind != 0.0 {
            ctx.save();
            ctx.rotate(if state.wind > 0.0 { PI / 2.0 } else { -PI / 2.0 }).ok();
            ctx.begin_path();
            ctx.move_to(0.0, 0.0);
            ctx.line_to(0.0, -40.0);
            ctx.line_to(-8.0, -32.0);
            ctx.move_to(0.0, -40.0);
            ctx.line_to(8.0, -32.0);
            ctx.set_stroke_style_str(pal.accent);
            ctx.set_line_width(4.0);
            ctx.stroke();
            ctx.restore();
        }
        ctx.restore();
    }

    fn draw_cups(&self, state: &GameState, pal: &Palette) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        for cup in &state.cups {
            ctx.save();
            if cup.hit {
                ctx.set_global_alpha(0.18);
            }
            ctx.begin_path();
            ctx.arc(cup.pos.x as f64, cup.pos.y as f64, cup.radius as f64, 0.0, PI * 2.0)
                .ok();
            ctx.set_fill_style_str(pal.cup);
            ctx.fill();
            ctx.set_stroke_style_str("#ffffff");
            ctx.set_line_width(4.0);
            ctx.stroke();
            ctx.restore();
        }
    }

    fn draw_bomb(&self, x: f64, y: f64, radius: f64) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        ctx.save();
        ctx.begin_path();
        ctx.arc(x, y, radius, 0.0, PI * 2.0).ok();
        ctx.set_fill_style_str("#222222");
        ctx.fill();
        ctx.set_stroke_style_str("#555555");
        ctx.set_line_width(3.0);
        ctx.stroke();
        // Fuse
        ctx.begin_path();
        ctx.move_to(x, y - radius);
        ctx.line_to(x + radius * 0.4, y - radius * 1.5);
        ctx.set_stroke_style_str("#aa6600");
        ctx.set_line_width(2.0);
        ctx.stroke();
        // Spark
        ctx.begin_path();
        ctx.arc(x + radius * 0.4, y - radius * 1.5, 3.0, 0.0, PI * 2.0).ok();
        ctx.set_fill_style_str("#ffcc00");
        ctx.fill();
        ctx.restore();
    }

    fn draw_ball(&self, state: &GameState, pal: &Palette) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        ctx.save();
        ctx.begin_path();
        ctx.arc(
            state.ball.pos.x as f64,
            state.ball.pos.y as f64,
            state.ball.radius as f64,
            0.0,
            PI * 2.0,
        )
        .ok();
        ctx.set_fill_style_str(pal.accent);
        ctx.fill();
        ctx.set_stroke_style_str("#ffffff");
        ctx.set_line_width(2.0);
        ctx.stroke();
        ctx.restore();
    }

    /// Aim lever: shaft from the ball along the aim angle, handle, arrowhead
    /// and a power bar along the bottom
    fn draw_lever(&self, state: &GameState, pal: &Palette) {
        use std::f64::consts::PI;
        let ctx = &self.ctx;
        let bx = state.ball.pos.x as f64;
        let by = state.ball.pos.y as f64;
        let angle = state.aim.angle as f64;
        let power = state.aim.power as f64;

        ctx.save();
        // Base ring at the ball
        ctx.begin_path();
        ctx.arc(bx, by, 18.0, 0.0, PI * 2.0).ok();
        ctx.set_stroke_style_str(pal.accent);
        ctx.set_line_width(3.0);
        ctx.stroke();
        // Shaft, length scaling with charge
        let len = 40.0 + (power - POWER_MIN as f64) * 3.0;
        let ex = bx + angle.cos() * len;
        let ey = by + angle.sin() * len;
        ctx.begin_path();
        ctx.move_to(bx, by);
        ctx.line_to(ex, ey);
        ctx.set_stroke_style_str(pal.accent);
        ctx.set_line_width(6.0);
        ctx.stroke();
        // Handle
        ctx.begin_path();
        ctx.arc(ex, ey, 13.0, 0.0, PI * 2.0).ok();
        ctx.set_fill_style_str(if state.aim.charging { pal.accent } else { "#ffffff" });
        ctx.set_global_alpha(0.85);
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.set_line_width(3.0);
        ctx.stroke();
        // Arrowhead
        ctx.begin_path();
        ctx.move_to(ex, ey);
        ctx.line_to(ex - 16.0 * (angle - 0.3).cos(), ey - 16.0 * (angle - 0.3).sin());
        ctx.move_to(ex, ey);
        ctx.line_to(ex - 16.0 * (angle + 0.3).cos(), ey - 16.0 * (angle + 0.3).sin());
        ctx.stroke();

        // Power bar
        let bar_w = 220.0;
        let bar_h = 18.0;
        let bar_x = (CANVAS_W as f64 - bar_w) / 2.0;
        let bar_y = CANVAS_H as f64 - 38.0;
        ctx.set_fill_style_str(pal.background);
        ctx.fill_rect(bar_x, bar_y, bar_w, bar_h);
        ctx.set_stroke_style_str(pal.accent);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(bar_x, bar_y, bar_w, bar_h);
        let pct = ((power - POWER_MIN as f64) / (POWER_MAX - POWER_MIN) as f64).clamp(0.0, 1.0);
        ctx.set_fill_style_str(pal.accent);
        ctx.set_global_alpha(0.7);
        ctx.fill_rect(bar_x + 3.0, bar_y + 3.0, (bar_w - 6.0) * pct, bar_h - 6.0);
        ctx.set_global_alpha(1.0);
        ctx.set_font("bold 15px Quicksand, Arial");
        ctx.set_text_align("center");
        ctx.set_fill_style_str(pal.text);
        ctx.fill_text("Power", bar_x + bar_w / 2.0, bar_y - 4.0).ok();
        ctx.restore();
    }

    fn draw_hud(&self, state: &GameState, settings: &Settings, pal: &Palette, fps: u32) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_font("22px Arial");
        ctx.set_text_align("left");
        ctx.set_fill_style_str(pal.text);
        ctx.fill_text(
            &format!("Score: {}/{}", state.score(), state.cups.len()),
            16.0,
            30.0,
        )
        .ok();
        ctx.fill_text(&format!("Throws: {}", state.throws), 16.0, 58.0).ok();

        ctx.set_text_align("right");
        ctx.fill_text(&format!("Wind: {:+.2}", state.wind), CANVAS_W as f64 - 16.0, 30.0)
            .ok();
        if let Some(ticks) = state.timer_ticks {
            let secs = ticks.div_ceil(TICK_HZ);
            ctx.fill_text(&format!("Time: {}s", secs), CANVAS_W as f64 - 16.0, 58.0)
                .ok();
        }
        if settings.show_fps {
            ctx.fill_text(&format!("{} fps", fps), CANVAS_W as f64 - 16.0, CANVAS_H as f64 - 12.0)
                .ok();
        }
        ctx.restore();
    }

    fn draw_banners(&self, state: &GameState, pal: &Palette) {
        let ctx = &self.ctx;
        let cx = CANVAS_W as f64 / 2.0;
        let cy = CANVAS_H as f64 / 2.0;

        let banner = match state.phase {
            GamePhase::Won => Some(("You Win!", "Click to play again")),
            GamePhase::TimeUp => Some(("Time's Up!", "Click to try again")),
            _ if state.paused => Some(("Paused", "Press Escape to resume")),
            _ => None,
        };
        if let Some((title, hint)) = banner {
            ctx.save();
            ctx.set_fill_style_str("rgba(0,0,0,0.45)");
            ctx.fill_rect(0.0, cy - 70.0, CANVAS_W as f64, 130.0);
            ctx.set_text_align("center");
            ctx.set_font("32px Arial");
            ctx.set_fill_style_str(if state.phase == GamePhase::Won {
                "#7fdd8a"
            } else {
                pal.ornament
            });
            ctx.fill_text(title, cx, cy).ok();
            ctx.set_font("18px Arial");
            ctx.set_fill_style_str("#ffffff");
            ctx.fill_text(hint, cx, cy + 40.0).ok();
            ctx.restore();
        }
    }
}
