//! 2D canvas renderer
//!
//! Draws one frame from a session: entities, HUD, overlays and the menu, shop
//! and game-over panels. Holds no game state of its own.

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::hud::{self, Overlays};
use crate::audio::AudioOut;
use crate::consts::BOSS_RADIUS;
use crate::error::StartupError;
use crate::persistence::KeyValueStore;
use crate::session::Session;
use crate::sim::{Boss, Bullet, Enemy, EnemyKind, GamePhase, GameState, PowerUp, ShopItem};

const BACKGROUND: &str = "#1a1a2e";
const PLAYER_COLOR: &str = "#ffdc32";
const PLAYER_GLOW: &str = "#ffd700";
const SHIELD_COLOR: &str = "#00e6ff";
const GOLD: &str = "#ffd700";
const HIT_RED: &str = "#ff4444";
const PANEL: &str = "rgba(20, 20, 30, 0.85)";

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, StartupError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(StartupError::NoCanvasContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| StartupError::NoCanvasContext)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Size the drawing buffer to match the displayed size
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    /// Draw one frame
    pub fn render<A: AudioOut, S: KeyValueStore>(
        &self,
        session: &Session<A, S>,
        time_ms: f64,
    ) -> Result<(), JsValue> {
        let state = session.state();
        let ctx = &self.ctx;
        let (w, h) = (state.arena.x as f64, state.arena.y as f64);
        let overlays = Overlays::from_state(state, session.settings());

        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        if state.phase == GamePhase::Menu {
            return self.draw_menu(state, session.leaderboard().entries());
        }

        ctx.save();
        if overlays.shake > 0.0 {
            let s = overlays.shake as f64;
            ctx.translate(
                (js_sys::Math::random() - 0.5) * s,
                (js_sys::Math::random() - 0.5) * s,
            )?;
        }
        if overlays.hit_flash > 0.0 {
            ctx.set_global_alpha(overlays.hit_flash as f64);
            ctx.set_fill_style_str(HIT_RED);
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_global_alpha(1.0);
        }

        self.draw_player(state, session.pointer(), time_ms)?;
        for bullet in &state.bullets {
            self.draw_icon(Bullet::ICON, bullet.pos, 28.0, 0.95)?;
        }
        for enemy in &state.enemies {
            self.draw_enemy(enemy)?;
        }
        for power_up in &state.power_ups {
            self.draw_power_up(power_up)?;
        }
        if let Some(boss) = &state.boss {
            self.draw_boss(boss)?;
        }

        if overlays.boss_warning {
            ctx.set_global_alpha(0.8);
            self.text("BOSS INCOMING!", w / 2.0, h / 2.0, "48px sans-serif", GOLD, "center")?;
            ctx.set_global_alpha(1.0);
        }
        if overlays.fade > 0.0 {
            ctx.set_global_alpha(overlays.fade as f64);
            ctx.set_fill_style_str("#000");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_global_alpha(1.0);
        }
        ctx.restore();

        if let Some(popup) = &overlays.popup {
            ctx.set_global_alpha(popup.alpha as f64);
            self.text(&popup.text, w / 2.0, 80.0, "40px sans-serif", GOLD, "center")?;
            ctx.set_global_alpha(1.0);
        }

        if state.phase == GamePhase::GameOver {
            if overlays.fade >= 1.0 {
                self.draw_game_over(state, session.leaderboard().entries())?;
            }
            return Ok(());
        }

        self.draw_hud(state)?;

        if state.shop.open {
            self.draw_shop(state)?;
        } else if overlays.paused {
            self.draw_pause(w, h)?;
        }
        Ok(())
    }

    fn text(
        &self,
        text: &str,
        x: f64,
        y: f64,
        font: &str,
        color: &str,
        align: &str,
    ) -> Result<(), JsValue> {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align);
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, x, y)
    }

    fn draw_icon(&self, icon: &str, pos: Vec2, size: f64, alpha: f64) -> Result<(), JsValue> {
        self.ctx.set_global_alpha(alpha);
        let font = format!("{}px serif", size);
        let result = self.text(icon, pos.x as f64, pos.y as f64, &font, "#fff", "center");
        self.ctx.set_global_alpha(1.0);
        result
    }

    fn draw_player(
        &self,
        state: &GameState,
        pointer: Option<Vec2>,
        time_ms: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let player = &state.player;
        let size = player.size as f64;

        // Aim line
        if let Some(target) = pointer {
            ctx.begin_path();
            ctx.move_to(player.pos.x as f64, player.pos.y as f64);
            ctx.line_to(target.x as f64, target.y as f64);
            ctx.set_stroke_style_str("#fff");
            ctx.set_line_width(1.0);
            ctx.set_global_alpha(0.25);
            ctx.stroke();
            ctx.set_global_alpha(1.0);
        }

        ctx.save();
        ctx.translate(player.pos.x as f64, player.pos.y as f64)?;
        ctx.rotate(player.angle as f64)?;
        ctx.begin_path();
        ctx.move_to(size * 0.7, 0.0);
        ctx.line_to(-size * 0.5, -size * 0.5);
        ctx.line_to(-size * 0.5, size * 0.5);
        ctx.close_path();
        ctx.set_fill_style_str(PLAYER_COLOR);
        ctx.set_shadow_color(PLAYER_GLOW);
        ctx.set_shadow_blur(10.0);
        ctx.fill();
        ctx.set_shadow_blur(0.0);

        if state.effects.shield() {
            ctx.begin_path();
            ctx.arc(0.0, 0.0, size / 2.0 + 8.0, 0.0, TAU)?;
            ctx.set_stroke_style_str(SHIELD_COLOR);
            ctx.set_line_width(4.0);
            ctx.set_global_alpha(hud::shield_pulse(time_ms) as f64);
            ctx.stroke();
            ctx.set_global_alpha(1.0);
        }
        ctx.restore();
        Ok(())
    }

    fn draw_enemy(&self, enemy: &Enemy) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (enemy.pos.x as f64, enemy.pos.y as f64);
        ctx.begin_path();
        match enemy.kind {
            EnemyKind::Tanky => {
                ctx.arc(x, y, 22.0, 0.0, TAU)?;
                // Darker once wounded
                ctx.set_fill_style_str(if enemy.health < enemy.kind.health() {
                    "#3c7a3c"
                } else {
                    "#64c864"
                });
            }
            EnemyKind::Fast => {
                ctx.rect(x - 16.0, y - 16.0, 32.0, 32.0);
                ctx.set_fill_style_str(HIT_RED);
            }
            EnemyKind::Normal => {
                ctx.rect(x - 16.0, y - 16.0, 32.0, 32.0);
                ctx.set_fill_style_str("#888");
            }
        }
        ctx.set_shadow_color("#000");
        ctx.set_shadow_blur(8.0);
        ctx.fill();
        ctx.set_shadow_blur(0.0);

        self.draw_icon(enemy.icon(), enemy.pos - Vec2::new(0.0, 36.0), 24.0, 1.0)
    }

    fn draw_power_up(&self, power_up: &PowerUp) -> Result<(), JsValue> {
        self.draw_icon(power_up.kind.icon(), power_up.pos, 32.0, 1.0)
    }

    fn draw_boss(&self, boss: &Boss) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (x, y) = (boss.pos.x as f64, boss.pos.y as f64);
        ctx.begin_path();
        ctx.arc(x, y, BOSS_RADIUS as f64, 0.0, TAU)?;
        ctx.set_fill_style_str("#a020f0");
        ctx.set_shadow_color("#fff");
        ctx.set_shadow_blur(16.0);
        ctx.fill();
        ctx.set_shadow_blur(0.0);

        // Health bar
        ctx.set_fill_style_str("#e23232");
        ctx.fill_rect(x - 30.0, y - 54.0, 60.0, 10.0);
        ctx.set_fill_style_str(GOLD);
        ctx.fill_rect(x - 30.0, y - 54.0, 60.0 * boss.health_fraction() as f64, 10.0);
        self.text("BOSS", x, y - 66.0, "20px serif", "#fff", "center")
    }

    fn draw_hud(&self, state: &GameState) -> Result<(), JsValue> {
        for (i, alpha) in hud::heart_alphas(&state.player).into_iter().enumerate() {
            let pos = Vec2::new(30.0 + i as f32 * 32.0, 24.0);
            self.draw_icon("❤️", pos, 28.0, alpha as f64)?;
        }
        let right = state.arena.x as f64 - 16.0;
        self.text(&hud::score_text(state), right, 24.0, "24px sans-serif", "#fff", "right")?;
        self.text(&hud::high_score_text(state), right, 54.0, "18px sans-serif", GOLD, "right")?;
        self.text(&hud::level_text(state), 16.0, 60.0, "18px sans-serif", "#ccc", "left")?;
        if !state.dash.ready() {
            self.text("Dash recharging", 16.0, 84.0, "14px sans-serif", "#888", "left")?;
        }
        Ok(())
    }

    fn panel(&self, width: f64, height: f64) -> (f64, f64) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let x = (w - width) / 2.0;
        let y = (h - height) / 2.0;
        self.ctx.set_fill_style_str(PANEL);
        self.ctx.fill_rect(x, y, width, height);
        (w / 2.0, y)
    }

    fn draw_menu(&self, state: &GameState, leaderboard: &[u64]) -> Result<(), JsValue> {
        let (cx, top) = self.panel(520.0, 420.0);
        self.text("🧀 Cheddar Defense", cx, top + 50.0, "44px sans-serif", GOLD, "center")?;
        let lines = [
            "WASD / arrows to move, mouse to aim, click to shoot",
            "Shift to dash, P to pause, M to switch music",
            "Defeat bosses for bonus points",
        ];
        for (i, line) in lines.iter().enumerate() {
            let y = top + 110.0 + i as f64 * 28.0;
            self.text(line, cx, y, "18px sans-serif", "#ddd", "center")?;
        }
        self.text(
            &hud::high_score_text(state),
            cx,
            top + 210.0,
            "22px sans-serif",
            GOLD,
            "center",
        )?;
        self.draw_leaderboard(leaderboard, cx, top + 250.0)?;
        self.text(
            "Press Space or Enter to start",
            cx,
            top + 390.0,
            "24px sans-serif",
            "#fff",
            "center",
        )
    }

    fn draw_leaderboard(&self, entries: &[u64], cx: f64, top: f64) -> Result<(), JsValue> {
        if entries.is_empty() {
            return self.text("No scores yet", cx, top, "18px sans-serif", "#888", "center");
        }
        for (i, score) in entries.iter().enumerate() {
            let line = format!("{}. {}", i + 1, score);
            self.text(&line, cx, top + i as f64 * 24.0, "18px sans-serif", "#fff", "center")?;
        }
        Ok(())
    }

    fn draw_pause(&self, w: f64, h: f64) -> Result<(), JsValue> {
        self.ctx.set_global_alpha(0.7);
        self.ctx.set_fill_style_str("#222");
        self.ctx.fill_rect(0.0, 0.0, w, h);
        self.ctx.set_global_alpha(1.0);
        self.text("PAUSED", w / 2.0, h / 2.0, "60px sans-serif", "#fff", "center")?;
        self.text(
            "Press P to resume",
            w / 2.0,
            h / 2.0 + 60.0,
            "28px sans-serif",
            "#fff",
            "center",
        )
    }

    fn draw_shop(&self, state: &GameState) -> Result<(), JsValue> {
        let (cx, top) = self.panel(460.0, 300.0);
        self.text("🛒 Shop", cx, top + 40.0, "36px sans-serif", GOLD, "center")?;
        self.text(
            &format!("Score to spend: {}", state.displayed_score()),
            cx,
            top + 90.0,
            "20px sans-serif",
            "#fff",
            "center",
        )?;
        for (i, item) in ShopItem::ALL.iter().enumerate() {
            let affordable = state.displayed_score() >= item.cost();
            let line = format!("[{}] {} ({} pts)", i + 1, item.label(), item.cost());
            let color = if affordable { "#fff" } else { "#777" };
            let y = top + 140.0 + i as f64 * 36.0;
            self.text(&line, cx, y, "22px sans-serif", color, "center")?;
        }
        self.text(
            &format!("Fire delay: {} ms", state.fire_delay_ms),
            cx,
            top + 225.0,
            "16px sans-serif",
            "#aaa",
            "center",
        )?;
        self.text(
            "Press C or Escape to continue",
            cx,
            top + 270.0,
            "18px sans-serif",
            "#ddd",
            "center",
        )
    }

    fn draw_game_over(&self, state: &GameState, leaderboard: &[u64]) -> Result<(), JsValue> {
        let (cx, top) = self.panel(460.0, 400.0);
        self.text("Game Over", cx, top + 50.0, "48px sans-serif", HIT_RED, "center")?;
        self.text(
            &format!("Final score: {}", state.displayed_score()),
            cx,
            top + 110.0,
            "26px sans-serif",
            "#fff",
            "center",
        )?;
        self.text(
            &hud::high_score_text(state),
            cx,
            top + 145.0,
            "20px sans-serif",
            GOLD,
            "center",
        )?;
        self.text("Top scores", cx, top + 190.0, "20px sans-serif", "#ccc", "center")?;
        self.draw_leaderboard(leaderboard, cx, top + 220.0)?;
        self.text(
            "Press R for the menu",
            cx,
            top + 370.0,
            "22px sans-serif",
            "#fff",
            "center",
        )
    }
}
