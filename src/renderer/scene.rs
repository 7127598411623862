//! Scene painter
//!
//! Builds one frame from a read-only session. Layers are drawn back to front:
//! background, stars, particles, bullets, enemies, player, HUD, overlay.

use glam::Vec2;

use super::colors::{self, Rgba};
use super::{Surface, TextAlign, TextStyle};
use crate::sim::{Enemy, GamePhase, GameSession, OUTLINE_POINTS, Player};

/// Per-frame inputs the session does not carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Wall time, drives the starfield scroll and engine flicker
    pub time_ms: f64,
    pub star_count: usize,
    /// False freezes the starfield and flame (reduced motion)
    pub animate: bool,
    pub best_score: Option<u64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            time_ms: 0.0,
            star_count: 50,
            animate: true,
            best_score: None,
        }
    }
}

const STAR_SCROLL: f64 = 0.02;
const FLAME_BASE: f32 = 10.0;
const FLAME_FLICKER: f32 = 5.0;

/// Draw the session onto `surface`
pub fn render<S: Surface + ?Sized>(state: &GameSession, opts: &RenderOptions, surface: &mut S) {
    surface.clear(colors::BACKGROUND);
    if state.phase == GamePhase::Idle {
        return;
    }

    let t = if opts.animate { opts.time_ms } else { 0.0 };
    draw_stars(surface, opts.star_count, t);

    for p in &state.particles {
        surface.set_alpha(p.life.clamp(0.0, 1.0));
        surface.fill_circle(p.pos, p.size, colors::particle(p.color));
    }
    surface.set_alpha(1.0);

    for bullet in &state.bullets {
        surface.fill_rect(bullet.pos, bullet.shape.size(), colors::BULLET);
    }

    for enemy in &state.enemies {
        surface.fill_polygon(&asteroid_outline(enemy), colors::ENEMY);
    }

    draw_player(surface, &state.player, t);
    draw_hud(surface, state, opts.best_score);

    if state.phase == GamePhase::GameOver {
        draw_game_over(surface, state.score);
    }
}

fn draw_stars<S: Surface + ?Sized>(surface: &mut S, count: usize, t: f64) {
    let (w, h) = surface.size();
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    for i in 0..count {
        let fi = i as f64;
        let x = (fi * 37.0) % w as f64;
        let y = (fi * 53.0 + t * STAR_SCROLL) % h as f64;
        let size = (i % 3 + 1) as f32;
        surface.fill_rect(Vec2::new(x as f32, y as f32), Vec2::splat(size), colors::STAR);
    }
}

/// Rotated jagged outline around the enemy's center
pub fn asteroid_outline(enemy: &Enemy) -> Vec<Vec2> {
    let center = enemy.center();
    let half = enemy.shape.width() / 2.0;
    let step = std::f32::consts::TAU / OUTLINE_POINTS as f32;
    enemy
        .outline
        .iter()
        .enumerate()
        .map(|(i, factor)| {
            let angle = i as f32 * step + enemy.rotation;
            center + Vec2::from_angle(angle) * half * factor
        })
        .collect()
}

/// Arrowhead hull with a notch at the back
pub fn ship_hull(player: &Player) -> [Vec2; 5] {
    let p = player.pos;
    let (w, h) = (player.shape.width(), player.shape.height());
    [
        p + Vec2::new(w / 2.0, 0.0),
        p + Vec2::new(w, h),
        p + Vec2::new(w * 0.7, h * 0.7),
        p + Vec2::new(w * 0.3, h * 0.7),
        p + Vec2::new(0.0, h),
    ]
}

fn draw_player<S: Surface + ?Sized>(surface: &mut S, player: &Player, t: f64) {
    surface.fill_polygon(&ship_hull(player), colors::PLAYER);

    let p = player.pos;
    let (w, h) = (player.shape.width(), player.shape.height());
    // Deterministic flicker in [0, 1)
    let flicker = ((t * 0.03).sin() * 0.5 + 0.5) as f32;
    let tip = h + FLAME_BASE + flicker * FLAME_FLICKER;
    let flame = [
        p + Vec2::new(w * 0.35, h * 0.7),
        p + Vec2::new(w / 2.0, tip),
        p + Vec2::new(w * 0.65, h * 0.7),
    ];
    surface.fill_polygon(&flame, colors::ENGINE);
}

fn hud_style(align: TextAlign) -> TextStyle {
    TextStyle {
        size_px: 16.0,
        bold: false,
        align,
        color: colors::HUD_TEXT,
    }
}

fn draw_hud<S: Surface + ?Sized>(surface: &mut S, state: &GameSession, best: Option<u64>) {
    let (w, _) = surface.size();
    surface.fill_text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, 24.0),
        &hud_style(TextAlign::Left),
    );
    surface.fill_text(
        &format!("Lives: {}", state.lives),
        Vec2::new(w / 2.0, 24.0),
        &hud_style(TextAlign::Center),
    );
    if let Some(best) = best {
        surface.fill_text(
            &format!("Best: {}", best),
            Vec2::new(w - 10.0, 24.0),
            &hud_style(TextAlign::Right),
        );
    }
}

fn draw_game_over<S: Surface + ?Sized>(surface: &mut S, score: u64) {
    let (w, h) = surface.size();
    surface.fill_rect(Vec2::ZERO, Vec2::new(w, h), colors::OVERLAY);

    let center = Vec2::new(w / 2.0, h / 2.0);
    let text = |size_px: f32, bold: bool, color: Rgba| TextStyle {
        size_px,
        bold,
        align: TextAlign::Center,
        color,
    };
    surface.fill_text(
        "GAME OVER",
        center + Vec2::new(0.0, -20.0),
        &text(36.0, true, colors::HUD_TEXT),
    );
    surface.fill_text(
        &format!("Score: {}", score),
        center + Vec2::new(0.0, 20.0),
        &text(20.0, false, colors::HUD_TEXT),
    );
    surface.fill_text(
        "Press SPACE to restart",
        center + Vec2::new(0.0, 60.0),
        &text(16.0, false, colors::PROMPT),
    );
}
