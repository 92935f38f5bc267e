//! Cheddar Defense - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, spawning, game state)
//! - `session`: Owns the simulation and routes its events to audio and storage
//! - `renderer`: HUD math and the 2D canvas renderer
//! - `platform`: Input mapping and frame timing
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `highscores`: High score and top-5 leaderboard

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{PurchaseError, StartupError, StorageError};
pub use highscores::{HighScore, Leaderboard};
pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (display-synchronized, ~60 Hz)
    pub const TICKS_PER_SEC: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SEC as f32;
    /// Milliseconds of game clock per tick
    pub const TICK_MS: f64 = 1000.0 / TICKS_PER_SEC as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default arena size (matches the canvas before any resize)
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const ARENA_HEIGHT: f32 = 700.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: u32 = 5;
    /// Speed multiplier while dashing
    pub const DASH_SPEED_MULT: f32 = 3.5;
    pub const DASH_DURATION_TICKS: u32 = 15;
    pub const DASH_COOLDOWN_TICKS: u32 = 60;

    /// Bullets
    pub const BULLET_SPEED: f32 = 18.0;
    /// Collision padding added to every target's shape
    pub const BULLET_RADIUS: f32 = 7.0;
    /// Base delay between shots (ms)
    pub const FIRE_DELAY_BASE_MS: u32 = 80;
    /// No fire delay (base, rapid-fire or upgraded) drops below this
    pub const FIRE_DELAY_FLOOR_MS: u32 = 20;

    /// Boss
    pub const BOSS_RADIUS: f32 = 40.0;
    pub const BOSS_SPEED: f32 = 2.0;
    pub const BOSS_SPAWN_Y: f32 = 80.0;
    pub const BOSS_FIRST_THRESHOLD: f64 = 50.0;
    pub const BOSS_THRESHOLD_STEP: f64 = 50.0;
    pub const BOSS_BONUS: f64 = 25.0;
    pub const BOSS_CONTACT_DAMAGE: u32 = 2;
    pub const BOSS_KNOCKBACK: f32 = 60.0;
    /// Boss warning display (2 seconds)
    pub const BOSS_WARNING_TICKS: u32 = 120;

    /// Enemies spawn this far outside the arena edge
    pub const ENEMY_SPAWN_MARGIN: f32 = 30.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Passive survival score
    pub const SURVIVAL_SCORE: f64 = 0.5;
    pub const SURVIVAL_INTERVAL_MS: f64 = 1000.0;

    /// Power-ups
    pub const POWERUP_FIRST_SPAWN_TICKS: i32 = 600;
    pub const POWERUP_RESPAWN_MIN_TICKS: i32 = 600;
    pub const POWERUP_RESPAWN_MAX_TICKS: i32 = 1200;
    /// Power-ups never spawn closer than this to an edge
    pub const POWERUP_EDGE_MARGIN: f32 = 40.0;
    /// Added to player size for the pickup radius
    pub const POWERUP_PICKUP_PAD: f32 = 10.0;
    pub const RAPID_FIRE_TICKS: u32 = 600;
    pub const SHIELD_TICKS: u32 = 600;
    pub const HEAL_AMOUNT: u32 = 2;
    pub const SCORE_POWERUP_BONUS: f64 = 50.0;

    /// Score needed per difficulty level
    pub const DIFFICULTY_STEP: f64 = 120.0;
    /// Score per shop milestone (3 waves)
    pub const SHOP_STEP: u64 = 360;

    /// Visual counters
    pub const HIT_FLASH_TICKS: u32 = 20;
    pub const DASH_SHAKE_TICKS: u32 = 10;
    pub const SCORE_POPUP_TICKS: u32 = 30;
    /// Game-over fade counts up to this before the panel is shown
    pub const GAME_OVER_FADE_TICKS: u32 = 60;
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
