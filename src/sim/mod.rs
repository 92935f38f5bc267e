//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod shop;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, boxes_overlap, circles_overlap};
pub use shop::{ShopItem, close_shop, open_shop, purchase};
pub use spawn::{Edge, Spawner, accrue_survival_score, spawn_enemy, spawn_power_up};
pub use state::{
    ActiveEffects, Boss, Bullet, Dash, Enemy, EnemyKind, GameEvent, GamePhase, GameState, Player,
    PowerUp, PowerUpKind, ScorePopup, ShopState, VisualCounters,
};
pub use tick::{TickInput, tick};
