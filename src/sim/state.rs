//! Game state and core simulation types
//!
//! Everything the simulation step reads or writes lives in [`GameState`].
//! There is no other mutable state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use crate::consts::*;

/// Top-level phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Menu,
    /// Active gameplay (may be paused or in the shop)
    Playing,
    /// Run ended, waiting for restart input
    GameOver,
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Facing angle toward the pointer (radians)
    pub angle: f32,
    pub health: u32,
    pub max_health: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            angle: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
        }
    }

    /// Contact radius used against enemies and the boss
    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Subtract damage without going below zero. Returns the new health.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.health = self.health.saturating_sub(amount);
        self.health
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Bullet {
    pub const ICON: &'static str = "🔫";
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Charger: quick, dies in one hit
    Fast,
    /// Mold: slow, round, takes two hits
    Tanky,
    /// Rat: medium speed, one hit
    Normal,
}

const FAST_ICONS: &[&str] = &["🐭"];
const HEALTHY_FOOD_ICONS: &[&str] = &[
    "🥦", "🥕", "🍎", "🥑", "🍉", "🍌", "🍇", "🍓", "🍅", "🥬", "🥒", "🍊",
];

impl EnemyKind {
    pub fn health(self) -> u32 {
        match self {
            EnemyKind::Fast => 1,
            EnemyKind::Tanky => 2,
            EnemyKind::Normal => 1,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Fast => 5.0,
            EnemyKind::Tanky => 1.5,
            EnemyKind::Normal => 3.0,
        }
    }

    /// Collision shape. Only the tanky type is round.
    pub fn hitbox(self) -> Hitbox {
        match self {
            EnemyKind::Tanky => Hitbox::Circle { radius: 22.0 },
            EnemyKind::Fast | EnemyKind::Normal => Hitbox::Square { half_extent: 16.0 },
        }
    }

    /// Inclusive score range awarded on kill
    pub fn kill_bonus(self) -> (u32, u32) {
        match self {
            EnemyKind::Tanky => (2, 6),
            EnemyKind::Fast | EnemyKind::Normal => (5, 10),
        }
    }

    /// Decorative icon set
    pub fn icons(self) -> &'static [&'static str] {
        match self {
            EnemyKind::Fast => FAST_ICONS,
            EnemyKind::Tanky | EnemyKind::Normal => HEALTHY_FOOD_ICONS,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: u32,
    pub speed: f32,
    /// Index into `kind.icons()`
    pub tag: u8,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, tag: u8) -> Self {
        Self {
            id,
            kind,
            pos,
            health: kind.health(),
            speed: kind.speed(),
            tag,
        }
    }

    pub fn icon(&self) -> &'static str {
        let icons = self.kind.icons();
        icons[self.tag as usize % icons.len()]
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}

/// The boss (at most one alive)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
}

impl Boss {
    /// Health tier for a boss spawned at the given score
    pub fn health_for_score(score: f64) -> u32 {
        if score < 50.0 {
            3
        } else if score < 100.0 {
            4
        } else {
            5
        }
    }

    pub fn new(pos: Vec2, max_health: u32) -> Self {
        Self {
            pos,
            speed: BOSS_SPEED,
            health: max_health,
            max_health,
        }
    }

    /// Remaining health as a fraction (for the health bar)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    RapidFire,
    Shield,
    Heal,
    ScoreBonus,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Shield,
        PowerUpKind::Heal,
        PowerUpKind::ScoreBonus,
    ];

    pub fn icon(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "⚡",
            PowerUpKind::Shield => "🛡️",
            PowerUpKind::Heal => "❤️",
            PowerUpKind::ScoreBonus => "💰",
        }
    }
}

/// A power-up lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Timed power-up effects (remaining ticks, 0 = inactive)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub rapid_fire_ticks: u32,
    pub shield_ticks: u32,
}

impl ActiveEffects {
    pub fn rapid_fire(&self) -> bool {
        self.rapid_fire_ticks > 0
    }

    pub fn shield(&self) -> bool {
        self.shield_ticks > 0
    }
}

/// Dash state machine: idle -> dashing -> cooling down -> idle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dash {
    pub active: bool,
    pub timer: u32,
    pub cooldown: u32,
}

impl Dash {
    pub fn ready(&self) -> bool {
        !self.active && self.cooldown == 0
    }
}

/// Purely visual counters (ticks)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualCounters {
    pub hit_flash: u32,
    pub boss_warning: u32,
    pub dash_shake: u32,
    /// 0 = not started; counts up once triggered
    pub game_over_fade: u32,
}

/// "+N" popup shown when the displayed score rises
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScorePopup {
    pub delta: u64,
    pub ticks: u32,
    /// Floored score at the last check
    pub last_seen: u64,
}

/// Shop sub-mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    pub open: bool,
    /// Highest score/360 milestone that already opened the shop
    pub milestone: u64,
}

/// Things that happened during a tick, for audio/persistence/UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    ReturnedToMenu,
    Paused,
    Resumed,
    Fired,
    DashStarted,
    PlayerHit { health: u32 },
    EnemyDestroyed { kind: EnemyKind, bonus: u32 },
    BossSpawned { health: u32 },
    BossDefeated,
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    DifficultyUp { level: u32 },
    ShopOpened,
    ShopClosed,
    GameOver { score: u64, new_high_score: bool },
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    /// Simulation frozen (pause key or shop)
    pub paused: bool,
    /// Arena width/height
    pub arena: Vec2,
    /// Simulation tick counter (only advances while simulating)
    pub time_ticks: u64,
    /// Score; fractional from survival accrual, displayed floored
    pub score: f64,
    /// Best floored score seen, persisted by the session
    pub high_score: u64,
    pub difficulty_level: u32,
    pub difficulty_mark: f64,
    /// Score at which the next boss appears
    pub boss_threshold: f64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<PowerUp>,
    pub boss: Option<Boss>,
    /// Ticks until the next power-up spawn
    pub power_up_timer: i32,
    pub effects: ActiveEffects,
    pub dash: Dash,
    pub fx: VisualCounters,
    pub popup: ScorePopup,
    pub shop: ShopState,
    /// Base delay between shots (ms), lowered by shop upgrades
    pub fire_delay_ms: u32,
    /// Game clock (ms) of the last shot
    pub last_shot_ms: Option<f64>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state sitting at the menu
    pub fn new(width: f32, height: f32, high_score: u64) -> Self {
        let arena = Vec2::new(width, height);
        Self {
            phase: GamePhase::Menu,
            paused: false,
            arena,
            time_ticks: 0,
            score: 0.0,
            high_score,
            difficulty_level: 1,
            difficulty_mark: 0.0,
            boss_threshold: BOSS_FIRST_THRESHOLD,
            player: Player::new(arena / 2.0),
            bullets: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            boss: None,
            power_up_timer: POWERUP_FIRST_SPAWN_TICKS,
            effects: ActiveEffects::default(),
            dash: Dash::default(),
            fx: VisualCounters::default(),
            popup: ScorePopup::default(),
            shop: ShopState::default(),
            fire_delay_ms: FIRE_DELAY_BASE_MS,
            last_shot_ms: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset everything belonging to a run. Keeps arena, high score and phase.
    pub fn reset_run(&mut self) {
        let fresh = Self::new(self.arena.x, self.arena.y, self.high_score);
        let phase = self.phase;
        let events = std::mem::take(&mut self.events);
        *self = Self {
            phase,
            events,
            ..fresh
        };
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as shown on the HUD
    #[inline]
    pub fn displayed_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// True when the simulation body should run this tick
    pub fn is_simulating(&self) -> bool {
        self.phase == GamePhase::Playing && !self.paused && !self.shop.open
    }

    /// Game clock in milliseconds
    #[inline]
    pub fn clock_ms(&self) -> f64 {
        self.time_ticks as f64 * TICK_MS
    }

    /// Current delay between shots, accounting for rapid fire
    pub fn effective_fire_delay_ms(&self) -> u32 {
        if self.effects.rapid_fire() {
            (self.fire_delay_ms / 2).max(FIRE_DELAY_FLOOR_MS)
        } else {
            self.fire_delay_ms
        }
    }

    /// Change the arena size (canvas resize), keeping the player inside
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Vec2::new(width.max(0.0), height.max(0.0));
        self.player.pos = self.player.pos.clamp(Vec2::ZERO, self.arena);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a bullet at the player heading along `dir` (unit vector)
    pub fn spawn_bullet(&mut self, dir: Vec2) {
        let id = self.next_entity_id();
        let pos = self.player.pos;
        self.bullets.push(Bullet {
            id,
            pos,
            vel: dir * BULLET_SPEED,
        });
    }

    /// Add an enemy, returning its id
    pub fn push_enemy(&mut self, kind: EnemyKind, pos: Vec2, tag: u8) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos, tag));
        id
    }

    /// Add a power-up, returning its id
    pub fn push_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp { id, kind, pos });
        id
    }

    /// Whether a point lies inside the arena (edges inclusive)
    #[inline]
    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.arena.x && p.y >= 0.0 && p.y <= self.arena.y
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT, 0)
    }
}
