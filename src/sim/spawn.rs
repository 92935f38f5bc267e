//! Spawning
//!
//! Enemies and survival score arrive on real-time intervals, independent of
//! the tick. Power-ups are spawned from inside the tick on their own countdown.

use glam::Vec2;
use rand::Rng;

use super::state::{EnemyKind, GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;
use crate::platform::time::Interval;

/// Arena side an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// A point just outside this edge; `t` in [0,1) picks the spot along it
    pub fn spawn_point(self, arena: Vec2, t: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(t * arena.x, -ENEMY_SPAWN_MARGIN),
            Edge::Right => Vec2::new(arena.x + ENEMY_SPAWN_MARGIN, t * arena.y),
            Edge::Bottom => Vec2::new(t * arena.x, arena.y + ENEMY_SPAWN_MARGIN),
            Edge::Left => Vec2::new(-ENEMY_SPAWN_MARGIN, t * arena.y),
        }
    }
}

/// Weighted enemy draw: 20% fast, 40% tanky, 40% normal
pub fn roll_enemy_kind<R: Rng + ?Sized>(rng: &mut R) -> EnemyKind {
    let roll: f32 = rng.random();
    if roll < 0.2 {
        EnemyKind::Fast
    } else if roll < 0.6 {
        EnemyKind::Tanky
    } else {
        EnemyKind::Normal
    }
}

/// Spawn one enemy at a random edge. No-op unless a run is in progress.
pub fn spawn_enemy<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> Option<u32> {
    if state.phase != GamePhase::Playing {
        return None;
    }

    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let pos = edge.spawn_point(state.arena, rng.random());
    let kind = roll_enemy_kind(rng);
    let tag = rng.random_range(0..kind.icons().len()) as u8;

    let id = state.push_enemy(kind, pos, tag);
    log::trace!("Spawned {:?} #{} at {:?} ({:?})", kind, id, pos, edge);
    Some(id)
}

/// Passive survival score. No-op unless a run is in progress.
pub fn accrue_survival_score(state: &mut GameState) {
    if state.phase == GamePhase::Playing {
        state.score += SURVIVAL_SCORE;
    }
}

/// Drop a uniformly random power-up somewhere inside the arena margins
pub fn spawn_power_up<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> u32 {
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let span = (state.arena - Vec2::splat(2.0 * POWERUP_EDGE_MARGIN)).max(Vec2::ZERO);
    let pos = Vec2::new(
        POWERUP_EDGE_MARGIN + rng.random::<f32>() * span.x,
        POWERUP_EDGE_MARGIN + rng.random::<f32>() * span.y,
    );
    let id = state.push_power_up(kind, pos);
    state.emit(GameEvent::PowerUpSpawned(kind));
    id
}

/// Ticks until the next power-up, uniform in [600, 1200)
pub fn roll_power_up_delay<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(POWERUP_RESPAWN_MIN_TICKS..POWERUP_RESPAWN_MAX_TICKS)
}

/// The two real-time generators
#[derive(Debug, Clone)]
pub struct Spawner {
    enemies: Interval,
    survival: Interval,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            enemies: Interval::new(ENEMY_SPAWN_INTERVAL_MS),
            survival: Interval::new(SURVIVAL_INTERVAL_MS),
        }
    }

    /// Advance both intervals by real elapsed time and fire what is due.
    ///
    /// Runs whether or not the simulation is paused; each generator checks the
    /// phase itself.
    pub fn advance<R: Rng + ?Sized>(&mut self, state: &mut GameState, elapsed_ms: f64, rng: &mut R) {
        for _ in 0..self.enemies.advance(elapsed_ms) {
            spawn_enemy(state, rng);
        }
        for _ in 0..self.survival.advance(elapsed_ms) {
            accrue_survival_score(state);
        }
    }
}
