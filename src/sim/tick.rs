//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one step. Steps run in a fixed
//! order; later collision checks see the mutations of earlier ones.

use glam::Vec2;
use rand::Rng;

use super::collision::circles_overlap;
use super::shop::open_shop;
use super::spawn::{roll_power_up_delay, spawn_power_up};
use super::state::{Boss, GameEvent, GamePhase, GameState, PowerUpKind};
use crate::consts::*;
use crate::direction_to;

/// Input sampled once per tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held direction keys as an axis vector (+y is down). Normalized by the tick.
    pub movement: Vec2,
    /// Pointer position in arena coordinates, if known
    pub pointer: Option<Vec2>,
    /// Pointer pressed since the last tick
    pub fire: bool,
    /// Dash key pressed since the last tick
    pub dash: bool,
    /// Pause toggle
    pub pause: bool,
    /// Start a run from the menu
    pub start: bool,
    /// Leave the game-over screen for the menu
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    match state.phase {
        GamePhase::Menu => {
            if input.start {
                start_run(state);
            }
            return;
        }
        GamePhase::GameOver => {
            if state.fx.game_over_fade > 0 {
                state.fx.game_over_fade = (state.fx.game_over_fade + 1).min(GAME_OVER_FADE_TICKS);
            }
            if input.restart {
                state.reset_run();
                state.phase = GamePhase::Menu;
                state.emit(GameEvent::ReturnedToMenu);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    // Handle pause toggle (the shop owns the freeze while it is open)
    if input.pause && !state.shop.open {
        state.paused = !state.paused;
        state.emit(if state.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
    }

    if !state.is_simulating() {
        return;
    }

    state.time_ticks += 1;

    if input.dash && state.dash.ready() {
        state.dash.active = true;
        state.dash.timer = DASH_DURATION_TICKS;
        state.fx.dash_shake = DASH_SHAKE_TICKS;
        state.emit(GameEvent::DashStarted);
    }
    if input.fire {
        try_fire(state, input.pointer);
    }

    move_player(state, input);
    move_bullets(state);
    update_difficulty(state);
    move_enemies(state);
    maybe_spawn_boss(state);
    update_boss(state);
    boss_contact(state, rng);
    bullet_enemy_collisions(state, rng);
    enemy_contact(state);
    update_power_up_spawn(state, rng);
    collect_power_ups(state);
    tick_down_timers(state);
    check_game_over(state);
    update_dash(state);
    update_score_popup(state);
    check_shop(state);
}

fn start_run(state: &mut GameState) {
    state.reset_run();
    state.phase = GamePhase::Playing;
    state.emit(GameEvent::RunStarted);
    log::info!("Run started (high score {})", state.high_score);
}

fn try_fire(state: &mut GameState, pointer: Option<Vec2>) {
    let now = state.clock_ms();
    let delay = state.effective_fire_delay_ms() as f64;
    if state.last_shot_ms.is_some_and(|last| now - last < delay) {
        return;
    }
    let Some(pointer) = pointer else { return };
    let dir = direction_to(state.player.pos, pointer);
    if dir == Vec2::ZERO {
        return;
    }
    state.last_shot_ms = Some(now);
    state.spawn_bullet(dir);
    state.emit(GameEvent::Fired);
}

// 1. Player movement and facing
fn move_player(state: &mut GameState, input: &TickInput) {
    let dir = input.movement.normalize_or_zero();
    if dir != Vec2::ZERO {
        let mut speed = state.player.speed;
        if state.dash.active {
            speed *= DASH_SPEED_MULT;
        }
        state.player.pos = (state.player.pos + dir * speed).clamp(Vec2::ZERO, state.arena);
    }

    if let Some(pointer) = input.pointer {
        let aim = pointer - state.player.pos;
        if aim != Vec2::ZERO {
            state.player.angle = aim.y.atan2(aim.x);
        }
    }
}

// 2. Bullets fly straight and vanish off-screen
fn move_bullets(state: &mut GameState) {
    let arena = state.arena;
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
    }
    state
        .bullets
        .retain(|b| b.pos.x >= 0.0 && b.pos.x <= arena.x && b.pos.y >= 0.0 && b.pos.y <= arena.y);
}

// 3. One difficulty level per 120 score, at most one per tick
fn update_difficulty(state: &mut GameState) {
    if state.score - state.difficulty_mark >= DIFFICULTY_STEP {
        state.difficulty_level += 1;
        state.difficulty_mark = (state.score / DIFFICULTY_STEP).floor() * DIFFICULTY_STEP;
        let level = state.difficulty_level;
        state.emit(GameEvent::DifficultyUp { level });
        log::debug!("Difficulty level {}", level);
    }
}

// 4. Chasers head straight for the player
fn move_enemies(state: &mut GameState) {
    let target = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.pos += direction_to(enemy.pos, target) * enemy.speed;
    }
}

// 5. Boss appears at escalating score thresholds
fn maybe_spawn_boss(state: &mut GameState) {
    if state.boss.is_some() || state.score < state.boss_threshold {
        return;
    }
    let health = Boss::health_for_score(state.score);
    state.boss = Some(Boss::new(Vec2::new(state.arena.x / 2.0, BOSS_SPAWN_Y), health));
    state.boss_threshold += BOSS_THRESHOLD_STEP;
    state.fx.boss_warning = BOSS_WARNING_TICKS;
    state.emit(GameEvent::BossSpawned { health });
    log::info!(
        "Boss spawned with {} health (next at {})",
        health,
        state.boss_threshold
    );
}

// 6. Boss pursuit and bullet hits
fn update_boss(state: &mut GameState) {
    let target = state.player.pos;
    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    boss.pos += direction_to(boss.pos, target) * boss.speed;

    // Once the boss is down the remaining bullets fly on
    state.bullets.retain(|bullet| {
        if boss.health > 0 && circles_overlap(bullet.pos, BULLET_RADIUS, boss.pos, BOSS_RADIUS) {
            boss.health -= 1;
            false
        } else {
            true
        }
    });

    if boss.health == 0 {
        state.boss = None;
        state.score += BOSS_BONUS;
        state.emit(GameEvent::BossDefeated);
        log::info!("Boss defeated");
    }
}

// 7. Boss contact: two damage, or lethal if that would leave nothing
fn boss_contact<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    if state.effects.shield() {
        return;
    }
    let player_pos = state.player.pos;
    let reach = state.player.half_size();
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if !circles_overlap(player_pos, reach, boss.pos, BOSS_RADIUS) {
        return;
    }

    if state.player.health <= BOSS_CONTACT_DAMAGE {
        state.player.health = 0;
        if state.fx.game_over_fade == 0 {
            state.fx.game_over_fade = 1;
        }
        return;
    }

    let health = state.player.take_damage(BOSS_CONTACT_DAMAGE);
    state.fx.hit_flash = HIT_FLASH_TICKS;
    // Knock the boss away so it cannot hit again next tick
    let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    boss.pos += Vec2::new(sx, sy) * BOSS_KNOCKBACK;
    state.emit(GameEvent::PlayerHit { health });
}

// 8. Each bullet damages at most one enemy
fn bullet_enemy_collisions<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    let enemies = &mut state.enemies;
    let mut killed = Vec::new();

    state.bullets.retain(|bullet| {
        let target = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && e.kind.hitbox().overlaps(e.pos, bullet.pos, BULLET_RADIUS));
        match target {
            Some(enemy) => {
                enemy.health -= 1;
                if enemy.is_dead() {
                    killed.push(enemy.kind);
                }
                false
            }
            None => true,
        }
    });

    if killed.is_empty() {
        return;
    }
    state.enemies.retain(|e| !e.is_dead());
    for kind in killed {
        let (lo, hi) = kind.kill_bonus();
        let bonus = rng.random_range(lo..=hi);
        state.score += bonus as f64;
        state.emit(GameEvent::EnemyDestroyed { kind, bonus });
    }
}

// 9. Enemies that reach the player are spent, shield or not
fn enemy_contact(state: &mut GameState) {
    let player_pos = state.player.pos;
    let reach = state.player.half_size();
    let before = state.enemies.len();
    state
        .enemies
        .retain(|e| !e.kind.hitbox().overlaps(e.pos, player_pos, reach));
    let hits = before - state.enemies.len();

    if state.effects.shield() {
        return;
    }
    for _ in 0..hits {
        let health = state.player.take_damage(1);
        state.fx.hit_flash = HIT_FLASH_TICKS;
        state.emit(GameEvent::PlayerHit { health });
    }
}

// 10. Power-up countdown
fn update_power_up_spawn<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) {
    state.power_up_timer -= 1;
    if state.power_up_timer <= 0 {
        spawn_power_up(state, rng);
        state.power_up_timer = roll_power_up_delay(rng);
    }
}

// 11. Pickups
fn collect_power_ups(state: &mut GameState) {
    let player_pos = state.player.pos;
    let reach = state.player.size + POWERUP_PICKUP_PAD;
    let mut collected = Vec::new();
    state.power_ups.retain(|p| {
        if player_pos.distance(p.pos) < reach {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        match kind {
            PowerUpKind::RapidFire => state.effects.rapid_fire_ticks = RAPID_FIRE_TICKS,
            PowerUpKind::Shield => state.effects.shield_ticks = SHIELD_TICKS,
            PowerUpKind::Heal => state.player.heal(HEAL_AMOUNT),
            PowerUpKind::ScoreBonus => state.score += SCORE_POWERUP_BONUS,
        }
        state.emit(GameEvent::PowerUpCollected(kind));
    }
}

// 12. Effect durations and visual counters
fn tick_down_timers(state: &mut GameState) {
    let effects = &mut state.effects;
    effects.rapid_fire_ticks = effects.rapid_fire_ticks.saturating_sub(1);
    effects.shield_ticks = effects.shield_ticks.saturating_sub(1);

    let fx = &mut state.fx;
    fx.hit_flash = fx.hit_flash.saturating_sub(1);
    fx.boss_warning = fx.boss_warning.saturating_sub(1);
    if fx.game_over_fade > 0 {
        fx.game_over_fade = (fx.game_over_fade + 1).min(GAME_OVER_FADE_TICKS);
    }
}

// 13. Out of health ends the run
fn check_game_over(state: &mut GameState) {
    if state.player.health > 0 || state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::GameOver;
    let score = state.displayed_score();
    let new_high_score = score > state.high_score;
    if new_high_score {
        state.high_score = score;
    }
    if state.fx.game_over_fade == 0 {
        state.fx.game_over_fade = 1;
    }
    state.emit(GameEvent::GameOver {
        score,
        new_high_score,
    });
    log::info!("Game over: score {} (new high score: {})", score, new_high_score);
}

// 14. Dash duration then cooldown
fn update_dash(state: &mut GameState) {
    let dash = &mut state.dash;
    if dash.active {
        dash.timer = dash.timer.saturating_sub(1);
        if dash.timer == 0 {
            dash.active = false;
            dash.cooldown = DASH_COOLDOWN_TICKS;
        }
    } else if dash.cooldown > 0 {
        dash.cooldown -= 1;
    }

    let fx = &mut state.fx;
    if fx.hit_flash > 0 {
        fx.dash_shake = DASH_SHAKE_TICKS;
    }
    fx.dash_shake = fx.dash_shake.saturating_sub(1);
}

// 15. "+N" popup on displayed score increases
fn update_score_popup(state: &mut GameState) {
    let shown = state.displayed_score();
    let popup = &mut state.popup;
    if shown > popup.last_seen {
        popup.delta = shown - popup.last_seen;
        popup.ticks = SCORE_POPUP_TICKS;
    } else {
        popup.ticks = popup.ticks.saturating_sub(1);
    }
    // Also follows score spent in the shop
    popup.last_seen = shown;
}

// 16. Shop every 360 displayed score
fn check_shop(state: &mut GameState) {
    if state.phase != GamePhase::Playing || state.shop.open {
        return;
    }
    let milestone = state.displayed_score() / SHOP_STEP;
    if milestone > state.shop.milestone {
        state.shop.milestone = milestone;
        open_shop(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Bullet, EnemyKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    fn playing_state() -> GameState {
        let mut state = GameState::default();
        state.phase = GamePhase::Playing;
        state
    }

    /// Stationary enemy
    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = state.push_enemy(kind, pos, 0);
        if let Some(enemy) = state.enemies.last_mut() {
            enemy.speed = 0.0;
        }
        id
    }

    /// Stationary bullet
    fn add_bullet(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
        });
    }

    fn count_events(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_tick_menu_to_playing() {
        let mut state = GameState::default();
        let mut rng = rng();

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::Menu);

        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted]);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state();
        let mut rng = rng();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };

        tick(&mut state, &pause, &mut rng);
        assert!(state.paused);
        let frozen_at = state.time_ticks;

        let walk = TickInput {
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let before = state.player.pos;
        tick(&mut state, &walk, &mut rng);
        assert_eq!(state.player.pos, before);
        assert_eq!(state.time_ticks, frozen_at);

        tick(&mut state, &pause, &mut rng);
        assert!(!state.paused);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut state = playing_state();
        let mut rng = rng();
        state.player.pos = Vec2::new(2.0, 2.0);
        let input = TickInput {
            movement: Vec2::new(-1.0, -1.0),
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        assert_eq!(state.player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut state = playing_state();
        let mut rng = rng();
        let start = state.player.pos;
        let input = TickInput {
            movement: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        let moved = state.player.pos.distance(start);
        assert!((moved - PLAYER_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_facing_follows_pointer() {
        let mut state = playing_state();
        let mut rng = rng();
        let input = TickInput {
            pointer: Some(state.player.pos + Vec2::new(0.0, 100.0)),
            ..Default::default()
        };
        tick(&mut state, &input, &mut rng);
        assert!((state.player.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_dash_then_cooldown() {
        let mut state = playing_state();
        let mut rng = rng();
        let dash = TickInput {
            dash: true,
            movement: Vec2::new(1.0, 0.0),
            ..Default::default()
        };
        let start = state.player.pos;
        tick(&mut state, &dash, &mut rng);
        assert!(state.dash.active);
        assert!((state.player.pos.x - start.x - PLAYER_SPEED * DASH_SPEED_MULT).abs() < 1e-4);

        let idle = TickInput::default();
        for _ in 1..DASH_DURATION_TICKS {
            assert!(state.dash.active);
            tick(&mut state, &idle, &mut rng);
        }
        assert!(!state.dash.active);
        assert_eq!(state.dash.cooldown, DASH_COOLDOWN_TICKS);

        // Dash refused during cooldown
        tick(&mut state, &dash, &mut rng);
        assert!(!state.dash.active);
        assert_eq!(state.dash.cooldown, DASH_COOLDOWN_TICKS - 1);
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut state = playing_state();
        let mut rng = rng();
        let fire = TickInput {
            fire: true,
            pointer: Some(state.player.pos + Vec2::new(100.0, 0.0)),
            ..Default::default()
        };

        tick(&mut state, &fire, &mut rng);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].vel, Vec2::new(BULLET_SPEED, 0.0));

        // 80ms delay at 60Hz: ticks 2..=5 are too soon, tick 6 fires
        for _ in 0..4 {
            tick(&mut state, &fire, &mut rng);
        }
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &fire, &mut rng);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_bullets_leave_arena() {
        let mut state = playing_state();
        let mut rng = rng();
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(state.arena.x - 5.0, 100.0),
            vel: Vec2::new(BULLET_SPEED, 0.0),
        });
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_difficulty_once_per_tick() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;

        state.score = 130.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.difficulty_level, 2);
        assert_eq!(state.difficulty_mark, 120.0);

        state.score = 500.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.difficulty_level, 3);
        assert_eq!(state.difficulty_mark, 480.0);

        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.difficulty_level, 3);
    }

    #[test]
    fn test_boss_spawns_at_threshold() {
        let mut state = playing_state();
        let mut rng = rng();
        state.score = 49.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.boss.is_none());

        state.score = 50.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        let boss = state.boss.as_ref().expect("boss");
        assert_eq!(boss.max_health, 4);
        assert_eq!(state.boss_threshold, 100.0);
        assert_eq!(state.fx.boss_warning, BOSS_WARNING_TICKS - 1);
    }

    #[test]
    fn test_boss_defeat_awards_bonus_once() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        let pos = Vec2::new(500.0, 100.0);
        let mut boss = Boss::new(pos, 1);
        boss.speed = 0.0;
        state.boss = Some(boss);
        for _ in 0..3 {
            add_bullet(&mut state, pos);
        }

        tick(&mut state, &TickInput::default(), &mut rng);

        assert!(state.boss.is_none());
        assert_eq!(state.score, BOSS_BONUS);
        // Only the killing bullet was spent
        assert_eq!(state.bullets.len(), 2);
        assert_eq!(count_events(&state, |e| *e == GameEvent::BossDefeated), 1);
    }

    #[test]
    fn test_boss_contact_lethal_at_two_health() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        state.player.health = 2;
        let mut boss = Boss::new(state.player.pos, 5);
        boss.speed = 0.0;
        state.boss = Some(boss);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.fx.game_over_fade > 0);
    }

    #[test]
    fn test_boss_contact_two_damage_at_three_health() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        state.player.health = 3;
        let start = state.player.pos;
        let mut boss = Boss::new(start, 5);
        boss.speed = 0.0;
        state.boss = Some(boss);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.player.health, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        let boss = state.boss.as_ref().expect("boss");
        let offset = (boss.pos - start).abs();
        assert_eq!(offset, Vec2::splat(BOSS_KNOCKBACK));
        assert_eq!(state.fx.hit_flash, HIT_FLASH_TICKS - 1);
    }

    #[test]
    fn test_fast_enemy_one_shot() {
        let mut state = playing_state();
        let mut rng = rng();
        let pos = Vec2::new(200.0, 200.0);
        add_enemy(&mut state, EnemyKind::Fast, pos);
        add_bullet(&mut state, pos);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!((5.0..=10.0).contains(&state.score));
        assert_eq!(state.score.fract(), 0.0);
    }

    #[test]
    fn test_tanky_enemy_needs_two_hits() {
        let mut state = playing_state();
        let mut rng = rng();
        let pos = Vec2::new(200.0, 200.0);
        add_enemy(&mut state, EnemyKind::Tanky, pos);

        add_bullet(&mut state, pos);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].health, 1);
        assert!(state.bullets.is_empty());
        assert_eq!(state.score, 0.0);

        add_bullet(&mut state, pos);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!((2.0..=6.0).contains(&state.score));
    }

    #[test]
    fn test_bullet_damages_only_one_enemy() {
        let mut state = playing_state();
        let mut rng = rng();
        let pos = Vec2::new(200.0, 200.0);
        add_enemy(&mut state, EnemyKind::Normal, pos);
        let survivor = add_enemy(&mut state, EnemyKind::Normal, pos);
        add_bullet(&mut state, pos);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].id, survivor);
        assert_eq!(state.enemies[0].health, 1);
    }

    #[test]
    fn test_enemy_contact_damages_player() {
        let mut state = playing_state();
        let mut rng = rng();
        let player_pos = state.player.pos;
        add_enemy(&mut state, EnemyKind::Normal, player_pos);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH - 1);
        assert!(state.enemies.is_empty());
        assert_eq!(
            count_events(&state, |e| matches!(e, GameEvent::PlayerHit { .. })),
            1
        );
    }

    #[test]
    fn test_shield_blocks_enemy_contact() {
        let mut state = playing_state();
        let mut rng = rng();
        let pos = state.player.pos;
        state.push_power_up(PowerUpKind::Shield, pos + Vec2::new(20.0, 0.0));

        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.effects.shield());
        assert!(state.power_ups.is_empty());

        add_enemy(&mut state, EnemyKind::Fast, pos);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.player.health, PLAYER_MAX_HEALTH);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_power_up_effects() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        let pos = state.player.pos;
        state.player.health = 2;
        state.push_power_up(PowerUpKind::Heal, pos);
        state.push_power_up(PowerUpKind::ScoreBonus, pos);
        state.push_power_up(PowerUpKind::RapidFire, pos);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.player.health, 4);
        assert_eq!(state.score, SCORE_POWERUP_BONUS);
        assert_eq!(state.effects.rapid_fire_ticks, RAPID_FIRE_TICKS - 1);
    }

    #[test]
    fn test_timed_effects_expire() {
        let mut state = playing_state();
        let mut rng = rng();
        state.effects.shield_ticks = 2;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.effects.shield());
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(!state.effects.shield());
    }

    #[test]
    fn test_power_up_countdown_spawns() {
        let mut state = playing_state();
        let mut rng = rng();
        state.power_up_timer = 1;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.power_ups.len(), 1);
        assert!((600..1200).contains(&state.power_up_timer));
    }

    #[test]
    fn test_game_over_updates_high_score() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        state.high_score = 10;
        state.score = 30.7;
        state.player.health = 1;
        let player_pos = state.player.pos;
        add_enemy(&mut state, EnemyKind::Normal, player_pos);

        tick(&mut state, &TickInput::default(), &mut rng);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 30);
        assert_eq!(
            count_events(&state, |e| *e
                == GameEvent::GameOver {
                    score: 30,
                    new_high_score: true
                }),
            1
        );
    }

    #[test]
    fn test_game_over_fade_then_restart() {
        let mut state = playing_state();
        let mut rng = rng();
        state.phase = GamePhase::GameOver;
        state.fx.game_over_fade = 1;
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.fx.game_over_fade, GAME_OVER_FADE_TICKS);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, &mut rng);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.fx.game_over_fade, 0);
    }

    #[test]
    fn test_score_popup_shows_delta() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        state.score = 7.5;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.popup.delta, 7);
        assert_eq!(state.popup.ticks, SCORE_POPUP_TICKS);

        for _ in 0..SCORE_POPUP_TICKS {
            tick(&mut state, &TickInput::default(), &mut rng);
        }
        assert_eq!(state.popup.ticks, 0);
    }

    #[test]
    fn test_shop_opens_once_per_milestone() {
        let mut state = playing_state();
        let mut rng = rng();
        state.boss_threshold = f64::MAX;
        let shop_opened = |s: &GameState| count_events(s, |e| *e == GameEvent::ShopOpened);

        state.score = 359.9;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(!state.shop.open);

        state.score = 360.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.shop.open);
        assert_eq!(shop_opened(&state), 1);

        // Frozen while open
        let frozen_at = state.time_ticks;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert_eq!(state.time_ticks, frozen_at);

        crate::sim::shop::close_shop(&mut state);
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(!state.shop.open);
        assert_eq!(shop_opened(&state), 1);

        state.score = 719.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(!state.shop.open);

        state.score = 720.0;
        tick(&mut state, &TickInput::default(), &mut rng);
        assert!(state.shop.open);
        assert_eq!(shop_opened(&state), 2);
    }

    #[test]
    fn test_pause_ignored_in_shop() {
        let mut state = playing_state();
        let mut rng = rng();
        state.shop.open = true;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut rng);
        assert!(!state.paused);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs produce identical results
        let mut state1 = playing_state();
        let mut state2 = playing_state();
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        for state in [&mut state1, &mut state2] {
            state.power_up_timer = 3;
            state.score = 60.0;
        }

        let inputs = [
            TickInput {
                movement: Vec2::new(1.0, 0.0),
                pointer: Some(Vec2::new(10.0, 10.0)),
                fire: true,
                ..Default::default()
            },
            TickInput {
                dash: true,
                movement: Vec2::new(0.0, -1.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput::default(),
        ];

        for input in &inputs {
            tick(&mut state1, input, &mut rng1);
            tick(&mut state2, input, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.power_up_timer, state2.power_up_timer);
        assert_eq!(state1.power_ups.len(), state2.power_ups.len());
        for (a, b) in state1.power_ups.iter().zip(&state2.power_ups) {
            assert_eq!(a.pos, b.pos);
        }
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.pos, state2.player.pos);
        assert_eq!(state1.bullets.len(), state2.bullets.len());
    }
}
