//! HUD and overlay math
//!
//! Pure functions from game state to what the overlays should look like, so
//! the canvas renderer stays a thin drawing layer.

use crate::consts::{GAME_OVER_FADE_TICKS, SCORE_POPUP_TICKS};
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, Player};

/// Shake contributed by a fresh hit
const HIT_SHAKE: f32 = 10.0;
/// Shake contributed by a dash
const DASH_SHAKE: f32 = 8.0;
/// Alpha of the red full-screen flash when hit
const HIT_FLASH_ALPHA: f32 = 0.5;
/// Alpha of an empty heart
const EMPTY_HEART_ALPHA: f32 = 0.2;

/// The "+N" score popup
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub text: String,
    pub alpha: f32,
}

/// Everything transient drawn over the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Overlays {
    /// Max screen offset in pixels (0 = steady)
    pub shake: f32,
    /// Red flash alpha (0 = none)
    pub hit_flash: f32,
    pub boss_warning: bool,
    /// Black fade alpha after a lethal hit
    pub fade: f32,
    pub popup: Option<Popup>,
    pub paused: bool,
}

impl Overlays {
    pub fn from_state(state: &GameState, settings: &Settings) -> Self {
        Self {
            shake: shake_magnitude(state, settings),
            hit_flash: if state.is_simulating()
                && state.fx.hit_flash > 0
                && settings.effective_hit_flash()
            {
                HIT_FLASH_ALPHA
            } else {
                0.0
            },
            boss_warning: state.fx.boss_warning > 0,
            fade: fade_alpha(state.fx.game_over_fade),
            popup: if state.phase == GamePhase::Playing {
                popup(state)
            } else {
                None
            },
            paused: state.phase == GamePhase::Playing && state.paused,
        }
    }
}

/// Screen shake from hit flash and dash. Frozen frames (paused, shop, game
/// over) stay still.
pub fn shake_magnitude(state: &GameState, settings: &Settings) -> f32 {
    if !settings.effective_screen_shake() || !state.is_simulating() {
        return 0.0;
    }
    let mut shake = 0.0;
    if state.fx.hit_flash > 0 {
        shake += HIT_SHAKE;
    }
    if state.fx.dash_shake > 0 {
        shake += DASH_SHAKE;
    }
    shake
}

/// Fade-to-black alpha for the game-over counter
pub fn fade_alpha(fade: u32) -> f32 {
    (fade as f32 / GAME_OVER_FADE_TICKS as f32).min(1.0)
}

pub fn popup(state: &GameState) -> Option<Popup> {
    if state.popup.ticks == 0 || state.popup.delta == 0 {
        return None;
    }
    Some(Popup {
        text: format!("+{}", state.popup.delta),
        alpha: state.popup.ticks as f32 / SCORE_POPUP_TICKS as f32,
    })
}

/// One alpha per heart slot: full hearts opaque, lost hearts faded
pub fn heart_alphas(player: &Player) -> Vec<f32> {
    (0..player.max_health)
        .map(|i| {
            if i < player.health {
                1.0
            } else {
                EMPTY_HEART_ALPHA
            }
        })
        .collect()
}

/// Pulse of the shield ring (0.0 - 1.0)
pub fn shield_pulse(time_ms: f64) -> f32 {
    (0.5 + 0.5 * (time_ms / 100.0).sin()) as f32
}

pub fn score_text(state: &GameState) -> String {
    format!("Score: {}", state.displayed_score())
}

pub fn high_score_text(state: &GameState) -> String {
    format!("High Score: {}", state.high_score)
}

pub fn level_text(state: &GameState) -> String {
    format!("Level {}", state.difficulty_level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_combines_and_respects_settings() {
        let mut state = GameState::default();
        state.phase = GamePhase::Playing;
        let settings = Settings::default();
        assert_eq!(shake_magnitude(&state, &settings), 0.0);

        state.fx.hit_flash = 5;
        state.fx.dash_shake = 5;
        assert_eq!(shake_magnitude(&state, &settings), 18.0);

        let calm = Settings {
            screen_shake: false,
            ..Default::default()
        };
        assert_eq!(shake_magnitude(&state, &calm), 0.0);

        state.paused = true;
        assert_eq!(shake_magnitude(&state, &settings), 0.0);
    }

    #[test]
    fn test_fade_alpha_saturates() {
        assert_eq!(fade_alpha(0), 0.0);
        assert_eq!(fade_alpha(30), 0.5);
        assert_eq!(fade_alpha(600), 1.0);
    }

    #[test]
    fn test_popup_fades_out() {
        let mut state = GameState::default();
        assert_eq!(popup(&state), None);
        state.popup.delta = 7;
        state.popup.ticks = 15;
        assert_eq!(
            popup(&state),
            Some(Popup {
                text: "+7".to_string(),
                alpha: 0.5
            })
        );
    }

    #[test]
    fn test_hearts() {
        let mut state = GameState::default();
        state.player.health = 3;
        state.player.max_health = 6;
        assert_eq!(
            heart_alphas(&state.player),
            vec![1.0, 1.0, 1.0, 0.2, 0.2, 0.2]
        );
    }

    #[test]
    fn test_hud_text() {
        let mut state = GameState::default();
        state.score = 12.5;
        state.high_score = 40;
        assert_eq!(score_text(&state), "Score: 12");
        assert_eq!(high_score_text(&state), "High Score: 40");
        assert_eq!(level_text(&state), "Level 1");
    }

    #[test]
    fn test_paused_overlay_only_while_playing() {
        let mut state = GameState::default();
        state.paused = true;
        let settings = Settings::default();
        assert!(!Overlays::from_state(&state, &settings).paused);
        state.phase = GamePhase::Playing;
        assert!(Overlays::from_state(&state, &settings).paused);
    }
}
