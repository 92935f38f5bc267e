//! Game session
//!
//! Owns the simulation and everything around it: input, frame timing, the
//! real-time spawner, scores, settings, audio and storage. Platform code only
//! forwards events here and asks for frames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioOut, Cue};
use crate::error::PurchaseError;
use crate::highscores::{HighScore, Leaderboard};
use crate::persistence::KeyValueStore;
use crate::platform::{FixedStep, InputState, Key};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameState, ShopItem, Spawner};

/// One running game
pub struct Session<A: AudioOut, S: KeyValueStore> {
    state: GameState,
    rng: Pcg32,
    input: InputState,
    step: FixedStep,
    spawner: Spawner,
    leaderboard: Leaderboard,
    settings: Settings,
    audio: A,
    store: S,
}

impl<A: AudioOut, S: KeyValueStore> Session<A, S> {
    /// Build a session at the menu, reading scores and settings from `store`
    pub fn new(store: S, mut audio: A, width: f32, height: f32, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let high_score = HighScore::load(&store);
        let leaderboard = Leaderboard::load(&store);
        audio.apply_settings(&settings);

        log::info!(
            "Session created (seed {}, high score {}, {} leaderboard entries)",
            seed,
            high_score,
            leaderboard.entries().len()
        );

        Self {
            state: GameState::new(width, height, high_score),
            rng: Pcg32::seed_from_u64(seed),
            input: InputState::new(),
            step: FixedStep::new(),
            spawner: Spawner::new(),
            leaderboard,
            settings,
            audio,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Last known pointer position (arena coordinates)
    pub fn pointer(&self) -> Option<Vec2> {
        self.input.pointer()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::ToggleMusic => self.toggle_music(),
            Key::BuyHeart => self.buy_from_key(ShopItem::ExtraHeart),
            Key::BuyFire => self.buy_from_key(ShopItem::FasterFire),
            Key::CloseShop => self.close_shop(),
            _ => self.input.key_down(key),
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.input.pointer_move(pos);
    }

    pub fn pointer_down(&mut self) {
        self.input.pointer_down();
    }

    /// Window lost focus: held keys will never see their keyup, and a running
    /// game pauses itself
    pub fn focus_lost(&mut self) {
        self.input.release_all();
        if self.state.is_simulating() {
            self.input.key_down(Key::Pause);
            log::info!("Auto-paused (focus lost)");
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// Advance by `dt` seconds of real time. Returns the ticks simulated.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let steps = self.step.advance(dt);
        for _ in 0..steps {
            let input = self.input.snapshot();
            sim::tick(&mut self.state, &input, &mut self.rng);
            self.input.clear_edges();
            self.dispatch_events();
        }

        let elapsed_ms = (dt.clamp(0.0, 0.1) * 1000.0) as f64;
        self.spawner.advance(&mut self.state, elapsed_ms, &mut self.rng);
        self.dispatch_events();

        steps
    }

    /// Spend score in the open shop
    pub fn buy(&mut self, item: ShopItem) -> Result<(), PurchaseError> {
        let result = sim::purchase(&mut self.state, item);
        if let Err(e) = &result {
            log::debug!("Purchase of {} refused: {}", item.label(), e);
        }
        self.dispatch_events();
        result
    }

    pub fn close_shop(&mut self) {
        sim::close_shop(&mut self.state);
        self.dispatch_events();
    }

    /// Switch background track and remember the choice
    pub fn toggle_music(&mut self) {
        self.settings.music_track = self.settings.music_track.toggled();
        log::info!("Music track: {}", self.settings.music_track.label());
        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {}", e);
        }
        if self.state.is_simulating() {
            self.audio.play(self.settings.music_track.cue());
        }
    }

    fn buy_from_key(&mut self, item: ShopItem) {
        if self.state.shop.open {
            let _ = self.buy(item);
        }
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::RunStarted => {
                    self.step.reset();
                    self.audio.play(self.settings.music_track.cue());
                }
                GameEvent::Resumed | GameEvent::ShopClosed => {
                    if self.state.is_simulating() {
                        self.audio.resume_music(self.settings.music_track);
                    }
                }
                GameEvent::Paused | GameEvent::ShopOpened => self.audio.pause_music(),
                GameEvent::PlayerHit { health } => {
                    log::debug!("Player hit, {} hearts left", health);
                    self.audio.play(Cue::Hit);
                }
                GameEvent::GameOver {
                    score,
                    new_high_score,
                } => self.finish_run(score, new_high_score),
                GameEvent::BossSpawned { health } => {
                    log::info!("Boss spawned with {} health", health);
                }
                GameEvent::BossDefeated => log::info!("Boss defeated"),
                GameEvent::DifficultyUp { level } => log::info!("Difficulty level {}", level),
                _ => {}
            }
        }
    }

    fn finish_run(&mut self, score: u64, new_high_score: bool) {
        self.audio.pause_music();
        self.audio.play(Cue::Lose);

        let rank = self.leaderboard.record(score);
        log::info!(
            "Run recorded: score {} (rank {:?}, new high score: {})",
            score,
            rank,
            new_high_score
        );

        if let Err(e) = self.leaderboard.save(&mut self.store) {
            log::warn!("Failed to save leaderboard: {}", e);
        }
        if new_high_score {
            if let Err(e) = HighScore::save(&mut self.store, self.state.high_score) {
                log::warn!("Failed to save high score: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MusicTrack;
    use crate::consts::{SHOP_STEP, SIM_DT};
    use crate::persistence::MemoryStore;
    use crate::sim::{EnemyKind, GamePhase};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Play(Cue),
        Pause,
        Resume(MusicTrack),
    }

    #[derive(Debug, Default)]
    struct RecordingAudio {
        calls: Vec<Call>,
    }

    impl AudioOut for RecordingAudio {
        fn play(&mut self, cue: Cue) {
            self.calls.push(Call::Play(cue));
        }

        fn pause_music(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn resume_music(&mut self, track: MusicTrack) {
            self.calls.push(Call::Resume(track));
        }

        fn apply_settings(&mut self, _settings: &Settings) {}
    }

    fn session() -> Session<RecordingAudio, MemoryStore> {
        Session::new(
            MemoryStore::new(),
            RecordingAudio::default(),
            1000.0,
            700.0,
            11,
        )
    }

    /// Press a key and run exactly one tick
    fn press(session: &mut Session<RecordingAudio, MemoryStore>, key: Key) {
        session.key_down(key);
        session.frame(SIM_DT);
        session.key_up(key);
    }

    #[test]
    fn test_start_plays_music() {
        let mut s = session();
        press(&mut s, Key::Start);
        assert_eq!(s.state().phase, GamePhase::Playing);
        assert_eq!(s.audio().calls, vec![Call::Play(Cue::Music1)]);
    }

    #[test]
    fn test_pause_and_resume_music() {
        let mut s = session();
        press(&mut s, Key::Start);
        press(&mut s, Key::Pause);
        assert!(s.state().paused);
        press(&mut s, Key::Pause);
        assert!(!s.state().paused);
        assert_eq!(
            s.audio().calls,
            vec![
                Call::Play(Cue::Music1),
                Call::Pause,
                Call::Resume(MusicTrack::One)
            ]
        );
    }

    #[test]
    fn test_game_over_records_scores() {
        let mut s = session();
        press(&mut s, Key::Start);

        s.state.score = 87.0;
        s.state.player.health = 1;
        let pos = s.state.player.pos;
        s.state.push_enemy(EnemyKind::Normal, pos, 0);
        s.frame(SIM_DT);

        assert_eq!(s.state().phase, GamePhase::GameOver);
        assert!(s.audio().calls.contains(&Call::Play(Cue::Hit)));
        assert!(s.audio().calls.ends_with(&[Call::Pause, Call::Play(Cue::Lose)]));
        assert_eq!(s.leaderboard().entries(), &[87]);

        // Both survive a reload from the same store
        assert_eq!(HighScore::load(s.store()), 87);
        assert_eq!(Leaderboard::load(s.store()).entries(), &[87]);
    }

    #[test]
    fn test_toggle_music_persists_choice() {
        let mut s = session();
        s.key_down(Key::ToggleMusic);
        assert_eq!(s.settings().music_track, MusicTrack::Two);
        // Not playing yet, so nothing starts
        assert!(s.audio().calls.is_empty());
        assert_eq!(Settings::load(s.store()).music_track, MusicTrack::Two);

        press(&mut s, Key::Start);
        assert_eq!(s.audio().calls, vec![Call::Play(Cue::Music2)]);
    }

    #[test]
    fn test_shop_keys() {
        let mut s = session();
        press(&mut s, Key::Start);
        s.state.score = SHOP_STEP as f64;
        s.frame(SIM_DT);
        assert!(s.state().shop.open);

        s.key_down(Key::BuyHeart);
        assert_eq!(s.state().player.max_health, 6);
        assert_eq!(s.state().displayed_score(), SHOP_STEP - 100);

        s.key_down(Key::BuyFire);
        assert_eq!(s.state().fire_delay_ms, 70);
        assert_eq!(
            s.buy(ShopItem::FasterFire),
            Err(PurchaseError::InsufficientScore {
                needed: 150,
                available: SHOP_STEP - 250
            })
        );

        s.key_down(Key::CloseShop);
        assert!(!s.state().shop.open);
        assert!(
            s.audio()
                .calls
                .ends_with(&[Call::Pause, Call::Resume(MusicTrack::One)])
        );
    }

    #[test]
    fn test_buy_keys_ignored_outside_shop() {
        let mut s = session();
        press(&mut s, Key::Start);
        s.state.score = 500.0;
        s.key_down(Key::BuyHeart);
        assert_eq!(s.state().player.max_health, 5);
        assert_eq!(s.state().displayed_score(), 500);
    }

    #[test]
    fn test_spawner_inert_at_menu() {
        let mut s = session();
        for _ in 0..120 {
            s.frame(0.05);
        }
        assert!(s.state().enemies.is_empty());
        assert_eq!(s.state().score, 0.0);
    }

    #[test]
    fn test_spawner_runs_while_playing() {
        let mut s = session();
        press(&mut s, Key::Start);
        for _ in 0..25 {
            s.frame(0.05);
        }
        assert!(!s.state().enemies.is_empty());
        assert!(s.state().score >= 0.5);
    }

    #[test]
    fn test_focus_lost_pauses() {
        let mut s = session();
        press(&mut s, Key::Start);
        s.key_down(Key::Left);
        s.focus_lost();
        s.frame(SIM_DT);
        assert!(s.state().paused);
        assert_eq!(s.input.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_loads_existing_scores() {
        let mut store = MemoryStore::new();
        HighScore::save(&mut store, 300).unwrap();
        Leaderboard::from_scores([300, 120]).save(&mut store).unwrap();

        let s = Session::new(store, RecordingAudio::default(), 1000.0, 700.0, 1);
        assert_eq!(s.state().high_score, 300);
        assert_eq!(s.leaderboard().entries(), &[300, 120]);
    }
}
