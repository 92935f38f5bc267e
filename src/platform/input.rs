//! Input mapping
//!
//! Browser events are recorded here as they arrive; the driver samples a
//! [`TickInput`] once per tick and then clears the one-shot edges.

use glam::Vec2;

use crate::sim::TickInput;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Dash,
    Pause,
    /// Start a run from the menu
    Start,
    /// Back to the menu from game over
    Restart,
    ToggleMusic,
    BuyHeart,
    BuyFire,
    CloseShop,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Key> {
        let key = match key {
            "w" | "W" | "ArrowUp" => Key::Up,
            "s" | "S" | "ArrowDown" => Key::Down,
            "a" | "A" | "ArrowLeft" => Key::Left,
            "d" | "D" | "ArrowRight" => Key::Right,
            "Shift" => Key::Dash,
            "p" | "P" => Key::Pause,
            " " | "Enter" => Key::Start,
            "r" | "R" => Key::Restart,
            "m" | "M" => Key::ToggleMusic,
            "1" => Key::BuyHeart,
            "2" => Key::BuyFire,
            "c" | "C" | "Escape" => Key::CloseShop,
            _ => return None,
        };
        Some(key)
    }

    pub fn is_movement(self) -> bool {
        matches!(self, Key::Up | Key::Down | Key::Left | Key::Right)
    }
}

/// Accumulated input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    pointer: Option<Vec2>,
    fire: bool,
    dash: bool,
    pause: bool,
    start: bool,
    restart: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Up => self.up = true,
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Dash => self.dash = true,
            Key::Pause => self.pause = true,
            Key::Start => self.start = true,
            Key::Restart => self.restart = true,
            // Session-level actions, not simulation input
            Key::ToggleMusic | Key::BuyHeart | Key::BuyFire | Key::CloseShop => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Up => self.up = false,
            Key::Down => self.down = false,
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            _ => {}
        }
    }

    /// Pointer position in arena coordinates
    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer_down(&mut self) {
        self.fire = true;
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Forget held keys (window lost focus, keyups will never arrive)
    pub fn release_all(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
    }

    /// Axis vector from held keys; opposing keys cancel
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Sample the input for one tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            movement: self.movement(),
            pointer: self.pointer,
            fire: self.fire,
            dash: self.dash,
            pause: self.pause,
            start: self.start,
            restart: self.restart,
        }
    }

    /// Clear one-shot inputs after they have been processed
    pub fn clear_edges(&mut self) {
        self.fire = false;
        self.dash = false;
        self.pause = false;
        self.start = false;
        self.restart = false;
    }
}
