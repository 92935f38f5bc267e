//! Rendering module
//!
//! `hud` turns game state into overlay parameters; `canvas` draws them with a
//! 2D context on the web.

pub mod hud;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use hud::Overlays;
