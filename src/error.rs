//! Error types
//!
//! Simulation conditions (health reaching zero, boss defeat, clamping) are
//! state transitions, not errors. Only the adapters and the shop fail.

use thiserror::Error;

/// Missing required surface at startup. Fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no global window")]
    NoWindow,
    #[error("no document on window")]
    NoDocument,
    #[error("required element #{0} is missing")]
    MissingElement(&'static str),
    #[error("element #{0} has the wrong type")]
    WrongElementType(&'static str),
    #[error("canvas has no 2d context")]
    NoCanvasContext,
    #[error("could not create audio element for {0}")]
    Audio(&'static str),
}

/// Key-value storage failures. Logged and ignored.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write key {key}")]
    Write { key: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reasons a shop purchase is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("the shop is closed")]
    ShopClosed,
    #[error("not enough score: need {needed}, have {available}")]
    InsufficientScore { needed: u64, available: u64 },
    #[error("upgrade is already at its limit")]
    Maxed,
}
