//! Score shop
//!
//! Opens automatically every 360 displayed score. While open the simulation is
//! frozen and score can be spent on upgrades.

use super::state::{GameEvent, GameState};
use crate::consts::FIRE_DELAY_FLOOR_MS;
use crate::error::PurchaseError;

/// Fire delay reduction per upgrade (ms)
const FIRE_DELAY_STEP_MS: u32 = 10;

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    /// +1 max heart and a full heal
    ExtraHeart,
    /// Shorter delay between shots
    FasterFire,
}

impl ShopItem {
    pub const ALL: [ShopItem; 2] = [ShopItem::ExtraHeart, ShopItem::FasterFire];

    pub fn cost(self) -> u64 {
        match self {
            ShopItem::ExtraHeart => 100,
            ShopItem::FasterFire => 150,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShopItem::ExtraHeart => "+1 Heart",
            ShopItem::FasterFire => "Faster Fire",
        }
    }
}

/// Open the shop (freezes the simulation)
pub fn open_shop(state: &mut GameState) {
    if !state.shop.open {
        state.shop.open = true;
        state.emit(GameEvent::ShopOpened);
        log::info!("Shop opened at score {}", state.displayed_score());
    }
}

/// Close the shop and resume
pub fn close_shop(state: &mut GameState) {
    if state.shop.open {
        state.shop.open = false;
        state.paused = false;
        state.emit(GameEvent::ShopClosed);
    }
}

/// Buy an upgrade with score
pub fn purchase(state: &mut GameState, item: ShopItem) -> Result<(), PurchaseError> {
    if !state.shop.open {
        return Err(PurchaseError::ShopClosed);
    }
    if item == ShopItem::FasterFire && state.fire_delay_ms <= FIRE_DELAY_FLOOR_MS {
        return Err(PurchaseError::Maxed);
    }
    let cost = item.cost();
    if state.score < cost as f64 {
        return Err(PurchaseError::InsufficientScore {
            needed: cost,
            available: state.displayed_score(),
        });
    }

    state.score -= cost as f64;
    match item {
        ShopItem::ExtraHeart => {
            state.player.max_health += 1;
            state.player.health = state.player.max_health;
        }
        ShopItem::FasterFire => {
            state.fire_delay_ms = state
                .fire_delay_ms
                .saturating_sub(FIRE_DELAY_STEP_MS)
                .max(FIRE_DELAY_FLOOR_MS);
        }
    }
    log::info!("Bought {} for {}", item.label(), cost);
    Ok(())
}
