//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No terminal or file-system dependencies (sprite loading aside)

pub mod collision;
pub mod entity;
pub mod mask;
pub mod player;
pub mod rect;
pub mod registry;
pub mod spawn;
pub mod sprites;
pub mod state;
pub mod tick;

pub use entity::{Background, Enemy, Entity, EntityKind, Platform, PowUp, PowUpKind};
pub use mask::Mask;
pub use player::{AnimState, Player};
pub use rect::Rect;
pub use registry::{EntityId, Registry};
pub use sprites::{Frame, SpriteBank, SpriteId};
pub use state::{EndReason, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
