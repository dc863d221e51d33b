//! Box data and attack resolution.

pub mod hitbox;
pub mod resolve;

pub use hitbox::{FrameBoxes, HitboxDb, WorldBoxes};
pub use resolve::{attack_hits, deal_damage, resolve_pushboxes, AttackOutcome};
