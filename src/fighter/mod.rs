//! Fighters: roster data, move table, animation clocks and the per-frame state machine.

pub mod anim;
pub mod logic;
pub mod moves;
pub mod roster;
pub mod types;

pub use anim::FrameAnim;
pub use moves::{AttackButton, Height, MoveData, MoveKey};
pub use roster::CharacterId;
pub use types::{
    AirState, BlockVariant, EndState, Fighter, FighterAnims, GroundState, PlayerSlot, Stance,
};
