//! CPU opponent.

pub mod npc;

pub use npc::{NpcController, NpcView};
