pub mod controls;
pub mod keyboard;

pub use controls::{BoundKey, ControlState, KeyBindings};
pub use keyboard::KeyboardState;
