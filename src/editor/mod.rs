//! In-game hitbox editor (F2 during a fight).

pub mod logic;
pub mod types;

pub use logic::{editor_world_boxes, process_input, status_line, EditorInput, HELP_LINE, NUDGE_FAST};
pub use types::{BoxMode, DragState, HitboxEditor};
