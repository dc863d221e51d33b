//! Match state and flow.

pub mod events;
pub mod logic;
pub mod types;

pub use events::{MatchEvent, RoundEndReason};
pub use logic::{
    process_input, remaining_seconds, set_editor_active, start_round, tick_match, wins_to_roman,
    MatchInput,
};
pub use types::{
    slot_index, GameMode, Match, MatchExit, MatchPhase, PauseItem, PauseMenu, PauseView,
    RoundResult,
};
