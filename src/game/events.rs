//! Events emitted by the simulation for audio cues and HUD flashes.

use crate::fighter::PlayerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEndReason {
    Ko,
    Time,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// A round has begun (announcer cue).
    RoundStart { round: u32 },
    /// Fighting is live; switches music to the fight playlist.
    Fight,
    /// An attack started its swing.
    Whoosh { attacker: PlayerSlot },
    /// An attack connected and took health off `defender`.
    Hit {
        attacker: PlayerSlot,
        defender: PlayerSlot,
        damage: i32,
    },
    /// The defender took damage (separate cue channel from `Hit`).
    DamageTaken { defender: PlayerSlot },
    /// An attack was blocked.
    Block {
        attacker: PlayerSlot,
        defender: PlayerSlot,
    },
    RoundEnd {
        winner: Option<PlayerSlot>,
        reason: RoundEndReason,
    },
    MatchEnd { winner: Option<PlayerSlot> },
}
