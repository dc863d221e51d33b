//! Match data structures.
//!
//! A best-of-three fight between two fighters on one stage, stepped by a
//! deterministic simulation clock.

use super::events::{MatchEvent, RoundEndReason};
use crate::ai::NpcController;
use crate::combat::hitbox::HitboxDb;
use crate::core::constants::*;
use crate::fighter::{CharacterId, Fighter, PlayerSlot};
use crate::stage::Stage;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// One human against the CPU, or two humans on one keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Both intro animations play; the HUD is already visible.
    Intro,
    Fighting,
    Paused,
    /// Round result on screen before the next round starts.
    RoundOver,
    MatchOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseView {
    Main,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Continue,
    Options,
    Quit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 3] = [PauseItem::Continue, PauseItem::Options, PauseItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            PauseItem::Continue => "CONTINUE",
            PauseItem::Options => "OPTIONS",
            PauseItem::Quit => "QUIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseMenu {
    pub selected: usize,
    pub view: PauseView,
}

impl PauseMenu {
    pub fn new() -> Self {
        Self {
            selected: 0,
            view: PauseView::Main,
        }
    }

    pub fn item(&self) -> PauseItem {
        PauseItem::ALL[self.selected % PauseItem::ALL.len()]
    }

    pub fn move_selection(&mut self, delta: i32) {
        let n = PauseItem::ALL.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(n) as usize;
    }
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: Option<PlayerSlot>,
    pub reason: RoundEndReason,
}

/// Why the fight screen should close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchExit {
    /// Back to the title screen.
    Title,
}

/// Full state of a fight.
#[derive(Debug, Clone)]
pub struct Match {
    pub mode: GameMode,
    /// `[P1, P2]`.
    pub fighters: [Fighter; 2],
    pub stage: Stage,
    pub phase: MatchPhase,
    pub round: u32,
    /// Round wins, indexed like `fighters`.
    pub wins: [u32; 2],

    /// Simulation clock; only advances in whole steps.
    pub clock_ms: u64,
    /// Leftover real time not yet simulated.
    pub accumulated_ms: u64,
    pub round_start_ms: u64,
    pub pause_started_ms: Option<u64>,
    pub round_over_started_ms: u64,
    /// Confirm pressed during the round-over pause.
    pub round_over_skip: bool,

    pub pause: PauseMenu,
    /// Hitbox editor has frozen the fight.
    pub editor_active: bool,
    pub editor_started_ms: Option<u64>,

    pub hitboxes: HitboxDb,
    /// Drives P2 in single-player mode.
    pub npc: Option<NpcController>,
    pub rng: ChaCha8Rng,
    /// Events since the caller last drained them.
    pub events: Vec<MatchEvent>,
    pub last_result: Option<RoundResult>,
    pub exit: Option<MatchExit>,
}

impl Match {
    pub fn new(
        mode: GameMode,
        p1: CharacterId,
        p2: CharacterId,
        stage: Stage,
        hitboxes: HitboxDb,
        difficulty: f64,
        seed: u64,
    ) -> Self {
        let ground_y = stage.ground_y;
        let mut fighters = [
            Fighter::new(p1, PlayerSlot::P1, P1_START_X, ground_y),
            Fighter::new(p2, PlayerSlot::P2, P2_START_X, ground_y),
        ];
        for f in fighters.iter_mut() {
            f.anims.intro.reset(0);
        }
        let npc = match mode {
            GameMode::Single => Some(NpcController::new(difficulty)),
            GameMode::Double => None,
        };
        Self {
            mode,
            fighters,
            stage,
            phase: MatchPhase::Intro,
            round: 1,
            wins: [0, 0],
            clock_ms: 0,
            accumulated_ms: 0,
            round_start_ms: 0,
            pause_started_ms: None,
            round_over_started_ms: 0,
            round_over_skip: false,
            pause: PauseMenu::new(),
            editor_active: false,
            editor_started_ms: None,
            hitboxes,
            npc,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
            last_result: None,
            exit: None,
        }
    }

    pub fn p1(&self) -> &Fighter {
        &self.fighters[0]
    }

    pub fn p2(&self) -> &Fighter {
        &self.fighters[1]
    }

    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        &self.fighters[slot_index(slot)]
    }

    pub fn fighter_mut(&mut self, slot: PlayerSlot) -> &mut Fighter {
        &mut self.fighters[slot_index(slot)]
    }

    pub fn wins_for(&self, slot: PlayerSlot) -> u32 {
        self.wins[slot_index(slot)]
    }

    pub fn ground_y(&self) -> i32 {
        self.stage.ground_y
    }

    /// Overall winner by round wins, once the match is over.
    pub fn match_winner(&self) -> Option<PlayerSlot> {
        match self.wins[0].cmp(&self.wins[1]) {
            std::cmp::Ordering::Greater => Some(PlayerSlot::P1),
            std::cmp::Ordering::Less => Some(PlayerSlot::P2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }
}

pub fn slot_index(slot: PlayerSlot) -> usize {
    match slot {
        PlayerSlot::P1 => 0,
        PlayerSlot::P2 => 1,
    }
}
