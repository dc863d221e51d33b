//! Match flow: fixed-step ticking, rounds, pause menu and editor freeze.

use super::events::{MatchEvent, RoundEndReason};
use super::types::*;
use crate::ai::NpcView;
use crate::combat::resolve::resolve_pushboxes;
use crate::core::constants::*;
use crate::core::SimContext;
use crate::fighter::{EndState, PlayerSlot};
use crate::input::ControlState;

/// UI-agnostic match input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchInput {
    /// Esc: pause, back out of menus, or leave the fight.
    Escape,
    /// `p`
    TogglePause,
    /// Space: skip the intro.
    Skip,
    /// Enter
    Confirm,
    MenuUp,
    MenuDown,
    /// F2
    ToggleEditor,
}

/// Advance the match by `dt_ms` of real time.
///
/// Time is consumed in fixed 16 ms steps; leftovers carry to the next call.
/// Returns true if at least one step ran.
pub fn tick_match(m: &mut Match, dt_ms: u64, p1: ControlState, p2: ControlState) -> bool {
    let dt_ms = dt_ms.min(MAX_FRAME_DT_MS);
    m.accumulated_ms += dt_ms;

    let mut stepped = false;
    while m.accumulated_ms >= SIM_STEP_MS {
        m.accumulated_ms -= SIM_STEP_MS;
        m.clock_ms += SIM_STEP_MS;
        step_match(m, p1, p2);
        stepped = true;
    }
    stepped
}

/// One simulation step.
fn step_match(m: &mut Match, p1_controls: ControlState, p2_controls: ControlState) {
    {
        let [p1, p2] = &mut m.fighters;
        p1.update_facing(p2);
        p2.update_facing(p1);
    }

    match m.phase {
        MatchPhase::Intro => {
            let now = m.clock_ms;
            let mut all_done = true;
            for f in m.fighters.iter_mut() {
                f.anims.intro.update(now);
                all_done &= f.anims.intro.done || f.anims.intro.is_empty();
            }
            if all_done {
                start_round(m, 1);
            }
        }
        MatchPhase::Fighting => {
            if !m.editor_active {
                step_fight(m, p1_controls, p2_controls);
            }
        }
        MatchPhase::Paused | MatchPhase::MatchOver => {
            update_fighters(m, ControlState::NONE, Some(ControlState::NONE));
        }
        MatchPhase::RoundOver => {
            update_fighters(m, ControlState::NONE, Some(ControlState::NONE));
            check_round_over(m);
        }
    }
}

fn step_fight(m: &mut Match, p1_controls: ControlState, p2_controls: ControlState) {
    let p2_override = if m.npc.is_some() { None } else { Some(p2_controls) };
    update_fighters(m, p1_controls, p2_override);

    let now = m.clock_ms;
    {
        let [p1, p2] = &mut m.fighters;
        resolve_pushboxes(p1, p2, &m.hitboxes, now);
    }

    let p1_ko = m.fighters[0].is_ko();
    let p2_ko = m.fighters[1].is_ko();
    if p1_ko || p2_ko {
        match (p1_ko, p2_ko) {
            (true, true) => end_round(m, None, RoundEndReason::Draw),
            (false, true) => end_round(m, Some(PlayerSlot::P1), RoundEndReason::Ko),
            _ => end_round(m, Some(PlayerSlot::P2), RoundEndReason::Ko),
        }
    } else if remaining_seconds(m) == 0 {
        let h1 = m.fighters[0].health;
        let h2 = m.fighters[1].health;
        match h1.cmp(&h2) {
            std::cmp::Ordering::Greater => end_round(m, Some(PlayerSlot::P1), RoundEndReason::Time),
            std::cmp::Ordering::Less => end_round(m, Some(PlayerSlot::P2), RoundEndReason::Time),
            std::cmp::Ordering::Equal => end_round(m, None, RoundEndReason::Draw),
        }
    }
}

/// Update P1 then P2. `p2_controls = None` lets the CPU drive P2.
fn update_fighters(m: &mut Match, p1_controls: ControlState, p2_controls: Option<ControlState>) {
    let view = NpcView {
        now_ms: m.clock_ms,
        round: m.round,
        p1_wins: m.wins[0],
        p2_wins: m.wins[1],
        fighting: m.phase == MatchPhase::Fighting,
    };
    let Match {
        fighters,
        hitboxes,
        events,
        rng,
        npc,
        stage,
        clock_ms,
        ..
    } = m;
    let [p1, p2] = fighters;
    let mut ctx = SimContext {
        now_ms: *clock_ms,
        ground_y: stage.ground_y,
        hitboxes,
        events,
        rng,
    };

    p1.update(p1_controls, p2, &mut ctx);
    let p2_controls = match (p2_controls, npc.as_mut()) {
        (Some(controls), _) => controls,
        (None, Some(npc)) => npc.controls(p2, p1, view, &mut *ctx.rng),
        (None, None) => ControlState::NONE,
    };
    p2.update(p2_controls, p1, &mut ctx);
}

/// Full health, start marks, fresh timer.
pub fn start_round(m: &mut Match, round: u32) {
    let now = m.clock_ms;
    let ground_y = m.ground_y();
    m.round = round;
    m.fighters[0].reset_for_round(P1_START_X, ground_y, now);
    m.fighters[1].reset_for_round(P2_START_X, ground_y, now);
    m.last_result = None;
    m.round_start_ms = now;
    m.round_over_skip = false;
    m.pause_started_ms = None;
    m.phase = MatchPhase::Fighting;
    m.events.push(MatchEvent::RoundStart { round });
    m.events.push(MatchEvent::Fight);
    tracing::info!(round, "round start");
}

fn end_round(m: &mut Match, winner: Option<PlayerSlot>, reason: RoundEndReason) {
    let now = m.clock_ms;
    m.round_over_started_ms = now;
    m.round_over_skip = false;

    match winner {
        Some(slot) => {
            m.fighter_mut(slot).set_end_state(Some(EndState::Win), now);
            m.fighter_mut(slot.other()).set_end_state(Some(EndState::Lose), now);
            m.wins[slot_index(slot)] += 1;
        }
        None => {
            for f in m.fighters.iter_mut() {
                f.set_end_state(None, now);
            }
        }
    }

    m.last_result = Some(RoundResult { winner, reason });
    m.events.push(MatchEvent::RoundEnd { winner, reason });
    m.phase = MatchPhase::RoundOver;
    tracing::info!(
        round = m.round,
        winner = winner.map(PlayerSlot::label).unwrap_or("draw"),
        ?reason,
        "round over"
    );
}

fn check_round_over(m: &mut Match) {
    let elapsed = m.clock_ms.saturating_sub(m.round_over_started_ms);
    if !m.round_over_skip && elapsed < ROUND_OVER_PAUSE_MS {
        return;
    }

    if m.wins.iter().any(|&w| w >= ROUNDS_TO_WIN) {
        finish_match(m);
        return;
    }

    let draw = matches!(
        m.last_result,
        Some(RoundResult {
            reason: RoundEndReason::Draw,
            ..
        })
    );
    let next = if draw { m.round } else { m.round + 1 };
    if next > MAX_ROUNDS {
        finish_match(m);
    } else {
        start_round(m, next);
    }
}

fn finish_match(m: &mut Match) {
    m.phase = MatchPhase::MatchOver;
    let winner = m.match_winner();
    m.events.push(MatchEvent::MatchEnd { winner });
    tracing::info!(
        p1_wins = m.wins[0],
        p2_wins = m.wins[1],
        "match over"
    );
}

/// Zero the round wins and fight again from round 1.
pub fn restart_match(m: &mut Match) {
    m.wins = [0, 0];
    start_round(m, 1);
}

/// Seconds left on the round clock. Frozen while paused or editing.
pub fn remaining_seconds(m: &Match) -> u64 {
    let reference = match (m.phase, m.pause_started_ms, m.editor_started_ms) {
        (MatchPhase::Intro, _, _) => return ROUND_SECONDS,
        (MatchPhase::Paused, Some(started), _) => started,
        (_, _, Some(started)) if m.editor_active => started,
        _ => m.clock_ms,
    };
    let elapsed = reference.saturating_sub(m.round_start_ms);
    ROUND_SECONDS.saturating_sub(elapsed / 1000)
}

/// Round-win tally for the HUD.
pub fn wins_to_roman(wins: u32) -> String {
    "I".repeat(wins as usize)
}

fn enter_pause(m: &mut Match) {
    if m.phase != MatchPhase::Fighting || m.editor_active {
        return;
    }
    m.phase = MatchPhase::Paused;
    m.pause = PauseMenu::new();
    m.pause_started_ms = Some(m.clock_ms);
    tracing::debug!("paused");
}

fn resume_from_pause(m: &mut Match) {
    if m.phase != MatchPhase::Paused {
        return;
    }
    if let Some(started) = m.pause_started_ms.take() {
        m.round_start_ms += m.clock_ms.saturating_sub(started);
    }
    m.phase = MatchPhase::Fighting;
    tracing::debug!("resumed");
}

/// Freeze or unfreeze the fight for the hitbox editor.
pub fn set_editor_active(m: &mut Match, active: bool) {
    if active == m.editor_active || m.phase != MatchPhase::Fighting {
        return;
    }
    let now = m.clock_ms;
    m.editor_active = active;
    if active {
        m.editor_started_ms = Some(now);
    } else {
        if let Some(started) = m.editor_started_ms.take() {
            m.round_start_ms += now.saturating_sub(started);
        }
        for f in m.fighters.iter_mut() {
            f.resync_anims(now);
        }
    }
    tracing::info!(active, "hitbox editor");
}

/// Apply a menu/flow input. Returns true if the input was handled.
pub fn process_input(m: &mut Match, input: MatchInput) -> bool {
    match input {
        MatchInput::ToggleEditor => {
            if m.phase != MatchPhase::Fighting {
                return false;
            }
            let active = !m.editor_active;
            set_editor_active(m, active);
            true
        }
        MatchInput::Escape => {
            match m.phase {
                MatchPhase::Fighting if m.editor_active => set_editor_active(m, false),
                MatchPhase::Fighting => enter_pause(m),
                MatchPhase::Paused => {
                    if m.pause.view == PauseView::Options {
                        m.pause.view = PauseView::Main;
                    } else {
                        resume_from_pause(m);
                    }
                }
                MatchPhase::Intro | MatchPhase::RoundOver | MatchPhase::MatchOver => {
                    m.exit = Some(MatchExit::Title);
                }
            }
            true
        }
        MatchInput::TogglePause => match m.phase {
            MatchPhase::Fighting if !m.editor_active => {
                enter_pause(m);
                true
            }
            MatchPhase::Paused => {
                resume_from_pause(m);
                true
            }
            _ => false,
        },
        MatchInput::Skip => {
            if m.phase == MatchPhase::Intro {
                start_round(m, 1);
                true
            } else {
                false
            }
        }
        MatchInput::Confirm => match m.phase {
            MatchPhase::RoundOver => {
                m.round_over_skip = true;
                true
            }
            MatchPhase::MatchOver => {
                restart_match(m);
                true
            }
            MatchPhase::Paused => {
                if m.pause.view == PauseView::Options {
                    m.pause.view = PauseView::Main;
                    return true;
                }
                match m.pause.item() {
                    PauseItem::Continue => resume_from_pause(m),
                    PauseItem::Options => m.pause.view = PauseView::Options,
                    PauseItem::Quit => m.exit = Some(MatchExit::Title),
                }
                true
            }
            _ => false,
        },
        MatchInput::MenuUp | MatchInput::MenuDown => {
            if m.phase != MatchPhase::Paused || m.pause.view != PauseView::Main {
                return false;
            }
            let delta = if input == MatchInput::MenuUp { -1 } else { 1 };
            m.pause.move_selection(delta);
            true
        }
    }
}
