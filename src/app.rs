//! Screen flow and input dispatch for the terminal game.
//!
//! Title -> character select (P1, then P2 or the CPU's fighter) -> stage
//! select -> fight. Every key event passes through [`App::handle_key`];
//! held-key state for the fighters is tracked separately by the keyboard.

use crate::audio::SoundBoard;
use crate::combat::hitbox::HitboxDb;
use crate::config::GameConfig;
use crate::editor::{self, BoxMode, EditorInput, HitboxEditor, NUDGE_FAST};
use crate::fighter::roster::{character_for_box, move_select_cursor};
use crate::fighter::CharacterId;
use crate::game::logic::{process_input as process_match_input, tick_match};
use crate::game::{GameMode, Match, MatchExit, MatchInput};
use crate::input::KeyboardState;
use crate::stage::{move_stage_cursor, Stage};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// CPU difficulty change per `b` / `n` press.
pub const DIFFICULTY_STEP: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleItem {
    Single,
    Double,
    Quit,
}

impl TitleItem {
    pub const ALL: [TitleItem; 3] = [TitleItem::Single, TitleItem::Double, TitleItem::Quit];

    pub fn label(self) -> &'static str {
        match self {
            TitleItem::Single => "Single",
            TitleItem::Double => "Double",
            TitleItem::Quit => "Quit",
        }
    }
}

/// Who is choosing on the character select screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    P1,
    P2,
    /// P1 picks the CPU's fighter and sets its difficulty.
    Cpu,
}

impl Picker {
    pub fn label(self) -> &'static str {
        match self {
            Picker::P1 => "P1",
            Picker::P2 => "P2",
            Picker::Cpu => "CPU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title { selected: usize },
    CharSelect { picker: Picker, cursor: usize },
    StageSelect { cursor: usize },
    Fight,
}

pub struct App {
    pub config: GameConfig,
    pub screen: Screen,
    pub mode: GameMode,
    pub p1_choice: Option<CharacterId>,
    pub p2_choice: Option<CharacterId>,
    /// CPU base difficulty chosen on the select screen.
    pub difficulty: f64,
    pub stages: Vec<Stage>,
    /// Live hitbox database; fights start from a copy of it.
    pub hitboxes: HitboxDb,
    pub fight: Option<Match>,
    pub editor: HitboxEditor,
    pub keyboard: KeyboardState,
    pub sound: SoundBoard,
    rng: ChaCha8Rng,
    pub quit: bool,
}

impl App {
    pub fn new(config: GameConfig, hitboxes: HitboxDb, stages: Vec<Stage>, sound: SoundBoard, seed: u64) -> Self {
        let editor = HitboxEditor::new(config.hitbox_path.clone(), &hitboxes);
        let mut app = Self {
            difficulty: config.difficulty,
            config,
            screen: Screen::Title { selected: 0 },
            mode: GameMode::Single,
            p1_choice: None,
            p2_choice: None,
            stages,
            hitboxes,
            fight: None,
            editor,
            keyboard: KeyboardState::new(),
            sound,
            rng: ChaCha8Rng::seed_from_u64(seed),
            quit: false,
        };
        app.sound.play_menu_music();
        app
    }

    pub fn handle_key(&mut self, key: KeyEvent, now_ms: u64) {
        if self.screen == Screen::Fight {
            self.keyboard.handle_event(&key, now_ms);
        }
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }

        match self.screen {
            Screen::Title { selected } => self.handle_title_key(key, selected),
            Screen::CharSelect { picker, cursor } => self.handle_char_select_key(key, picker, cursor),
            Screen::StageSelect { cursor } => self.handle_stage_select_key(key, cursor),
            Screen::Fight => self.handle_fight_key(key),
        }
    }

    fn handle_title_key(&mut self, key: KeyEvent, selected: usize) {
        let n = TitleItem::ALL.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('w') => {
                self.screen = Screen::Title {
                    selected: (selected + n - 1) % n,
                };
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.screen = Screen::Title {
                    selected: (selected + 1) % n,
                };
            }
            KeyCode::Enter => match TitleItem::ALL[selected % n] {
                TitleItem::Quit => self.quit = true,
                item => {
                    self.mode = if item == TitleItem::Double {
                        GameMode::Double
                    } else {
                        GameMode::Single
                    };
                    self.p1_choice = None;
                    self.p2_choice = None;
                    self.screen = Screen::CharSelect {
                        picker: Picker::P1,
                        cursor: 0,
                    };
                }
            },
            KeyCode::Esc => self.quit = true,
            _ => {}
        }
    }

    fn handle_char_select_key(&mut self, key: KeyEvent, picker: Picker, cursor: usize) {
        let moved = match key.code {
            KeyCode::Left | KeyCode::Char('a') => Some(move_select_cursor(cursor, -1, 0)),
            KeyCode::Right | KeyCode::Char('d') => Some(move_select_cursor(cursor, 1, 0)),
            KeyCode::Up | KeyCode::Char('w') => Some(move_select_cursor(cursor, 0, -1)),
            KeyCode::Down | KeyCode::Char('s') => Some(move_select_cursor(cursor, 0, 1)),
            _ => None,
        };
        if let Some(cursor) = moved {
            self.screen = Screen::CharSelect { picker, cursor };
            return;
        }

        match key.code {
            KeyCode::Esc => self.back_to_title(),
            KeyCode::Char('b') if picker == Picker::Cpu => self.adjust_difficulty(-DIFFICULTY_STEP),
            KeyCode::Char('n') if picker == Picker::Cpu => self.adjust_difficulty(DIFFICULTY_STEP),
            KeyCode::Enter => {
                // Locked boxes cannot be picked.
                let Some(character) = character_for_box(cursor) else {
                    return;
                };
                if picker == Picker::P1 {
                    self.p1_choice = Some(character);
                    let next = match self.mode {
                        GameMode::Single => Picker::Cpu,
                        GameMode::Double => Picker::P2,
                    };
                    self.screen = Screen::CharSelect {
                        picker: next,
                        cursor: 0,
                    };
                } else {
                    self.p2_choice = Some(character);
                    let cursor = self
                        .stages
                        .iter()
                        .position(|s| s.name == self.config.default_stage)
                        .unwrap_or(0);
                    self.screen = Screen::StageSelect { cursor };
                }
            }
            _ => {}
        }
    }

    fn adjust_difficulty(&mut self, delta: f64) {
        let d = (self.difficulty + delta).clamp(0.0, 1.0);
        self.difficulty = (d * 100.0).round() / 100.0;
    }

    fn handle_stage_select_key(&mut self, key: KeyEvent, cursor: usize) {
        let count = self.stages.len();
        let moved = match key.code {
            KeyCode::Left | KeyCode::Char('a') => Some(move_stage_cursor(cursor, -1, 0, count)),
            KeyCode::Right | KeyCode::Char('d') => Some(move_stage_cursor(cursor, 1, 0, count)),
            KeyCode::Up | KeyCode::Char('w') => Some(move_stage_cursor(cursor, 0, -1, count)),
            KeyCode::Down | KeyCode::Char('s') => Some(move_stage_cursor(cursor, 0, 1, count)),
            _ => None,
        };
        if let Some(cursor) = moved {
            self.screen = Screen::StageSelect { cursor };
            return;
        }

        match key.code {
            KeyCode::Esc => self.back_to_title(),
            KeyCode::Enter => {
                let stage = self
                    .stages
                    .get(cursor)
                    .cloned()
                    .unwrap_or_else(Stage::default_stage);
                self.start_fight(stage);
            }
            _ => {}
        }
    }

    fn start_fight(&mut self, stage: Stage) {
        let p1 = self.p1_choice.unwrap_or(CharacterId::Nate);
        let p2 = self.p2_choice.unwrap_or(CharacterId::Nate);
        let seed = self.rng.gen::<u64>();
        tracing::info!(
            p1 = p1.name(),
            p2 = p2.name(),
            stage = %stage.name,
            mode = ?self.mode,
            difficulty = self.difficulty,
            "fight start"
        );
        self.fight = Some(Match::new(
            self.mode,
            p1,
            p2,
            stage,
            self.hitboxes.clone(),
            self.difficulty,
            seed,
        ));
        self.keyboard.clear();
        self.sound.play_fight_music(&mut self.rng);
        self.screen = Screen::Fight;
    }

    fn back_to_title(&mut self) {
        self.fight = None;
        self.keyboard.clear();
        self.screen = Screen::Title { selected: 0 };
        self.sound.play_menu_music();
    }

    fn handle_fight_key(&mut self, key: KeyEvent) {
        let Some(m) = self.fight.as_mut() else {
            self.back_to_title();
            return;
        };

        if m.editor_active && key.code != KeyCode::F(2) {
            if let Some(input) = editor_input_for_key(&key) {
                editor::process_input(&mut self.editor, m, input);
                if input == EditorInput::Save {
                    self.hitboxes = m.hitboxes.clone();
                }
            }
            return;
        }

        let Some(input) = match_input_for_key(&key) else {
            return;
        };
        process_match_input(m, input);
        if input == MatchInput::ToggleEditor {
            if m.editor_active {
                self.editor.reset_from(&m.hitboxes);
            } else {
                self.editor.drag = editor::DragState::Idle;
            }
        }
        if m.exit.is_some() {
            self.back_to_title();
        }
    }

    /// Mouse action in world coordinates; only the editor listens.
    pub fn handle_mouse(&mut self, input: EditorInput) {
        if let Some(m) = self.fight.as_mut() {
            editor::process_input(&mut self.editor, m, input);
        }
    }

    pub fn editor_active(&self) -> bool {
        self.fight.as_ref().is_some_and(|m| m.editor_active)
    }

    /// Advance the fight by `dt_ms` and route its events to the sound board.
    pub fn tick(&mut self, dt_ms: u64, now_ms: u64) {
        let Some(m) = self.fight.as_mut() else {
            return;
        };
        let p1 = self.keyboard.controls(&self.config.p1_keys, now_ms);
        let p2 = self.keyboard.controls(&self.config.p2_keys, now_ms);
        tick_match(m, dt_ms, p1, p2);

        for event in m.drain_events() {
            self.sound.handle_event(&event, &mut self.rng);
        }
        if m.exit == Some(MatchExit::Title) {
            self.back_to_title();
        }
    }
}

/// Fight-screen keys outside the editor.
pub fn match_input_for_key(key: &KeyEvent) -> Option<MatchInput> {
    match key.code {
        KeyCode::Esc => Some(MatchInput::Escape),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(MatchInput::TogglePause),
        KeyCode::Char(' ') => Some(MatchInput::Skip),
        KeyCode::Enter => Some(MatchInput::Confirm),
        KeyCode::Up | KeyCode::Char('w') => Some(MatchInput::MenuUp),
        KeyCode::Down | KeyCode::Char('s') => Some(MatchInput::MenuDown),
        KeyCode::F(2) => Some(MatchInput::ToggleEditor),
        _ => None,
    }
}

/// Editor keys; mouse input arrives separately.
pub fn editor_input_for_key(key: &KeyEvent) -> Option<EditorInput> {
    let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
        NUDGE_FAST
    } else {
        1
    };
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') | KeyCode::Char('S') if ctrl => Some(EditorInput::Save),
        KeyCode::Enter => Some(EditorInput::Save),
        KeyCode::Char('1') => Some(EditorInput::SetMode(BoxMode::Push)),
        KeyCode::Char('2') => Some(EditorInput::SetMode(BoxMode::Hurt)),
        KeyCode::Char('3') => Some(EditorInput::SetMode(BoxMode::Hit)),
        KeyCode::Tab | KeyCode::BackTab => Some(EditorInput::SwitchPlayer),
        KeyCode::Char(',') | KeyCode::Char('<') => Some(EditorInput::StepFrame(-1)),
        KeyCode::Char('.') | KeyCode::Char('>') => Some(EditorInput::StepFrame(1)),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(EditorInput::CopyPrev),
        KeyCode::Left => Some(EditorInput::Nudge { dx: -step, dy: 0 }),
        KeyCode::Right => Some(EditorInput::Nudge { dx: step, dy: 0 }),
        KeyCode::Up => Some(EditorInput::Nudge { dx: 0, dy: -step }),
        KeyCode::Down => Some(EditorInput::Nudge { dx: 0, dy: step }),
        KeyCode::Delete | KeyCode::Backspace => Some(EditorInput::Delete),
        KeyCode::Esc => Some(EditorInput::Exit),
        _ => None,
    }
}
