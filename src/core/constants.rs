//! World, physics and timing constants shared by the simulation.

// World dimensions (simulation units, not terminal cells)
pub const WORLD_WIDTH: i32 = 1000;
pub const WORLD_HEIGHT: i32 = 600;

/// Fighter body size.
pub const PLAYER_W: i32 = 300;
pub const PLAYER_H: i32 = 360;

/// Ground line used when a stage has no explicit walkway.
pub const DEFAULT_GROUND_Y: i32 = WORLD_HEIGHT - 80;

/// Fixed simulation step (~60 Hz).
pub const SIM_STEP_MS: u64 = 16;

/// Largest frame delta accepted by `tick`; longer stalls are dropped.
pub const MAX_FRAME_DT_MS: u64 = 100;

// Movement / jump physics
pub const MOVE_SPEED: i32 = 5;
pub const GRAVITY: f64 = 1.1;
pub const JUMP_VY: f64 = -20.0;
pub const JUMP_HSPEED: i32 = 7;

/// Landing stun after being hit in the air.
pub const KNOCKDOWN_MS: u64 = 1500;
/// Recovery after landing from an air attack.
pub const AIR_ATTACK_LAND_STUN_MS: u64 = 450;

/// Extra reach used when neither fighter has authored boxes.
pub const ATTACK_RANGE_PAD: i32 = 20;

// Animation playback rates (frames per second)
pub const INTRO_FPS: u32 = 24;
pub const IDLE_FPS: u32 = 10;
pub const MOVE_FPS: u32 = 12;
pub const BLOCK_FPS: u32 = 14;
pub const ATTACK_FPS: u32 = 14;
pub const HIT_FPS: u32 = 22;

pub const MAX_HEALTH: i32 = 100;
/// Score awarded for every 10 health knocked off the opponent.
pub const SCORE_PER_TEN_HEALTH: u32 = 200;

// Rounds
pub const ROUND_SECONDS: u64 = 90;
pub const ROUND_OVER_PAUSE_MS: u64 = 2500;
pub const ROUNDS_TO_WIN: u32 = 2;
pub const MAX_ROUNDS: u32 = 3;

/// Starting x of each fighter at round start.
pub const P1_START_X: i32 = 40;
pub const P2_START_X: i32 = WORLD_WIDTH - 40 - PLAYER_W;
