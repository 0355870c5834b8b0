//! Pop Jump - a vertical-scrolling bouncing-ball platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, platform generation)
//! - `game`: Mode state machine (loading, playing, game over, leaderboard, error)
//! - `app`: Driver wiring the state machine to its collaborators
//! - `persistence`: High score and leaderboard stores
//! - `audio`: Sound effect sink

pub mod app;
pub mod audio;
pub mod game;
pub mod highscores;
pub mod identity;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use app::App;
pub use game::{Command, Game, GameMode, Message};
pub use identity::Identity;
pub use settings::Settings;

/// Game configuration constants
///
/// All values are per frame; the simulation advances one tick per rendered frame.
pub mod consts {
    /// Arena dimensions
    pub const GAME_WIDTH: f32 = 400.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Downward acceleration added to vy every tick
    pub const GRAVITY: f32 = 0.6;
    /// Standard bounce impulse (negative is up)
    pub const JUMP_FORCE: f32 = -15.0;
    /// Spring platform impulse
    pub const SPRING_BOOST: f32 = -25.0;
    /// Horizontal speed while steering
    pub const PLAYER_SPEED: f32 = 6.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_START_X: f32 = GAME_WIDTH / 2.0;
    pub const PLAYER_START_Y: f32 = GAME_HEIGHT - 100.0;
    /// Ticks the pop animation runs before the game is over
    pub const POP_DURATION_TICKS: u32 = 60;

    /// Platform geometry
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_GAP_MIN: f32 = 100.0;
    pub const PLATFORM_GAP_MAX: f32 = 150.0;
    pub const PLATFORM_WIDTH_MIN: f32 = 80.0;
    pub const PLATFORM_WIDTH_MAX: f32 = 140.0;
    /// Spiked pairs are narrower so each fits in half the arena
    pub const PAIR_WIDTH_MAX: f32 = PLATFORM_WIDTH_MAX - 20.0;
    /// Starting platform under the player
    pub const START_PLATFORM_WIDTH: f32 = 100.0;
    pub const START_PLATFORM_Y: f32 = GAME_HEIGHT - 50.0;

    /// Ticks a touched ghost platform stays active
    pub const GHOST_DURATION_TICKS: u32 = 45;
    /// Moving platform speed range
    pub const MOVE_SPEED_MIN: f32 = 1.0;
    pub const MOVE_SPEED_MAX: f32 = 2.5;

    /// Camera scrolls once the player climbs above this screen-space line
    pub const SCROLL_THRESHOLD: f32 = GAME_HEIGHT / 2.5;
    /// Platforms further than this below the screen bottom are pruned
    pub const PRUNE_MARGIN: f32 = 50.0;
    /// Pool floor
    pub const MAX_PLATFORMS: usize = 12;

    /// Leaderboard rows fetched for the leaderboard view
    pub const LEADERBOARD_SIZE: usize = 10;
}

/// Wrap a horizontal position around the arena edges
///
/// Leaving past the right edge reappears at x = 0 and vice versa.
#[inline]
pub fn wrap_x(x: f32) -> f32 {
    if x > consts::GAME_WIDTH {
        0.0
    } else if x < 0.0 {
        consts::GAME_WIDTH
    } else {
        x
    }
}

/// Derive the seed for the nth run from a base seed
#[inline]
pub fn run_seed(base: u64, run: u32) -> u64 {
    base.wrapping_add((run as u64).wrapping_mul(2654435761))
}
