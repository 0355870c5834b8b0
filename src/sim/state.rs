//! Session state and core simulation types
//!
//! Everything a single life needs lives in [`SessionState`]; a reset builds a
//! fresh one from a seed.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool;
use crate::consts::*;

/// Why the player popped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopCause {
    /// Landed on a spiked platform
    Spiked,
    /// Fell below the bottom of the camera
    Fell,
}

/// Gameplay events emitted during a tick, drained by the driver for audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Standard bounce off a platform
    Jump,
    /// Spring platform impulse (always follows a `Jump`)
    Spring,
    /// Player burst
    Popped(PopCause),
}

/// The bouncing ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub is_popped: bool,
    /// Ticks elapsed since popping
    pub pop_timer: u32,
    pub pop_duration: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            is_popped: false,
            pop_timer: 0,
            pop_duration: POP_DURATION_TICKS,
        }
    }
}

impl Player {
    /// Mark the player popped. Returns false if it already was.
    pub fn pop(&mut self) -> bool {
        if self.is_popped {
            return false;
        }
        self.is_popped = true;
        self.pop_timer = 0;
        true
    }

    /// Pop animation has run its full duration
    pub fn pop_finished(&self) -> bool {
        self.is_popped && self.pop_timer >= self.pop_duration
    }
}

/// Platform behaviour, with the per-variant data each kind needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Normal,
    /// Pops the player on contact
    Spiked,
    /// Slides horizontally, bouncing off the arena edges
    Moving { dir: f32, speed: f32 },
    /// Launches the player with `SPRING_BOOST`
    Spring,
    /// Invisible but solid while dormant; once touched it turns visible and
    /// non-solid for `GHOST_DURATION_TICKS`
    Ghost { active: bool, timer: u32 },
}

impl PlatformKind {
    pub fn dormant_ghost() -> Self {
        PlatformKind::Ghost {
            active: false,
            timer: 0,
        }
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, PlatformKind::Spiked)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKind::Normal => "normal",
            PlatformKind::Spiked => "spiked",
            PlatformKind::Moving { .. } => "moving",
            PlatformKind::Spring => "spring",
            PlatformKind::Ghost { .. } => "ghost",
        }
    }
}

/// A platform entity (axis-aligned rectangle, `pos` is its top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(id: u32, x: f32, y: f32, width: f32, kind: PlatformKind) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_HEIGHT,
            kind,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Per-tick update: slide moving platforms, count down active ghosts
    pub fn update(&mut self) {
        match &mut self.kind {
            PlatformKind::Moving { dir, speed } => {
                self.pos.x += *dir * *speed;
                if self.pos.x + self.width >= GAME_WIDTH || self.pos.x <= 0.0 {
                    *dir = -*dir;
                }
                self.pos.x = self.pos.x.clamp(0.0, GAME_WIDTH - self.width);
            }
            PlatformKind::Ghost { active, timer } if *active => {
                *timer = timer.saturating_sub(1);
                if *timer == 0 {
                    *active = false;
                }
            }
            _ => {}
        }
    }

    /// Activate a ghost platform with a full timer.
    /// Returns true if the platform was a dormant ghost.
    pub fn activate_ghost(&mut self) -> bool {
        if let PlatformKind::Ghost { active, timer } = &mut self.kind {
            let was_dormant = !*active;
            *active = true;
            *timer = GHOST_DURATION_TICKS;
            return was_dormant;
        }
        false
    }

    /// Active ghosts are passed through
    pub fn is_solid(&self) -> bool {
        !matches!(self.kind, PlatformKind::Ghost { active: true, .. })
    }

    /// Dormant ghosts are hidden during play
    pub fn is_visible(&self) -> bool {
        !matches!(self.kind, PlatformKind::Ghost { active: false, .. })
    }
}

/// Complete state of one life (deterministic for a given seed and input stream)
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    /// Seed this session was built from
    pub seed: u64,
    pub player: Player,
    /// Live platforms, ascending by y right after reset
    pub platforms: Vec<Platform>,
    /// World y of the top of the screen; only ever decreases
    pub camera_offset: f32,
    /// Height climbed, never decreases
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl SessionState {
    /// Build a fresh session: player at the start position, pool filled to
    /// `MAX_PLATFORMS` and sorted by ascending y
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            player: Player::default(),
            platforms: Vec::with_capacity(MAX_PLATFORMS + 1),
            camera_offset: 0.0,
            score: 0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };

        pool::seed_pool(&mut state);
        log::info!(
            "Session reset (seed {}): {} platforms, top at y={:.1}",
            seed,
            state.platforms.len(),
            state.platforms.first().map(|p| p.pos.y).unwrap_or_default()
        );

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Platform with the smallest y
    pub fn topmost(&self) -> Option<&Platform> {
        self.platforms
            .iter()
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
    }
}
