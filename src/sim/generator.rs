//! Procedural platform generation
//!
//! Each call produces the platforms for one row. Types are picked from fixed
//! cumulative thresholds; spiked rows always come with a safe companion on
//! the other half of the arena.

use rand::Rng;

use super::state::{Platform, PlatformKind, SessionState};
use crate::consts::*;

/// Cumulative upper bounds of the type roll
const SPIKED_BELOW: f32 = 0.15;
const MOVING_BELOW: f32 = 0.35;
const SPRING_BELOW: f32 = 0.50;
const GHOST_BELOW: f32 = 0.65;

/// Chance the spiked row's companion is a plain platform (else a spring)
const SAFE_NORMAL_CHANCE: f64 = 0.8;

/// Vertical offset of the safe companion above its spiked partner
const PAIR_JITTER_MIN: f32 = 10.0;
const PAIR_JITTER_MAX: f32 = 40.0;

/// What a type roll asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    SpikedPair,
    Moving,
    Spring,
    Ghost,
    Normal,
}

/// Map a uniform roll in [0, 1) to a row kind
pub fn row_kind_for_roll(roll: f32) -> RowKind {
    if roll < SPIKED_BELOW {
        RowKind::SpikedPair
    } else if roll < MOVING_BELOW {
        RowKind::Moving
    } else if roll < SPRING_BELOW {
        RowKind::Spring
    } else if roll < GHOST_BELOW {
        RowKind::Ghost
    } else {
        RowKind::Normal
    }
}

/// Platforms produced for one row
#[derive(Debug, Clone)]
pub enum Spawn {
    Single(Platform),
    /// Spiked platform on one half, safe platform (normal or spring) on the other
    Pair { hazard: Platform, safe: Platform },
}

impl IntoIterator for Spawn {
    type Item = Platform;
    type IntoIter = std::vec::IntoIter<Platform>;

    /// Hazard first, safe companion last
    fn into_iter(self) -> Self::IntoIter {
        match self {
            Spawn::Single(platform) => vec![platform].into_iter(),
            Spawn::Pair { hazard, safe } => vec![hazard, safe].into_iter(),
        }
    }
}

/// Generate the platforms for a row at `y_pos`
pub fn generate_at(state: &mut SessionState, y_pos: f32) -> Spawn {
    let roll: f32 = state.rng.random();
    match row_kind_for_roll(roll) {
        RowKind::SpikedPair => spiked_pair(state, y_pos),
        kind => Spawn::Single(single(state, y_pos, kind)),
    }
}

/// Like [`generate_at`] but never produces a pair: the spiked band yields a
/// plain platform instead. Used when only one pool slot is left.
pub fn generate_single_at(state: &mut SessionState, y_pos: f32) -> Spawn {
    let roll: f32 = state.rng.random();
    let kind = match row_kind_for_roll(roll) {
        RowKind::SpikedPair => RowKind::Normal,
        kind => kind,
    };
    Spawn::Single(single(state, y_pos, kind))
}

fn single(state: &mut SessionState, y_pos: f32, kind: RowKind) -> Platform {
    let width = state
        .rng
        .random_range(PLATFORM_WIDTH_MIN..=PLATFORM_WIDTH_MAX);
    let x = state.rng.random_range(0.0..=GAME_WIDTH - width);

    let kind = match kind {
        RowKind::Moving => PlatformKind::Moving {
            dir: if state.rng.random_bool(0.5) { 1.0 } else { -1.0 },
            speed: state.rng.random_range(MOVE_SPEED_MIN..MOVE_SPEED_MAX),
        },
        RowKind::Spring => PlatformKind::Spring,
        RowKind::Ghost => PlatformKind::dormant_ghost(),
        RowKind::Normal | RowKind::SpikedPair => PlatformKind::Normal,
    };

    Platform::new(state.next_entity_id(), x, y_pos, width, kind)
}

fn spiked_pair(state: &mut SessionState, y_pos: f32) -> Spawn {
    let half = GAME_WIDTH / 2.0;

    let safe_kind = if state.rng.random_bool(SAFE_NORMAL_CHANCE) {
        PlatformKind::Normal
    } else {
        PlatformKind::Spring
    };
    let spikes_left = state.rng.random_bool(0.5);

    let hazard_width = state.rng.random_range(PLATFORM_WIDTH_MIN..PAIR_WIDTH_MAX);
    let safe_width = state.rng.random_range(PLATFORM_WIDTH_MIN..PAIR_WIDTH_MAX);

    // Left half spans [0, half], right half spans [half, GAME_WIDTH]
    let left_x = |rng: &mut rand_pcg::Pcg32, w: f32| rng.random_range(0.0..=half - w);
    let right_x = |rng: &mut rand_pcg::Pcg32, w: f32| rng.random_range(half..=GAME_WIDTH - w);
    let (hazard_x, safe_x) = if spikes_left {
        (
            left_x(&mut state.rng, hazard_width),
            right_x(&mut state.rng, safe_width),
        )
    } else {
        (
            right_x(&mut state.rng, hazard_width),
            left_x(&mut state.rng, safe_width),
        )
    };

    let jitter = state.rng.random_range(PAIR_JITTER_MIN..PAIR_JITTER_MAX);

    let hazard = Platform::new(
        state.next_entity_id(),
        hazard_x,
        y_pos,
        hazard_width,
        PlatformKind::Spiked,
    );
    let safe = Platform::new(
        state.next_entity_id(),
        safe_x,
        y_pos - jitter,
        safe_width,
        safe_kind,
    );

    Spawn::Pair { hazard, safe }
}
