//! Platform pool maintenance
//!
//! Keeps an endless supply of platforms above the player without letting the
//! pool grow: platforms that scroll out below the screen are dropped, and new
//! rows are generated above the topmost platform until the floor is met.

use rand::Rng;

use super::generator::{generate_at, generate_single_at};
use super::state::{Platform, PlatformKind, SessionState};
use crate::consts::*;

/// Fill a fresh session's pool: the starting platform under the player, then
/// rows upward until exactly `MAX_PLATFORMS` exist, sorted by ascending y
pub(crate) fn seed_pool(state: &mut SessionState) {
    state.platforms.clear();

    let id = state.next_entity_id();
    state.platforms.push(Platform::new(
        id,
        PLAYER_START_X - START_PLATFORM_WIDTH / 2.0,
        START_PLATFORM_Y,
        START_PLATFORM_WIDTH,
        PlatformKind::Normal,
    ));

    let mut last_y = START_PLATFORM_Y;
    while state.platforms.len() < MAX_PLATFORMS {
        let y = last_y - random_gap(state);
        let spawn = if MAX_PLATFORMS - state.platforms.len() >= 2 {
            generate_at(state, y)
        } else {
            generate_single_at(state, y)
        };
        state.platforms.extend(spawn);
        last_y = state.platforms.last().map(|p| p.pos.y).unwrap_or(y);
    }

    state.platforms.sort_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
}

/// Per-tick pool maintenance while playing.
///
/// Updates every platform, prunes those below `camera + height + margin`, and
/// refills from the topmost platform. Returns the number of platforms pruned.
pub fn maintain_pool(state: &mut SessionState) -> usize {
    for platform in &mut state.platforms {
        platform.update();
    }

    let cutoff = prune_line(state.camera_offset);
    let before = state.platforms.len();
    state.platforms.retain(|p| p.pos.y <= cutoff);
    let pruned = before - state.platforms.len();

    refill(state);

    pruned
}

/// World y below which platforms are discarded
#[inline]
pub fn prune_line(camera_offset: f32) -> f32 {
    camera_offset + GAME_HEIGHT + PRUNE_MARGIN
}

/// Generate rows above the topmost platform until the pool floor is met.
/// An empty pool restarts from the bottom of the screen.
pub fn refill(state: &mut SessionState) {
    while state.platforms.len() < MAX_PLATFORMS {
        let top_y = state
            .topmost()
            .map(|p| p.pos.y)
            .unwrap_or(state.camera_offset + GAME_HEIGHT);
        let y = top_y - random_gap(state);
        let spawn = generate_at(state, y);
        state.platforms.extend(spawn);
    }
}

fn random_gap(state: &mut SessionState) -> f32 {
    state.rng.random_range(PLATFORM_GAP_MIN..PLATFORM_GAP_MAX)
}
